//! Types for trend research.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::{ExtractError, LlmError};

/// One trend as reported by the research provider, before it is tied to a
/// genre or timestamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTrend {
    pub platform: String,
    pub trend_name: String,
    #[serde(default)]
    pub trend_description: String,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_growing: bool,
    #[serde(default, deserialize_with = "lenient_number")]
    pub data_value: f64,
}

/// Accept `8500`, `8500.5` or `"8500"`; `null` becomes 0.
fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(0.0),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| serde::de::Error::custom("data_value out of range")),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("data_value is not numeric: {s}"))),
        other => Err(serde::de::Error::custom(format!(
            "data_value has unexpected type: {other}"
        ))),
    }
}

/// Accept `true`, `false` or their string forms (any case); `null` becomes false.
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(false),
        Value::Bool(b) => Ok(b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(serde::de::Error::custom(format!(
                "is_growing is not a boolean: {s}"
            ))),
        },
        other => Err(serde::de::Error::custom(format!(
            "is_growing has unexpected type: {other}"
        ))),
    }
}

/// Pull the usable entries out of a parsed `{ "trends": [...] }` envelope.
///
/// A missing or non-array `trends` key yields nothing. Entries are decoded
/// one at a time so a single malformed entry does not discard the rest.
pub fn trends_from_envelope(envelope: &Value) -> Vec<RawTrend> {
    let Some(entries) = envelope.get("trends").and_then(Value::as_array) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| match RawTrend::deserialize(entry) {
            Ok(mut trend) => {
                trend.platform = trend.platform.trim().to_string();
                trend.trend_name = trend.trend_name.trim().to_string();
                if trend.trend_name.is_empty() || trend.platform.is_empty() {
                    debug!(entry = %entry, "Skipping trend entry with blank name or platform");
                    None
                } else {
                    Some(trend)
                }
            }
            Err(e) => {
                debug!(error = %e, entry = %entry, "Skipping malformed trend entry");
                None
            }
        })
        .collect()
}

/// Failure while researching one genre. Never escapes the researcher; it is
/// logged and turned into an empty result.
#[derive(Debug, Error)]
pub enum ResearchError {
    #[error("provider call failed: {0}")]
    Provider(#[from] LlmError),

    #[error("could not extract trends: {0}")]
    Extract(#[from] ExtractError),
}

impl ResearchError {
    /// Short label used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ResearchError::Provider(e) => e.kind(),
            ResearchError::Extract(_) => "parse_error",
        }
    }
}
