//! Types for the collection job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::StoreError;

/// Outcome of collecting one genre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionStatus {
    /// Trends were researched and stored.
    Success,
    /// The researcher returned nothing; the store was not touched.
    NoData,
    /// Storing the researched trends failed.
    DbError,
}

impl CollectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionStatus::Success => "success",
            CollectionStatus::NoData => "no_data",
            CollectionStatus::DbError => "db_error",
        }
    }
}

/// Per-genre entry in a collection report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionResult {
    pub genre: String,
    /// Rows written for this genre; 0 unless `status` is `success`.
    #[serde(rename = "trendsProcessed")]
    pub trends_processed: usize,
    pub status: CollectionStatus,
}

impl CollectionResult {
    pub fn success(genre: impl Into<String>, trends_processed: usize) -> Self {
        Self {
            genre: genre.into(),
            trends_processed,
            status: CollectionStatus::Success,
        }
    }

    pub fn no_data(genre: impl Into<String>) -> Self {
        Self {
            genre: genre.into(),
            trends_processed: 0,
            status: CollectionStatus::NoData,
        }
    }

    pub fn db_error(genre: impl Into<String>) -> Self {
        Self {
            genre: genre.into(),
            trends_processed: 0,
            status: CollectionStatus::DbError,
        }
    }
}

/// Summary of one collection run, one result per genre in genre-name order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionReport {
    pub success: bool,
    pub results: Vec<CollectionResult>,
    pub timestamp: DateTime<Utc>,
    /// Informational note, e.g. when there was nothing to collect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CollectionReport {
    /// Number of genres that ended with the given status.
    pub fn count(&self, status: CollectionStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }
}

/// Failure that aborts a whole collection run.
#[derive(Debug, Error)]
pub enum CollectionError {
    #[error("failed to list genres: {0}")]
    ListGenres(#[source] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_result_serialization_shape() {
        let result = CollectionResult::success("Jazz", 4);
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "genre": "Jazz", "trendsProcessed": 4, "status": "success" })
        );

        let result = CollectionResult::db_error("Rock");
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "genre": "Rock", "trendsProcessed": 0, "status": "db_error" })
        );
    }

    #[test]
    fn test_report_omits_empty_message() {
        let report = CollectionReport {
            success: true,
            results: vec![CollectionResult::no_data("Pop")],
            timestamp: Utc::now(),
            message: None,
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["results"][0]["status"], "no_data");
        assert!(value.get("message").is_none());
        assert!(value["timestamp"].is_string());
        assert_eq!(report.count(CollectionStatus::NoData), 1);
    }
}
