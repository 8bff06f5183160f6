//! Types for the genre/trend store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A music genre. Genres are seeded out-of-band and never modified here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

/// A stored trend observation for one genre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub id: i64,
    pub genre_id: i64,
    /// Platform the trend was observed on (e.g., "TikTok").
    pub platform: String,
    pub trend_name: String,
    pub trend_description: String,
    pub is_growing: bool,
    /// Magnitude reported by the provider. Units vary by platform.
    pub data_value: f64,
    /// When this row was last written by a collection run.
    pub last_updated: DateTime<Utc>,
}

/// A trend joined with its genre's name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendWithGenre {
    #[serde(flatten)]
    pub trend: Trend,
    pub genre_name: String,
}

/// A trend ready to be upserted, keyed on `(genre_id, trend_name)`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTrend {
    pub genre_id: i64,
    pub platform: String,
    pub trend_name: String,
    pub trend_description: String,
    pub is_growing: bool,
    pub data_value: f64,
    pub last_updated: DateTime<Utc>,
}

/// Errors for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),
}
