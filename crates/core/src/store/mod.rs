//! Genre and trend storage.
//!
//! Genres are reference data; trends are written by the collector and read by
//! the query layer. A trend is identified by `(genre_id, trend_name)`, so
//! re-collecting the same trend overwrites the existing row.

mod sqlite;
mod types;

pub use sqlite::SqliteTrendStore;
pub use types::*;

/// Trait for genre/trend storage.
pub trait TrendStore: Send + Sync {
    /// List all genres ordered by name.
    fn list_genres(&self) -> Result<Vec<Genre>, StoreError>;

    /// Look up a genre by exact name.
    fn get_genre_by_name(&self, name: &str) -> Result<Genre, StoreError>;

    /// Insert a genre if no genre with that name exists yet.
    ///
    /// Returns the genre either way. Existing genres are left untouched.
    fn ensure_genre(&self, name: &str) -> Result<Genre, StoreError>;

    /// Insert or overwrite a batch of trends.
    ///
    /// Rows conflicting on `(genre_id, trend_name)` have their platform,
    /// description, growth flag, value and timestamp replaced. The batch is
    /// atomic: on error nothing is written.
    ///
    /// Returns the number of rows written.
    fn upsert_trends(&self, trends: &[NewTrend]) -> Result<usize, StoreError>;

    /// All trends joined with their genre name, newest first.
    fn list_trends_with_genre(&self) -> Result<Vec<TrendWithGenre>, StoreError>;

    /// Trends for one genre, newest first.
    fn list_trends_for_genre(&self, genre_id: i64) -> Result<Vec<Trend>, StoreError>;
}
