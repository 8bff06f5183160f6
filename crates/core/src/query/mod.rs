//! Read-side queries over stored trends.
//!
//! These back the dashboard endpoints. Storage failures are logged and
//! reported as empty results so a broken read never turns into an error page.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, error};

use crate::store::{Genre, StoreError, Trend, TrendStore};

/// Read-only access to genres and trends.
#[derive(Clone)]
pub struct TrendQueries {
    store: Arc<dyn TrendStore>,
}

impl TrendQueries {
    pub fn new(store: Arc<dyn TrendStore>) -> Self {
        Self { store }
    }

    /// All genres ordered by name.
    pub fn list_genres(&self) -> Vec<Genre> {
        self.store.list_genres().unwrap_or_else(|e| {
            error!(error = %e, "Failed to list genres");
            Vec::new()
        })
    }

    /// All trends grouped by genre name, each group newest first.
    ///
    /// Genres without trends do not appear in the map.
    pub fn list_trends_by_genre(&self) -> BTreeMap<String, Vec<Trend>> {
        let rows = match self.store.list_trends_with_genre() {
            Ok(rows) => rows,
            Err(e) => {
                error!(error = %e, "Failed to list trends");
                return BTreeMap::new();
            }
        };

        // Rows arrive newest first; pushing in order keeps each group sorted.
        let mut grouped: BTreeMap<String, Vec<Trend>> = BTreeMap::new();
        for row in rows {
            grouped.entry(row.genre_name).or_default().push(row.trend);
        }
        grouped
    }

    /// Trends for the genre with exactly this name, newest first.
    ///
    /// Unknown genres yield an empty list.
    pub fn list_trends_for_genre(&self, genre_name: &str) -> Vec<Trend> {
        let genre = match self.store.get_genre_by_name(genre_name) {
            Ok(genre) => genre,
            Err(StoreError::NotFound(_)) => {
                debug!(genre = %genre_name, "Genre not found");
                return Vec::new();
            }
            Err(e) => {
                error!(genre = %genre_name, error = %e, "Failed to look up genre");
                return Vec::new();
            }
        };

        self.store
            .list_trends_for_genre(genre.id)
            .unwrap_or_else(|e| {
                error!(genre = %genre_name, error = %e, "Failed to list trends for genre");
                Vec::new()
            })
    }
}
