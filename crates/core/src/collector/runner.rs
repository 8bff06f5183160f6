//! The collection run: research every genre and upsert what comes back.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::{CollectionError, CollectionReport, CollectionResult, CollectionStatus};
use crate::metrics;
use crate::research::{RawTrend, TrendResearcher};
use crate::store::{Genre, NewTrend, TrendStore};

/// Message reported when a run finds no genres to process.
pub const NO_GENRES_MESSAGE: &str = "No genres found";

/// Drives one collection run across all genres.
///
/// Genres are independent: a researcher or storage failure for one genre is
/// recorded in its result and the run moves on. Only failing to list the
/// genres aborts the run.
pub struct TrendCollector {
    store: Arc<dyn TrendStore>,
    researcher: Arc<dyn TrendResearcher>,
    max_concurrent_genres: usize,
}

impl TrendCollector {
    /// Create a collector that processes one genre at a time.
    pub fn new(store: Arc<dyn TrendStore>, researcher: Arc<dyn TrendResearcher>) -> Self {
        Self {
            store,
            researcher,
            max_concurrent_genres: 1,
        }
    }

    /// Allow up to `limit` genres in flight at once. Values below 1 are treated as 1.
    pub fn with_max_concurrent_genres(mut self, limit: usize) -> Self {
        self.max_concurrent_genres = limit.max(1);
        self
    }

    /// Run collection for every genre.
    ///
    /// Results come back in genre-name order regardless of how many genres
    /// were processed concurrently.
    pub async fn run_collection(&self) -> Result<CollectionReport, CollectionError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("collection_run", %run_id);
        self.run_inner().instrument(span).await
    }

    async fn run_inner(&self) -> Result<CollectionReport, CollectionError> {
        let start = Instant::now();

        let genres = match self.store.list_genres() {
            Ok(genres) => genres,
            Err(e) => {
                error!(error = %e, "Failed to list genres, aborting collection");
                metrics::COLLECTION_RUNS.with_label_values(&["failed"]).inc();
                return Err(CollectionError::ListGenres(e));
            }
        };

        if genres.is_empty() {
            info!("No genres to collect");
            metrics::COLLECTION_RUNS.with_label_values(&["empty"]).inc();
            return Ok(CollectionReport {
                success: true,
                results: Vec::new(),
                timestamp: Utc::now(),
                message: Some(NO_GENRES_MESSAGE.to_string()),
            });
        }

        info!(
            genres = genres.len(),
            concurrency = self.max_concurrent_genres,
            "Starting trend collection"
        );

        // `buffered` keeps output in input order, so results line up with
        // the name-ordered genre list. Genres are moved in so the run future
        // stays `Send`.
        let results: Vec<CollectionResult> = stream::iter(genres)
            .map(|genre| async move { self.collect_genre(&genre).await })
            .buffered(self.max_concurrent_genres)
            .collect()
            .await;

        let elapsed = start.elapsed();
        metrics::COLLECTION_RUNS.with_label_values(&["completed"]).inc();
        metrics::COLLECTION_DURATION.observe(elapsed.as_secs_f64());

        let report = CollectionReport {
            success: true,
            results,
            timestamp: Utc::now(),
            message: None,
        };

        info!(
            succeeded = report.count(CollectionStatus::Success),
            no_data = report.count(CollectionStatus::NoData),
            db_errors = report.count(CollectionStatus::DbError),
            elapsed_ms = elapsed.as_millis() as u64,
            "Trend collection finished"
        );

        Ok(report)
    }

    async fn collect_genre(&self, genre: &Genre) -> CollectionResult {
        let raw = self.researcher.research_trends(&genre.name).await;
        let batch = prepare_batch(genre.id, raw, Utc::now());

        let result = if batch.is_empty() {
            info!(genre = %genre.name, "No trends returned");
            CollectionResult::no_data(&genre.name)
        } else {
            match self.store.upsert_trends(&batch) {
                Ok(_) => {
                    metrics::TRENDS_UPSERTED.inc_by(batch.len() as u64);
                    info!(genre = %genre.name, trends = batch.len(), "Stored trends");
                    CollectionResult::success(&genre.name, batch.len())
                }
                Err(e) => {
                    error!(
                        genre = %genre.name,
                        genre_id = genre.id,
                        trends = batch.len(),
                        error = %e,
                        "Failed to store trends"
                    );
                    CollectionResult::db_error(&genre.name)
                }
            }
        };

        metrics::GENRE_RESULTS
            .with_label_values(&[result.status.as_str()])
            .inc();
        result
    }
}

/// Stamp raw trends with the genre and collection time.
///
/// Repeated names keep their first occurrence, since one upsert batch may
/// not touch the same key twice. Names arrive already trimmed and non-blank
/// from [`trends_from_envelope`](crate::research::trends_from_envelope).
pub fn prepare_batch(genre_id: i64, raw: Vec<RawTrend>, now: DateTime<Utc>) -> Vec<NewTrend> {
    let mut seen = HashSet::new();
    let mut batch = Vec::with_capacity(raw.len());

    for trend in raw {
        if !seen.insert(trend.trend_name.clone()) {
            warn!(genre_id, trend_name = %trend.trend_name, "Dropping duplicate trend in batch");
            continue;
        }
        batch.push(NewTrend {
            genre_id,
            platform: trend.platform,
            trend_name: trend.trend_name,
            trend_description: trend.trend_description,
            is_growing: trend.is_growing,
            data_value: trend.data_value,
            last_updated: now,
        });
    }

    batch
}
