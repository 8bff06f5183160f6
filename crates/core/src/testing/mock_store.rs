//! In-memory trend store for testing.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};

use crate::store::{Genre, NewTrend, StoreError, Trend, TrendStore, TrendWithGenre};

#[derive(Debug, Default)]
struct State {
    genres: Vec<Genre>,
    trends: Vec<Trend>,
    next_genre_id: i64,
    next_trend_id: i64,
}

/// Mock implementation of the TrendStore trait.
///
/// Behaves like the SQLite store (ordering, upsert key, atomic batches) and
/// adds failure injection:
/// - a one-shot error for the next `list_genres`
/// - upsert failures for specific genre ids
/// - failures for every read
#[derive(Debug, Default)]
pub struct MockTrendStore {
    state: RwLock<State>,
    next_list_error: Mutex<Option<StoreError>>,
    failing_upsert_genres: RwLock<HashSet<i64>>,
    fail_reads: AtomicBool,
    upsert_calls: AtomicUsize,
}

impl MockTrendStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a genre directly and return it.
    pub fn add_genre(&self, name: &str) -> Genre {
        self.ensure_genre(name)
            .unwrap_or_else(|e| panic!("mock store failed to add genre: {e}"))
    }

    /// Make the next `list_genres` call fail with `error`.
    pub fn fail_list_genres(&self, error: StoreError) {
        *self.next_list_error.lock().unwrap() = Some(error);
    }

    /// Make every upsert touching `genre_id` fail.
    pub fn fail_upsert_for_genre(&self, genre_id: i64) {
        self.failing_upsert_genres.write().unwrap().insert(genre_id);
    }

    /// Make all read operations fail until reset.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Number of stored trend rows.
    pub fn trend_count(&self) -> usize {
        self.state.read().unwrap().trends.len()
    }

    /// Number of `upsert_trends` calls, including failed ones.
    pub fn upsert_calls(&self) -> usize {
        self.upsert_calls.load(Ordering::SeqCst)
    }

    fn check_reads(&self) -> Result<(), StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Database("simulated read failure".to_string()));
        }
        Ok(())
    }

    fn newest_first(trends: &mut [Trend]) {
        trends.sort_by(|a, b| {
            b.last_updated
                .cmp(&a.last_updated)
                .then_with(|| b.id.cmp(&a.id))
        });
    }
}

impl TrendStore for MockTrendStore {
    fn list_genres(&self) -> Result<Vec<Genre>, StoreError> {
        if let Some(error) = self.next_list_error.lock().unwrap().take() {
            return Err(error);
        }
        self.check_reads()?;

        let mut genres = self.state.read().unwrap().genres.clone();
        genres.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(genres)
    }

    fn get_genre_by_name(&self, name: &str) -> Result<Genre, StoreError> {
        self.check_reads()?;
        self.state
            .read()
            .unwrap()
            .genres
            .iter()
            .find(|g| g.name == name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    fn ensure_genre(&self, name: &str) -> Result<Genre, StoreError> {
        let mut state = self.state.write().unwrap();
        if let Some(existing) = state.genres.iter().find(|g| g.name == name) {
            return Ok(existing.clone());
        }
        state.next_genre_id += 1;
        let genre = Genre {
            id: state.next_genre_id,
            name: name.to_string(),
        };
        state.genres.push(genre.clone());
        Ok(genre)
    }

    fn upsert_trends(&self, trends: &[NewTrend]) -> Result<usize, StoreError> {
        self.upsert_calls.fetch_add(1, Ordering::SeqCst);

        {
            let failing = self.failing_upsert_genres.read().unwrap();
            if let Some(t) = trends.iter().find(|t| failing.contains(&t.genre_id)) {
                return Err(StoreError::Database(format!(
                    "simulated upsert failure for genre {}",
                    t.genre_id
                )));
            }
        }

        let mut state = self.state.write().unwrap();
        if let Some(t) = trends
            .iter()
            .find(|t| !state.genres.iter().any(|g| g.id == t.genre_id))
        {
            return Err(StoreError::Database(format!(
                "FOREIGN KEY constraint failed: genre {}",
                t.genre_id
            )));
        }

        for new in trends {
            let position = state
                .trends
                .iter()
                .position(|t| t.genre_id == new.genre_id && t.trend_name == new.trend_name);

            if let Some(idx) = position {
                let existing = &mut state.trends[idx];
                existing.platform = new.platform.clone();
                existing.trend_description = new.trend_description.clone();
                existing.is_growing = new.is_growing;
                existing.data_value = new.data_value;
                existing.last_updated = new.last_updated;
            } else {
                state.next_trend_id += 1;
                let id = state.next_trend_id;
                state.trends.push(Trend {
                    id,
                    genre_id: new.genre_id,
                    platform: new.platform.clone(),
                    trend_name: new.trend_name.clone(),
                    trend_description: new.trend_description.clone(),
                    is_growing: new.is_growing,
                    data_value: new.data_value,
                    last_updated: new.last_updated,
                });
            }
        }

        Ok(trends.len())
    }

    fn list_trends_with_genre(&self) -> Result<Vec<TrendWithGenre>, StoreError> {
        self.check_reads()?;
        let state = self.state.read().unwrap();

        let mut trends = state.trends.clone();
        Self::newest_first(&mut trends);

        Ok(trends
            .into_iter()
            .filter_map(|trend| {
                state
                    .genres
                    .iter()
                    .find(|g| g.id == trend.genre_id)
                    .map(|g| TrendWithGenre {
                        genre_name: g.name.clone(),
                        trend,
                    })
            })
            .collect())
    }

    fn list_trends_for_genre(&self, genre_id: i64) -> Result<Vec<Trend>, StoreError> {
        self.check_reads()?;
        let mut trends: Vec<Trend> = self
            .state
            .read()
            .unwrap()
            .trends
            .iter()
            .filter(|t| t.genre_id == genre_id)
            .cloned()
            .collect();
        Self::newest_first(&mut trends);
        Ok(trends)
    }
}
