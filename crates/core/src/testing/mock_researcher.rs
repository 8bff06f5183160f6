//! Mock trend researcher for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::research::{RawTrend, TrendResearcher};

/// Mock implementation of the TrendResearcher trait.
///
/// Returns scripted trends per genre (empty for unscripted genres), can
/// delay individual genres, and records which genres were researched.
///
/// # Example
///
/// ```rust,ignore
/// use trendwatch_core::testing::{fixtures, MockResearcher};
///
/// let researcher = MockResearcher::new();
/// researcher.set_trends("Jazz", vec![fixtures::raw_trend("Spotify", "Lo-fi revival")]).await;
///
/// let trends = researcher.research_trends("Jazz").await;
/// assert_eq!(trends.len(), 1);
/// assert_eq!(researcher.recorded_calls().await, vec!["Jazz"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockResearcher {
    trends: Arc<RwLock<HashMap<String, Vec<RawTrend>>>>,
    delays: Arc<RwLock<HashMap<String, Duration>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockResearcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the trends returned for `genre`.
    pub async fn set_trends(&self, genre: &str, trends: Vec<RawTrend>) {
        self.trends.write().await.insert(genre.to_string(), trends);
    }

    /// Delay the response for `genre`.
    pub async fn set_delay(&self, genre: &str, delay: Duration) {
        self.delays.write().await.insert(genre.to_string(), delay);
    }

    /// Genres researched so far, in call order.
    pub async fn recorded_calls(&self) -> Vec<String> {
        self.calls.read().await.clone()
    }
}

#[async_trait]
impl TrendResearcher for MockResearcher {
    async fn research_trends(&self, genre: &str) -> Vec<RawTrend> {
        self.calls.write().await.push(genre.to_string());

        let delay = self.delays.read().await.get(genre).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.trends
            .read()
            .await
            .get(genre)
            .cloned()
            .unwrap_or_default()
    }
}
