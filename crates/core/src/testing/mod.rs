//! Testing utilities and mock implementations.
//!
//! Mocks for the storage, researcher and LLM seams let the collector, query
//! layer and HTTP routes be exercised without a provider or a database file.
//!
//! # Example
//!
//! ```rust,ignore
//! use trendwatch_core::testing::{fixtures, MockResearcher, MockTrendStore};
//!
//! let store = MockTrendStore::new();
//! store.add_genre("Jazz");
//!
//! let researcher = MockResearcher::new();
//! researcher.set_trends("Jazz", vec![fixtures::raw_trend("Spotify", "Lo-fi revival")]).await;
//! ```

mod mock_llm;
mod mock_researcher;
mod mock_store;

pub use mock_llm::MockLlmClient;
pub use mock_researcher::MockResearcher;
pub use mock_store::MockTrendStore;

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::{DateTime, Utc};
    use serde_json::json;

    use crate::research::RawTrend;
    use crate::store::NewTrend;

    /// A growing trend with a typical value.
    pub fn raw_trend(platform: &str, name: &str) -> RawTrend {
        RawTrend {
            platform: platform.to_string(),
            trend_name: name.to_string(),
            trend_description: format!("{} is picking up on {}", name, platform),
            is_growing: true,
            data_value: 8500.0,
        }
    }

    /// A declining trend.
    pub fn declining_trend(platform: &str, name: &str) -> RawTrend {
        RawTrend {
            is_growing: false,
            data_value: 1200.0,
            ..raw_trend(platform, name)
        }
    }

    /// A storable trend for `genre_id` stamped at `at`.
    pub fn new_trend(genre_id: i64, name: &str, at: DateTime<Utc>) -> NewTrend {
        NewTrend {
            genre_id,
            platform: "Spotify".to_string(),
            trend_name: name.to_string(),
            trend_description: format!("{} description", name),
            is_growing: true,
            data_value: 8500.0,
            last_updated: at,
        }
    }

    /// Provider reply text wrapping the given trends in prose, the way
    /// models tend to answer.
    pub fn provider_reply(trends: &[RawTrend]) -> String {
        let entries: Vec<_> = trends
            .iter()
            .map(|t| {
                json!({
                    "platform": t.platform,
                    "trend_name": t.trend_name,
                    "trend_description": t.trend_description,
                    "is_growing": t.is_growing,
                    "data_value": t.data_value,
                })
            })
            .collect();

        format!(
            "Here is the current trend data:\n\n{}\n\nLet me know if you need more detail.",
            json!({ "trends": entries })
        )
    }
}
