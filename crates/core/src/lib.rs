pub mod collector;
pub mod config;
pub mod metrics;
pub mod query;
pub mod research;
pub mod store;
pub mod testing;

pub use collector::{
    CollectionError, CollectionReport, CollectionResult, CollectionScheduler, CollectionStatus,
    TrendCollector,
};
pub use config::{
    load_config, load_config_from_str, validate_config, CollectionConfig, Config, ConfigError,
    DatabaseConfig, ResearchConfig, SanitizedConfig, ServerConfig,
};
pub use query::TrendQueries;
pub use research::{
    AnthropicClient, LlmClient, LlmError, LlmTrendResearcher, RawTrend, TrendResearcher,
};
pub use store::{Genre, NewTrend, SqliteTrendStore, StoreError, Trend, TrendStore};
