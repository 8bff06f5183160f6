use std::sync::Arc;
use trendwatch_core::{Config, SanitizedConfig, TrendCollector, TrendQueries, TrendStore};

/// Shared application state
pub struct AppState {
    config: Config,
    collector: Arc<TrendCollector>,
    queries: TrendQueries,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn TrendStore>, collector: Arc<TrendCollector>) -> Self {
        Self {
            config,
            collector,
            queries: TrendQueries::new(store),
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn collector(&self) -> &TrendCollector {
        &self.collector
    }

    pub fn queries(&self) -> &TrendQueries {
        &self.queries
    }
}
