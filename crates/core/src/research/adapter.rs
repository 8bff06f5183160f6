//! Trend research adapter: turns a genre name into a list of raw trends.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::{
    build_trend_prompt, extract_json_object, trends_from_envelope, CompletionRequest, LlmClient,
    LlmError, RawTrend, ResearchError, SYSTEM_PROMPT,
};
use crate::config::ResearchConfig;
use crate::metrics;

/// Source of trend data for a genre.
///
/// Implementations never fail: any problem is logged and reported as an
/// empty list, which the collector records as `no_data`.
#[async_trait]
pub trait TrendResearcher: Send + Sync {
    async fn research_trends(&self, genre: &str) -> Vec<RawTrend>;
}

/// Researcher backed by an LLM provider.
pub struct LlmTrendResearcher<C: LlmClient> {
    client: Arc<C>,
    platforms: Vec<String>,
    timeout: Duration,
    max_tokens: u32,
}

impl<C: LlmClient> LlmTrendResearcher<C> {
    pub fn new(client: Arc<C>, config: &ResearchConfig) -> Self {
        Self {
            client,
            platforms: config.platforms.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            max_tokens: config.max_tokens,
        }
    }

    /// Override the provider timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Provider call plus parsing, with errors kept typed for logging.
    async fn try_research(&self, genre: &str) -> Result<Vec<RawTrend>, ResearchError> {
        let request = CompletionRequest::new(build_trend_prompt(genre, &self.platforms))
            .with_system(SYSTEM_PROMPT)
            .with_max_tokens(self.max_tokens);

        // Dropping the future on timeout cancels the in-flight request.
        let response = tokio::time::timeout(self.timeout, self.client.complete(request))
            .await
            .map_err(|_| LlmError::Timeout(self.timeout))??;

        debug!(
            genre = %genre,
            model = %response.model,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Research response received"
        );

        let envelope = extract_json_object(&response.text)?;
        Ok(trends_from_envelope(&envelope))
    }
}

#[async_trait]
impl<C: LlmClient> TrendResearcher for LlmTrendResearcher<C> {
    async fn research_trends(&self, genre: &str) -> Vec<RawTrend> {
        let start = Instant::now();
        let result = self.try_research(genre).await;
        let elapsed = start.elapsed();

        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        };
        metrics::RESEARCH_REQUESTS
            .with_label_values(&[self.client.provider(), outcome])
            .inc();
        metrics::RESEARCH_DURATION
            .with_label_values(&[outcome])
            .observe(elapsed.as_secs_f64());

        match result {
            Ok(trends) => {
                info!(
                    genre = %genre,
                    trends = trends.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Researched trends"
                );
                trends
            }
            Err(e) => {
                warn!(
                    genre = %genre,
                    kind = e.kind(),
                    error = %e,
                    "Trend research failed, treating as no data"
                );
                Vec::new()
            }
        }
    }
}
