//! Mock LLM client for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::research::{CompletionRequest, CompletionResponse, LlmClient, LlmError, LlmUsage};

/// Mock implementation of the LlmClient trait.
///
/// Responses can be scripted globally or per prompt substring (e.g. a
/// genre name), a one-shot error can be queued, and the client can be told
/// to hang forever to exercise timeouts.
#[derive(Debug, Clone, Default)]
pub struct MockLlmClient {
    default_response: Arc<RwLock<Option<String>>>,
    responses_by_needle: Arc<RwLock<Vec<(String, String)>>>,
    next_error: Arc<RwLock<Option<LlmError>>>,
    hang: Arc<RwLock<bool>>,
    requests: Arc<RwLock<Vec<CompletionRequest>>>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text returned when no per-prompt response matches.
    pub async fn set_response(&self, text: &str) {
        *self.default_response.write().await = Some(text.to_string());
    }

    /// Text returned when the prompt contains `needle`.
    pub async fn set_response_for(&self, needle: &str, text: &str) {
        self.responses_by_needle
            .write()
            .await
            .push((needle.to_string(), text.to_string()));
    }

    /// Fail the next request with `error`.
    pub async fn set_next_error(&self, error: LlmError) {
        *self.next_error.write().await = Some(error);
    }

    /// Never answer (until the caller gives up).
    pub async fn set_hang(&self, hang: bool) {
        *self.hang.write().await = hang;
    }

    /// Requests received so far.
    pub async fn recorded_requests(&self) -> Vec<CompletionRequest> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    fn provider(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.write().await.push(request.clone());

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        if *self.hang.read().await {
            std::future::pending::<()>().await;
        }

        let matched = self
            .responses_by_needle
            .read()
            .await
            .iter()
            .find(|(needle, _)| request.prompt.contains(needle.as_str()))
            .map(|(_, text)| text.clone());

        let text = match matched {
            Some(text) => text,
            None => self
                .default_response
                .read()
                .await
                .clone()
                .ok_or(LlmError::EmptyResponse)?,
        };

        Ok(CompletionResponse {
            text,
            usage: LlmUsage::default(),
            model: "mock-model".to_string(),
        })
    }
}
