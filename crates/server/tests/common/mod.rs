//! Common test utilities for API testing with mocks.
//!
//! This module provides a test fixture that builds the in-process router
//! with mock storage and research injected, so routes can be exercised
//! without a provider or a database file.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use trendwatch_core::{
    testing::{MockResearcher, MockTrendStore},
    Config, TrendCollector, TrendResearcher, TrendStore,
};
use trendwatch_server::state::AppState;

/// Re-export fixtures for test convenience
pub use trendwatch_core::testing::fixtures;

/// Test fixture with controllable mocks for:
/// - Storage (MockTrendStore)
/// - Trend research (MockResearcher)
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_collect() {
///     let fixture = TestFixture::new();
///     fixture.store.add_genre("Jazz");
///
///     let response = fixture.post("/api/v1/collect-trends").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock store - seed genres, inject failures
    pub store: Arc<MockTrendStore>,
    /// Mock researcher - script trends per genre
    pub researcher: Arc<MockResearcher>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    pub fn new() -> Self {
        let store = Arc::new(MockTrendStore::new());
        let researcher = Arc::new(MockResearcher::new());

        let collector = Arc::new(TrendCollector::new(
            Arc::clone(&store) as Arc<dyn TrendStore>,
            Arc::clone(&researcher) as Arc<dyn TrendResearcher>,
        ));

        let state = Arc::new(AppState::new(
            Config::default(),
            Arc::clone(&store) as Arc<dyn TrendStore>,
            collector,
        ));

        let router = trendwatch_server::api::create_router(state);

        Self {
            router,
            store,
            researcher,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path).await
    }

    /// Send a POST request with an empty body.
    pub async fn post(&self, path: &str) -> TestResponse {
        self.request("POST", path).await
    }

    /// Send a request with an arbitrary method and empty body.
    pub async fn request(&self, method: &str, path: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}
