//! Collection trigger endpoint.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use tracing::{error, info};
use trendwatch_core::CollectionReport;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// POST /api/v1/collect-trends
///
/// Runs a full collection and reports per-genre outcomes. Individual genre
/// failures still produce a 200; only a failure to list genres is a 500.
pub async fn collect_trends(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CollectionReport>, (StatusCode, Json<ErrorResponse>)> {
    info!("Collection triggered over HTTP");

    match state.collector().run_collection().await {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            error!(error = %e, "Collection failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to collect trends".to_string(),
                    details: Some(e.to_string()),
                }),
            ))
        }
    }
}

/// Any method other than POST on the trigger endpoint. No work is done.
pub async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse {
            error: "Method not allowed".to_string(),
            details: None,
        }),
    )
}
