//! Read endpoints backing the dashboard.
//!
//! Storage problems are absorbed by the query layer, so these always answer
//! 200 with possibly empty data.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use trendwatch_core::{Genre, Trend};

use crate::state::AppState;

/// GET /api/v1/genres
pub async fn list_genres(State(state): State<Arc<AppState>>) -> Json<Vec<Genre>> {
    Json(state.queries().list_genres())
}

/// GET /api/v1/trends
///
/// Trends grouped by genre name, newest first within each genre.
pub async fn list_trends_by_genre(
    State(state): State<Arc<AppState>>,
) -> Json<BTreeMap<String, Vec<Trend>>> {
    Json(state.queries().list_trends_by_genre())
}

/// GET /api/v1/trends/{genre}
pub async fn list_trends_for_genre(
    State(state): State<Arc<AppState>>,
    Path(genre): Path<String>,
) -> Json<Vec<Trend>> {
    Json(state.queries().list_trends_for_genre(&genre))
}
