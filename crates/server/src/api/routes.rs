use axum::{middleware, routing::get, routing::post, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{collect, handlers, middleware::metrics_middleware, trends};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Collection trigger; other methods get a JSON 405
        .route(
            "/collect-trends",
            post(collect::collect_trends).fallback(collect::method_not_allowed),
        )
        // Dashboard reads
        .route("/genres", get(trends::list_genres))
        .route("/trends", get(trends::list_trends_by_genre))
        .route("/trends/{genre}", get(trends::list_trends_for_genre))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
