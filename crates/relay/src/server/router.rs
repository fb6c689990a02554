//! Axum router construction.

use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};

use super::{handlers, middleware, state::AppState};

/// Path of the ingestion endpoint.
pub const UPDATES_PATH: &str = "/api/updates";

/// Build the application [`Router`] with all routes and middleware attached.
pub fn build(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route(UPDATES_PATH, post(handlers::ingest_update))
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .layer(middleware::body_limit())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CompressionLayer::new())
        .with_state(state)
}
