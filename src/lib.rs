pub mod analyzer;
pub mod config;
pub mod error;
pub mod export;
pub mod fetch;
pub mod handlers;
pub mod models;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};

use state::AppState;

/// API routes shared by the binary and the integration tests.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/debug", get(handlers::debug))
        .route("/api/analyze", post(handlers::analyze::analyze_url))
        .route("/api/export", post(handlers::analyze::export_report))
        .with_state(state)
}
