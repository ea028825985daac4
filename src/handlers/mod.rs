pub mod analyze;

use axum::{http::StatusCode, Json};
use serde_json::{json, Value};

pub async fn health_check() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "seo-meta-analyzer",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}

/// GET /api/debug
pub async fn debug() -> Json<Value> {
    Json(json!({
        "message": "API is working correctly",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
