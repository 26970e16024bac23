//! Health check endpoint.

use axum::{response::IntoResponse, Json};
use serde_json::json;

/// `GET /health`. Liveness only; no upstream is touched.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "caption-relay",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
