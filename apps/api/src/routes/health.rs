use axum::Json;
use serde_json::{json, Value};

/// GET /
/// Returns a welcome document pointing at the health endpoints.
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "message": "Welcome to Tweet Generator API",
        "version": env!("CARGO_PKG_VERSION"),
        "health": "/api/tweets/health"
    }))
}

/// GET /api/health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "Tweet Generator API",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
