use axum::{Router, extract::State, response::Json, routing::get};
use serde_json::json;

use crate::cache::CacheStats;
use crate::server::AppState;

/// Health check endpoint handler.
///
/// # Route
/// - **Method**: GET
/// - **Path**: `/ping`
///
/// # Examples
/// ```bash
/// curl http://localhost:3000/ping
/// # Response: {"status":"pong"}
/// ```
pub async fn ping() -> Json<serde_json::Value> {
    Json(json!({ "status": "pong" }))
}

/// Entry count and hit/miss counters of the shared cache
pub async fn cache_stats(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.stats())
}

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/ping", get(ping))
        .route("/api/v1/cache/stats", get(cache_stats))
}
