//! Health check handler.

use axum::Json;
use serde_json::{json, Value};

use crate::api::dto::ApiResponse;

/// `GET /health`
///
/// Liveness probe. Returns 200 whenever the process serves requests.
pub async fn health_handler() -> Json<ApiResponse<Value>> {
    Json(ApiResponse::ok("OK", json!({ "status": "healthy" })))
}
