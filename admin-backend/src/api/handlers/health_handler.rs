// admin-backend/src/api/handlers/health_handler.rs

use crate::types::ApiResponse;
use axum::{response::IntoResponse, routing::get, Router};
use serde_json::json;

pub async fn health_handler() -> impl IntoResponse {
    ApiResponse::success(json!({ "status": "ok" }))
}

pub fn health_router() -> Router {
    Router::new().route("/health", get(health_handler))
}
