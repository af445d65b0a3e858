use axum::{response::IntoResponse, Json};

/// GET /api/message — liveness probe for the front-end.
pub async fn handler() -> impl IntoResponse {
    Json(serde_json::json!({"msg": "Hello from the backend!"}))
}
