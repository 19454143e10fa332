use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;

pub async fn handler() -> Response {
    let msg = serde_json::json!({"status": "ok"});
    (StatusCode::OK, Json(msg)).into_response()
}
