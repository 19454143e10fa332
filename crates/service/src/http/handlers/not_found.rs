use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;

fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}

/// Fallback for any route the router does not know
pub async fn not_found_handler(method: Method, uri: Uri, headers: HeaderMap) -> Response {
    tracing::debug!(%method, path = %uri.path(), "no route");

    if wants_json(&headers) {
        let body = serde_json::json!({ "msg": "not found", "path": uri.path() });
        return (StatusCode::NOT_FOUND, Json(body)).into_response();
    }
    (StatusCode::NOT_FOUND, [(CONTENT_TYPE, "text/plain")], "not found").into_response()
}
