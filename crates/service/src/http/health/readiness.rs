use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tokio::time::timeout;

use super::data_source::*;

const READINESS_TIMEOUT: Duration = Duration::from_secs(10);

fn unavailable(message: &str) -> Response {
    let body = serde_json::json!({ "status": "failure", "message": message });
    (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
}

/// Ready once the share table can be locked
#[tracing::instrument]
pub async fn handler(data_src: StateDataSource) -> Response {
    let outcome = match timeout(READINESS_TIMEOUT, data_src.is_ready()).await {
        Ok(outcome) => outcome,
        Err(_) => return unavailable("readiness check timed out"),
    };

    match outcome {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({ "status": "ok" }))).into_response(),
        Err(err) => {
            tracing::warn!("readiness check failed: {}", err);
            unavailable(match err {
                DataSourceError::DependencyFailure => "share store is not available",
                DataSourceError::ShuttingDown => "service is shutting down",
            })
        }
    }
}
