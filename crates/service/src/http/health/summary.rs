use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use http::StatusCode;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::build_info;

use crate::http::api::client::ApiRequest;
use crate::ServiceState;

/// Process status and current record count
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    /// Records held, including expired ones not yet swept
    pub shares: usize,
    pub version: String,
    pub started_at: DateTime<Utc>,
}

pub async fn handler(State(state): State<ServiceState>) -> Response {
    let body = HealthResponse {
        status: "ok".to_string(),
        shares: state.store().len(),
        version: build_info().version.to_string(),
        started_at: state.started_at(),
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// Client side of `GET /health`
#[derive(Debug, Clone, Default)]
pub struct HealthRequest;

impl ApiRequest for HealthRequest {
    type Response = HealthResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, url::ParseError> {
        let full_url = base_url.join("health")?;
        Ok(client.get(full_url))
    }
}
