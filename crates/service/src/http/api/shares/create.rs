use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::share_id::ShareId;

use crate::http::api::client::ApiRequest;
use crate::store::StoreError;
use crate::ServiceState;

/// Body of `POST /api/shares`
///
/// `encrypted_data` is optional at the serde level so that a missing field
/// is reported as our own 400 rather than a generic rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShareRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_data: Option<String>,
    /// Lifetime in seconds; the server default applies when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
}

impl CreateShareRequest {
    pub fn new(encrypted_data: impl Into<String>, expires_in: Option<i64>) -> Self {
        Self {
            encrypted_data: Some(encrypted_data.into()),
            expires_in,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShareResponse {
    pub id: ShareId,
    pub expires_at: DateTime<Utc>,
}

pub async fn handler(
    State(state): State<ServiceState>,
    payload: Result<Json<CreateShareRequest>, JsonRejection>,
) -> Result<impl IntoResponse, CreateShareError> {
    let Json(req) = payload?;

    let encrypted_data = req
        .encrypted_data
        .ok_or(CreateShareError::MissingData)?;
    let size = encrypted_data.len();

    let created = state.store().create(encrypted_data, req.expires_in)?;
    tracing::info!(
        id = %created.id,
        bytes = size,
        expires_at = %created.expires_at,
        "share created"
    );

    Ok((
        http::StatusCode::CREATED,
        Json(CreateShareResponse {
            id: created.id,
            expires_at: created.expires_at,
        }),
    )
        .into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum CreateShareError {
    #[error("invalid request body: {0}")]
    Body(#[from] JsonRejection),
    #[error("encryptedData is required")]
    MissingData,
    #[error("{0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for CreateShareError {
    fn into_response(self) -> Response {
        let status = match &self {
            CreateShareError::Body(rejection)
                if rejection.status() == http::StatusCode::PAYLOAD_TOO_LARGE =>
            {
                http::StatusCode::PAYLOAD_TOO_LARGE
            }
            CreateShareError::Body(_) | CreateShareError::MissingData => {
                http::StatusCode::BAD_REQUEST
            }
            CreateShareError::Store(StoreError::IdExhausted) => {
                http::StatusCode::INTERNAL_SERVER_ERROR
            }
            CreateShareError::Store(_) => http::StatusCode::BAD_REQUEST,
        };
        if status.is_server_error() {
            tracing::error!("CREATE SHARE ERROR: {}", self);
        } else {
            tracing::warn!("CREATE SHARE rejected: {}", self);
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

// Client implementation - builds request for this operation
impl ApiRequest for CreateShareRequest {
    type Response = CreateShareResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, url::ParseError> {
        let full_url = base_url.join("api/shares")?;
        Ok(client.post(full_url).json(&self))
    }
}
