use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::share_id::ShareId;

use crate::http::api::client::ApiRequest;
use crate::store::StoreError;
use crate::ServiceState;

/// Client side of `GET /api/shares/{id}`
#[derive(Debug, Clone)]
pub struct GetShareRequest {
    pub id: ShareId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetShareResponse {
    pub encrypted_data: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, GetShareError> {
    let encrypted_data = state.store().lookup(&id)?;
    tracing::debug!(%id, bytes = encrypted_data.len(), "share served");

    Ok((
        http::StatusCode::OK,
        Json(GetShareResponse { encrypted_data }),
    )
        .into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum GetShareError {
    #[error("{0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for GetShareError {
    fn into_response(self) -> Response {
        // unknown and expired ids look the same to the caller
        let status = match &self {
            GetShareError::Store(StoreError::InvalidId) => http::StatusCode::BAD_REQUEST,
            GetShareError::Store(StoreError::NotFound) => http::StatusCode::NOT_FOUND,
            GetShareError::Store(_) => http::StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

impl ApiRequest for GetShareRequest {
    type Response = GetShareResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, url::ParseError> {
        let full_url = base_url.join(&format!("api/shares/{}", self.id))?;
        Ok(client.get(full_url))
    }
}
