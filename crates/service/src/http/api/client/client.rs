use reqwest::{header::HeaderMap, header::HeaderValue, Client, StatusCode};
use url::Url;

use super::error::ApiError;
use super::ApiRequest;
use crate::http::health::summary::{HealthRequest, HealthResponse};

#[derive(Debug, Clone)]
pub struct ApiClient {
    pub remote: Url,
    client: Client,
}

impl ApiClient {
    pub fn new(remote: &Url) -> Result<Self, ApiError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        default_headers.insert("Accept", HeaderValue::from_static("application/json"));
        let client = Client::builder().default_headers(default_headers).build()?;

        // relative joins drop the last path segment unless it ends in '/'
        let mut remote = remote.clone();
        if !remote.path().ends_with('/') {
            let path = format!("{}/", remote.path());
            remote.set_path(&path);
        }

        Ok(Self { remote, client })
    }

    pub async fn call<T: ApiRequest>(&self, request: T) -> Result<T::Response, ApiError> {
        let request_builder = request.build_request(&self.remote, &self.client)?;
        let response = request_builder.send().await?;

        let status = response.status();
        if status.is_success() {
            Ok(response.json::<T::Response>().await?)
        } else if status == StatusCode::NOT_FOUND {
            Err(ApiError::NotFound(response.text().await?))
        } else {
            Err(ApiError::HttpStatus(status, response.text().await?))
        }
    }

    /// Fetch the service health summary
    pub async fn health(&self) -> Result<HealthResponse, ApiError> {
        self.call(HealthRequest).await
    }

    /// Get the base URL for API requests
    pub fn base_url(&self) -> &Url {
        &self.remote
    }

    /// Get the underlying HTTP client for custom requests
    pub fn http_client(&self) -> &Client {
        &self.client
    }
}
