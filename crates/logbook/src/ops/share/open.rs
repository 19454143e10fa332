use clap::Args;

use common::crypto::CryptoError;
use common::link::{LinkError, ShareLink};
use common::share::ShareableData;
use service::http::api::client::{ApiClient, ApiError};
use service::http::api::shares::{GetShareRequest, GetShareResponse};

/// Fetch and decrypt a share link, printing the logbook data as JSON
#[derive(Args, Debug, Clone)]
pub struct Open {
    /// Full share link, including the `#key` fragment
    pub link: String,
}

#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    #[error("{0}")]
    Link(#[from] LinkError),
    #[error("link invalid or expired")]
    Expired,
    #[error("wrong or corrupted key")]
    WrongKey(#[source] CryptoError),
    #[error("share data is malformed: {0}")]
    Malformed(#[source] CryptoError),
    #[error("share decrypted but is not logbook data: {0}")]
    Payload(#[source] CryptoError),
    #[error("API error: {0}")]
    Api(ApiError),
    #[error("failed to render share: {0}")]
    Render(#[from] serde_json::Error),
}

impl From<ApiError> for OpenError {
    fn from(err: ApiError) -> Self {
        if err.is_not_found() {
            OpenError::Expired
        } else {
            OpenError::Api(err)
        }
    }
}

impl From<CryptoError> for OpenError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::Authentication => OpenError::WrongKey(err),
            CryptoError::Serialization(_) => OpenError::Payload(err),
            _ => OpenError::Malformed(err),
        }
    }
}

#[async_trait::async_trait]
impl crate::op::Op for Open {
    type Error = OpenError;
    type Output = String;

    async fn execute(&self, _ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let link = ShareLink::parse(&self.link)?;

        // the link names its own service; --remote does not apply here
        let client = ApiClient::new(&link.base)?;
        let response: GetShareResponse = client.call(GetShareRequest { id: link.id }).await?;

        let data = ShareableData::decrypt(&response.encrypted_data, &link.key)?;
        Ok(serde_json::to_string_pretty(&data)?)
    }
}
