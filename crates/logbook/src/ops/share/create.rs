use std::path::{Path, PathBuf};

use clap::Args;
use url::Url;

use common::crypto::{CryptoError, ShareKey};
use common::link::{LinkError, ShareLink};
use common::share::ShareableData;
use service::http::api::client::ApiError;
use service::http::api::shares::{CreateShareRequest, CreateShareResponse};

/// Encrypt a logbook export and upload it as a new share
#[derive(Args, Debug, Clone)]
pub struct Create {
    /// JSON file holding the airfields and flights to share
    #[arg(long)]
    pub file: PathBuf,

    /// Lifetime of the share in seconds (server default when omitted)
    #[arg(long)]
    pub expires_in: Option<i64>,

    /// Public base URL the link should point at (defaults to --remote)
    #[arg(long)]
    pub public_url: Option<Url>,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("not a logbook export: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("nothing to share: the export has no airfields or flights")]
    Empty,
    #[error("encryption failed: {0}")]
    Crypto(#[from] CryptoError),
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("could not build link: {0}")]
    Link(#[from] LinkError),
}

/// Read an export and bring its metadata counts in line with its contents
fn load_payload(path: &Path) -> Result<ShareableData, CreateError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CreateError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut data: ShareableData = serde_json::from_str(&raw)?;
    if data.is_empty() {
        return Err(CreateError::Empty);
    }
    data.refresh_counts();
    Ok(data)
}

#[async_trait::async_trait]
impl crate::op::Op for Create {
    type Error = CreateError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let data = load_payload(&self.file)?;

        let key = ShareKey::generate();
        let encrypted_data = data.encrypt(&key)?;
        tracing::debug!(bytes = encrypted_data.len(), "payload sealed");

        let response: CreateShareResponse = ctx
            .client
            .call(CreateShareRequest::new(encrypted_data, self.expires_in))
            .await?;

        let base = self
            .public_url
            .clone()
            .unwrap_or_else(|| ctx.client.base_url().clone());
        let link = ShareLink::new(base, response.id, key).to_url()?;

        Ok(format!(
            "{}\n{} airfield(s), {} flight(s), expires {}",
            link, data.metadata.airfield_count, data.metadata.flight_count, response.expires_at
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_payload_refreshes_counts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        std::fs::write(
            &path,
            r#"{
                "version": 1,
                "airfields": [
                    {"id": "a1", "name": "Oshkosh", "latitude": 43.98, "longitude": -88.55, "visited": true}
                ],
                "metadata": {"createdAt": "2024-05-01T12:00:00Z", "airfieldCount": 0, "flightCount": 7}
            }"#,
        )
        .unwrap();

        let data = load_payload(&path).unwrap();
        assert_eq!(data.metadata.airfield_count, 1);
        assert_eq!(data.metadata.flight_count, 0);
    }

    #[test]
    fn test_load_payload_refuses_empty_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        std::fs::write(
            &path,
            r#"{"version": 1, "metadata": {"createdAt": "2024-05-01T12:00:00Z", "airfieldCount": 0, "flightCount": 0}}"#,
        )
        .unwrap();

        assert!(matches!(load_payload(&path), Err(CreateError::Empty)));
    }

    #[test]
    fn test_load_payload_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_payload(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, CreateError::Read { .. }));
    }
}
