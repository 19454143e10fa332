//! Share links
//!
//! A share link has the shape `https://<host>/share/{id}#{key}`. The key sits
//! in the fragment so it is never part of any HTTP request.

use url::Url;

use crate::crypto::{is_valid_key_format, ShareKey};
use crate::share_id::ShareId;

const SHARE_SEGMENT: &str = "share";

#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("invalid link: {0}")]
    Url(#[from] url::ParseError),
    #[error("base URL cannot carry a path")]
    CannotBeABase,
    #[error("link does not point at /share/{{id}}")]
    MissingPath,
    #[error("link has no key fragment")]
    MissingKey,
    #[error("link carries a malformed share id")]
    InvalidId,
    #[error("link carries a malformed key")]
    InvalidKey,
}

/// A parsed share link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLink {
    /// Application root the link points into (scheme, host, path prefix)
    pub base: Url,
    pub id: ShareId,
    pub key: ShareKey,
}

impl ShareLink {
    pub fn new(base: Url, id: ShareId, key: ShareKey) -> Self {
        Self { base, id, key }
    }

    /// Parse and validate a link without touching the network
    pub fn parse(link: &str) -> Result<Self, LinkError> {
        let url = Url::parse(link.trim())?;

        let fragment = url.fragment().filter(|f| !f.is_empty());
        let fragment = fragment.ok_or(LinkError::MissingKey)?;
        if !is_valid_key_format(fragment) {
            return Err(LinkError::InvalidKey);
        }
        let key = ShareKey::from_hex(fragment).map_err(|_| LinkError::InvalidKey)?;

        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|p| !p.is_empty()).collect())
            .unwrap_or_default();
        let (prefix, id) = match segments.as_slice() {
            [prefix @ .., SHARE_SEGMENT, id] => (prefix.to_vec(), *id),
            _ => return Err(LinkError::MissingPath),
        };
        let id = id.parse::<ShareId>().map_err(|_| LinkError::InvalidId)?;

        let mut base = url.clone();
        base.set_fragment(None);
        base.set_query(None);
        {
            let mut path = base
                .path_segments_mut()
                .map_err(|_| LinkError::CannotBeABase)?;
            path.clear();
            path.extend(prefix);
            // trailing slash, so relative joins stay under the prefix
            path.push("");
        }

        Ok(Self { base, id, key })
    }

    /// Render the link as `{base}/share/{id}#{key}`
    pub fn to_url(&self) -> Result<Url, LinkError> {
        let mut url = self.base.clone();
        url.set_query(None);
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| LinkError::CannotBeABase)?;
            path.pop_if_empty();
            path.push(SHARE_SEGMENT);
            path.push(&self.id.to_hex());
        }
        url.set_fragment(Some(&self.key.to_hex()));
        Ok(url)
    }
}
