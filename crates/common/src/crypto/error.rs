/// Errors that can occur while sealing or opening a share payload
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("invalid share key: expected {expected} hex characters")]
    InvalidKey { expected: usize },
    #[error("encrypted data is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("encrypted data too short: got {got} bytes, need at least {min}")]
    TooShort { got: usize, min: usize },
    /// The authentication tag did not verify: the key is wrong or the blob was altered.
    #[error("wrong or corrupted key")]
    Authentication,
    #[error("encryption failed")]
    Encryption,
    #[error("payload serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("failed to draw random bytes: {0}")]
    Rng(getrandom::Error),
}

impl CryptoError {
    /// True when decryption failed because the tag did not verify.
    pub fn is_authentication(&self) -> bool {
        matches!(self, CryptoError::Authentication)
    }
}
