use std::fmt;
use std::str::FromStr;

use aes_gcm::{Aes256Gcm, Key};
use sha2::{Digest, Sha256};

use super::CryptoError;

/// Size of a share key in bytes (128 bits)
pub const KEY_SIZE: usize = 16;
/// Length of a hex encoded share key
pub const KEY_HEX_LEN: usize = KEY_SIZE * 2;

/// Check that `key` looks like a share key: exactly 32 hex characters, any case.
///
/// Used to fail fast on a mangled link before any network request is made.
pub fn is_valid_key_format(key: &str) -> bool {
    key.len() == KEY_HEX_LEN && key.bytes().all(|b| b.is_ascii_hexdigit())
}

/// A random 128-bit key generated per share
///
/// The key is only ever carried in the fragment of a share link. `Debug`
/// output is redacted so the key cannot end up in logs by accident.
///
/// # Examples
///
/// ```ignore
/// let key = ShareKey::generate();
/// let hex = key.to_hex();
/// assert_eq!(ShareKey::from_hex(&hex)?, key);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ShareKey([u8; KEY_SIZE]);

impl ShareKey {
    /// Generate a new random key using the operating system CSPRNG
    pub fn generate() -> Self {
        let mut buff = [0; KEY_SIZE];
        getrandom::getrandom(&mut buff).expect("failed to generate random bytes");
        Self(buff)
    }

    /// Parse a key from its hex form. Upper and lower case are both accepted.
    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        if !is_valid_key_format(hex) {
            return Err(CryptoError::InvalidKey {
                expected: KEY_HEX_LEN,
            });
        }
        let mut buff = [0; KEY_SIZE];
        hex::decode_to_slice(hex, &mut buff).map_err(|_| CryptoError::InvalidKey {
            expected: KEY_HEX_LEN,
        })?;
        Ok(Self(buff))
    }

    /// Lowercase hex form, as embedded in share links
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Derive the AES-256 key used for the payload cipher
    pub(crate) fn cipher_key(&self) -> Key<Aes256Gcm> {
        let digest = Sha256::digest(self.0);
        *Key::<Aes256Gcm>::from_slice(digest.as_slice())
    }
}

impl From<[u8; KEY_SIZE]> for ShareKey {
    fn from(bytes: [u8; KEY_SIZE]) -> Self {
        ShareKey(bytes)
    }
}

impl FromStr for ShareKey {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Debug for ShareKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ShareKey(<redacted>)")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_generate_produces_distinct_keys() {
        let a = ShareKey::generate();
        let b = ShareKey::generate();
        assert_ne!(a, b);
        assert_eq!(a.to_hex().len(), KEY_HEX_LEN);
    }

    #[test]
    fn test_key_format_validation() {
        assert!(is_valid_key_format("00112233445566778899aabbccddeeff"));
        assert!(is_valid_key_format("00112233445566778899AABBCCDDEEFF"));
        assert!(!is_valid_key_format("00112233445566778899aabbccddeef"));
        assert!(!is_valid_key_format("00112233445566778899aabbccddeeff0"));
        assert!(!is_valid_key_format("00112233445566778899aabbccddeefg"));
        assert!(!is_valid_key_format(""));
    }

    #[test]
    fn test_hex_round_trip_is_case_insensitive() {
        let lower = ShareKey::from_hex("00112233445566778899aabbccddeeff").unwrap();
        let upper = ShareKey::from_hex("00112233445566778899AABBCCDDEEFF").unwrap();
        assert_eq!(lower, upper);
        assert_eq!(upper.to_hex(), "00112233445566778899aabbccddeeff");
    }

    #[test]
    fn test_from_hex_rejects_bad_input() {
        assert!(matches!(
            ShareKey::from_hex("not-a-key"),
            Err(CryptoError::InvalidKey { .. })
        ));
    }

    #[test]
    fn test_debug_is_redacted() {
        let key = ShareKey::from_hex("00112233445566778899aabbccddeeff").unwrap();
        let rendered = format!("{:?}", key);
        assert!(!rendered.contains("0011"));
    }

    #[test]
    fn test_cipher_key_depends_on_every_byte() {
        let a = ShareKey::from_hex("00112233445566778899aabbccddeeff").unwrap();
        let b = ShareKey::from_hex("00112233445566778899aabbccddee00").unwrap();
        assert_ne!(a.cipher_key(), b.cipher_key());
    }
}
