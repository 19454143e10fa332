use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{CryptoError, ShareKey};

/// Size of the AES-GCM nonce in bytes
pub const NONCE_SIZE: usize = 12;
/// Size of the AES-GCM authentication tag in bytes
pub const TAG_SIZE: usize = 16;

/// Encrypt raw bytes into a transportable blob
///
/// A fresh random nonce is drawn for every call, so sealing the same bytes
/// twice never produces the same blob.
pub fn seal(plaintext: &[u8], key: &ShareKey) -> Result<String, CryptoError> {
    let cipher = Aes256Gcm::new(&key.cipher_key());

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    getrandom::getrandom(&mut nonce_bytes).map_err(CryptoError::Rng)?;
    let nonce = Nonce::from_slice(&nonce_bytes);

    // Only fails for plaintexts beyond the GCM length limit (~64 GiB).
    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|_| CryptoError::Encryption)?;

    let mut out = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    out.extend_from_slice(nonce.as_ref());
    out.extend_from_slice(&ciphertext);

    Ok(STANDARD.encode(out))
}

/// Decrypt a blob produced by [`seal`]
///
/// # Errors
///
/// - [`CryptoError::Encoding`] if the blob is not base64
/// - [`CryptoError::TooShort`] if it cannot hold a nonce and tag
/// - [`CryptoError::Authentication`] if the tag does not verify
pub fn open(blob: &str, key: &ShareKey) -> Result<Vec<u8>, CryptoError> {
    let data = STANDARD.decode(blob.trim())?;

    let min = NONCE_SIZE + TAG_SIZE;
    if data.len() < min {
        return Err(CryptoError::TooShort {
            got: data.len(),
            min,
        });
    }

    let (nonce, ciphertext) = data.split_at(NONCE_SIZE);
    let cipher = Aes256Gcm::new(&key.cipher_key());
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::Authentication)
}

/// Serialize `payload` as JSON and seal it
pub fn encrypt<T>(payload: &T, key: &ShareKey) -> Result<String, CryptoError>
where
    T: Serialize + ?Sized,
{
    let json = serde_json::to_vec(payload)?;
    seal(&json, key)
}

/// Open a blob and deserialize its JSON payload
///
/// A wrong key is reported as [`CryptoError::Authentication`] and never as a
/// parse failure: the tag is verified before any JSON is read.
pub fn decrypt<T>(blob: &str, key: &ShareKey) -> Result<T, CryptoError>
where
    T: DeserializeOwned,
{
    let plaintext = open(blob, key)?;
    Ok(serde_json::from_slice(&plaintext)?)
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::{json, Value};

    fn fixed_key() -> ShareKey {
        ShareKey::from_hex("00112233445566778899aabbccddeeff").unwrap()
    }

    #[test]
    fn test_encrypt_decrypt_round_trip() {
        let key = ShareKey::generate();
        let payload = json!({
            "version": 1,
            "airfields": [{"name": "Lelystad", "icaoCode": "EHLE"}],
            "flights": [],
        });

        let blob = encrypt(&payload, &key).unwrap();
        let recovered: Value = decrypt(&blob, &key).unwrap();

        assert_eq!(recovered, payload);
    }

    #[test]
    fn test_wrong_key_is_authentication_error() {
        let payload = json!({"a": 1});
        let blob = encrypt(&payload, &fixed_key()).unwrap();

        let other = ShareKey::from_hex("00112233445566778899aabbccddee00").unwrap();
        let result = decrypt::<Value>(&blob, &other);

        assert!(matches!(result, Err(CryptoError::Authentication)));
    }

    #[test]
    fn test_fresh_nonce_per_call() {
        let key = fixed_key();
        let a = seal(b"same bytes", &key).unwrap();
        let b = seal(b"same bytes", &key).unwrap();
        assert_ne!(a, b);

        let a_raw = STANDARD.decode(&a).unwrap();
        let b_raw = STANDARD.decode(&b).unwrap();
        assert_ne!(a_raw[..NONCE_SIZE], b_raw[..NONCE_SIZE]);
    }

    #[test]
    fn test_blob_layout() {
        let blob = seal(b"hello", &fixed_key()).unwrap();
        let raw = STANDARD.decode(blob).unwrap();
        assert_eq!(raw.len(), NONCE_SIZE + 5 + TAG_SIZE);
    }

    #[test]
    fn test_tampered_blob_fails_authentication() {
        let key = fixed_key();
        let blob = seal(b"flight trace data", &key).unwrap();

        let mut raw = STANDARD.decode(blob).unwrap();
        raw[NONCE_SIZE + 2] ^= 0xFF;
        let tampered = STANDARD.encode(raw);

        assert!(open(&tampered, &key).unwrap_err().is_authentication());
    }

    #[test]
    fn test_malformed_blobs() {
        let key = fixed_key();

        assert!(matches!(
            open("***not base64***", &key),
            Err(CryptoError::Encoding(_))
        ));
        assert!(matches!(
            open("dGVzdA==", &key),
            Err(CryptoError::TooShort { got: 4, .. })
        ));
    }

    #[test]
    fn test_upper_case_key_opens_lower_case_blob() {
        let lower = fixed_key();
        let upper = ShareKey::from_hex("00112233445566778899AABBCCDDEEFF").unwrap();

        let blob = seal(b"EHLE -> EHTE", &lower).unwrap();
        assert_eq!(open(&blob, &upper).unwrap(), b"EHLE -> EHTE");
    }

    #[test]
    fn test_authenticated_non_json_is_serialization_error() {
        let key = fixed_key();
        let blob = seal(b"not json", &key).unwrap();
        assert!(matches!(
            decrypt::<Value>(&blob, &key),
            Err(CryptoError::Serialization(_))
        ));
    }

    #[test]
    fn test_empty_payload() {
        let key = fixed_key();
        let blob = seal(b"", &key).unwrap();
        assert!(open(&blob, &key).unwrap().is_empty());
    }
}
