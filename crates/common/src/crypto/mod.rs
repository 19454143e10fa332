//! Client-side encryption for share links
//!
//! A share is encrypted with a fresh [`ShareKey`] before it ever leaves the
//! client. The store only sees the resulting base64 blob; the key travels in
//! the URL fragment, which browsers and our CLI never send to a server.
//!
//! # Wire format
//!
//! ```text
//! base64( nonce (12 bytes) || AES-256-GCM ciphertext || tag (16 bytes) )
//! ```
//!
//! The 256-bit cipher key is `SHA-256` of the 16 raw share-key bytes, so the
//! upper and lower case spellings of a hex key decrypt the same blob.

mod cipher;
mod error;
mod key;

pub use cipher::{decrypt, encrypt, open, seal, NONCE_SIZE, TAG_SIZE};
pub use error::CryptoError;
pub use key::{is_valid_key_format, ShareKey, KEY_HEX_LEN, KEY_SIZE};
