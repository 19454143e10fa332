/**
 * Client-side encryption for shares.
 *  - Share key generation and validation
 *  - AES-256-GCM sealing of JSON payloads
 */
pub mod crypto;
/**
 * Share links: `https://<host>/share/{id}#{key}`,
 *  with the key carried only in the fragment.
 */
pub mod link;
/**
 * The plaintext payload of a share: airfields,
 *  flight traces and a bit of metadata.
 */
pub mod share;
/**
 * Public identifiers handed out by the share store.
 */
pub mod share_id;
/**
 * Helper for setting build version information
 *  at compile time.
 */
pub mod version;

pub mod prelude {
    pub use crate::crypto::{is_valid_key_format, CryptoError, ShareKey};
    pub use crate::link::{LinkError, ShareLink};
    pub use crate::share::{Airfield, FlightTrace, ShareableData, TrackPoint};
    pub use crate::share_id::{ShareId, ShareIdError};
    pub use crate::version::build_info;
}
