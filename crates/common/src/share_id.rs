use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Size of a share identifier in bytes
pub const SHARE_ID_SIZE: usize = 16;
/// Length of the hex form of a share identifier
pub const SHARE_ID_HEX_LEN: usize = SHARE_ID_SIZE * 2;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid share id: expected 32 hex characters")]
pub struct ShareIdError;

/// Public identifier of a stored share
///
/// 128 random bits rendered as 32 lowercase hex characters. It is URL-safe
/// and carries no information about the share's contents or age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShareId([u8; SHARE_ID_SIZE]);

impl ShareId {
    pub fn generate() -> Self {
        let mut buff = [0; SHARE_ID_SIZE];
        getrandom::getrandom(&mut buff).expect("failed to generate random bytes");
        Self(buff)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; SHARE_ID_SIZE]> for ShareId {
    fn from(bytes: [u8; SHARE_ID_SIZE]) -> Self {
        ShareId(bytes)
    }
}

impl FromStr for ShareId {
    type Err = ShareIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != SHARE_ID_HEX_LEN || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ShareIdError);
        }
        let mut buff = [0; SHARE_ID_SIZE];
        hex::decode_to_slice(s, &mut buff).map_err(|_| ShareIdError)?;
        Ok(ShareId(buff))
    }
}

impl fmt::Display for ShareId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for ShareId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ShareId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
