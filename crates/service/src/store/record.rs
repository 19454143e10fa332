use chrono::{DateTime, Utc};

use common::share_id::ShareId;

/// A stored share: an opaque ciphertext plus its lifetime
///
/// The store never looks inside `encrypted_data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRecord {
    pub id: ShareId,
    pub encrypted_data: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl ShareRecord {
    /// A record is gone once `now >= expires_at`, swept or not.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
