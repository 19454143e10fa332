//! In-memory share store
//!
//! Holds encrypted blobs keyed by [`ShareId`] until they expire. Expiry is
//! decided on every read against the injected [`Clock`]; the periodic sweep
//! only reclaims memory and is never needed for correctness.

mod record;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::RwLock;

use common::share_id::ShareId;

use crate::clock::Clock;

pub use record::ShareRecord;

/// Default lifetime of a share (30 days)
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);
/// Longest lifetime a client may ask for (365 days)
pub const MAX_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);
/// Upper bound a configured TTL may reach (100 years)
pub const TTL_CEILING: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);
/// Largest accepted encrypted blob (5 MiB)
pub const MAX_BLOB_BYTES: usize = 5 * 1024 * 1024;

/// How many fresh identifiers to try before giving up on a create.
const ID_ATTEMPTS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreLimits {
    pub default_ttl: Duration,
    pub max_ttl: Duration,
    pub max_blob_bytes: usize,
}

impl Default for StoreLimits {
    fn default() -> Self {
        Self {
            default_ttl: DEFAULT_TTL,
            max_ttl: MAX_TTL,
            max_blob_bytes: MAX_BLOB_BYTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("encryptedData must not be empty")]
    EmptyBlob,
    #[error("encryptedData is {size} bytes, the limit is {max}")]
    BlobTooLarge { size: usize, max: usize },
    #[error("expiresIn must be between 1 and {max} seconds, got {got}")]
    InvalidTtl { got: i64, max: u64 },
    #[error("invalid share id")]
    InvalidId,
    #[error("share not found")]
    NotFound,
    #[error("could not allocate a unique share id")]
    IdExhausted,
}

/// Result of a successful create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedShare {
    pub id: ShareId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Share records behind a lock, plus the clock that decides expiry
///
/// Cheap to clone; clones share the same table.
#[derive(Debug, Clone)]
pub struct ShareStore {
    records: Arc<RwLock<HashMap<ShareId, ShareRecord>>>,
    clock: Arc<dyn Clock>,
    limits: StoreLimits,
}

impl ShareStore {
    pub fn new(clock: Arc<dyn Clock>, limits: StoreLimits) -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            clock,
            limits,
        }
    }

    pub fn limits(&self) -> &StoreLimits {
        &self.limits
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Store a new encrypted blob
    ///
    /// `ttl_secs` defaults to the configured default TTL. The blob must be
    /// non-empty and within the size limit.
    pub fn create(
        &self,
        encrypted_data: String,
        ttl_secs: Option<i64>,
    ) -> Result<CreatedShare, StoreError> {
        if encrypted_data.is_empty() {
            return Err(StoreError::EmptyBlob);
        }
        if encrypted_data.len() > self.limits.max_blob_bytes {
            return Err(StoreError::BlobTooLarge {
                size: encrypted_data.len(),
                max: self.limits.max_blob_bytes,
            });
        }
        let ttl = self.resolve_ttl(ttl_secs)?;

        let created_at = self.clock.now();
        let expires_at = created_at
            .checked_add_signed(ttl)
            .ok_or(StoreError::InvalidTtl {
                got: ttl.num_seconds(),
                max: self.limits.max_ttl.as_secs(),
            })?;

        let mut records = self.records.write();
        let id = (0..ID_ATTEMPTS)
            .map(|_| ShareId::generate())
            .find(|id| {
                let taken = records.contains_key(id);
                if taken {
                    tracing::warn!(%id, "share id collision, drawing another");
                }
                !taken
            })
            .ok_or(StoreError::IdExhausted)?;

        records.insert(
            id,
            ShareRecord {
                id,
                encrypted_data,
                created_at,
                expires_at,
            },
        );

        Ok(CreatedShare {
            id,
            created_at,
            expires_at,
        })
    }

    /// Fetch the blob for `id` if it exists and has not expired
    pub fn get(&self, id: &ShareId) -> Result<String, StoreError> {
        let now = self.clock.now();
        let records = self.records.read();
        match records.get(id) {
            Some(record) if !record.is_expired(now) => Ok(record.encrypted_data.clone()),
            _ => Err(StoreError::NotFound),
        }
    }

    /// Validate a raw identifier, then [`get`](Self::get) it
    ///
    /// Malformed identifiers are rejected before the table is consulted.
    pub fn lookup(&self, raw_id: &str) -> Result<String, StoreError> {
        let id = raw_id
            .parse::<ShareId>()
            .map_err(|_| StoreError::InvalidId)?;
        self.get(&id)
    }

    /// Remove every expired record, returning how many were dropped
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|_, record| !record.is_expired(now));
        before - records.len()
    }

    /// Number of records held, including expired ones not yet swept
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check that the table can be locked within `wait`
    pub fn is_available(&self, wait: Duration) -> bool {
        self.records.try_read_for(wait).is_some()
    }

    fn resolve_ttl(&self, ttl_secs: Option<i64>) -> Result<TimeDelta, StoreError> {
        let max = self.limits.max_ttl.as_secs();
        let secs = match ttl_secs {
            Some(secs) => secs,
            None => i64::try_from(self.limits.default_ttl.as_secs()).unwrap_or(i64::MAX),
        };
        let invalid = StoreError::InvalidTtl { got: secs, max };
        if secs <= 0 || secs as u64 > max {
            return Err(invalid);
        }
        TimeDelta::try_seconds(secs).ok_or(invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn store() -> (ShareStore, ManualClock) {
        let clock = ManualClock::default();
        let store = ShareStore::new(Arc::new(clock.clone()), StoreLimits::default());
        (store, clock)
    }

    #[test]
    fn test_create_then_get_returns_blob_unchanged() {
        let (store, _) = store();
        let created = store.create("dGVzdA==".to_string(), Some(60)).unwrap();

        assert_eq!(store.get(&created.id).unwrap(), "dGVzdA==");
        assert_eq!(store.lookup(&created.id.to_hex()).unwrap(), "dGVzdA==");
        assert_eq!(
            created.expires_at - created.created_at,
            TimeDelta::seconds(60)
        );
    }

    #[test]
    fn test_default_ttl_applies() {
        let (store, clock) = store();
        let created = store.create("blob".to_string(), None).unwrap();
        assert_eq!(created.created_at, clock.now());
        assert_eq!(created.expires_at - created.created_at, TimeDelta::days(30));
    }

    #[test]
    fn test_expired_record_is_not_found_before_sweep() {
        let (store, clock) = store();
        let created = store.create("dGVzdA==".to_string(), Some(60)).unwrap();

        clock.advance(TimeDelta::seconds(59));
        assert!(store.get(&created.id).is_ok());

        clock.advance(TimeDelta::seconds(1));
        assert_eq!(store.get(&created.id), Err(StoreError::NotFound));
        // still physically present until swept
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_unknown_and_malformed_ids() {
        let (store, _) = store();
        assert_eq!(store.get(&ShareId::generate()), Err(StoreError::NotFound));
        assert_eq!(store.lookup("not-an-id"), Err(StoreError::InvalidId));
        assert_eq!(
            store.lookup("0123456789ABCDEF0123456789ABCDEFFF"),
            Err(StoreError::InvalidId)
        );
    }

    #[test]
    fn test_rejects_bad_blobs() {
        let clock = ManualClock::default();
        let store = ShareStore::new(
            Arc::new(clock),
            StoreLimits {
                max_blob_bytes: 8,
                ..StoreLimits::default()
            },
        );

        assert_eq!(store.create(String::new(), None), Err(StoreError::EmptyBlob));
        assert_eq!(
            store.create("123456789".to_string(), None),
            Err(StoreError::BlobTooLarge { size: 9, max: 8 })
        );
        assert!(store.create("12345678".to_string(), None).is_ok());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_rejects_out_of_range_ttl() {
        let (store, _) = store();
        for ttl in [0, -1, MAX_TTL.as_secs() as i64 + 1] {
            assert!(matches!(
                store.create("blob".to_string(), Some(ttl)),
                Err(StoreError::InvalidTtl { .. })
            ));
        }
        assert!(store.create("blob".to_string(), Some(MAX_TTL.as_secs() as i64)).is_ok());
    }

    #[test]
    fn test_sweep_removes_only_expired() {
        let (store, clock) = store();
        let short = store.create("short".to_string(), Some(10)).unwrap();
        let long = store.create("long".to_string(), Some(3600)).unwrap();

        assert_eq!(store.sweep(), 0);

        clock.advance(TimeDelta::seconds(10));
        assert_eq!(store.sweep(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&short.id), Err(StoreError::NotFound));
        assert_eq!(store.get(&long.id).unwrap(), "long");
    }

    #[test]
    fn test_ids_are_unique() {
        let (store, _) = store();
        let a = store.create("a".to_string(), None).unwrap();
        let b = store.create("b".to_string(), None).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_clones_share_records() {
        let (store, _) = store();
        let other = store.clone();
        let created = store.create("shared".to_string(), None).unwrap();
        assert_eq!(other.get(&created.id).unwrap(), "shared");
        assert!(other.is_available(Duration::from_millis(10)));
    }

    #[test]
    fn test_expiry_past_the_calendar_is_rejected() {
        let clock = ManualClock::new(chrono::DateTime::<Utc>::MAX_UTC - TimeDelta::days(1));
        let store = ShareStore::new(Arc::new(clock), StoreLimits::default());

        let err = store.create("blob".to_string(), Some(7 * 24 * 60 * 60)).unwrap_err();
        assert!(matches!(err, StoreError::InvalidTtl { .. }));
        assert!(store.is_empty());

        // still fits
        assert!(store.create("blob".to_string(), Some(60)).is_ok());
    }

    #[test]
    fn test_huge_configured_ttl_does_not_panic() {
        let limits = StoreLimits {
            default_ttl: Duration::from_secs(1_000_000_000_000_000),
            max_ttl: Duration::from_secs(1_000_000_000_000_000),
            ..StoreLimits::default()
        };
        let store = ShareStore::new(Arc::new(ManualClock::default()), limits);
        assert!(matches!(
            store.create("blob".to_string(), None),
            Err(StoreError::InvalidTtl { .. })
        ));
    }
}
