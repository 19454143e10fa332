use std::sync::Arc;

use axum::extract::FromRef;
use chrono::{DateTime, Utc};

use super::clock::{Clock, SystemClock};
use super::config::{Config, ConfigError};
use super::store::ShareStore;

/// Main service state, shared by every request handler
#[derive(Debug, Clone)]
pub struct State {
    store: ShareStore,
    started_at: DateTime<Utc>,
}

impl State {
    pub fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Build state around an explicit clock (tests inject a manual one)
    pub fn with_clock(config: &Config, clock: Arc<dyn Clock>) -> Result<Self, StateSetupError> {
        config.validate()?;
        let started_at = clock.now();
        let store = ShareStore::new(clock, config.store_limits());
        tracing::info!(
            default_ttl_secs = config.default_ttl.as_secs(),
            max_ttl_secs = config.max_ttl.as_secs(),
            max_blob_bytes = config.max_blob_bytes,
            "share store ready"
        );
        Ok(Self { store, started_at })
    }

    pub fn store(&self) -> &ShareStore {
        &self.store
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

impl FromRef<State> for ShareStore {
    fn from_ref(state: &State) -> Self {
        state.store.clone()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
