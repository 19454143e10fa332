//! Share store service for flight logbook share links.
//!
//! This crate provides the server half of zero-knowledge sharing:
//! - Store (in-memory encrypted blobs with TTL expiry checked on every read)
//! - Sweeper (background task dropping expired records)
//! - HTTP surface (share API, health checks, typed client)
//! - Process wiring (logging, graceful shutdown)

pub mod clock;
pub mod config;
pub mod http;
pub mod process;
pub mod state;
pub mod store;
pub mod sweeper;

// Re-export key types for convenience
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Config, ConfigError, ConfigFile};
pub use process::{init_logging, spawn_service, start_service, ServiceError, ShutdownHandle};
pub use state::{State as ServiceState, StateSetupError};
pub use store::{ShareStore, StoreError, StoreLimits};
