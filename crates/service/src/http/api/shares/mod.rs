use axum::routing::{get, post};
use axum::Router;

use crate::ServiceState;

pub mod create;
pub mod get;

// Re-export for convenience
pub use create::{CreateShareRequest, CreateShareResponse};
pub use get::{GetShareRequest, GetShareResponse};

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/shares", post(create::handler))
        .route("/shares/:id", get(get::handler))
        .with_state(state)
}
