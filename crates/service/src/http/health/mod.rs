use axum::routing::get;
use axum::Router;

use crate::ServiceState;

mod data_source;
mod liveness;
mod readiness;
pub mod summary;
mod version;

pub use data_source::{DataSource, DataSourceError, StateDataSource};

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/livez", get(liveness::handler))
        .route("/readyz", get(readiness::handler))
        .route("/version", get(version::handler))
        .with_state(state)
}
