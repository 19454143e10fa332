//! HTTP handlers and routers for the share service.

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use tower_http::trace::{DefaultOnFailure, DefaultOnResponse};
use tower_http::LatencyUnit;

pub mod api;
pub mod config;
pub mod handlers;
pub mod health;

pub use config::Config;
pub use handlers::not_found_handler;

use crate::ServiceState;

const API_PREFIX: &str = "/api";
const STATUS_PREFIX: &str = "/_status";

/// Room for the JSON envelope around `encryptedData` (64 KiB)
pub const BODY_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the full application router (without the trace layer)
pub fn router(config: &Config, state: ServiceState) -> Router {
    Router::new()
        .route("/health", get(health::summary::handler))
        .nest(STATUS_PREFIX, health::router(state.clone()))
        .nest(API_PREFIX, api::router(state.clone()))
        .fallback(handlers::not_found_handler)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .with_state(state)
}

/// Bind the share API listener; done up front so a taken port fails startup.
pub async fn bind(config: &Config) -> Result<TcpListener, HttpServerError> {
    TcpListener::bind(config.listen_addr)
        .await
        .map_err(|source| HttpServerError::BindFailed {
            addr: config.listen_addr,
            source,
        })
}

/// Run the share API HTTP server on `listener` until the shutdown signal fires.
pub async fn run_api(
    config: Config,
    listener: TcpListener,
    state: ServiceState,
    mut shutdown_rx: watch::Receiver<()>,
) -> Result<(), HttpServerError> {
    let log_level = config.log_level;
    let trace_layer = TraceLayer::new_for_http()
        .on_response(
            DefaultOnResponse::new()
                .include_headers(false)
                .level(log_level)
                .latency_unit(LatencyUnit::Micros),
        )
        .on_failure(DefaultOnFailure::new().latency_unit(LatencyUnit::Micros));

    let router = router(&config, state).layer(trace_layer);

    tracing::info!(addr = ?listener.local_addr()?, "share API listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.changed().await;
        })
        .await?;

    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum HttpServerError {
    #[error("failed to bind {addr}: {source}")]
    BindFailed {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },
    #[error("an error occurred running the HTTP server: {0}")]
    ServingFailed(#[from] std::io::Error),
}
