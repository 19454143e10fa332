pub mod utils;

use std::time::Duration;

use futures::future::join_all;
use tokio::sync::watch;
use tokio::time::timeout;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const FINAL_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

const LOG_FILE_NAME: &str = "logbook.log";

use crate::http;
use crate::state::StateSetupError;
use crate::sweeper;
use crate::{Config, ServiceState};

/// Handle for shutting down a running share service.
pub struct ShutdownHandle {
    graceful_waiter: tokio::task::JoinHandle<()>,
    handles: Vec<tokio::task::JoinHandle<()>>,
    shutdown_tx: watch::Sender<()>,
}

impl ShutdownHandle {
    /// Block until the service shuts down (via signal or explicit shutdown).
    pub async fn wait(self) -> Result<(), ServiceError> {
        shutdown_and_join(self.graceful_waiter, self.handles).await
    }

    /// Trigger shutdown programmatically.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("error creating service state: {0}")]
    State(#[from] StateSetupError),
    #[error("{0}")]
    Http(#[from] http::HttpServerError),
    #[error("failed to install signal handlers: {0}")]
    Signals(#[from] std::io::Error),
    #[error("failed to shut down within {} seconds", FINAL_SHUTDOWN_TIMEOUT.as_secs())]
    ShutdownTimeout,
}

/// `RUST_LOG` wins over the configured level when set
fn env_filter(level: tracing::Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy()
}

/// Initialize logging, panic handler, and build info reporting.
/// Returns guards that must be kept alive for the duration of the program.
pub fn init_logging(config: &Config) -> Vec<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::fmt::format::FmtSpan;

    let (stdout_writer, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());
    let mut guards = vec![stdout_guard];

    let stdout_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(stdout_writer)
        .with_filter(env_filter(config.log_level));

    // no file layer when the directory cannot be created
    let file_layer = config.log_dir.as_ref().and_then(|log_dir| {
        if let Err(e) = std::fs::create_dir_all(log_dir) {
            eprintln!("Warning: cannot create log directory {:?}: {}", log_dir, e);
            return None;
        }
        let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_NAME);
        let (file_writer, file_guard) = tracing_appender::non_blocking(appender);
        guards.push(file_guard);

        Some(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_span_events(FmtSpan::CLOSE)
                .with_filter(env_filter(config.log_level)),
        )
    });

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .init();

    utils::register_panic_logger();
    utils::report_build_info();

    guards
}

async fn shutdown_and_join(
    graceful_waiter: tokio::task::JoinHandle<()>,
    handles: Vec<tokio::task::JoinHandle<()>>,
) -> Result<(), ServiceError> {
    let _ = graceful_waiter.await;

    if timeout(FINAL_SHUTDOWN_TIMEOUT, join_all(handles))
        .await
        .is_err()
    {
        tracing::error!(
            "Failed to shut down within {} seconds",
            FINAL_SHUTDOWN_TIMEOUT.as_secs()
        );
        return Err(ServiceError::ShutdownTimeout);
    }
    tracing::info!("share service stopped");
    Ok(())
}

/// Create state and spawn the HTTP server and expiry sweeper.
///
/// The returned `ShutdownHandle` must be kept alive; dropping it does not stop the service.
pub async fn start_service(config: &Config) -> Result<(ServiceState, ShutdownHandle), ServiceError> {
    let state = ServiceState::from_config(config)?;
    let api_config = http::Config::from(config);
    let listener = http::bind(&api_config).await?;
    let (graceful_waiter, shutdown_tx, shutdown_rx) = utils::graceful_shutdown_blocker()?;

    let mut handles = Vec::new();

    let api_state = state.clone();
    let api_rx = shutdown_rx.clone();
    let api_tx = shutdown_tx.clone();
    let api_handle = tokio::spawn(async move {
        if let Err(e) = http::run_api(api_config, listener, api_state, api_rx).await {
            tracing::error!("API server error: {}", e);
            // without the API there is nothing left to serve
            let _ = api_tx.send(());
        }
    });
    handles.push(api_handle);

    let sweep_store = state.store().clone();
    let sweep_every = config.sweep_interval;
    let sweep_rx = shutdown_rx.clone();
    let sweep_handle = tokio::spawn(async move {
        sweeper::run(sweep_store, sweep_every, sweep_rx).await;
    });
    handles.push(sweep_handle);

    tracing::info!(
        addr = %config.listen_addr,
        sweep_interval_secs = config.sweep_interval.as_secs(),
        "Running: share API + expiry sweeper"
    );

    let handle = ShutdownHandle {
        graceful_waiter,
        handles,
        shutdown_tx,
    };

    Ok((state, handle))
}

/// Run the share service until a shutdown signal is received.
/// Use for CLI binary usage.
pub async fn spawn_service(config: &Config) -> Result<(), ServiceError> {
    let _guards = init_logging(config);
    let (_, handle) = start_service(config).await?;
    handle.wait().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_start_then_shutdown() {
        let config = Config {
            listen_addr: "127.0.0.1:0".parse().unwrap(),
            ..Config::default()
        };
        let (state, handle) = start_service(&config).await.unwrap();
        assert!(state.store().is_empty());

        handle.shutdown();
        handle.wait().await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let config = Config {
            max_blob_bytes: 0,
            ..Config::default()
        };
        assert!(matches!(
            start_service(&config).await,
            Err(ServiceError::State(_))
        ));
    }

    #[tokio::test]
    async fn test_taken_port_fails_startup() {
        let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let config = Config {
            listen_addr: taken.local_addr().unwrap(),
            ..Config::default()
        };

        let result = start_service(&config).await;
        assert!(matches!(
            result,
            Err(ServiceError::Http(http::HttpServerError::BindFailed { .. }))
        ));
    }
}
