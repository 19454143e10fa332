use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};

use crate::store::ShareStore;

/// Default interval between expiry sweeps (1 hour)
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Periodically drop expired shares until a shutdown signal arrives
///
/// Reads already refuse expired records, so this only bounds memory.
pub async fn run(store: ShareStore, every: Duration, mut shutdown_rx: watch::Receiver<()>) {
    let mut timer = interval(every);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer.tick().await; // Skip first immediate tick

    tracing::info!(interval_secs = every.as_secs(), "expiry sweeper started");

    loop {
        tokio::select! {
            _ = timer.tick() => {
                let removed = store.sweep();
                if removed > 0 {
                    tracing::info!(removed, remaining = store.len(), "swept expired shares");
                } else {
                    tracing::debug!(remaining = store.len(), "sweep found nothing to remove");
                }
            }
            _ = shutdown_rx.changed() => {
                tracing::info!("expiry sweeper shutting down");
                break;
            }
        }
    }
}
