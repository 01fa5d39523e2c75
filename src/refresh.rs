//! Periodic refresh: re-pull the active plugin's sources on a timer

use crate::error::ConfigError;
use crate::state::ConfigState;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Spawn a task that calls [`ConfigState::refresh`] every `period`
///
/// The first refresh happens one period after the call. Failures are logged and
/// the published snapshot stays in place. Abort the handle to stop the loop.
/// A zero `period` is rejected. Must be called from inside a tokio runtime.
pub fn spawn_refresh(
    state: Arc<ConfigState>,
    period: Duration,
) -> Result<JoinHandle<()>, ConfigError> {
    if period.is_zero() {
        return Err(ConfigError::Settings(
            "refresh period must be non-zero".to_string(),
        ));
    }
    Ok(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // interval() fires immediately; skip that tick.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let state = Arc::clone(&state);
            // Merging is CPU-bound and takes the writer lock.
            let result = tokio::task::spawn_blocking(move || state.refresh()).await;
            match result {
                Ok(Ok(report)) if report.changed => info!(
                    digest = %report.digest,
                    generation = report.generation,
                    "Config refreshed"
                ),
                Ok(Ok(report)) => debug!(digest = %report.digest, "Config unchanged after refresh"),
                Ok(Err(e)) => warn!(error = %e, "Config refresh failed; keeping current snapshot"),
                Err(e) => warn!(error = %e, "Config refresh task panicked"),
            }
        }
    }))
}
