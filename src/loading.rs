//! Rotating status messages shown while a generation request is in flight.
//!
//! [`LoadingIndicator::start`] shows the loading region, sets the first phrase
//! and spawns a task that advances to the next phrase every interval, stopping
//! on the last one. The returned [`LoadingGuard`] owns that task: dropping it
//! aborts the rotation and hides the region, so the indicator lives exactly as
//! long as the request the guard was created for.

use crate::page::LoadingView;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, instrument};

/// Phrases cycled through while the backend works, in order.
pub const LOADING_MESSAGES: [&str; 4] = [
    "Looking for news...",
    "Curating sources...",
    "Writing articles...",
    "Editing final newspaper...",
];

/// Time each phrase stays on screen before the next one.
pub const DEFAULT_MESSAGE_INTERVAL: Duration = Duration::from_secs(12);

/// Factory for [`LoadingGuard`]s with a fixed rotation interval.
///
/// The indicator itself holds no state between requests; each call to
/// [`LoadingIndicator::start`] owns its own timer.
#[derive(Debug, Clone, Copy)]
pub struct LoadingIndicator {
    interval: Duration,
}

impl Default for LoadingIndicator {
    fn default() -> Self {
        Self::new(DEFAULT_MESSAGE_INTERVAL)
    }
}

impl LoadingIndicator {
    /// Create an indicator that shows each phrase for `interval`.
    ///
    /// # Arguments
    ///
    /// * `interval` - Time between phrase changes (12 seconds on the page)
    ///
    /// # Returns
    ///
    /// An indicator whose interval is at least one millisecond.
    pub fn new(interval: Duration) -> Self {
        // tokio intervals panic on a zero period
        Self { interval: interval.max(Duration::from_millis(1)) }
    }

    /// Time each phrase stays on screen.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Show the loading region and start rotating messages.
    ///
    /// Must be called from within a tokio runtime.
    #[instrument(level = "debug", skip_all, fields(interval_ms = self.interval().as_millis() as u64))]
    pub fn start(&self, view: Arc<dyn LoadingView>) -> LoadingGuard {
        view.show_loading();
        view.set_loading_message(LOADING_MESSAGES[0]);

        let period = self.interval;
        // the schedule starts at dispatch, not when the task is first polled
        let first = Instant::now() + period;
        let rotating = Arc::clone(&view);
        let task = tokio::spawn(async move {
            let mut ticker = interval_at(first, period);
            // a stalled runtime catches up instead of stretching the schedule
            ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);
            for message in LOADING_MESSAGES.iter().skip(1) {
                ticker.tick().await;
                rotating.set_loading_message(message);
                debug!(phrase = message, "Loading message advanced");
            }
        });

        LoadingGuard { view, task: Some(task) }
    }
}

/// Keeps the loading region visible until dropped.
pub struct LoadingGuard {
    view: Arc<dyn LoadingView>,
    task: Option<JoinHandle<()>>,
}

impl LoadingGuard {
    /// Hide the region now. Equivalent to dropping the guard.
    pub fn finish(self) {}
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.view.hide_loading();
    }
}

impl std::fmt::Debug for LoadingGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadingGuard")
            .field("rotating", &self.task.as_ref().map(|t| !t.is_finished()))
            .finish()
    }
}
