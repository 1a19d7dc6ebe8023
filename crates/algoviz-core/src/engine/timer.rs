use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Recurring tick running as a local tokio task
///
/// The callback returns false to stop the loop.
pub(crate) struct TickTimer {
    handle: JoinHandle<()>,
    period: Duration,
}

impl TickTimer {
    /// Spawn onto the current `LocalSet`
    ///
    /// # Panics
    ///
    /// Panics when called outside a `tokio::task::LocalSet`.
    pub(crate) fn start<F>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> bool + 'static,
    {
        let period = period.max(Duration::from_millis(1));
        let handle = tokio::task::spawn_local(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            // Skip the first tick (fires immediately)
            interval.tick().await;

            loop {
                interval.tick().await;
                if !on_tick() {
                    break;
                }
            }
        });

        Self { handle, period }
    }

    pub(crate) fn period(&self) -> Duration {
        self.period
    }

    pub(crate) fn cancel(self) {
        self.handle.abort();
    }
}
