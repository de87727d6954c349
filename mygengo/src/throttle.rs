use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};

/// Keeps at least `min_interval` between the dispatch of two requests.
///
/// The lock is held while waiting, so concurrent callers queue up instead of racing on the
/// timestamp.
pub(crate) struct Throttle {
    min_interval: Duration,
    last_dispatch: Mutex<Option<Instant>>,
}

impl Throttle {
    pub(crate) fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_dispatch: Mutex::new(None),
        }
    }

    /// Waits until the request may go out and records it as dispatched.
    pub(crate) async fn wait_turn(&self) {
        let mut last_dispatch = self.last_dispatch.lock().await;
        if let Some(prev) = *last_dispatch {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                tracing::debug!(?wait, "waiting between requests");
                sleep(wait).await;
            }
        }
        *last_dispatch = Some(Instant::now());
    }
}
