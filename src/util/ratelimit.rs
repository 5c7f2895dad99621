//! Rate limiting between sequential external calls
//!
//! Third-party quotas are respected with an explicit suspension point
//! between calls, factored out here so throttling policy never lives
//! inline in ingestion logic. This is a cooperative delay, not a
//! concurrency primitive: callers are sequential by design.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    /// Suspend until at least `min_interval` has passed since the
    /// previous `wait` returned. The first call never waits.
    pub async fn wait(&self) {
        let mut last = self.last_call.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}
