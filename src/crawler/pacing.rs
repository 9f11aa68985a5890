//! Request pacing between cases
//!
//! The crawl is strictly sequential, so pacing is a single randomized sleep
//! between consecutive cases: a fixed base delay plus a uniform jitter.

use crate::config::CrawlConfig;
use rand::Rng;
use std::time::Duration;

/// Randomized delay between consecutive case requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    base: Duration,
    jitter: Duration,
}

impl Pacing {
    /// Creates a pacing of `base + U[0, jitter)`
    pub fn new(base: Duration, jitter: Duration) -> Self {
        Self { base, jitter }
    }

    pub fn from_config(config: &CrawlConfig) -> Self {
        Self::new(
            Duration::from_millis(config.base_delay_ms),
            Duration::from_millis(config.jitter_ms),
        )
    }

    /// Draws the next delay
    pub fn next_delay(&self) -> Duration {
        if self.jitter.is_zero() {
            return self.base;
        }
        let r: f64 = rand::rng().random();
        self.base + self.jitter.mul_f64(r)
    }

    /// Sleeps for the next delay
    pub async fn wait(&self) {
        let delay = self.next_delay();
        if delay.is_zero() {
            return;
        }
        tracing::trace!("Pacing for {:?}", delay);
        tokio::time::sleep(delay).await;
    }
}
