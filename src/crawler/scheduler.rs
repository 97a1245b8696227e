//! Request pacing against the upstream feed service
//!
//! The crawler never fires two feed requests closer together than a fixed
//! interval. `RateLimiter` keeps that rule in one place so the page loop only
//! has to call `pause_after_request` after a fetch and `wait` before the next one.

use std::time::{Duration, Instant};

/// Interval-based rate limiter
#[derive(Debug, Clone)]
pub struct RateLimiter {
    /// Minimum spacing between two requests
    interval: Duration,

    /// When the last request completed
    last_request: Option<Instant>,

    /// Number of requests recorded so far
    request_count: u64,
}

impl RateLimiter {
    /// Creates a limiter enforcing `interval` between requests
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_request: None,
            request_count: 0,
        }
    }

    /// Creates a limiter from a millisecond delay
    pub fn from_millis(delay_ms: u64) -> Self {
        Self::new(Duration::from_millis(delay_ms))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn request_count(&self) -> u64 {
        self.request_count
    }

    /// Records that a request just completed
    pub fn record_request(&mut self) {
        self.record_request_at(Instant::now());
    }

    fn record_request_at(&mut self, now: Instant) {
        self.last_request = Some(now);
        self.request_count += 1;
    }

    /// Returns how long a caller must wait before the next request
    ///
    /// # Returns
    ///
    /// * `None` - a request may be sent right away
    /// * `Some(Duration)` - time remaining until the interval has elapsed
    pub fn time_until_ready(&self, now: Instant) -> Option<Duration> {
        let last = self.last_request?;
        let ready_at = last + self.interval;
        if now >= ready_at {
            None
        } else {
            Some(ready_at - now)
        }
    }

    /// Records a request and then sleeps for the full interval
    pub async fn pause_after_request(&mut self) {
        self.record_request();
        self.wait().await;
    }

    /// Sleeps until the interval since the last request has elapsed
    pub async fn wait(&self) {
        if let Some(remaining) = self.time_until_ready(Instant::now()) {
            tracing::trace!("Rate limiter sleeping {:?}", remaining);
            tokio::time::sleep(remaining).await;
        }
    }
}
