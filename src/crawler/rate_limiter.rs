//! Per-domain request spacing

use crate::state::DomainState;
use rand::Rng;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Upper bound of the random delay added when a caller has to wait
pub const DEFAULT_RATE_JITTER: Duration = Duration::from_millis(100);

/// Spaces out requests to the same domain
///
/// The limiter hands out request slots. Each slot is at least `interval`
/// after the previous slot for that domain. The domain map is guarded by a
/// single mutex that is held only while a slot is reserved, never across
/// the sleep, so workers hitting different domains never wait on each other.
pub struct RateLimiter {
    interval: Duration,
    max_jitter: Duration,
    domains: Mutex<HashMap<String, DomainState>>,
}

impl RateLimiter {
    /// Creates a limiter with the given minimum spacing and the default jitter
    pub fn new(interval: Duration) -> Self {
        Self::with_jitter(interval, DEFAULT_RATE_JITTER)
    }

    pub fn with_jitter(interval: Duration, max_jitter: Duration) -> Self {
        Self {
            interval,
            max_jitter,
            domains: Mutex::new(HashMap::new()),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits until a request to `domain` is allowed
    ///
    /// # Arguments
    ///
    /// * `domain` - The `host[:port]` key of the request target
    pub async fn wait(&self, domain: &str) {
        let delay = self.reserve(domain, Instant::now());

        if !delay.is_zero() {
            tracing::trace!(domain, delay_ms = delay.as_millis() as u64, "Rate limiting");
            tokio::time::sleep(delay).await;
        }
    }

    /// Reserves the next slot for `domain` and returns how long to sleep
    fn reserve(&self, domain: &str, now: Instant) -> Duration {
        let jitter = random_jitter(self.max_jitter);
        let mut domains = self.domains.lock().unwrap_or_else(PoisonError::into_inner);
        domains
            .entry(domain.to_string())
            .or_default()
            .reserve(self.interval, jitter, now)
    }

    /// Number of requests issued to `domain` so far
    pub fn request_count(&self, domain: &str) -> u32 {
        let domains = self.domains.lock().unwrap_or_else(PoisonError::into_inner);
        domains.get(domain).map_or(0, |state| state.request_count)
    }

    /// Number of distinct domains seen
    pub fn domain_count(&self) -> usize {
        let domains = self.domains.lock().unwrap_or_else(PoisonError::into_inner);
        domains.len()
    }
}

/// Uniform random duration in `[0, max)`
pub(crate) fn random_jitter(max: Duration) -> Duration {
    if max.is_zero() {
        return Duration::ZERO;
    }
    let secs = rand::rng().random_range(0.0..max.as_secs_f64());
    Duration::from_secs_f64(secs)
}
