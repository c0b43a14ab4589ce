use std::time::{Duration, Instant};

/// Tracks the request schedule of one domain
///
/// This structure maintains the per-domain information the rate limiter
/// needs: when the last request slot was handed out and how many requests
/// have been made.
#[derive(Debug, Clone, Default)]
pub struct DomainState {
    /// Number of requests made to this domain during the process lifetime
    pub request_count: u32,

    /// Instant of the most recently reserved request slot
    pub last_request_time: Option<Instant>,
}

impl DomainState {
    /// Creates a new DomainState with no recorded requests
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculates the time until the next request can be made
    ///
    /// Returns None if a request can be made now, or the duration to wait otherwise.
    pub fn time_until_next_request(&self, interval: Duration, now: Instant) -> Option<Duration> {
        let last = self.last_request_time?;
        let ready_at = last + interval;
        if ready_at > now {
            Some(ready_at - now)
        } else {
            None
        }
    }

    /// Reserves the next request slot for this domain
    ///
    /// The slot is `now` if the domain has been idle for at least
    /// `interval`, otherwise it is the earliest allowed instant plus
    /// `jitter`. The slot is recorded immediately so concurrent callers
    /// queue behind it.
    ///
    /// # Arguments
    ///
    /// * `interval` - Minimum spacing between requests to this domain
    /// * `jitter` - Extra delay added only when the caller has to wait
    /// * `now` - The current time instant
    ///
    /// # Returns
    ///
    /// How long the caller must sleep before sending its request
    pub fn reserve(&mut self, interval: Duration, jitter: Duration, now: Instant) -> Duration {
        let wait = match self.time_until_next_request(interval, now) {
            Some(remaining) => remaining + jitter,
            None => Duration::ZERO,
        };

        self.request_count += 1;
        self.last_request_time = Some(now + wait);
        wait
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(200);

    #[test]
    fn test_new_domain_state() {
        let state = DomainState::new();
        assert_eq!(state.request_count, 0);
        assert!(state.last_request_time.is_none());
    }

    #[test]
    fn test_first_request_is_immediate() {
        let mut state = DomainState::new();
        let now = Instant::now();

        let wait = state.reserve(INTERVAL, Duration::from_millis(50), now);

        assert_eq!(wait, Duration::ZERO);
        assert_eq!(state.request_count, 1);
        assert_eq!(state.last_request_time, Some(now));
    }

    #[test]
    fn test_second_request_waits_with_jitter() {
        let mut state = DomainState::new();
        let now = Instant::now();
        state.reserve(INTERVAL, Duration::ZERO, now);

        let soon = now + Duration::from_millis(50);
        let wait = state.reserve(INTERVAL, Duration::from_millis(30), soon);

        assert_eq!(wait, Duration::from_millis(180));
        assert_eq!(state.last_request_time, Some(soon + wait));
    }

    #[test]
    fn test_concurrent_reservations_queue() {
        let mut state = DomainState::new();
        let now = Instant::now();

        let first = state.reserve(INTERVAL, Duration::ZERO, now);
        let second = state.reserve(INTERVAL, Duration::ZERO, now);
        let third = state.reserve(INTERVAL, Duration::ZERO, now);

        assert_eq!(first, Duration::ZERO);
        assert_eq!(second, INTERVAL);
        assert_eq!(third, INTERVAL * 2);
        assert_eq!(state.request_count, 3);
    }

    #[test]
    fn test_idle_domain_no_wait() {
        let mut state = DomainState::new();
        let now = Instant::now();
        state.reserve(INTERVAL, Duration::ZERO, now);

        let later = now + Duration::from_millis(500);
        assert!(state.time_until_next_request(INTERVAL, later).is_none());
        assert_eq!(
            state.reserve(INTERVAL, Duration::from_millis(90), later),
            Duration::ZERO
        );
    }

    #[test]
    fn test_time_until_next_request() {
        let mut state = DomainState::new();
        let now = Instant::now();

        // No previous request
        assert!(state.time_until_next_request(INTERVAL, now).is_none());

        state.last_request_time = Some(now);
        assert_eq!(state.time_until_next_request(INTERVAL, now), Some(INTERVAL));

        let soon = now + Duration::from_millis(150);
        assert_eq!(
            state.time_until_next_request(INTERVAL, soon),
            Some(Duration::from_millis(50))
        );
    }
}
