//! Reconnection policy: settle delay, establish timeout, and
//! exponential backoff with an attempt ceiling.
//!
//! After a connection drops, the subscription retries with delays of
//! `base * 2^attempt`, clamped to `max_delay`, until `max_attempts`
//! consecutive failures have been burned. A successful open resets the
//! attempt counter.

use std::time::Duration;

/// Tunable parameters for the reconnect strategy.
#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    /// Wait before the very first connection attempt, so a freshly
    /// activated consumer does not race host readiness.
    pub settle_delay: Duration,
    /// Upper bound on how long a single connection attempt may take to
    /// reach the open state before it is failed.
    pub connect_timeout: Duration,
    /// Backoff delay for the first reconnect attempt.
    pub base_delay: Duration,
    /// Upper bound on the delay between attempts.
    pub max_delay: Duration,
    /// Consecutive failed attempts after which the subscription stops
    /// retrying permanently.
    pub max_attempts: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(500),
            connect_timeout: Duration::from_secs(10),
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            max_attempts: 10,
        }
    }
}

impl ReconnectPolicy {
    /// Backoff delay before reconnect attempt `attempt` (0-based):
    /// `min(base * 2^attempt, max_delay)`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.min(63);
        let millis = (self.base_delay.as_millis() as u64).saturating_mul(factor);
        Duration::from_millis(millis).min(self.max_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_doubles_until_the_cap() {
        let policy = ReconnectPolicy::default();
        let expected_ms = [1000, 2000, 4000, 8000, 16000, 30000, 30000, 30000];

        for (attempt, &ms) in expected_ms.iter().enumerate() {
            assert_eq!(
                policy.delay_for(attempt as u32),
                Duration::from_millis(ms),
                "attempt {attempt}"
            );
        }
    }

    #[test]
    fn delay_is_monotonically_non_decreasing() {
        let policy = ReconnectPolicy::default();
        let mut previous = Duration::ZERO;
        for attempt in 0..20 {
            let delay = policy.delay_for(attempt);
            assert!(delay >= previous, "attempt {attempt} decreased");
            previous = delay;
        }
    }

    #[test]
    fn huge_attempt_indices_do_not_overflow() {
        let policy = ReconnectPolicy::default();
        assert_eq!(policy.delay_for(u32::MAX), policy.max_delay);
    }

    #[test]
    fn custom_base_delay_is_respected() {
        let policy = ReconnectPolicy {
            base_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(35),
            ..Default::default()
        };
        assert_eq!(policy.delay_for(0), Duration::from_millis(10));
        assert_eq!(policy.delay_for(1), Duration::from_millis(20));
        assert_eq!(policy.delay_for(2), Duration::from_millis(35));
    }
}
