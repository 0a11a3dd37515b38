//! Bounded retry policy for code allocation.

use std::time::Duration;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

/// How many candidates [`crate::application::services::MappingService`] may try
/// and how long it waits between them.
///
/// Delays double on every retry starting at `2 * initial_backoff_ms`. Each one
/// is capped at `max_backoff_ms` and then jittered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. Must be at least 1.
    pub max_attempts: u32,

    /// Scale of the backoff in milliseconds. Zero disables sleeping.
    pub initial_backoff_ms: u64,

    /// Upper bound for a single delay in milliseconds.
    pub max_backoff_ms: u64,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_backoff_ms: u64, max_backoff_ms: u64) -> Self {
        Self {
            max_attempts,
            initial_backoff_ms,
            max_backoff_ms,
        }
    }

    /// A policy that retries immediately, up to `max_attempts` total attempts.
    pub fn no_backoff(max_attempts: u32) -> Self {
        Self::new(max_attempts, 0, 0)
    }

    /// Delays to sleep before each retry. Yields `max_attempts - 1` items.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + Send + use<> {
        self.backoff().map(jitter)
    }

    fn backoff(&self) -> impl Iterator<Item = Duration> + Send + use<> {
        ExponentialBackoff::from_millis(2)
            .factor(self.initial_backoff_ms)
            .max_delay(Duration::from_millis(self.max_backoff_ms))
            .take(self.max_attempts.saturating_sub(1) as usize)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(10, 2, 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delays_count_excludes_first_attempt() {
        assert_eq!(RetryPolicy::no_backoff(5).delays().count(), 4);
        assert_eq!(RetryPolicy::no_backoff(1).delays().count(), 0);
        assert_eq!(RetryPolicy::no_backoff(0).delays().count(), 0);
    }

    #[test]
    fn test_delays_are_capped() {
        let policy = RetryPolicy::new(20, 10, 50);

        assert!(
            policy
                .delays()
                .all(|delay| delay <= Duration::from_millis(50))
        );
    }

    #[test]
    fn test_backoff_doubles_from_smallest_base() {
        let delays: Vec<_> = RetryPolicy::new(6, 1, 20).backoff().collect();

        assert_eq!(delays, [2, 4, 8, 16, 20].map(Duration::from_millis).to_vec());
    }

    #[test]
    fn test_backoff_scales_with_initial() {
        let delays: Vec<_> = RetryPolicy::new(4, 5, 1000).backoff().collect();

        assert_eq!(delays, [10, 20, 40].map(Duration::from_millis).to_vec());
    }

    #[test]
    fn test_no_backoff_never_sleeps() {
        assert!(
            RetryPolicy::no_backoff(8)
                .delays()
                .all(|delay| delay == Duration::ZERO)
        );
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 10);
        assert_eq!(policy.delays().count(), 9);
    }
}
