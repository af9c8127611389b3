//! Retry policy for model calls.
//!
//! Every council call runs under one [`RetryPolicy`]. The attempt budget is
//! shared by all failure kinds; the invoker does not classify errors.
//!
//! ```text
//! attempt 1 ──fail──▶ sleep(base) ──▶ attempt 2 ──fail──▶ sleep(base × m) ──▶ attempt 3
//!                                                                               │
//!                                                          fail ──▶ ExhaustedRetries
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Retry policy for a single model call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first one (minimum 1).
    pub max_attempts: u32,
    /// Delay before the second attempt, in milliseconds.
    pub initial_backoff_ms: u64,
    /// Backoff multiplier (2.0 doubles the delay each attempt).
    pub backoff_multiplier: f64,
    /// Upper bound on any single delay, in milliseconds.
    pub max_backoff_ms: u64,
}

impl RetryPolicy {
    /// Policy that never retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay to wait before the attempt with the given 0-indexed number.
    ///
    /// Attempt 0 never waits; attempt 1 waits `initial_backoff_ms`; each later
    /// attempt multiplies the previous delay, capped at `max_backoff_ms`.
    pub fn backoff_ms(&self, attempt: u32) -> u64 {
        if attempt == 0 {
            return 0;
        }
        let delay =
            self.initial_backoff_ms as f64 * self.backoff_multiplier.powi(attempt as i32 - 1);
        (delay as u64).min(self.max_backoff_ms)
    }

    /// Get the backoff as a Duration for a given attempt.
    pub fn backoff_duration(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.backoff_ms(attempt))
    }

    /// Whether another attempt is allowed after `attempts_made` attempts.
    pub fn should_retry(&self, attempts_made: u32) -> bool {
        attempts_made < self.effective_attempts()
    }

    /// Attempt budget, never below one.
    pub fn effective_attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

impl Default for RetryPolicy {
    /// Default: 3 attempts, 1s initial backoff, 2x multiplier, 60s cap.
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 1_000,
            backoff_multiplier: 2.0,
            max_backoff_ms: 60_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_backoff_sequence() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_ms(0), 0);
        assert_eq!(policy.backoff_ms(1), 1_000);
        assert_eq!(policy.backoff_ms(2), 2_000);
        assert_eq!(policy.backoff_duration(2), Duration::from_secs(2));
    }

    #[test]
    fn test_backoff_is_capped() {
        let policy = RetryPolicy {
            max_attempts: 10,
            initial_backoff_ms: 1_000,
            backoff_multiplier: 3.0,
            max_backoff_ms: 5_000,
        };
        assert_eq!(policy.backoff_ms(2), 3_000);
        assert_eq!(policy.backoff_ms(3), 5_000);
        assert_eq!(policy.backoff_ms(7), 5_000);
    }

    #[test]
    fn test_should_retry_budget() {
        let policy = RetryPolicy::default();
        assert!(policy.should_retry(1));
        assert!(policy.should_retry(2));
        assert!(!policy.should_retry(3));
    }

    #[test]
    fn test_zero_attempts_still_runs_once() {
        let policy = RetryPolicy {
            max_attempts: 0,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.effective_attempts(), 1);
        assert!(!policy.should_retry(1));
        assert!(!RetryPolicy::no_retry().should_retry(1));
    }

    #[test]
    fn test_policy_serde_roundtrip() {
        let json = serde_json::to_string(&RetryPolicy::default()).unwrap();
        let parsed: RetryPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.initial_backoff_ms, 1_000);
        assert_eq!(parsed.max_attempts, 3);
    }
}
