//! Backoff policy for transient provider failures.
//!
//! Retries live in-process around the fetch call; a failure that survives
//! the policy becomes a per-symbol outcome, never a batch failure.

use std::time::Duration;

/// Delay strategy between attempts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    /// Fixed delay between retries.
    Fixed { delay: Duration },
    /// `base * factor^attempt`, capped at `max`.
    Exponential {
        base: Duration,
        factor: f64,
        max: Duration,
    },
}

impl Backoff {
    /// Delay before the given 0-based retry attempt.
    pub fn delay(self, attempt: u32) -> Duration {
        match self {
            Backoff::Fixed { delay } => delay,
            Backoff::Exponential { base, factor, max } => {
                let seconds = base.as_secs_f64() * factor.powi(attempt as i32);
                Duration::from_secs_f64(seconds.min(max.as_secs_f64()))
            }
        }
    }
}

/// How many times to retry a transient fetch failure, and how long to wait.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts = `max_retries + 1`.
    pub max_retries: u32,
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff: Backoff::Exponential {
                base: Duration::from_millis(500),
                factor: 2.0,
                max: Duration::from_secs(10),
            },
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            backoff: Backoff::Fixed {
                delay: Duration::ZERO,
            },
        }
    }

    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff.delay(attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_backoff() {
        let backoff = Backoff::Fixed {
            delay: Duration::from_millis(100),
        };

        assert_eq!(backoff.delay(0), Duration::from_millis(100));
        assert_eq!(backoff.delay(7), Duration::from_millis(100));
    }

    #[test]
    fn test_exponential_backoff_caps() {
        let backoff = Backoff::Exponential {
            base: Duration::from_millis(100),
            factor: 2.0,
            max: Duration::from_secs(1),
        };

        assert_eq!(backoff.delay(0), Duration::from_millis(100));
        assert_eq!(backoff.delay(1), Duration::from_millis(200));
        assert_eq!(backoff.delay(2), Duration::from_millis(400));
        assert_eq!(backoff.delay(10), Duration::from_secs(1)); // capped
    }

    #[test]
    fn test_no_retry_policy() {
        let policy = RetryPolicy::none();
        assert_eq!(policy.max_retries, 0);
        assert_eq!(policy.delay_for(0), Duration::ZERO);
    }
}
