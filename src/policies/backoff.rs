//! # Reconnect pacing policy.
//!
//! [`BackoffPolicy`] decides how long the reconnect loop sleeps between two
//! scheduled attempts while the broker is unreachable. It is parameterized by:
//! - [`BackoffPolicy::first`] the delay after a cycle with zero recorded failures;
//! - [`BackoffPolicy::factor`] the multiplicative growth per recorded failure;
//! - [`BackoffPolicy::max`] the delay cap.
//!
//! The delay for a supervisor holding `n` consecutive failures is
//! `first × factor^n`, clamped to `max`, then jitter is applied. The base is
//! derived from the failure count alone, so jitter never feeds back into later
//! delays.
//!
//! With `factor = 1.0` the policy is a fixed period, which is what the default
//! configuration builds (`reconnect-interval-seconds` every tick).
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use mqvisor::{BackoffPolicy, JitterPolicy};
//!
//! let pacing = BackoffPolicy {
//!     first: Duration::from_secs(5),
//!     max: Duration::from_secs(60),
//!     factor: 2.0,
//!     jitter: JitterPolicy::None,
//! };
//!
//! assert_eq!(pacing.next(0), Duration::from_secs(5));
//! assert_eq!(pacing.next(2), Duration::from_secs(20));
//! assert_eq!(pacing.next(10), Duration::from_secs(60));
//! ```

use std::time::Duration;

use crate::policies::jitter::JitterPolicy;

/// Delay policy for the reconnect loop.
#[derive(Clone, Copy, Debug)]
pub struct BackoffPolicy {
    /// Delay when no failure has been recorded yet.
    pub first: Duration,
    /// Maximum delay between two scheduled attempts.
    pub max: Duration,
    /// Multiplicative growth factor (`>= 1.0`).
    pub factor: f64,
    /// Randomization applied on top of the computed base.
    pub jitter: JitterPolicy,
}

impl Default for BackoffPolicy {
    /// Fixed 30s period without jitter.
    fn default() -> Self {
        Self::fixed(Duration::from_secs(30))
    }
}

impl BackoffPolicy {
    /// Constant-period policy: every delay equals `period`.
    pub fn fixed(period: Duration) -> Self {
        Self {
            first: period,
            max: period,
            factor: 1.0,
            jitter: JitterPolicy::None,
        }
    }

    /// Computes the delay before the next scheduled attempt, given the number
    /// of consecutive failures the supervisor currently holds.
    ///
    /// Non-finite or negative intermediate values clamp to [`BackoffPolicy::max`].
    pub fn next(&self, failures: u32) -> Duration {
        let max_secs = self.max.as_secs_f64();
        let exp = failures.min(i32::MAX as u32) as i32;
        let raw = self.first.as_secs_f64() * self.factor.powi(exp);

        let base = if !raw.is_finite() || raw < 0.0 || raw > max_secs {
            self.max
        } else {
            Duration::from_secs_f64(raw)
        };

        match self.jitter {
            JitterPolicy::Decorrelated => {
                self.jitter
                    .apply_decorrelated(self.first.min(self.max), base, self.max)
            }
            _ => self.jitter.apply(base),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exp(first_ms: u64, max_ms: u64, factor: f64, jitter: JitterPolicy) -> BackoffPolicy {
        BackoffPolicy {
            first: Duration::from_millis(first_ms),
            max: Duration::from_millis(max_ms),
            factor,
            jitter,
        }
    }

    #[test]
    fn test_fixed_period_ignores_failures() {
        let policy = BackoffPolicy::fixed(Duration::from_secs(30));
        for failures in [0, 1, 5, 29, 30] {
            assert_eq!(policy.next(failures), Duration::from_secs(30));
        }
    }

    #[test]
    fn test_default_matches_default_interval() {
        assert_eq!(BackoffPolicy::default().next(7), Duration::from_secs(30));
    }

    #[test]
    fn test_growth_per_failure() {
        let policy = exp(1_000, 60_000, 2.0, JitterPolicy::None);
        assert_eq!(policy.next(0), Duration::from_secs(1));
        assert_eq!(policy.next(1), Duration::from_secs(2));
        assert_eq!(policy.next(3), Duration::from_secs(8));
        assert_eq!(policy.next(6), Duration::from_secs(60));
    }

    #[test]
    fn test_first_above_max_is_capped() {
        let policy = exp(10_000, 5_000, 1.0, JitterPolicy::None);
        assert_eq!(policy.next(0), Duration::from_secs(5));
    }

    #[test]
    fn test_overflow_clamps_to_max() {
        let policy = exp(100, 10_000, 2.0, JitterPolicy::None);
        assert_eq!(policy.next(u32::MAX), Duration::from_secs(10));
    }

    #[test]
    fn test_equal_jitter_stays_within_half_and_base() {
        let policy = exp(1_000, 30_000, 1.0, JitterPolicy::Equal);
        for failures in 0..30 {
            let delay = policy.next(failures);
            assert!(delay >= Duration::from_millis(500));
            assert!(delay <= Duration::from_millis(1_000));
        }
    }

    #[test]
    fn test_full_jitter_never_exceeds_base() {
        let policy = exp(2_000, 30_000, 1.0, JitterPolicy::Full);
        for failures in 0..30 {
            assert!(policy.next(failures) <= Duration::from_secs(2));
        }
    }

    #[test]
    fn test_decorrelated_respects_floor_and_cap() {
        let policy = exp(100, 30_000, 2.0, JitterPolicy::Decorrelated);
        for _ in 0..100 {
            let delay = policy.next(8);
            assert!(delay >= Duration::from_millis(100));
            assert!(delay <= Duration::from_secs(30));
        }
    }
}
