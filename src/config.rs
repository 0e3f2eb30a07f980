//! # Supervisor configuration.
//!
//! Provides [`SupervisorConfig`], the immutable settings handed to
//! [`SupervisorBuilder`](crate::SupervisorBuilder) and
//! [`MessageSender`](crate::MessageSender).
//!
//! Values are kept in the units operators configure them in (seconds, minutes);
//! use the accessors to get `Duration`s. The struct deserializes from
//! kebab-case keys with every field optional:
//!
//! ```rust
//! use mqvisor::SupervisorConfig;
//!
//! let cfg: SupervisorConfig = serde_json::from_str(r#"{
//!     "queue-name": "ORDERS.IN",
//!     "max-reconnect-attempts": 5,
//!     "reconnect-pause-minutes": 2
//! }"#).unwrap();
//!
//! assert_eq!(cfg.max_reconnect_attempts, 5);
//! assert_eq!(cfg.reconnect_interval_seconds, 30);
//! assert!(cfg.validate().is_ok());
//! ```
//!
//! ## Sentinel values
//! - `health_check_interval_seconds = 0` → health probe disabled
//! - `message_ttl_seconds = 0` → messages never expire
//! - `reconnect_pause_minutes <= 0` → a pause expires immediately (useful in tests)

use std::time::Duration;

use chrono::TimeDelta;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::policies::{BackoffPolicy, JitterPolicy};

/// Settings for the connection supervisor and the send surface.
///
/// ## Field semantics
/// - `max_reconnect_attempts`: consecutive failures tolerated before pausing (`>= 1`)
/// - `reconnect_interval_seconds`: period of the reconnect loop (`>= 1`)
/// - `reconnect_pause_minutes`: pause window once the budget is spent (signed)
/// - `reconnect_backoff_factor`: growth of the reconnect period per failure (`1.0` = fixed)
/// - `reconnect_interval_max_seconds`: cap for the grown period (`0` = same as the interval)
/// - `reconnect_jitter`: randomization of the reconnect period
/// - `health_check_interval_seconds`: live-connection probe period (`0` = disabled)
/// - `queue_name`: destination used by the send surface
/// - `message_ttl_seconds`: expiry set on outbound messages (`0` = none)
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SupervisorConfig {
    /// Consecutive failed attempts before the supervisor pauses.
    pub max_reconnect_attempts: u32,
    /// Reconnect loop period.
    pub reconnect_interval_seconds: u64,
    /// Pause window length; may be zero or negative.
    pub reconnect_pause_minutes: i64,
    /// Per-failure growth of the reconnect period.
    pub reconnect_backoff_factor: f64,
    /// Upper bound for the grown reconnect period.
    pub reconnect_interval_max_seconds: u64,
    /// Jitter applied to the reconnect period.
    pub reconnect_jitter: JitterPolicy,
    /// Health probe period while connected.
    pub health_check_interval_seconds: u64,
    /// Destination queue for outbound messages.
    pub queue_name: String,
    /// Time-to-live of outbound messages.
    pub message_ttl_seconds: u64,
}

impl SupervisorConfig {
    /// Reconnect loop period as a `Duration`.
    #[inline]
    pub fn reconnect_interval(&self) -> Duration {
        Duration::from_secs(self.reconnect_interval_seconds)
    }

    /// Pause window as a signed `TimeDelta`, suitable for timestamp arithmetic.
    ///
    /// Out-of-range values saturate toward their own sign, so a huge negative
    /// pause still expires immediately.
    #[inline]
    pub fn reconnect_pause(&self) -> TimeDelta {
        TimeDelta::try_minutes(self.reconnect_pause_minutes).unwrap_or(
            if self.reconnect_pause_minutes < 0 {
                TimeDelta::MIN
            } else {
                TimeDelta::MAX
            },
        )
    }

    /// Health probe period, `None` when disabled.
    #[inline]
    pub fn health_check_interval(&self) -> Option<Duration> {
        match self.health_check_interval_seconds {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Message TTL, `None` when messages never expire.
    #[inline]
    pub fn message_ttl(&self) -> Option<Duration> {
        match self.message_ttl_seconds {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Pacing policy of the reconnect loop.
    pub fn reconnect_backoff(&self) -> BackoffPolicy {
        let first = self.reconnect_interval();
        let max = match self.reconnect_interval_max_seconds {
            0 => first,
            secs => Duration::from_secs(secs).max(first),
        };
        BackoffPolicy {
            first,
            max,
            factor: self.reconnect_backoff_factor,
            jitter: self.reconnect_jitter,
        }
    }

    /// Checks the values the supervisor relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_reconnect_attempts == 0 {
            return Err(ConfigError::Invalid {
                field: "max-reconnect-attempts",
                reason: "must be at least 1".into(),
            });
        }
        if self.reconnect_interval_seconds == 0 {
            return Err(ConfigError::Invalid {
                field: "reconnect-interval-seconds",
                reason: "must be at least 1".into(),
            });
        }
        if !self.reconnect_backoff_factor.is_finite() || self.reconnect_backoff_factor < 1.0 {
            return Err(ConfigError::Invalid {
                field: "reconnect-backoff-factor",
                reason: format!("{} is not a finite value >= 1.0", self.reconnect_backoff_factor),
            });
        }
        if self.queue_name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "queue-name",
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }
}

impl Default for SupervisorConfig {
    /// Default configuration:
    ///
    /// - 30 attempts, then a 30 minute pause
    /// - reconnect every 30s, fixed period, no jitter
    /// - health probe every 10s
    /// - queue `DEV.QUEUE.1`, 10s message TTL
    fn default() -> Self {
        Self {
            max_reconnect_attempts: 30,
            reconnect_interval_seconds: 30,
            reconnect_pause_minutes: 30,
            reconnect_backoff_factor: 1.0,
            reconnect_interval_max_seconds: 0,
            reconnect_jitter: JitterPolicy::None,
            health_check_interval_seconds: 10,
            queue_name: "DEV.QUEUE.1".to_string(),
            message_ttl_seconds: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = SupervisorConfig::default();
        assert_eq!(cfg.max_reconnect_attempts, 30);
        assert_eq!(cfg.reconnect_interval(), Duration::from_secs(30));
        assert_eq!(cfg.reconnect_pause(), TimeDelta::minutes(30));
        assert_eq!(cfg.health_check_interval(), Some(Duration::from_secs(10)));
        assert_eq!(cfg.message_ttl(), Some(Duration::from_secs(10)));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_default_backoff_is_fixed_interval() {
        let backoff = SupervisorConfig::default().reconnect_backoff();
        assert_eq!(backoff.next(0), Duration::from_secs(30));
        assert_eq!(backoff.next(29), Duration::from_secs(30));
    }

    #[test]
    fn test_growing_backoff_is_capped() {
        let cfg = SupervisorConfig {
            reconnect_interval_seconds: 2,
            reconnect_backoff_factor: 2.0,
            reconnect_interval_max_seconds: 10,
            ..SupervisorConfig::default()
        };
        let backoff = cfg.reconnect_backoff();
        assert_eq!(backoff.next(1), Duration::from_secs(4));
        assert_eq!(backoff.next(5), Duration::from_secs(10));
    }

    #[test]
    fn test_zero_sentinels_disable() {
        let cfg = SupervisorConfig {
            health_check_interval_seconds: 0,
            message_ttl_seconds: 0,
            ..SupervisorConfig::default()
        };
        assert_eq!(cfg.health_check_interval(), None);
        assert_eq!(cfg.message_ttl(), None);
    }

    #[test]
    fn test_negative_pause_is_allowed() {
        let cfg = SupervisorConfig {
            reconnect_pause_minutes: -1,
            ..SupervisorConfig::default()
        };
        assert_eq!(cfg.reconnect_pause(), TimeDelta::minutes(-1));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_pause_keeps_its_sign() {
        let huge_negative = SupervisorConfig {
            reconnect_pause_minutes: i64::MIN,
            ..SupervisorConfig::default()
        };
        assert_eq!(huge_negative.reconnect_pause(), TimeDelta::MIN);
        assert!(huge_negative.reconnect_pause() < TimeDelta::zero());

        let huge_positive = SupervisorConfig {
            reconnect_pause_minutes: i64::MAX,
            ..SupervisorConfig::default()
        };
        assert_eq!(huge_positive.reconnect_pause(), TimeDelta::MAX);
    }

    #[test]
    fn test_configured_jitter_reaches_reconnect_delay() {
        let full = SupervisorConfig {
            reconnect_interval_seconds: 10,
            reconnect_jitter: JitterPolicy::Full,
            ..SupervisorConfig::default()
        }
        .reconnect_backoff();
        let equal = SupervisorConfig {
            reconnect_interval_seconds: 10,
            reconnect_jitter: JitterPolicy::Equal,
            ..SupervisorConfig::default()
        }
        .reconnect_backoff();

        let interval = Duration::from_secs(10);
        let mut full_samples = Vec::new();
        for failures in 0..64 {
            let d = full.next(failures);
            assert!(d <= interval);
            full_samples.push(d);

            let d = equal.next(failures);
            assert!(d >= interval / 2 && d <= interval);
        }
        // 64 draws from [0, 10s] all landing on one value would mean jitter was dropped.
        assert!(full_samples.iter().any(|d| *d != full_samples[0]));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero_attempts = SupervisorConfig {
            max_reconnect_attempts: 0,
            ..SupervisorConfig::default()
        };
        assert!(matches!(
            zero_attempts.validate(),
            Err(ConfigError::Invalid { field: "max-reconnect-attempts", .. })
        ));

        let shrinking = SupervisorConfig {
            reconnect_backoff_factor: 0.5,
            ..SupervisorConfig::default()
        };
        assert!(shrinking.validate().is_err());

        let no_queue = SupervisorConfig {
            queue_name: "  ".into(),
            ..SupervisorConfig::default()
        };
        assert!(no_queue.validate().is_err());
    }

    #[test]
    fn test_deserialize_partial_kebab_case() {
        let cfg: SupervisorConfig = serde_json::from_str(
            r#"{"reconnect-interval-seconds": 5, "reconnect-jitter": "full"}"#,
        )
        .unwrap();
        assert_eq!(cfg.reconnect_interval_seconds, 5);
        assert_eq!(cfg.reconnect_jitter, JitterPolicy::Full);
        assert_eq!(cfg.max_reconnect_attempts, 30);
    }
}
