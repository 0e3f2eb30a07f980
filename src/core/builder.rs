use std::sync::Arc;

use crate::{
    config::SupervisorConfig,
    error::ConfigError,
    events::Bus,
    subscribers::Subscribe,
};

use super::{
    clock::{Clock, SystemClock},
    factory::ConnectionFactory,
    supervisor::ConnectionSupervisor,
};

/// Builder for [`ConnectionSupervisor`].
///
/// Subscribers are notified in the order they were added.
pub struct SupervisorBuilder {
    cfg: SupervisorConfig,
    factory: Arc<dyn ConnectionFactory>,
    subscribers: Vec<Arc<dyn Subscribe>>,
    clock: Arc<dyn Clock>,
}

impl SupervisorBuilder {
    /// Creates a builder with no subscribers and the system clock.
    pub fn new(cfg: SupervisorConfig, factory: Arc<dyn ConnectionFactory>) -> Self {
        Self {
            cfg,
            factory,
            subscribers: Vec::new(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Appends one subscriber.
    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// Appends several subscribers, keeping their order.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers.extend(subscribers);
        self
    }

    /// Replaces the wall clock used for pause windows and timestamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Validates the configuration and builds the supervisor.
    ///
    /// The supervisor starts disconnected with a zero attempt count; nothing
    /// runs until [`ConnectionSupervisor::run`] or an explicit attempt.
    pub fn build(self) -> Result<Arc<ConnectionSupervisor>, ConfigError> {
        self.cfg.validate()?;
        let bus = Bus::new(self.subscribers);
        tracing::debug!(subscribers = bus.len(), "building connection supervisor");

        Ok(Arc::new(ConnectionSupervisor::new_internal(
            self.cfg,
            self.factory,
            bus,
            self.clock,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Outcome, ScriptedFactory};

    #[test]
    fn test_build_rejects_invalid_config() {
        let cfg = SupervisorConfig {
            max_reconnect_attempts: 0,
            ..SupervisorConfig::default()
        };
        let err = SupervisorBuilder::new(cfg, Arc::new(ScriptedFactory::always(Outcome::Ok)))
            .build()
            .err()
            .unwrap();
        assert_eq!(err.as_label(), "config_invalid");
    }

    #[test]
    fn test_build_starts_disconnected() {
        let sup = SupervisorBuilder::new(
            SupervisorConfig::default(),
            Arc::new(ScriptedFactory::always(Outcome::Ok)),
        )
        .build()
        .unwrap();
        assert!(!sup.is_connected());
        assert_eq!(sup.attempt_count(), 0);
        assert!(sup.paused_until().is_none());
    }
}
