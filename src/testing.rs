//! Test doubles shared by the unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::{
    consumers::Consumer,
    core::{Connection, ConnectionFactory},
    error::{ConnectError, ConsumerError, SendError},
    events::{Notification, NotificationKind},
    sender::{Delivery, Transport},
    subscribers::Subscribe,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Ok,
    Fail,
}

struct NoopConnection;

#[async_trait]
impl Connection for NoopConnection {
    async fn start(&mut self) -> Result<(), ConnectError> {
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ConnectError> {
        Ok(())
    }
}

/// Factory that replays a script of outcomes, then repeats `fallback`.
pub(crate) struct ScriptedFactory {
    script: Mutex<VecDeque<Outcome>>,
    fallback: Outcome,
    calls: AtomicUsize,
    delay: Mutex<Duration>,
}

impl ScriptedFactory {
    pub(crate) fn new(script: Vec<Outcome>, fallback: Outcome) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            calls: AtomicUsize::new(0),
            delay: Mutex::new(Duration::ZERO),
        }
    }

    pub(crate) fn always(outcome: Outcome) -> Self {
        Self::new(Vec::new(), outcome)
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }
}

#[async_trait]
impl ConnectionFactory for ScriptedFactory {
    async fn open(&self) -> Result<Box<dyn Connection>, ConnectError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let outcome = self.script.lock().unwrap().pop_front().unwrap_or(self.fallback);
        match outcome {
            Outcome::Ok => Ok(Box::new(NoopConnection)),
            Outcome::Fail => Err(ConnectError::unavailable("scripted failure")),
        }
    }
}

/// Subscriber that keeps every notification it sees.
#[derive(Default)]
pub(crate) struct RecordingSubscriber {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingSubscriber {
    pub(crate) fn kinds(&self) -> Vec<NotificationKind> {
        self.seen.lock().unwrap().iter().map(|n| n.kind).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub(crate) fn last(&self) -> Option<Notification> {
        self.seen.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Subscribe for RecordingSubscriber {
    async fn on_notification(&self, n: &Notification) {
        self.seen.lock().unwrap().push(n.clone());
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Consumer whose next `n` starts or stops can be made to fail.
pub(crate) struct FakeConsumer {
    id: String,
    running: AtomicBool,
    start_failures: AtomicU32,
    stop_failures: AtomicU32,
    start_calls: AtomicU32,
    stop_calls: AtomicU32,
}

impl FakeConsumer {
    pub(crate) fn arc(id: &str) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            running: AtomicBool::new(false),
            start_failures: AtomicU32::new(0),
            stop_failures: AtomicU32::new(0),
            start_calls: AtomicU32::new(0),
            stop_calls: AtomicU32::new(0),
        })
    }

    pub(crate) fn fail_starts(&self, n: u32) {
        self.start_failures.store(n, Ordering::SeqCst);
    }

    pub(crate) fn fail_stops(&self, n: u32) {
        self.stop_failures.store(n, Ordering::SeqCst);
    }

    pub(crate) fn is_running_now(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub(crate) fn start_calls(&self) -> u32 {
        self.start_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn stop_calls(&self) -> u32 {
        self.stop_calls.load(Ordering::SeqCst)
    }

    fn take_failure(counter: &AtomicU32) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl Consumer for FakeConsumer {
    fn id(&self) -> &str {
        &self.id
    }

    async fn start(&self) -> Result<(), ConsumerError> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        if Self::take_failure(&self.start_failures) {
            return Err(ConsumerError::Start {
                id: self.id.clone(),
                reason: "listener container refused to start".into(),
            });
        }
        self.running.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) -> Result<(), ConsumerError> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        if Self::take_failure(&self.stop_failures) {
            return Err(ConsumerError::Stop {
                id: self.id.clone(),
                reason: "listener container stuck".into(),
            });
        }
        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.is_running_now()
    }
}

/// Transport that records deliveries, or fails every one.
#[derive(Default)]
pub(crate) struct FakeTransport {
    delivered: Mutex<Vec<Delivery>>,
    failure: Option<String>,
}

impl FakeTransport {
    pub(crate) fn failing(reason: &str) -> Self {
        Self {
            delivered: Mutex::new(Vec::new()),
            failure: Some(reason.to_string()),
        }
    }

    pub(crate) fn deliveries(&self) -> Vec<Delivery> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn deliver(&self, delivery: Delivery) -> Result<(), SendError> {
        if let Some(reason) = &self.failure {
            return Err(SendError::Transport {
                reason: reason.clone(),
            });
        }
        self.delivered.lock().unwrap().push(delivery);
        Ok(())
    }
}
