//! # Demo: supervised consumers over a flaky broker
//!
//! A simulated broker goes down a few seconds in, stays down long enough to
//! exhaust the attempt budget, then comes back. Watch the supervisor pause,
//! stop the consumers, resume and restart them, while the sender fails fast
//! during the outage.
//!
//! ```text
//! RUST_LOG=info cargo run --example supervised_consumers --features logging
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use mqvisor::{
    Connection, ConnectionFactory, ConnectionSupervisor, ConnectError, ConsumerCoordinator,
    ConsumerRef, ConsumerRegistry, Delivery, LogWriter, MessageSender, SendError, SupervisorConfig,
    TaskConsumer, Transport,
};

/// Broker whose reachability is flipped by the demo.
struct SimulatedBroker {
    up: Arc<AtomicBool>,
}

struct SimulatedSession;

#[async_trait]
impl Connection for SimulatedSession {
    async fn start(&mut self) -> Result<(), ConnectError> {
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ConnectError> {
        Ok(())
    }
}

#[async_trait]
impl ConnectionFactory for SimulatedBroker {
    async fn open(&self) -> Result<Box<dyn Connection>, ConnectError> {
        if self.up.load(Ordering::SeqCst) {
            Ok(Box::new(SimulatedSession))
        } else {
            Err(ConnectError::unavailable("MQRC_HOST_NOT_AVAILABLE"))
        }
    }
}

struct PrintTransport;

#[async_trait]
impl Transport for PrintTransport {
    async fn deliver(&self, d: Delivery) -> Result<(), SendError> {
        tracing::info!(
            queue = %d.destination,
            content_type = d.payload.content_type(),
            bytes = d.payload.len(),
            "delivered"
        );
        Ok(())
    }
}

fn listener(id: &'static str) -> ConsumerRef {
    TaskConsumer::arc(id, move |token: CancellationToken| async move {
        tracing::info!(consumer = id, "listening");
        token.cancelled().await;
        tracing::info!(consumer = id, "listener exited");
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = SupervisorConfig {
        max_reconnect_attempts: 3,
        reconnect_interval_seconds: 1,
        reconnect_pause_minutes: 0,
        health_check_interval_seconds: 1,
        ..SupervisorConfig::default()
    };

    let up = Arc::new(AtomicBool::new(true));
    let registry = ConsumerRegistry::new();
    registry.register(listener("orders")).await?;
    registry.register(listener("payments")).await?;

    let sup = ConnectionSupervisor::builder(cfg, Arc::new(SimulatedBroker { up: up.clone() }))
        .with_subscriber(ConsumerCoordinator::new(registry.clone()))
        .with_subscriber(Arc::new(LogWriter::new()))
        .build()?;
    let sender = MessageSender::from_supervisor(&sup, Arc::new(PrintTransport));

    let token = CancellationToken::new();
    let runner = tokio::spawn(sup.clone().run(token.clone()));

    for second in 0..12u32 {
        match second {
            3 => {
                tracing::warn!("broker goes down");
                up.store(false, Ordering::SeqCst);
            }
            8 => {
                tracing::warn!("broker is back");
                up.store(true, Ordering::SeqCst);
            }
            _ => {}
        }

        if let Err(e) = sender.send_text(format!("tick {second}")).await {
            tracing::warn!(reply = e.public_message(), "send refused");
        }
        tracing::info!(status = ?sup.status(), "status");
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    token.cancel();
    runner.await?;
    Ok(())
}
