//! Poll/reconnect state machine.
//!
//! One tick performs at most one connect or read attempt. Connect and read
//! failures share a single consecutive-error budget; reaching
//! [`MAX_ERRORS`] releases the transport and stops the bridge for good.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use windsight_bridge_framework::{AttributeUpdate, PublishStats};

use crate::client::RegisterClient;
use crate::error::{BridgeFault, ClientError};
use crate::registers::{self, Attribute, BASE_ADDRESS, REGISTER_COUNT};
use crate::service::ServiceInfo;
use crate::sink::{PublishSink, SinkFactory};

/// Consecutive failures after which the bridge stops.
pub const MAX_ERRORS: u32 = 2;

/// Lifecycle state of a [`TelemetryBridge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BridgeState {
    /// Nothing attempted yet.
    #[default]
    Idle,
    /// The next tick opens the transport.
    Connecting,
    /// The next tick reads the register window.
    Polling,
    /// A failure was counted and awaits resolution.
    Faulting,
    /// Error budget exhausted; terminal.
    Stopped,
}

/// Timing and transport settings of the poll loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeSettings {
    /// Serial device path.
    pub port: String,
    /// Response timeout, also bounding each read.
    pub timeout: Duration,
    /// Fixed wait after every tick.
    pub poll_interval: Duration,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            port: "/dev/ttyUSB0".to_string(),
            timeout: Duration::from_secs(1),
            poll_interval: Duration::from_secs(1),
        }
    }
}

/// Drives a [`RegisterClient`] and forwards decoded telemetry to a
/// [`PublishSink`] created lazily on the first successful read.
pub struct TelemetryBridge<C, F: SinkFactory> {
    client: C,
    factory: F,
    sink: Option<F::Sink>,
    service: ServiceInfo,
    settings: BridgeSettings,
    state: BridgeState,
    error_budget: u32,
    last_error: Option<ClientError>,
    stats: PublishStats,
}

impl<C: RegisterClient, F: SinkFactory> TelemetryBridge<C, F> {
    pub fn new(client: C, factory: F, service: ServiceInfo, settings: BridgeSettings) -> Self {
        Self {
            client,
            factory,
            sink: None,
            service,
            settings,
            state: BridgeState::Idle,
            error_budget: 0,
            last_error: None,
            stats: PublishStats::default(),
        }
    }

    pub fn state(&self) -> BridgeState {
        self.state
    }

    /// Consecutive failures counted so far.
    pub fn error_budget(&self) -> u32 {
        self.error_budget
    }

    /// Most recent failure, cleared by a successful read.
    pub fn last_error(&self) -> Option<&ClientError> {
        self.last_error.as_ref()
    }

    pub fn sink_created(&self) -> bool {
        self.sink.is_some()
    }

    pub fn sink(&self) -> Option<&F::Sink> {
        self.sink.as_ref()
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn service(&self) -> &ServiceInfo {
        &self.service
    }

    pub fn settings(&self) -> &BridgeSettings {
        &self.settings
    }

    /// Publish outcomes accumulated over the bridge lifetime.
    pub fn publish_stats(&self) -> PublishStats {
        self.stats
    }

    /// Run one tick.
    ///
    /// Returns the state after the tick, or [`BridgeFault::ConnectionLost`]
    /// on the tick that exhausts the error budget. Ticks in `Stopped` do
    /// nothing.
    pub async fn tick(&mut self) -> Result<BridgeState, BridgeFault> {
        let outcome = match self.state {
            BridgeState::Stopped => return Ok(BridgeState::Stopped),
            BridgeState::Idle | BridgeState::Connecting | BridgeState::Faulting => {
                self.state = BridgeState::Connecting;
                self.try_connect().await
            }
            BridgeState::Polling => self.poll().await,
        };

        if let Err(cause) = outcome {
            self.fail(cause);
            self.resolve_fault().await?;
        }

        Ok(self.state)
    }

    /// Tick every `poll_interval` until the budget is exhausted or
    /// `shutdown` is cancelled. A bridge that already stopped returns its
    /// fault immediately.
    ///
    /// Cancellation is observed between ticks; the transport is released
    /// before returning `Ok(())`.
    pub async fn run(&mut self, shutdown: CancellationToken) -> Result<(), BridgeFault> {
        if self.state == BridgeState::Stopped {
            return Err(self.connection_lost());
        }

        tracing::info!(
            service = %self.service.name,
            port = %self.settings.port,
            interval_ms = self.settings.poll_interval.as_millis() as u64,
            "Starting poll loop"
        );

        loop {
            if let Err(fault) = self.tick().await {
                tracing::error!(
                    service = %self.service.name,
                    error = %fault,
                    published = self.stats.success,
                    "Poll loop stopped"
                );
                return Err(fault);
            }

            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    tracing::info!(service = %self.service.name, "Poll loop cancelled");
                    self.client.disconnect().await;
                    return Ok(());
                }
                _ = tokio::time::sleep(self.settings.poll_interval) => {}
            }
        }
    }

    async fn try_connect(&mut self) -> Result<(), ClientError> {
        let port = self.settings.port.clone();
        self.client.connect(&port, self.settings.timeout).await?;

        tracing::info!(port = %port, "Connected to controller");
        self.state = BridgeState::Polling;
        Ok(())
    }

    async fn poll(&mut self) -> Result<(), ClientError> {
        let block = self
            .client
            .read_registers(BASE_ADDRESS, REGISTER_COUNT)
            .await?;
        let attributes = registers::decode(&block).map_err(|e| ClientError::read(e.to_string()))?;

        self.error_budget = 0;
        self.last_error = None;

        self.ensure_sink().await;
        self.publish(attributes).await;
        Ok(())
    }

    fn fail(&mut self, cause: ClientError) {
        self.error_budget = (self.error_budget + 1).min(MAX_ERRORS);
        self.state = BridgeState::Faulting;

        tracing::warn!(
            kind = cause.kind(),
            error = %cause,
            errors = self.error_budget,
            max_errors = MAX_ERRORS,
            "Poll attempt failed"
        );
        self.last_error = Some(cause);
    }

    async fn resolve_fault(&mut self) -> Result<(), BridgeFault> {
        if self.error_budget < MAX_ERRORS {
            self.state = BridgeState::Connecting;
            return Ok(());
        }

        self.client.disconnect().await;
        self.state = BridgeState::Stopped;
        Err(self.connection_lost())
    }

    fn connection_lost(&self) -> BridgeFault {
        let cause = self
            .last_error
            .clone()
            .unwrap_or_else(|| ClientError::read("unknown failure"));
        BridgeFault::ConnectionLost {
            failures: self.error_budget,
            cause,
        }
    }

    async fn ensure_sink(&mut self) {
        if self.sink.is_some() {
            return;
        }

        match self.factory.create(&self.service).await {
            Ok(sink) => self.sink = Some(sink),
            Err(e) => tracing::warn!(
                service = %self.service.name,
                error = %e,
                "Service registration failed, retrying on next read"
            ),
        }
    }

    async fn publish(&mut self, attributes: Vec<Attribute>) {
        let Some(sink) = self.sink.as_mut() else {
            return;
        };

        let timestamp = chrono::Utc::now().timestamp_millis();
        let mut tick_stats = PublishStats::default();

        for attribute in attributes {
            let update = AttributeUpdate {
                timestamp,
                service: self.service.name.clone(),
                path: attribute.path.to_string(),
                value: attribute.value,
            };
            let outcome = sink.publish(update).await;
            if let Err(ref e) = outcome {
                tracing::warn!(path = attribute.path, error = %e, "Failed to publish attribute");
            }
            tick_stats.record(&outcome);
        }

        self.stats.success += tick_stats.success;
        self.stats.failed += tick_stats.failed;

        tracing::debug!(
            published = tick_stats.success,
            failed = tick_stats.failed,
            "Published telemetry"
        );
    }
}
