//! Bridge runner for lifecycle management.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use tokio::signal;
use tokio_util::sync::CancellationToken;

use windsight_common::{connect, init_tracing};

use crate::BridgeArgs;
use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result};
use crate::publisher::Publisher;
use crate::status::StatusPublisher;

/// Bridge runner that manages the lifecycle of a bridge.
///
/// Handles:
/// - Logging initialization
/// - Zenoh connection
/// - Status publishing (optional)
/// - Driving the bridge worker until it finishes or Ctrl+C is received
/// - Graceful shutdown through a [`CancellationToken`]
pub struct BridgeRunner<C: BridgeConfig> {
    /// Bridge name for logging and status.
    name: String,
    /// Bridge version.
    version: String,
    /// The loaded configuration.
    config: C,
    /// Zenoh session.
    session: Arc<zenoh::Session>,
    /// Publisher for attribute updates.
    publisher: Publisher,
    /// Status publisher (optional).
    status_publisher: Option<StatusPublisher>,
    /// Cancelled when a shutdown signal arrives.
    shutdown: CancellationToken,
}

impl<C: BridgeConfig> BridgeRunner<C> {
    /// Create a new bridge runner with CLI args for log level override.
    ///
    /// This will:
    /// 1. Initialize logging based on config and CLI overrides
    /// 2. Connect to Zenoh
    /// 3. Create the publisher
    pub async fn new_with_args(
        name: impl Into<String>,
        config: C,
        args: Option<&BridgeArgs>,
    ) -> Result<Self> {
        let name = name.into();
        let version = env!("CARGO_PKG_VERSION").to_string();

        let log_config = match args {
            Some(args) => args.logging(config.logging()),
            None => config.logging().clone(),
        };

        init_tracing(&log_config).map_err(|e| BridgeError::config(e.to_string()))?;

        tracing::info!(bridge = %name, version = %version, "Starting bridge");

        let session = Arc::new(
            connect(config.zenoh())
                .await
                .map_err(|e| BridgeError::ZenohConnection(e.to_string()))?,
        );

        let publisher = Publisher::new(session.clone(), config.key_prefix(), config.format());

        Ok(Self {
            name,
            version,
            config,
            session,
            publisher,
            status_publisher: None,
            shutdown: CancellationToken::new(),
        })
    }

    /// Enable status publishing.
    ///
    /// When enabled, the runner publishes "running" on startup, and "offline"
    /// or "error" depending on how the worker finished.
    pub fn with_status_publishing(mut self) -> Self {
        self.status_publisher = Some(StatusPublisher::new(
            self.publisher.clone(),
            &self.name,
            &self.version,
        ));
        self
    }

    /// Get the bridge name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the bridge version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &C {
        &self.config
    }

    /// Get a reference to the Zenoh session.
    pub fn session(&self) -> &Arc<zenoh::Session> {
        &self.session
    }

    /// Get a clone of the publisher.
    pub fn publisher(&self) -> Publisher {
        self.publisher.clone()
    }

    /// Token cancelled when the bridge is asked to shut down.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Drive `worker` until it completes or Ctrl+C is received.
    ///
    /// On Ctrl+C the shutdown token is cancelled and the worker is awaited so
    /// it can release its resources. The worker's own result is returned to
    /// the caller once the status has been published and the Zenoh session
    /// closed.
    pub async fn run_until_done<F, E>(
        self,
        metadata: Option<serde_json::Value>,
        worker: F,
    ) -> Result<std::result::Result<(), E>>
    where
        F: Future<Output = std::result::Result<(), E>>,
        E: Display,
    {
        if let Some(ref status_pub) = self.status_publisher {
            if let Err(e) = status_pub.publish_running(metadata).await {
                tracing::warn!(error = %e, "Failed to publish running status");
            }
        }

        tracing::info!(bridge = %self.name, "Bridge running. Press Ctrl+C to stop.");

        tokio::pin!(worker);

        let finished = tokio::select! {
            outcome = &mut worker => Some(outcome),
            _ = wait_for_ctrl_c() => None,
        };

        let outcome = match finished {
            Some(outcome) => outcome,
            None => {
                tracing::info!(bridge = %self.name, "Received shutdown signal");
                self.shutdown.cancel();
                worker.await
            }
        };

        if let Some(ref status_pub) = self.status_publisher {
            let published = match &outcome {
                Ok(()) => status_pub.publish_offline().await,
                Err(e) => status_pub.publish_error(e.to_string()).await,
            };
            if let Err(e) = published {
                tracing::warn!(error = %e, "Failed to publish final status");
            }
        }

        if let Err(e) = self.session.close().await {
            tracing::warn!(error = %e, "Error closing Zenoh session");
        }

        tracing::info!(bridge = %self.name, "Goodbye!");

        Ok(outcome)
    }
}

/// Resolve on Ctrl+C. If the signal handler cannot be installed the bridge
/// keeps running until its worker finishes.
async fn wait_for_ctrl_c() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}
