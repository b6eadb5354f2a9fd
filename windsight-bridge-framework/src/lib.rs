//! WindSight Bridge Framework
//!
//! Common abstractions for bridges that republish field-bus data as named
//! attributes on Zenoh.
//!
//! # Overview
//!
//! This framework provides:
//! - [`BridgeConfig`] trait for configuration loading and validation
//! - [`BridgeRunner`] for the bridge lifecycle (startup, shutdown, signal handling)
//! - [`Publisher`] for publishing attribute updates with automatic serialization
//! - [`ServiceLiveliness`] for announcing a registered service
//! - [`BridgeArgs`] for common CLI argument parsing
//! - [`BridgeStatus`] for standardized status reporting
//!
//! # Example
//!
//! ```ignore
//! use windsight_bridge_framework::{BridgeConfig, BridgeRunner};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = MyBridgeConfig::load("mybridge.json5")?;
//!     let runner = BridgeRunner::new_with_args("mybridge", config, None).await?;
//!
//!     let shutdown = runner.shutdown_token();
//!     let worker = my_worker(runner.publisher(), shutdown);
//!
//!     // Runs until the worker returns or Ctrl+C is received
//!     runner.run_until_done(None, worker).await?;
//!     Ok(())
//! }
//! ```

mod args;
mod config;
mod error;
mod liveliness;
mod publisher;
mod runner;
mod status;

pub use args::BridgeArgs;
pub use config::BridgeConfig;
pub use error::{BridgeError, Result};
pub use liveliness::ServiceLiveliness;
pub use publisher::{PublishStats, Publisher};
pub use runner::BridgeRunner;
pub use status::{BridgeStatus, StatusPublisher};

pub use tokio_util::sync::CancellationToken;

// Re-export commonly used types from windsight-common
pub use windsight_common::{
    AttributeUpdate, AttributeValue, Format, KeyExprBuilder, LoggingConfig, ZenohConfig,
};
