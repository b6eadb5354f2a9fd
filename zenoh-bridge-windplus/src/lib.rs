//! Zenoh bridge for the Bornay Wind+ MPPT wind charge controller.
//!
//! The bridge polls the controller over Modbus RTU (57600-8-N-1, unit 1),
//! reads the 31 holding registers starting at 5000 once per tick, scales
//! them and republishes each one as a named attribute.
//!
//! # Key Expressions
//!
//! ```text
//! <prefix>/<service>/<group>/<name>
//! <prefix>/<service>/@/alive
//! <prefix>/@/status
//! ```
//!
//! Where:
//! - `<prefix>` - Key prefix from configuration (default `windsight`)
//! - `<service>` - `com.victronenergy.windcharger.bornay_<tty>` unless overridden
//! - `<group>/<name>` - Attribute path, e.g. `Turbine/RPM` or `Dc/0/Voltage`
//!
//! The service is registered (liveliness token and management attributes)
//! on the first successful read, not at startup.

pub mod bridge;
pub mod client;
pub mod config;
pub mod error;
pub mod registers;
pub mod service;
pub mod sink;

pub use bridge::{BridgeSettings, BridgeState, MAX_ERRORS, TelemetryBridge};
pub use client::{ConnectionState, RegisterClient, RtuRegisterClient};
pub use config::{WindplusBridgeConfig, WindplusConfig};
pub use error::{BridgeFault, ClientError};
pub use registers::{Attribute, RegisterBlock};
pub use service::ServiceInfo;
pub use sink::{PublishSink, SinkFactory, ZenohSink, ZenohSinkFactory};
