//! Zenoh bridge for the Bornay Wind+ MPPT controller.
//!
//! Polls the controller over Modbus RTU and publishes its telemetry as
//! named attributes on Zenoh.

use anyhow::{Context, Result};
use clap::Parser;
use windsight_bridge_framework::{BridgeArgs, BridgeConfig, BridgeRunner};
use zenoh_bridge_windplus::config::WindplusBridgeConfig;
use zenoh_bridge_windplus::registers::{BASE_ADDRESS, REGISTER_COUNT};
use zenoh_bridge_windplus::sink::ZenohSinkFactory;
use zenoh_bridge_windplus::{RtuRegisterClient, TelemetryBridge};

/// Zenoh bridge for the Bornay Wind+ MPPT wind charge controller.
#[derive(Parser, Debug)]
#[command(name = "zenoh-bridge-windplus")]
#[command(about = "Polls a Bornay Wind+ controller over Modbus RTU and publishes to Zenoh")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    bridge: BridgeArgs,

    /// Service name to publish under.
    #[arg(short, long)]
    name: Option<String>,

    /// Device instance announced with the service.
    #[arg(short = 'i', long = "deviceinstance")]
    device_instance: Option<u32>,

    /// Serial device path.
    #[arg(short, long)]
    serial: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.bridge.config {
        Some(path) => WindplusBridgeConfig::load(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => WindplusBridgeConfig::default(),
    };
    config.apply_overrides(cli.serial.clone(), cli.name.clone(), cli.device_instance);
    config.validate().context("Invalid configuration")?;

    let runner = BridgeRunner::new_with_args("windplus", config, Some(&cli.bridge))
        .await
        .context("Failed to start bridge")?
        .with_status_publishing();

    let windplus = runner.config().windplus.clone();
    let service = windplus.service_info();

    tracing::info!(
        service = %service.name,
        port = %windplus.serial_port,
        device_instance = windplus.device_instance,
        "Loaded configuration"
    );

    let metadata = serde_json::json!({
        "service": service.name,
        "serial_port": windplus.serial_port,
        "device_instance": windplus.device_instance,
        "registers": format!("{}..{}", BASE_ADDRESS, BASE_ADDRESS + REGISTER_COUNT - 1),
    });

    let mut bridge = TelemetryBridge::new(
        RtuRegisterClient::new(),
        ZenohSinkFactory::new(runner.publisher()),
        service,
        windplus.bridge_settings(),
    );

    let shutdown = runner.shutdown_token();
    let outcome = runner
        .run_until_done(Some(metadata), bridge.run(shutdown))
        .await?;

    outcome.context("Connection lost")
}
