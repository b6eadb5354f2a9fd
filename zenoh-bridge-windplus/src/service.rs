//! Service identity and management attributes.

use std::path::Path;

use windsight_common::AttributeValue;

/// Service name prefix for wind chargers on the supervisory bus.
pub const SERVICE_PREFIX: &str = "com.victronenergy.windcharger";

pub const PRODUCT_NAME: &str = "Bornay Wind+ MPPT";
pub const PRODUCT_ID: i64 = 0;
pub const HARDWARE_VERSION: f64 = 1.01;
pub const CONNECTION_LABEL: &str = "ModBus RTU";

/// Identity under which telemetry is published.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceInfo {
    /// Bus service name.
    pub name: String,
    /// Device instance announced to the supervisory system.
    pub device_instance: u32,
    pub process_name: String,
    pub process_version: String,
    pub firmware_version: String,
    pub connection: String,
}

impl ServiceInfo {
    /// Service info for this process, published under `name`.
    pub fn new(name: impl Into<String>, device_instance: u32) -> Self {
        let version = env!("CARGO_PKG_VERSION");
        Self {
            name: name.into(),
            device_instance,
            process_name: env!("CARGO_PKG_NAME").to_string(),
            process_version: format!("Version {} running on Rust", version),
            firmware_version: version.to_string(),
            connection: CONNECTION_LABEL.to_string(),
        }
    }

    /// Attributes published once when the service is registered.
    pub fn management_attributes(&self) -> Vec<(&'static str, AttributeValue)> {
        vec![
            ("/Management/ProcessName", self.process_name.as_str().into()),
            (
                "/Management/ProcessVersion",
                self.process_version.as_str().into(),
            ),
            ("/Management/Connection", self.connection.as_str().into()),
            ("/DeviceInstance", self.device_instance.into()),
            ("/ProductId", PRODUCT_ID.into()),
            ("/ProductName", PRODUCT_NAME.into()),
            ("/FirmwareVersion", self.firmware_version.as_str().into()),
            ("/HardwareVersion", HARDWARE_VERSION.into()),
            ("/Connected", 1i64.into()),
        ]
    }
}

/// Default service name for a serial port: `<prefix>.bornay_<tty>`.
pub fn service_name_for_port(port: &str) -> String {
    let tty = Path::new(port)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| port.to_string());

    format!("{}.bornay_{}", SERVICE_PREFIX, tty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_name_for_port() {
        assert_eq!(
            service_name_for_port("/dev/ttyUSB0"),
            "com.victronenergy.windcharger.bornay_ttyUSB0"
        );
        assert_eq!(
            service_name_for_port("ttyS1"),
            "com.victronenergy.windcharger.bornay_ttyS1"
        );
    }

    #[test]
    fn test_management_attributes() {
        let info = ServiceInfo::new("svc", 3);
        let attributes = info.management_attributes();

        assert_eq!(attributes.len(), 9);
        assert!(attributes.contains(&("/DeviceInstance", AttributeValue::Integer(3))));
        assert!(attributes.contains(&("/Connected", AttributeValue::Integer(1))));
        assert!(attributes.contains(&("/HardwareVersion", AttributeValue::Float(1.01))));
        assert!(attributes.contains(&(
            "/ProductName",
            AttributeValue::Text("Bornay Wind+ MPPT".to_string())
        )));
        assert!(attributes.contains(&(
            "/Management/Connection",
            AttributeValue::Text("ModBus RTU".to_string())
        )));
    }

    #[test]
    fn test_process_version() {
        let info = ServiceInfo::new("svc", 0);
        assert!(info.process_version.starts_with("Version "));
        assert!(info.process_version.ends_with(" running on Rust"));
        assert_eq!(info.process_name, "zenoh-bridge-windplus");
    }
}
