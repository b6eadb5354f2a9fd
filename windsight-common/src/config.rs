use serde::{Deserialize, Serialize};

/// Common Zenoh connection configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZenohConfig {
    /// Zenoh mode: "client", "peer", or "router".
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Endpoints to connect to (for client mode).
    #[serde(default)]
    pub connect: Vec<String>,

    /// Endpoints to listen on (for peer/router mode).
    #[serde(default)]
    pub listen: Vec<String>,
}

fn default_mode() -> String {
    "peer".to_string()
}

impl Default for ZenohConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            connect: Vec::new(),
            listen: Vec::new(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format (default).
    #[default]
    Text,
    /// Structured JSON format.
    Json,
}

/// Common logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or `EnvFilter` directive: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format: "text" or "json".
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl LoggingConfig {
    /// Same configuration with a different level.
    pub fn with_level(&self, level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            format: self.format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_zenoh_config() {
        let json5 = r#"
        {
            mode: "client",
            connect: ["tcp/192.168.1.2:7447"],
        }
        "#;

        let config: ZenohConfig = json5::from_str(json5).unwrap();

        assert_eq!(config.mode, "client");
        assert_eq!(config.connect, vec!["tcp/192.168.1.2:7447"]);
        assert!(config.listen.is_empty());
    }

    #[test]
    fn test_default_config() {
        let zenoh: ZenohConfig = json5::from_str("{}").unwrap();
        assert_eq!(zenoh, ZenohConfig::default());
        assert_eq!(zenoh.mode, "peer");

        let logging: LoggingConfig = json5::from_str(r#"{ format: "json" }"#).unwrap();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, LogFormat::Json);
    }

    #[test]
    fn test_with_level_keeps_format() {
        let logging = LoggingConfig {
            level: "info".to_string(),
            format: LogFormat::Json,
        };

        let debug = logging.with_level("debug");
        assert_eq!(debug.level, "debug");
        assert_eq!(debug.format, LogFormat::Json);
    }
}
