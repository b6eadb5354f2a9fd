//! CLI argument parsing for bridges.

use std::path::PathBuf;

use clap::Args;

use crate::LoggingConfig;

/// Common CLI arguments for all bridges.
///
/// Meant to be flattened into a bridge's own argument struct:
///
/// ```ignore
/// #[derive(clap::Parser)]
/// struct Cli {
///     #[command(flatten)]
///     bridge: BridgeArgs,
///     #[arg(short, long)]
///     serial: Option<String>,
/// }
/// ```
#[derive(Args, Debug, Clone, Default)]
pub struct BridgeArgs {
    /// Path to configuration file (JSON5). Built-in defaults are used when omitted.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Set logging level to debug.
    #[arg(short, long)]
    pub debug: bool,
}

impl BridgeArgs {
    /// Resolve the effective logging configuration.
    ///
    /// `--log-level` wins over `--debug`, which wins over the configured level.
    pub fn logging(&self, configured: &LoggingConfig) -> LoggingConfig {
        match (&self.log_level, self.debug) {
            (Some(level), _) => configured.with_level(level.clone()),
            (None, true) => configured.with_level("debug"),
            (None, false) => configured.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct Cli {
        #[command(flatten)]
        bridge: BridgeArgs,
    }

    #[test]
    fn test_args_without_config() {
        let cli = Cli::try_parse_from(["bridge"]).unwrap();
        assert!(cli.bridge.config.is_none());
        assert!(!cli.bridge.debug);
    }

    #[test]
    fn test_args_flags() {
        let cli = Cli::try_parse_from(["bridge", "-c", "windplus.json5", "-d"]).unwrap();
        assert_eq!(cli.bridge.config, Some(PathBuf::from("windplus.json5")));
        assert!(cli.bridge.debug);
    }

    #[test]
    fn test_logging_precedence() {
        let configured = LoggingConfig::default();

        let args = BridgeArgs::default();
        assert_eq!(args.logging(&configured).level, "info");

        let args = BridgeArgs {
            debug: true,
            ..Default::default()
        };
        assert_eq!(args.logging(&configured).level, "debug");

        let args = BridgeArgs {
            debug: true,
            log_level: Some("trace".to_string()),
            ..Default::default()
        };
        assert_eq!(args.logging(&configured).level, "trace");
    }
}
