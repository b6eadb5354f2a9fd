//! Error types for the Wind+ bridge.

use thiserror::Error;

/// Failure reported by a [`RegisterClient`](crate::client::RegisterClient).
///
/// Every transport, timeout and protocol fault is folded into one of these
/// two kinds at the client boundary. The message keeps the original cause
/// for logging only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The serial transport could not be opened or configured.
    #[error("Failed to open serial port {port}: {message}")]
    Connect { port: String, message: String },

    /// A register read failed (timeout, malformed response, exception).
    #[error("Register read failed: {0}")]
    Read(String),
}

impl ClientError {
    /// Create a read error.
    pub fn read(msg: impl Into<String>) -> Self {
        Self::Read(msg.into())
    }

    /// Short label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::Connect { .. } => "connect",
            ClientError::Read(_) => "read",
        }
    }
}

/// A register block that does not match the register map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Register block has {actual} values, expected {expected}")]
pub struct BlockLengthError {
    pub expected: usize,
    pub actual: usize,
}

/// Fatal outcome of the poll loop.
#[derive(Debug, Error)]
pub enum BridgeFault {
    /// The error budget was exhausted; the transport has been released.
    #[error("Connection lost after {failures} consecutive failures: {cause}")]
    ConnectionLost { failures: u32, cause: ClientError },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_display() {
        let err = ClientError::Connect {
            port: "/dev/ttyUSB0".to_string(),
            message: "No such file or directory".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to open serial port /dev/ttyUSB0: No such file or directory"
        );
        assert_eq!(err.kind(), "connect");
        assert_eq!(ClientError::read("timeout").kind(), "read");
    }

    #[test]
    fn test_connection_lost_display() {
        let fault = BridgeFault::ConnectionLost {
            failures: 2,
            cause: ClientError::read("timeout"),
        };
        assert_eq!(
            fault.to_string(),
            "Connection lost after 2 consecutive failures: Register read failed: timeout"
        );
    }
}
