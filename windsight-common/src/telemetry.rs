use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// A single attribute update published by a bridge.
///
/// The consuming supervisory system addresses values by a hierarchical
/// attribute path such as `/Turbine/RPM`, scoped to a service name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeUpdate {
    /// Unix epoch milliseconds when the value was read.
    pub timestamp: i64,

    /// Service that owns the attribute (e.g. `com.victronenergy.windcharger.bornay_ttyUSB0`).
    pub service: String,

    /// Attribute path, always starting with `/`.
    pub path: String,

    /// The published value.
    pub value: AttributeValue,
}

impl AttributeUpdate {
    /// Create a new update stamped with the current time.
    pub fn new(
        service: impl Into<String>,
        path: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        Self {
            timestamp: current_timestamp_millis(),
            service: service.into(),
            path: path.into(),
            value: value.into(),
        }
    }
}

/// Typed attribute value.
///
/// Serialized untagged so the wire form is the bare number or string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Whole number (unscaled registers, flags, identifiers).
    Integer(i64),

    /// Scaled measurement.
    Float(f64),

    /// Free text (product name, versions).
    Text(String),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Integer(v) => write!(f, "{}", v),
            AttributeValue::Float(v) => write!(f, "{}", v),
            AttributeValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        AttributeValue::Integer(v)
    }
}

impl From<u16> for AttributeValue {
    fn from(v: u16) -> Self {
        AttributeValue::Integer(i64::from(v))
    }
}

impl From<u32> for AttributeValue {
    fn from(v: u32) -> Self {
        AttributeValue::Integer(i64::from(v))
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Float(v)
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        AttributeValue::Text(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::Text(v.to_string())
    }
}

/// Get the current timestamp in milliseconds since Unix epoch.
///
/// Returns 0 if system time is before Unix epoch.
pub fn current_timestamp_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
