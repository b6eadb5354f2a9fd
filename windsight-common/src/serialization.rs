use serde::{Serialize, de::DeserializeOwned};

use crate::error::{Error, Result};

/// Wire format for attribute updates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// JSON format (default, readable by most bus consumers).
    #[default]
    Json,

    /// CBOR format (compact binary).
    Cbor,
}

/// Encode a value to bytes using the specified format.
pub fn encode<T: Serialize>(value: &T, format: Format) -> Result<Vec<u8>> {
    match format {
        Format::Json => serde_json::to_vec(value).map_err(Error::from),
        Format::Cbor => {
            let mut buf = Vec::new();
            ciborium::into_writer(value, &mut buf)?;
            Ok(buf)
        }
    }
}

/// Decode bytes to a value using the specified format.
pub fn decode<T: DeserializeOwned>(data: &[u8], format: Format) -> Result<T> {
    match format {
        Format::Json => serde_json::from_slice(data).map_err(Error::from),
        Format::Cbor => ciborium::from_reader(data).map_err(|e| Error::Cbor(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::{AttributeUpdate, AttributeValue};

    fn sink_temp() -> AttributeUpdate {
        AttributeUpdate::new("bornay_ttyUSB0", "/Mppt/SinkTemp", 20.5)
    }

    #[test]
    fn test_json_roundtrip() {
        let update = sink_temp();

        let encoded = encode(&update, Format::Json).unwrap();
        let decoded: AttributeUpdate = decode(&encoded, Format::Json).unwrap();

        assert_eq!(decoded, update);
    }

    #[test]
    fn test_cbor_roundtrip_keeps_value_kind() {
        let update = AttributeUpdate::new("bornay_ttyUSB0", "/Turbine/RPM", 312u16);

        let encoded = encode(&update, Format::Cbor).unwrap();
        let decoded: AttributeUpdate = decode(&encoded, Format::Cbor).unwrap();

        assert_eq!(decoded.value, AttributeValue::Integer(312));
    }

    #[test]
    fn test_cbor_is_smaller() {
        let update = sink_temp();

        let json = encode(&update, Format::Json).unwrap();
        let cbor = encode(&update, Format::Cbor).unwrap();

        assert!(cbor.len() < json.len(), "CBOR should be smaller than JSON");
    }
}
