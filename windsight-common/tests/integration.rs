//! Integration tests for windsight-common library.

use windsight_common::{AttributeUpdate, AttributeValue, Format, KeyExprBuilder, decode, encode};

#[test]
fn test_full_attribute_workflow() {
    let update = AttributeUpdate::new(
        "com.victronenergy.windcharger.bornay_ttyUSB0",
        "/Turbine/WindSpeed",
        12.25,
    );

    let builder = KeyExprBuilder::default();
    let key = builder.attribute(&update.service, &update.path);
    assert_eq!(
        key,
        "windsight/com.victronenergy.windcharger.bornay_ttyUSB0/Turbine/WindSpeed"
    );

    let json_bytes = encode(&update, Format::Json).expect("JSON encode failed");
    let decoded: AttributeUpdate = decode(&json_bytes, Format::Json).expect("JSON decode failed");
    assert_eq!(decoded.value, AttributeValue::Float(12.25));

    assert_eq!(builder.attribute(&decoded.service, &decoded.path), key);
}

#[test]
fn test_cbor_text_value() {
    let update = AttributeUpdate::new("svc", "/ProductName", "Bornay Wind+ MPPT");

    let cbor_bytes = encode(&update, Format::Cbor).expect("CBOR encode failed");
    let decoded: AttributeUpdate = decode(&cbor_bytes, Format::Cbor).expect("CBOR decode failed");

    assert_eq!(
        decoded.value,
        AttributeValue::Text("Bornay Wind+ MPPT".to_string())
    );
}

#[test]
fn test_all_value_kinds_roundtrip() {
    let values = [
        AttributeValue::Integer(0),
        AttributeValue::Integer(i64::from(u16::MAX)),
        AttributeValue::Float(655.5),
        AttributeValue::Text("Version 0.2.0".to_string()),
    ];

    for value in values {
        let update = AttributeUpdate::new("svc", "/Mppt/Phase", value.clone());

        let encoded = encode(&update, Format::Json).unwrap();
        let decoded: AttributeUpdate = decode(&encoded, Format::Json).unwrap();
        assert_eq!(decoded.value, value);

        let encoded = encode(&update, Format::Cbor).unwrap();
        let decoded: AttributeUpdate = decode(&encoded, Format::Cbor).unwrap();
        assert_eq!(decoded.value, value);
    }
}

#[test]
fn test_nested_attribute_paths() {
    let builder = KeyExprBuilder::new("site-a/windsight");
    let paths = [
        "/Mppt/StatusMEF",
        "/Dc/0/Current",
        "/History/Overall/MaxRPM",
        "/Management/ProcessVersion",
    ];

    for path in paths {
        let key = builder.attribute("svc", path);
        assert_eq!(key, format!("site-a/windsight/svc{}", path));
    }
}
