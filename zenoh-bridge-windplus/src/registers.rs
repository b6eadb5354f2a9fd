//! Wind+ holding register map and unit scaling.

use windsight_common::AttributeValue;

use crate::error::BlockLengthError;

/// Modbus unit identifier of the controller.
pub const DEVICE_ADDRESS: u8 = 1;

/// First holding register of the telemetry window.
pub const BASE_ADDRESS: u16 = 5000;

/// Number of holding registers in the telemetry window.
pub const REGISTER_COUNT: u16 = 31;

/// Divisor applied to a raw register value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Divisor {
    /// Published as-is, as an integer.
    One,
    /// One decimal place.
    Ten,
    /// Two decimal places.
    Hundred,
}

impl Divisor {
    /// Numeric value of the divisor.
    pub fn value(self) -> u16 {
        match self {
            Divisor::One => 1,
            Divisor::Ten => 10,
            Divisor::Hundred => 100,
        }
    }

    /// Scale a raw register value.
    ///
    /// Scaled values keep their decimals (`205 / 10 == 20.5`).
    pub fn apply(self, raw: u16) -> AttributeValue {
        match self {
            Divisor::One => AttributeValue::from(raw),
            other => AttributeValue::Float(f64::from(raw) / f64::from(other.value())),
        }
    }
}

/// One entry of the register map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterDef {
    /// Offset from [`BASE_ADDRESS`].
    pub offset: u16,
    /// Attribute name.
    pub name: &'static str,
    /// Attribute path on the bus.
    pub path: &'static str,
    /// Scale divisor.
    pub divisor: Divisor,
}

impl RegisterDef {
    const fn new(offset: u16, name: &'static str, path: &'static str, divisor: Divisor) -> Self {
        Self {
            offset,
            name,
            path,
            divisor,
        }
    }
}

use Divisor::{Hundred, One, Ten};

/// Register map of the telemetry window, ordered by offset.
pub static REGISTER_MAP: [RegisterDef; REGISTER_COUNT as usize] = [
    RegisterDef::new(0, "StatusMEF", "/Mppt/StatusMEF", One),
    RegisterDef::new(1, "RefMEF", "/Mppt/RefMEF", One),
    RegisterDef::new(2, "BatPowerLastMin", "/Turbine/BatPowerLastMin", One),
    RegisterDef::new(3, "BatPowerLastHour", "/Turbine/BatPowerLastHour", One),
    RegisterDef::new(4, "BreakerPowerLastMin", "/Turbine/BreakerPowerLastMin", One),
    RegisterDef::new(5, "WindSpeedLastMin", "/Turbine/WindSpeedLastMin", One),
    RegisterDef::new(6, "WindSpeedLastHour", "/Turbine/WindSpeedLastHour", One),
    RegisterDef::new(7, "Phase", "/Mppt/Phase", One),
    RegisterDef::new(8, "SinkTemp", "/Mppt/SinkTemp", Ten),
    RegisterDef::new(9, "BoxTemp", "/Mppt/BoxTemp", Ten),
    RegisterDef::new(10, "ElevatedVoltage", "/Flags/ElevatedVoltage", One),
    RegisterDef::new(11, "Extrem", "/Flags/Extrem", One),
    RegisterDef::new(12, "ExternSupply", "/Flags/ExternSupply", One),
    RegisterDef::new(13, "ElevatedWind", "/Flags/ElevatedWind", One),
    RegisterDef::new(14, "FanState", "/Flags/FanState", One),
    RegisterDef::new(15, "EmergencyButton", "/Flags/EmergencyButton", One),
    RegisterDef::new(16, "RPM", "/Turbine/RPM", One),
    RegisterDef::new(17, "MaxRPM", "/History/Overall/MaxRPM", One),
    RegisterDef::new(18, "DutyCycle", "/Mppt/DutyCycle", One),
    RegisterDef::new(19, "WindSpeed", "/Turbine/WindSpeed", Hundred),
    RegisterDef::new(20, "VDC", "/Turbine/VDC", Ten),
    RegisterDef::new(21, "DcCurrent", "/Dc/0/Current", Ten),
    RegisterDef::new(22, "IBrk", "/Turbine/IBrk", Ten),
    RegisterDef::new(23, "DcPower", "/Dc/0/Power", One),
    RegisterDef::new(24, "AvailablePower", "/Turbine/AvailablePower", One),
    RegisterDef::new(25, "Stop", "/Turbine/Stop", One),
    RegisterDef::new(26, "DcVoltage", "/Dc/0/Voltage", Ten),
    RegisterDef::new(27, "ChargerState", "/Mppt/ChargerState", One),
    RegisterDef::new(28, "EstimatedWind", "/Turbine/EstimatedWind", Ten),
    RegisterDef::new(29, "ChargedBattery", "/Flags/ChargedBattery", One),
    RegisterDef::new(30, "AbsorptionTime", "/Mppt/AbsorptionTime", One),
];

/// Raw values of one read, in register order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterBlock {
    values: Vec<u16>,
}

impl RegisterBlock {
    pub fn new(values: Vec<u16>) -> Self {
        Self { values }
    }

    /// The raw values.
    pub fn values(&self) -> &[u16] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A decoded, scaled attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: &'static str,
    pub path: &'static str,
    pub value: AttributeValue,
}

/// Decode a full telemetry window into attributes.
///
/// The block must hold exactly [`REGISTER_COUNT`] values; anything else is
/// rejected as a whole.
pub fn decode(block: &RegisterBlock) -> Result<Vec<Attribute>, BlockLengthError> {
    if block.len() != REGISTER_MAP.len() {
        return Err(BlockLengthError {
            expected: REGISTER_MAP.len(),
            actual: block.len(),
        });
    }

    Ok(REGISTER_MAP
        .iter()
        .zip(block.values())
        .map(|(def, &raw)| Attribute {
            name: def.name,
            path: def.path,
            value: def.divisor.apply(raw),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_map_is_contiguous() {
        for (index, def) in REGISTER_MAP.iter().enumerate() {
            assert_eq!(def.offset as usize, index, "{} out of order", def.name);
        }
        assert_eq!(BASE_ADDRESS + REGISTER_MAP[30].offset, 5030);
    }

    #[test]
    fn test_paths_are_unique_and_grouped() {
        let groups = ["/Mppt/", "/Turbine/", "/Flags/", "/Dc/0/", "/History/Overall/"];
        let mut seen = HashSet::new();

        for def in &REGISTER_MAP {
            assert!(seen.insert(def.path), "duplicate path {}", def.path);
            assert!(
                groups.iter().any(|g| def.path.starts_with(g)),
                "{} outside known groups",
                def.path
            );
        }
    }

    #[test]
    fn test_divisor_apply() {
        assert_eq!(One.apply(312), AttributeValue::Integer(312));
        assert_eq!(Ten.apply(205), AttributeValue::Float(20.5));
        assert_eq!(Hundred.apply(1234), AttributeValue::Float(12.34));
        assert_eq!(Ten.apply(0), AttributeValue::Float(0.0));
        assert_eq!(Hundred.apply(u16::MAX), AttributeValue::Float(655.35));
    }

    #[test]
    fn test_decode_rejects_short_block() {
        let block = RegisterBlock::new(vec![0; 30]);
        let err = decode(&block).unwrap_err();
        assert_eq!(
            err,
            BlockLengthError {
                expected: 31,
                actual: 30
            }
        );
    }

    #[test]
    fn test_decode_sink_temp() {
        let mut values = vec![0u16; REGISTER_COUNT as usize];
        values[8] = 205;

        let attributes = decode(&RegisterBlock::new(values)).unwrap();
        assert_eq!(attributes.len(), 31);
        assert_eq!(attributes[8].name, "SinkTemp");
        assert_eq!(attributes[8].value, AttributeValue::Float(20.5));
    }

    #[test]
    fn test_decode_golden_table() {
        use AttributeValue::{Float, Integer};

        let values = (0..REGISTER_COUNT).map(|offset| 1001 + offset * 37).collect();
        let attributes = decode(&RegisterBlock::new(values)).unwrap();

        let expected = [
            ("StatusMEF", "/Mppt/StatusMEF", Integer(1001)),
            ("RefMEF", "/Mppt/RefMEF", Integer(1038)),
            ("BatPowerLastMin", "/Turbine/BatPowerLastMin", Integer(1075)),
            ("BatPowerLastHour", "/Turbine/BatPowerLastHour", Integer(1112)),
            ("BreakerPowerLastMin", "/Turbine/BreakerPowerLastMin", Integer(1149)),
            ("WindSpeedLastMin", "/Turbine/WindSpeedLastMin", Integer(1186)),
            ("WindSpeedLastHour", "/Turbine/WindSpeedLastHour", Integer(1223)),
            ("Phase", "/Mppt/Phase", Integer(1260)),
            ("SinkTemp", "/Mppt/SinkTemp", Float(129.7)),
            ("BoxTemp", "/Mppt/BoxTemp", Float(133.4)),
            ("ElevatedVoltage", "/Flags/ElevatedVoltage", Integer(1371)),
            ("Extrem", "/Flags/Extrem", Integer(1408)),
            ("ExternSupply", "/Flags/ExternSupply", Integer(1445)),
            ("ElevatedWind", "/Flags/ElevatedWind", Integer(1482)),
            ("FanState", "/Flags/FanState", Integer(1519)),
            ("EmergencyButton", "/Flags/EmergencyButton", Integer(1556)),
            ("RPM", "/Turbine/RPM", Integer(1593)),
            ("MaxRPM", "/History/Overall/MaxRPM", Integer(1630)),
            ("DutyCycle", "/Mppt/DutyCycle", Integer(1667)),
            ("WindSpeed", "/Turbine/WindSpeed", Float(17.04)),
            ("VDC", "/Turbine/VDC", Float(174.1)),
            ("DcCurrent", "/Dc/0/Current", Float(177.8)),
            ("IBrk", "/Turbine/IBrk", Float(181.5)),
            ("DcPower", "/Dc/0/Power", Integer(1852)),
            ("AvailablePower", "/Turbine/AvailablePower", Integer(1889)),
            ("Stop", "/Turbine/Stop", Integer(1926)),
            ("DcVoltage", "/Dc/0/Voltage", Float(196.3)),
            ("ChargerState", "/Mppt/ChargerState", Integer(2000)),
            ("EstimatedWind", "/Turbine/EstimatedWind", Float(203.7)),
            ("ChargedBattery", "/Flags/ChargedBattery", Integer(2074)),
            ("AbsorptionTime", "/Mppt/AbsorptionTime", Integer(2111)),
        ];

        assert_eq!(attributes.len(), expected.len());
        for (attribute, (name, path, value)) in attributes.iter().zip(expected) {
            assert_eq!(attribute.name, name);
            assert_eq!(attribute.path, path, "{}", name);
            assert_eq!(attribute.value, value, "{}", name);
        }
    }
}
