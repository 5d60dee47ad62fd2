//! Field numbers. Each subsystem owns a 256-entry range; the stack itself
//! serves the system range.

/// Subsystem owning a field number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FieldRange {
    /// 0x0000-0x00FF, served by the stack.
    System,
    /// 0x0100-0x01FF
    Charger,
    /// 0x0200-0x02FF
    Inverter,
    /// 0x0300-0x03FF
    Analog,
    /// 0x0400-0x04FF
    DeviceConfig,
    Unassigned,
}

impl FieldRange {
    pub const fn of(number: u16) -> Self {
        match number >> 8 {
            0x00 => FieldRange::System,
            0x01 => FieldRange::Charger,
            0x02 => FieldRange::Inverter,
            0x03 => FieldRange::Analog,
            0x04 => FieldRange::DeviceConfig,
            _ => FieldRange::Unassigned,
        }
    }
}

pub const CHARGER_BASE: u16 = 0x0100;
pub const INVERTER_BASE: u16 = 0x0200;
pub const ANALOG_BASE: u16 = 0x0300;
pub const DEVICE_CONFIG_BASE: u16 = 0x0400;

//==================================================================================SYSTEM
/// CAN bit rate code (int16, rw). See [`CanBaud`](crate::config::CanBaud).
pub const SENFLD_CAN_BAUD: u16 = 0x0001;
/// RV-C instance (int16, rw). Zero is refused.
pub const SENFLD_RVC_INSTANCE: u16 = 0x0002;
/// Address used by the next claim (int16, rw).
pub const SENFLD_PREFERRED_ADDRESS: u16 = 0x0003;
/// Address currently in use (int16, ro).
pub const SENFLD_CLAIMED_ADDRESS: u16 = 0x0004;
/// Identity number of the NAME (int32, ro).
pub const SENFLD_NAME_IDENTITY: u16 = 0x0005;
/// Software identification string (string, ro).
pub const SENFLD_SOFTWARE_VERSION: u16 = 0x0006;

//==================================================================================CHARGER
pub const SENFLD_CHARGER_BULK_VOLTAGE: u16 = CHARGER_BASE;
pub const SENFLD_CHARGER_ABSORPTION_VOLTAGE: u16 = CHARGER_BASE + 0x01;
pub const SENFLD_CHARGER_FLOAT_VOLTAGE: u16 = CHARGER_BASE + 0x02;
pub const SENFLD_CHARGER_MAX_CURRENT: u16 = CHARGER_BASE + 0x03;
pub const SENFLD_CHARGER_ALGORITHM: u16 = CHARGER_BASE + 0x04;

//==================================================================================INVERTER
pub const SENFLD_INVERTER_ENABLE: u16 = INVERTER_BASE;
pub const SENFLD_INVERTER_OUTPUT_VOLTAGE: u16 = INVERTER_BASE + 0x01;
pub const SENFLD_INVERTER_OUTPUT_FREQUENCY: u16 = INVERTER_BASE + 0x02;

//==================================================================================ANALOG
pub const SENFLD_BATTERY_VOLTAGE: u16 = ANALOG_BASE;
pub const SENFLD_BATTERY_CURRENT: u16 = ANALOG_BASE + 0x01;
pub const SENFLD_BATTERY_TEMPERATURE: u16 = ANALOG_BASE + 0x02;

//==================================================================================DEVICE_CONFIG
pub const SENFLD_SERIAL_NUMBER: u16 = DEVICE_CONFIG_BASE;
pub const SENFLD_MODEL_NAME: u16 = DEVICE_CONFIG_BASE + 0x01;
