//! Runtime configuration of a protocol stack instance.
//!
//! The CA Name and identification strings are fixed when the stack is built;
//! instance, baud rate and preferred address stay editable through the
//! built-in system fields.
use crate::protocol::managment::ca_name::CaName;

/// Default RV-C source address when nothing else is configured.
pub const DEFAULT_PREFERRED_ADDRESS: u8 = 66;
/// Default RV-C instance.
pub const DEFAULT_INSTANCE: u8 = 1;

/// CAN bit rate, numbered as reported by the CAN baud field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum CanBaud {
    Baud125k = 0,
    /// RV-C standard rate.
    #[default]
    Baud250k = 1,
    Baud500k = 2,
    Baud1M = 3,
}

impl CanBaud {
    /// Value exposed through the field registry.
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(CanBaud::Baud125k),
            1 => Some(CanBaud::Baud250k),
            2 => Some(CanBaud::Baud500k),
            3 => Some(CanBaud::Baud1M),
            _ => None,
        }
    }

    /// Bit rate in bits per second.
    pub const fn bits_per_second(self) -> u32 {
        match self {
            CanBaud::Baud125k => 125_000,
            CanBaud::Baud250k => 250_000,
            CanBaud::Baud500k => 500_000,
            CanBaud::Baud1M => 1_000_000,
        }
    }
}

/// Configuration of one protocol stack.
///
/// # Example
///
/// ```
/// use rvc_stack::config::{CanBaud, StackConfig};
/// use rvc_stack::protocol::managment::ca_name::CaName;
///
/// let name = CaName::builder()
///     .identity_number(0x4_2042)
///     .manufacturer_code(0x2B1)
///     .arbitrary_address_capable(true)
///     .build();
///
/// let config = StackConfig::new(name)
///     .with_preferred_address(140)
///     .with_instance(2)
///     .with_baud(CanBaud::Baud250k)
///     .with_product_id("Sensata*PC-3000*0042*1*");
///
/// assert_eq!(config.preferred_address, 140);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StackConfig {
    /// NAME used to arbitrate address ownership. Immutable.
    pub name: CaName,
    /// Address requested on start-up and restored by commanded claims.
    pub preferred_address: u8,
    /// RV-C instance of this device (0 is reserved as broadcast).
    pub instance: u8,
    /// Configured CAN bit rate.
    pub baud: CanBaud,
    /// Product identification string (`make*model*serial*unit*`).
    pub product_id: &'static str,
    /// Software identification string.
    pub software_id: &'static str,
}

impl StackConfig {
    pub const fn new(name: CaName) -> Self {
        Self {
            name,
            preferred_address: DEFAULT_PREFERRED_ADDRESS,
            instance: DEFAULT_INSTANCE,
            baud: CanBaud::Baud250k,
            product_id: "",
            software_id: "",
        }
    }

    pub const fn with_preferred_address(mut self, address: u8) -> Self {
        self.preferred_address = address;
        self
    }

    pub const fn with_instance(mut self, instance: u8) -> Self {
        self.instance = instance;
        self
    }

    pub const fn with_baud(mut self, baud: CanBaud) -> Self {
        self.baud = baud;
        self
    }

    pub const fn with_product_id(mut self, product_id: &'static str) -> Self {
        self.product_id = product_id;
        self
    }

    pub const fn with_software_id(mut self, software_id: &'static str) -> Self {
        self.software_id = software_id;
        self
    }

    /// `IsRvcCmdForMe`: exact instance match, or the broadcast instance 0.
    #[inline]
    pub const fn is_rvc_cmd_for_me(&self, instance: u8) -> bool {
        instance == 0 || instance == self.instance
    }
}
