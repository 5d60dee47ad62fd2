//! SAE J1939 NAME of this Controller Application (64 bits). The NAME
//! uniquely identifies the node and doubles as its priority key during
//! address arbitration: the numerically smaller NAME wins.
//!
//! # Bit layout (transmitted little-endian, byte 0 first)
//!
//! ```text
//! Bits  0-19  (20 bits) : Identity number (device serial)
//! Bits 20-31  (12 bits) : Manufacturer code
//! Bits 32-34  ( 3 bits) : Function instance
//! Bits 35-39  ( 5 bits) : Reserved, zero
//! Bits 40-47  ( 8 bits) : Function
//! Bit  48     ( 1 bit ) : Reserved
//! Bits 49-55  ( 7 bits) : Vehicle system
//! Bits 56-59  ( 4 bits) : Vehicle system instance
//! Bits 60-62  ( 3 bits) : Industry group
//! Bit  63     ( 1 bit ) : Arbitrary Address Capable
//! ```
use core::cmp::Ordering;
use core::fmt;

/// Wire size of a NAME.
pub const NAME_LEN: usize = 8;

/// Wrapper around the 64-bit J1939 NAME.
///
/// # Example
///
/// ```
/// use rvc_stack::protocol::managment::ca_name::CaName;
///
/// let name = CaName::builder()
///     .identity_number(0x4_2042)
///     .manufacturer_code(0x2B1)
///     .function(130)
///     .arbitrary_address_capable(true)
///     .build();
///
/// assert_eq!(name.identity_number(), 0x4_2042);
/// assert!(name.is_arbitrary_address_capable());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CaName(u64);

impl CaName {
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(&self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn builder() -> CaNameBuilder {
        CaNameBuilder::new()
    }

    /// Payload of an Address Claimed frame.
    #[inline]
    pub const fn to_bytes(&self) -> [u8; NAME_LEN] {
        self.0.to_le_bytes()
    }

    #[inline]
    pub const fn from_bytes(bytes: [u8; NAME_LEN]) -> Self {
        Self(u64::from_le_bytes(bytes))
    }

    /// Read a NAME from a frame payload; `None` unless exactly eight bytes.
    pub fn from_payload(payload: &[u8]) -> Option<Self> {
        let bytes: [u8; NAME_LEN] = payload.try_into().ok()?;
        Some(Self::from_bytes(bytes))
    }

    /// Identity number (bits 0-19).
    #[inline]
    pub const fn identity_number(&self) -> u32 {
        (self.0 & 0xF_FFFF) as u32
    }

    /// Manufacturer code (bits 20-31).
    #[inline]
    pub const fn manufacturer_code(&self) -> u16 {
        ((self.0 >> 20) & 0xFFF) as u16
    }

    /// Function instance (bits 32-34).
    #[inline]
    pub const fn function_instance(&self) -> u8 {
        ((self.0 >> 32) & 0x07) as u8
    }

    #[inline]
    pub const fn function(&self) -> u8 {
        ((self.0 >> 40) & 0xFF) as u8
    }

    #[inline]
    pub const fn vehicle_system(&self) -> u8 {
        ((self.0 >> 49) & 0x7F) as u8
    }

    #[inline]
    pub const fn vehicle_system_instance(&self) -> u8 {
        ((self.0 >> 56) & 0x0F) as u8
    }

    #[inline]
    pub const fn industry_group(&self) -> u8 {
        ((self.0 >> 60) & 0x07) as u8
    }

    /// Bit 63: the node may pick an address outside its preferred one.
    #[inline]
    pub const fn is_arbitrary_address_capable(&self) -> bool {
        (self.0 >> 63) & 0x01 != 0
    }

    /// Arbitration order against `other`; `Less` means `self` has claim priority.
    #[inline]
    pub fn compare(&self, other: &CaName) -> Ordering {
        compare_names(&self.to_bytes(), &other.to_bytes())
    }
}

/// Compare two NAMEs from byte 7 down to byte 0; the first difference decides.
///
/// `Less` means `a` wins the arbitration.
pub fn compare_names(a: &[u8; NAME_LEN], b: &[u8; NAME_LEN]) -> Ordering {
    for i in (0..NAME_LEN).rev() {
        match a[i].cmp(&b[i]) {
            Ordering::Equal => continue,
            decided => return decided,
        }
    }
    Ordering::Equal
}

impl From<u64> for CaName {
    #[inline]
    fn from(raw: u64) -> Self {
        Self::from_raw(raw)
    }
}

impl From<CaName> for u64 {
    #[inline]
    fn from(name: CaName) -> Self {
        name.raw()
    }
}

impl fmt::Display for CaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CaName {{ id: {}, mfg: {}, func: {}, inst: {}, aac: {} }}",
            self.identity_number(),
            self.manufacturer_code(),
            self.function(),
            self.function_instance(),
            self.is_arbitrary_address_capable()
        )
    }
}

/// Fluent builder for [`CaName`]. Values wider than their field are masked.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaNameBuilder {
    raw: u64,
}

impl CaNameBuilder {
    #[inline]
    pub const fn new() -> Self {
        Self { raw: 0 }
    }

    #[inline]
    const fn put(mut self, shift: u32, mask: u64, value: u64) -> Self {
        self.raw = (self.raw & !(mask << shift)) | ((value & mask) << shift);
        self
    }

    /// Identity number (20 bits).
    #[inline]
    pub const fn identity_number(self, value: u32) -> Self {
        self.put(0, 0xF_FFFF, value as u64)
    }

    /// Manufacturer code (12 bits).
    #[inline]
    pub const fn manufacturer_code(self, value: u16) -> Self {
        self.put(20, 0xFFF, value as u64)
    }

    /// Function instance (3 bits).
    #[inline]
    pub const fn function_instance(self, value: u8) -> Self {
        self.put(32, 0x07, value as u64)
    }

    #[inline]
    pub const fn function(self, value: u8) -> Self {
        self.put(40, 0xFF, value as u64)
    }

    #[inline]
    pub const fn vehicle_system(self, value: u8) -> Self {
        self.put(49, 0x7F, value as u64)
    }

    #[inline]
    pub const fn vehicle_system_instance(self, value: u8) -> Self {
        self.put(56, 0x0F, value as u64)
    }

    #[inline]
    pub const fn industry_group(self, value: u8) -> Self {
        self.put(60, 0x07, value as u64)
    }

    #[inline]
    pub const fn arbitrary_address_capable(self, value: bool) -> Self {
        self.put(63, 0x01, value as u64)
    }

    #[inline]
    pub const fn build(self) -> CaName {
        CaName(self.raw)
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
