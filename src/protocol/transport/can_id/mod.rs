//! Creation and extraction of the 29-bit CAN identifiers used by
//! RV-C (a profile of SAE J1939).
//!
//! # Bit layout
//!
//! ```text
//! Bits  0-7  : source address
//! Bits  8-15 : PDU specific (destination address or group extension)
//! Bits 16-23 : PDU format
//! Bit  24    : data page
//! Bit  25    : reserved, always 0
//! Bits 26-28 : priority (0 = highest)
//! ```
//!
//! The DGN is the 17-bit value `data page || PDU format || PDU specific`.
use crate::protocol::dgn::{GLOBAL_ADDRESS, PDU2_THRESHOLD};

//==================================================================================CAN_ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Encapsulates an extended CAN identifier (29 bits) and exposes accessors
/// for priority, DGN, destination, and source.
pub struct CanId(pub u32);

impl CanId {
    /// Mask of the meaningful identifier bits.
    pub const MASK: u32 = 0x1FFF_FFFF;

    /// Creates a pre-configured `CanIdBuilder` for a DGN and source address.
    pub fn builder(dgn: u32, source_address: u8) -> CanIdBuilder {
        CanIdBuilder::new(dgn, source_address)
    }

    /// Priority (3 bits, value 0-7).
    #[inline]
    pub const fn priority(&self) -> u8 {
        ((self.0 >> 26) & 0x07) as u8
    }

    /// Reserved bit 25.
    #[inline]
    pub const fn reserved(&self) -> bool {
        (self.0 >> 25) & 0x01 != 0
    }

    #[inline]
    pub const fn data_page(&self) -> u8 {
        ((self.0 >> 24) & 0x01) as u8
    }

    #[inline]
    pub const fn pdu_format(&self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    #[inline]
    pub const fn pdu_specific(&self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    /// Eight-bit source address.
    #[inline]
    pub const fn source_address(&self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// 17-bit DGN, `(identifier >> 8) & 0x1FFFF`.
    ///
    /// For PDU1 messages the destination address stays in the low byte.
    #[inline]
    pub const fn dgn(&self) -> u32 {
        (self.0 >> 8) & 0x1_FFFF
    }

    /// `true` when PDU format ≥ 240: the message is global by definition.
    #[inline]
    pub const fn is_pdu2(&self) -> bool {
        self.pdu_format() >= PDU2_THRESHOLD
    }

    /// Destination address of a PDU1 message, `None` for PDU2.
    #[inline]
    pub const fn destination(&self) -> Option<u8> {
        if self.is_pdu2() {
            None
        } else {
            Some(self.pdu_specific())
        }
    }

    /// `true` for PDU2 messages and PDU1 messages sent to the global address.
    #[inline]
    pub const fn is_broadcast(&self) -> bool {
        match self.destination() {
            None => true,
            Some(da) => da == GLOBAL_ADDRESS,
        }
    }
}

//==================================================================================CAN_ID_BUILDER
#[derive(Debug, Clone, Copy)]
/// Fluent builder stamping priority, DGN and source address.
///
/// Building never fails: every field is masked to its bit width.
pub struct CanIdBuilder {
    pub priority: u8,
    pub dgn: u32,
    pub source_address: u8,
    pub destination: Option<u8>,
}

impl CanIdBuilder {
    /// Initializes the builder for a given DGN and source address.
    pub fn new(dgn: u32, source_address: u8) -> Self {
        Self {
            priority: 6, // Default priority
            dgn,
            source_address,
            destination: None,
        }
    }

    /// Sets the priority (3 bits) to use during construction.
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority & 0x07;
        self
    }

    /// Overrides the PDU-specific byte of a PDU1 DGN with a destination.
    /// Ignored for PDU2 DGNs, whose PDU-specific byte is a group extension.
    pub fn to_destination(mut self, destination_address: u8) -> Self {
        self.destination = Some(destination_address);
        self
    }

    /// Pack the identifier. The reserved bit and the top three bits stay clear.
    pub fn build(self) -> CanId {
        let mut dgn = self.dgn & 0x1_FFFF;
        if let Some(da) = self.destination {
            if ((dgn >> 8) & 0xFF) < PDU2_THRESHOLD as u32 {
                dgn = (dgn & 0x1_FF00) | da as u32;
            }
        }
        CanId(((self.priority as u32 & 0x07) << 26) | (dgn << 8) | self.source_address as u32)
    }
}
