//! Named Data Group Numbers.
//!
//! `generated_dgns.rs` is produced at build time from `build_core/var/dgn_manifest.json`
//! and exposes one `pub const` per DGN plus the sorted [`KNOWN_DGNS`] table.
//! PDU1 (peer-to-peer) DGNs are listed with a zero PDU-specific byte; use
//! [`to_destination`] to address them.

/// Metadata attached to a named DGN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DgnInfo {
    /// 17-bit DGN value.
    pub dgn: u32,
    /// Constant name, e.g. `"PRODUCT_IDENTIFICATION"`.
    pub name: &'static str,
    /// Human readable label.
    pub label: &'static str,
    /// Default transmit priority.
    pub priority: u8,
}

include!(concat!(env!("OUT_DIR"), "/generated_dgns.rs"));

/// Global (broadcast) destination / "no particular node".
pub const GLOBAL_ADDRESS: u8 = 255;
/// Null source address used by nodes that could not claim one.
pub const NULL_ADDRESS: u8 = 254;
/// First PDU-format value of the PDU2 (global, group-extension) space.
pub const PDU2_THRESHOLD: u8 = 240;

/// Control byte of a broadcast announce (BAM) connection-management frame.
pub const TP_CM_BAM: u8 = 0x20;
/// Negative acknowledgment control byte.
pub const ACK_CONTROL_NACK: u8 = 0x01;

/// PDU-format byte of a DGN.
#[inline]
pub const fn pdu_format(dgn: u32) -> u8 {
    ((dgn >> 8) & 0xFF) as u8
}

/// `true` for PDU2 DGNs, whose PDU-specific byte is a group extension.
#[inline]
pub const fn is_global(dgn: u32) -> bool {
    pdu_format(dgn) >= PDU2_THRESHOLD
}

/// Address a PDU1 DGN to `destination`. PDU2 DGNs are returned unchanged.
#[inline]
pub const fn to_destination(dgn: u32, destination: u8) -> u32 {
    if is_global(dgn) {
        dgn
    } else {
        (dgn & 0x1_FF00) | destination as u32
    }
}

/// Key used by routing tables: PDU1 DGNs lose their destination byte.
#[inline]
pub const fn route_key(dgn: u32) -> u32 {
    if is_global(dgn) {
        dgn & 0x1_FFFF
    } else {
        dgn & 0x1_FF00
    }
}

/// Look up the metadata of a named DGN (destination byte ignored for PDU1).
pub fn lookup(dgn: u32) -> Option<&'static DgnInfo> {
    let key = route_key(dgn);
    KNOWN_DGNS
        .binary_search_by_key(&key, |info| info.dgn)
        .ok()
        .map(|index| &KNOWN_DGNS[index])
}
