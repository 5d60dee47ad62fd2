//! Error definitions shared across library modules.
//! Nothing here is fatal: every variant is either dropped traffic or a
//! protocol-visible negative response.
use thiserror_no_std::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// A transport queue had no free slot; the frame was dropped.
#[error("Frame queue full")]
pub struct QueueFull;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors raised while emitting a multi-packet transfer.
pub enum SegmentError {
    /// Payload exceeds the 1785-byte transport limit. Nothing was sent.
    #[error("Payload too large for multi-packet transport: {len} bytes")]
    PayloadTooLarge { len: usize },
    /// Some frames of the transfer were lost to a full TX queue.
    #[error("Multi-packet transfer lost {dropped} frame(s) to a full queue")]
    QueueFull { dropped: usize },
}

impl From<QueueFull> for SegmentError {
    fn from(_: QueueFull) -> Self {
        SegmentError::QueueFull { dropped: 1 }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Field Registry access failures.
pub enum FieldError {
    /// The instance neither matches ours nor is the broadcast instance.
    #[error("Command not addressed to this instance")]
    NotForMe,
    /// No descriptor is registered under this field number.
    #[error("Unknown field {field:#06X}")]
    InvalidField { field: u16 },
    /// The field exists but cannot be written from a 4-byte raw value.
    #[error("Field {field:#06X} is read-only")]
    ReadOnly { field: u16 },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors encountered while claiming or defending an address.
pub enum ClaimError {
    /// 254 (null) and 255 (global) can never be claimed.
    #[error("Address {address} cannot be claimed")]
    InvalidAddress { address: u8 },
    /// Another node with a higher-priority NAME owns the address and no
    /// alternative is available; the node now sits on the null address.
    #[error("Address claim lost")]
    AddressClaimLost,
}

#[derive(Error, Debug)]
/// Errors surfaced by the asynchronous bus driver.
pub enum BusError<E: core::fmt::Debug> {
    /// CAN bus rejected the frame during transmission.
    #[error("CAN bus send error: {0:?}")]
    Send(E),
    /// Unable to receive frames from the bus.
    #[error("CAN bus receive error: {0:?}")]
    Receive(E),
}
