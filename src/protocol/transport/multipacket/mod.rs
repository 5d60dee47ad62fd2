//! Broadcast (BAM-style) multi-packet transport for payloads longer than one
//! CAN frame.
//!
//! A transfer is one connection-management announce followed by
//! `ceil(len / 7)` data frames:
//!
//! ```text
//! TP.CM (DGN 0x0ECFF): [0x20, len_lo, len_hi, packets, 0xFF, dgn0, dgn1, dgn2]
//! TP.DT (DGN 0x0EBFF): [seq (1-based), up to 7 payload bytes]
//! ```
//!
//! The last data frame is short: it carries only the remaining bytes. No
//! acknowledgement, flow control or inter-frame pacing is involved.
use crate::error::SegmentError;
use crate::protocol::dgn::{
    GLOBAL_ADDRESS, TP_CM_BAM, TRANSPORT_CONNECTION_MANAGEMENT, TRANSPORT_DATA_TRANSFER,
};
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::can_id::CanId;
use crate::protocol::transport::TRANSPORT_PRIORITY;

/// Largest payload a multi-packet transfer can carry (255 packets of 7 bytes).
pub const MAX_MULTIPACKET_PAYLOAD: usize = 1785;
/// Payload bytes carried by each data frame.
pub const BYTES_PER_PACKET: usize = 7;

/// Number of data frames needed for `len` bytes.
#[inline]
pub const fn packet_count(len: usize) -> usize {
    len.div_ceil(BYTES_PER_PACKET)
}

//==================================================================================ANNOUNCE
/// Decoded broadcast announce (TP.CM with control byte `0x20`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnectionAnnounce {
    pub total_len: u16,
    pub packet_count: u8,
    /// DGN of the transported message.
    pub dgn: u32,
}

impl ConnectionAnnounce {
    /// Parse a TP.CM payload; anything but a well-formed broadcast announce yields `None`.
    pub fn parse(payload: &[u8]) -> Option<Self> {
        if payload.len() < 8 || payload[0] != TP_CM_BAM {
            return None;
        }
        Some(Self {
            total_len: u16::from_le_bytes([payload[1], payload[2]]),
            packet_count: payload[3],
            dgn: u32::from_le_bytes([payload[5], payload[6], payload[7], 0]),
        })
    }

    pub fn to_bytes(&self) -> [u8; 8] {
        let len = self.total_len.to_le_bytes();
        let dgn = self.dgn.to_le_bytes();
        [
            TP_CM_BAM,
            len[0],
            len[1],
            self.packet_count,
            0xFF,
            dgn[0],
            dgn[1],
            dgn[2] & 0x01,
        ]
    }
}

//==================================================================================BUILDER
/// Parameters shared by every frame of one outbound transfer.
#[derive(Debug, Clone, Copy)]
pub struct MultiPacketBuilder<'a> {
    dgn: u32,
    source_address: u8,
    priority: u8,
    payload: &'a [u8],
}

impl<'a> MultiPacketBuilder<'a> {
    /// Validate the payload size. Nothing is emitted on error.
    pub fn new(dgn: u32, source_address: u8, payload: &'a [u8]) -> Result<Self, SegmentError> {
        if payload.len() > MAX_MULTIPACKET_PAYLOAD {
            return Err(SegmentError::PayloadTooLarge { len: payload.len() });
        }
        Ok(Self {
            dgn: dgn & 0x1_FFFF,
            source_address,
            priority: TRANSPORT_PRIORITY,
            payload,
        })
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority & 0x07;
        self
    }

    /// Number of data frames (the announce is not counted).
    #[inline]
    pub fn packet_count(&self) -> usize {
        packet_count(self.payload.len())
    }

    pub fn announce(&self) -> ConnectionAnnounce {
        ConnectionAnnounce {
            total_len: self.payload.len() as u16,
            packet_count: self.packet_count() as u8,
            dgn: self.dgn,
        }
    }

    /// Lazily yield the announce then every data frame.
    pub fn build(self) -> FrameIterator<'a> {
        FrameIterator {
            builder: self,
            next_sequence: 0,
        }
    }

    fn frame(&self, dgn: u32, payload: &[u8]) -> CanFrame {
        let id = CanId::builder(dgn, self.source_address)
            .to_destination(GLOBAL_ADDRESS)
            .with_priority(self.priority)
            .build();
        CanFrame::extended(id, payload)
    }
}

/// Frames of one transfer, announce first.
pub struct FrameIterator<'a> {
    builder: MultiPacketBuilder<'a>,
    /// 0 = announce, then 1-based data sequence numbers.
    next_sequence: usize,
}

impl Iterator for FrameIterator<'_> {
    type Item = CanFrame;

    fn next(&mut self) -> Option<Self::Item> {
        let sequence = self.next_sequence;
        if sequence > self.builder.packet_count() {
            return None;
        }
        self.next_sequence += 1;

        if sequence == 0 {
            let announce = self.builder.announce().to_bytes();
            return Some(self.builder.frame(TRANSPORT_CONNECTION_MANAGEMENT, &announce));
        }

        let start = (sequence - 1) * BYTES_PER_PACKET;
        let end = (start + BYTES_PER_PACKET).min(self.builder.payload.len());
        let chunk = &self.builder.payload[start..end];

        let mut data = [0u8; 8];
        data[0] = sequence as u8;
        data[1..1 + chunk.len()].copy_from_slice(chunk);
        Some(self.builder.frame(TRANSPORT_DATA_TRANSFER, &data[..1 + chunk.len()]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.builder.packet_count() + 1).saturating_sub(self.next_sequence);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FrameIterator<'_> {}
