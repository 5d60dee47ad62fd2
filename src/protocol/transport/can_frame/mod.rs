//! In-memory representation of a classic CAN frame as exchanged with the bus
//! hardware. Frames are immutable once built; the queue slot holding one owns it.
use crate::protocol::transport::can_id::CanId;
use crate::protocol::transport::MAX_FRAME_PAYLOAD;
use embedded_can::{ExtendedId, Id, StandardId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Raw CAN frame: identifier, format flags and up to eight payload bytes.
pub struct CanFrame {
    id: u32,
    extended: bool,
    remote: bool,
    len: usize,
    data: [u8; MAX_FRAME_PAYLOAD],
}

impl CanFrame {
    /// Extended (29-bit) data frame. The payload is silently truncated to eight bytes.
    pub fn extended(id: CanId, payload: &[u8]) -> Self {
        Self::data_frame(id.0 & CanId::MASK, true, payload)
    }

    /// Standard (11-bit) data frame. The payload is silently truncated to eight bytes.
    pub fn standard(id: u16, payload: &[u8]) -> Self {
        Self::data_frame((id & 0x7FF) as u32, false, payload)
    }

    /// Remote transmission request with `dlc` requested bytes (clamped to eight).
    pub fn remote_request(id: u32, extended: bool, dlc: usize) -> Self {
        let mask = if extended { CanId::MASK } else { 0x7FF };
        Self {
            id: id & mask,
            extended,
            remote: true,
            len: dlc.min(MAX_FRAME_PAYLOAD),
            data: [0; MAX_FRAME_PAYLOAD],
        }
    }

    fn data_frame(id: u32, extended: bool, payload: &[u8]) -> Self {
        let len = payload.len().min(MAX_FRAME_PAYLOAD);
        let mut data = [0; MAX_FRAME_PAYLOAD];
        data[..len].copy_from_slice(&payload[..len]);
        Self {
            id,
            extended,
            remote: false,
            len,
            data,
        }
    }

    /// Raw identifier (29 or 11 significant bits).
    #[inline]
    pub fn raw_id(&self) -> u32 {
        self.id
    }

    /// J1939 view of the identifier; `None` for standard frames.
    #[inline]
    pub fn can_id(&self) -> Option<CanId> {
        self.extended.then_some(CanId(self.id))
    }

    #[inline]
    pub fn is_extended(&self) -> bool {
        self.extended
    }

    #[inline]
    pub fn is_remote_request(&self) -> bool {
        self.remote
    }

    /// Data Length Code (0 to 8).
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Valid payload bytes. Empty for remote requests.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        if self.remote {
            &[]
        } else {
            &self.data[..self.len]
        }
    }
}

impl embedded_can::Frame for CanFrame {
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        if data.len() > MAX_FRAME_PAYLOAD {
            return None;
        }
        Some(match id.into() {
            Id::Standard(sid) => Self::data_frame(sid.as_raw() as u32, false, data),
            Id::Extended(eid) => Self::data_frame(eid.as_raw(), true, data),
        })
    }

    fn new_remote(id: impl Into<Id>, dlc: usize) -> Option<Self> {
        if dlc > MAX_FRAME_PAYLOAD {
            return None;
        }
        Some(match id.into() {
            Id::Standard(sid) => Self::remote_request(sid.as_raw() as u32, false, dlc),
            Id::Extended(eid) => Self::remote_request(eid.as_raw(), true, dlc),
        })
    }

    fn is_extended(&self) -> bool {
        self.extended
    }

    fn is_remote_frame(&self) -> bool {
        self.remote
    }

    fn id(&self) -> Id {
        // Identifiers are masked on construction, so both conversions succeed.
        if self.extended {
            ExtendedId::new(self.id)
                .map(Id::Extended)
                .unwrap_or(Id::Extended(ExtendedId::ZERO))
        } else {
            StandardId::new(self.id as u16)
                .map(Id::Standard)
                .unwrap_or(Id::Standard(StandardId::ZERO))
        }
    }

    fn dlc(&self) -> usize {
        self.len
    }

    fn data(&self) -> &[u8] {
        self.payload()
    }
}
