//! RV-C / J1939 transport layer: CAN frame representation, 29-bit identifier
//! management, the lock-free frame queues between bus hardware and the stack,
//! multi-packet segmentation, and the bus abstraction traits.
//!
//! ## Priorities
//!
//! J1939 priorities run from 0 (highest) to 7 (lowest); application messages
//! default to [`DEFAULT_PRIORITY`] and transport-protocol frames use
//! [`TRANSPORT_PRIORITY`].

pub mod can_frame;
pub mod can_id;
pub mod driver;
pub mod multipacket;
pub mod queue;
pub mod traits;

/// Priority of application and network-management messages.
pub const DEFAULT_PRIORITY: u8 = 6;

/// Priority of multi-packet connection-management and data-transfer frames.
pub const TRANSPORT_PRIORITY: u8 = 7;

/// Classic CAN payload capacity.
pub const MAX_FRAME_PAYLOAD: usize = 8;
