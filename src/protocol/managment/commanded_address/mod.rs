//! Inbound Commanded Address session.
//!
//! A commissioning tool assigns a new source address by broadcasting a
//! Commanded Address message (9 bytes: target NAME + new address) through
//! the broadcast multi-packet transport. This is the only segmented transfer
//! the stack reassembles:
//!
//! ```text
//! TP.CM  : announce naming DGN 0x0FED8        -> session opens, requester latched
//! TP.DT 1: [1, name0 .. name6]
//! TP.DT 2: [2, name7, new_address, ...]        -> session completes
//! ```
use crate::protocol::managment::ca_name::{CaName, NAME_LEN};

/// Progress of a commanded address session after one data frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandedStep {
    /// No session open, or the frame came from another node.
    Ignored,
    /// First half of the NAME stored.
    Pending,
    /// Unexpected sequence number or short frame; the session was dropped.
    Aborted,
    /// NAME and address fully received.
    Complete { name: CaName, address: u8 },
}

/// Two-packet reassembly buffer for one commanded address exchange.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandedAddressSession {
    requester: Option<u8>,
    name: [u8; NAME_LEN],
    next_sequence: u8,
}

impl CommandedAddressSession {
    pub const fn new() -> Self {
        Self {
            requester: None,
            name: [0; NAME_LEN],
            next_sequence: 0,
        }
    }

    /// `true` between the announce and the last data frame.
    #[inline]
    pub fn in_progress(&self) -> bool {
        self.requester.is_some()
    }

    /// Source address of the commissioning tool, while a session is open.
    #[inline]
    pub fn requester(&self) -> Option<u8> {
        self.requester
    }

    /// Open a session for `requester`, dropping any previous one.
    pub fn begin(&mut self, requester: u8) {
        self.requester = Some(requester);
        self.name = [0; NAME_LEN];
        self.next_sequence = 1;
    }

    pub fn abort(&mut self) {
        self.requester = None;
        self.next_sequence = 0;
    }

    /// Feed one TP.DT payload sent by `source`.
    pub fn accept(&mut self, source: u8, payload: &[u8]) -> CommandedStep {
        if self.requester != Some(source) {
            return CommandedStep::Ignored;
        }
        match (self.next_sequence, payload) {
            (1, [1, rest @ ..]) if rest.len() >= 7 => {
                self.name[..7].copy_from_slice(&rest[..7]);
                self.next_sequence = 2;
                CommandedStep::Pending
            }
            (2, [2, last, address, ..]) => {
                self.name[7] = *last;
                let step = CommandedStep::Complete {
                    name: CaName::from_bytes(self.name),
                    address: *address,
                };
                self.abort();
                step
            }
            _ => {
                self.abort();
                CommandedStep::Aborted
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_frame_assembly() {
        let name = CaName::from_raw(0x8123_4567_89AB_CDEF);
        let bytes = name.to_bytes();
        let mut session = CommandedAddressSession::new();
        session.begin(0x20);

        let mut first = [1u8; 8];
        first[1..].copy_from_slice(&bytes[..7]);
        assert_eq!(session.accept(0x20, &first), CommandedStep::Pending);
        assert_eq!(
            session.accept(0x20, &[2, bytes[7], 150, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]),
            CommandedStep::Complete { name, address: 150 }
        );
        assert!(!session.in_progress());
    }

    #[test]
    fn test_other_source_ignored() {
        let mut session = CommandedAddressSession::new();
        assert_eq!(session.accept(0x20, &[1; 8]), CommandedStep::Ignored);
        session.begin(0x20);
        assert_eq!(session.accept(0x21, &[1; 8]), CommandedStep::Ignored);
        assert!(session.in_progress());
    }

    #[test]
    fn test_out_of_order_aborts() {
        let mut session = CommandedAddressSession::new();
        session.begin(0x20);
        assert_eq!(session.accept(0x20, &[2, 0, 150]), CommandedStep::Aborted);
        assert!(!session.in_progress());
        assert_eq!(session.requester(), None);
    }
}
