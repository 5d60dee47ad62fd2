//! Hook to reprogram a hardware acceptance filter when the claimed address changes.

/// Receive-path filter keyed on the node's own source address.
///
/// [`NULL_ADDRESS`](crate::protocol::dgn::NULL_ADDRESS) is never passed;
/// a node without an address is handed [`GLOBAL_ADDRESS`](crate::protocol::dgn::GLOBAL_ADDRESS)
/// so that only broadcast traffic is let through.
pub trait ReceiveFilter {
    fn accept_address(&mut self, address: u8);
}

/// No hardware filter: every frame reaches the stack.
impl ReceiveFilter for () {
    #[inline]
    fn accept_address(&mut self, _address: u8) {}
}
