//! Network management: the node's NAME, the address-claim state machine and
//! the commanded address session.
pub mod address_claiming;
pub mod ca_name;
pub mod commanded_address;
