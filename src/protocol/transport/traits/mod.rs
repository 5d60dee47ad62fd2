//! Abstraction traits used by the transport layer: the asynchronous CAN bus,
//! the TX sink the stack writes into, and the optional hardware receive filter.
pub mod can_bus;
pub mod frame_sink;
pub mod receive_filter;
