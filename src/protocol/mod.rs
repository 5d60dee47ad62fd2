//! High-level components of the RV-C / J1939 stack: named DGNs, CAN transport,
//! network management, dispatching, and the numbered-field registry.
pub mod dgn;
pub mod dispatch;
pub mod fields;
pub mod managment;
pub mod transport;
