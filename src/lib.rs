//! `rvc-stack` library: the RV-C / SAE J1939 communication stack of an
//! inverter/charger/DC-DC controller in a `no_std` environment. The crate
//! exposes the frame transport between bus hardware and application code, the
//! J1939 address-claim state machine, the DGN dispatcher, the multi-packet
//! codec, and the numbered-field register file layered on top of RV-C.
#![no_std]

#[cfg(test)]
extern crate std;
//==================================================================================
/// Runtime configuration of a protocol stack instance.
pub mod config;
/// Field value data contract shared by the registry and device accessors.
pub mod core;
/// Protocol-level errors (queue saturation, addressing, field access, claiming).
pub mod error;
/// RV-C / J1939 protocol implementation: transport, address management,
/// dispatching and the field registry.
pub mod protocol;
//==================================================================================
