//! Built-in fields served by the stack from its own configuration and claim state.
use super::numbers::*;
use super::FieldDescriptor;
use crate::config::CanBaud;
use crate::core::{FieldKind, FieldString, FieldValue};
use crate::protocol::dgn::NULL_ADDRESS;
use crate::protocol::dispatch::NodeState;

/// System range table, sorted by field number.
pub static SYSTEM_FIELDS: &[FieldDescriptor<NodeState>] = &[
    FieldDescriptor::read_write(SENFLD_CAN_BAUD, "CanBaud", FieldKind::Int16, get_baud, set_baud),
    FieldDescriptor::read_write(
        SENFLD_RVC_INSTANCE,
        "RvcInstance",
        FieldKind::Int16,
        get_instance,
        set_instance,
    ),
    FieldDescriptor::read_write(
        SENFLD_PREFERRED_ADDRESS,
        "PreferredAddress",
        FieldKind::Int16,
        get_preferred_address,
        set_preferred_address,
    ),
    FieldDescriptor::read_only(
        SENFLD_CLAIMED_ADDRESS,
        "ClaimedAddress",
        FieldKind::Int16,
        get_claimed_address,
    ),
    FieldDescriptor::read_only(
        SENFLD_NAME_IDENTITY,
        "NameIdentity",
        FieldKind::Int32,
        get_name_identity,
    ),
    FieldDescriptor::read_only(
        SENFLD_SOFTWARE_VERSION,
        "SoftwareVersion",
        FieldKind::String,
        get_software_version,
    ),
];

fn get_baud(node: &NodeState) -> FieldValue {
    FieldValue::Int16(node.config.baud.code() as i16)
}

/// Unknown baud codes are ignored.
fn set_baud(node: &mut NodeState, value: FieldValue) {
    if let FieldValue::Int16(code) = value {
        if let Some(baud) = CanBaud::from_code(code) {
            node.config.baud = baud;
        }
    }
}

fn get_instance(node: &NodeState) -> FieldValue {
    FieldValue::Int16(node.config.instance as i16)
}

/// Instance 0 is the broadcast instance and is never assigned.
fn set_instance(node: &mut NodeState, value: FieldValue) {
    if let FieldValue::Int16(instance @ 1..=255) = value {
        node.config.instance = instance as u8;
    }
}

fn get_preferred_address(node: &NodeState) -> FieldValue {
    FieldValue::Int16(node.config.preferred_address as i16)
}

/// Takes effect at the next claim.
fn set_preferred_address(node: &mut NodeState, value: FieldValue) {
    if let FieldValue::Int16(address @ 0..=253) = value {
        node.config.preferred_address = address as u8;
    }
}

fn get_claimed_address(node: &NodeState) -> FieldValue {
    let address = if node.claimer.is_claimed() {
        node.claimer.address()
    } else {
        NULL_ADDRESS
    };
    FieldValue::Int16(address as i16)
}

fn get_name_identity(node: &NodeState) -> FieldValue {
    FieldValue::Int32(node.claimer.name().identity_number() as i32)
}

fn get_software_version(node: &NodeState) -> FieldValue {
    FieldValue::Str(FieldString::from_str(node.config.software_id))
}
