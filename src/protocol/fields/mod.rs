//! Numbered field registry: a sparse, statically registered map from 16-bit
//! field numbers to typed accessors, exposed over RV-C as a get/set protocol.
//!
//! # Wire layout
//!
//! ```text
//! Set command    (DGN 0x0FFA0): [instance, field_lo, field_hi, tag, raw0, raw1, raw2, raw3]
//! Get command    (DGN 0x0FFA1): [instance, field_lo, field_hi, ..]
//! Status response(DGN 0x0FFA2): [instance, field_lo, field_hi, tag, value..]
//! ```
//!
//! Values are little-endian: int16 takes 2 bytes, int32/float32/Q16 take 4,
//! strings take up to 32 bytes plus a null terminator. A response longer than
//! one frame goes out through the multi-packet transport.
use crate::core::{FieldKind, FieldValue, MAX_FIELD_STRING};
use crate::error::FieldError;

pub mod numbers;
pub mod system;

/// Size of the status header (instance, field number, type tag).
pub const FIELD_HEADER_LEN: usize = 4;
/// Largest status payload: header, longest string, terminator.
pub const MAX_FIELD_RESPONSE: usize = FIELD_HEADER_LEN + MAX_FIELD_STRING + 1;

//==================================================================================DESCRIPTOR
/// Static registry entry binding a field number to accessors on `T`.
pub struct FieldDescriptor<T: 'static> {
    pub number: u16,
    pub name: &'static str,
    /// Kind the read accessor produces and the write accessor expects.
    pub kind: FieldKind,
    pub get: fn(&T) -> FieldValue,
    /// `None` for read-only fields.
    pub set: Option<fn(&mut T, FieldValue)>,
}

impl<T: 'static> FieldDescriptor<T> {
    pub const fn read_only(
        number: u16,
        name: &'static str,
        kind: FieldKind,
        get: fn(&T) -> FieldValue,
    ) -> Self {
        Self {
            number,
            name,
            kind,
            get,
            set: None,
        }
    }

    pub const fn read_write(
        number: u16,
        name: &'static str,
        kind: FieldKind,
        get: fn(&T) -> FieldValue,
        set: fn(&mut T, FieldValue),
    ) -> Self {
        Self {
            number,
            name,
            kind,
            get,
            set: Some(set),
        }
    }

    #[inline]
    pub fn is_writable(&self) -> bool {
        self.set.is_some()
    }
}

/// Application device whose state is exposed through the registry.
pub trait RvcDevice: Sized + 'static {
    /// Device fields, sorted by field number.
    const FIELDS: &'static [FieldDescriptor<Self>];

    /// Instance-checked RV-C command addressed to this device.
    ///
    /// Returns `true` when the command was acted upon.
    fn handle_command(&mut self, _dgn: u32, _payload: &[u8]) -> bool {
        false
    }
}

/// Binary search a table sorted by field number.
pub fn find<T>(table: &'static [FieldDescriptor<T>], number: u16) -> Option<&'static FieldDescriptor<T>> {
    table
        .binary_search_by_key(&number, |descriptor| descriptor.number)
        .ok()
        .map(|index| &table[index])
}

/// `true` when field numbers are strictly increasing, as [`find`] requires.
pub fn is_sorted<T>(table: &[FieldDescriptor<T>]) -> bool {
    table.windows(2).all(|pair| pair[0].number < pair[1].number)
}

/// Current value of field `number` on `owner`.
pub fn read<T>(
    table: &'static [FieldDescriptor<T>],
    owner: &T,
    number: u16,
) -> Result<FieldValue, FieldError> {
    let descriptor = find(table, number).ok_or(FieldError::InvalidField { field: number })?;
    Ok((descriptor.get)(owner))
}

/// Interpret `raw` according to the field's kind and hand it to its setter.
pub fn write<T>(
    table: &'static [FieldDescriptor<T>],
    owner: &mut T,
    number: u16,
    raw: [u8; 4],
) -> Result<(), FieldError> {
    let descriptor = find(table, number).ok_or(FieldError::InvalidField { field: number })?;
    let set = descriptor.set.ok_or(FieldError::ReadOnly { field: number })?;
    let value = FieldValue::from_raw(descriptor.kind, raw).ok_or(FieldError::ReadOnly { field: number })?;
    set(owner, value);
    Ok(())
}

//==================================================================================COMMANDS
/// Decoded set command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SetFieldCommand {
    pub instance: u8,
    pub field: u16,
    /// Type tag announced by the sender; the descriptor's kind is authoritative.
    pub tag: u8,
    pub raw: [u8; 4],
}

impl SetFieldCommand {
    pub fn parse(payload: &[u8]) -> Option<Self> {
        match payload {
            [instance, lo, hi, tag, r0, r1, r2, r3, ..] => Some(Self {
                instance: *instance,
                field: u16::from_le_bytes([*lo, *hi]),
                tag: *tag,
                raw: [*r0, *r1, *r2, *r3],
            }),
            _ => None,
        }
    }

    pub fn to_bytes(&self) -> [u8; 8] {
        let [lo, hi] = self.field.to_le_bytes();
        let [r0, r1, r2, r3] = self.raw;
        [self.instance, lo, hi, self.tag, r0, r1, r2, r3]
    }
}

/// Decoded get command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GetFieldCommand {
    pub instance: u8,
    pub field: u16,
}

impl GetFieldCommand {
    pub fn parse(payload: &[u8]) -> Option<Self> {
        match payload {
            [instance, lo, hi, ..] => Some(Self {
                instance: *instance,
                field: u16::from_le_bytes([*lo, *hi]),
            }),
            _ => None,
        }
    }
}

//==================================================================================RESPONSE
/// Serialized field status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldResponse {
    len: usize,
    data: [u8; MAX_FIELD_RESPONSE],
}

impl Default for FieldResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldResponse {
    /// Empty response (zero bytes).
    pub const fn new() -> Self {
        Self {
            len: 0,
            data: [0; MAX_FIELD_RESPONSE],
        }
    }

    /// Four-byte "none" response, the minimum reply for any field.
    pub fn none(instance: u8, field: u16) -> Self {
        let mut response = Self::new();
        response.write_header(instance, field, FieldKind::None);
        response
    }

    /// Response carrying `value`. Strings are null-terminated.
    pub fn from_value(instance: u8, field: u16, value: &FieldValue) -> Self {
        let mut response = Self::new();
        response.write_header(instance, field, value.kind());
        // The buffer always fits the longest value.
        let written = value
            .write_le(&mut response.data[FIELD_HEADER_LEN..])
            .unwrap_or(0);
        response.len = FIELD_HEADER_LEN + written;
        if let FieldValue::Str(_) = value {
            response.data[response.len] = 0;
            response.len += 1;
        }
        response
    }

    fn write_header(&mut self, instance: u8, field: u16, kind: FieldKind) {
        let [lo, hi] = field.to_le_bytes();
        self.data[..FIELD_HEADER_LEN].copy_from_slice(&[instance, lo, hi, kind.tag()]);
        self.len = FIELD_HEADER_LEN;
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Type tag in byte 3, `None` for an empty response.
    pub fn kind(&self) -> Option<FieldKind> {
        if self.len < FIELD_HEADER_LEN {
            return None;
        }
        FieldKind::from_tag(self.data[3])
    }

    /// Value bytes following the header.
    pub fn value_bytes(&self) -> &[u8] {
        self.data.get(FIELD_HEADER_LEN..self.len).unwrap_or(&[])
    }

    /// `true` when the response fits a single CAN frame.
    #[inline]
    pub fn fits_single_frame(&self) -> bool {
        self.len <= 8
    }
}
