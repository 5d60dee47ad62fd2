//! Defines the "data contract" between the field registry (the interpreter)
//! and device accessors (the owners of the values).
//!
//! Accessors hand out a [`FieldValue`]; the registry turns it into wire bytes
//! according to the type tag carried by the [`FieldKind`].

/// Longest string a field can carry (excluding the null terminator).
pub const MAX_FIELD_STRING: usize = 32;

/// Value kind of a numbered field, with its on-wire type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum FieldKind {
    /// No value; also the reply kind for unknown fields.
    None = 0,
    /// Signed 16-bit integer, 2 bytes little-endian.
    Int16 = 1,
    /// IEEE-754 single precision, 4 bytes little-endian.
    Float32 = 2,
    /// Signed 32-bit integer, 4 bytes little-endian.
    Int32 = 3,
    /// Up to [`MAX_FIELD_STRING`] bytes followed by a null terminator.
    String = 4,
    /// Signed Q16.16 fixed point, 4 bytes little-endian.
    Q16 = 5,
}

impl FieldKind {
    /// Type tag written in byte 3 of a field response.
    #[inline]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Decode a type tag; unknown tags yield `None`.
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(FieldKind::None),
            1 => Some(FieldKind::Int16),
            2 => Some(FieldKind::Float32),
            3 => Some(FieldKind::Int32),
            4 => Some(FieldKind::String),
            5 => Some(FieldKind::Q16),
            _ => None,
        }
    }
}

/// Q16.16 signed fixed-point number, stored by bit pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Q16(pub i32);

impl Q16 {
    const ONE: f32 = 65536.0;

    /// Raw fixed-point bits.
    #[inline]
    pub const fn to_bits(self) -> i32 {
        self.0
    }

    /// Build from raw fixed-point bits.
    #[inline]
    pub const fn from_bits(bits: i32) -> Self {
        Self(bits)
    }

    /// Integer part plus fraction in 1/65536 units.
    #[inline]
    pub const fn from_parts(integer: i16, fraction: u16) -> Self {
        Self(((integer as i32) << 16) | fraction as i32)
    }

    /// Nearest fixed-point value (saturating at the i32 range).
    pub fn from_f32(value: f32) -> Self {
        let scaled = value * Self::ONE;
        // `as` saturates and rounds towards zero; bias for round-to-nearest.
        let rounded = if scaled >= 0.0 { scaled + 0.5 } else { scaled - 0.5 };
        Self(rounded as i32)
    }

    pub fn to_f32(self) -> f32 {
        self.0 as f32 / Self::ONE
    }
}

/// Fixed-capacity string value of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldString {
    len: usize,
    data: [u8; MAX_FIELD_STRING],
}

impl Default for FieldString {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldString {
    /// Create an empty string.
    pub const fn new() -> Self {
        Self {
            len: 0,
            data: [0; MAX_FIELD_STRING],
        }
    }

    /// Copy `bytes`, truncated to [`MAX_FIELD_STRING`].
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut s = Self::new();
        let clamped = bytes.len().min(MAX_FIELD_STRING);
        s.data[..clamped].copy_from_slice(&bytes[..clamped]);
        s.len = clamped;
        s
    }

    /// Copy `value`, truncated to [`MAX_FIELD_STRING`] bytes.
    ///
    /// Truncation may split a multi-byte character; `as_str` then returns `None`.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(value: &str) -> Self {
        Self::from_bytes(value.as_bytes())
    }

    /// Number of valid bytes stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Checks whether the string is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Immutable view over the populated bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// UTF-8 view, when the content is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(self.as_bytes()).ok()
    }
}

/// Current value of a field as produced by a read accessor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    None,
    Int16(i16),
    Int32(i32),
    Float32(f32),
    Str(FieldString),
    Q16(Q16),
}

impl FieldValue {
    /// Kind matching this value.
    pub const fn kind(&self) -> FieldKind {
        match self {
            FieldValue::None => FieldKind::None,
            FieldValue::Int16(_) => FieldKind::Int16,
            FieldValue::Int32(_) => FieldKind::Int32,
            FieldValue::Float32(_) => FieldKind::Float32,
            FieldValue::Str(_) => FieldKind::String,
            FieldValue::Q16(_) => FieldKind::Q16,
        }
    }

    /// Interpret four raw bytes according to `kind`.
    ///
    /// `Int16` uses the two low bytes; the 4-byte kinds reinterpret the bit
    /// pattern, no numeric conversion takes place. `None` and `String` cannot
    /// be expressed in four raw bytes and yield `None`.
    pub fn from_raw(kind: FieldKind, raw: [u8; 4]) -> Option<Self> {
        match kind {
            FieldKind::Int16 => Some(FieldValue::Int16(i16::from_le_bytes([raw[0], raw[1]]))),
            FieldKind::Int32 => Some(FieldValue::Int32(i32::from_le_bytes(raw))),
            FieldKind::Float32 => Some(FieldValue::Float32(f32::from_bits(u32::from_le_bytes(raw)))),
            FieldKind::Q16 => Some(FieldValue::Q16(Q16::from_bits(i32::from_le_bytes(raw)))),
            FieldKind::None | FieldKind::String => None,
        }
    }

    /// Serialize the value into `buffer`, returning the number of bytes written.
    ///
    /// Strings are written without their terminator; the caller appends it.
    /// Returns `None` when `buffer` is too small.
    pub fn write_le(&self, buffer: &mut [u8]) -> Option<usize> {
        let mut put = |bytes: &[u8]| -> Option<usize> {
            let dst = buffer.get_mut(..bytes.len())?;
            dst.copy_from_slice(bytes);
            Some(bytes.len())
        };
        match self {
            FieldValue::None => Some(0),
            FieldValue::Int16(v) => put(&v.to_le_bytes()),
            FieldValue::Int32(v) => put(&v.to_le_bytes()),
            FieldValue::Float32(v) => put(&v.to_bits().to_le_bytes()),
            FieldValue::Q16(v) => put(&v.to_bits().to_le_bytes()),
            FieldValue::Str(s) => put(s.as_bytes()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_round_trip() {
        for tag in 0..=5u8 {
            let kind = FieldKind::from_tag(tag).expect("tag in range");
            assert_eq!(kind.tag(), tag);
        }
        assert_eq!(FieldKind::from_tag(6), None);
    }

    #[test]
    fn test_int16_uses_low_bytes() {
        let value = FieldValue::from_raw(FieldKind::Int16, [0x34, 0x12, 0xAA, 0xBB]);
        assert_eq!(value, Some(FieldValue::Int16(0x1234)));
    }

    #[test]
    /// Floats are reinterpreted from their bit pattern, not converted numerically.
    fn test_float_reinterprets_bits() {
        let raw = 13.5f32.to_bits().to_le_bytes();
        assert_eq!(
            FieldValue::from_raw(FieldKind::Float32, raw),
            Some(FieldValue::Float32(13.5))
        );
        assert_eq!(
            FieldValue::from_raw(FieldKind::Q16, [0, 0, 1, 0]),
            Some(FieldValue::Q16(Q16::from_parts(1, 0)))
        );
    }

    #[test]
    fn test_string_kinds_not_raw_writable() {
        assert!(FieldValue::from_raw(FieldKind::String, [b'a'; 4]).is_none());
        assert!(FieldValue::from_raw(FieldKind::None, [0; 4]).is_none());
    }

    #[test]
    fn test_q16_conversions() {
        assert_eq!(Q16::from_f32(1.5).to_bits(), 0x0001_8000);
        assert_eq!(Q16::from_f32(-2.0).to_bits(), -0x0002_0000);
        assert_eq!(Q16::from_parts(14, 0x4000).to_f32(), 14.25);
    }

    #[test]
    fn test_field_string_truncates() {
        let long = [b'x'; 40];
        let s = FieldString::from_bytes(&long);
        assert_eq!(s.len(), MAX_FIELD_STRING);
        assert_eq!(FieldString::from_str("SN-0042").as_str(), Some("SN-0042"));
    }

    #[test]
    fn test_write_le_reports_short_buffer() {
        let mut small = [0u8; 1];
        assert_eq!(FieldValue::Int16(5).write_le(&mut small), None);
        let mut buf = [0u8; 4];
        assert_eq!(FieldValue::Int32(-1).write_le(&mut buf), Some(4));
        assert_eq!(buf, [0xFF; 4]);
    }
}
