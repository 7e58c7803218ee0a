//! Typed metadata values and their decoders.

use glam::IVec3;
use half::f16;
use serde::Serialize;

use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::scanner::Token;

/// A decoded metadata value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TypedValue {
    Int32(i32),
    Int64(i64),
    Float32(f32),
    HalfFloat16(f16),
    Bool(bool),
    Vec3Int32(IVec3),
    /// A delimiter-terminated string value.
    String(Token),
    /// A recognized type whose layout is not decoded. Carries the bytes it
    /// consumed, which may be none.
    Unhandled(Vec<u8>),
}

impl TypedValue {
    /// Returns the value as an `i64` if it is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Int32(v) => Some(i64::from(v)),
            Self::Int64(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the vector if this is a [`TypedValue::Vec3Int32`].
    pub fn as_ivec3(&self) -> Option<IVec3> {
        match *self {
            Self::Vec3Int32(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the string token if this is a [`TypedValue::String`].
    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Self::String(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Bool(v) => Some(v),
            _ => None,
        }
    }

    /// Returns true if the value was recognized but not decoded.
    pub fn is_unhandled(&self) -> bool {
        matches!(self, Self::Unhandled(_))
    }
}

/// Decodes fixed-width values from a [`ByteCursor`].
///
/// All multi-byte values are little-endian. Reads fail with
/// [`crate::ParseError::BufferUnderrun`] when too few bytes remain.
#[derive(Debug)]
pub struct ValueDecoder<'c, 'a> {
    cursor: &'c mut ByteCursor<'a>,
}

impl<'c, 'a> ValueDecoder<'c, 'a> {
    pub fn new(cursor: &'c mut ByteCursor<'a>) -> Self {
        Self { cursor }
    }

    /// Reads a 32-bit integer, or a 16-bit half float when `half_precision`.
    pub fn decode_int32(&mut self, half_precision: bool) -> Result<TypedValue> {
        if half_precision {
            let bits = self.cursor.read_array::<2>()?;
            Ok(TypedValue::HalfFloat16(f16::from_le_bytes(bits)))
        } else {
            self.cursor.read_i32().map(TypedValue::Int32)
        }
    }

    /// Reads and discards one 32-bit word.
    pub fn skip_word(&mut self) -> Result<()> {
        self.cursor.read_fixed(4).map(|_| ())
    }

    /// Reads a native 64-bit integer.
    pub fn decode_int64(&mut self) -> Result<TypedValue> {
        self.cursor.read_i64().map(TypedValue::Int64)
    }

    pub fn decode_float32(&mut self) -> Result<TypedValue> {
        self.cursor
            .read_array()
            .map(|bytes| TypedValue::Float32(f32::from_le_bytes(bytes)))
    }

    /// Skips a leading sentinel word, then reads `x`, `y` and `z`.
    ///
    /// On underrun the cursor is left where the failing read started.
    pub fn decode_vec3_int32(&mut self) -> Result<TypedValue> {
        let bytes = self.cursor.read_array::<16>()?;
        let word = |i: usize| i32::from_le_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]);
        Ok(TypedValue::Vec3Int32(IVec3::new(word(4), word(8), word(12))))
    }

    /// Reads a value whose layout is unknown. Consumes `len` raw bytes.
    pub fn decode_unhandled(&mut self, len: usize) -> Result<TypedValue> {
        self.cursor
            .read_fixed(len)
            .map(|bytes| TypedValue::Unhandled(bytes.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;

    #[test]
    fn test_decode_int32() {
        let data = (-42i32).to_le_bytes();
        let mut cursor = ByteCursor::new(&data);
        let value = ValueDecoder::new(&mut cursor).decode_int32(false).unwrap();
        assert_eq!(value, TypedValue::Int32(-42));
        assert_eq!(cursor.position(), 4);
    }

    #[test]
    fn test_decode_half() {
        let data = f16::from_f32(1.5).to_le_bytes();
        let mut cursor = ByteCursor::new(&data);
        let value = ValueDecoder::new(&mut cursor).decode_int32(true).unwrap();
        assert_eq!(value, TypedValue::HalfFloat16(f16::from_f32(1.5)));
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn test_decode_int64_is_native() {
        let n: i64 = 0x0000_0001_0000_0002;
        let data = n.to_le_bytes();
        let mut cursor = ByteCursor::new(&data);
        let value = ValueDecoder::new(&mut cursor).decode_int64().unwrap();
        assert_eq!(value.as_i64(), Some(n));
    }

    #[test]
    fn test_decode_float32() {
        let data = 0.25f32.to_le_bytes();
        let mut cursor = ByteCursor::new(&data);
        let value = ValueDecoder::new(&mut cursor).decode_float32().unwrap();
        assert_eq!(value, TypedValue::Float32(0.25));
    }

    #[test]
    fn test_decode_vec3_skips_sentinel() {
        let mut data = Vec::new();
        for v in [99i32, -1, 0, 7] {
            data.extend_from_slice(&v.to_le_bytes());
        }
        let mut cursor = ByteCursor::new(&data);
        let value = ValueDecoder::new(&mut cursor).decode_vec3_int32().unwrap();
        assert_eq!(value.as_ivec3(), Some(IVec3::new(-1, 0, 7)));
        assert_eq!(cursor.position(), 16);
    }

    #[test]
    fn test_truncated_vec3_does_not_advance() {
        let data = [0u8; 15];
        let mut cursor = ByteCursor::new(&data);
        let err = ValueDecoder::new(&mut cursor)
            .decode_vec3_int32()
            .unwrap_err();
        assert!(matches!(err, ParseError::BufferUnderrun { requested: 16, .. }));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_unhandled_keeps_bytes() {
        let data = [1u8, 0, 0];
        let mut cursor = ByteCursor::new(&data);
        let mut decoder = ValueDecoder::new(&mut cursor);
        assert_eq!(decoder.decode_unhandled(0).unwrap(), TypedValue::Unhandled(vec![]));
        let value = decoder.decode_unhandled(1).unwrap();
        assert!(value.is_unhandled());
        assert_eq!(value, TypedValue::Unhandled(vec![1]));
    }
}
