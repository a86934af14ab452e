//! Declarative field lists.
//!
//! A record layout is written once as an ordered list of slots. Reading walks
//! the list left to right and stores each big-endian value into its slot;
//! writing walks a matching list of values.

use crate::error::ByteResult;
use crate::reader::ByteReader;

/// A destination slot for [`ByteReader::read_fields`].
///
/// Only fixed-width kinds are representable, so every slot has a known width
/// before any byte is read.
#[derive(Debug)]
pub enum FieldMut<'a> {
    U8(&'a mut u8),
    I8(&'a mut i8),
    U16(&'a mut u16),
    I16(&'a mut i16),
    U32(&'a mut u32),
    I32(&'a mut i32),
    U64(&'a mut u64),
    I64(&'a mut i64),
    F32(&'a mut f32),
    F64(&'a mut f64),
    /// Fixed-size opaque bytes, copied verbatim.
    Opaque(&'a mut [u8]),
    /// Padding bytes that are consumed and discarded.
    Skip(usize),
}

impl FieldMut<'_> {
    /// Number of bytes this slot occupies on the wire.
    #[must_use]
    pub fn width(&self) -> usize {
        match self {
            Self::U8(_) | Self::I8(_) => 1,
            Self::U16(_) | Self::I16(_) => 2,
            Self::U32(_) | Self::I32(_) | Self::F32(_) => 4,
            Self::U64(_) | Self::I64(_) | Self::F64(_) => 8,
            Self::Opaque(bytes) => bytes.len(),
            Self::Skip(n) => *n,
        }
    }
}

/// A source value for [`ByteWriter::write_fields`](crate::ByteWriter::write_fields).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldRef<'a> {
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    F32(f32),
    F64(f64),
    Opaque(&'a [u8]),
    /// Zero padding.
    Zeros(usize),
}

impl FieldRef<'_> {
    /// Number of bytes this value occupies on the wire.
    #[must_use]
    pub const fn width(&self) -> usize {
        match self {
            Self::U8(_) | Self::I8(_) => 1,
            Self::U16(_) | Self::I16(_) => 2,
            Self::U32(_) | Self::I32(_) | Self::F32(_) => 4,
            Self::U64(_) | Self::I64(_) | Self::F64(_) => 8,
            Self::Opaque(bytes) => bytes.len(),
            Self::Zeros(n) => *n,
        }
    }
}

macro_rules! impl_field_conversions {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl<'a> From<&'a mut $ty> for FieldMut<'a> {
                fn from(slot: &'a mut $ty) -> Self {
                    Self::$variant(slot)
                }
            }

            impl From<$ty> for FieldRef<'_> {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )+
    };
}

impl_field_conversions! {
    u8 => U8,
    i8 => I8,
    u16 => U16,
    i16 => I16,
    u32 => U32,
    i32 => I32,
    u64 => U64,
    i64 => I64,
    f32 => F32,
    f64 => F64,
}

/// Reads `fields` from the front of `bytes`, returning the number of bytes consumed.
///
/// Fails if `bytes` is shorter than the list's total width, leaving every
/// slot untouched.
pub fn read_fields(bytes: &[u8], fields: &mut [FieldMut<'_>]) -> ByteResult<usize> {
    let mut reader = ByteReader::new(bytes);
    reader.read_fields(fields)?;
    Ok(reader.position())
}

/// Total wire width of a slot list.
#[must_use]
pub fn fields_width(fields: &[FieldMut<'_>]) -> usize {
    fields.iter().map(FieldMut::width).sum()
}
