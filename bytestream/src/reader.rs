//! Big-endian byte reader with bounded operations.

use crate::error::{ByteError, ByteResult};
use crate::field::{fields_width, FieldMut};

/// A byte-level reader for decoding big-endian binary data.
///
/// All read operations are bounds-checked and return errors on failure.
/// The reader never panics on malformed input.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Creates a new `ByteReader` from a byte slice.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the number of bytes remaining to read.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Returns `true` if there are no more bytes to read.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the current byte position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Returns the unread tail of the buffer without consuming it.
    #[must_use]
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos.min(self.data.len())..]
    }

    pub fn read_u8(&mut self) -> ByteResult<u8> {
        let [value] = self.read_array::<1>()?;
        Ok(value)
    }

    pub fn read_i8(&mut self) -> ByteResult<i8> {
        Ok(i8::from_be_bytes(self.read_array()?))
    }

    pub fn read_u16(&mut self) -> ByteResult<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    pub fn read_i16(&mut self) -> ByteResult<i16> {
        Ok(i16::from_be_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> ByteResult<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> ByteResult<i32> {
        Ok(i32::from_be_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> ByteResult<u64> {
        Ok(u64::from_be_bytes(self.read_array()?))
    }

    pub fn read_i64(&mut self) -> ByteResult<i64> {
        Ok(i64::from_be_bytes(self.read_array()?))
    }

    pub fn read_f32(&mut self) -> ByteResult<f32> {
        Ok(f32::from_be_bytes(self.read_array()?))
    }

    pub fn read_f64(&mut self) -> ByteResult<f64> {
        Ok(f64::from_be_bytes(self.read_array()?))
    }

    /// Reads exactly `N` bytes into an array.
    pub fn read_array<const N: usize>(&mut self) -> ByteResult<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Reads `len` bytes, borrowing them from the underlying buffer.
    pub fn read_bytes(&mut self, len: usize) -> ByteResult<&'a [u8]> {
        self.ensure_bytes(len)?;
        let start = self.pos;
        self.pos += len;
        Ok(&self.data[start..self.pos])
    }

    /// Skips `len` bytes.
    pub fn skip(&mut self, len: usize) -> ByteResult<()> {
        self.ensure_bytes(len)?;
        self.pos += len;
        Ok(())
    }

    /// Splits off a reader over the next `len` bytes and advances past them.
    ///
    /// The returned reader cannot see beyond `len`, so a decoder handed the
    /// sub-reader can never drift into the following unit.
    pub fn sub_reader(&mut self, len: usize) -> ByteResult<ByteReader<'a>> {
        self.read_bytes(len).map(ByteReader::new)
    }

    /// Reads each slot in order, big-endian.
    ///
    /// Fails without writing any slot if fewer bytes remain than the whole
    /// list needs.
    pub fn read_fields(&mut self, fields: &mut [FieldMut<'_>]) -> ByteResult<()> {
        self.ensure_bytes(fields_width(fields))?;
        for field in fields.iter_mut() {
            match field {
                FieldMut::U8(slot) => **slot = self.read_u8()?,
                FieldMut::I8(slot) => **slot = self.read_i8()?,
                FieldMut::U16(slot) => **slot = self.read_u16()?,
                FieldMut::I16(slot) => **slot = self.read_i16()?,
                FieldMut::U32(slot) => **slot = self.read_u32()?,
                FieldMut::I32(slot) => **slot = self.read_i32()?,
                FieldMut::U64(slot) => **slot = self.read_u64()?,
                FieldMut::I64(slot) => **slot = self.read_i64()?,
                FieldMut::F32(slot) => **slot = self.read_f32()?,
                FieldMut::F64(slot) => **slot = self.read_f64()?,
                FieldMut::Opaque(slot) => {
                    let bytes = self.read_bytes(slot.len())?;
                    slot.copy_from_slice(bytes);
                }
                FieldMut::Skip(len) => self.skip(*len)?,
            }
        }
        Ok(())
    }

    fn ensure_bytes(&self, len: usize) -> ByteResult<()> {
        let available = self.remaining();
        if len > available {
            return Err(ByteError::UnexpectedEof {
                requested: len,
                available,
            });
        }
        Ok(())
    }
}
