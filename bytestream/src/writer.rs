//! Big-endian byte writer.

use crate::error::{ByteError, ByteResult};
use crate::field::FieldRef;

/// A byte-level writer for encoding big-endian binary data.
///
/// Writes are accumulated in an internal buffer. Call [`finish`](Self::finish)
/// to get the final byte buffer.
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    bytes: Vec<u8>,
}

impl ByteWriter {
    /// Creates a new empty `ByteWriter`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new `ByteWriter` with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
        }
    }

    /// Returns the number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the bytes written so far.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn write_u8(&mut self, value: u8) {
        self.bytes.push(value);
    }

    pub fn write_i8(&mut self, value: i8) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_u16(&mut self, value: u16) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_i16(&mut self, value: i16) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_i64(&mut self, value: i64) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_f32(&mut self, value: f32) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_f64(&mut self, value: f64) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Writes `len` zero bytes.
    pub fn write_zeros(&mut self, len: usize) {
        self.bytes.resize(self.bytes.len() + len, 0);
    }

    /// Writes each value in order, big-endian.
    pub fn write_fields(&mut self, fields: &[FieldRef<'_>]) {
        for field in fields {
            match *field {
                FieldRef::U8(v) => self.write_u8(v),
                FieldRef::I8(v) => self.write_i8(v),
                FieldRef::U16(v) => self.write_u16(v),
                FieldRef::I16(v) => self.write_i16(v),
                FieldRef::U32(v) => self.write_u32(v),
                FieldRef::I32(v) => self.write_i32(v),
                FieldRef::U64(v) => self.write_u64(v),
                FieldRef::I64(v) => self.write_i64(v),
                FieldRef::F32(v) => self.write_f32(v),
                FieldRef::F64(v) => self.write_f64(v),
                FieldRef::Opaque(bytes) => self.write_bytes(bytes),
                FieldRef::Zeros(len) => self.write_zeros(len),
            }
        }
    }

    /// Overwrites four already-written bytes at `offset` with `value`.
    ///
    /// Used to back-fill length prefixes once a body has been written.
    pub fn patch_u32(&mut self, offset: usize, value: u32) -> ByteResult<()> {
        let len = self.bytes.len();
        let end = offset.checked_add(4).filter(|&end| end <= len);
        let Some(end) = end else {
            return Err(ByteError::InvalidOffset { offset, len });
        };
        self.bytes[offset..end].copy_from_slice(&value.to_be_bytes());
        Ok(())
    }

    /// Finishes writing and returns the byte buffer.
    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }
}
