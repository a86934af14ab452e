//! Tag + length framing shared by samples and records.
//!
//! Every sample and every record on the wire starts with a 32-bit type tag and
//! a 32-bit length. The length counts the bytes that follow the 8-byte frame
//! header, never the header itself.

use bytestream::{ByteReader, ByteWriter};

use crate::error::{DecodeError, EncodeError, LimitKind, WireResult};

/// Size of a frame header (tag + length) in bytes.
pub const FRAME_HEADER_SIZE: usize = 8;

/// Sample type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum SampleKind {
    Flow = 1,
    Counter = 2,
    ExpandedFlow = 3,
    ExpandedCounter = 4,
    DiscardedPacket = 5,
}

impl SampleKind {
    /// Parses a sample tag, returning `None` for tags this codec does not know.
    #[must_use]
    pub const fn parse(tag: u32) -> Option<Self> {
        match tag {
            1 => Some(Self::Flow),
            2 => Some(Self::Counter),
            3 => Some(Self::ExpandedFlow),
            4 => Some(Self::ExpandedCounter),
            5 => Some(Self::DiscardedPacket),
            _ => None,
        }
    }

    #[must_use]
    pub const fn tag(self) -> u32 {
        self as u32
    }
}

/// A framed unit: its tag and a borrowed body of exactly the declared length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    pub tag: u32,
    pub body: &'a [u8],
}

impl<'a> Frame<'a> {
    /// Returns a reader bounded to the body.
    #[must_use]
    pub const fn reader(&self) -> ByteReader<'a> {
        ByteReader::new(self.body)
    }
}

/// Reads one frame and advances past its body.
///
/// The declared length is checked against `max_len` and against the
/// remaining input before the body is borrowed.
pub fn read_frame<'a>(
    reader: &mut ByteReader<'a>,
    kind: LimitKind,
    max_len: usize,
) -> WireResult<Frame<'a>> {
    let tag = reader.read_u32()?;
    let len = reader.read_u32()? as usize;

    if len > max_len {
        return Err(DecodeError::LimitsExceeded {
            kind,
            limit: max_len,
            actual: len,
        });
    }
    if len > reader.remaining() {
        return Err(DecodeError::Truncated {
            needed: len,
            available: reader.remaining(),
        });
    }

    let body = reader.read_bytes(len)?;
    Ok(Frame { tag, body })
}

/// Checks a declared element count against its limit.
///
/// Returns a capacity hint that never exceeds what the remaining input could
/// hold, assuming every element needs at least one frame header.
pub fn check_count(
    count: u32,
    kind: LimitKind,
    limit: usize,
    remaining: usize,
) -> WireResult<usize> {
    let count = count as usize;
    if count > limit {
        return Err(DecodeError::LimitsExceeded {
            kind,
            limit,
            actual: count,
        });
    }
    Ok(count.min(remaining / FRAME_HEADER_SIZE))
}

/// Writes a frame whose body is produced by `write_body`.
///
/// The length prefix is reserved, the body is written in place, and the
/// prefix is back-filled with the body length. Returns the body length.
pub fn write_frame<F, E>(writer: &mut ByteWriter, tag: u32, write_body: F) -> Result<usize, E>
where
    F: FnOnce(&mut ByteWriter) -> Result<(), E>,
    E: From<EncodeError>,
{
    writer.write_u32(tag);
    let len_offset = writer.len();
    writer.write_u32(0);

    write_body(writer)?;

    let body_len = writer.len() - len_offset - 4;
    let len_u32 =
        u32::try_from(body_len).map_err(|_| EncodeError::LengthOverflow { length: body_len })?;
    writer
        .patch_u32(len_offset, len_u32)
        .map_err(|_| EncodeError::LengthOverflow { length: body_len })?;
    Ok(body_len)
}
