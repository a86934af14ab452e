//! The record capability shared by flow and counter records.

use bytestream::{ByteReader, ByteWriter};
use tracing::trace;
use wire::{write_frame, EncodeError, Limits};

use crate::error::CodecResult;

/// A typed record with a stable wire tag.
///
/// Records are framed as tag, length, body. `decode` is handed a reader
/// bounded to exactly the declared body, so trailing bytes the decoder does
/// not consume are skipped with the frame rather than misread as the next
/// record.
pub trait Record: Sized {
    /// Wire type tag.
    const TYPE_TAG: u32;

    /// Decodes the record body.
    fn decode(reader: &mut ByteReader<'_>, limits: &Limits) -> CodecResult<Self>;

    /// Returns the encoded body length in bytes (excluding the frame header).
    fn encoded_len(&self) -> usize;

    /// Encodes the record body without its frame header.
    fn encode_body(&self, writer: &mut ByteWriter) -> CodecResult<()>;

    fn type_tag(&self) -> u32 {
        Self::TYPE_TAG
    }

    /// Decodes a record from a body slice of exactly the declared length.
    fn decode_body(body: &[u8], limits: &Limits) -> CodecResult<Self> {
        let mut reader = ByteReader::new(body);
        let record = Self::decode(&mut reader, limits)?;
        if !reader.is_empty() {
            trace!(
                tag = Self::TYPE_TAG,
                slack = reader.remaining(),
                "ignoring trailing record bytes"
            );
        }
        Ok(record)
    }

    /// Encodes the record with its tag and length prefix.
    ///
    /// Returns the body length written.
    fn encode(&self, writer: &mut ByteWriter) -> CodecResult<usize> {
        write_frame(writer, Self::TYPE_TAG, |w| self.encode_body(w))
    }
}

/// Re-emits an unrecognised unit verbatim.
pub(crate) fn encode_opaque(writer: &mut ByteWriter, tag: u32, data: &[u8]) -> CodecResult<usize> {
    write_frame(writer, tag, |w| {
        w.write_bytes(data);
        Ok::<(), crate::error::CodecError>(())
    })
}

/// Converts an element count to its 32-bit wire form.
pub(crate) fn wire_count(len: usize) -> CodecResult<u32> {
    u32::try_from(len).map_err(|_| EncodeError::LengthOverflow { length: len }.into())
}

/// Declares a record whose body is a flat list of fixed-width fields.
///
/// The field list is the wire order. The macro derives the struct, its
/// `WIRE_SIZE`, and a [`Record`] impl that reads and writes the fields through
/// `FieldMut` / `FieldRef` lists.
macro_rules! fixed_record {
    (
        $(#[$meta:meta])*
        pub struct $name:ident = $tag:tt {
            $(
                $(#[$fmeta:meta])*
                $field:ident : $ty:ty
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name {
            $(
                $(#[$fmeta])*
                pub $field: $ty,
            )+
        }

        impl $name {
            /// Encoded body size in bytes.
            pub const WIRE_SIZE: usize = 0 $(+ ::std::mem::size_of::<$ty>())+;
        }

        impl $crate::record::Record for $name {
            const TYPE_TAG: u32 = $tag;

            fn decode(
                reader: &mut ::bytestream::ByteReader<'_>,
                _limits: &::wire::Limits,
            ) -> $crate::error::CodecResult<Self> {
                let mut record = Self::default();
                reader.read_fields(&mut [
                    $(::bytestream::FieldMut::from(&mut record.$field)),+
                ])?;
                Ok(record)
            }

            fn encoded_len(&self) -> usize {
                Self::WIRE_SIZE
            }

            fn encode_body(
                &self,
                writer: &mut ::bytestream::ByteWriter,
            ) -> $crate::error::CodecResult<()> {
                writer.write_fields(&[$(::bytestream::FieldRef::from(self.$field)),+]);
                Ok(())
            }
        }
    };
}

pub(crate) use fixed_record;
