//! Big-endian byte primitives for the sFlow codec.
//!
//! This crate provides [`ByteWriter`] and [`ByteReader`] for byte-level encoding and
//! decoding, plus declarative field lists ([`FieldMut`], [`FieldRef`]) so a record
//! layout can be written once as an ordered list of fixed-width slots.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Bounded operations** - All reads are bounds-checked against the remaining input.
//! - **No domain knowledge** - This crate knows nothing about samples, records, or agents.
//! - **Explicit errors** - All failures return structured errors, never panic.
//!
//! # Example
//!
//! ```
//! use bytestream::{ByteReader, ByteWriter, FieldMut};
//!
//! let mut writer = ByteWriter::new();
//! writer.write_u32(5);
//! writer.write_u64(42);
//!
//! let bytes = writer.finish();
//!
//! let mut version = 0u32;
//! let mut octets = 0u64;
//! let mut reader = ByteReader::new(&bytes);
//! reader
//!     .read_fields(&mut [FieldMut::from(&mut version), FieldMut::from(&mut octets)])
//!     .unwrap();
//! assert_eq!((version, octets), (5, 42));
//! ```

mod error;
mod field;
mod reader;
mod writer;

pub use error::{ByteError, ByteResult};
pub use field::{fields_width, read_fields, FieldMut, FieldRef};
pub use reader::ByteReader;
pub use writer::ByteWriter;

/// Number of zero bytes needed to pad `len` to a four-byte boundary.
#[must_use]
pub const fn pad4(len: usize) -> usize {
    (4 - len % 4) % 4
}
