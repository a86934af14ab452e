//! Wire framing for sFlow v5 datagrams.
//!
//! This crate handles the binary wire format: the datagram header, the
//! tag + length frames that wrap every sample and record, and limit
//! enforcement. It does not know about record layouts, only the structure
//! around them.
//!
//! # Design Principles
//!
//! - **One version** - Only sFlow version 5 is accepted.
//! - **Bounded decoding** - All length fields are validated against limits and remaining input.
//! - **No domain knowledge** - This crate handles framing, not counters or flows.

mod error;
mod frame;
mod header;
mod limits;

pub use error::{DecodeError, EncodeError, LimitKind, WireResult};
pub use frame::{check_count, read_frame, write_frame, Frame, SampleKind, FRAME_HEADER_SIZE};
pub use header::{
    decode_header, encode_header, DatagramHeader, ADDRESS_TYPE_IPV4, ADDRESS_TYPE_IPV6,
    HEADER_SIZE_IPV4, HEADER_SIZE_IPV6, VERSION,
};
pub use limits::Limits;
