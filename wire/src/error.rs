//! Error types for wire format operations.

use std::fmt;

use bytestream::ByteError;

/// Result type for wire format operations.
pub type WireResult<T> = Result<T, DecodeError>;

/// High-level decode errors for datagram framing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// Datagram version is not 5.
    UnsupportedVersion { found: u32 },

    /// Agent address type is neither IPv4 (1) nor IPv6 (2).
    InvalidIpVersion { found: u32 },

    /// Input ended before a required field or declared body.
    Truncated { needed: usize, available: usize },

    /// A declared length or count exceeds the configured limit.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },
}

/// Specific limits that can be exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    DatagramBytes,
    SampleCount,
    SampleLength,
    RecordCount,
    RecordLength,
    HeaderLength,
}

/// Errors that can occur during encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// A body is too long for its 32-bit length prefix.
    LengthOverflow { length: usize },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported sFlow version: {found}")
            }
            Self::InvalidIpVersion { found } => {
                write!(f, "invalid agent address type: {found}")
            }
            Self::Truncated { needed, available } => {
                write!(f, "truncated input: need {needed} bytes, have {available}")
            }
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DatagramBytes => "datagram bytes",
            Self::SampleCount => "sample count",
            Self::SampleLength => "sample length",
            Self::RecordCount => "record count",
            Self::RecordLength => "record length",
            Self::HeaderLength => "captured header length",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthOverflow { length } => {
                write!(f, "length overflow: {length}")
            }
        }
    }
}

impl std::error::Error for DecodeError {}

impl std::error::Error for EncodeError {}

impl From<ByteError> for DecodeError {
    fn from(err: ByteError) -> Self {
        match err {
            ByteError::UnexpectedEof {
                requested,
                available,
            } => Self::Truncated {
                needed: requested,
                available,
            },
            ByteError::InvalidOffset { offset, len } => Self::Truncated {
                needed: offset.saturating_add(4),
                available: len,
            },
        }
    }
}
