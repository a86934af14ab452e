//! Error types for codec operations.

use std::{fmt, io};

use wire::{DecodeError, EncodeError};

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while encoding or decoding datagrams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Structural decode error (version, address type, truncation, limits).
    Wire(DecodeError),

    /// Framing error while encoding.
    Encode(EncodeError),

    /// Source id does not fit the compact one-word form.
    SourceIdOutOfRange { source_type: u32, index: u32 },

    /// Asked to encode a datagram without samples.
    NoSamples,

    /// Reading from the source or writing to the sink failed.
    Io { kind: io::ErrorKind, message: String },
}

impl CodecError {
    /// Returns `true` if the input ended before the datagram did.
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        matches!(self, Self::Wire(DecodeError::Truncated { .. }))
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wire(e) => write!(f, "wire error: {e}"),
            Self::Encode(e) => write!(f, "encode error: {e}"),
            Self::SourceIdOutOfRange { source_type, index } => {
                write!(
                    f,
                    "source id {source_type}:{index} does not fit in 8-bit type and 24-bit index"
                )
            }
            Self::NoSamples => write!(f, "no samples provided"),
            Self::Io { kind, message } => write!(f, "i/o error ({kind:?}): {message}"),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Wire(e) => Some(e),
            Self::Encode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DecodeError> for CodecError {
    fn from(err: DecodeError) -> Self {
        Self::Wire(err)
    }
}

impl From<EncodeError> for CodecError {
    fn from(err: EncodeError) -> Self {
        Self::Encode(err)
    }
}

impl From<bytestream::ByteError> for CodecError {
    fn from(err: bytestream::ByteError) -> Self {
        Self::Wire(err.into())
    }
}

impl From<io::Error> for CodecError {
    fn from(err: io::Error) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
