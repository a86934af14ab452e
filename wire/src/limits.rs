//! Configurable limits for bounded decoding.

/// Limits enforced while decoding datagrams.
///
/// Every declared length or count is checked against these values and against
/// the remaining input before anything is allocated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of bytes a stream decoder reads for one datagram.
    pub max_datagram_bytes: usize,

    /// Maximum number of samples in one datagram.
    pub max_samples: usize,

    /// Maximum declared length of a sample body in bytes.
    pub max_sample_len: usize,

    /// Maximum number of records in one sample.
    pub max_records: usize,

    /// Maximum declared length of a record body in bytes.
    pub max_record_len: usize,

    /// Maximum captured packet header size in a raw packet record.
    pub max_header_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            // A UDP payload never exceeds 64 KB.
            max_datagram_bytes: 64 * 1024,
            max_samples: 1000,
            max_sample_len: 64 * 1024,
            max_records: 1000,
            max_record_len: 64 * 1024,
            // Ethernet MTU.
            max_header_len: 1500,
        }
    }
}

impl Limits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_datagram_bytes: 4096,
            max_samples: 8,
            max_sample_len: 2048,
            max_records: 8,
            max_record_len: 1024,
            max_header_len: 256,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_datagram_bytes: usize::MAX,
            max_samples: usize::MAX,
            max_sample_len: usize::MAX,
            max_records: usize::MAX,
            max_record_len: usize::MAX,
            max_header_len: usize::MAX,
        }
    }
}
