//! Core types shared by samples.

use crate::error::{CodecError, CodecResult};

/// Largest source type that fits the compact form.
pub const MAX_COMPACT_SOURCE_TYPE: u32 = 0xFF;

/// Largest source index that fits the compact form.
pub const MAX_COMPACT_SOURCE_INDEX: u32 = 0x00FF_FFFF;

/// Identifies the data source a sample was taken from.
///
/// Compact samples pack this into one word (type in the high byte, index in
/// the low 24 bits); expanded samples carry two full words. Both decode to the
/// same logical pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceId {
    /// 0 = ifIndex, 1 = smonVlanDataSource, 2 = entPhysicalEntry.
    pub source_type: u32,
    pub index: u32,
}

impl SourceId {
    #[must_use]
    pub const fn new(source_type: u32, index: u32) -> Self {
        Self { source_type, index }
    }

    /// Unpacks the compact one-word form.
    #[must_use]
    pub const fn from_compact(word: u32) -> Self {
        Self {
            source_type: word >> 24,
            index: word & MAX_COMPACT_SOURCE_INDEX,
        }
    }

    /// Packs into the compact one-word form.
    pub fn to_compact(self) -> CodecResult<u32> {
        if self.source_type > MAX_COMPACT_SOURCE_TYPE || self.index > MAX_COMPACT_SOURCE_INDEX {
            return Err(CodecError::SourceIdOutOfRange {
                source_type: self.source_type,
                index: self.index,
            });
        }
        Ok((self.source_type << 24) | self.index)
    }
}

/// Interface identifier carried by expanded flow samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterfaceId {
    /// 0 = ifIndex, 1 = packet discarded, 2 = multiple destinations.
    pub format: u32,
    pub value: u32,
}

impl InterfaceId {
    #[must_use]
    pub const fn new(format: u32, value: u32) -> Self {
        Self { format, value }
    }
}
