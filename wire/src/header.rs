//! Datagram header types and constants.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use bytestream::{ByteReader, ByteWriter};

use crate::error::{DecodeError, WireResult};

/// The only supported sFlow datagram version.
pub const VERSION: u32 = 5;

/// Agent address type tag for IPv4.
pub const ADDRESS_TYPE_IPV4: u32 = 1;

/// Agent address type tag for IPv6.
pub const ADDRESS_TYPE_IPV6: u32 = 2;

/// Header size in bytes with an IPv4 agent address (28 total).
pub const HEADER_SIZE_IPV4: usize = 4 + 4 + 4 + 4 + 4 + 4 + 4;

/// Header size in bytes with an IPv6 agent address (40 total).
pub const HEADER_SIZE_IPV6: usize = 4 + 4 + 16 + 4 + 4 + 4 + 4;

/// Datagram header.
///
/// The sample count is what the agent declared; after a successful decode it
/// always equals the number of decoded samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DatagramHeader {
    pub version: u32,
    pub agent_address: IpAddr,
    pub sub_agent_id: u32,
    pub sequence_number: u32,
    /// Milliseconds since the agent booted.
    pub uptime: u32,
    pub sample_count: u32,
}

impl DatagramHeader {
    /// Creates a version 5 header.
    #[must_use]
    pub const fn new(
        agent_address: IpAddr,
        sub_agent_id: u32,
        sequence_number: u32,
        uptime: u32,
        sample_count: u32,
    ) -> Self {
        Self {
            version: VERSION,
            agent_address,
            sub_agent_id,
            sequence_number,
            uptime,
            sample_count,
        }
    }

    /// Returns the wire tag for the agent address family.
    #[must_use]
    pub const fn address_type(&self) -> u32 {
        match self.agent_address {
            IpAddr::V4(_) => ADDRESS_TYPE_IPV4,
            IpAddr::V6(_) => ADDRESS_TYPE_IPV6,
        }
    }

    /// Returns the encoded header size in bytes.
    #[must_use]
    pub const fn encoded_len(&self) -> usize {
        match self.agent_address {
            IpAddr::V4(_) => HEADER_SIZE_IPV4,
            IpAddr::V6(_) => HEADER_SIZE_IPV6,
        }
    }
}

/// Decodes a datagram header from the front of `reader`.
pub fn decode_header(reader: &mut ByteReader<'_>) -> WireResult<DatagramHeader> {
    let version = reader.read_u32()?;
    if version != VERSION {
        return Err(DecodeError::UnsupportedVersion { found: version });
    }

    let agent_address = match reader.read_u32()? {
        ADDRESS_TYPE_IPV4 => IpAddr::V4(Ipv4Addr::from(reader.read_array::<4>()?)),
        ADDRESS_TYPE_IPV6 => IpAddr::V6(Ipv6Addr::from(reader.read_array::<16>()?)),
        found => return Err(DecodeError::InvalidIpVersion { found }),
    };

    let sub_agent_id = reader.read_u32()?;
    let sequence_number = reader.read_u32()?;
    let uptime = reader.read_u32()?;
    let sample_count = reader.read_u32()?;

    Ok(DatagramHeader {
        version,
        agent_address,
        sub_agent_id,
        sequence_number,
        uptime,
        sample_count,
    })
}

/// Encodes a datagram header.
///
/// The version written is always [`VERSION`], whatever `header.version` holds.
pub fn encode_header(header: &DatagramHeader, writer: &mut ByteWriter) {
    writer.write_u32(VERSION);
    writer.write_u32(header.address_type());
    match header.agent_address {
        IpAddr::V4(addr) => writer.write_bytes(&addr.octets()),
        IpAddr::V6(addr) => writer.write_bytes(&addr.octets()),
    }
    writer.write_u32(header.sub_agent_id);
    writer.write_u32(header.sequence_number);
    writer.write_u32(header.uptime);
    writer.write_u32(header.sample_count);
}
