//! Flow records carried by flow and discarded-packet samples.

use std::net::{Ipv4Addr, Ipv6Addr};

use bytestream::{pad4, ByteReader, ByteWriter, FieldMut, FieldRef};
use tracing::debug;
use wire::{read_frame, DecodeError, EncodeError, LimitKind, Limits};

use crate::error::CodecResult;
use crate::record::{encode_opaque, fixed_record, Record};

pub const FLOW_RAW_PACKET: u32 = 1;
pub const FLOW_ETHERNET_FRAME: u32 = 2;
pub const FLOW_IPV4: u32 = 3;
pub const FLOW_IPV6: u32 = 4;
pub const FLOW_EXTENDED_SWITCH: u32 = 1001;

/// Header protocol numbers used in [`RawPacketFlow::protocol`].
pub mod header_protocol {
    pub const ETHERNET_ISO88023: u32 = 1;
    pub const ISO88024_TOKENBUS: u32 = 2;
    pub const ISO88025_TOKENRING: u32 = 3;
    pub const FDDI: u32 = 4;
    pub const FRAME_RELAY: u32 = 5;
    pub const X25: u32 = 6;
    pub const PPP: u32 = 7;
    pub const SMDS: u32 = 8;
    pub const AAL5: u32 = 9;
    pub const AAL5_IP: u32 = 10;
    pub const IPV4: u32 = 11;
    pub const IPV6: u32 = 12;
    pub const MPLS: u32 = 13;
    pub const POS: u32 = 14;
}

/// The leading bytes of a sampled packet.
///
/// The header is padded to a four-byte boundary on the wire; the padding is
/// never part of `header`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawPacketFlow {
    /// See [`header_protocol`].
    pub protocol: u32,
    /// Length of the original frame on the wire.
    pub frame_length: u32,
    /// Bytes removed from the frame before sampling (FCS, encapsulation).
    pub stripped: u32,
    pub header: Vec<u8>,
}

impl RawPacketFlow {
    /// Size of the fixed fields before the header bytes.
    pub const FIXED_SIZE: usize = 16;

    /// Returns the captured header length without padding.
    #[must_use]
    pub fn header_size(&self) -> usize {
        self.header.len()
    }
}

impl Record for RawPacketFlow {
    const TYPE_TAG: u32 = FLOW_RAW_PACKET;

    fn decode(reader: &mut ByteReader<'_>, limits: &Limits) -> CodecResult<Self> {
        let mut record = Self::default();
        let mut header_size = 0u32;
        reader.read_fields(&mut [
            FieldMut::from(&mut record.protocol),
            FieldMut::from(&mut record.frame_length),
            FieldMut::from(&mut record.stripped),
            FieldMut::from(&mut header_size),
        ])?;

        let header_size = header_size as usize;
        if header_size > limits.max_header_len {
            return Err(DecodeError::LimitsExceeded {
                kind: LimitKind::HeaderLength,
                limit: limits.max_header_len,
                actual: header_size,
            }
            .into());
        }

        let padded = reader.read_bytes(header_size.saturating_add(pad4(header_size)))?;
        record.header = padded[..header_size].to_vec();
        Ok(record)
    }

    fn encoded_len(&self) -> usize {
        Self::FIXED_SIZE + self.header.len() + pad4(self.header.len())
    }

    fn encode_body(&self, writer: &mut ByteWriter) -> CodecResult<()> {
        let header_size = u32::try_from(self.header.len()).map_err(|_| {
            EncodeError::LengthOverflow {
                length: self.header.len(),
            }
        })?;
        writer.write_fields(&[
            FieldRef::from(self.protocol),
            FieldRef::from(self.frame_length),
            FieldRef::from(self.stripped),
            FieldRef::from(header_size),
            FieldRef::Opaque(&self.header),
            FieldRef::Zeros(pad4(self.header.len())),
        ]);
        Ok(())
    }
}

/// Decoded Ethernet frame fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EthernetFrameFlow {
    /// Length of the MAC packet in bytes.
    pub length: u32,
    pub src_mac: [u8; 6],
    pub dst_mac: [u8; 6],
    pub eth_type: u32,
}

impl EthernetFrameFlow {
    pub const WIRE_SIZE: usize = 4 + 8 + 8 + 4;
}

// MAC addresses are six-byte opaques, padded to eight on the wire.
impl Record for EthernetFrameFlow {
    const TYPE_TAG: u32 = FLOW_ETHERNET_FRAME;

    fn decode(reader: &mut ByteReader<'_>, _limits: &Limits) -> CodecResult<Self> {
        let mut record = Self::default();
        reader.read_fields(&mut [
            FieldMut::from(&mut record.length),
            FieldMut::Opaque(&mut record.src_mac),
            FieldMut::Skip(2),
            FieldMut::Opaque(&mut record.dst_mac),
            FieldMut::Skip(2),
            FieldMut::from(&mut record.eth_type),
        ])?;
        Ok(record)
    }

    fn encoded_len(&self) -> usize {
        Self::WIRE_SIZE
    }

    fn encode_body(&self, writer: &mut ByteWriter) -> CodecResult<()> {
        writer.write_fields(&[
            FieldRef::from(self.length),
            FieldRef::Opaque(&self.src_mac),
            FieldRef::Zeros(2),
            FieldRef::Opaque(&self.dst_mac),
            FieldRef::Zeros(2),
            FieldRef::from(self.eth_type),
        ]);
        Ok(())
    }
}

/// Decoded IPv4 header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ipv4Flow {
    /// Length of the IP packet excluding lower layer encapsulations.
    pub length: u32,
    pub protocol: u32,
    pub src_ip: Ipv4Addr,
    pub dst_ip: Ipv4Addr,
    pub src_port: u32,
    pub dst_port: u32,
    pub tcp_flags: u32,
    pub tos: u32,
}

impl Ipv4Flow {
    pub const WIRE_SIZE: usize = 4 + 4 + 4 + 4 + 4 * 4;
}

impl Default for Ipv4Flow {
    fn default() -> Self {
        Self {
            length: 0,
            protocol: 0,
            src_ip: Ipv4Addr::UNSPECIFIED,
            dst_ip: Ipv4Addr::UNSPECIFIED,
            src_port: 0,
            dst_port: 0,
            tcp_flags: 0,
            tos: 0,
        }
    }
}

impl Record for Ipv4Flow {
    const TYPE_TAG: u32 = FLOW_IPV4;

    fn decode(reader: &mut ByteReader<'_>, _limits: &Limits) -> CodecResult<Self> {
        let mut record = Self::default();
        let mut src = [0u8; 4];
        let mut dst = [0u8; 4];
        reader.read_fields(&mut [
            FieldMut::from(&mut record.length),
            FieldMut::from(&mut record.protocol),
            FieldMut::Opaque(&mut src),
            FieldMut::Opaque(&mut dst),
            FieldMut::from(&mut record.src_port),
            FieldMut::from(&mut record.dst_port),
            FieldMut::from(&mut record.tcp_flags),
            FieldMut::from(&mut record.tos),
        ])?;
        record.src_ip = Ipv4Addr::from(src);
        record.dst_ip = Ipv4Addr::from(dst);
        Ok(record)
    }

    fn encoded_len(&self) -> usize {
        Self::WIRE_SIZE
    }

    fn encode_body(&self, writer: &mut ByteWriter) -> CodecResult<()> {
        writer.write_fields(&[
            FieldRef::from(self.length),
            FieldRef::from(self.protocol),
            FieldRef::Opaque(&self.src_ip.octets()),
            FieldRef::Opaque(&self.dst_ip.octets()),
            FieldRef::from(self.src_port),
            FieldRef::from(self.dst_port),
            FieldRef::from(self.tcp_flags),
            FieldRef::from(self.tos),
        ]);
        Ok(())
    }
}

/// Decoded IPv6 header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ipv6Flow {
    pub length: u32,
    pub protocol: u32,
    pub src_ip: Ipv6Addr,
    pub dst_ip: Ipv6Addr,
    pub src_port: u32,
    pub dst_port: u32,
    pub tcp_flags: u32,
    pub priority: u32,
}

impl Ipv6Flow {
    pub const WIRE_SIZE: usize = 4 + 4 + 16 + 16 + 4 * 4;
}

impl Default for Ipv6Flow {
    fn default() -> Self {
        Self {
            length: 0,
            protocol: 0,
            src_ip: Ipv6Addr::UNSPECIFIED,
            dst_ip: Ipv6Addr::UNSPECIFIED,
            src_port: 0,
            dst_port: 0,
            tcp_flags: 0,
            priority: 0,
        }
    }
}

impl Record for Ipv6Flow {
    const TYPE_TAG: u32 = FLOW_IPV6;

    fn decode(reader: &mut ByteReader<'_>, _limits: &Limits) -> CodecResult<Self> {
        let mut record = Self::default();
        let mut src = [0u8; 16];
        let mut dst = [0u8; 16];
        reader.read_fields(&mut [
            FieldMut::from(&mut record.length),
            FieldMut::from(&mut record.protocol),
            FieldMut::Opaque(&mut src),
            FieldMut::Opaque(&mut dst),
            FieldMut::from(&mut record.src_port),
            FieldMut::from(&mut record.dst_port),
            FieldMut::from(&mut record.tcp_flags),
            FieldMut::from(&mut record.priority),
        ])?;
        record.src_ip = Ipv6Addr::from(src);
        record.dst_ip = Ipv6Addr::from(dst);
        Ok(record)
    }

    fn encoded_len(&self) -> usize {
        Self::WIRE_SIZE
    }

    fn encode_body(&self, writer: &mut ByteWriter) -> CodecResult<()> {
        writer.write_fields(&[
            FieldRef::from(self.length),
            FieldRef::from(self.protocol),
            FieldRef::Opaque(&self.src_ip.octets()),
            FieldRef::Opaque(&self.dst_ip.octets()),
            FieldRef::from(self.src_port),
            FieldRef::from(self.dst_port),
            FieldRef::from(self.tcp_flags),
            FieldRef::from(self.priority),
        ]);
        Ok(())
    }
}

fixed_record! {
    /// 802.1Q VLAN and priority on the ingress and egress sides.
    pub struct ExtendedSwitchFlow = FLOW_EXTENDED_SWITCH {
        src_vlan: u32,
        src_priority: u32,
        dst_vlan: u32,
        dst_priority: u32,
    }
}

/// A flow record of any known type, or an unknown one kept verbatim.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlowRecord {
    RawPacket(RawPacketFlow),
    EthernetFrame(EthernetFrameFlow),
    Ipv4(Ipv4Flow),
    Ipv6(Ipv6Flow),
    ExtendedSwitch(ExtendedSwitchFlow),
    /// Unrecognised tag; `data` is the skipped body.
    Unknown { tag: u32, data: Vec<u8> },
}

impl FlowRecord {
    /// Reads one framed flow record.
    ///
    /// Unknown tags are skipped by their declared length and kept as
    /// [`FlowRecord::Unknown`].
    pub fn decode(reader: &mut ByteReader<'_>, limits: &Limits) -> CodecResult<Self> {
        let frame = read_frame(reader, LimitKind::RecordLength, limits.max_record_len)?;
        let body = frame.body;
        let record = match frame.tag {
            FLOW_RAW_PACKET => Self::RawPacket(RawPacketFlow::decode_body(body, limits)?),
            FLOW_ETHERNET_FRAME => {
                Self::EthernetFrame(EthernetFrameFlow::decode_body(body, limits)?)
            }
            FLOW_IPV4 => Self::Ipv4(Ipv4Flow::decode_body(body, limits)?),
            FLOW_IPV6 => Self::Ipv6(Ipv6Flow::decode_body(body, limits)?),
            FLOW_EXTENDED_SWITCH => {
                Self::ExtendedSwitch(ExtendedSwitchFlow::decode_body(body, limits)?)
            }
            tag => {
                debug!(tag, length = body.len(), "skipping unknown flow record");
                Self::Unknown {
                    tag,
                    data: body.to_vec(),
                }
            }
        };
        Ok(record)
    }

    /// Writes the record with its tag and length prefix.
    pub fn encode(&self, writer: &mut ByteWriter) -> CodecResult<usize> {
        match self {
            Self::RawPacket(r) => r.encode(writer),
            Self::EthernetFrame(r) => r.encode(writer),
            Self::Ipv4(r) => r.encode(writer),
            Self::Ipv6(r) => r.encode(writer),
            Self::ExtendedSwitch(r) => r.encode(writer),
            Self::Unknown { tag, data } => encode_opaque(writer, *tag, data),
        }
    }

    #[must_use]
    pub const fn type_tag(&self) -> u32 {
        match self {
            Self::RawPacket(_) => FLOW_RAW_PACKET,
            Self::EthernetFrame(_) => FLOW_ETHERNET_FRAME,
            Self::Ipv4(_) => FLOW_IPV4,
            Self::Ipv6(_) => FLOW_IPV6,
            Self::ExtendedSwitch(_) => FLOW_EXTENDED_SWITCH,
            Self::Unknown { tag, .. } => *tag,
        }
    }

    /// Body length in bytes, excluding the frame header.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        match self {
            Self::RawPacket(r) => r.encoded_len(),
            Self::EthernetFrame(r) => r.encoded_len(),
            Self::Ipv4(r) => r.encoded_len(),
            Self::Ipv6(r) => r.encoded_len(),
            Self::ExtendedSwitch(r) => r.encoded_len(),
            Self::Unknown { data, .. } => data.len(),
        }
    }
}

impl From<RawPacketFlow> for FlowRecord {
    fn from(record: RawPacketFlow) -> Self {
        Self::RawPacket(record)
    }
}

impl From<ExtendedSwitchFlow> for FlowRecord {
    fn from(record: ExtendedSwitchFlow) -> Self {
        Self::ExtendedSwitch(record)
    }
}
