//! Datagram encoding and decoding.

use std::net::IpAddr;

use bytestream::{ByteReader, ByteWriter};
use tracing::trace;
use wire::{
    check_count, decode_header, encode_header, DatagramHeader, DecodeError, LimitKind, Limits,
};

use crate::error::CodecResult;
use crate::record::wire_count;
use crate::sample::Sample;

/// A decoded sFlow datagram.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Datagram {
    pub header: DatagramHeader,
    pub samples: Vec<Sample>,
}

impl Datagram {
    /// Creates a datagram whose header sample count matches `samples`.
    #[must_use]
    pub fn new(
        agent_address: IpAddr,
        sub_agent_id: u32,
        sequence_number: u32,
        uptime: u32,
        samples: Vec<Sample>,
    ) -> Self {
        let count = u32::try_from(samples.len()).unwrap_or(u32::MAX);
        Self {
            header: DatagramHeader::new(
                agent_address,
                sub_agent_id,
                sequence_number,
                uptime,
                count,
            ),
            samples,
        }
    }

    /// Decodes a datagram that fills `bytes`.
    pub fn decode(bytes: &[u8], limits: &Limits) -> CodecResult<Self> {
        decode_datagram(bytes, limits)
    }

    /// Encodes the datagram into a new buffer.
    pub fn encode(&self) -> CodecResult<Vec<u8>> {
        let mut writer = ByteWriter::with_capacity(self.header.encoded_len() + 256);
        self.encode_into(&mut writer)?;
        Ok(writer.finish())
    }

    /// Appends the encoded datagram to `writer`.
    ///
    /// The sample count written is the length of `samples`, whatever the
    /// header says.
    pub fn encode_into(&self, writer: &mut ByteWriter) -> CodecResult<()> {
        let header = DatagramHeader {
            sample_count: wire_count(self.samples.len())?,
            ..self.header
        };
        encode_header(&header, writer);
        for sample in &self.samples {
            sample.encode(writer)?;
        }
        Ok(())
    }
}

/// Decodes a datagram.
///
/// Bytes after the last declared sample are ignored.
pub fn decode_datagram(bytes: &[u8], limits: &Limits) -> CodecResult<Datagram> {
    if bytes.len() > limits.max_datagram_bytes {
        return Err(DecodeError::LimitsExceeded {
            kind: LimitKind::DatagramBytes,
            limit: limits.max_datagram_bytes,
            actual: bytes.len(),
        }
        .into());
    }
    let (datagram, consumed) = decode_datagram_prefix(bytes, limits)?;
    if consumed < bytes.len() {
        trace!(
            trailing = bytes.len() - consumed,
            "ignoring bytes after last sample"
        );
    }
    Ok(datagram)
}

/// Decodes a datagram from the front of `bytes`.
///
/// Returns the datagram and the number of bytes it occupied.
pub fn decode_datagram_prefix(bytes: &[u8], limits: &Limits) -> CodecResult<(Datagram, usize)> {
    let mut reader = ByteReader::new(bytes);
    let header = decode_header(&mut reader)?;

    let capacity = check_count(
        header.sample_count,
        LimitKind::SampleCount,
        limits.max_samples,
        reader.remaining(),
    )?;
    let mut samples = Vec::with_capacity(capacity);
    for _ in 0..header.sample_count {
        samples.push(Sample::decode(&mut reader, limits)?);
    }

    Ok((Datagram { header, samples }, reader.position()))
}

/// Encodes a datagram from its parts.
pub fn encode_datagram(
    agent_address: IpAddr,
    sub_agent_id: u32,
    sequence_number: u32,
    uptime: u32,
    samples: &[Sample],
) -> CodecResult<Vec<u8>> {
    let header = DatagramHeader::new(
        agent_address,
        sub_agent_id,
        sequence_number,
        uptime,
        wire_count(samples.len())?,
    );
    let mut writer = ByteWriter::with_capacity(header.encoded_len() + 256);
    encode_header(&header, &mut writer);
    for sample in samples {
        sample.encode(&mut writer)?;
    }
    Ok(writer.finish())
}
