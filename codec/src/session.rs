//! Stateful decoder and encoder over byte streams.

use std::io::{self, Read, Seek, SeekFrom, Write};
use std::net::IpAddr;

use bytestream::ByteWriter;
use tracing::debug;
use wire::{DatagramHeader, Limits};

use crate::datagram::{decode_datagram_prefix, Datagram};
use crate::error::{CodecError, CodecResult};
use crate::record::wire_count;
use crate::sample::Sample;

/// Decodes datagrams from a seekable byte source.
///
/// Each call reads at most `max_datagram_bytes` from the current position,
/// decodes one datagram, and seeks the source to the byte after it, so a
/// capture holding several datagrams back to back decodes one by one. A
/// datagram that fails to decode leaves the source where it started.
#[derive(Debug)]
pub struct Decoder<R> {
    reader: R,
    limits: Limits,
    buf: Vec<u8>,
}

impl<R: Read + Seek> Decoder<R> {
    /// Creates a decoder with default limits.
    pub fn new(reader: R) -> Self {
        Self::with_limits(reader, Limits::default())
    }

    pub fn with_limits(reader: R, limits: Limits) -> Self {
        Self {
            reader,
            limits,
            buf: Vec::new(),
        }
    }

    /// Replaces the source, keeping limits and buffers.
    pub fn reset(&mut self, reader: R) {
        self.reader = reader;
        self.buf.clear();
    }

    /// Decodes the next datagram; an empty source is a truncation error.
    pub fn decode(&mut self) -> CodecResult<Datagram> {
        match self.decode_next()? {
            Some(datagram) => Ok(datagram),
            None => Err(wire::DecodeError::Truncated {
                needed: wire::HEADER_SIZE_IPV4,
                available: 0,
            }
            .into()),
        }
    }

    /// Decodes the next datagram, or returns `None` at a clean end of input.
    pub fn decode_next(&mut self) -> CodecResult<Option<Datagram>> {
        let start = self.reader.stream_position()?;
        self.buf.clear();
        let window = u64::try_from(self.limits.max_datagram_bytes).unwrap_or(u64::MAX);
        (&mut self.reader).take(window).read_to_end(&mut self.buf)?;
        if self.buf.is_empty() {
            return Ok(None);
        }

        let (datagram, consumed) = match decode_datagram_prefix(&self.buf, &self.limits) {
            Ok(decoded) => decoded,
            Err(err) => {
                self.reader.seek(SeekFrom::Start(start))?;
                return Err(err);
            }
        };
        let end = start + consumed as u64;
        self.reader.seek(SeekFrom::Start(end))?;
        debug!(
            offset = start,
            length = consumed,
            samples = datagram.samples.len(),
            "decoded datagram"
        );
        Ok(Some(datagram))
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

/// Encodes datagrams for one agent, numbering them as it goes.
#[derive(Debug, Clone)]
pub struct Encoder {
    agent_address: IpAddr,
    sub_agent_id: u32,
    sequence_number: u32,
    uptime: u32,
}

impl Encoder {
    /// Creates an encoder whose first datagram carries `sequence_number`.
    #[must_use]
    pub const fn new(agent_address: IpAddr, sub_agent_id: u32, sequence_number: u32) -> Self {
        Self {
            agent_address,
            sub_agent_id,
            sequence_number,
            uptime: 0,
        }
    }

    /// Sets the agent uptime in milliseconds written into the next datagram.
    pub fn set_uptime(&mut self, uptime: u32) {
        self.uptime = uptime;
    }

    /// Sequence number the next datagram will carry.
    #[must_use]
    pub const fn sequence_number(&self) -> u32 {
        self.sequence_number
    }

    #[must_use]
    pub const fn agent_address(&self) -> IpAddr {
        self.agent_address
    }

    /// Encodes one datagram into `out` and advances the sequence number.
    ///
    /// Returns the number of bytes written.
    pub fn encode<W: Write>(&mut self, mut out: W, samples: &[Sample]) -> CodecResult<usize> {
        if samples.is_empty() {
            return Err(CodecError::NoSamples);
        }

        let header = DatagramHeader::new(
            self.agent_address,
            self.sub_agent_id,
            self.sequence_number,
            self.uptime,
            wire_count(samples.len())?,
        );
        let mut writer = ByteWriter::with_capacity(header.encoded_len() + 256);
        wire::encode_header(&header, &mut writer);
        for sample in samples {
            sample.encode(&mut writer)?;
        }

        let bytes = writer.finish();
        out.write_all(&bytes)?;
        out.flush()?;

        self.sequence_number = self.sequence_number.wrapping_add(1);
        Ok(bytes.len())
    }

    /// Encodes one datagram into a new buffer and advances the sequence number.
    pub fn encode_to_vec(&mut self, samples: &[Sample]) -> CodecResult<Vec<u8>> {
        let mut out = Vec::new();
        self.encode(&mut out, samples)?;
        Ok(out)
    }
}

impl From<CodecError> for io::Error {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Io { kind, message } => Self::new(kind, message),
            other => Self::new(io::ErrorKind::InvalidData, other),
        }
    }
}
