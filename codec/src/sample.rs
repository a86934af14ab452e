//! Flow, counter and discarded-packet samples.

use bytestream::{ByteReader, ByteWriter, FieldMut, FieldRef};
use tracing::{debug, trace};
use wire::{check_count, read_frame, write_frame, LimitKind, Limits, SampleKind};

use crate::counter::CounterRecord;
use crate::error::CodecResult;
use crate::flow::FlowRecord;
use crate::record::{encode_opaque, wire_count};
use crate::types::{InterfaceId, SourceId};

/// A packet sample with a compact source id.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlowSample {
    pub sequence_number: u32,
    pub source_id: SourceId,
    /// One packet in `sampling_rate` was sampled.
    pub sampling_rate: u32,
    /// Packets that could have been sampled.
    pub sample_pool: u32,
    /// Samples dropped for lack of resources.
    pub drops: u32,
    pub input: u32,
    pub output: u32,
    pub records: Vec<FlowRecord>,
}

/// A packet sample with two-word source and interface ids.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExpandedFlowSample {
    pub sequence_number: u32,
    pub source_id: SourceId,
    pub sampling_rate: u32,
    pub sample_pool: u32,
    pub drops: u32,
    pub input: InterfaceId,
    pub output: InterfaceId,
    pub records: Vec<FlowRecord>,
}

/// A counter sample with a compact source id.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CounterSample {
    pub sequence_number: u32,
    pub source_id: SourceId,
    pub records: Vec<CounterRecord>,
}

/// A counter sample with a two-word source id.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExpandedCounterSample {
    pub sequence_number: u32,
    pub source_id: SourceId,
    pub records: Vec<CounterRecord>,
}

/// A packet dropped by the device, reported with the reason it was dropped.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiscardedPacket {
    pub sequence_number: u32,
    pub source_id: SourceId,
    pub drops: u32,
    pub input: u32,
    pub output: u32,
    /// Drop reason code.
    pub reason: u32,
    pub records: Vec<FlowRecord>,
}

/// A sample of any known kind, or an unknown one kept verbatim.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sample {
    Flow(FlowSample),
    Counter(CounterSample),
    ExpandedFlow(ExpandedFlowSample),
    ExpandedCounter(ExpandedCounterSample),
    DiscardedPacket(DiscardedPacket),
    /// Unrecognised tag; `data` is the skipped body.
    Unknown { tag: u32, data: Vec<u8> },
}

fn decode_records<T>(
    reader: &mut ByteReader<'_>,
    limits: &Limits,
    decode: fn(&mut ByteReader<'_>, &Limits) -> CodecResult<T>,
) -> CodecResult<Vec<T>> {
    let count = reader.read_u32()?;
    let capacity = check_count(
        count,
        LimitKind::RecordCount,
        limits.max_records,
        reader.remaining(),
    )?;
    let mut records = Vec::with_capacity(capacity);
    for _ in 0..count {
        records.push(decode(reader, limits)?);
    }
    Ok(records)
}

fn encode_records<T>(
    writer: &mut ByteWriter,
    records: &[T],
    encode: fn(&T, &mut ByteWriter) -> CodecResult<usize>,
) -> CodecResult<()> {
    writer.write_u32(wire_count(records.len())?);
    for record in records {
        encode(record, writer)?;
    }
    Ok(())
}

impl FlowSample {
    pub const KIND: SampleKind = SampleKind::Flow;

    /// Decodes the sample body (after the tag and length).
    pub fn decode(reader: &mut ByteReader<'_>, limits: &Limits) -> CodecResult<Self> {
        let mut sample = Self::default();
        let mut source = 0u32;
        reader.read_fields(&mut [
            FieldMut::from(&mut sample.sequence_number),
            FieldMut::from(&mut source),
            FieldMut::from(&mut sample.sampling_rate),
            FieldMut::from(&mut sample.sample_pool),
            FieldMut::from(&mut sample.drops),
            FieldMut::from(&mut sample.input),
            FieldMut::from(&mut sample.output),
        ])?;
        sample.source_id = SourceId::from_compact(source);
        sample.records = decode_records(reader, limits, FlowRecord::decode)?;
        Ok(sample)
    }

    pub fn encode_body(&self, writer: &mut ByteWriter) -> CodecResult<()> {
        writer.write_fields(&[
            FieldRef::from(self.sequence_number),
            FieldRef::from(self.source_id.to_compact()?),
            FieldRef::from(self.sampling_rate),
            FieldRef::from(self.sample_pool),
            FieldRef::from(self.drops),
            FieldRef::from(self.input),
            FieldRef::from(self.output),
        ]);
        encode_records(writer, &self.records, FlowRecord::encode)
    }
}

impl ExpandedFlowSample {
    pub const KIND: SampleKind = SampleKind::ExpandedFlow;

    pub fn decode(reader: &mut ByteReader<'_>, limits: &Limits) -> CodecResult<Self> {
        let mut sample = Self::default();
        reader.read_fields(&mut [
            FieldMut::from(&mut sample.sequence_number),
            FieldMut::from(&mut sample.source_id.source_type),
            FieldMut::from(&mut sample.source_id.index),
            FieldMut::from(&mut sample.sampling_rate),
            FieldMut::from(&mut sample.sample_pool),
            FieldMut::from(&mut sample.drops),
            FieldMut::from(&mut sample.input.format),
            FieldMut::from(&mut sample.input.value),
            FieldMut::from(&mut sample.output.format),
            FieldMut::from(&mut sample.output.value),
        ])?;
        sample.records = decode_records(reader, limits, FlowRecord::decode)?;
        Ok(sample)
    }

    pub fn encode_body(&self, writer: &mut ByteWriter) -> CodecResult<()> {
        writer.write_fields(&[
            FieldRef::from(self.sequence_number),
            FieldRef::from(self.source_id.source_type),
            FieldRef::from(self.source_id.index),
            FieldRef::from(self.sampling_rate),
            FieldRef::from(self.sample_pool),
            FieldRef::from(self.drops),
            FieldRef::from(self.input.format),
            FieldRef::from(self.input.value),
            FieldRef::from(self.output.format),
            FieldRef::from(self.output.value),
        ]);
        encode_records(writer, &self.records, FlowRecord::encode)
    }
}

impl CounterSample {
    pub const KIND: SampleKind = SampleKind::Counter;

    pub fn decode(reader: &mut ByteReader<'_>, limits: &Limits) -> CodecResult<Self> {
        let sequence_number = reader.read_u32()?;
        let source_id = SourceId::from_compact(reader.read_u32()?);
        let records = decode_records(reader, limits, CounterRecord::decode)?;
        Ok(Self {
            sequence_number,
            source_id,
            records,
        })
    }

    pub fn encode_body(&self, writer: &mut ByteWriter) -> CodecResult<()> {
        writer.write_u32(self.sequence_number);
        writer.write_u32(self.source_id.to_compact()?);
        encode_records(writer, &self.records, CounterRecord::encode)
    }
}

impl ExpandedCounterSample {
    pub const KIND: SampleKind = SampleKind::ExpandedCounter;

    pub fn decode(reader: &mut ByteReader<'_>, limits: &Limits) -> CodecResult<Self> {
        let sequence_number = reader.read_u32()?;
        let source_type = reader.read_u32()?;
        let index = reader.read_u32()?;
        let records = decode_records(reader, limits, CounterRecord::decode)?;
        Ok(Self {
            sequence_number,
            source_id: SourceId::new(source_type, index),
            records,
        })
    }

    pub fn encode_body(&self, writer: &mut ByteWriter) -> CodecResult<()> {
        writer.write_u32(self.sequence_number);
        writer.write_u32(self.source_id.source_type);
        writer.write_u32(self.source_id.index);
        encode_records(writer, &self.records, CounterRecord::encode)
    }
}

impl DiscardedPacket {
    pub const KIND: SampleKind = SampleKind::DiscardedPacket;

    pub fn decode(reader: &mut ByteReader<'_>, limits: &Limits) -> CodecResult<Self> {
        let mut sample = Self::default();
        reader.read_fields(&mut [
            FieldMut::from(&mut sample.sequence_number),
            FieldMut::from(&mut sample.source_id.source_type),
            FieldMut::from(&mut sample.source_id.index),
            FieldMut::from(&mut sample.drops),
            FieldMut::from(&mut sample.input),
            FieldMut::from(&mut sample.output),
            FieldMut::from(&mut sample.reason),
        ])?;
        sample.records = decode_records(reader, limits, FlowRecord::decode)?;
        Ok(sample)
    }

    pub fn encode_body(&self, writer: &mut ByteWriter) -> CodecResult<()> {
        writer.write_fields(&[
            FieldRef::from(self.sequence_number),
            FieldRef::from(self.source_id.source_type),
            FieldRef::from(self.source_id.index),
            FieldRef::from(self.drops),
            FieldRef::from(self.input),
            FieldRef::from(self.output),
            FieldRef::from(self.reason),
        ]);
        encode_records(writer, &self.records, FlowRecord::encode)
    }
}

impl Sample {
    /// Reads one framed sample.
    ///
    /// The body is decoded from a reader bounded to the declared length, so
    /// trailing bytes inside the sample are skipped. Unknown tags are kept as
    /// [`Sample::Unknown`].
    pub fn decode(reader: &mut ByteReader<'_>, limits: &Limits) -> CodecResult<Self> {
        let frame = read_frame(reader, LimitKind::SampleLength, limits.max_sample_len)?;
        let mut body = frame.reader();

        let sample = match SampleKind::parse(frame.tag) {
            Some(SampleKind::Flow) => Self::Flow(FlowSample::decode(&mut body, limits)?),
            Some(SampleKind::Counter) => Self::Counter(CounterSample::decode(&mut body, limits)?),
            Some(SampleKind::ExpandedFlow) => {
                Self::ExpandedFlow(ExpandedFlowSample::decode(&mut body, limits)?)
            }
            Some(SampleKind::ExpandedCounter) => {
                Self::ExpandedCounter(ExpandedCounterSample::decode(&mut body, limits)?)
            }
            Some(SampleKind::DiscardedPacket) => {
                Self::DiscardedPacket(DiscardedPacket::decode(&mut body, limits)?)
            }
            None => {
                debug!(
                    tag = frame.tag,
                    length = frame.body.len(),
                    "skipping unknown sample"
                );
                return Ok(Self::Unknown {
                    tag: frame.tag,
                    data: frame.body.to_vec(),
                });
            }
        };

        if !body.is_empty() {
            trace!(
                tag = frame.tag,
                slack = body.remaining(),
                "ignoring trailing sample bytes"
            );
        }
        Ok(sample)
    }

    /// Writes the sample with its tag and length prefix.
    ///
    /// Returns the body length written.
    pub fn encode(&self, writer: &mut ByteWriter) -> CodecResult<usize> {
        match self {
            Self::Flow(s) => write_frame(writer, self.type_tag(), |w| s.encode_body(w)),
            Self::Counter(s) => write_frame(writer, self.type_tag(), |w| s.encode_body(w)),
            Self::ExpandedFlow(s) => write_frame(writer, self.type_tag(), |w| s.encode_body(w)),
            Self::ExpandedCounter(s) => {
                write_frame(writer, self.type_tag(), |w| s.encode_body(w))
            }
            Self::DiscardedPacket(s) => {
                write_frame(writer, self.type_tag(), |w| s.encode_body(w))
            }
            Self::Unknown { tag, data } => encode_opaque(writer, *tag, data),
        }
    }

    /// Returns the sample kind, or `None` for unknown samples.
    #[must_use]
    pub const fn kind(&self) -> Option<SampleKind> {
        match self {
            Self::Flow(_) => Some(FlowSample::KIND),
            Self::Counter(_) => Some(CounterSample::KIND),
            Self::ExpandedFlow(_) => Some(ExpandedFlowSample::KIND),
            Self::ExpandedCounter(_) => Some(ExpandedCounterSample::KIND),
            Self::DiscardedPacket(_) => Some(DiscardedPacket::KIND),
            Self::Unknown { .. } => None,
        }
    }

    #[must_use]
    pub const fn type_tag(&self) -> u32 {
        match self {
            Self::Flow(_) => FlowSample::KIND.tag(),
            Self::Counter(_) => CounterSample::KIND.tag(),
            Self::ExpandedFlow(_) => ExpandedFlowSample::KIND.tag(),
            Self::ExpandedCounter(_) => ExpandedCounterSample::KIND.tag(),
            Self::DiscardedPacket(_) => DiscardedPacket::KIND.tag(),
            Self::Unknown { tag, .. } => *tag,
        }
    }

    #[must_use]
    pub const fn sequence_number(&self) -> Option<u32> {
        match self {
            Self::Flow(s) => Some(s.sequence_number),
            Self::Counter(s) => Some(s.sequence_number),
            Self::ExpandedFlow(s) => Some(s.sequence_number),
            Self::ExpandedCounter(s) => Some(s.sequence_number),
            Self::DiscardedPacket(s) => Some(s.sequence_number),
            Self::Unknown { .. } => None,
        }
    }

    #[must_use]
    pub const fn source_id(&self) -> Option<SourceId> {
        match self {
            Self::Flow(s) => Some(s.source_id),
            Self::Counter(s) => Some(s.source_id),
            Self::ExpandedFlow(s) => Some(s.source_id),
            Self::ExpandedCounter(s) => Some(s.source_id),
            Self::DiscardedPacket(s) => Some(s.source_id),
            Self::Unknown { .. } => None,
        }
    }

    /// Number of records in the sample; zero for unknown samples.
    #[must_use]
    pub fn record_count(&self) -> usize {
        match self {
            Self::Flow(s) => s.records.len(),
            Self::Counter(s) => s.records.len(),
            Self::ExpandedFlow(s) => s.records.len(),
            Self::ExpandedCounter(s) => s.records.len(),
            Self::DiscardedPacket(s) => s.records.len(),
            Self::Unknown { .. } => 0,
        }
    }
}

impl From<FlowSample> for Sample {
    fn from(sample: FlowSample) -> Self {
        Self::Flow(sample)
    }
}

impl From<CounterSample> for Sample {
    fn from(sample: CounterSample) -> Self {
        Self::Counter(sample)
    }
}

impl From<ExpandedFlowSample> for Sample {
    fn from(sample: ExpandedFlowSample) -> Self {
        Self::ExpandedFlow(sample)
    }
}

impl From<ExpandedCounterSample> for Sample {
    fn from(sample: ExpandedCounterSample) -> Self {
        Self::ExpandedCounter(sample)
    }
}

impl From<DiscardedPacket> for Sample {
    fn from(sample: DiscardedPacket) -> Self {
        Self::DiscardedPacket(sample)
    }
}
