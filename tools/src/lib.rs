//! Inspection and debugging tools for sFlow v5 datagram dumps.
//!
//! A dump is a file of raw datagrams written back to back, as captured from
//! UDP port 6343. This crate provides utilities for looking inside one:
//!
//! - Summarize datagram headers and per-sample record tags
//! - Decode datagrams into structured JSON or a readable listing
//! - Verify that decoding then encoding reproduces the captured bytes
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not afterthoughts.
//! - **Human-readable output** - Make it easy to see what an agent actually sent.

use std::fmt::Write as _;
use std::io::Cursor;

use anyhow::{Context, Result};
use codec::{
    decode_datagram_prefix, CounterRecord, Datagram, DatagramHeader, Decoder, FlowRecord, Limits,
    Sample, SampleKind, SourceId,
};
use serde::Serialize;
use tracing::debug;

/// One datagram located inside a dump.
#[derive(Debug, Clone)]
pub struct DumpDatagram<'a> {
    /// Byte offset of the datagram within the dump.
    pub offset: usize,
    /// The bytes the datagram occupied.
    pub bytes: &'a [u8],
    pub datagram: Datagram,
}

/// Header and sample summary for one datagram.
#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    pub offset: usize,
    pub length: usize,
    pub header: DatagramHeader,
    pub samples: Vec<SampleSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleSummary {
    pub tag: u32,
    pub kind: &'static str,
    pub sequence_number: Option<u32>,
    pub source_id: Option<SourceId>,
    pub record_tags: Vec<u32>,
}

/// Result of re-encoding one datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VerifyOutcome {
    pub offset: usize,
    pub length: usize,
    pub reencoded_length: usize,
    pub identical: bool,
}

/// Splits a dump into datagrams, decoding each one.
pub fn split_dump<'a>(bytes: &'a [u8], limits: &Limits) -> Result<Vec<DumpDatagram<'a>>> {
    let mut datagrams = Vec::new();
    let mut offset = 0;
    while offset < bytes.len() {
        let rest = &bytes[offset..];
        let (datagram, consumed) = decode_datagram_prefix(rest, limits)
            .with_context(|| format!("decode datagram at offset {offset}"))?;
        datagrams.push(DumpDatagram {
            offset,
            bytes: &rest[..consumed],
            datagram,
        });
        offset += consumed;
    }
    debug!(count = datagrams.len(), "split dump");
    Ok(datagrams)
}

/// Decodes every datagram in a dump.
pub fn decode_dump(bytes: &[u8], limits: &Limits) -> Result<Vec<Datagram>> {
    let mut decoder = Decoder::with_limits(Cursor::new(bytes), limits.clone());
    let mut datagrams = Vec::new();
    while let Some(datagram) = decoder
        .decode_next()
        .with_context(|| format!("decode datagram #{}", datagrams.len()))?
    {
        datagrams.push(datagram);
    }
    let consumed = decoder.into_inner().position();
    debug!(count = datagrams.len(), bytes = consumed, "decoded dump");
    Ok(datagrams)
}

pub fn inspect_dump(bytes: &[u8], limits: &Limits) -> Result<Vec<InspectReport>> {
    let reports = split_dump(bytes, limits)?
        .into_iter()
        .map(|entry| InspectReport {
            offset: entry.offset,
            length: entry.bytes.len(),
            header: entry.datagram.header,
            samples: entry.datagram.samples.iter().map(summarize_sample).collect(),
        })
        .collect();
    Ok(reports)
}

/// Re-encodes every datagram and compares it with the captured bytes.
///
/// Datagrams whose samples or records carry slack after their declared
/// fields re-encode shorter and are reported as not identical.
pub fn verify_dump(bytes: &[u8], limits: &Limits) -> Result<Vec<VerifyOutcome>> {
    split_dump(bytes, limits)?
        .into_iter()
        .map(|entry| {
            let encoded = entry
                .datagram
                .encode()
                .with_context(|| format!("encode datagram at offset {}", entry.offset))?;
            Ok(VerifyOutcome {
                offset: entry.offset,
                length: entry.bytes.len(),
                reencoded_length: encoded.len(),
                identical: encoded == entry.bytes,
            })
        })
        .collect()
}

pub fn summarize_sample(sample: &Sample) -> SampleSummary {
    SampleSummary {
        tag: sample.type_tag(),
        kind: sample_kind_label(sample.kind()),
        sequence_number: sample.sequence_number(),
        source_id: sample.source_id(),
        record_tags: record_tags(sample),
    }
}

pub const fn sample_kind_label(kind: Option<SampleKind>) -> &'static str {
    match kind {
        Some(SampleKind::Flow) => "flow",
        Some(SampleKind::Counter) => "counter",
        Some(SampleKind::ExpandedFlow) => "expanded_flow",
        Some(SampleKind::ExpandedCounter) => "expanded_counter",
        Some(SampleKind::DiscardedPacket) => "discarded_packet",
        None => "unknown",
    }
}

fn record_tags(sample: &Sample) -> Vec<u32> {
    match sample {
        Sample::Flow(s) => flow_tags(&s.records),
        Sample::ExpandedFlow(s) => flow_tags(&s.records),
        Sample::DiscardedPacket(s) => flow_tags(&s.records),
        Sample::Counter(s) => counter_tags(&s.records),
        Sample::ExpandedCounter(s) => counter_tags(&s.records),
        Sample::Unknown { .. } => Vec::new(),
    }
}

fn flow_tags(records: &[FlowRecord]) -> Vec<u32> {
    records.iter().map(FlowRecord::type_tag).collect()
}

fn counter_tags(records: &[CounterRecord]) -> Vec<u32> {
    records.iter().map(CounterRecord::type_tag).collect()
}

/// Formats decoded datagrams as an indented listing.
pub fn format_decode_pretty(datagrams: &[Datagram]) -> String {
    let mut out = String::new();
    for (index, datagram) in datagrams.iter().enumerate() {
        let header = &datagram.header;
        let _ = writeln!(
            out,
            "datagram #{index}: agent {} sub_agent {} seq {} uptime {}ms samples {}",
            header.agent_address,
            header.sub_agent_id,
            header.sequence_number,
            header.uptime,
            datagram.samples.len()
        );
        for (sample_index, sample) in datagram.samples.iter().enumerate() {
            let summary = summarize_sample(sample);
            let source = summary.source_id.map_or_else(
                || "-".to_string(),
                |id| format!("{}:{}", id.source_type, id.index),
            );
            let _ = writeln!(
                out,
                "  [{sample_index}] {} (tag {}) source {source} records {}",
                summary.kind,
                summary.tag,
                summary.record_tags.len()
            );
            write_records(&mut out, sample);
        }
    }
    out
}

fn write_records(out: &mut String, sample: &Sample) {
    match sample {
        Sample::Flow(s) => s.records.iter().for_each(|r| push_record(out, r)),
        Sample::ExpandedFlow(s) => s.records.iter().for_each(|r| push_record(out, r)),
        Sample::DiscardedPacket(s) => s.records.iter().for_each(|r| push_record(out, r)),
        Sample::Counter(s) => s.records.iter().for_each(|r| push_record(out, r)),
        Sample::ExpandedCounter(s) => s.records.iter().for_each(|r| push_record(out, r)),
        Sample::Unknown { data, .. } => {
            let _ = writeln!(out, "      {} opaque bytes", data.len());
        }
    }
}

fn push_record(out: &mut String, record: &impl std::fmt::Debug) {
    let _ = writeln!(out, "      {record:?}");
}
