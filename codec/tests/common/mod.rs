//! Hand-assembled datagrams, built field by field the way an agent sends them.

#![allow(dead_code)]

use std::net::Ipv4Addr;

/// Big-endian byte builder for test captures.
#[derive(Default)]
pub struct Capture {
    bytes: Vec<u8>,
}

impl Capture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn u32(mut self, value: u32) -> Self {
        self.bytes.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn u64(mut self, value: u64) -> Self {
        self.bytes.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn f32(mut self, value: f32) -> Self {
        self.bytes.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn zeros(mut self, count: usize) -> Self {
        self.bytes.resize(self.bytes.len() + count, 0);
        self
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    /// Appends a tag, the body length and the body.
    pub fn frame(self, tag: u32, body: Self) -> Self {
        let len = u32::try_from(body.bytes.len()).unwrap();
        self.u32(tag).u32(len).raw(&body.bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}

/// A version 5 datagram header from an IPv4 agent.
pub fn v4_header(agent: Ipv4Addr, sequence: u32, uptime: u32, samples: u32) -> Capture {
    Capture::new()
        .u32(5)
        .u32(1)
        .raw(&agent.octets())
        .u32(0)
        .u32(sequence)
        .u32(uptime)
        .u32(samples)
}

/// A compact counter sample body holding the given record frames.
pub fn counter_sample_body(sequence: u32, source: u32, records: u32, frames: Capture) -> Capture {
    Capture::new()
        .u32(sequence)
        .u32(source)
        .u32(records)
        .raw(&frames.build())
}

/// A compact flow sample body holding the given record frames.
pub fn flow_sample_body(sequence: u32, source: u32, records: u32, frames: Capture) -> Capture {
    Capture::new()
        .u32(sequence)
        .u32(source)
        .u32(256) // sampling rate
        .u32(5120) // sample pool
        .u32(0) // drops
        .u32(3) // input
        .u32(0) // output
        .u32(records)
        .raw(&frames.build())
}

pub fn agent() -> Ipv4Addr {
    Ipv4Addr::new(10, 0, 0, 250)
}
