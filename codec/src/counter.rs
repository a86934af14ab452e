//! Counter records carried by counter samples.
//!
//! Every counter layout here is a flat list of fixed-width fields in the MIB
//! order. Field names follow the MIB objects they mirror.

use bytestream::{ByteReader, ByteWriter, FieldMut, FieldRef};
use tracing::debug;
use wire::{read_frame, LimitKind, Limits};

use crate::error::CodecResult;
use crate::record::{encode_opaque, fixed_record, Record};

pub const COUNTER_GENERIC_INTERFACE: u32 = 1;
pub const COUNTER_ETHERNET: u32 = 2;
pub const COUNTER_TOKEN_RING: u32 = 3;
pub const COUNTER_VG: u32 = 4;
pub const COUNTER_VLAN: u32 = 5;
pub const COUNTER_PROCESSOR: u32 = 1001;
pub const COUNTER_HOST_CPU: u32 = 2003;
pub const COUNTER_HOST_MEMORY: u32 = 2004;
pub const COUNTER_HOST_DISK: u32 = 2005;
pub const COUNTER_HOST_NET: u32 = 2006;
/// Enterprise 1, format 1.
pub const COUNTER_APPLICATION: u32 = (1 << 12) + 1;

fixed_record! {
    /// Generic interface counters (RFC 2233).
    pub struct GenericInterfaceCounters = COUNTER_GENERIC_INTERFACE {
        index: u32,
        if_type: u32,
        /// Bits per second.
        speed: u64,
        /// 0 = unknown, 1 = full duplex, 2 = half duplex, 3 = in, 4 = out.
        direction: u32,
        /// Bit 0 admin up, bit 1 operational up.
        status: u32,
        in_octets: u64,
        in_unicast_packets: u32,
        in_multicast_packets: u32,
        in_broadcast_packets: u32,
        in_discards: u32,
        in_errors: u32,
        in_unknown_protocols: u32,
        out_octets: u64,
        out_unicast_packets: u32,
        out_multicast_packets: u32,
        out_broadcast_packets: u32,
        out_discards: u32,
        out_errors: u32,
        promiscuous_mode: u32,
    }
}

fixed_record! {
    /// Ethernet interface counters (RFC 2358 dot3Stats).
    pub struct EthernetCounters = COUNTER_ETHERNET {
        alignment_errors: u32,
        fcs_errors: u32,
        single_collision_frames: u32,
        multiple_collision_frames: u32,
        sqe_test_errors: u32,
        deferred_transmissions: u32,
        late_collisions: u32,
        excessive_collisions: u32,
        internal_mac_transmit_errors: u32,
        carrier_sense_errors: u32,
        frame_too_longs: u32,
        internal_mac_receive_errors: u32,
        symbol_errors: u32,
    }
}

fixed_record! {
    /// Token ring counters (RFC 1748 dot5Stats).
    pub struct TokenRingCounters = COUNTER_TOKEN_RING {
        line_errors: u32,
        burst_errors: u32,
        ac_errors: u32,
        abort_trans_errors: u32,
        internal_errors: u32,
        lost_frame_errors: u32,
        receive_congestions: u32,
        frame_copied_errors: u32,
        token_errors: u32,
        soft_errors: u32,
        hard_errors: u32,
        signal_loss: u32,
        transmit_beacons: u32,
        recoverys: u32,
        lobe_wires: u32,
        removes: u32,
        singles: u32,
        freq_errors: u32,
    }
}

fixed_record! {
    /// 100BaseVG interface counters (RFC 2020 dot12).
    pub struct VgCounters = COUNTER_VG {
        in_high_priority_frames: u32,
        in_high_priority_octets: u64,
        in_norm_priority_frames: u32,
        in_norm_priority_octets: u64,
        in_ipm_errors: u32,
        in_oversize_frame_errors: u32,
        in_data_errors: u32,
        in_null_addressed_frames: u32,
        out_high_priority_frames: u32,
        out_high_priority_octets: u64,
        transition_into_trainings: u32,
        hc_in_high_priority_octets: u64,
        hc_in_norm_priority_octets: u64,
        hc_out_high_priority_octets: u64,
    }
}

fixed_record! {
    /// Per-VLAN counters.
    pub struct VlanCounters = COUNTER_VLAN {
        vlan_id: u32,
        octets: u64,
        unicast_packets: u32,
        multicast_packets: u32,
        broadcast_packets: u32,
        discards: u32,
    }
}

fixed_record! {
    /// Switch processor load and memory.
    pub struct ProcessorCounters = COUNTER_PROCESSOR {
        /// Percent, 5 second average.
        cpu_5s: u32,
        cpu_1m: u32,
        cpu_5m: u32,
        total_memory: u64,
        free_memory: u64,
    }
}

fixed_record! {
    /// Host CPU counters. Times are in milliseconds.
    pub struct HostCpuCounters = COUNTER_HOST_CPU {
        load_1m: f32,
        load_5m: f32,
        load_15m: f32,
        processes_running: u32,
        processes_total: u32,
        cpu_count: u32,
        /// MHz.
        cpu_speed: u32,
        /// Seconds.
        uptime: u32,
        cpu_user: u32,
        cpu_nice: u32,
        cpu_system: u32,
        cpu_idle: u32,
        cpu_wio: u32,
        cpu_intr: u32,
        cpu_soft_intr: u32,
        interrupts: u32,
        context_switches: u32,
        cpu_steal: u32,
        cpu_guest: u32,
        cpu_guest_nice: u32,
    }
}

fixed_record! {
    /// Host memory counters in bytes, paging in pages.
    pub struct HostMemoryCounters = COUNTER_HOST_MEMORY {
        total: u64,
        free: u64,
        shared: u64,
        buffers: u64,
        cached: u64,
        swap_total: u64,
        swap_free: u64,
        page_in: u32,
        page_out: u32,
        swap_in: u32,
        swap_out: u32,
    }
}

fixed_record! {
    /// Host disk I/O counters.
    pub struct HostDiskCounters = COUNTER_HOST_DISK {
        total: u64,
        free: u64,
        /// Utilisation of the fullest partition.
        max_used_percent: f32,
        reads: u32,
        bytes_read: u64,
        read_time: u32,
        writes: u32,
        bytes_written: u64,
        write_time: u32,
    }
}

fixed_record! {
    /// Host network I/O counters.
    pub struct HostNetCounters = COUNTER_HOST_NET {
        bytes_in: u64,
        packets_in: u32,
        errors_in: u32,
        drops_in: u32,
        bytes_out: u64,
        packets_out: u32,
        errors_out: u32,
        drops_out: u32,
    }
}

/// Per-application resource counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApplicationCounters {
    /// NUL-padded application name.
    pub application_name: [u8; 32],
    pub user_time: u32,
    pub sys_time: u32,
    pub vsize: u64,
    pub rss: u64,
}

impl ApplicationCounters {
    pub const WIRE_SIZE: usize = 32 + 4 + 4 + 8 + 8;

    /// Returns the application name up to the first NUL byte.
    #[must_use]
    pub fn name(&self) -> &[u8] {
        let end = self
            .application_name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.application_name.len());
        &self.application_name[..end]
    }
}

impl Record for ApplicationCounters {
    const TYPE_TAG: u32 = COUNTER_APPLICATION;

    fn decode(reader: &mut ByteReader<'_>, _limits: &Limits) -> CodecResult<Self> {
        let mut record = Self::default();
        reader.read_fields(&mut [
            FieldMut::Opaque(&mut record.application_name),
            FieldMut::from(&mut record.user_time),
            FieldMut::from(&mut record.sys_time),
            FieldMut::from(&mut record.vsize),
            FieldMut::from(&mut record.rss),
        ])?;
        Ok(record)
    }

    fn encoded_len(&self) -> usize {
        Self::WIRE_SIZE
    }

    fn encode_body(&self, writer: &mut ByteWriter) -> CodecResult<()> {
        writer.write_fields(&[
            FieldRef::Opaque(&self.application_name),
            FieldRef::from(self.user_time),
            FieldRef::from(self.sys_time),
            FieldRef::from(self.vsize),
            FieldRef::from(self.rss),
        ]);
        Ok(())
    }
}

/// A counter record of any known type, or an unknown one kept verbatim.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CounterRecord {
    GenericInterface(GenericInterfaceCounters),
    Ethernet(EthernetCounters),
    TokenRing(TokenRingCounters),
    Vg(VgCounters),
    Vlan(VlanCounters),
    Processor(ProcessorCounters),
    HostCpu(HostCpuCounters),
    HostMemory(HostMemoryCounters),
    HostDisk(HostDiskCounters),
    HostNet(HostNetCounters),
    Application(ApplicationCounters),
    /// Unrecognised tag; `data` is the skipped body.
    Unknown { tag: u32, data: Vec<u8> },
}

impl CounterRecord {
    /// Reads one framed counter record.
    ///
    /// Unknown tags are skipped by their declared length and kept as
    /// [`CounterRecord::Unknown`].
    pub fn decode(reader: &mut ByteReader<'_>, limits: &Limits) -> CodecResult<Self> {
        let frame = read_frame(reader, LimitKind::RecordLength, limits.max_record_len)?;
        let body = frame.body;
        let record = match frame.tag {
            COUNTER_GENERIC_INTERFACE => {
                Self::GenericInterface(GenericInterfaceCounters::decode_body(body, limits)?)
            }
            COUNTER_ETHERNET => Self::Ethernet(EthernetCounters::decode_body(body, limits)?),
            COUNTER_TOKEN_RING => Self::TokenRing(TokenRingCounters::decode_body(body, limits)?),
            COUNTER_VG => Self::Vg(VgCounters::decode_body(body, limits)?),
            COUNTER_VLAN => Self::Vlan(VlanCounters::decode_body(body, limits)?),
            COUNTER_PROCESSOR => Self::Processor(ProcessorCounters::decode_body(body, limits)?),
            COUNTER_HOST_CPU => Self::HostCpu(HostCpuCounters::decode_body(body, limits)?),
            COUNTER_HOST_MEMORY => {
                Self::HostMemory(HostMemoryCounters::decode_body(body, limits)?)
            }
            COUNTER_HOST_DISK => Self::HostDisk(HostDiskCounters::decode_body(body, limits)?),
            COUNTER_HOST_NET => Self::HostNet(HostNetCounters::decode_body(body, limits)?),
            COUNTER_APPLICATION => {
                Self::Application(ApplicationCounters::decode_body(body, limits)?)
            }
            tag => {
                debug!(tag, length = body.len(), "skipping unknown counter record");
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
            Self::GenericInterface(r) => r.encode(writer),
            Self::Ethernet(r) => r.encode(writer),
            Self::TokenRing(r) => r.encode(writer),
            Self::Vg(r) => r.encode(writer),
            Self::Vlan(r) => r.encode(writer),
            Self::Processor(r) => r.encode(writer),
            Self::HostCpu(r) => r.encode(writer),
            Self::HostMemory(r) => r.encode(writer),
            Self::HostDisk(r) => r.encode(writer),
            Self::HostNet(r) => r.encode(writer),
            Self::Application(r) => r.encode(writer),
            Self::Unknown { tag, data } => encode_opaque(writer, *tag, data),
        }
    }

    #[must_use]
    pub const fn type_tag(&self) -> u32 {
        match self {
            Self::GenericInterface(_) => COUNTER_GENERIC_INTERFACE,
            Self::Ethernet(_) => COUNTER_ETHERNET,
            Self::TokenRing(_) => COUNTER_TOKEN_RING,
            Self::Vg(_) => COUNTER_VG,
            Self::Vlan(_) => COUNTER_VLAN,
            Self::Processor(_) => COUNTER_PROCESSOR,
            Self::HostCpu(_) => COUNTER_HOST_CPU,
            Self::HostMemory(_) => COUNTER_HOST_MEMORY,
            Self::HostDisk(_) => COUNTER_HOST_DISK,
            Self::HostNet(_) => COUNTER_HOST_NET,
            Self::Application(_) => COUNTER_APPLICATION,
            Self::Unknown { tag, .. } => *tag,
        }
    }

    /// Body length in bytes, excluding the frame header.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        match self {
            Self::GenericInterface(r) => r.encoded_len(),
            Self::Ethernet(r) => r.encoded_len(),
            Self::TokenRing(r) => r.encoded_len(),
            Self::Vg(r) => r.encoded_len(),
            Self::Vlan(r) => r.encoded_len(),
            Self::Processor(r) => r.encoded_len(),
            Self::HostCpu(r) => r.encoded_len(),
            Self::HostMemory(r) => r.encoded_len(),
            Self::HostDisk(r) => r.encoded_len(),
            Self::HostNet(r) => r.encoded_len(),
            Self::Application(r) => r.encoded_len(),
            Self::Unknown { data, .. } => data.len(),
        }
    }
}

impl From<GenericInterfaceCounters> for CounterRecord {
    fn from(record: GenericInterfaceCounters) -> Self {
        Self::GenericInterface(record)
    }
}

impl From<EthernetCounters> for CounterRecord {
    fn from(record: EthernetCounters) -> Self {
        Self::Ethernet(record)
    }
}
