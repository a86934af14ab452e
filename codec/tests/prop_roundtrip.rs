//! Property tests: decode(encode(x)) == x, and arbitrary bytes never panic.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use codec::{
    decode_datagram, encode_datagram, ApplicationCounters, CounterRecord, CounterSample, Datagram,
    DiscardedPacket, EthernetCounters, EthernetFrameFlow, ExpandedCounterSample,
    ExpandedFlowSample, ExtendedSwitchFlow, FlowRecord, FlowSample, GenericInterfaceCounters,
    HostCpuCounters, HostDiskCounters, HostMemoryCounters, HostNetCounters, InterfaceId, Ipv4Flow,
    Ipv6Flow, Limits, ProcessorCounters, RawPacketFlow, Sample, SourceId, TokenRingCounters,
    VgCounters, VlanCounters, MAX_COMPACT_SOURCE_INDEX,
};
use proptest::array::{
    uniform13, uniform16, uniform17, uniform18, uniform2, uniform3, uniform4, uniform5, uniform6,
    uniform7, uniform8,
};
use proptest::collection::vec;
use proptest::prelude::*;

fn agent_strategy() -> impl Strategy<Value = IpAddr> {
    prop_oneof![
        any::<[u8; 4]>().prop_map(|octets| IpAddr::V4(Ipv4Addr::from(octets))),
        any::<[u8; 16]>().prop_map(|octets| IpAddr::V6(Ipv6Addr::from(octets))),
    ]
}

/// Counter words, biased toward the zero and saturated edges.
fn word() -> impl Strategy<Value = u32> + Clone {
    prop_oneof![1 => Just(0u32), 1 => Just(u32::MAX), 4 => any::<u32>()]
}

fn wide() -> impl Strategy<Value = u64> + Clone {
    prop_oneof![1 => Just(0u64), 1 => Just(u64::MAX), 4 => any::<u64>()]
}

/// Gauges never carry NaN, so decoded records compare equal.
fn gauge() -> impl Strategy<Value = f32> + Clone {
    prop::num::f32::NORMAL | prop::num::f32::ZERO
}

/// Opaque bodies from agents are always whole XDR words.
fn opaque(max_words: usize) -> impl Strategy<Value = Vec<u8>> {
    vec(any::<[u8; 4]>(), 0..max_words).prop_map(|words| words.concat())
}

fn compact_source() -> impl Strategy<Value = SourceId> {
    (0u32..=0xFF, 0u32..=MAX_COMPACT_SOURCE_INDEX)
        .prop_map(|(source_type, index)| SourceId::new(source_type, index))
}

fn expanded_source() -> impl Strategy<Value = SourceId> {
    (word(), word()).prop_map(|(source_type, index)| SourceId::new(source_type, index))
}

fn flow_record() -> impl Strategy<Value = FlowRecord> {
    prop_oneof![
        (word(), word(), word(), vec(any::<u8>(), 0..200)).prop_map(
            |(protocol, frame_length, stripped, header)| {
                FlowRecord::RawPacket(RawPacketFlow {
                    protocol,
                    frame_length,
                    stripped,
                    header,
                })
            }
        ),
        (word(), any::<[u8; 6]>(), any::<[u8; 6]>(), word()).prop_map(
            |(length, src_mac, dst_mac, eth_type)| {
                FlowRecord::EthernetFrame(EthernetFrameFlow {
                    length,
                    src_mac,
                    dst_mac,
                    eth_type,
                })
            }
        ),
        (any::<[u8; 4]>(), any::<[u8; 4]>(), uniform6(word())).prop_map(|(src, dst, words)| {
            FlowRecord::Ipv4(Ipv4Flow {
                length: words[0],
                protocol: words[1],
                src_ip: Ipv4Addr::from(src),
                dst_ip: Ipv4Addr::from(dst),
                src_port: words[2],
                dst_port: words[3],
                tcp_flags: words[4],
                tos: words[5],
            })
        }),
        (any::<[u8; 16]>(), any::<[u8; 16]>(), uniform6(word())).prop_map(
            |(src, dst, words)| {
                FlowRecord::Ipv6(Ipv6Flow {
                    length: words[0],
                    protocol: words[1],
                    src_ip: Ipv6Addr::from(src),
                    dst_ip: Ipv6Addr::from(dst),
                    src_port: words[2],
                    dst_port: words[3],
                    tcp_flags: words[4],
                    priority: words[5],
                })
            }
        ),
        uniform4(word()).prop_map(|[src_vlan, src_priority, dst_vlan, dst_priority]| {
            FlowRecord::ExtendedSwitch(ExtendedSwitchFlow {
                src_vlan,
                src_priority,
                dst_vlan,
                dst_priority,
            })
        }),
        (3000u32..5000, opaque(16)).prop_map(|(tag, data)| FlowRecord::Unknown { tag, data }),
    ]
}

fn interface_counters() -> impl Strategy<Value = CounterRecord> {
    prop_oneof![
        (uniform16(word()), uniform3(wide())).prop_map(|(w, d)| {
            CounterRecord::GenericInterface(GenericInterfaceCounters {
                index: w[0],
                if_type: w[1],
                speed: d[0],
                direction: w[2],
                status: w[3],
                in_octets: d[1],
                in_unicast_packets: w[4],
                in_multicast_packets: w[5],
                in_broadcast_packets: w[6],
                in_discards: w[7],
                in_errors: w[8],
                in_unknown_protocols: w[9],
                out_octets: d[2],
                out_unicast_packets: w[10],
                out_multicast_packets: w[11],
                out_broadcast_packets: w[12],
                out_discards: w[13],
                out_errors: w[14],
                promiscuous_mode: w[15],
            })
        }),
        uniform13(word()).prop_map(|w| {
            CounterRecord::Ethernet(EthernetCounters {
                alignment_errors: w[0],
                fcs_errors: w[1],
                single_collision_frames: w[2],
                multiple_collision_frames: w[3],
                sqe_test_errors: w[4],
                deferred_transmissions: w[5],
                late_collisions: w[6],
                excessive_collisions: w[7],
                internal_mac_transmit_errors: w[8],
                carrier_sense_errors: w[9],
                frame_too_longs: w[10],
                internal_mac_receive_errors: w[11],
                symbol_errors: w[12],
            })
        }),
        uniform18(word()).prop_map(|w| {
            CounterRecord::TokenRing(TokenRingCounters {
                line_errors: w[0],
                burst_errors: w[1],
                ac_errors: w[2],
                abort_trans_errors: w[3],
                internal_errors: w[4],
                lost_frame_errors: w[5],
                receive_congestions: w[6],
                frame_copied_errors: w[7],
                token_errors: w[8],
                soft_errors: w[9],
                hard_errors: w[10],
                signal_loss: w[11],
                transmit_beacons: w[12],
                recoverys: w[13],
                lobe_wires: w[14],
                removes: w[15],
                singles: w[16],
                freq_errors: w[17],
            })
        }),
        (uniform8(word()), uniform6(wide())).prop_map(|(w, d)| {
            CounterRecord::Vg(VgCounters {
                in_high_priority_frames: w[0],
                in_high_priority_octets: d[0],
                in_norm_priority_frames: w[1],
                in_norm_priority_octets: d[1],
                in_ipm_errors: w[2],
                in_oversize_frame_errors: w[3],
                in_data_errors: w[4],
                in_null_addressed_frames: w[5],
                out_high_priority_frames: w[6],
                out_high_priority_octets: d[2],
                transition_into_trainings: w[7],
                hc_in_high_priority_octets: d[3],
                hc_in_norm_priority_octets: d[4],
                hc_out_high_priority_octets: d[5],
            })
        }),
        (word(), wide(), uniform4(word())).prop_map(|(vlan_id, octets, words)| {
            CounterRecord::Vlan(VlanCounters {
                vlan_id,
                octets,
                unicast_packets: words[0],
                multicast_packets: words[1],
                broadcast_packets: words[2],
                discards: words[3],
            })
        }),
        (uniform3(word()), wide(), wide()).prop_map(|(cpu, total, free)| {
            CounterRecord::Processor(ProcessorCounters {
                cpu_5s: cpu[0],
                cpu_1m: cpu[1],
                cpu_5m: cpu[2],
                total_memory: total,
                free_memory: free,
            })
        }),
    ]
}

fn host_counters() -> impl Strategy<Value = CounterRecord> {
    prop_oneof![
        (uniform3(gauge()), uniform17(word())).prop_map(|(load, w)| {
            CounterRecord::HostCpu(HostCpuCounters {
                load_1m: load[0],
                load_5m: load[1],
                load_15m: load[2],
                processes_running: w[0],
                processes_total: w[1],
                cpu_count: w[2],
                cpu_speed: w[3],
                uptime: w[4],
                cpu_user: w[5],
                cpu_nice: w[6],
                cpu_system: w[7],
                cpu_idle: w[8],
                cpu_wio: w[9],
                cpu_intr: w[10],
                cpu_soft_intr: w[11],
                interrupts: w[12],
                context_switches: w[13],
                cpu_steal: w[14],
                cpu_guest: w[15],
                cpu_guest_nice: w[16],
            })
        }),
        (uniform7(wide()), uniform4(word())).prop_map(|(d, w)| {
            CounterRecord::HostMemory(HostMemoryCounters {
                total: d[0],
                free: d[1],
                shared: d[2],
                buffers: d[3],
                cached: d[4],
                swap_total: d[5],
                swap_free: d[6],
                page_in: w[0],
                page_out: w[1],
                swap_in: w[2],
                swap_out: w[3],
            })
        }),
        (uniform4(wide()), gauge(), uniform4(word())).prop_map(|(d, max_used_percent, w)| {
            CounterRecord::HostDisk(HostDiskCounters {
                total: d[0],
                free: d[1],
                max_used_percent,
                reads: w[0],
                bytes_read: d[2],
                read_time: w[1],
                writes: w[2],
                bytes_written: d[3],
                write_time: w[3],
            })
        }),
        (uniform2(wide()), uniform6(word())).prop_map(|(d, w)| {
            CounterRecord::HostNet(HostNetCounters {
                bytes_in: d[0],
                packets_in: w[0],
                errors_in: w[1],
                drops_in: w[2],
                bytes_out: d[1],
                packets_out: w[3],
                errors_out: w[4],
                drops_out: w[5],
            })
        }),
        (any::<[u8; 32]>(), uniform2(word()), uniform2(wide())).prop_map(|(name, w, d)| {
            CounterRecord::Application(ApplicationCounters {
                application_name: name,
                user_time: w[0],
                sys_time: w[1],
                vsize: d[0],
                rss: d[1],
            })
        }),
    ]
}

fn counter_record() -> impl Strategy<Value = CounterRecord> {
    prop_oneof![
        3 => interface_counters(),
        2 => host_counters(),
        1 => (5000u32..6000, opaque(16)).prop_map(|(tag, data)| CounterRecord::Unknown { tag, data }),
    ]
}

fn sample() -> impl Strategy<Value = Sample> {
    prop_oneof![
        (
            word(),
            compact_source(),
            uniform5(word()),
            vec(flow_record(), 0..4)
        )
            .prop_map(|(sequence_number, source_id, words, records)| {
                Sample::Flow(FlowSample {
                    sequence_number,
                    source_id,
                    sampling_rate: words[0],
                    sample_pool: words[1],
                    drops: words[2],
                    input: words[3],
                    output: words[4],
                    records,
                })
            }),
        (
            word(),
            expanded_source(),
            uniform7(word()),
            vec(flow_record(), 0..4)
        )
            .prop_map(|(sequence_number, source_id, words, records)| {
                Sample::ExpandedFlow(ExpandedFlowSample {
                    sequence_number,
                    source_id,
                    sampling_rate: words[0],
                    sample_pool: words[1],
                    drops: words[2],
                    input: InterfaceId::new(words[3], words[4]),
                    output: InterfaceId::new(words[5], words[6]),
                    records,
                })
            }),
        (word(), compact_source(), vec(counter_record(), 0..4)).prop_map(
            |(sequence_number, source_id, records)| {
                Sample::Counter(CounterSample {
                    sequence_number,
                    source_id,
                    records,
                })
            }
        ),
        (word(), expanded_source(), vec(counter_record(), 0..4)).prop_map(
            |(sequence_number, source_id, records)| {
                Sample::ExpandedCounter(ExpandedCounterSample {
                    sequence_number,
                    source_id,
                    records,
                })
            }
        ),
        (
            word(),
            expanded_source(),
            uniform4(word()),
            vec(flow_record(), 0..4)
        )
            .prop_map(|(sequence_number, source_id, words, records)| {
                Sample::DiscardedPacket(DiscardedPacket {
                    sequence_number,
                    source_id,
                    drops: words[0],
                    input: words[1],
                    output: words[2],
                    reason: words[3],
                    records,
                })
            }),
        (6u32..100, opaque(8)).prop_map(|(tag, data)| Sample::Unknown { tag, data }),
    ]
}

/// Every counter record type with each field set to the same edge value.
fn counters_filled(w: u32, d: u64, g: f32) -> Vec<CounterRecord> {
    vec![
        CounterRecord::GenericInterface(GenericInterfaceCounters {
            index: w,
            if_type: w,
            speed: d,
            direction: w,
            status: w,
            in_octets: d,
            in_unicast_packets: w,
            in_multicast_packets: w,
            in_broadcast_packets: w,
            in_discards: w,
            in_errors: w,
            in_unknown_protocols: w,
            out_octets: d,
            out_unicast_packets: w,
            out_multicast_packets: w,
            out_broadcast_packets: w,
            out_discards: w,
            out_errors: w,
            promiscuous_mode: w,
        }),
        CounterRecord::Ethernet(EthernetCounters {
            alignment_errors: w,
            fcs_errors: w,
            single_collision_frames: w,
            multiple_collision_frames: w,
            sqe_test_errors: w,
            deferred_transmissions: w,
            late_collisions: w,
            excessive_collisions: w,
            internal_mac_transmit_errors: w,
            carrier_sense_errors: w,
            frame_too_longs: w,
            internal_mac_receive_errors: w,
            symbol_errors: w,
        }),
        CounterRecord::TokenRing(TokenRingCounters {
            line_errors: w,
            burst_errors: w,
            ac_errors: w,
            abort_trans_errors: w,
            internal_errors: w,
            lost_frame_errors: w,
            receive_congestions: w,
            frame_copied_errors: w,
            token_errors: w,
            soft_errors: w,
            hard_errors: w,
            signal_loss: w,
            transmit_beacons: w,
            recoverys: w,
            lobe_wires: w,
            removes: w,
            singles: w,
            freq_errors: w,
        }),
        CounterRecord::Vg(VgCounters {
            in_high_priority_frames: w,
            in_high_priority_octets: d,
            in_norm_priority_frames: w,
            in_norm_priority_octets: d,
            in_ipm_errors: w,
            in_oversize_frame_errors: w,
            in_data_errors: w,
            in_null_addressed_frames: w,
            out_high_priority_frames: w,
            out_high_priority_octets: d,
            transition_into_trainings: w,
            hc_in_high_priority_octets: d,
            hc_in_norm_priority_octets: d,
            hc_out_high_priority_octets: d,
        }),
        CounterRecord::Vlan(VlanCounters {
            vlan_id: w,
            octets: d,
            unicast_packets: w,
            multicast_packets: w,
            broadcast_packets: w,
            discards: w,
        }),
        CounterRecord::Processor(ProcessorCounters {
            cpu_5s: w,
            cpu_1m: w,
            cpu_5m: w,
            total_memory: d,
            free_memory: d,
        }),
        CounterRecord::HostCpu(HostCpuCounters {
            load_1m: g,
            load_5m: g,
            load_15m: g,
            processes_running: w,
            processes_total: w,
            cpu_count: w,
            cpu_speed: w,
            uptime: w,
            cpu_user: w,
            cpu_nice: w,
            cpu_system: w,
            cpu_idle: w,
            cpu_wio: w,
            cpu_intr: w,
            cpu_soft_intr: w,
            interrupts: w,
            context_switches: w,
            cpu_steal: w,
            cpu_guest: w,
            cpu_guest_nice: w,
        }),
        CounterRecord::HostMemory(HostMemoryCounters {
            total: d,
            free: d,
            shared: d,
            buffers: d,
            cached: d,
            swap_total: d,
            swap_free: d,
            page_in: w,
            page_out: w,
            swap_in: w,
            swap_out: w,
        }),
        CounterRecord::HostDisk(HostDiskCounters {
            total: d,
            free: d,
            max_used_percent: g,
            reads: w,
            bytes_read: d,
            read_time: w,
            writes: w,
            bytes_written: d,
            write_time: w,
        }),
        CounterRecord::HostNet(HostNetCounters {
            bytes_in: d,
            packets_in: w,
            errors_in: w,
            drops_in: w,
            bytes_out: d,
            packets_out: w,
            errors_out: w,
            drops_out: w,
        }),
        CounterRecord::Application(ApplicationCounters {
            application_name: [w.to_be_bytes()[0]; 32],
            user_time: w,
            sys_time: w,
            vsize: d,
            rss: d,
        }),
    ]
}

/// Every flow record type with each numeric field set to the same edge value.
fn flows_filled(w: u32, byte: u8) -> Vec<FlowRecord> {
    vec![
        FlowRecord::RawPacket(RawPacketFlow {
            protocol: w,
            frame_length: w,
            stripped: w,
            header: vec![byte; 5],
        }),
        FlowRecord::EthernetFrame(EthernetFrameFlow {
            length: w,
            src_mac: [byte; 6],
            dst_mac: [byte; 6],
            eth_type: w,
        }),
        FlowRecord::Ipv4(Ipv4Flow {
            length: w,
            protocol: w,
            src_ip: Ipv4Addr::from([byte; 4]),
            dst_ip: Ipv4Addr::from([byte; 4]),
            src_port: w,
            dst_port: w,
            tcp_flags: w,
            tos: w,
        }),
        FlowRecord::Ipv6(Ipv6Flow {
            length: w,
            protocol: w,
            src_ip: Ipv6Addr::from([byte; 16]),
            dst_ip: Ipv6Addr::from([byte; 16]),
            src_port: w,
            dst_port: w,
            tcp_flags: w,
            priority: w,
        }),
        FlowRecord::ExtendedSwitch(ExtendedSwitchFlow {
            src_vlan: w,
            src_priority: w,
            dst_vlan: w,
            dst_priority: w,
        }),
    ]
}

#[test]
fn every_record_at_zero_and_max() {
    let edges = [(0, 0, 0.0, 0x00), (u32::MAX, u64::MAX, f32::MAX, 0xFF)];
    for (w, d, g, byte) in edges {
        let samples = vec![
            Sample::ExpandedCounter(ExpandedCounterSample {
                sequence_number: w,
                source_id: SourceId::new(w, w),
                records: counters_filled(w, d, g),
            }),
            Sample::ExpandedFlow(ExpandedFlowSample {
                sequence_number: w,
                source_id: SourceId::new(w, w),
                sampling_rate: w,
                sample_pool: w,
                drops: w,
                input: InterfaceId::new(w, w),
                output: InterfaceId::new(w, w),
                records: flows_filled(w, byte),
            }),
            Sample::DiscardedPacket(DiscardedPacket {
                sequence_number: w,
                source_id: SourceId::new(w, w),
                drops: w,
                input: w,
                output: w,
                reason: w,
                records: flows_filled(w, byte),
            }),
        ];
        let agent = IpAddr::V4(Ipv4Addr::from(w));
        let bytes = encode_datagram(agent, w, w, w, &samples).unwrap();
        let datagram = decode_datagram(&bytes, &Limits::default()).unwrap();
        assert_eq!(datagram.samples, samples);
        assert_eq!(datagram.encode().unwrap(), bytes);
    }
}

proptest! {
    #[test]
    fn datagram_roundtrip(
        agent in agent_strategy(),
        sub_agent_id in any::<u32>(),
        sequence_number in any::<u32>(),
        uptime in any::<u32>(),
        samples in vec(sample(), 0..6),
    ) {
        let bytes = encode_datagram(agent, sub_agent_id, sequence_number, uptime, &samples).unwrap();
        prop_assert_eq!(bytes.len() % 4, 0);

        let datagram = decode_datagram(&bytes, &Limits::unlimited()).unwrap();
        prop_assert_eq!(datagram.header.agent_address, agent);
        prop_assert_eq!(datagram.header.sequence_number, sequence_number);
        prop_assert_eq!(&datagram.samples, &samples);
        prop_assert_eq!(datagram.encode().unwrap(), bytes);
    }

    #[test]
    fn raw_packet_padding(header in vec(any::<u8>(), 0..300)) {
        let sample = Sample::Flow(FlowSample {
            records: vec![FlowRecord::RawPacket(RawPacketFlow {
                header: header.clone(),
                ..RawPacketFlow::default()
            })],
            ..FlowSample::default()
        });
        let agent = IpAddr::V4(Ipv4Addr::LOCALHOST);
        let bytes = encode_datagram(agent, 0, 0, 0, &[sample]).unwrap();

        // header(28) + sample frame(8) + flow fields(32) + record frame(8) + raw fields(16)
        let padded = header.len().div_ceil(4) * 4;
        prop_assert_eq!(bytes.len(), 28 + 8 + 32 + 8 + 16 + padded);
        prop_assert!(bytes[bytes.len() - (padded - header.len())..].iter().all(|&b| b == 0));
    }

    #[test]
    fn compact_source_out_of_range(index in (MAX_COMPACT_SOURCE_INDEX + 1)..=u32::MAX) {
        let sample = Sample::Counter(CounterSample {
            source_id: SourceId::new(0, index),
            ..CounterSample::default()
        });
        let agent = IpAddr::V4(Ipv4Addr::LOCALHOST);
        prop_assert!(encode_datagram(agent, 0, 0, 0, &[sample]).is_err());
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in vec(any::<u8>(), 0..512)) {
        let _ = decode_datagram(&bytes, &Limits::for_testing());
    }

    #[test]
    fn mutated_datagram_never_panics(
        samples in vec(sample(), 1..3),
        flips in vec((any::<prop::sample::Index>(), any::<u8>()), 1..8),
    ) {
        let agent = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
        let mut bytes = encode_datagram(agent, 0, 1, 2, &samples).unwrap();
        for (index, value) in flips {
            let at = index.index(bytes.len());
            bytes[at] = value;
        }
        if let Ok(datagram) = Datagram::decode(&bytes, &Limits::default()) {
            // Whatever decodes must encode again.
            prop_assert!(datagram.encode().is_ok());
        }
    }
}
