use bytestream::{ByteReader, ByteWriter};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    U8(u8),
    U16(u16),
    U32(u32),
    I32(i32),
    U64(u64),
    F32(f32),
    F64(f64),
    Bytes(Vec<u8>),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u8>().prop_map(Op::U8),
        any::<u16>().prop_map(Op::U16),
        any::<u32>().prop_map(Op::U32),
        any::<i32>().prop_map(Op::I32),
        any::<u64>().prop_map(Op::U64),
        any::<f32>().prop_map(Op::F32),
        any::<f64>().prop_map(Op::F64),
        prop::collection::vec(any::<u8>(), 0..16).prop_map(Op::Bytes),
    ]
}

fn write_ops(ops: &[Op]) -> Vec<u8> {
    let mut writer = ByteWriter::new();
    for op in ops {
        match op {
            Op::U8(v) => writer.write_u8(*v),
            Op::U16(v) => writer.write_u16(*v),
            Op::U32(v) => writer.write_u32(*v),
            Op::I32(v) => writer.write_i32(*v),
            Op::U64(v) => writer.write_u64(*v),
            Op::F32(v) => writer.write_f32(*v),
            Op::F64(v) => writer.write_f64(*v),
            Op::Bytes(v) => writer.write_bytes(v),
        }
    }
    writer.finish()
}

proptest! {
    #[test]
    fn prop_roundtrip_ops(ops in prop::collection::vec(op_strategy(), 1..64)) {
        let bytes = write_ops(&ops);
        let mut reader = ByteReader::new(&bytes);

        for op in &ops {
            match op {
                Op::U8(v) => prop_assert_eq!(reader.read_u8().unwrap(), *v),
                Op::U16(v) => prop_assert_eq!(reader.read_u16().unwrap(), *v),
                Op::U32(v) => prop_assert_eq!(reader.read_u32().unwrap(), *v),
                Op::I32(v) => prop_assert_eq!(reader.read_i32().unwrap(), *v),
                Op::U64(v) => prop_assert_eq!(reader.read_u64().unwrap(), *v),
                Op::F32(v) => prop_assert_eq!(reader.read_f32().unwrap().to_bits(), v.to_bits()),
                Op::F64(v) => prop_assert_eq!(reader.read_f64().unwrap().to_bits(), v.to_bits()),
                Op::Bytes(v) => prop_assert_eq!(reader.read_bytes(v.len()).unwrap(), v.as_slice()),
            }
        }
        prop_assert!(reader.is_empty());
    }

    #[test]
    fn prop_truncated_input_errors(
        ops in prop::collection::vec(op_strategy(), 1..32),
        cut in any::<prop::sample::Index>(),
    ) {
        let bytes = write_ops(&ops);
        prop_assume!(!bytes.is_empty());
        let cut = cut.index(bytes.len());
        let mut reader = ByteReader::new(&bytes[..cut]);

        let mut failed = false;
        for op in &ops {
            let ok = match op {
                Op::U8(_) => reader.read_u8().is_ok(),
                Op::U16(_) => reader.read_u16().is_ok(),
                Op::U32(_) => reader.read_u32().is_ok(),
                Op::I32(_) => reader.read_i32().is_ok(),
                Op::U64(_) => reader.read_u64().is_ok(),
                Op::F32(_) => reader.read_f32().is_ok(),
                Op::F64(_) => reader.read_f64().is_ok(),
                Op::Bytes(v) => reader.read_bytes(v.len()).is_ok(),
            };
            if !ok {
                failed = true;
                break;
            }
        }
        prop_assert!(failed, "reading a strict prefix must fail somewhere");
    }
}
