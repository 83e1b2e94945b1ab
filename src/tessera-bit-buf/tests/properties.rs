use proptest::prelude::*;
use tessera_bit_buf::{mask::inclusive_mask, BitReader, BitWriter};

proptest! {
    #[test]
    fn round_trip_any_width_at_any_offset(
        value in any::<u64>(),
        start in 0u32..64,
        bits in 0u32..=64,
    ) {
        let mut writer = BitWriter::new(32);
        writer.write(0, start).unwrap();
        writer.write(value, bits).unwrap();

        let bytes = writer.to_bytes();
        let mut reader = BitReader::new(&bytes);
        reader.read(start).unwrap();

        prop_assert_eq!(reader.read(bits).unwrap(), value & inclusive_mask(bits));
    }

    #[test]
    fn sequential_round_trip(fields in prop::collection::vec((any::<u64>(), 0u32..=64), 1..64)) {
        let mut writer = BitWriter::resizable(8);
        for &(value, bits) in &fields {
            writer.write(value, bits).unwrap();
        }

        let total: u32 = fields.iter().map(|&(_, bits)| bits).sum();
        prop_assert_eq!(writer.bit_position(), total as usize);

        let bytes = writer.to_bytes();
        let mut reader = BitReader::new(&bytes);
        for &(value, bits) in &fields {
            prop_assert_eq!(reader.read(bits).unwrap(), value & inclusive_mask(bits));
        }
    }

    #[test]
    fn backpatch_keeps_neighbours(
        before in any::<u64>(),
        after in any::<u64>(),
        value in any::<u64>(),
        position in 0usize..128,
        bits in 1u32..=64,
    ) {
        let mut writer = BitWriter::new(32);
        writer.write_u64(before).unwrap();
        writer.write_u64(after).unwrap();
        writer.write_u64(before ^ after).unwrap();

        let bytes = writer.to_bytes();
        let unpatched = BitReader::new(&bytes);

        writer.write_at_position(value, bits, position).unwrap();
        let patched_bytes = writer.to_bytes();
        let patched = BitReader::new(&patched_bytes);

        prop_assert_eq!(
            patched.read_at_position(bits, position).unwrap(),
            value & inclusive_mask(bits)
        );
        prop_assert_eq!(
            patched.read_at_position(position as u32 % 64, position - position % 64).unwrap(),
            unpatched.read_at_position(position as u32 % 64, position - position % 64).unwrap()
        );

        let end = position + bits as usize;
        let tail = (192 - end).min(64) as u32;
        prop_assert_eq!(
            patched.read_at_position(tail, end).unwrap(),
            unpatched.read_at_position(tail, end).unwrap()
        );
    }
}
