use proptest::prelude::*;
use tessera_bit_buf::{BitReader, BitWriter};
use tessera_packers::{Error, VariableBlockPacker};

const BLOCK_SIZES: [u32; 5] = [4, 7, 8, 12, 16];

fn round_trip(packer: VariableBlockPacker, value: u64) -> Result<u64, Error> {
    let mut writer = BitWriter::new(1300);
    packer.pack(&mut writer, value)?;
    assert_eq!(writer.bit_position(), packer.bit_count(value) as usize);

    let bytes = writer.to_bytes();
    packer.unpack(&mut BitReader::new(&bytes))
}

fn block_packer() -> impl Strategy<Value = VariableBlockPacker> {
    prop::sample::select(BLOCK_SIZES.to_vec()).prop_map(|size| VariableBlockPacker::new(size).unwrap())
}

proptest! {
    #[test]
    fn unpacks_correct_u64(packer in block_packer(), value in any::<u64>()) {
        prop_assert_eq!(round_trip(packer, value).unwrap(), value);
    }

    #[test]
    fn unpacks_correct_u32(packer in block_packer(), value in any::<u32>()) {
        prop_assert_eq!(round_trip(packer, value as u64).unwrap(), value as u64);
    }

    #[test]
    fn unpacks_correct_u16(packer in block_packer(), value in any::<u16>()) {
        prop_assert_eq!(round_trip(packer, value as u64).unwrap(), value as u64);
    }
}

#[test]
fn writes_block_size_plus_one_bits_per_block() -> Result<(), Error> {
    for block_size in BLOCK_SIZES {
        let packer = VariableBlockPacker::new(block_size)?;

        let mut writer = BitWriter::new(64);
        packer.pack(&mut writer, 0)?;
        assert_eq!(writer.bit_position(), block_size as usize + 1);

        let above_block_size = (1 << block_size) + 1;
        let mut writer = BitWriter::new(64);
        packer.pack(&mut writer, above_block_size)?;
        assert_eq!(writer.bit_position(), 2 * (block_size as usize + 1));

        assert_eq!(round_trip(packer, 0)?, 0);
        assert_eq!(round_trip(packer, above_block_size)?, above_block_size);
    }

    Ok(())
}

#[test]
fn continuation_bit_follows_block() -> Result<(), Error> {
    let packer = VariableBlockPacker::new(4)?;

    let mut writer = BitWriter::new(8);
    packer.pack(&mut writer, 0x35)?;

    // 0101 + 1, 0011 + 0
    assert_eq!(writer.to_bytes(), [0b0111_0101, 0b00]);

    Ok(())
}

#[test]
fn rejects_overlong_input() -> Result<(), Error> {
    let packer = VariableBlockPacker::new(8)?;

    let mut writer = BitWriter::new(16);
    writer.write_u64(u64::MAX)?;
    writer.write_u64(u64::MAX)?;

    let bytes = writer.to_bytes();
    assert_eq!(
        packer.unpack(&mut BitReader::new(&bytes)),
        Err(Error::Malformed("block encoded value exceeds 64 bits"))
    );

    Ok(())
}

#[test]
fn rejects_final_block_past_bit_63() -> Result<(), Error> {
    let packer = VariableBlockPacker::new(7)?;

    // Nine empty blocks put the tenth at bit 63, leaving room for one bit.
    let encode = |last: u64| -> Result<Vec<u8>, Error> {
        let mut writer = BitWriter::new(16);
        for _ in 0..9 {
            writer.write(0b1000_0000, 8)?;
        }
        writer.write(last, 8)?;
        Ok(writer.to_bytes())
    };

    let bytes = encode(0b111_1111)?;
    assert_eq!(
        packer.unpack(&mut BitReader::new(&bytes)),
        Err(Error::Malformed("block encoded value exceeds 64 bits"))
    );

    let bytes = encode(0b1)?;
    assert_eq!(packer.unpack(&mut BitReader::new(&bytes))?, 1 << 63);

    Ok(())
}

#[test]
fn top_bit_round_trips_with_uneven_blocks() -> Result<(), Error> {
    for size in BLOCK_SIZES {
        let packer = VariableBlockPacker::new(size)?;
        assert_eq!(round_trip(packer, u64::MAX)?, u64::MAX);
        assert_eq!(round_trip(packer, 1 << 63)?, 1 << 63);
    }

    Ok(())
}

#[test]
fn rejects_bad_block_size() {
    assert!(matches!(VariableBlockPacker::new(0), Err(Error::InvalidArgument(_))));
    assert!(matches!(VariableBlockPacker::new(64), Err(Error::InvalidArgument(_))));
}
