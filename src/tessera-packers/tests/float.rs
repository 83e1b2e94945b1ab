use proptest::prelude::*;
use tessera_bit_buf::{BitReader, BitWriter};
use tessera_packers::{Error, FloatPacker};

// (max, precision)
const FIXTURES: [(f32, f32); 5] = [
    (100.0, 0.1),
    (500.0, 0.02),
    (2000.0, 0.05),
    (1.5, 0.01),
    (100_000.0, 30.0),
];

fn packers() -> impl Iterator<Item = (FloatPacker, f32, f32)> {
    FIXTURES
        .into_iter()
        .map(|(max, precision)| (FloatPacker::new(max, precision).unwrap(), max, precision))
}

fn fixture_and_value() -> impl Strategy<Value = ((f32, f32), f32)> {
    (0..FIXTURES.len(), -1.0f32..=1.0).prop_map(|(i, t)| (FIXTURES[i], t * FIXTURES[i].0))
}

proptest! {
    #[test]
    fn unpacked_value_is_within_precision(((max, precision), value) in fixture_and_value()) {
        let packer = FloatPacker::new(max, precision).unwrap();

        let unpacked = packer.unpack(packer.pack(value));
        prop_assert!((unpacked - value).abs() <= precision, "{value} unpacked as {unpacked}");

        let unpacked = packer.unpack(packer.pack_no_clamp(value));
        prop_assert!((unpacked - value).abs() <= precision, "{value} unpacked as {unpacked}");
    }

    #[test]
    fn unpacked_value_is_within_precision_using_writer(((max, precision), value) in fixture_and_value()) {
        let packer = FloatPacker::new(max, precision).unwrap();

        let mut writer = BitWriter::new(1300);
        packer.write(&mut writer, value).unwrap();
        packer.write_no_clamp(&mut writer, value).unwrap();
        assert_eq!(writer.bit_position(), 2 * packer.bit_count() as usize);

        let bytes = writer.to_bytes();
        let mut reader = BitReader::new(&bytes);
        for _ in 0..2 {
            let unpacked = packer.read(&mut reader).unwrap();
            prop_assert!((unpacked - value).abs() <= precision, "{value} unpacked as {unpacked}");
        }
    }
}

#[test]
fn value_over_max_unpacks_as_max() {
    for (packer, max, precision) in packers() {
        let unpacked = packer.unpack(packer.pack(max * 1.2));
        assert!((unpacked - max).abs() <= precision, "max: {max}, got {unpacked}");

        let unpacked = packer.unpack(packer.pack(max * -1.2));
        assert!((unpacked + max).abs() <= precision, "max: {max}, got {unpacked}");
    }
}

#[test]
fn value_over_max_unpacks_as_max_using_writer() -> Result<(), Error> {
    for (packer, max, precision) in packers() {
        let mut writer = BitWriter::new(16);
        packer.write(&mut writer, max * 1.2)?;
        packer.write(&mut writer, max * -1.2)?;

        let bytes = writer.to_bytes();
        let mut reader = BitReader::new(&bytes);
        assert!((packer.read(&mut reader)? - max).abs() <= precision);
        assert!((packer.read(&mut reader)? + max).abs() <= precision);
    }

    Ok(())
}

#[test]
fn zero_unpacks_to_exactly_zero() {
    for (packer, _, _) in packers() {
        assert_eq!(packer.unpack(packer.pack(0.0)), 0.0);
        assert_eq!(packer.unpack(packer.pack(-0.0)), 0.0);
    }
}

#[test]
fn bit_counts_follow_range_and_precision() -> Result<(), Error> {
    assert_eq!(FloatPacker::new(100.0, 0.1)?.bit_count(), 11);
    assert_eq!(FloatPacker::new(200.0, 0.1)?.bit_count(), 12);
    assert_eq!(FloatPacker::new(200.0, 0.05)?.bit_count(), 13);
    assert_eq!(FloatPacker::new(50.0, 0.2)?.bit_count(), 9);
    assert_eq!(FloatPacker::with_bit_count(1.0, 8)?.bit_count(), 8);

    Ok(())
}

#[test]
fn out_of_range_without_clamp_still_fits() -> Result<(), Error> {
    let packer = FloatPacker::new(10.0, 0.1)?;
    let limit = 1u32 << packer.bit_count();

    for value in [30.0, -30.0, 1e30, -1e30, f32::NAN, f32::INFINITY] {
        assert!(packer.pack_no_clamp(value) < limit, "{value}");
    }

    Ok(())
}

#[test]
fn explicit_bit_count_uses_full_range() -> Result<(), Error> {
    let packer = FloatPacker::with_bit_count(1.0, 8)?;

    assert_eq!(packer.pack(1.0), 127);
    assert_eq!(packer.pack(-1.0), 0x81);
    assert_eq!(packer.unpack(127), 1.0);
    assert_eq!(packer.unpack(0x81), -1.0);

    Ok(())
}

#[test]
fn ranged_pack_and_unpack() -> Result<(), Error> {
    let (max, precision, value) = (1_269_679.0, 0.100_514_3, 558_430.4);
    let packer = FloatPacker::ranged(0.0, max, precision)?;

    let mut writer = BitWriter::new(1000);
    packer.write(&mut writer, value)?;

    let bytes = writer.to_bytes();
    let unpacked = packer.read(&mut BitReader::new(&bytes))?;
    assert!(!unpacked.is_nan());
    assert!((unpacked - value).abs() <= precision * 2.0, "off by {}", (unpacked - value).abs());

    Ok(())
}

#[test]
fn ranged_clamps_to_ends() -> Result<(), Error> {
    let packer = FloatPacker::ranged(-20.0, 40.0, 0.031)?;

    assert_eq!(packer.min(), -20.0);
    assert_eq!(packer.max(), 40.0);
    assert_eq!(packer.unpack(packer.pack(-100.0)), -20.0);
    assert_eq!(packer.unpack(packer.pack(100.0)), 40.0);

    Ok(())
}

#[test]
fn rejects_bad_configuration() {
    let invalid = |result: Result<FloatPacker, Error>| matches!(result, Err(Error::InvalidArgument(_)));

    assert!(invalid(FloatPacker::new(0.0, 0.1)));
    assert!(invalid(FloatPacker::new(-5.0, 0.1)));
    assert!(invalid(FloatPacker::new(10.0, 0.0)));
    assert!(invalid(FloatPacker::new(1.0, 5.0)));
    assert!(invalid(FloatPacker::new(f32::MAX, f32::MIN_POSITIVE)));
    assert!(invalid(FloatPacker::with_bit_count(1.0, 1)));
    assert!(invalid(FloatPacker::with_bit_count(1.0, 33)));
    assert!(invalid(FloatPacker::ranged(5.0, 5.0, 0.1)));
    assert!(invalid(FloatPacker::ranged(5.0, -5.0, 0.1)));
}

#[test]
fn write_fails_on_full_buffer() -> Result<(), Error> {
    let packer = FloatPacker::new(100.0, 0.1)?;
    let mut writer = BitWriter::new(0);

    assert!(matches!(
        packer.write(&mut writer, 1.0),
        Err(Error::Buffer(tessera_bit_buf::Error::BufferOverflow { .. }))
    ));

    Ok(())
}
