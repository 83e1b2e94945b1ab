use tessera_bit_buf::{BitReader, BitWriter};
use tessera_packers::{
    scale::{read_float_signed, scale_from_uint, scale_to_uint, write_float_signed},
    Error,
};

#[test]
fn scaling_hits_range_ends() {
    assert_eq!(scale_to_uint(-3.0, -3.0, 5.0, 255), 0);
    assert_eq!(scale_to_uint(5.0, -3.0, 5.0, 255), 255);
    assert_eq!(scale_to_uint(1.0, -3.0, 5.0, 255), 128);

    assert_eq!(scale_from_uint(0, -3.0, 5.0, 255), -3.0);
    assert_eq!(scale_from_uint(255, -3.0, 5.0, 255), 5.0);
}

#[test]
fn scaling_saturates() {
    assert_eq!(scale_to_uint(-10.0, 0.0, 1.0, 15), 0);
    assert_eq!(scale_to_uint(10.0, 0.0, 1.0, 15), 15);
    assert_eq!(scale_to_uint(f32::NAN, 0.0, 1.0, 15), 0);
}

#[test]
fn sign_bit_comes_first() -> Result<(), Error> {
    let mut writer = BitWriter::new(8);
    write_float_signed(&mut writer, 1.0, 1.0, 4)?;
    write_float_signed(&mut writer, -1.0, 1.0, 4)?;

    assert_eq!(writer.to_bytes(), [0xFE]);

    Ok(())
}

#[test]
fn signed_round_trip() -> Result<(), Error> {
    let values = [0.0, 0.25, -0.25, 0.7, -0.7, 2.0, -2.0];

    let mut writer = BitWriter::new(64);
    for value in values {
        write_float_signed(&mut writer, value, 1.0, 10)?;
    }
    assert_eq!(writer.bit_position(), 10 * values.len());

    let bytes = writer.to_bytes();
    let mut reader = BitReader::new(&bytes);
    for value in values {
        let expected = value.clamp(-1.0, 1.0);
        let actual = read_float_signed(&mut reader, 1.0, 10)?;
        assert!((actual - expected).abs() <= 0.5 / 511.0 + f32::EPSILON, "{value}: {actual}");
    }

    Ok(())
}

#[test]
fn negative_zero_is_written_as_zero() -> Result<(), Error> {
    let mut writer = BitWriter::new(8);
    write_float_signed(&mut writer, -0.0, 1.0, 8)?;
    write_float_signed(&mut writer, -0.0001, 1.0, 8)?;

    assert_eq!(writer.to_bytes(), [0, 0]);

    Ok(())
}

#[test]
fn rejects_bad_bit_counts() {
    let mut writer = BitWriter::new(8);
    assert!(matches!(
        write_float_signed(&mut writer, 0.5, 1.0, 1),
        Err(Error::InvalidArgument(_))
    ));
    assert_eq!(writer.bit_position(), 0);

    let mut reader = BitReader::new(&[0; 8]);
    assert!(matches!(
        read_float_signed(&mut reader, 1.0, 33),
        Err(Error::InvalidArgument(_))
    ));
}
