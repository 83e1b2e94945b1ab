//! Mapping between floats and fixed-width unsigned integers.
//!
//! The arithmetic is carried out in [`f64`] so that quantization of
//! 32-bit wide fields does not lose precision to rounding.

use tessera_bit_buf::{mask::inclusive_mask, BitReader, BitWriter};

use crate::Error;

/// The widths accepted for a single quantized float field.
pub const BIT_COUNT_RANGE: std::ops::RangeInclusive<u32> = 2..=u32::BITS;

pub(crate) fn check_bit_count(bits: u32) -> Result<(), Error> {
    if BIT_COUNT_RANGE.contains(&bits) {
        Ok(())
    } else {
        Err(Error::InvalidArgument("bit count must be between 2 and 32"))
    }
}

/// Maps `value` from `[min, max]` onto `[0, max_uint]`, rounding to the
/// nearest integer.
///
/// Values outside of the float range saturate at the ends of the
/// integer range.
#[inline]
pub fn scale_to_uint(value: f32, min: f32, max: f32, max_uint: u64) -> u64 {
    let min = min as f64;
    let t = (value as f64 - min) / (max as f64 - min);

    // Float to int casts saturate, NaN maps to 0.
    ((t * max_uint as f64).round() as u64).min(max_uint)
}

/// Maps `value` from `[0, max_uint]` back onto `[min, max]`.
#[inline]
pub fn scale_from_uint(value: u64, min: f32, max: f32, max_uint: u64) -> f32 {
    let min = min as f64;
    let t = value as f64 / max_uint as f64;

    (min + t * (max as f64 - min)) as f32
}

/// Writes `value` as a sign bit followed by `bits - 1` bits of
/// magnitude scaled over `[0, max]`.
///
/// A set sign bit marks a negative value. Magnitudes beyond `max` are
/// clamped.
pub fn write_float_signed(
    writer: &mut BitWriter,
    value: f32,
    max: f32,
    bits: u32,
) -> Result<(), Error> {
    check_bit_count(bits)?;

    let magnitude_bits = bits - 1;
    let magnitude = scale_to_uint(value.abs(), 0.0, max, inclusive_mask(magnitude_bits));
    let sign = value.is_sign_negative() && magnitude != 0;

    writer.write(sign as u64 | (magnitude << 1), bits)?;
    Ok(())
}

/// Reads a value written by [`write_float_signed`] with the same `max`
/// and `bits`.
pub fn read_float_signed(reader: &mut BitReader<'_>, max: f32, bits: u32) -> Result<f32, Error> {
    check_bit_count(bits)?;

    let raw = reader.read(bits)?;
    let magnitude = scale_from_uint(raw >> 1, 0.0, max, inclusive_mask(bits - 1));

    Ok(if raw & 1 != 0 { -magnitude } else { magnitude })
}
