use tessera_bit_buf::{
    mask::{bit_count_from_span, inclusive_mask},
    BitReader, BitWriter,
};
use tessera_utils::bits::sign_extend;

use crate::{
    scale::{check_bit_count, scale_from_uint, scale_to_uint},
    Error,
};

#[derive(Clone, Copy, Debug, PartialEq)]
enum Encoding {
    // N-bit two's complement over [-max, max] where the largest
    // integer maps to `max` and 0 maps to exactly 0.0.
    Symmetric { scale: f64 },
    // N-bit unsigned over [min, max].
    Ranged { max_uint: u64 },
}

/// Quantizes [`f32`] values in a fixed range to a fixed number of bits.
///
/// Symmetric packers cover `[-max, max]` and always decode zero to
/// exactly `0.0`. Ranged packers cover an arbitrary `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloatPacker {
    min: f32,
    max: f32,
    bit_count: u32,
    encoding: Encoding,
}

fn check_positive(value: f32, msg: &'static str) -> Result<(), Error> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidArgument(msg))
    }
}

// Width needed to store `range / precision` steps.
fn bit_count_for(range: f64, precision: f32) -> Result<u32, Error> {
    let steps = range / precision as f64;
    bit_count_from_span(steps as u64)
        .map_err(|_| Error::InvalidArgument("precision must be smaller than the range"))
}

impl FloatPacker {
    /// Creates a symmetric packer for `[-max, max]` which resolves
    /// values at least as fine as `precision`.
    pub fn new(max: f32, precision: f32) -> Result<Self, Error> {
        check_positive(max, "max must be greater than zero")?;
        check_positive(precision, "precision must be greater than zero")?;

        let bits = bit_count_for(2.0 * max as f64, precision)?;
        Self::with_bit_count(max, bits)
    }

    /// Creates a symmetric packer for `[-max, max]` that uses exactly
    /// `bits` bits per value.
    pub fn with_bit_count(max: f32, bits: u32) -> Result<Self, Error> {
        check_positive(max, "max must be greater than zero")?;
        check_bit_count(bits)?;

        let max_int = inclusive_mask(bits - 1);
        log::debug!("Symmetric float packer for +/-{max} uses {bits} bits");

        Ok(Self {
            min: -max,
            max,
            bit_count: bits,
            encoding: Encoding::Symmetric {
                scale: max_int as f64 / max as f64,
            },
        })
    }

    /// Creates a packer for the asymmetric range `[min, max]` which
    /// resolves values at least as fine as `precision`.
    pub fn ranged(min: f32, max: f32, precision: f32) -> Result<Self, Error> {
        if !(min < max && min.is_finite() && max.is_finite()) {
            return Err(Error::InvalidArgument("min must be less than max"));
        }
        check_positive(precision, "precision must be greater than zero")?;

        let bits = bit_count_for(max as f64 - min as f64, precision)?;
        check_bit_count(bits)?;
        log::debug!("Float packer for [{min}, {max}] uses {bits} bits");

        Ok(Self {
            min,
            max,
            bit_count: bits,
            encoding: Encoding::Ranged {
                max_uint: inclusive_mask(bits),
            },
        })
    }

    /// Gets the lower end of the encoded range.
    #[inline]
    pub fn min(&self) -> f32 {
        self.min
    }

    /// Gets the upper end of the encoded range.
    #[inline]
    pub fn max(&self) -> f32 {
        self.max
    }

    /// Gets the number of bits written per value.
    #[inline]
    pub fn bit_count(&self) -> u32 {
        self.bit_count
    }

    /// Quantizes `value`, clamping it to the packer's range first.
    #[inline]
    pub fn pack(&self, value: f32) -> u32 {
        self.pack_no_clamp(value.clamp(self.min, self.max))
    }

    /// Quantizes `value` without clamping.
    ///
    /// Values outside of the range produce arbitrary bits which still
    /// fit into [`Self::bit_count`] bits.
    #[inline]
    pub fn pack_no_clamp(&self, value: f32) -> u32 {
        let mask = inclusive_mask(self.bit_count);
        let raw = match self.encoding {
            Encoding::Symmetric { scale } => (value as f64 * scale).round() as i64 as u64,
            Encoding::Ranged { max_uint } => scale_to_uint(value, self.min, self.max, max_uint),
        };

        (raw & mask) as u32
    }

    /// Restores a value from its quantized form.
    #[inline]
    pub fn unpack(&self, packed: u32) -> f32 {
        let raw = packed as u64 & inclusive_mask(self.bit_count);
        match self.encoding {
            Encoding::Symmetric { scale } => (sign_extend(raw, self.bit_count) as f64 / scale) as f32,
            Encoding::Ranged { max_uint } => scale_from_uint(raw, self.min, self.max, max_uint),
        }
    }

    /// Clamps and writes `value` to `writer`.
    pub fn write(&self, writer: &mut BitWriter, value: f32) -> Result<(), Error> {
        writer.write(self.pack(value) as u64, self.bit_count)?;
        Ok(())
    }

    /// Writes `value` to `writer` without clamping.
    pub fn write_no_clamp(&self, writer: &mut BitWriter, value: f32) -> Result<(), Error> {
        writer.write(self.pack_no_clamp(value) as u64, self.bit_count)?;
        Ok(())
    }

    /// Reads a value from `reader`.
    pub fn read(&self, reader: &mut BitReader<'_>) -> Result<f32, Error> {
        let packed = reader.read(self.bit_count)?;
        Ok(self.unpack(packed as u32))
    }
}
