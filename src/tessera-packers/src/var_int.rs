use tessera_bit_buf::{
    mask::{bit_count_from_span, inclusive_mask},
    BitReader, BitWriter,
};

use crate::Error;

// A value together with the prefix that selects its bucket.
struct Encoded {
    prefix: u64,
    prefix_bits: u32,
    value: u64,
    bits: u32,
}

impl Encoded {
    fn bit_count(&self) -> usize {
        (self.prefix_bits + self.bits) as usize
    }

    fn write(&self, writer: &mut BitWriter) -> Result<(), Error> {
        writer.write(self.prefix, self.prefix_bits)?;
        writer.write(self.value, self.bits)?;
        Ok(())
    }
}

/// Packs unsigned integers into one of two or three buckets of
/// different widths, depending on their magnitude.
///
/// A single prefix bit of `0` selects the small bucket. With three
/// buckets, the bits `1, 0` select the medium and `1, 1` the large
/// bucket; with two buckets, a single `1` selects the medium one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VariableIntPacker {
    small_bits: u32,
    medium_bits: u32,
    large_bits: Option<u32>,
    clamp: bool,
}

fn bits_for_threshold(max: u64) -> Result<u32, Error> {
    bit_count_from_span(max)
        .map_err(|_| Error::InvalidArgument("bucket maximum must be greater than zero"))
}

impl VariableIntPacker {
    /// Creates a packer from explicit bucket widths.
    ///
    /// Widths must be strictly increasing and at most 64 bits. Without
    /// a `large` width, only two buckets are used.
    pub fn from_bit_counts(small: u32, medium: u32, large: Option<u32>) -> Result<Self, Error> {
        let widest = large.unwrap_or(medium);
        let increasing = 0 < small && small < medium && large.map_or(true, |large| medium < large);
        if !increasing || widest > u64::BITS {
            return Err(Error::InvalidArgument(
                "bucket widths must be increasing and at most 64 bits",
            ));
        }

        log::debug!("Variable int buckets: {small}, {medium}, {large:?} bits");

        Ok(Self {
            small_bits: small,
            medium_bits: medium,
            large_bits: large,
            clamp: false,
        })
    }

    /// Creates a three-bucket packer whose small and medium buckets are
    /// just wide enough for `small_max` and `medium_max`, respectively.
    ///
    /// The large bucket takes the full 64 bits.
    pub fn new(small_max: u64, medium_max: u64) -> Result<Self, Error> {
        Self::from_bit_counts(
            bits_for_threshold(small_max)?,
            bits_for_threshold(medium_max)?,
            Some(u64::BITS),
        )
    }

    /// Creates a three-bucket packer whose large bucket is just wide
    /// enough for `large_max`.
    ///
    /// When `throw_if_over_large` is unset, values which do not fit the
    /// large bucket are clamped to the largest encodable value instead
    /// of being rejected.
    pub fn with_large(
        small_max: u64,
        medium_max: u64,
        large_max: u64,
        throw_if_over_large: bool,
    ) -> Result<Self, Error> {
        let mut packer = Self::from_bit_counts(
            bits_for_threshold(small_max)?,
            bits_for_threshold(medium_max)?,
            Some(bits_for_threshold(large_max)?),
        )?;
        packer.clamp = !throw_if_over_large;

        Ok(packer)
    }

    /// Gets the largest value the packer can encode.
    #[inline]
    pub fn max_value(&self) -> u64 {
        inclusive_mask(self.large_bits.unwrap_or(self.medium_bits))
    }

    /// Gets the number of bits used for values in the small bucket.
    #[inline]
    pub fn min_bit_count(&self) -> u32 {
        self.small_bits + 1
    }

    /// Gets the number of bits used for values in the widest bucket.
    #[inline]
    pub fn max_bit_count(&self) -> u32 {
        match self.large_bits {
            Some(large) => large + 2,
            None => self.medium_bits + 1,
        }
    }

    fn encode(&self, value: u64) -> Result<Encoded, Error> {
        let max = self.max_value();
        let value = if value <= max {
            value
        } else if self.clamp {
            log::warn!("Clamping {value} to the largest encodable value {max}");
            max
        } else {
            return Err(Error::OutOfRange { value, max });
        };

        let (prefix, prefix_bits, bits) = if value <= inclusive_mask(self.small_bits) {
            (0b0, 1, self.small_bits)
        } else {
            match self.large_bits {
                None => (0b1, 1, self.medium_bits),
                Some(_) if value <= inclusive_mask(self.medium_bits) => (0b01, 2, self.medium_bits),
                Some(large) => (0b11, 2, large),
            }
        };

        Ok(Encoded {
            prefix,
            prefix_bits,
            value,
            bits,
        })
    }

    /// Writes `value` using the smallest bucket it fits in.
    pub fn pack(&self, writer: &mut BitWriter, value: u64) -> Result<(), Error> {
        let encoded = self.encode(value)?;

        writer.reserve(encoded.bit_count())?;
        encoded.write(writer)
    }

    /// Reads a value written by [`Self::pack`].
    pub fn unpack(&self, reader: &mut BitReader<'_>) -> Result<u64, Error> {
        let bits = if !reader.read_bool()? {
            self.small_bits
        } else {
            match self.large_bits {
                None => self.medium_bits,
                Some(large) => {
                    if reader.read_bool()? {
                        large
                    } else {
                        self.medium_bits
                    }
                }
            }
        };

        Ok(reader.read(bits)?)
    }

    /// Writes a [`u32`] value.
    #[inline]
    pub fn pack_u32(&self, writer: &mut BitWriter, value: u32) -> Result<(), Error> {
        self.pack(writer, value as u64)
    }

    /// Reads a value that must fit into a [`u32`].
    pub fn unpack_u32(&self, reader: &mut BitReader<'_>) -> Result<u32, Error> {
        let value = self.unpack(reader)?;
        u32::try_from(value).map_err(|_| Error::OutOfRange {
            value,
            max: u32::MAX as u64,
        })
    }

    /// Writes a [`u16`] value.
    #[inline]
    pub fn pack_u16(&self, writer: &mut BitWriter, value: u16) -> Result<(), Error> {
        self.pack(writer, value as u64)
    }

    /// Reads a value that must fit into a [`u16`].
    pub fn unpack_u16(&self, reader: &mut BitReader<'_>) -> Result<u16, Error> {
        let value = self.unpack(reader)?;
        u16::try_from(value).map_err(|_| Error::OutOfRange {
            value,
            max: u16::MAX as u64,
        })
    }

    /// Writes a presence bit, followed by the value if there is one.
    pub fn pack_nullable(&self, writer: &mut BitWriter, value: Option<u64>) -> Result<(), Error> {
        match value {
            Some(value) => {
                let encoded = self.encode(value)?;

                writer.reserve(1 + encoded.bit_count())?;
                writer.write_bool(true)?;
                encoded.write(writer)
            }
            None => Ok(writer.write_bool(false)?),
        }
    }

    /// Reads a value written by [`Self::pack_nullable`].
    pub fn unpack_nullable(&self, reader: &mut BitReader<'_>) -> Result<Option<u64>, Error> {
        if reader.read_bool()? {
            self.unpack(reader).map(Some)
        } else {
            Ok(None)
        }
    }
}
