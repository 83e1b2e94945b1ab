use tessera_bit_buf::{mask::inclusive_mask, BitReader, BitWriter};

use crate::Error;

/// Packs unsigned integers as a chain of fixed-size blocks.
///
/// Every block of `block_size` bits is followed by a continuation bit
/// which is set when more blocks follow. Small values therefore cost
/// `block_size + 1` bits while no upper bound has to be configured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VariableBlockPacker {
    block_size: u32,
}

impl VariableBlockPacker {
    /// Creates a packer with blocks of `block_size` bits.
    ///
    /// The block size must be in `1..64`.
    pub fn new(block_size: u32) -> Result<Self, Error> {
        if block_size == 0 || block_size >= u64::BITS {
            return Err(Error::InvalidArgument("block size must be between 1 and 63"));
        }

        Ok(Self { block_size })
    }

    /// Gets the number of value bits per block.
    #[inline]
    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    /// Gets the number of bits needed to encode `value`.
    pub fn bit_count(&self, value: u64) -> u32 {
        let significant = (u64::BITS - value.leading_zeros()).max(1);
        let blocks = significant.div_ceil(self.block_size);

        blocks * (self.block_size + 1)
    }

    /// Writes `value` to `writer`.
    pub fn pack(&self, writer: &mut BitWriter, mut value: u64) -> Result<(), Error> {
        writer.reserve(self.bit_count(value) as usize)?;

        let mask = inclusive_mask(self.block_size);
        loop {
            let block = value & mask;
            value >>= self.block_size;

            let more = value != 0;
            writer.write(block | ((more as u64) << self.block_size), self.block_size + 1)?;
            if !more {
                return Ok(());
            }
        }
    }

    /// Reads a value written by [`Self::pack`].
    pub fn unpack(&self, reader: &mut BitReader<'_>) -> Result<u64, Error> {
        let mut value = 0;
        let mut shift = 0;
        loop {
            if shift >= u64::BITS {
                return Err(Error::Malformed("block encoded value exceeds 64 bits"));
            }

            let block = reader.read(self.block_size)?;
            // The final block may straddle bit 63; its excess bits must be zero.
            if shift + self.block_size > u64::BITS && block >> (u64::BITS - shift) != 0 {
                return Err(Error::Malformed("block encoded value exceeds 64 bits"));
            }

            value |= block << shift;
            shift += self.block_size;

            if !reader.read_bool()? {
                return Ok(value);
            }
        }
    }
}
