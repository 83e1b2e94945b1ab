use tessera_bit_buf::{BitReader, BitWriter};

use crate::{Error, FloatPacker, Vec3};

/// Packs positions inside an axis-aligned box.
///
/// Every axis is quantized over its own `[min, max]` interval at a
/// shared precision, so a box that is flat along one axis costs fewer
/// bits on it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionPacker {
    x: FloatPacker,
    y: FloatPacker,
    z: FloatPacker,
    bit_count: u32,
}

impl PositionPacker {
    /// Creates a packer for the box spanned by the corners `min` and
    /// `max`.
    pub fn new(min: Vec3, max: Vec3, precision: f32) -> Result<Self, Error> {
        let x = FloatPacker::ranged(min.x, max.x, precision)?;
        let y = FloatPacker::ranged(min.y, max.y, precision)?;
        let z = FloatPacker::ranged(min.z, max.z, precision)?;

        Ok(Self {
            x,
            y,
            z,
            bit_count: x.bit_count() + y.bit_count() + z.bit_count(),
        })
    }

    /// Gets the number of bits written per position.
    #[inline]
    pub fn bit_count(&self) -> u32 {
        self.bit_count
    }

    /// Writes `value`, clamping it into the box.
    pub fn pack(&self, writer: &mut BitWriter, value: Vec3) -> Result<(), Error> {
        writer.reserve(self.bit_count as usize)?;

        self.x.write(writer, value.x)?;
        self.y.write(writer, value.y)?;
        self.z.write(writer, value.z)
    }

    /// Reads a position from `reader`.
    pub fn unpack(&self, reader: &mut BitReader<'_>) -> Result<Vec3, Error> {
        Ok(Vec3 {
            x: self.x.read(reader)?,
            y: self.y.read(reader)?,
            z: self.z.read(reader)?,
        })
    }
}
