use tessera_bit_buf::{BitReader, BitWriter};

use crate::{Error, FloatPacker, Vec2, Vec3};

/// Packs [`Vec2`] values with a symmetric [`FloatPacker`] per axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vector2Packer {
    x: FloatPacker,
    y: FloatPacker,
    bit_count: u32,
}

impl Vector2Packer {
    /// Creates a packer for values in `[-max, max]` on every axis,
    /// with each axis sized for its own precision.
    pub fn new(max: Vec2, precision: Vec2) -> Result<Self, Error> {
        let x = FloatPacker::new(max.x, precision.x)?;
        let y = FloatPacker::new(max.y, precision.y)?;

        Ok(Self {
            x,
            y,
            bit_count: x.bit_count() + y.bit_count(),
        })
    }

    /// Creates a packer which uses the same precision on every axis.
    pub fn with_uniform_precision(max: Vec2, precision: f32) -> Result<Self, Error> {
        Self::new(max, Vec2::splat(precision))
    }

    /// Gets the number of bits written per vector.
    #[inline]
    pub fn bit_count(&self) -> u32 {
        self.bit_count
    }

    /// Writes `value`, clamping every axis to its range.
    pub fn pack(&self, writer: &mut BitWriter, value: Vec2) -> Result<(), Error> {
        writer.reserve(self.bit_count as usize)?;

        self.x.write(writer, value.x)?;
        self.y.write(writer, value.y)
    }

    /// Reads a vector from `reader`.
    pub fn unpack(&self, reader: &mut BitReader<'_>) -> Result<Vec2, Error> {
        Ok(Vec2 {
            x: self.x.read(reader)?,
            y: self.y.read(reader)?,
        })
    }
}

/// Packs [`Vec3`] values with a symmetric [`FloatPacker`] per axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vector3Packer {
    x: FloatPacker,
    y: FloatPacker,
    z: FloatPacker,
    bit_count: u32,
}

impl Vector3Packer {
    /// Creates a packer for values in `[-max, max]` on every axis,
    /// with each axis sized for its own precision.
    pub fn new(max: Vec3, precision: Vec3) -> Result<Self, Error> {
        let x = FloatPacker::new(max.x, precision.x)?;
        let y = FloatPacker::new(max.y, precision.y)?;
        let z = FloatPacker::new(max.z, precision.z)?;

        Ok(Self {
            x,
            y,
            z,
            bit_count: x.bit_count() + y.bit_count() + z.bit_count(),
        })
    }

    /// Creates a packer which uses the same precision on every axis.
    pub fn with_uniform_precision(max: Vec3, precision: f32) -> Result<Self, Error> {
        Self::new(max, Vec3::splat(precision))
    }

    /// Gets the number of bits written per vector.
    #[inline]
    pub fn bit_count(&self) -> u32 {
        self.bit_count
    }

    /// Writes `value`, clamping every axis to its range.
    pub fn pack(&self, writer: &mut BitWriter, value: Vec3) -> Result<(), Error> {
        writer.reserve(self.bit_count as usize)?;

        self.x.write(writer, value.x)?;
        self.y.write(writer, value.y)?;
        self.z.write(writer, value.z)
    }

    /// Reads a vector from `reader`.
    pub fn unpack(&self, reader: &mut BitReader<'_>) -> Result<Vec3, Error> {
        Ok(Vec3 {
            x: self.x.read(reader)?,
            y: self.y.read(reader)?,
            z: self.z.read(reader)?,
        })
    }
}
