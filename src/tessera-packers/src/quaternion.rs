use std::f32::consts::FRAC_1_SQRT_2;

use tessera_bit_buf::{BitReader, BitWriter};

use crate::{
    scale::{check_bit_count, read_float_signed, write_float_signed},
    Error, Quaternion,
};

/// Largest magnitude any of the three smallest components of a unit
/// quaternion can have.
const MAX_SMALLEST: f32 = FRAC_1_SQRT_2;

const INDEX_BITS: u32 = 2;

const NORMALIZE_EPSILON: f32 = 1e-5;

/// Packs rotations with the "smallest three" technique.
///
/// The largest component of a unit quaternion can be recomputed from
/// the other three, so only its index is stored alongside them. Since
/// `q` and `-q` describe the same rotation, the three components are
/// negated whenever the largest one is negative, which lets the reader
/// assume a positive value for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuaternionPacker {
    bits_per_element: u32,
}

impl QuaternionPacker {
    /// The element width used by [`QuaternionPacker::default`], which
    /// is accurate enough for most rotations.
    pub const DEFAULT_BITS_PER_ELEMENT: u32 = 10;

    /// Creates a packer that stores every one of the three smallest
    /// components in `bits_per_element` bits, sign included.
    pub fn new(bits_per_element: u32) -> Result<Self, Error> {
        check_bit_count(bits_per_element)?;
        Ok(Self { bits_per_element })
    }

    /// Gets the number of bits used for each of the three components.
    #[inline]
    pub fn bits_per_element(&self) -> u32 {
        self.bits_per_element
    }

    /// Gets the number of bits written per quaternion.
    #[inline]
    pub fn bit_count(&self) -> u32 {
        INDEX_BITS + 3 * self.bits_per_element
    }

    /// Writes `value`, normalizing it first.
    pub fn pack(&self, writer: &mut BitWriter, value: Quaternion) -> Result<(), Error> {
        let q = normalize(value);
        let (index, largest) = Self::find_largest_index(q);

        let mut smallest = smaller_components(q, index);
        if largest < 0.0 {
            smallest = smallest.map(|v| -v);
        }

        writer.reserve(self.bit_count() as usize)?;
        writer.write(index as u64, INDEX_BITS)?;
        for v in smallest {
            write_float_signed(writer, v, MAX_SMALLEST, self.bits_per_element)?;
        }

        Ok(())
    }

    /// Reads a quaternion from `reader`.
    pub fn unpack(&self, reader: &mut BitReader<'_>) -> Result<Quaternion, Error> {
        let index = reader.read(INDEX_BITS)? as usize;

        let a = read_float_signed(reader, MAX_SMALLEST, self.bits_per_element)?;
        let b = read_float_signed(reader, MAX_SMALLEST, self.bits_per_element)?;
        let c = read_float_signed(reader, MAX_SMALLEST, self.bits_per_element)?;

        // Quantization error may push the sum slightly above 1.
        let largest = (1.0 - (a * a + b * b + c * c)).max(0.0).sqrt();

        Ok(match index {
            0 => Quaternion::new(largest, a, b, c),
            1 => Quaternion::new(a, largest, b, c),
            2 => Quaternion::new(a, b, largest, c),
            _ => Quaternion::new(a, b, c, largest),
        })
    }

    /// Finds the index of the component with the largest magnitude in
    /// `[x, y, z, w]` order, along with that component's signed value.
    ///
    /// Ties go to the lowest index.
    pub fn find_largest_index(q: Quaternion) -> (usize, f32) {
        let components = q.to_array();

        let mut index = 0;
        for (i, v) in components.iter().enumerate().skip(1) {
            if v * v > components[index] * components[index] {
                index = i;
            }
        }

        (index, components[index])
    }
}

impl Default for QuaternionPacker {
    fn default() -> Self {
        Self {
            bits_per_element: Self::DEFAULT_BITS_PER_ELEMENT,
        }
    }
}

// Leaves values within epsilon of unit length alone and maps
// degenerate input to the identity rotation.
fn normalize(q: Quaternion) -> Quaternion {
    let dot = q.length_squared();
    if (1.0 - NORMALIZE_EPSILON..=1.0 + NORMALIZE_EPSILON).contains(&dot) {
        return q;
    }

    let length = dot.sqrt();
    if length < NORMALIZE_EPSILON {
        log::trace!("Packing degenerate quaternion {q:?} as identity");
        Quaternion::IDENTITY
    } else {
        Quaternion::from_array(q.to_array().map(|v| v / length))
    }
}

// The components other than `index`, in `[x, y, z, w]` order.
fn smaller_components(q: Quaternion, index: usize) -> [f32; 3] {
    let [x, y, z, w] = q.to_array();
    match index {
        0 => [y, z, w],
        1 => [x, z, w],
        2 => [x, y, w],
        _ => [x, y, z],
    }
}
