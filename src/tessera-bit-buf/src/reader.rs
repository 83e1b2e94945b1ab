use byteorder::{ByteOrder, LittleEndian};
use tessera_utils::{
    align::{align_up, bits_to_bytes},
    hints::cold_path,
};

use crate::{check_bit_count, mask::inclusive_mask, Error, WORD_BITS};

const WORD_BYTES: usize = WORD_BITS / 8;

/// A buffer which enables bit-based deserialization of data.
///
/// The reader borrows the bytes it reads from and interprets them as
/// a sequence of little endian 64-bit words, mirroring the layout
/// produced by [`BitWriter`](crate::BitWriter). Individual bit reading
/// starts at the LSB of every byte, working towards the MSB.
#[derive(Clone, Debug, Default)]
pub struct BitReader<'a> {
    data: &'a [u8],

    // The next bit to be read.
    bit_position: usize,

    // The number of readable bits in `data`.
    bit_length: usize,
}

impl<'a> BitReader<'a> {
    /// Creates a new [`BitReader`] over a given byte slice.
    pub const fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            bit_position: 0,
            bit_length: data.len() << 3,
        }
    }

    /// Rebinds the reader to new bytes and moves the cursor back to
    /// the start.
    pub fn reset(&mut self, data: &'a [u8]) {
        *self = Self::new(data);
    }

    /// Rebinds the reader to `length` bytes of `data` starting at
    /// `offset`.
    ///
    /// Fails with [`Error::EndOfStream`] if the range is not fully
    /// contained in `data`, leaving the reader untouched.
    pub fn reset_range(
        &mut self,
        data: &'a [u8],
        offset: usize,
        length: usize,
    ) -> Result<(), Error> {
        let range = data.get(offset..).and_then(|rest| rest.get(..length));
        match range {
            Some(range) => {
                self.reset(range);
                Ok(())
            }
            None => Err(Error::EndOfStream {
                requested: offset.saturating_add(length).saturating_mul(8),
                length: data.len() << 3,
            }),
        }
    }

    /// Gets the number of bits consumed so far.
    #[inline]
    pub fn bit_position(&self) -> usize {
        self.bit_position
    }

    /// Gets the current bit position rounded up to whole bytes.
    #[inline]
    pub fn byte_position(&self) -> usize {
        bits_to_bytes(self.bit_position)
    }

    /// Gets the total number of readable bits.
    #[inline]
    pub fn bit_length(&self) -> usize {
        self.bit_length
    }

    /// Gets the number of bits left to read.
    #[inline]
    pub fn remaining_bits(&self) -> usize {
        self.bit_length - self.bit_position
    }

    /// Whether at least one more bit can be read.
    #[inline]
    pub fn can_read(&self) -> bool {
        self.bit_position < self.bit_length
    }

    /// Whether at least `count` more whole bytes can be read.
    #[inline]
    pub fn can_read_bytes(&self, count: usize) -> bool {
        count
            .checked_mul(8)
            .is_some_and(|bits| bits <= self.remaining_bits())
    }

    #[inline]
    fn check_new_position(&self, requested: usize) -> Result<(), Error> {
        if requested <= self.bit_length {
            Ok(())
        } else {
            cold_path();
            Err(Error::EndOfStream {
                requested,
                length: self.bit_length,
            })
        }
    }

    // Loads the word at `index`, zero-filling bytes past the end
    // of the data.
    #[inline]
    fn load_word(&self, index: usize) -> u64 {
        let start = index * WORD_BYTES;
        match self.data.get(start..start + WORD_BYTES) {
            Some(bytes) => LittleEndian::read_u64(bytes),
            None => {
                let tail = self.data.get(start..).unwrap_or_default();

                let mut buf = [0; WORD_BYTES];
                buf[..tail.len()].copy_from_slice(tail);
                LittleEndian::read_u64(&buf)
            }
        }
    }

    // Extracts `bits` bits at `position`, which must be in bounds.
    #[inline]
    fn extract(&self, bits: u32, position: usize) -> u64 {
        let index = position / WORD_BITS;
        let offset = (position % WORD_BITS) as u32;

        let mut value = self.load_word(index) >> offset;
        if offset + bits > u64::BITS {
            value |= self.load_word(index + 1) << (u64::BITS - offset);
        }

        value & inclusive_mask(bits)
    }

    /// Reads the next `bits` bits as an unsigned value.
    ///
    /// Reading 0 bits returns 0; more than 64 bits are rejected with
    /// [`Error::InvalidArgument`].
    #[inline]
    pub fn read(&mut self, bits: u32) -> Result<u64, Error> {
        check_bit_count(bits)?;
        if bits == 0 {
            return Ok(0);
        }

        let new_position = self.bit_position + bits as usize;
        self.check_new_position(new_position)?;

        let value = self.extract(bits, self.bit_position);
        self.bit_position = new_position;

        Ok(value)
    }

    /// Reads `bits` bits at an arbitrary `bit_position` without moving
    /// the cursor.
    pub fn read_at_position(&self, bits: u32, bit_position: usize) -> Result<u64, Error> {
        check_bit_count(bits)?;
        if bits == 0 {
            return Ok(0);
        }

        self.check_new_position(bit_position.saturating_add(bits as usize))?;
        Ok(self.extract(bits, bit_position))
    }

    /// Moves the cursor to `bit_position`.
    ///
    /// Prefer [`Self::read_at_position`] for peeking at earlier data;
    /// after moving backwards, the cursor must be restored manually.
    pub fn move_cursor(&mut self, bit_position: usize) -> Result<(), Error> {
        self.check_new_position(bit_position)?;
        self.bit_position = bit_position;
        Ok(())
    }

    /// Skips ahead to the next byte boundary.
    pub fn pad_to_byte(&mut self) {
        self.bit_position = align_up(self.bit_position, 8).min(self.bit_length);
    }

    /// Pads to the next byte boundary and borrows `count` raw bytes
    /// from the underlying data without copying them.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], Error> {
        let start = align_up(self.bit_position, 8);
        let end = count
            .checked_mul(8)
            .and_then(|bits| start.checked_add(bits))
            .unwrap_or(usize::MAX);
        self.check_new_position(end)?;

        let start = start >> 3;
        self.bit_position = (start + count) << 3;

        Ok(&self.data[start..start + count])
    }

    /// Reads a single bit as a [`bool`].
    #[inline]
    pub fn read_bool(&mut self) -> Result<bool, Error> {
        self.read(1).map(|v| v != 0)
    }

    /// Reads a [`u8`] value.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, Error> {
        self.read(u8::BITS).map(|v| v as u8)
    }

    /// Reads a [`u16`] value.
    #[inline]
    pub fn read_u16(&mut self) -> Result<u16, Error> {
        self.read(u16::BITS).map(|v| v as u16)
    }

    /// Reads a [`u32`] value.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32, Error> {
        self.read(u32::BITS).map(|v| v as u32)
    }

    /// Reads a [`u64`] value.
    #[inline]
    pub fn read_u64(&mut self) -> Result<u64, Error> {
        self.read(u64::BITS)
    }

    /// Reads an [`i8`] value in two's complement.
    #[inline]
    pub fn read_i8(&mut self) -> Result<i8, Error> {
        self.read_u8().map(|v| v as i8)
    }

    /// Reads an [`i16`] value in two's complement.
    #[inline]
    pub fn read_i16(&mut self) -> Result<i16, Error> {
        self.read_u16().map(|v| v as i16)
    }

    /// Reads an [`i32`] value in two's complement.
    #[inline]
    pub fn read_i32(&mut self) -> Result<i32, Error> {
        self.read_u32().map(|v| v as i32)
    }

    /// Reads an [`i64`] value in two's complement.
    #[inline]
    pub fn read_i64(&mut self) -> Result<i64, Error> {
        self.read_u64().map(|v| v as i64)
    }

    /// Reads an [`f32`] from its raw bit pattern.
    #[inline]
    pub fn read_f32(&mut self) -> Result<f32, Error> {
        self.read_u32().map(f32::from_bits)
    }

    /// Reads an [`f64`] from its raw bit pattern.
    #[inline]
    pub fn read_f64(&mut self) -> Result<f64, Error> {
        self.read_u64().map(f64::from_bits)
    }
}
