use std::mem::size_of;

use byteorder::{ByteOrder, LittleEndian};
use tessera_utils::{
    align::{align_down, align_up, bits_to_bytes},
    hints::cold_path,
};

use crate::{
    check_bit_count,
    mask::{inclusive_mask, outer_mask},
    Error, WORD_BITS,
};

const WORD_BYTES: usize = size_of::<u64>();

/// The default upper bound for the capacity a resizable [`BitWriter`]
/// may grow to.
pub const DEFAULT_MAX_BYTE_CAPACITY: usize = 16 * 1024 * 1024;

/// Configuration for the storage of a [`BitWriter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriterOptions {
    /// The minimum number of bytes the writer can hold without
    /// resizing.
    ///
    /// This is rounded up to a whole number of 64-bit words.
    pub min_byte_capacity: usize,
    /// Whether the writer may grow its storage when a write goes
    /// past the current capacity.
    pub allow_resize: bool,
    /// The hard limit for growing the storage, in bytes.
    ///
    /// Ignored when resizing is not allowed.
    pub max_byte_capacity: usize,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            min_byte_capacity: 1300,
            allow_resize: true,
            max_byte_capacity: DEFAULT_MAX_BYTE_CAPACITY,
        }
    }
}

/// A buffer which enables bit-based serialization of data.
///
/// Bits are stored in a vector of 64-bit words. Values are written
/// starting at the LSB of the current word, working towards its MSB
/// and spilling over into the next word when necessary.
///
/// Every write masks the bits it owns before storing them, so a
/// writer can be [reset](Self::reset) and reused without clearing
/// its storage.
#[derive(Clone, Debug)]
pub struct BitWriter {
    // The backing storage, always a whole number of words.
    words: Vec<u64>,

    // The next bit to be written, which doubles as the length.
    bit_position: usize,

    allow_resize: bool,
    max_bit_capacity: usize,
}

impl BitWriter {
    /// Creates a fixed-capacity [`BitWriter`] that holds at least
    /// `min_byte_capacity` bytes.
    ///
    /// Writes past the capacity fail with [`Error::BufferOverflow`].
    pub fn new(min_byte_capacity: usize) -> Self {
        Self::with_options(WriterOptions {
            min_byte_capacity,
            allow_resize: false,
            ..Default::default()
        })
    }

    /// Creates a [`BitWriter`] that holds at least `min_byte_capacity`
    /// bytes and doubles its capacity whenever it runs out of space.
    pub fn resizable(min_byte_capacity: usize) -> Self {
        Self::with_options(WriterOptions {
            min_byte_capacity,
            allow_resize: true,
            ..Default::default()
        })
    }

    /// Creates a [`BitWriter`] from the given [`WriterOptions`].
    pub fn with_options(options: WriterOptions) -> Self {
        let byte_capacity = align_up(options.min_byte_capacity, WORD_BYTES);
        let max_byte_capacity = align_down(options.max_byte_capacity, WORD_BYTES).max(byte_capacity);

        Self {
            words: vec![0; byte_capacity / WORD_BYTES],
            bit_position: 0,
            allow_resize: options.allow_resize,
            max_bit_capacity: max_byte_capacity << 3,
        }
    }

    /// Gets the number of bits written so far.
    #[inline]
    pub fn bit_position(&self) -> usize {
        self.bit_position
    }

    /// Gets the number of bytes written so far, rounding up partially
    /// written bytes.
    #[inline]
    pub fn byte_length(&self) -> usize {
        bits_to_bytes(self.bit_position)
    }

    /// Gets the number of bits the writer can hold without resizing.
    #[inline]
    pub fn bit_capacity(&self) -> usize {
        self.words.len() * WORD_BITS
    }

    /// Gets the number of bytes the writer can hold without resizing.
    #[inline]
    pub fn byte_capacity(&self) -> usize {
        self.words.len() * WORD_BYTES
    }

    /// Whether the writer grows when it runs out of capacity.
    #[inline]
    pub fn allows_resize(&self) -> bool {
        self.allow_resize
    }

    #[inline]
    pub(crate) fn words(&self) -> &[u64] {
        &self.words
    }

    /// Moves the cursor back to the start of the buffer.
    ///
    /// The capacity, including any growth, is retained.
    #[inline]
    pub fn reset(&mut self) {
        self.bit_position = 0;
    }

    /// Makes sure the buffer can hold `new_length` bits in total.
    #[inline]
    pub(crate) fn ensure_capacity(&mut self, new_length: usize) -> Result<(), Error> {
        if new_length <= self.bit_capacity() {
            Ok(())
        } else {
            cold_path();
            self.grow(new_length)
        }
    }

    /// Makes sure `bits` more bits can be written, growing the buffer
    /// if the writer allows it.
    ///
    /// Encoders which emit a value through several writes call this
    /// first so that running out of space cannot leave a partially
    /// written value behind.
    pub fn reserve(&mut self, bits: usize) -> Result<(), Error> {
        self.ensure_capacity(self.bit_position.saturating_add(bits))
    }

    fn grow(&mut self, new_length: usize) -> Result<(), Error> {
        let capacity = self.bit_capacity();
        if !self.allow_resize {
            return Err(Error::BufferOverflow {
                new_length,
                capacity,
            });
        }
        if new_length > self.max_bit_capacity {
            return Err(Error::BufferOverflow {
                new_length,
                capacity: self.max_bit_capacity,
            });
        }

        let mut new_capacity = capacity.max(WORD_BITS);
        while new_capacity < new_length {
            new_capacity <<= 1;
        }
        let new_capacity = new_capacity.min(self.max_bit_capacity);

        log::warn!(
            "Resizing BitWriter from {} to {} bytes",
            capacity >> 3,
            new_capacity >> 3
        );
        self.words.resize(new_capacity / WORD_BITS, 0);

        Ok(())
    }

    // Stores the low `bits` of `value` at `position`. The value must be
    // masked and the position must be in bounds.
    #[inline]
    fn put(&mut self, value: u64, bits: u32, position: usize) {
        debug_assert!(bits != 0 && value & !inclusive_mask(bits) == 0);

        let index = position / WORD_BITS;
        let offset = (position % WORD_BITS) as u32;
        let end = offset + bits;

        if end <= u64::BITS {
            let word = &mut self.words[index];
            *word = (*word & outer_mask(offset, end)) | (value << offset);
        } else {
            // The value straddles two words, so `offset` is non-zero.
            let low = &mut self.words[index];
            *low = (*low & inclusive_mask(offset)) | (value << offset);

            let high = &mut self.words[index + 1];
            *high = (*high & !inclusive_mask(end - u64::BITS)) | (value >> (u64::BITS - offset));
        }
    }

    /// Appends the low `bits` bits of `value` to the buffer.
    ///
    /// Excess high bits in `value` are discarded. Writing 0 bits does
    /// nothing; more than 64 bits are rejected with
    /// [`Error::InvalidArgument`].
    #[inline]
    pub fn write(&mut self, value: u64, bits: u32) -> Result<(), Error> {
        check_bit_count(bits)?;
        if bits == 0 {
            return Ok(());
        }

        let new_position = self.bit_position + bits as usize;
        self.ensure_capacity(new_position)?;

        self.put(value & inclusive_mask(bits), bits, self.bit_position);
        self.bit_position = new_position;

        Ok(())
    }

    /// Overwrites `bits` bits at an arbitrary `bit_position` without
    /// moving the cursor.
    ///
    /// This is meant for backpatching length or flag fields once the
    /// data following them has been written. The target range must be
    /// within the current capacity; the writer never grows for this.
    pub fn write_at_position(
        &mut self,
        value: u64,
        bits: u32,
        bit_position: usize,
    ) -> Result<(), Error> {
        check_bit_count(bits)?;
        if bits == 0 {
            return Ok(());
        }

        let new_length = bit_position.saturating_add(bits as usize);
        if new_length > self.bit_capacity() {
            cold_path();
            return Err(Error::BufferOverflow {
                new_length,
                capacity: self.bit_capacity(),
            });
        }

        self.put(value & inclusive_mask(bits), bits, bit_position);
        Ok(())
    }

    /// Like [`Self::write_at_position`], with the position given in
    /// bytes.
    #[inline]
    pub fn write_at_byte_position(
        &mut self,
        value: u64,
        bits: u32,
        byte_position: usize,
    ) -> Result<(), Error> {
        let bit_position = byte_position.checked_mul(8).unwrap_or(usize::MAX);
        self.write_at_position(value, bits, bit_position)
    }

    /// Writes a [`bool`] as a single bit.
    #[inline]
    pub fn write_bool(&mut self, value: bool) -> Result<(), Error> {
        self.write(value as u64, 1)
    }

    /// Writes a [`u8`] value.
    #[inline]
    pub fn write_u8(&mut self, value: u8) -> Result<(), Error> {
        self.write(value as u64, u8::BITS)
    }

    /// Writes a [`u16`] value.
    #[inline]
    pub fn write_u16(&mut self, value: u16) -> Result<(), Error> {
        self.write(value as u64, u16::BITS)
    }

    /// Writes a [`u32`] value.
    #[inline]
    pub fn write_u32(&mut self, value: u32) -> Result<(), Error> {
        self.write(value as u64, u32::BITS)
    }

    /// Writes a [`u64`] value.
    #[inline]
    pub fn write_u64(&mut self, value: u64) -> Result<(), Error> {
        self.write(value, u64::BITS)
    }

    /// Writes an [`i8`] value in two's complement.
    #[inline]
    pub fn write_i8(&mut self, value: i8) -> Result<(), Error> {
        self.write_u8(value as u8)
    }

    /// Writes an [`i16`] value in two's complement.
    #[inline]
    pub fn write_i16(&mut self, value: i16) -> Result<(), Error> {
        self.write_u16(value as u16)
    }

    /// Writes an [`i32`] value in two's complement.
    #[inline]
    pub fn write_i32(&mut self, value: i32) -> Result<(), Error> {
        self.write_u32(value as u32)
    }

    /// Writes an [`i64`] value in two's complement.
    #[inline]
    pub fn write_i64(&mut self, value: i64) -> Result<(), Error> {
        self.write_u64(value as u64)
    }

    /// Writes the raw bit pattern of an [`f32`] value.
    #[inline]
    pub fn write_f32(&mut self, value: f32) -> Result<(), Error> {
        self.write_u32(value.to_bits())
    }

    /// Writes the raw bit pattern of an [`f64`] value.
    #[inline]
    pub fn write_f64(&mut self, value: f64) -> Result<(), Error> {
        self.write_u64(value.to_bits())
    }

    /// Moves the cursor to the next byte boundary, filling the skipped
    /// bits with zeroes.
    pub fn pad_to_byte(&mut self) -> Result<(), Error> {
        let padding = align_up(self.bit_position, 8) - self.bit_position;
        self.write(0, padding as u32)
    }

    /// Pads to the next byte boundary and appends whole bytes from
    /// `buf`.
    pub fn write_bytes(&mut self, buf: &[u8]) -> Result<(), Error> {
        let padding = align_up(self.bit_position, 8) - self.bit_position;
        self.reserve(padding + (buf.len() << 3))?;
        self.pad_to_byte()?;

        for chunk in buf.chunks(WORD_BYTES) {
            let mut word = [0; WORD_BYTES];
            word[..chunk.len()].copy_from_slice(chunk);

            self.write(LittleEndian::read_u64(&word), (chunk.len() << 3) as u32)?;
        }

        Ok(())
    }

    /// Prefixes all data produced by the closure `f` with its length in
    /// bits, stored in a `bits` wide field.
    ///
    /// A placeholder is reserved before `f` runs and backpatched with
    /// [`Self::write_at_position`] afterwards. When `f` fails or its
    /// data does not fit the prefix, the cursor is moved back to where
    /// the prefix would have started.
    pub fn length_prefixed<F, T, E>(&mut self, bits: u32, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<Error>,
    {
        let prefix_position = self.bit_position;
        self.write(0, bits)?;

        let start = self.bit_position;
        let t = match f(self) {
            Ok(t) => t,
            Err(e) => {
                self.bit_position = prefix_position;
                return Err(e);
            }
        };

        let written = (self.bit_position - start) as u64;
        if written > inclusive_mask(bits) {
            self.bit_position = prefix_position;
            return Err(Error::InvalidArgument("length prefix too narrow for written data").into());
        }
        self.write_at_position(written, bits, prefix_position)?;

        Ok(t)
    }

    /// Copies the written part of the buffer into a new byte vector.
    ///
    /// Unwritten bits of the last byte are zeroed.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![0; self.byte_length()];
        self.fill_bytes(&mut out);
        out
    }

    /// Copies the written part of the buffer into `dst`, starting at
    /// `offset`, and returns the number of bytes copied.
    pub fn copy_to_bytes(&self, dst: &mut [u8], offset: usize) -> Result<usize, Error> {
        let len = self.byte_length();
        let available = dst.len();

        match dst.get_mut(offset..).and_then(|dst| dst.get_mut(..len)) {
            Some(dst) => {
                self.fill_bytes(dst);
                Ok(len)
            }
            None => Err(Error::BufferOverflow {
                new_length: offset.saturating_add(len).saturating_mul(8),
                capacity: available << 3,
            }),
        }
    }

    fn fill_bytes(&self, out: &mut [u8]) {
        debug_assert_eq!(out.len(), self.byte_length());

        let mut buf = [0; WORD_BYTES];
        for (chunk, &word) in out.chunks_mut(WORD_BYTES).zip(&self.words) {
            LittleEndian::write_u64(&mut buf, word);
            chunk.copy_from_slice(&buf[..chunk.len()]);
        }

        // Bits past the cursor may be stale from before a reset.
        let partial = (self.bit_position & 7) as u32;
        if let (Some(last), true) = (out.last_mut(), partial != 0) {
            *last &= inclusive_mask(partial) as u8;
        }
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::with_options(WriterOptions::default())
    }
}
