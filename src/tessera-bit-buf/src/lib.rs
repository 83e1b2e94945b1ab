//! Provides bit level reading and writing of data.
//!
//! Network messages in game-like applications are dominated by small
//! values that rarely need their full native width. This crate stores
//! them back to back in a buffer of 64-bit words so that any value of
//! up to 64 bits costs at most two word accesses, regardless of where
//! in the stream it lands.
//!
//! # Layout
//!
//! Bit `i` of the stream lives in word `i >> 6` at bit offset `i & 63`.
//! When converted to bytes, every word is stored in little endian
//! order, so individual bits are filled from the LSB of each byte
//! towards its MSB.
//!
//! ```
//! use tessera_bit_buf::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new(16);
//! writer.write(0b1011, 4)?;
//! writer.write(0b10_0111_1001, 10)?;
//!
//! let bytes = writer.to_bytes();
//! assert_eq!(bytes, [0b1001_1011, 0b10_0111]);
//!
//! let mut reader = BitReader::new(&bytes);
//! assert_eq!(reader.read(4)?, 0b1011);
//! assert_eq!(reader.read(10)?, 0b10_0111_1001);
//! # Ok::<(), tessera_bit_buf::Error>(())
//! ```

#![deny(rust_2018_idioms, rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod copy;
pub use copy::copy_bits;

mod error;
pub use error::Error;

pub mod mask;

mod reader;
pub use reader::BitReader;

mod writer;
pub use writer::{BitWriter, WriterOptions, DEFAULT_MAX_BYTE_CAPACITY};

/// The number of bits in a storage word.
pub(crate) const WORD_BITS: usize = u64::BITS as usize;

/// Validates a bit count for a single read or write operation.
#[inline]
pub(crate) fn check_bit_count(bits: u32) -> Result<(), Error> {
    if bits <= u64::BITS {
        Ok(())
    } else {
        tessera_utils::hints::cold_path();
        Err(Error::InvalidArgument("bit count must not exceed 64"))
    }
}
