//! Bit masks and bit counts for sizing fields.
//!
//! Shifting a [`u64`] by 64 or more is an overflow in Rust, so every
//! function here special-cases the boundary widths instead of relying
//! on `(1 << n) - 1`.

use crate::Error;

/// Creates a mask with the low `bit_count` bits set.
///
/// `0` produces an empty mask and `64` produces [`u64::MAX`].
#[inline]
pub const fn inclusive_mask(bit_count: u32) -> u64 {
    debug_assert!(bit_count <= u64::BITS);

    if bit_count == 0 {
        0
    } else {
        u64::MAX >> (u64::BITS - bit_count)
    }
}

/// Creates a mask of all bits in a word that lie *outside* of the
/// range `[start, end)`.
///
/// This is what survives of a word when a value of `end - start`
/// bits is stored at offset `start`. `start` must be below 64 and
/// `end` in `start..=64`.
#[inline]
pub const fn outer_mask(start: u32, end: u32) -> u64 {
    debug_assert!(start < u64::BITS && start <= end && end <= u64::BITS);

    let low = if start == 0 {
        0
    } else {
        u64::MAX >> (u64::BITS - start)
    };
    let high = if end % u64::BITS == 0 {
        0
    } else {
        u64::MAX << end
    };

    low | high
}

/// Computes how many bits are required to store every value in the
/// inclusive range `min..=max`.
///
/// Fails with [`Error::InvalidRange`] when `min >= max`.
#[inline]
pub fn bit_count_from_range(min: u64, max: u64) -> Result<u32, Error> {
    if min >= max {
        return Err(Error::InvalidRange { min, max });
    }

    bit_count_from_span(max - min)
}

/// Computes how many bits are required to store every value in the
/// inclusive range `0..=span`.
///
/// This is `ceil(log2(span + 1))`, computed without floating point.
/// Fails with [`Error::InvalidRange`] when `span` is zero.
#[inline]
pub fn bit_count_from_span(span: u64) -> Result<u32, Error> {
    if span == 0 {
        return Err(Error::InvalidRange { min: 0, max: 0 });
    }

    Ok(u64::BITS - span.leading_zeros())
}
