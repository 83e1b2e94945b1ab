//! Miscellaneous utilities for working with bits.

/// Sign-extends an `nbits` wide two's complement value to [`i64`].
///
/// `nbits` must be in `1..=64`.
#[inline]
pub fn sign_extend(value: u64, nbits: u32) -> i64 {
    debug_assert!(nbits != 0 && nbits <= u64::BITS);

    let shift = u64::BITS - nbits;
    ((value << shift) as i64) >> shift
}
