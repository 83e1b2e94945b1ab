//! Alignment of sizes to power-of-two boundaries.

/// Rounds `value` up to the next multiple of `align`.
///
/// `align` must be a power of two.
#[inline]
pub const fn align_up(value: usize, align: usize) -> usize {
    debug_assert!(align.is_power_of_two());
    (value + align - 1) & !(align - 1)
}

/// Rounds `value` down to the previous multiple of `align`.
///
/// `align` must be a power of two.
#[inline]
pub const fn align_down(value: usize, align: usize) -> usize {
    debug_assert!(align.is_power_of_two());
    value & !(align - 1)
}

/// Number of bytes needed to hold `bits` bits.
#[inline]
pub const fn bits_to_bytes(bits: usize) -> usize {
    (bits + 0b111) >> 3
}
