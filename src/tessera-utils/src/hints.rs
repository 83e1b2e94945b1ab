//! Hints for the compiler that affect code generation.

/// Marks the calling code path as unlikely to be taken.
///
/// Error branches in the bit buffers call this so the happy path
/// stays compact; it stands in for [`std::hint::cold_path`] until
/// that is stabilized.
#[cold]
#[inline(always)]
pub fn cold_path() {}
