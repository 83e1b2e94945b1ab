use thiserror::Error;

/// Errors that may occur while reading or writing bits.
///
/// A failed operation never moves the cursor of the buffer it was
/// invoked on, so callers are free to grow a buffer and retry.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// An argument was outside the domain accepted by an operation.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// A write would exceed the capacity of the buffer, or the maximum
    /// capacity a resizable buffer may grow to.
    ///
    /// Both values are given in bits.
    #[error("Can not write over end of buffer, new length {new_length}, capacity {capacity}")]
    BufferOverflow { new_length: usize, capacity: usize },

    /// A read would go past the readable length of the buffer.
    ///
    /// Both values are given in bits.
    #[error("Can not read over end of buffer, new position {requested}, length {length} bits")]
    EndOfStream { requested: usize, length: usize },

    /// A bit count was requested for an empty or inverted range.
    #[error("Min:{min} is greater or equal to than Max:{max}")]
    InvalidRange { min: u64, max: u64 },
}
