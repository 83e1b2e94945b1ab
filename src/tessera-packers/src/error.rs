use thiserror::Error;

/// Errors that may occur while configuring a packer or coding values.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The underlying bit buffer rejected a read or write.
    #[error("{0}")]
    Buffer(#[from] tessera_bit_buf::Error),

    /// A packer was constructed from a bad configuration.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// A value exceeds what the packer is able to encode.
    #[error("value {value} is out of range, must be at most {max}")]
    OutOfRange { value: u64, max: u64 },

    /// The encoded data does not describe a valid value.
    #[error("malformed input: {0}")]
    Malformed(&'static str),
}
