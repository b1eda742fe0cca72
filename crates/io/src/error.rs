use thiserror::Error;

/// Errors raised while decoding binary data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IoError {
    /// The buffer ended before the requested number of bytes.
    #[error("unexpected end of stream: needed {needed} bytes, {available} available")]
    EndOfStream { needed: usize, available: usize },

    /// A length or count prefix exceeded the caller's bound.
    #[error("value {value} exceeds maximum {max}")]
    TooLarge { value: u64, max: u64 },

    /// A variable-length integer used a wider encoding than necessary.
    #[error("non-canonical variable-length integer")]
    NonCanonicalVarInt,

    /// A string field was not valid UTF-8.
    #[error("invalid utf-8 string")]
    InvalidUtf8,

    /// The data was structurally invalid for the target type.
    #[error("invalid format: {message}")]
    InvalidFormat { message: String },
}

impl IoError {
    /// Creates an invalid format error.
    pub fn invalid_format<S: Into<String>>(message: S) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }
}

/// Result type for binary IO.
pub type IoResult<T> = std::result::Result<T, IoError>;
