use sidechain_io::IoError;
use thiserror::Error;

/// Errors raised while building or decoding chain data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A fixed-size value was built from a slice of the wrong length.
    #[error("invalid length for {kind}: expected {expected}, got {actual}")]
    InvalidLength {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A string was not valid hex.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// A discriminant byte does not name a known variant.
    #[error("unknown {kind} {value:#04x}")]
    UnknownVariant { kind: &'static str, value: u8 },

    #[error(transparent)]
    Io(#[from] IoError),
}

impl CoreError {
    pub fn invalid_length(kind: &'static str, expected: usize, actual: usize) -> Self {
        Self::InvalidLength {
            kind,
            expected,
            actual,
        }
    }
}

impl From<CoreError> for IoError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Io(inner) => inner,
            other => IoError::invalid_format(other.to_string()),
        }
    }
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
