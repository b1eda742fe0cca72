use sidechain_io::IoError;
use thiserror::Error;

/// Result type for persistence operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Persistence-specific error types.
#[derive(Error, Debug)]
pub enum StorageError {
    /// A live entry already exists under the key.
    #[error("entry {key} is already written")]
    AlreadyExists { key: String },

    /// The prefix does not hold ledger state values.
    #[error("prefix {prefix:#04x} does not hold ledger state")]
    UnsupportedPrefix { prefix: u8 },

    /// A stored value could not be decoded.
    #[error("corrupt entry {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: IoError,
    },

    /// The backing store failed.
    #[error("storage backend error: {message}")]
    Backend { message: String },
}

impl StorageError {
    pub fn already_exists(full_key: &[u8]) -> Self {
        Self::AlreadyExists {
            key: hex::encode(full_key),
        }
    }

    pub fn corrupt(full_key: &[u8], source: IoError) -> Self {
        Self::Corrupt {
            key: hex::encode(full_key),
            source,
        }
    }

    pub fn backend<S: Into<String>>(message: S) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}
