//! Error types for storage operations.

use std::io;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred while talking to the store.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An operation was applied to a key holding a different kind of value.
    ///
    /// Mirrors the Redis `WRONGTYPE` reply: string, hash and list
    /// operations each require the key to hold that kind of value
    /// (or no value at all).
    #[error("wrong value kind at key {key:?}")]
    WrongType {
        /// The key holding the unexpected value kind.
        key: String,
    },

    /// The backing client reported a failure.
    ///
    /// Connectivity and protocol errors propagate through this variant
    /// unmodified; no retries happen at this layer.
    #[error("backend error: {0}")]
    Backend(String),
}

impl StorageError {
    /// Creates a wrong-type error for `key`.
    pub fn wrong_type(key: impl Into<String>) -> Self {
        Self::WrongType { key: key.into() }
    }

    /// Creates a backend error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}
