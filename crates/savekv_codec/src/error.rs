//! Error types for the codec crate.

use thiserror::Error;

/// Result type for store and codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that abort a store operation or a whole decode.
///
/// Problems confined to a single row are not errors; they are reported as
/// [`Diagnostic`](crate::Diagnostic)s and decoding continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// No store has been loaded yet.
    #[error("no store is loaded")]
    NotLoaded,

    /// The key is reserved for the save timestamp.
    #[error("key {key:?} is reserved for the save timestamp")]
    ReservedKey {
        /// The rejected key.
        key: String,
    },

    /// The key is not present in the store.
    #[error("key not found: {key:?}")]
    NotFound {
        /// The missing key.
        key: String,
    },

    /// Keys must be non-empty.
    #[error("keys must not be empty")]
    EmptyKey,

    /// The binary table's declared shape does not match the stream.
    #[error("malformed framing: {message}")]
    MalformedFraming {
        /// Description of the framing error.
        message: String,
    },

    /// A payload field is not valid UTF-8.
    #[error("invalid UTF-8 in payload")]
    InvalidUtf8,

    /// The configured text delimiter cannot be used.
    #[error("invalid delimiter {delimiter:?}")]
    InvalidDelimiter {
        /// The rejected delimiter.
        delimiter: char,
    },
}

impl CodecError {
    /// Create a reserved key error.
    pub fn reserved_key(key: impl Into<String>) -> Self {
        Self::ReservedKey { key: key.into() }
    }

    /// Create a not found error.
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create a malformed framing error.
    pub fn malformed_framing(message: impl Into<String>) -> Self {
        Self::MalformedFraming {
            message: message.into(),
        }
    }
}
