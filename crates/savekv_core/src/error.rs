//! Error types for save slot operations.

use thiserror::Error;

/// Result type for save slot operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while loading or saving slots.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Store or codec error.
    #[error("codec error: {0}")]
    Codec(#[from] savekv_codec::CodecError),

    /// Save backend error.
    #[error("storage error: {0}")]
    Storage(#[from] savekv_storage::StorageError),

    /// `save` was called before any slot was loaded or saved.
    #[error("no current save: load or save_as a slot first")]
    NoCurrentSave,

    /// The requested slot has never been saved.
    #[error("save not found: {name}")]
    SaveNotFound {
        /// Name of the slot.
        name: String,
    },
}
