//! Save backend trait definition.

use crate::error::{StorageError, StorageResult};

/// A store of named save payloads.
///
/// Backends are **opaque byte stores**. Each slot holds one complete payload
/// that is replaced as a whole on write. Backends do not understand the
/// binary or text save formats.
///
/// # Invariants
///
/// - `read` returns exactly the bytes of the last successful `write`
/// - a slot that was never written, or was removed, reads as `None`
/// - slot names are validated with [`validate_name`]
///
/// # Implementors
///
/// - [`super::InMemoryBackend`] - For testing
/// - [`super::FileBackend`] - For persistent saves
pub trait SaveBackend: Send + Sync {
    /// Reads the payload stored under `name`, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or an I/O error occurs.
    fn read(&self, name: &str) -> StorageResult<Option<Vec<u8>>>;

    /// Replaces the payload stored under `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or an I/O error occurs.
    fn write(&mut self, name: &str, data: &[u8]) -> StorageResult<()>;

    /// Removes the payload stored under `name`.
    ///
    /// Returns whether anything was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or an I/O error occurs.
    fn remove(&mut self, name: &str) -> StorageResult<bool>;

    /// Returns whether a payload is stored under `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or an I/O error occurs.
    fn exists(&self, name: &str) -> StorageResult<bool>;

    /// Lists stored slot names in sorted order.
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O error occurs.
    fn list(&self) -> StorageResult<Vec<String>>;
}

/// Checks that `name` can be used as a slot name.
///
/// Names must be non-empty, must not be `.` or `..`, and must not contain
/// path separators or NUL.
///
/// # Errors
///
/// Returns [`StorageError::InvalidName`] describing the problem.
pub fn validate_name(name: &str) -> StorageResult<()> {
    let reason = if name.is_empty() {
        "name is empty"
    } else if name == "." || name == ".." {
        "name is a relative path component"
    } else if name.contains(['/', '\\', '\0']) {
        "name contains a path separator or NUL"
    } else {
        return Ok(());
    };
    Err(StorageError::InvalidName {
        name: name.to_string(),
        reason,
    })
}
