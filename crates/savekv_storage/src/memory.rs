//! In-memory save backend for testing.

use crate::backend::{validate_name, SaveBackend};
use crate::error::StorageResult;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// An in-memory save backend.
///
/// This backend keeps every slot in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Throwaway saves that don't need persistence
///
/// # Example
///
/// ```rust
/// use savekv_storage::{SaveBackend, InMemoryBackend};
///
/// let mut backend = InMemoryBackend::new();
/// backend.write("slot1", b"data").unwrap();
/// assert_eq!(backend.list().unwrap(), vec!["slot1".to_string()]);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    slots: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl InMemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend holding one pre-existing slot.
    ///
    /// Useful for testing how corrupted saves are loaded.
    #[must_use]
    pub fn with_slot(name: impl Into<String>, data: Vec<u8>) -> Self {
        let backend = Self::new();
        backend.slots.write().insert(name.into(), data);
        backend
    }
}

impl SaveBackend for InMemoryBackend {
    fn read(&self, name: &str) -> StorageResult<Option<Vec<u8>>> {
        validate_name(name)?;
        Ok(self.slots.read().get(name).cloned())
    }

    fn write(&mut self, name: &str, data: &[u8]) -> StorageResult<()> {
        validate_name(name)?;
        self.slots.write().insert(name.to_string(), data.to_vec());
        Ok(())
    }

    fn remove(&mut self, name: &str) -> StorageResult<bool> {
        validate_name(name)?;
        Ok(self.slots.write().remove(name).is_some())
    }

    fn exists(&self, name: &str) -> StorageResult<bool> {
        validate_name(name)?;
        Ok(self.slots.read().contains_key(name))
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        Ok(self.slots.read().keys().cloned().collect())
    }
}
