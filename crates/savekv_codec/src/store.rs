//! The typed in-memory store.

use crate::error::{CodecError, CodecResult};
use crate::value::Value;
use std::collections::BTreeMap;

/// Key reserved for the UNIX timestamp of the most recent save.
pub const DATE_KEY: &str = "date";

#[derive(Debug, Clone, PartialEq)]
enum State {
    NotLoaded,
    Loaded(BTreeMap<String, Value>),
}

/// An in-memory mapping from keys to tagged [`Value`]s.
///
/// A store is either not loaded, in which case every operation except
/// [`clear`](Self::clear) and [`has`](Self::has) fails with
/// [`CodecError::NotLoaded`], or loaded with zero or more entries.
///
/// Entries are kept sorted by key, so encoding a store always visits them in
/// the same order.
///
/// # Example
///
/// ```
/// use savekv_codec::{Store, Value};
///
/// let mut store = Store::new();
/// store.set("volume", 0.75f32).unwrap();
/// store.set("volume", 0.5f32).unwrap();
/// assert_eq!(store.get("volume").unwrap(), &Value::Float(0.5));
/// assert_eq!(store.count().unwrap(), 1);
///
/// // The save timestamp is off-limits.
/// assert!(store.set("date", 0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Store {
    state: State,
}

impl Store {
    /// Creates a loaded, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: State::Loaded(BTreeMap::new()),
        }
    }

    /// Creates a store in the not-loaded state.
    #[must_use]
    pub const fn not_loaded() -> Self {
        Self {
            state: State::NotLoaded,
        }
    }

    /// Returns whether the store has been loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self.state, State::Loaded(_))
    }

    fn entries(&self) -> CodecResult<&BTreeMap<String, Value>> {
        match &self.state {
            State::Loaded(entries) => Ok(entries),
            State::NotLoaded => Err(CodecError::NotLoaded),
        }
    }

    fn entries_mut(&mut self) -> CodecResult<&mut BTreeMap<String, Value>> {
        match &mut self.state {
            State::Loaded(entries) => Ok(entries),
            State::NotLoaded => Err(CodecError::NotLoaded),
        }
    }

    fn ensure_loaded(&mut self) -> &mut BTreeMap<String, Value> {
        if let State::NotLoaded = self.state {
            self.state = State::Loaded(BTreeMap::new());
        }
        match &mut self.state {
            State::Loaded(entries) => entries,
            State::NotLoaded => unreachable!("state was just loaded"),
        }
    }

    /// Inserts or replaces the value for `key`.
    ///
    /// # Errors
    ///
    /// - [`CodecError::NotLoaded`] if the store is not loaded
    /// - [`CodecError::EmptyKey`] if `key` is empty
    /// - [`CodecError::ReservedKey`] if `key` is [`DATE_KEY`]
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> CodecResult<()> {
        let entries = self.entries_mut()?;
        let key = key.into();
        if key.is_empty() {
            return Err(CodecError::EmptyKey);
        }
        if key == DATE_KEY {
            return Err(CodecError::reserved_key(key));
        }
        entries.insert(key, value.into());
        Ok(())
    }

    /// Returns the value stored under `key`.
    ///
    /// # Errors
    ///
    /// - [`CodecError::NotLoaded`] if the store is not loaded
    /// - [`CodecError::NotFound`] if the key is absent
    pub fn get(&self, key: &str) -> CodecResult<&Value> {
        self.entries()?
            .get(key)
            .ok_or_else(|| CodecError::not_found(key))
    }

    /// Returns the value stored under `key`, or `fallback` if it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::NotLoaded`] if the store is not loaded.
    pub fn get_or(&self, key: &str, fallback: impl Into<Value>) -> CodecResult<Value> {
        Ok(self
            .entries()?
            .get(key)
            .cloned()
            .unwrap_or_else(|| fallback.into()))
    }

    /// Returns whether `key` is present. Always false when not loaded.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.entries().is_ok_and(|entries| entries.contains_key(key))
    }

    /// Removes `key` if present. Removing an absent key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::NotLoaded`] if the store is not loaded.
    pub fn delete(&mut self, key: &str) -> CodecResult<()> {
        self.entries_mut()?.remove(key);
        Ok(())
    }

    /// Removes every entry, loading an empty store if none was loaded.
    pub fn clear(&mut self) {
        self.ensure_loaded().clear();
    }

    /// Returns the number of entries, including the save timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::NotLoaded`] if the store is not loaded.
    pub fn count(&self) -> CodecResult<usize> {
        Ok(self.entries()?.len())
    }

    /// Iterates over entries in key order. Yields nothing when not loaded.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.entries()
            .ok()
            .into_iter()
            .flatten()
            .map(|(key, value)| (key.as_str(), value))
    }

    /// Returns whether the store holds anything besides the save timestamp.
    pub(crate) fn has_user_entries(&self) -> bool {
        self.iter().any(|(key, _)| key != DATE_KEY)
    }

    /// Overwrites the save timestamp, bypassing the reserved-key check.
    pub(crate) fn stamp_date(&mut self, value: Value) -> CodecResult<()> {
        self.entries_mut()?.insert(DATE_KEY.to_string(), value);
        Ok(())
    }

    /// Inserts a decoded entry, returning the value it replaced.
    ///
    /// Decoded payloads carry their own timestamp row, so the reserved-key
    /// check does not apply.
    pub(crate) fn insert_decoded(&mut self, key: String, value: Value) -> Option<Value> {
        self.ensure_loaded().insert(key, value)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
