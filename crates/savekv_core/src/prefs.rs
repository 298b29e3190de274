//! Save slot facade.

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use savekv_codec::{payload_date, store_date, Codec, Diagnostic, SaveOutcome, Store};
use savekv_storage::{validate_name, SaveBackend};
use std::time::SystemTime;
use tracing::{debug, info, warn};

/// What happened when a slot was loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// Slot name.
    pub name: String,
    /// Whether a payload existed. A missing slot loads as an empty store.
    pub existed: bool,
    /// Rows that were dropped or replaced while decoding.
    pub diagnostics: Vec<Diagnostic>,
}

impl LoadReport {
    /// Number of rows that were dropped while decoding.
    ///
    /// Duplicate keys are diagnosed but not counted: the value of the last
    /// duplicate is kept.
    #[must_use]
    pub fn dropped_rows(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.kind.skips_row())
            .count()
    }
}

/// What happened when a slot was saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    /// Slot name.
    pub name: String,
    /// Whether the store was empty and the slot was removed instead.
    pub deleted: bool,
    /// Entries that could not be encoded.
    pub diagnostics: Vec<Diagnostic>,
}

/// A typed key-value store bound to named save slots.
///
/// `Prefs` owns one live [`Store`], the codec for the configured format and
/// the backend that holds the payloads. It starts out not loaded: reading or
/// writing entries fails until a slot is loaded.
///
/// # Example
///
/// ```rust
/// use savekv_core::{Config, Prefs};
/// use savekv_storage::InMemoryBackend;
///
/// let mut prefs = Prefs::open(InMemoryBackend::new(), Config::default()).unwrap();
/// prefs.load("profile").unwrap();
/// prefs.store_mut().set("volume", 0.75f32).unwrap();
/// prefs.save().unwrap();
///
/// let report = prefs.load("profile").unwrap();
/// assert!(report.existed);
/// assert_eq!(prefs.store().get("volume").unwrap().as_float(), Some(0.75));
/// ```
pub struct Prefs<B: SaveBackend> {
    backend: B,
    codec: Box<dyn Codec + Send + Sync>,
    config: Config,
    store: Store,
    current_save: Option<String>,
}

impl<B: SaveBackend> Prefs<B> {
    /// Opens save slots in `backend` using the configured format.
    ///
    /// # Errors
    ///
    /// Returns an error if the format configuration is invalid.
    pub fn open(backend: B, config: Config) -> CoreResult<Self> {
        let codec = config.format.codec()?;
        Ok(Self {
            backend,
            codec,
            config,
            store: Store::not_loaded(),
            current_save: None,
        })
    }

    /// Loads a slot, replacing the live store.
    ///
    /// A slot that was never saved loads as an empty store. If the payload
    /// cannot be decoded at all, the live store and current slot are left
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid, the backend fails, or the
    /// payload is unreadable.
    pub fn load(&mut self, name: &str) -> CoreResult<LoadReport> {
        let (store, diagnostics, existed) = match self.backend.read(name)? {
            Some(payload) => {
                let decoded = self.codec.decode(&payload)?;
                for diagnostic in &decoded.diagnostics {
                    warn!(save = name, kind = ?diagnostic.kind, "{diagnostic}");
                }
                (decoded.store, decoded.diagnostics, true)
            }
            None => {
                debug!(save = name, "no saved payload, starting empty");
                (Store::new(), Vec::new(), false)
            }
        };

        self.store = store;
        self.current_save = Some(name.to_string());
        debug!(
            save = name,
            format = self.codec.name(),
            entries = self.store.count()?,
            "loaded save"
        );

        Ok(LoadReport {
            name: name.to_string(),
            existed,
            diagnostics,
        })
    }

    /// Loads the configured default slot.
    ///
    /// # Errors
    ///
    /// See [`Prefs::load`].
    pub fn load_default(&mut self) -> CoreResult<LoadReport> {
        let name = self.config.default_save_name.clone();
        self.load(&name)
    }

    /// Saves the live store to the current slot.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NoCurrentSave`] if nothing was loaded or saved yet
    /// - any error from [`Prefs::save_as`]
    pub fn save(&mut self) -> CoreResult<SaveReport> {
        let name = self.current_save.clone().ok_or(CoreError::NoCurrentSave)?;
        self.save_as(&name)
    }

    /// Saves the live store to `name` and makes it the current slot.
    ///
    /// The store is stamped with the current time once the payload has been
    /// written. A store with no entries besides that timestamp is not
    /// written: the slot is removed instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is not loaded, the name is invalid, or
    /// the backend fails. On error the live store and current slot are left
    /// unchanged.
    pub fn save_as(&mut self, name: &str) -> CoreResult<SaveReport> {
        validate_name(name)?;
        let mut staged = self.store.clone();
        let encoded = self.codec.encode(&mut staged)?;
        for diagnostic in &encoded.diagnostics {
            warn!(save = name, kind = ?diagnostic.kind, "{diagnostic}");
        }

        let deleted = match encoded.outcome {
            SaveOutcome::Write(payload) => {
                self.backend.write(name, &payload)?;
                info!(
                    save = name,
                    format = self.codec.name(),
                    bytes = payload.len(),
                    "saved"
                );
                false
            }
            SaveOutcome::Delete => {
                let removed = self.backend.remove(name)?;
                info!(save = name, removed, "store is empty, removed save");
                true
            }
        };

        self.store = staged;
        self.current_save = Some(name.to_string());
        Ok(SaveReport {
            name: name.to_string(),
            deleted,
            diagnostics: encoded.diagnostics,
        })
    }

    /// Removes every entry from the live store.
    ///
    /// Nothing is persisted until the next save, which then removes the slot.
    pub fn delete_all(&mut self) {
        self.store.clear();
        info!(save = self.current_save.as_deref(), "cleared all entries");
    }

    /// Returns when the live store was last saved, or now if never.
    #[must_use]
    pub fn date(&self) -> SystemTime {
        store_date(&self.store)
    }

    /// Returns when slot `name` was last saved, without loading it.
    ///
    /// # Errors
    ///
    /// - [`CoreError::SaveNotFound`] if the slot does not exist
    /// - a codec error if the payload is unreadable or has no timestamp
    pub fn date_of(&self, name: &str) -> CoreResult<SystemTime> {
        let payload = self
            .backend
            .read(name)?
            .ok_or_else(|| CoreError::SaveNotFound {
                name: name.to_string(),
            })?;
        Ok(payload_date(self.codec.as_ref(), &payload)?)
    }

    /// Lists the saved slots.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn list_saves(&self) -> CoreResult<Vec<String>> {
        Ok(self.backend.list()?)
    }

    /// Returns the live store.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Returns the live store for modification.
    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    /// Returns the slot that `save` writes to.
    #[must_use]
    pub fn current_save(&self) -> Option<&str> {
        self.current_save.as_deref()
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Consumes the facade, returning the backend.
    pub fn into_backend(self) -> B {
        self.backend
    }
}

impl<B: SaveBackend + std::fmt::Debug> std::fmt::Debug for Prefs<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Prefs")
            .field("backend", &self.backend)
            .field("format", &self.codec.name())
            .field("current_save", &self.current_save)
            .field("store", &self.store)
            .finish()
    }
}
