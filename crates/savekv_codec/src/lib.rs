//! # SaveKV Codec
//!
//! Typed key-value store and its two save formats.
//!
//! A [`Store`] maps non-empty keys to [`Value`]s of six kinds: `bool`,
//! `int`, `float`, `string`, `vector2` and `vector3`. Stores are persisted
//! by a [`Codec`]:
//!
//! - [`BinaryCodec`] - a length-prefixed table of `[tag, key, value]` text cells
//! - [`TextCodec`] - one delimited `tag¦key¦value` line per entry
//!
//! Both codecs stamp the reserved `"date"` key with the save time, signal
//! [`SaveOutcome::Delete`] for a store with nothing to save, and decode
//! corruption-tolerantly: a bad row is dropped and reported as a
//! [`Diagnostic`], while only a broken binary frame aborts the decode.
//!
//! This crate performs no I/O and does not log.
//!
//! ## Usage
//!
//! ```
//! use savekv_codec::{Codec, TextCodec, TextConfig, Store, Value, Vector2};
//!
//! let codec = TextCodec::new(TextConfig::new().delimiter('|')).unwrap();
//!
//! let mut store = Store::new();
//! store.set("volume", 0.75f32).unwrap();
//! store.set("origin", Vector2::new(1.0, -2.5)).unwrap();
//!
//! let payload = codec.encode(&mut store).unwrap().outcome.into_payload().unwrap();
//! let decoded = codec.decode(&payload).unwrap();
//!
//! assert!(decoded.diagnostics.is_empty());
//! assert_eq!(decoded.store.get("volume").unwrap(), &Value::Float(0.75));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod binary;
mod date;
mod diagnostic;
mod error;
mod rows;
mod store;
mod text;
mod value;

pub use binary::{BinaryCodec, COLUMNS};
pub use date::{payload_date, store_date, unix_now};
pub use diagnostic::{Diagnostic, DiagnosticKind, Location};
pub use error::{CodecError, CodecResult};
pub use store::{Store, DATE_KEY};
pub use text::{TextCodec, TextConfig, DEFAULT_DELIMITER};
pub use value::{ParseValueError, Value, ValueKind, Vector2, Vector3, UNKNOWN_TAG};

/// A save format.
///
/// Encoding stamps the store's timestamp and produces a payload (or the
/// delete signal); it never performs I/O.
pub trait Codec {
    /// Short name of the format.
    fn name(&self) -> &'static str;

    /// Encodes `store`, stamping it with the given UNIX time.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::NotLoaded`] if the store is not loaded.
    fn encode_at(&self, store: &mut Store, unix_secs: u64) -> CodecResult<Encoded<Vec<u8>>>;

    /// Encodes `store`, stamping it with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::NotLoaded`] if the store is not loaded.
    fn encode(&self, store: &mut Store) -> CodecResult<Encoded<Vec<u8>>> {
        self.encode_at(store, unix_now())
    }

    /// Decodes a payload into a fresh store.
    ///
    /// # Errors
    ///
    /// Returns an error only for problems that make the whole payload
    /// unreadable. Row-level problems are reported in
    /// [`Decoded::diagnostics`].
    fn decode(&self, payload: &[u8]) -> CodecResult<Decoded>;
}

/// What the caller should do with a save target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome<T> {
    /// Write this payload to the target.
    Write(T),
    /// The store is empty: remove any existing target and write nothing.
    Delete,
}

impl<T> SaveOutcome<T> {
    /// Returns whether this is the delete signal.
    #[must_use]
    pub fn is_delete(&self) -> bool {
        matches!(self, SaveOutcome::Delete)
    }

    /// Returns the payload, if any.
    pub fn into_payload(self) -> Option<T> {
        match self {
            SaveOutcome::Write(payload) => Some(payload),
            SaveOutcome::Delete => None,
        }
    }

    /// Maps the payload.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SaveOutcome<U> {
        match self {
            SaveOutcome::Write(payload) => SaveOutcome::Write(f(payload)),
            SaveOutcome::Delete => SaveOutcome::Delete,
        }
    }
}

/// Result of encoding a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded<T> {
    /// Payload or delete signal.
    pub outcome: SaveOutcome<T>,
    /// Entries that were left out of the payload.
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Encoded<T> {
    pub(crate) fn write(payload: T, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            outcome: SaveOutcome::Write(payload),
            diagnostics,
        }
    }

    pub(crate) fn delete() -> Self {
        Self {
            outcome: SaveOutcome::Delete,
            diagnostics: Vec::new(),
        }
    }

    /// Maps the payload, keeping the diagnostics.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Encoded<U> {
        Encoded {
            outcome: self.outcome.map(f),
            diagnostics: self.diagnostics,
        }
    }
}

/// Result of decoding a payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    /// The reconstructed store, always loaded.
    pub store: Store,
    /// Rows that were dropped or replaced, in payload order.
    pub diagnostics: Vec<Diagnostic>,
}
