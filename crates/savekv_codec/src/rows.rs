//! Row dispatch shared by both decoders.

use crate::diagnostic::{Diagnostic, DiagnosticKind, Location};
use crate::store::Store;
use crate::value::{ValueKind, UNKNOWN_TAG};
use crate::Decoded;

/// Collects decoded rows into a fresh store, recording diagnostics for rows
/// that cannot be used.
pub(crate) struct RowSink {
    store: Store,
    diagnostics: Vec<Diagnostic>,
}

impl RowSink {
    pub(crate) fn new() -> Self {
        Self {
            store: Store::new(),
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Applies one `[tag, key, value]` row.
    ///
    /// `raw` must already have any format-level escaping removed.
    pub(crate) fn apply(&mut self, location: Location, tag: &str, key: &str, raw: &str) {
        if key.is_empty() {
            self.push(Diagnostic::new(
                DiagnosticKind::MalformedRow,
                location,
                None,
                "row has an empty key",
            ));
            return;
        }

        let kind = match ValueKind::from_tag(tag) {
            Some(kind) => kind,
            None if tag == UNKNOWN_TAG => {
                self.push(Diagnostic::new(
                    DiagnosticKind::UnencodableValue,
                    location,
                    Some(key),
                    "value could not be encoded when the payload was written",
                ));
                return;
            }
            None => {
                self.push(Diagnostic::new(
                    DiagnosticKind::UnknownType,
                    location,
                    Some(key),
                    format!("unknown type tag {tag:?}"),
                ));
                return;
            }
        };

        let value = match kind.parse(raw) {
            Ok(value) => value,
            Err(err) => {
                self.push(Diagnostic::new(
                    DiagnosticKind::UnparsableField,
                    location,
                    Some(key),
                    err.to_string(),
                ));
                return;
            }
        };

        if self.store.insert_decoded(key.to_string(), value).is_some() {
            self.push(Diagnostic::new(
                DiagnosticKind::DuplicateKey,
                location,
                Some(key),
                "duplicate key, keeping the later value",
            ));
        }
    }

    pub(crate) fn finish(self) -> Decoded {
        Decoded {
            store: self.store,
            diagnostics: self.diagnostics,
        }
    }
}
