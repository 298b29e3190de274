//! Non-fatal observations made while encoding or decoding.

use serde::Serialize;
use std::fmt;

/// What kind of problem a [`Diagnostic`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A key appeared more than once; the later row replaced the earlier one.
    DuplicateKey,
    /// A row's value text could not be parsed as its declared kind.
    UnparsableField,
    /// A row's type tag names no known kind.
    UnknownType,
    /// A row is tagged `unknown`: its writer could not encode the value.
    UnencodableValue,
    /// A row or line does not have the expected shape.
    MalformedRow,
    /// An entry was left out of an encoded payload.
    SkippedEntry,
}

impl DiagnosticKind {
    /// Returns whether the diagnosed row was dropped.
    #[must_use]
    pub const fn skips_row(self) -> bool {
        !matches!(self, DiagnosticKind::DuplicateKey)
    }
}

/// Where in a payload a diagnostic was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "at", content = "index")]
pub enum Location {
    /// Zero-based row of a binary table.
    Row(usize),
    /// One-based line of a text payload.
    Line(usize),
    /// An in-memory entry, during encoding.
    Entry,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Row(row) => write!(f, "row {row}"),
            Location::Line(line) => write!(f, "line {line}"),
            Location::Entry => f.write_str("entry"),
        }
    }
}

/// A recoverable problem found while processing one row or entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Problem category.
    pub kind: DiagnosticKind,
    /// Where it was found.
    pub location: Location,
    /// The affected key, when the row got far enough to have one.
    pub key: Option<String>,
    /// Human-readable detail.
    pub message: String,
}

impl Diagnostic {
    /// Creates a diagnostic.
    pub fn new(
        kind: DiagnosticKind,
        location: Location,
        key: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            location,
            key: key.map(str::to_string),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(f, "{} (key {key:?}): {}", self.location, self.message),
            None => write!(f, "{}: {}", self.location, self.message),
        }
    }
}
