//! # SaveKV Core
//!
//! Named save slots for the SaveKV store.
//!
//! This crate provides:
//! - [`Prefs`], a live [`Store`] bound to a codec and a save backend
//! - [`Config`] for choosing the save format and default slot
//! - Load and save reports carrying the codec diagnostics
//!
//! Row-level problems found while loading or saving are logged with
//! `tracing` at `warn` level and returned in the reports.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod prefs;

pub use config::{Config, Format, DEFAULT_SAVE_NAME};
pub use error::{CoreError, CoreResult};
pub use prefs::{LoadReport, Prefs, SaveReport};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use savekv_codec::{Diagnostic, DiagnosticKind, Store, TextConfig, Value, ValueKind};
