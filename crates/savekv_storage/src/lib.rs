//! # SaveKV Storage
//!
//! Save slot backends for SaveKV.
//!
//! Backends are **opaque named byte slots**: they read, write and remove
//! whole payloads and never interpret them. Encoding lives in
//! `savekv_codec`.
//!
//! ## Available Backends
//!
//! - [`InMemoryBackend`] - For testing and ephemeral saves
//! - [`FileBackend`] - One file per slot inside a save directory
//!
//! ## Example
//!
//! ```rust
//! use savekv_storage::{SaveBackend, InMemoryBackend};
//!
//! let mut backend = InMemoryBackend::new();
//! backend.write("game", b"payload").unwrap();
//! assert_eq!(backend.read("game").unwrap().as_deref(), Some(&b"payload"[..]));
//! assert!(backend.remove("game").unwrap());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::{validate_name, SaveBackend};
pub use error::{StorageError, StorageResult};
pub use file::{FileBackend, DEFAULT_EXTENSION};
pub use memory::InMemoryBackend;
