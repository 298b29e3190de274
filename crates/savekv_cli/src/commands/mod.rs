//! CLI command implementations.

pub mod convert;
pub mod date;
pub mod inspect;
pub mod set;
pub mod unset;

use savekv_core::{Config, LoadReport, Prefs};
use savekv_storage::{FileBackend, SaveBackend};
use std::time::{SystemTime, UNIX_EPOCH};

/// Loads `name`, failing if the save does not exist.
fn open_existing(
    backend: FileBackend,
    config: Config,
    name: &str,
) -> Result<(Prefs<FileBackend>, LoadReport), Box<dyn std::error::Error>> {
    if !backend.exists(name)? {
        return Err(format!("No save named {name:?} in {:?}", backend.root()).into());
    }
    let mut prefs = Prefs::open(backend, config)?;
    let report = prefs.load(name)?;
    Ok((prefs, report))
}

/// Whole seconds since the UNIX epoch.
fn unix_secs(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}
