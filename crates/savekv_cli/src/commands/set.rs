//! Set command implementation.

use savekv_core::{Config, Prefs, SaveReport, ValueKind};
use savekv_storage::FileBackend;
use tracing::info;

/// Runs the set command.
pub fn run(
    backend: FileBackend,
    config: Config,
    name: &str,
    key: &str,
    kind: &str,
    raw: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("Setting {key:?} in save {name:?}");
    let report = set(backend, config, name, key, kind, raw)?;
    println!("Saved {:?} ({kind} {key} = {raw})", report.name);
    Ok(())
}

/// Parses `raw` as a `kind` value, stores it under `key` and saves.
///
/// A save that does not exist yet is created.
pub fn set(
    backend: FileBackend,
    config: Config,
    name: &str,
    key: &str,
    kind: &str,
    raw: &str,
) -> Result<SaveReport, Box<dyn std::error::Error>> {
    let kind: ValueKind = kind.parse()?;
    let value = kind.parse(raw)?;

    let mut prefs = Prefs::open(backend, config)?;
    prefs.load(name)?;
    prefs.store_mut().set(key, value)?;
    Ok(prefs.save()?)
}
