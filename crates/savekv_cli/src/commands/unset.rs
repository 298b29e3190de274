//! Unset command implementation.

use savekv_core::{Config, SaveReport};
use savekv_storage::FileBackend;
use tracing::info;

/// Runs the unset command.
pub fn run(
    backend: FileBackend,
    config: Config,
    name: &str,
    key: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("Removing {key:?} from save {name:?}");
    let report = unset(backend, config, name, key)?;
    if report.deleted {
        println!("Save {name:?} is now empty and was removed");
    } else {
        println!("Saved {name:?}");
    }
    Ok(())
}

/// Removes `key` from an existing save and saves.
pub fn unset(
    backend: FileBackend,
    config: Config,
    name: &str,
    key: &str,
) -> Result<SaveReport, Box<dyn std::error::Error>> {
    let (mut prefs, _) = super::open_existing(backend, config, name)?;
    if !prefs.store().has(key) {
        return Err(format!("No entry {key:?} in save {name:?}").into());
    }
    prefs.store_mut().delete(key)?;
    Ok(prefs.save()?)
}
