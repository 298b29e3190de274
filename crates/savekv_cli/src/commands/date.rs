//! Date command implementation.

use savekv_core::{Config, Prefs};
use savekv_storage::FileBackend;
use tracing::info;

/// Runs the date command.
pub fn run(
    backend: FileBackend,
    config: Config,
    name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("Reading save date of {name:?} in {:?}", backend.root());
    let prefs = Prefs::open(backend, config)?;
    let secs = super::unix_secs(prefs.date_of(name)?);
    println!("{secs}");
    Ok(())
}
