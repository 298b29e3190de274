//! Convert command implementation.

use savekv_codec::DATE_KEY;
use savekv_core::{Config, Prefs, SaveReport};
use savekv_storage::FileBackend;
use tracing::{info, warn};

/// Runs the convert command.
pub fn run(
    backend: FileBackend,
    source_config: Config,
    target_config: Config,
    source: &str,
    dest: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("Converting save {source:?} to {dest:?}");
    let report = convert(backend, source_config, target_config, source, dest)?;
    println!(
        "Wrote {:?} ({} entries skipped)",
        report.name,
        report.diagnostics.len()
    );
    Ok(())
}

/// Reads `source` in one format and writes its entries to `dest` in another.
///
/// The destination gets a fresh timestamp.
pub fn convert(
    backend: FileBackend,
    source_config: Config,
    target_config: Config,
    source: &str,
    dest: &str,
) -> Result<SaveReport, Box<dyn std::error::Error>> {
    let (reader, report) = super::open_existing(backend.clone(), source_config, source)?;
    let dropped = report.dropped_rows();
    if dropped > 0 {
        warn!("{dropped} rows of {source:?} could not be read and are not converted");
    }

    let mut writer = Prefs::open(backend, target_config)?;
    writer.store_mut().clear();
    for (key, value) in reader.store().iter().filter(|(key, _)| *key != DATE_KEY) {
        writer.store_mut().set(key, value.clone())?;
    }
    Ok(writer.save_as(dest)?)
}
