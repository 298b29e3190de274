//! Inspect command implementation.

use savekv_core::{Config, Diagnostic};
use savekv_storage::FileBackend;
use serde::Serialize;
use tracing::info;

/// Save inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Save name.
    pub name: String,
    /// File path.
    pub path: String,
    /// Save format.
    pub format: &'static str,
    /// File size in bytes.
    pub size: u64,
    /// UNIX time of the last save, if the payload records one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<u64>,
    /// Entries in key order, excluding the timestamp.
    pub entries: Vec<EntryView>,
    /// Number of rows dropped while decoding.
    pub dropped_rows: usize,
    /// Rows dropped or replaced while decoding.
    pub diagnostics: Vec<Diagnostic>,
}

/// One entry of a save.
#[derive(Debug, Serialize)]
pub struct EntryView {
    /// Entry key.
    pub key: String,
    /// Kind tag.
    pub kind: &'static str,
    /// Value text as written to the save.
    pub value: String,
}

/// Runs the inspect command.
pub fn run(
    backend: FileBackend,
    config: Config,
    name: &str,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("Inspecting save {name:?} in {:?}", backend.root());
    let result = inspect(backend, config, name)?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print_text_output(&result);
        }
    }

    Ok(())
}

/// Loads a save and collects what it holds.
pub fn inspect(
    backend: FileBackend,
    config: Config,
    name: &str,
) -> Result<InspectResult, Box<dyn std::error::Error>> {
    let path = backend.path_for(name)?;
    let size = std::fs::metadata(&path).map_or(0, |meta| meta.len());
    let format = match config.format {
        savekv_core::Format::Binary => "binary",
        savekv_core::Format::Text(_) => "text",
    };

    let (prefs, report) = super::open_existing(backend, config, name)?;
    let saved_at = prefs.date_of(name).ok().map(super::unix_secs);

    let entries = prefs
        .store()
        .iter()
        .filter(|(key, _)| *key != savekv_codec::DATE_KEY)
        .map(|(key, value)| EntryView {
            key: key.to_string(),
            kind: value.tag(),
            value: value.to_string(),
        })
        .collect();

    Ok(InspectResult {
        name: name.to_string(),
        path: path.display().to_string(),
        format,
        size,
        saved_at,
        entries,
        dropped_rows: report.dropped_rows(),
        diagnostics: report.diagnostics,
    })
}

fn print_text_output(result: &InspectResult) {
    println!("SaveKV Save Inspection");
    println!("======================");
    println!();
    println!("Save:   {}", result.name);
    println!("Path:   {}", result.path);
    println!("Format: {}", result.format);
    println!("Size:   {} bytes", result.size);
    match result.saved_at {
        Some(secs) => println!("Saved:  {secs} (UNIX seconds)"),
        None => println!("Saved:  unknown"),
    }
    println!();
    println!("Entries ({}):", result.entries.len());
    let width = result.entries.iter().map(|e| e.key.len()).max().unwrap_or(0);
    for entry in &result.entries {
        println!(
            "  {:<width$}  {:<7}  {}",
            entry.key, entry.kind, entry.value
        );
    }

    if !result.diagnostics.is_empty() {
        println!();
        println!(
            "Diagnostics ({}, {} rows dropped):",
            result.diagnostics.len(),
            result.dropped_rows
        );
        for diagnostic in &result.diagnostics {
            println!("  {diagnostic}");
        }
    }
}
