//! SaveKV CLI
//!
//! Command-line tools for inspecting and editing SaveKV save files.
//!
//! # Commands
//!
//! - `inspect` - Display the entries of a save
//! - `date` - Show when a save was last written
//! - `set` - Set one entry and save
//! - `unset` - Remove one entry and save
//! - `convert` - Rewrite a save in the other format

mod commands;

use clap::{Parser, Subcommand};
use savekv_core::{Config, TextConfig};
use savekv_storage::{FileBackend, DEFAULT_EXTENSION};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// SaveKV command-line save file tools.
#[derive(Parser)]
#[command(name = "savekv")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the save files
    #[arg(global = true, short, long, default_value = ".")]
    dir: PathBuf,

    /// Save file extension, including the dot
    #[arg(global = true, short, long, default_value = DEFAULT_EXTENSION)]
    ext: String,

    /// Read and write the text format instead of binary
    #[arg(global = true, short, long)]
    text: bool,

    /// Field delimiter for the text format (implies --text)
    #[arg(global = true, long)]
    delimiter: Option<char>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display the entries of a save
    Inspect {
        /// Save name
        name: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show when a save was last written
    Date {
        /// Save name
        name: String,
    },

    /// Set one entry and save
    Set {
        /// Save name
        name: String,
        /// Entry key
        key: String,
        /// Value kind (bool, int, float, string, vector2, vector3)
        kind: String,
        /// Value text, e.g. `true`, `42`, `0.5` or `1,-2.5`
        value: String,
    },

    /// Remove one entry and save
    Unset {
        /// Save name
        name: String,
        /// Entry key
        key: String,
    },

    /// Rewrite a save in another format
    Convert {
        /// Source save name
        source: String,
        /// Destination save name
        dest: String,

        /// Destination format (binary, text)
        #[arg(long)]
        to: String,
    },

    /// Show version information
    Version,
}

impl Cli {
    fn text_config(&self) -> TextConfig {
        let config = TextConfig::new();
        match self.delimiter {
            Some(delimiter) => config.delimiter(delimiter),
            None => config,
        }
    }

    fn config(&self) -> Config {
        if self.text || self.delimiter.is_some() {
            Config::new().text(self.text_config())
        } else {
            Config::new()
        }
    }

    fn backend(&self) -> FileBackend {
        FileBackend::with_extension(&self.dir, self.ext.clone())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = cli.config();
    match &cli.command {
        Commands::Inspect { name, format } => {
            commands::inspect::run(cli.backend(), config, name, format)?;
        }
        Commands::Date { name } => {
            commands::date::run(cli.backend(), config, name)?;
        }
        Commands::Set {
            name,
            key,
            kind,
            value,
        } => {
            commands::set::run(cli.backend(), config, name, key, kind, value)?;
        }
        Commands::Unset { name, key } => {
            commands::unset::run(cli.backend(), config, name, key)?;
        }
        Commands::Convert { source, dest, to } => {
            let target = match to.as_str() {
                "binary" => Config::new(),
                "text" => Config::new().text(cli.text_config()),
                other => {
                    return Err(format!("Unknown format {other:?}, expected binary or text").into())
                }
            };
            commands::convert::run(cli.backend(), config, target, source, dest)?;
        }
        Commands::Version => {
            println!("SaveKV CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("SaveKV Core v{}", savekv_core::VERSION);
        }
    }

    Ok(())
}
