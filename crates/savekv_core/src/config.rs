//! Save slot configuration.

use crate::error::CoreResult;
use savekv_codec::{BinaryCodec, Codec, TextCodec, TextConfig};

/// Default name of the slot used by [`Prefs::load_default`](crate::Prefs::load_default).
pub const DEFAULT_SAVE_NAME: &str = "game";

/// Which save format to read and write.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Format {
    /// Length-prefixed binary table.
    #[default]
    Binary,
    /// Delimited text lines.
    Text(TextConfig),
}

impl Format {
    /// Builds the codec for this format.
    ///
    /// # Errors
    ///
    /// Returns an error if the text configuration is invalid.
    pub fn codec(&self) -> CoreResult<Box<dyn Codec + Send + Sync>> {
        Ok(match self {
            Format::Binary => Box::new(BinaryCodec::new()),
            Format::Text(config) => Box::new(TextCodec::new(config.clone())?),
        })
    }
}

/// Configuration for opening save slots.
#[derive(Debug, Clone)]
pub struct Config {
    /// Save format.
    pub format: Format,

    /// Slot loaded by `load_default`.
    pub default_save_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: Format::Binary,
            default_save_name: DEFAULT_SAVE_NAME.to_string(),
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the save format.
    #[must_use]
    pub fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Uses the text format with the given configuration.
    #[must_use]
    pub fn text(self, config: TextConfig) -> Self {
        self.format(Format::Text(config))
    }

    /// Sets the default slot name.
    #[must_use]
    pub fn default_save_name(mut self, name: impl Into<String>) -> Self {
        self.default_save_name = name.into();
        self
    }
}
