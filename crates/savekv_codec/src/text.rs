//! Delimited text codec.
//!
//! Each entry becomes one `\n`-terminated record of three fields joined by a
//! single delimiter character:
//!
//! ```text
//! # optional start comment
//! float¦volume¦0.75
//! vector2¦origin¦1,-2.5
//! int¦date¦1700000000
//!
//! # optional end comment
//! ```
//!
//! Backslashes and newlines inside keys and values are escaped as `\\` and
//! `\n`. The save timestamp is always the last record and is stored as an
//! `int`.

use crate::diagnostic::{Diagnostic, DiagnosticKind, Location};
use crate::error::{CodecError, CodecResult};
use crate::rows::RowSink;
use crate::store::{Store, DATE_KEY};
use crate::value::{Value, ValueKind};
use crate::{Codec, Decoded, Encoded};
use std::borrow::Cow;

/// Default field delimiter (U+00A6 BROKEN BAR).
pub const DEFAULT_DELIMITER: char = '\u{a6}';

/// Characters that can never be used as a delimiter.
const FORBIDDEN_DELIMITERS: [char; 4] = ['\n', '\r', '\\', ','];

/// Configuration for the text codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextConfig {
    /// Field delimiter.
    pub delimiter: char,

    /// Comment written before the first record.
    pub start_comment: Option<String>,

    /// Comment written after the last record, separated by a blank line.
    pub end_comment: Option<String>,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            start_comment: None,
            end_comment: None,
        }
    }
}

impl TextConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets the start comment.
    #[must_use]
    pub fn start_comment(mut self, comment: impl Into<String>) -> Self {
        self.start_comment = Some(comment.into());
        self
    }

    /// Sets the end comment.
    #[must_use]
    pub fn end_comment(mut self, comment: impl Into<String>) -> Self {
        self.end_comment = Some(comment.into());
        self
    }

    /// Checks that the delimiter can be used.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidDelimiter`] for newlines, backslash
    /// (used for escaping), comma (used inside vectors) and ASCII letters or
    /// digits, which occur in type tags and the timestamp line.
    pub fn validate(&self) -> CodecResult<()> {
        if FORBIDDEN_DELIMITERS.contains(&self.delimiter)
            || self.delimiter.is_ascii_alphanumeric()
        {
            return Err(CodecError::InvalidDelimiter {
                delimiter: self.delimiter,
            });
        }
        Ok(())
    }
}

/// Encoder/decoder for the delimited text format.
#[derive(Debug, Clone, Default)]
pub struct TextCodec {
    config: TextConfig,
}

impl TextCodec {
    /// Creates a codec with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidDelimiter`] if the delimiter is unusable.
    pub fn new(config: TextConfig) -> CodecResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &TextConfig {
        &self.config
    }

    /// Stamps the save timestamp and encodes the store.
    ///
    /// Entries whose key or value contains the delimiter cannot be
    /// represented; they are left out and reported as
    /// [`DiagnosticKind::SkippedEntry`].
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::NotLoaded`] if the store is not loaded.
    pub fn encode_str(&self, store: &mut Store, unix_secs: u64) -> CodecResult<Encoded<String>> {
        store.count()?;
        if !store.has_user_entries() {
            return Ok(Encoded::delete());
        }

        let date = i32::try_from(unix_secs).unwrap_or(i32::MAX);
        store.stamp_date(Value::Int(date))?;

        let delim = self.config.delimiter;
        let mut lines = Vec::with_capacity(store.count()? + 2);
        let mut diagnostics = Vec::new();

        if let Some(comment) = non_empty(&self.config.start_comment) {
            lines.extend(comment_lines(comment));
        }

        for (key, value) in store.iter() {
            if key == DATE_KEY {
                continue;
            }
            let formatted = value.to_string();
            let (key_text, value_text) = (escape(key), escape(&formatted));
            if key_text.contains(delim) || value_text.contains(delim) {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::SkippedEntry,
                    Location::Entry,
                    Some(key),
                    format!("key or value contains the delimiter {delim:?}"),
                ));
                continue;
            }
            lines.push(format!("{}{delim}{key_text}{delim}{value_text}", value.tag()));
        }

        lines.push(format!(
            "{}{delim}{DATE_KEY}{delim}{date}",
            ValueKind::Int.tag()
        ));

        let mut text = lines.join("\n");
        if let Some(comment) = non_empty(&self.config.end_comment) {
            text.push_str("\n\n");
            text.push_str(&comment_lines(comment).collect::<Vec<_>>().join("\n"));
        }

        Ok(Encoded::write(text, diagnostics))
    }

    /// Decodes a text payload.
    ///
    /// Text decoding has no fatal failure modes: every problem is confined
    /// to one line and reported as a diagnostic.
    #[must_use]
    pub fn decode_str(&self, text: &str) -> Decoded {
        let delim = self.config.delimiter;
        let mut sink = RowSink::new();

        for (index, line) in text.split('\n').enumerate() {
            let location = Location::Line(index + 1);
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split(delim).collect();
            let [tag, key, raw] = fields.as_slice() else {
                sink.push(Diagnostic::new(
                    DiagnosticKind::MalformedRow,
                    location,
                    None,
                    format!(
                        "expected 3 fields separated by {delim:?}, found {}",
                        fields.len()
                    ),
                ));
                continue;
            };

            let key = unescape(key);
            let raw = if *tag == ValueKind::String.tag() {
                unescape(raw)
            } else {
                Cow::Borrowed(*raw)
            };
            sink.apply(location, tag, &key, &raw);
        }

        sink.finish()
    }
}

impl Codec for TextCodec {
    fn name(&self) -> &'static str {
        "text"
    }

    fn encode_at(&self, store: &mut Store, unix_secs: u64) -> CodecResult<Encoded<Vec<u8>>> {
        Ok(self.encode_str(store, unix_secs)?.map(String::into_bytes))
    }

    fn decode(&self, payload: &[u8]) -> CodecResult<Decoded> {
        let text = std::str::from_utf8(payload).map_err(|_| CodecError::InvalidUtf8)?;
        Ok(self.decode_str(text))
    }
}

fn non_empty(comment: &Option<String>) -> Option<&str> {
    comment.as_deref().filter(|c| !c.is_empty())
}

fn comment_lines(comment: &str) -> impl Iterator<Item = String> + '_ {
    comment.lines().map(|line| format!("# {line}"))
}

fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['\\', '\n']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 4);
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

fn unescape(text: &str) -> Cow<'_, str> {
    if !text.contains('\\') {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('\\') => out.push('\\'),
            // Unknown escapes are kept as written.
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    Cow::Owned(out)
}
