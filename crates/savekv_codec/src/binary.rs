//! Binary tabular codec.
//!
//! A store is written as a table of `rows × 3` text cells, one row per entry
//! holding `[type tag, key, formatted value]`:
//!
//! ```text
//! i32 LE  row count
//! i32 LE  column count (always 3)
//! cells   row-major; each is a 7-bit variable-length byte count
//!         followed by that many UTF-8 bytes
//! ```
//!
//! This matches what .NET's `BinaryWriter` produces for `Write(int)` and
//! `Write(string)`, so existing save files stay readable.
//!
//! The save timestamp is stored as a `float` row.

use crate::diagnostic::Location;
use crate::error::{CodecError, CodecResult};
use crate::rows::RowSink;
use crate::store::{Store, DATE_KEY};
use crate::value::Value;
use crate::{Codec, Decoded, Encoded};
use bytes::{Buf, BufMut};

/// Number of columns in every table.
pub const COLUMNS: i32 = 3;

/// Header size: row count (4) + column count (4).
const HEADER_SIZE: usize = 8;

/// A 32-bit length needs at most five 7-bit groups.
const MAX_PREFIX_BYTES: usize = 5;

/// Encoder/decoder for the binary table format.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryCodec;

impl BinaryCodec {
    /// Creates the codec.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Stamps the save timestamp and encodes the store.
    ///
    /// A store with nothing besides the timestamp yields
    /// [`SaveOutcome::Delete`](crate::SaveOutcome::Delete) and is left
    /// unstamped.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::NotLoaded`] if the store is not loaded.
    pub fn encode_bytes(&self, store: &mut Store, unix_secs: u64) -> CodecResult<Encoded<Vec<u8>>> {
        store.count()?;
        if !store.has_user_entries() {
            return Ok(Encoded::delete());
        }

        #[allow(clippy::cast_precision_loss)]
        let stamp = unix_secs as f32;
        store.stamp_date(Value::Float(stamp))?;

        let row_count = i32::try_from(store.count()?)
            .map_err(|_| CodecError::malformed_framing("too many entries for one table"))?;

        let mut buf = Vec::with_capacity(HEADER_SIZE + store.count()? * 24);
        write_header(&mut buf, row_count);
        for (key, value) in store.iter() {
            // The in-memory float cannot hold every second; persist the exact value.
            let formatted = if key == DATE_KEY {
                unix_secs.to_string()
            } else {
                value.to_string()
            };
            write_cell(&mut buf, value.tag());
            write_cell(&mut buf, key);
            write_cell(&mut buf, &formatted);
        }

        Ok(Encoded::write(buf, Vec::new()))
    }

    /// Decodes a binary table.
    ///
    /// # Errors
    ///
    /// - [`CodecError::MalformedFraming`] if the declared shape does not match
    ///   the bytes available
    /// - [`CodecError::InvalidUtf8`] if a cell is not UTF-8
    pub fn decode_bytes(&self, bytes: &[u8]) -> CodecResult<Decoded> {
        let mut input = bytes;

        if input.remaining() < HEADER_SIZE {
            return Err(CodecError::malformed_framing(format!(
                "header needs {HEADER_SIZE} bytes, found {}",
                input.remaining()
            )));
        }
        let rows = input.get_i32_le();
        let columns = input.get_i32_le();

        let rows = usize::try_from(rows)
            .map_err(|_| CodecError::malformed_framing(format!("negative row count {rows}")))?;
        if columns != COLUMNS {
            return Err(CodecError::malformed_framing(format!(
                "expected {COLUMNS} columns, found {columns}"
            )));
        }
        // Every cell takes at least its one-byte length prefix.
        let cells = rows.saturating_mul(COLUMNS as usize);
        if cells > input.remaining() {
            return Err(CodecError::malformed_framing(format!(
                "{rows} rows declared but only {} bytes follow the header",
                input.remaining()
            )));
        }

        let mut sink = RowSink::new();
        for row in 0..rows {
            let tag = read_cell(&mut input, row)?;
            let key = read_cell(&mut input, row)?;
            let raw = read_cell(&mut input, row)?;
            sink.apply(Location::Row(row), tag, key, raw);
        }

        if input.has_remaining() {
            return Err(CodecError::malformed_framing(format!(
                "{} trailing bytes after {rows} rows",
                input.remaining()
            )));
        }

        Ok(sink.finish())
    }
}

impl Codec for BinaryCodec {
    fn name(&self) -> &'static str {
        "binary"
    }

    fn encode_at(&self, store: &mut Store, unix_secs: u64) -> CodecResult<Encoded<Vec<u8>>> {
        self.encode_bytes(store, unix_secs)
    }

    fn decode(&self, payload: &[u8]) -> CodecResult<Decoded> {
        self.decode_bytes(payload)
    }
}

fn write_header(buf: &mut Vec<u8>, rows: i32) {
    buf.put_i32_le(rows);
    buf.put_i32_le(COLUMNS);
}

#[allow(clippy::cast_possible_truncation)]
fn write_cell(buf: &mut Vec<u8>, text: &str) {
    let mut len = text.len();
    while len >= 0x80 {
        buf.put_u8((len as u8 & 0x7f) | 0x80);
        len >>= 7;
    }
    buf.put_u8(len as u8);
    buf.put_slice(text.as_bytes());
}

fn read_prefix(input: &mut &[u8], row: usize) -> CodecResult<usize> {
    let mut len = 0usize;
    for group in 0..MAX_PREFIX_BYTES {
        if !input.has_remaining() {
            return Err(CodecError::malformed_framing(format!(
                "row {row}: truncated cell length"
            )));
        }
        let byte = input.get_u8();
        len |= usize::from(byte & 0x7f) << (7 * group);
        if byte & 0x80 == 0 {
            return Ok(len);
        }
    }
    Err(CodecError::malformed_framing(format!(
        "row {row}: cell length prefix exceeds {MAX_PREFIX_BYTES} bytes"
    )))
}

fn read_cell<'a>(input: &mut &'a [u8], row: usize) -> CodecResult<&'a str> {
    let len = read_prefix(input, row)?;
    if len > input.len() {
        return Err(CodecError::malformed_framing(format!(
            "row {row}: cell of {len} bytes but only {} remain",
            input.len()
        )));
    }
    let (cell, rest) = input.split_at(len);
    *input = rest;
    std::str::from_utf8(cell).map_err(|_| CodecError::InvalidUtf8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticKind;
    use crate::value::{Vector2, Vector3};
    use crate::SaveOutcome;

    const NOW: u64 = 1_700_000_000;

    fn table(rows: &[[&str; 3]]) -> Vec<u8> {
        let mut buf = Vec::new();
        write_header(&mut buf, rows.len() as i32);
        for row in rows {
            for cell in row {
                write_cell(&mut buf, cell);
            }
        }
        buf
    }

    fn encode(store: &mut Store) -> Vec<u8> {
        match BinaryCodec::new().encode_bytes(store, NOW).unwrap().outcome {
            SaveOutcome::Write(bytes) => bytes,
            SaveOutcome::Delete => panic!("expected a payload"),
        }
    }

    #[test]
    fn encode_exact_bytes() {
        let mut store = Store::new();
        store.set("a", 1).unwrap();

        let mut expected = vec![2, 0, 0, 0, 3, 0, 0, 0];
        expected.extend_from_slice(b"\x03int\x01a\x011");
        expected.extend_from_slice(b"\x05float\x04date\x0a1700000000");
        assert_eq!(encode(&mut store), expected);
    }

    #[test]
    fn encode_stamps_date_as_float() {
        let mut store = Store::new();
        store.set("a", 1).unwrap();
        encode(&mut store);

        #[allow(clippy::cast_precision_loss)]
        let expected = NOW as f32;
        assert_eq!(store.get(DATE_KEY).unwrap(), &Value::Float(expected));
    }

    #[test]
    fn empty_store_signals_delete() {
        let mut store = Store::new();
        let encoded = BinaryCodec::new().encode_bytes(&mut store, NOW).unwrap();
        assert_eq!(encoded.outcome, SaveOutcome::Delete);
        assert!(!store.has(DATE_KEY));
    }

    #[test]
    fn timestamp_only_store_signals_delete() {
        let mut store = Store::new();
        store.stamp_date(Value::Float(5.0)).unwrap();
        let encoded = BinaryCodec::new().encode_bytes(&mut store, NOW).unwrap();
        assert!(encoded.outcome.is_delete());
    }

    #[test]
    fn encode_requires_loaded_store() {
        let mut store = Store::not_loaded();
        assert_eq!(
            BinaryCodec::new().encode_bytes(&mut store, NOW),
            Err(CodecError::NotLoaded)
        );
    }

    #[test]
    fn roundtrip_all_kinds() {
        let mut store = Store::new();
        store.set("flag", true).unwrap();
        store.set("lives", -3).unwrap();
        store.set("volume", 0.1f32).unwrap();
        store.set("name", "Ada, \"the\" first\nline two").unwrap();
        store.set("spawn", Vector2::new(1.5, -2.0)).unwrap();
        store.set("camera", Vector3::new(0.0, 10.0, -0.25)).unwrap();

        let decoded = BinaryCodec::new().decode_bytes(&encode(&mut store)).unwrap();
        assert!(decoded.diagnostics.is_empty());
        assert_eq!(decoded.store, store);
    }

    #[test]
    fn long_cells_use_multibyte_prefix() {
        let long = "x".repeat(300);
        let mut store = Store::new();
        store.set("long", long.as_str()).unwrap();

        let bytes = encode(&mut store);
        // 300 = 0b10_0101100 -> 0xAC 0x02
        let needle = [0xAC, 0x02, b'x'];
        assert!(bytes.windows(3).any(|w| w == needle));

        let decoded = BinaryCodec::new().decode_bytes(&bytes).unwrap();
        assert_eq!(decoded.store.get("long").unwrap().as_str(), Some(long.as_str()));
    }

    #[test]
    fn duplicate_key_last_wins() {
        let bytes = table(&[
            ["int", "score", "1"],
            ["string", "score", "late"],
            ["int", "score", "3"],
        ]);
        let decoded = BinaryCodec::new().decode_bytes(&bytes).unwrap();

        assert_eq!(decoded.store.count().unwrap(), 1);
        assert_eq!(decoded.store.get("score").unwrap(), &Value::Int(3));
        let kinds: Vec<_> = decoded.diagnostics.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![DiagnosticKind::DuplicateKey, DiagnosticKind::DuplicateKey]
        );
    }

    #[test]
    fn corrupt_vector_row_is_skipped() {
        let bytes = table(&[
            ["vector2", "origin", "1.0"],
            ["bool", "ok", "true"],
        ]);
        let decoded = BinaryCodec::new().decode_bytes(&bytes).unwrap();

        assert!(!decoded.store.has("origin"));
        assert!(decoded.store.has("ok"));
        assert_eq!(decoded.diagnostics.len(), 1);
        let diagnostic = &decoded.diagnostics[0];
        assert_eq!(diagnostic.kind, DiagnosticKind::UnparsableField);
        assert_eq!(diagnostic.location, Location::Row(0));
        assert_eq!(diagnostic.key.as_deref(), Some("origin"));
    }

    #[test]
    fn unparsable_scalars_are_skipped() {
        let bytes = table(&[
            ["bool", "b", "TRUE"],
            ["int", "i", "12.5"],
            ["float", "f", "fast"],
            ["vector3", "v", "1,2,x"],
        ]);
        let decoded = BinaryCodec::new().decode_bytes(&bytes).unwrap();
        assert_eq!(decoded.store.count().unwrap(), 0);
        assert_eq!(decoded.diagnostics.len(), 4);
        assert!(decoded
            .diagnostics
            .iter()
            .all(|d| d.kind == DiagnosticKind::UnparsableField));
    }

    #[test]
    fn unknown_tags_are_diagnosed() {
        let bytes = table(&[
            ["unknown", "mystery", "unparsable"],
            ["color", "tint", "red"],
            ["int", "kept", "1"],
        ]);
        let decoded = BinaryCodec::new().decode_bytes(&bytes).unwrap();

        assert_eq!(decoded.store.count().unwrap(), 1);
        assert_eq!(decoded.diagnostics[0].kind, DiagnosticKind::UnencodableValue);
        assert_eq!(decoded.diagnostics[1].kind, DiagnosticKind::UnknownType);
    }

    #[test]
    fn empty_key_row_is_skipped() {
        let bytes = table(&[["int", "", "1"]]);
        let decoded = BinaryCodec::new().decode_bytes(&bytes).unwrap();
        assert_eq!(decoded.store.count().unwrap(), 0);
        assert_eq!(decoded.diagnostics[0].kind, DiagnosticKind::MalformedRow);
    }

    #[test]
    fn empty_table_decodes_to_empty_store() {
        let decoded = BinaryCodec::new().decode_bytes(&table(&[])).unwrap();
        assert!(decoded.store.is_loaded());
        assert_eq!(decoded.store.count().unwrap(), 0);
    }

    #[test]
    fn reject_truncated_header() {
        assert!(matches!(
            BinaryCodec::new().decode_bytes(&[1, 0, 0]),
            Err(CodecError::MalformedFraming { .. })
        ));
    }

    #[test]
    fn reject_negative_rows() {
        let mut bytes = Vec::new();
        bytes.put_i32_le(-1);
        bytes.put_i32_le(3);
        assert!(matches!(
            BinaryCodec::new().decode_bytes(&bytes),
            Err(CodecError::MalformedFraming { .. })
        ));
    }

    #[test]
    fn reject_wrong_column_count() {
        let mut bytes = Vec::new();
        bytes.put_i32_le(0);
        bytes.put_i32_le(2);
        assert!(matches!(
            BinaryCodec::new().decode_bytes(&bytes),
            Err(CodecError::MalformedFraming { .. })
        ));
    }

    #[test]
    fn reject_rows_beyond_data() {
        let mut bytes = table(&[["int", "a", "1"]]);
        bytes[0] = 200;
        assert!(matches!(
            BinaryCodec::new().decode_bytes(&bytes),
            Err(CodecError::MalformedFraming { .. })
        ));
    }

    #[test]
    fn reject_truncated_cell() {
        let mut bytes = table(&[["string", "a", "hello"]]);
        bytes.truncate(bytes.len() - 2);
        assert!(matches!(
            BinaryCodec::new().decode_bytes(&bytes),
            Err(CodecError::MalformedFraming { .. })
        ));
    }

    #[test]
    fn reject_trailing_bytes() {
        let mut bytes = table(&[["int", "a", "1"]]);
        bytes.push(0);
        assert!(matches!(
            BinaryCodec::new().decode_bytes(&bytes),
            Err(CodecError::MalformedFraming { .. })
        ));
    }

    #[test]
    fn reject_overlong_prefix() {
        let mut bytes = Vec::new();
        write_header(&mut bytes, 1);
        bytes.extend_from_slice(&[0xff; 6]);
        assert!(matches!(
            BinaryCodec::new().decode_bytes(&bytes),
            Err(CodecError::MalformedFraming { .. })
        ));
    }

    #[test]
    fn reject_invalid_utf8() {
        let mut bytes = Vec::new();
        write_header(&mut bytes, 1);
        bytes.extend_from_slice(&[2, 0xff, 0xfe, 1, b'a', 1, b'1']);
        assert_eq!(
            BinaryCodec::new().decode_bytes(&bytes),
            Err(CodecError::InvalidUtf8)
        );
    }
}
