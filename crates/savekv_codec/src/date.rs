//! Reading the save timestamp back out of a store or payload.

use crate::error::{CodecError, CodecResult};
use crate::store::{Store, DATE_KEY};
use crate::value::Value;
use crate::Codec;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Returns the current UNIX time in whole seconds.
#[must_use]
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}

/// Returns when a live store was last saved.
///
/// A store that has never been saved has no timestamp; the current time is
/// returned instead.
#[must_use]
pub fn store_date(store: &Store) -> SystemTime {
    store
        .get(DATE_KEY)
        .ok()
        .and_then(timestamp)
        .unwrap_or_else(SystemTime::now)
}

/// Returns when a persisted payload was saved.
///
/// # Errors
///
/// - Any fatal decode error from `codec`
/// - [`CodecError::NotFound`] if the payload has no usable timestamp row
pub fn payload_date(codec: &dyn Codec, payload: &[u8]) -> CodecResult<SystemTime> {
    let decoded = codec.decode(payload)?;
    decoded
        .store
        .get(DATE_KEY)
        .ok()
        .and_then(timestamp)
        .ok_or_else(|| CodecError::not_found(DATE_KEY))
}

/// The binary codec stores the timestamp as a float, the text codec as an int.
///
/// Values that are negative or not representable as a `SystemTime` are
/// treated as missing.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn timestamp(value: &Value) -> Option<SystemTime> {
    let secs = match value {
        Value::Int(secs) => u64::try_from(*secs).ok()?,
        Value::Float(secs) if secs.is_finite() && *secs >= 0.0 => *secs as u64,
        _ => return None,
    };
    UNIX_EPOCH.checked_add(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BinaryCodec, TextCodec};

    fn secs(time: SystemTime) -> u64 {
        time.duration_since(UNIX_EPOCH).unwrap().as_secs()
    }

    #[test]
    fn unsaved_store_falls_back_to_now() {
        let before = unix_now();
        let date = secs(store_date(&Store::new()));
        assert!(date >= before && date <= unix_now());
    }

    #[test]
    fn store_with_int_timestamp() {
        let mut store = Store::new();
        store.stamp_date(Value::Int(86_400)).unwrap();
        assert_eq!(secs(store_date(&store)), 86_400);
    }

    #[test]
    fn store_with_float_timestamp_truncates() {
        let mut store = Store::new();
        store.stamp_date(Value::Float(1_024.75)).unwrap();
        assert_eq!(secs(store_date(&store)), 1_024);
    }

    #[test]
    fn negative_timestamp_falls_back_to_now() {
        let mut store = Store::new();
        store.stamp_date(Value::Int(-5)).unwrap();
        assert!(secs(store_date(&store)) > 0);
    }

    #[test]
    fn payload_date_from_binary() {
        let mut store = Store::new();
        store.set("a", 1).unwrap();
        let codec = BinaryCodec::new();
        let bytes = codec.encode_at(&mut store, 1_000).unwrap();
        let bytes = bytes.outcome.into_payload().unwrap();
        assert_eq!(secs(payload_date(&codec, &bytes).unwrap()), 1_000);
    }

    #[test]
    fn payload_date_from_text() {
        let mut store = Store::new();
        store.set("a", 1).unwrap();
        let codec = TextCodec::default();
        let bytes = codec.encode_at(&mut store, 1_234_567).unwrap();
        let bytes = bytes.outcome.into_payload().unwrap();
        assert_eq!(secs(payload_date(&codec, &bytes).unwrap()), 1_234_567);
    }

    #[test]
    fn payload_without_date_is_not_found() {
        let codec = TextCodec::default();
        assert_eq!(
            payload_date(&codec, "int\u{a6}a\u{a6}1".as_bytes()),
            Err(CodecError::not_found(DATE_KEY))
        );
    }

    fn binary_table_with_date(raw: &str) -> Vec<u8> {
        let mut bytes = vec![1, 0, 0, 0, 3, 0, 0, 0];
        for cell in ["float", DATE_KEY, raw] {
            bytes.push(u8::try_from(cell.len()).unwrap());
            bytes.extend_from_slice(cell.as_bytes());
        }
        bytes
    }

    #[test]
    fn out_of_range_payload_date_is_not_found() {
        let codec = BinaryCodec::new();
        let bytes = binary_table_with_date("1e30");
        assert_eq!(
            payload_date(&codec, &bytes),
            Err(CodecError::not_found(DATE_KEY))
        );
    }

    #[test]
    fn out_of_range_store_date_falls_back_to_now() {
        let decoded = BinaryCodec::new()
            .decode_bytes(&binary_table_with_date("1e30"))
            .unwrap();
        assert!(decoded.diagnostics.is_empty());

        let before = unix_now();
        let date = secs(store_date(&decoded.store));
        assert!(date >= before && date <= unix_now());
    }

    #[test]
    fn payload_framing_errors_propagate() {
        assert!(matches!(
            payload_date(&BinaryCodec::new(), &[0, 0]),
            Err(CodecError::MalformedFraming { .. })
        ));
    }
}
