//! Canonical JSON used as the signing preimage
//!
//! Object keys are sorted lexicographically at every depth and the output
//! carries no insignificant whitespace. Two documents with the same content
//! always produce the same bytes regardless of how their keys were ordered.

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use crate::Result;

/// Return a copy of `value` with object keys sorted recursively
pub fn sort_keys(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::Object(map) => {
            let mut entries: Vec<(&String, &JsonValue)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            let mut sorted = Map::new();
            for (key, inner) in entries {
                sorted.insert(key.clone(), sort_keys(inner));
            }
            JsonValue::Object(sorted)
        }
        JsonValue::Array(items) => JsonValue::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

/// Serialize `doc` to compact, key-sorted JSON bytes
pub fn canonical_json<T: Serialize + ?Sized>(doc: &T) -> Result<Vec<u8>> {
    let value = serde_json::to_value(doc)?;
    Ok(serde_json::to_vec(&sort_keys(&value))?)
}
