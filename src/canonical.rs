//! Key-sorted canonical JSON, the form downstream consumers hash.

use crate::err::Result;

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Returns a copy of `value` whose objects have their keys in lexicographic order, at every level.
pub fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));

            let mut sorted = Map::with_capacity(entries.len());
            for (key, child) in entries {
                sorted.insert(key.clone(), sort_keys(child));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

/// Compact, key-sorted text.
pub fn to_canonical_string(value: &Value) -> Result<String> {
    Ok(serde_json::to_string(&sort_keys(value))?)
}

/// Lowercase hex SHA-256 of the canonical text, usable as an entity tag.
pub fn content_hash(value: &Value) -> Result<String> {
    let canonical = to_canonical_string(value)?;
    Ok(format!("{:x}", Sha256::digest(canonical.as_bytes())))
}
