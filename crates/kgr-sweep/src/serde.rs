//! Deterministic encodings shared by the sweep and launch crates.

use kgr_core::errors::KgrError;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Recursively sorts object keys.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, sort_keys(value)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        scalar => scalar,
    }
}

/// Compact JSON with object keys in lexicographic order.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, KgrError> {
    let value = serde_json::to_value(value).map_err(|err| KgrError::schema("json_serialize", err))?;
    serde_json::to_vec(&sort_keys(value)).map_err(|err| KgrError::schema("json_write", err))
}

/// Hex SHA-256 of the canonical JSON form of `value`.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, KgrError> {
    let digest = Sha256::digest(to_canonical_json_bytes(value)?);
    Ok(format!("{digest:x}"))
}

pub fn to_yaml_string<T: Serialize>(value: &T) -> Result<String, KgrError> {
    serde_yaml::to_string(value).map_err(|err| KgrError::schema("yaml_serialize", err))
}

pub fn from_yaml_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, KgrError> {
    serde_yaml::from_slice(data).map_err(|err| KgrError::schema("yaml_deserialize", err))
}
