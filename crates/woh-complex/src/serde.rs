//! Encoders for persisted records, reports and configuration files.
//!
//! Errors carry the encoding and the Rust type involved, so a rejected store record
//! can be traced to its schema.

use std::any::type_name;

use serde::{de::DeserializeOwned, Serialize};
use woh_core::errors::{ErrorInfo, WohError};

fn codec_error<T: ?Sized>(code: &str, encoding: &str, err: impl ToString) -> WohError {
    WohError::Serde(
        ErrorInfo::new(code, err.to_string())
            .with_context("encoding", encoding)
            .with_context("type", type_name::<T>()),
    )
}

/// JSON with object keys in sorted order.
///
/// Going through `serde_json::Value` sorts the keys, so equal values always produce
/// equal bytes.
pub fn to_canonical_json_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, WohError> {
    serde_json::to_value(value)
        .and_then(|tree| serde_json::to_vec(&tree))
        .map_err(|err| codec_error::<T>("json-encode", "json", err))
}

/// Decodes JSON bytes.
pub fn from_json_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, WohError> {
    serde_json::from_slice(bytes).map_err(|err| codec_error::<T>("json-decode", "json", err))
}

/// Decodes a YAML document.
pub fn from_yaml_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, WohError> {
    serde_yaml::from_slice(bytes).map_err(|err| codec_error::<T>("yaml-decode", "yaml", err))
}

/// Compact `bincode` bytes.
pub fn to_bincode_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, WohError> {
    bincode::serialize(value).map_err(|err| codec_error::<T>("bincode-encode", "bincode", err))
}

/// Decodes `bincode` bytes.
pub fn from_bincode_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, WohError> {
    bincode::deserialize(bytes).map_err(|err| codec_error::<T>("bincode-decode", "bincode", err))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn json_keys_are_sorted() {
        let mut map = HashMap::new();
        map.insert("zeta", 1);
        map.insert("alpha", 2);
        let bytes = to_canonical_json_bytes(&map).unwrap();
        assert_eq!(bytes, br#"{"alpha":2,"zeta":1}"#);
    }

    #[test]
    fn decode_errors_name_the_type() {
        let err = from_json_slice::<Vec<u32>>(b"{").unwrap_err();
        assert_eq!(err.info().code, "json-decode");
        assert!(err.info().context["type"].contains("Vec<u32>"));
    }
}
