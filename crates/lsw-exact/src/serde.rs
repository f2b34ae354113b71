//! Canonical JSON for hashing and reports, and YAML for plans.
//!
//! Every failure maps onto [`LswError::Serde`] with a stable code.

use std::collections::BTreeMap;

use lsw_core::errors::{ErrorInfo, LswError};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

fn serde_error(code: &str, err: impl ToString) -> LswError {
    LswError::Serde(ErrorInfo::new(code, err.to_string()))
}

/// Rebuilds every object with its keys in sorted order.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> = map
                .into_iter()
                .map(|(key, value)| (key, sort_keys(value)))
                .collect();
            Value::Object(sorted.into_iter().collect::<Map<_, _>>())
        }
        Value::Array(values) => Value::Array(values.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Compact JSON with sorted object keys; equal values give equal bytes.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, LswError> {
    let value = serde_json::to_value(value).map_err(|err| serde_error("json_serialize", err))?;
    serde_json::to_vec(&sort_keys(value)).map_err(|err| serde_error("json_write", err))
}

/// Serializes a plan or report as YAML.
pub fn to_yaml_string<T: Serialize>(value: &T) -> Result<String, LswError> {
    serde_yaml::to_string(value).map_err(|err| serde_error("yaml_serialize", err))
}

/// Parses YAML into the requested type.
pub fn from_yaml_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, LswError> {
    serde_yaml::from_slice(data).map_err(|err| serde_error("yaml_deserialize", err))
}

/// Converts an already parsed YAML document into the requested type.
pub fn from_yaml_value<T: DeserializeOwned>(value: serde_yaml::Value) -> Result<T, LswError> {
    serde_yaml::from_value(value).map_err(|err| serde_error("yaml_deserialize", err))
}
