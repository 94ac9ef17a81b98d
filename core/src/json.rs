//! Decoding response bodies and reading typed values out of them.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ApiError;

/// A decoded top-level JSON object.
pub type JsonObject = Map<String, Value>;

/// Read `key` as a `T`.
///
/// Returns `None` when the key is absent or its value does not deserialize
/// as `T`; `read::<i64>` on `"0"` (a string) is `None`, not `Some(0)`.
pub fn read<T: DeserializeOwned>(object: &JsonObject, key: &str) -> Option<T> {
    let value = object.get(key)?;
    T::deserialize(value).ok()
}

/// Read `key` as a `T`, falling back to `default`.
pub fn read_or<T: DeserializeOwned>(object: &JsonObject, key: &str, default: T) -> T {
    read(object, key).unwrap_or(default)
}

/// Decode a body into a JSON object.
///
/// Bytes that are not JSON at all are a `ParseFailure`. Valid JSON whose top
/// level is not an object (a string, number, array, ...) decodes to an empty
/// object.
pub fn decode_object(bytes: &[u8]) -> Result<JsonObject, ApiError> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| ApiError::ParseFailure(e.to_string()))?;
    match value {
        Value::Object(object) => Ok(object),
        _ => Ok(JsonObject::new()),
    }
}

/// Deserialize a whole object into `T`, reporting mismatches as `ParseFailure`.
pub fn from_object<T: DeserializeOwned>(object: JsonObject) -> Result<T, ApiError> {
    serde_json::from_value(Value::Object(object)).map_err(|e| ApiError::ParseFailure(e.to_string()))
}
