use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CollectionError, Result};

// ---------------------------------------------------------------------------
// Envelope: canonical `{ "data": ... }` response wrapper
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Unwrap the `data` payload of a raw response.
    ///
    /// Fails with [`CollectionError::MalformedEnvelope`] when the response is
    /// not an object carrying `data`, and with [`CollectionError::Decode`]
    /// when `data` does not have the expected shape.
    pub fn from_value(value: Value) -> Result<T> {
        match value {
            Value::Object(mut map) => match map.remove("data") {
                Some(data) => Ok(serde_json::from_value(data)?),
                None => Err(CollectionError::MalformedEnvelope(
                    "response has no `data` field".into(),
                )),
            },
            other => Err(CollectionError::MalformedEnvelope(format!(
                "expected an object, got {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Pull the bearer token out of a login response.
///
/// The backend answers `{ "token": "..." }`; a `{ "data": { "token": "..." } }`
/// envelope is accepted as well.
pub fn login_token(value: &Value) -> Result<String> {
    value
        .get("token")
        .or_else(|| value.get("data").and_then(|d| d.get("token")))
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            CollectionError::MalformedEnvelope("login response carries no token".into())
        })
}
