//! The `{code, message, data}` wrapper around every response body.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::types::Todo;

/// Response envelope. `code == 0` means the operation succeeded and `data`
/// is authoritative; any other code is a business failure described by
/// `message`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = Value> {
    pub code: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        self.code == 0
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

impl Envelope<Value> {
    /// Convert the payload into `T`. A missing or `null` payload stays `None`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<Envelope<T>, ApiError> {
        let data = match self.data {
            None | Some(Value::Null) => None,
            Some(value) => Some(
                serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))?,
            ),
        };
        Ok(Envelope {
            code: self.code,
            message: self.message,
            data,
        })
    }
}

/// Body of a 409 answer to a write carrying a stale `version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionConflict {
    pub code: i64,
    pub message: String,
    pub current_version: u32,
    pub provided_version: u32,
    /// The record as currently stored, for merge/overwrite prompts.
    #[serde(default)]
    pub latest_data: Option<Todo>,
}
