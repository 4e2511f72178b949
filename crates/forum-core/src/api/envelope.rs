//! The server's response wrapper.
//!
//! Every response body has the shape `{ "code": .., "message": .., "data": .. }`.
//! Successful calls only care about `data`; failed calls expose the whole
//! body as the error descriptor.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Error descriptor carried by a failed response.
///
/// The shape is up to the server, so the body is kept as raw JSON. `code` and
/// `message` are read from it only when present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorBody(Value);

impl ErrorBody {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn with_message(code: i64, message: impl Into<String>) -> Self {
        Self(json!({ "code": code, "message": message.into() }))
    }

    /// `code` field as sent, number or string.
    pub fn code(&self) -> Option<&Value> {
        self.0.get("code").filter(|c| !c.is_null())
    }

    pub fn message(&self) -> Option<&str> {
        self.0.get("message").and_then(Value::as_str)
    }

    pub fn raw(&self) -> &Value {
        &self.0
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(message) = self.message() {
            return f.write_str(message);
        }
        match (self.code(), &self.0) {
            (Some(Value::String(code)), _) => write!(f, "error code {}", code),
            (Some(code), _) => write!(f, "error code {}", code),
            (None, Value::String(text)) => f.write_str(text),
            (None, other) => write!(f, "{}", other),
        }
    }
}

/// Take the payload out of a successful body.
///
/// A body that is empty, not JSON, or has no `data` field yields `Null`.
pub fn unwrap_payload(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(mut fields)) => fields.remove("data").unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

/// Read the error descriptor out of a failed body.
///
/// Any non-null JSON body counts; empty or non-JSON bodies have none.
pub fn error_descriptor(body: &str) -> Option<ErrorBody> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Null) | Err(_) => None,
        Ok(value) => Some(ErrorBody(value)),
    }
}
