//! The request/response envelope shared with the server.

use std::collections::BTreeMap;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use super::CommandError;

/// Wire value the server uses for a successful status.
const SUCCESS_STATUS: &str = "SUCCESS";

/// One server operation: a URI plus string parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub uri: String,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

impl Request {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            params: BTreeMap::new(),
        }
    }

    /// Add a parameter. Consumes the request so it is fixed once handed off.
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Success,
    /// Any non-success status; the raw wire value is kept for logs.
    Failure(String),
}

impl From<String> for Status {
    fn from(raw: String) -> Self {
        if raw == SUCCESS_STATUS {
            Status::Success
        } else {
            Status::Failure(raw)
        }
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        match status {
            Status::Success => SUCCESS_STATUS.to_string(),
            Status::Failure(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub status: Status,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Value,
}

impl Response {
    pub fn success(data: Value) -> Self {
        Self {
            status: Status::Success,
            message: None,
            data,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: Status::Failure("FAIL".to_string()),
            message: Some(message.into()),
            data: Value::Null,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Success is decided by the status alone, never by the presence of data.
    pub fn is_success(&self) -> bool {
        matches!(self.status, Status::Success)
    }

    /// Payload of a successful response, or the server's message as an error.
    pub fn into_data(self) -> Result<Value, CommandError> {
        if self.is_success() {
            Ok(self.data)
        } else {
            let message = self
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "Request failed".to_string());
            Err(CommandError::Server(message))
        }
    }
}

/// Decode a list payload. `null` is a valid empty result.
pub fn decode_list<T: DeserializeOwned>(data: Value) -> Result<Vec<T>, CommandError> {
    match data {
        Value::Null => Ok(Vec::new()),
        Value::Array(_) => serde_json::from_value(data)
            .map_err(|e| CommandError::MalformedPayload(e.to_string())),
        other => Err(CommandError::MalformedPayload(format!(
            "expected a list, got {}",
            value_kind(&other)
        ))),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
