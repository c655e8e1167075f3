//! GraphQL-over-HTTP wire types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A GraphQL request: a query document plus its variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub variables: Value,
}

impl GraphQlRequest {
    pub fn new(query: impl Into<String>, variables: Value) -> Self {
        Self {
            query: query.into(),
            variables,
        }
    }
}

/// A GraphQL error entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

impl GraphQlError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
            extensions: None,
        }
    }
}

impl std::fmt::Display for GraphQlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// A GraphQL response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<GraphQlError>>,
}

impl GraphQlResponse {
    /// Build a successful response around `data`.
    pub fn ok(data: Value) -> Self {
        Self {
            data: Some(data),
            errors: None,
        }
    }

    /// Returns `true` if the response carries data and no errors.
    pub fn is_ok(&self) -> bool {
        self.data.is_some() && self.errors.as_ref().map_or(true, Vec::is_empty)
    }

    /// Return the data payload, or the reported errors.
    ///
    /// A response with both data and errors is treated as failed.
    pub fn into_data(self) -> Result<Value, Vec<GraphQlError>> {
        match self.errors {
            Some(errors) if !errors.is_empty() => Err(errors),
            _ => Ok(self.data.unwrap_or(Value::Null)),
        }
    }
}
