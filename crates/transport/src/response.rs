//! Tolerant GraphQL response envelope.

use serde::Deserialize;

/// A parsed `{data?, errors?}` envelope plus the HTTP status.
///
/// Extensions and unknown members are ignored; `data` stays a raw
/// JSON value since probers inspect it structurally.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlResponse {
    #[serde(skip)]
    pub status: u16,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub errors: Option<Vec<GraphqlError>>,
}

/// A single entry of the GraphQL `errors` list.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlError {
    #[serde(default)]
    pub message: String,
}

impl GraphqlResponse {
    /// True when `data` is present and not JSON null.
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.data.as_ref().is_some_and(|d| !d.is_null())
    }

    /// True when the errors list is present and non-empty.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|e| !e.is_empty())
    }

    /// The error messages, empty when there are none.
    #[must_use]
    pub fn error_messages(&self) -> Vec<String> {
        self.errors
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|e| e.message.clone())
            .collect()
    }

    /// Renders `GraphQL Error: <messages joined with "; ">`, or `None`
    /// when the response carries no errors.
    #[must_use]
    pub fn error_string(&self) -> Option<String> {
        if self.has_errors() {
            Some(format!("GraphQL Error: {}", self.error_messages().join("; ")))
        } else {
            None
        }
    }

    /// The value of `data.<field>`, when data is an object containing it.
    #[must_use]
    pub fn field_data(&self, field: &str) -> Option<&serde_json::Value> {
        self.data.as_ref().and_then(|d| d.get(field))
    }
}
