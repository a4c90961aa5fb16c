//! Error types for building binding contexts

use thiserror::Error;

/// Errors raised while converting external data into a [`Context`](crate::Context).
///
/// Compiling a template never fails; only the boundary conversion does.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Error parsing JSON data
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The root of the context document was not an object
    #[error("Context root must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// A top-level field held a value that cannot be bound
    #[error("Unsupported value for field '{field}': {kind}")]
    UnsupportedValue {
        field: String,
        kind: &'static str,
    },

    /// An entry of a list was not an object
    #[error("List '{list}' item {index} must be an object, got {kind}")]
    InvalidListItem {
        list: String,
        index: usize,
        kind: &'static str,
    },

    /// A list item field held an array or object
    #[error("List '{list}' item {index} field '{field}' must be a scalar")]
    NestedValue {
        list: String,
        index: usize,
        field: String,
    },
}

/// Result type for template operations
pub type Result<T> = std::result::Result<T, TemplateError>;
