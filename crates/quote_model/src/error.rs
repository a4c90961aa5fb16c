//! Error types for quote records

use thiserror::Error;

/// A single failed validation rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Path of the offending field, e.g. `quote.items[2].width`
    pub field: String,
    /// Human-readable description
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Errors that can occur while loading or validating a quote
#[derive(Debug, Error)]
pub enum ModelError {
    /// Error parsing JSON data
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The record failed one or more validation rules
    #[error("Invalid quote: {}", join_violations(.0))]
    Invalid(Vec<Violation>),
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for quote model operations
pub type Result<T> = std::result::Result<T, ModelError>;
