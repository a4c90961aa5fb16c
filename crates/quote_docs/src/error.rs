//! Error types for quote document operations

use quote_model::ModelError;
use thiserror::Error;

/// Where a rendering request came from, for user-facing messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderContext {
    /// Downloading the quote as a document
    Export,
    /// Previewing a template in the settings form
    SettingsPreview,
}

#[derive(Debug, Error)]
pub enum DocumentError {
    /// Neither a custom nor a default template is available
    #[error("No quote template configured")]
    NoTemplateConfigured,

    #[error(transparent)]
    InvalidQuote(#[from] ModelError),

    /// The external renderer failed to produce the document
    #[error("Render error: {0}")]
    Render(String),

    #[error("Invalid tenant id: {0}")]
    InvalidTenant(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DocumentError {
    /// Message to show the user in the given calling context
    pub fn user_message(&self, context: RenderContext) -> String {
        match (self, context) {
            (DocumentError::NoTemplateConfigured, RenderContext::Export) => {
                "No quote template is configured. Set one up under Settings before exporting.".to_string()
            }
            (DocumentError::NoTemplateConfigured, RenderContext::SettingsPreview) => {
                "The template is empty. Enter a template to see a preview.".to_string()
            }
            (DocumentError::InvalidQuote(err), _) => format!("The quote is incomplete: {}", err),
            (DocumentError::Render(_), RenderContext::Export) => {
                "The quote document could not be generated. Please try again.".to_string()
            }
            (DocumentError::Render(_), RenderContext::SettingsPreview) => {
                "The preview could not be displayed.".to_string()
            }
            (DocumentError::Io(_) | DocumentError::Serialization(_), RenderContext::Export) => {
                "The quote document could not be saved.".to_string()
            }
            (DocumentError::Io(_) | DocumentError::Serialization(_), RenderContext::SettingsPreview) => {
                "The template settings could not be read or saved.".to_string()
            }
            (DocumentError::InvalidTenant(_), _) => "Unknown company account.".to_string(),
        }
    }
}

/// Result type for quote document operations
pub type Result<T> = std::result::Result<T, DocumentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_differ_per_context() {
        let err = DocumentError::NoTemplateConfigured;
        assert_ne!(
            err.user_message(RenderContext::Export),
            err.user_message(RenderContext::SettingsPreview)
        );

        let err = DocumentError::Render("printer offline".into());
        assert_ne!(
            err.user_message(RenderContext::Export),
            err.user_message(RenderContext::SettingsPreview)
        );
    }

    #[test]
    fn test_no_template_display() {
        assert_eq!(DocumentError::NoTemplateConfigured.to_string(), "No quote template configured");
    }
}
