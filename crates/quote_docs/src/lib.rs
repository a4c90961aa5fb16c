//! Quote Documents
//!
//! Turns a quote into final markup for the two places quotes are shown: the
//! export path, which hands markup to a document renderer, and the settings
//! live preview, which shows it in a sandboxed frame.
//!
//! This crate provides:
//! - Versioned default templates shipped with the application
//! - Per-company custom template storage (in memory or on disk)
//! - Document settings persistence
//! - Template resolution and the shared render path

mod default_template;
mod error;
mod service;
mod settings;
mod sink;
mod template_store;

pub use default_template::DefaultTemplate;
pub use error::{DocumentError, RenderContext, Result};
pub use service::{DocumentService, ExportReceipt, ResolvedTemplate, TemplateOrigin, TemplateReport};
pub use settings::{DefaultTemplateSetting, DocumentSettings, SettingsManager};
pub use sink::{DocumentRenderer, ExportRequest, HtmlFileRenderer, PreviewFrame};
pub use template_store::{FileTemplateStore, MemoryTemplateStore, StoredTemplate, TemplateStore};
