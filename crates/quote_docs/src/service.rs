//! Quote document service shared by export and live preview
//!
//! Both paths resolve the template the same way and go through
//! [`DocumentService::render_html`], so a preview shows exactly what an export
//! produces.

use std::path::PathBuf;

use quote_model::QuoteDocument;
use serde::Serialize;
use template_engine::{Diagnostic, Template};

use crate::default_template::DefaultTemplate;
use crate::error::{DocumentError, Result};
use crate::settings::DocumentSettings;
use crate::sink::{DocumentRenderer, ExportRequest, PreviewFrame};
use crate::template_store::TemplateStore;

/// Where a resolved template came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TemplateOrigin {
    /// The company's saved template
    Custom,
    /// A shipped default
    Default { version: u32 },
}

/// Template text ready to compile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTemplate {
    pub origin: TemplateOrigin,
    pub source: String,
}

/// Outcome of an export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReceipt {
    pub origin: TemplateOrigin,
    pub path: PathBuf,
}

/// What a template references, for the settings form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateReport {
    /// Names from `{{name}}` and `{{#if name}}` outside loops
    pub variables: Vec<String>,
    /// Names iterated with `{{#each}}`
    pub sections: Vec<String>,
    /// Referenced names the quote context never binds
    pub unknown: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Renders quote documents for one data directory's settings and templates
pub struct DocumentService<S: TemplateStore> {
    store: S,
    settings: DocumentSettings,
}

impl<S: TemplateStore> DocumentService<S> {
    pub fn new(store: S, settings: DocumentSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &DocumentSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: DocumentSettings) {
        self.settings = settings;
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Pick the tenant's template: a non-blank custom template, else the
    /// configured default, else [`DocumentError::NoTemplateConfigured`]
    pub fn resolve_template(&self, tenant: &str) -> Result<ResolvedTemplate> {
        if let Some(stored) = self.store.get(tenant)? {
            if !stored.source.trim().is_empty() {
                tracing::debug!(tenant, "using custom quote template");
                return Ok(ResolvedTemplate {
                    origin: TemplateOrigin::Custom,
                    source: stored.source,
                });
            }
        }

        match self.settings.default_template.resolve() {
            Some(DefaultTemplate { version, source }) => {
                tracing::debug!(tenant, version, "using default quote template");
                Ok(ResolvedTemplate {
                    origin: TemplateOrigin::Default { version },
                    source: source.to_string(),
                })
            }
            None => {
                tracing::warn!(tenant, setting = ?self.settings.default_template, "no quote template available");
                Err(DocumentError::NoTemplateConfigured)
            }
        }
    }

    /// Validate the document and compile `template` against it
    pub fn render_html(&self, template: &str, document: &QuoteDocument) -> Result<String> {
        document.validate()?;
        let context = document.to_context_with_currency(&self.settings.currency_symbol);
        Ok(template_engine::compile(template, &context))
    }

    /// Render the tenant's quote and hand it to an export renderer
    pub fn export(
        &self,
        tenant: &str,
        document: &QuoteDocument,
        renderer: &mut dyn DocumentRenderer,
    ) -> Result<ExportReceipt> {
        let template = self.resolve_template(tenant)?;
        let html = self.render_html(&template.source, document)?;
        let request = ExportRequest::new(&document.quote.number, html);
        let path = renderer.render(&request)?;
        tracing::info!(tenant, quote = %document.quote.number, path = %path.display(), "exported quote");
        Ok(ExportReceipt {
            origin: template.origin,
            path,
        })
    }

    /// Render the tenant's current template for the preview frame
    pub fn preview(&self, tenant: &str, document: &QuoteDocument) -> Result<PreviewFrame> {
        let template = self.resolve_template(tenant)?;
        self.preview_source(&template.source, document)
    }

    /// Preview unsaved template text from the settings editor
    pub fn preview_template(&self, source: &str, document: &QuoteDocument) -> Result<PreviewFrame> {
        if source.trim().is_empty() {
            return Err(DocumentError::NoTemplateConfigured);
        }
        self.preview_source(source, document)
    }

    fn preview_source(&self, source: &str, document: &QuoteDocument) -> Result<PreviewFrame> {
        let html = self.render_html(source, document)?;
        Ok(PreviewFrame::new(html, self.settings.sandbox_tokens()))
    }

    /// Save a custom template for the tenant; blank text clears it
    pub fn save_template(&mut self, tenant: &str, source: &str) -> Result<()> {
        if source.trim().is_empty() {
            self.store.remove(tenant)?;
        } else {
            let parsed = Template::parse(source);
            for diagnostic in parsed.diagnostics() {
                tracing::warn!(tenant, "saving template with malformed directive: {}", diagnostic);
            }
            self.store.put(tenant, source)?;
        }
        Ok(())
    }

    /// Describe what a template references
    pub fn inspect_template(&self, source: &str) -> TemplateReport {
        let parsed = Template::parse(source);
        let variables = parsed.variables();
        let sections = parsed.sections();

        let unknown = variables
            .iter()
            .filter(|name| {
                !quote_model::CONTEXT_FIELDS.contains(&name.as_str())
                    && !quote_model::ITEM_FIELDS.contains(&name.as_str())
            })
            .chain(
                sections
                    .iter()
                    .filter(|name| name.as_str() != quote_model::ITEMS_KEY),
            )
            .cloned()
            .collect();

        TemplateReport {
            variables,
            sections,
            unknown,
            diagnostics: parsed.diagnostics().to_vec(),
        }
    }
}
