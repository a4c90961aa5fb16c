//! Command handlers for the quote document CLI
//!
//! Each handler returns the text to print. Document errors are turned into
//! the message for the context the command runs in, so export and preview
//! failures read differently.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use quote_docs::{
    DefaultTemplateSetting, DocumentError, HtmlFileRenderer, RenderContext, TemplateOrigin,
};
use quote_model::QuoteDocument;

use crate::state::AppState;

fn user_error(err: DocumentError, context: RenderContext) -> anyhow::Error {
    tracing::error!(?context, "{}", err);
    anyhow::anyhow!(err.user_message(context))
}

fn read_quote(path: &Path, context: RenderContext) -> anyhow::Result<QuoteDocument> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read quote file {}", path.display()))?;
    QuoteDocument::from_json_str(&data).map_err(|e| user_error(e.into(), context))
}

fn read_template(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read template file {}", path.display()))
}

/// Render a quote with the company's template and write the document
pub fn export(state: &AppState, quote_path: &Path, out_dir: Option<PathBuf>) -> anyhow::Result<String> {
    let document = read_quote(quote_path, RenderContext::Export)?;
    let mut renderer = HtmlFileRenderer::new(out_dir.unwrap_or_else(|| state.config.exports_dir()));

    let receipt = state
        .service
        .export(&state.config.tenant, &document, &mut renderer)
        .map_err(|e| user_error(e, RenderContext::Export))?;

    let origin = match receipt.origin {
        TemplateOrigin::Custom => "custom template".to_string(),
        TemplateOrigin::Default { version } => format!("default template v{}", version),
    };
    Ok(format!("Exported {} using {}", receipt.path.display(), origin))
}

/// Render the preview frame, for the saved template or a template file
pub fn preview(state: &AppState, quote_path: &Path, template: Option<&Path>) -> anyhow::Result<String> {
    let document = read_quote(quote_path, RenderContext::SettingsPreview)?;
    let frame = match template {
        Some(path) => {
            let source = read_template(path)?;
            state.service.preview_template(&source, &document)
        }
        None => state.service.preview(&state.config.tenant, &document),
    }
    .map_err(|e| user_error(e, RenderContext::SettingsPreview))?;

    Ok(frame.to_iframe())
}

/// Save a template file as the company's custom template
pub fn set_template(state: &mut AppState, template_path: &Path) -> anyhow::Result<String> {
    let source = read_template(template_path)?;
    let report = state.service.inspect_template(&source);

    let tenant = state.config.tenant.clone();
    state
        .service
        .save_template(&tenant, &source)
        .map_err(|e| user_error(e, RenderContext::SettingsPreview))?;

    let mut lines = vec![format!("Saved custom template for '{}'", tenant)];
    if source.trim().is_empty() {
        lines[0] = format!("Cleared custom template for '{}'", tenant);
    }
    for name in &report.unknown {
        lines.push(format!("warning: '{}' is not a quote field and will render empty", name));
    }
    for diagnostic in &report.diagnostics {
        lines.push(format!("warning: {}", diagnostic));
    }
    Ok(lines.join("\n"))
}

/// Remove the company's custom template so the default applies again
pub fn clear_template(state: &mut AppState) -> anyhow::Result<String> {
    let tenant = state.config.tenant.clone();
    state
        .service
        .save_template(&tenant, "")
        .map_err(|e| user_error(e, RenderContext::SettingsPreview))?;
    Ok(format!("Cleared custom template for '{}'", tenant))
}

/// Report the fields a template references, as JSON
pub fn placeholders(state: &AppState, template: Option<&Path>) -> anyhow::Result<String> {
    let source = match template {
        Some(path) => read_template(path)?,
        None => {
            state
                .service
                .resolve_template(&state.config.tenant)
                .map_err(|e| user_error(e, RenderContext::SettingsPreview))?
                .source
        }
    };
    let report = state.service.inspect_template(&source);
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Choose the shipped fallback: `latest`, `disabled`, or a version number
pub async fn set_default_template(state: &mut AppState, choice: &str) -> anyhow::Result<String> {
    let setting = match choice.trim() {
        "latest" => DefaultTemplateSetting::Latest,
        "disabled" | "none" => DefaultTemplateSetting::Disabled,
        other => {
            let version: u32 = other
                .parse()
                .with_context(|| format!("Expected 'latest', 'disabled' or a version, got '{}'", other))?;
            if (DefaultTemplateSetting::Pinned { version }).resolve().is_none() {
                anyhow::bail!("No default template version {}", version);
            }
            DefaultTemplateSetting::Pinned { version }
        }
    };

    let mut settings = state.settings.get().clone();
    settings.default_template = setting;
    state
        .settings
        .update(settings.clone())
        .await
        .map_err(|e| user_error(e, RenderContext::SettingsPreview))?;
    state.service.set_settings(settings);

    tracing::info!(?setting, "updated default template setting");
    Ok(format!("Default template set to {}", choice.trim()))
}
