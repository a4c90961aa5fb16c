//! End-to-end tests for quote export and preview
//!
//! Export and preview must produce the same markup for the same quote and
//! template, and both must report a missing template the same way.

use std::path::PathBuf;

use chrono::NaiveDate;
use quote_docs::{
    DefaultTemplateSetting, DocumentError, DocumentRenderer, DocumentService, DocumentSettings,
    ExportRequest, FileTemplateStore, HtmlFileRenderer, MemoryTemplateStore, TemplateOrigin,
};
use quote_model::{Client, CommercialTerms, Company, LineItem, PricingType, Quote, QuoteDocument};
use tempfile::TempDir;

/// Renderer that keeps requests in memory
#[derive(Default)]
struct CapturingRenderer {
    requests: Vec<ExportRequest>,
}

impl DocumentRenderer for CapturingRenderer {
    fn render(&mut self, request: &ExportRequest) -> quote_docs::Result<PathBuf> {
        self.requests.push(request.clone());
        Ok(PathBuf::from(&request.file_name))
    }
}

struct FailingRenderer;

impl DocumentRenderer for FailingRenderer {
    fn render(&mut self, _request: &ExportRequest) -> quote_docs::Result<PathBuf> {
        Err(DocumentError::Render("print driver unavailable".into()))
    }
}

fn acme_quote() -> QuoteDocument {
    let quote = Quote::new("ORC-0042", NaiveDate::from_ymd_opt(2024, 5, 10).unwrap())
        .with_item(LineItem::new("Banner", PricingType::Unit, 100.0))
        .with_terms(CommercialTerms {
            payment_terms: "50% upfront".into(),
            ..Default::default()
        });
    QuoteDocument::new(
        Company::new("Acme"),
        Client::new("Maria").with_location("Curitiba", "PR"),
        quote,
    )
}

const CUSTOM_TEMPLATE: &str = "<h1>{{companyName}}</h1>\
{{#each items}}<p>{{productName}} {{subtotal}}</p>{{/each}}\
<p>{{total}}</p>\
{{#if hasTechnicalSpecs}}<footer>specs</footer>{{/if}}";

#[test]
fn export_and_preview_render_identical_markup() {
    let mut service = DocumentService::new(MemoryTemplateStore::new(), DocumentSettings::default());
    service.save_template("acme", CUSTOM_TEMPLATE).unwrap();
    let document = acme_quote();

    let mut renderer = CapturingRenderer::default();
    let receipt = service.export("acme", &document, &mut renderer).unwrap();
    let preview = service.preview("acme", &document).unwrap();

    assert_eq!(receipt.origin, TemplateOrigin::Custom);
    assert_eq!(renderer.requests[0].file_name, "quote-ORC-0042.pdf");
    assert_eq!(renderer.requests[0].html, preview.html);
    assert_eq!(
        preview.html,
        "<h1>Acme</h1><p>Banner R$ 100.00</p><p>R$ 100.00</p>"
    );
}

#[test]
fn default_template_renders_quote() {
    let service = DocumentService::new(MemoryTemplateStore::new(), DocumentSettings::default());
    let preview = service.preview("acme", &acme_quote()).unwrap();

    assert!(preview.html.contains("<h1>Acme</h1>"));
    assert!(preview.html.contains("Banner"));
    assert!(preview.html.contains("Curitiba - PR"));
    assert!(preview.html.contains("50% upfront"));
    assert!(!preview.html.contains("Technical specifications"));
    assert!(!preview.html.contains("{{"));
}

#[test]
fn pinned_default_version_is_used() {
    let settings = DocumentSettings {
        default_template: DefaultTemplateSetting::Pinned { version: 1 },
        ..Default::default()
    };
    let service = DocumentService::new(MemoryTemplateStore::new(), settings);
    let mut renderer = CapturingRenderer::default();
    let receipt = service.export("acme", &acme_quote(), &mut renderer).unwrap();
    assert_eq!(receipt.origin, TemplateOrigin::Default { version: 1 });
}

#[test]
fn missing_template_is_reported_not_rendered_empty() {
    let settings = DocumentSettings {
        default_template: DefaultTemplateSetting::Disabled,
        ..Default::default()
    };
    let service = DocumentService::new(MemoryTemplateStore::new(), settings);
    let mut renderer = CapturingRenderer::default();

    let err = service.export("acme", &acme_quote(), &mut renderer).unwrap_err();
    assert!(matches!(err, DocumentError::NoTemplateConfigured));
    assert!(renderer.requests.is_empty());
}

#[test]
fn renderer_failure_propagates() {
    let service = DocumentService::new(MemoryTemplateStore::new(), DocumentSettings::default());
    let err = service
        .export("acme", &acme_quote(), &mut FailingRenderer)
        .unwrap_err();
    assert!(matches!(err, DocumentError::Render(_)));
}

#[test]
fn preview_of_unsaved_template_is_sandboxed() {
    let service = DocumentService::new(MemoryTemplateStore::new(), DocumentSettings::default());
    let frame = service
        .preview_template("<script>alert(1)</script>{{clientName}}", &acme_quote())
        .unwrap();
    assert_eq!(frame.html, "<script>alert(1)</script>Maria");
    assert!(frame.sandbox.is_empty());
    assert!(frame.to_iframe().starts_with("<iframe sandbox=\"\""));
}

#[test]
fn currency_setting_applies_to_amounts() {
    let settings = DocumentSettings {
        currency_symbol: "US$".into(),
        ..Default::default()
    };
    let service = DocumentService::new(MemoryTemplateStore::new(), settings);
    let html = service.render_html("{{total}}", &acme_quote()).unwrap();
    assert_eq!(html, "US$ 100.00");
}

#[test]
fn file_backed_export_writes_document() {
    let temp_dir = TempDir::new().unwrap();
    let mut service = DocumentService::new(
        FileTemplateStore::new(temp_dir.path().join("templates")),
        DocumentSettings::default(),
    );
    service.save_template("acme", CUSTOM_TEMPLATE).unwrap();

    let mut renderer = HtmlFileRenderer::new(temp_dir.path().join("exports"));
    let receipt = service.export("acme", &acme_quote(), &mut renderer).unwrap();

    let written = std::fs::read_to_string(&receipt.path).unwrap();
    assert!(written.starts_with("<h1>Acme</h1>"));
    assert_eq!(receipt.path.file_name().unwrap(), "quote-ORC-0042.html");
}

#[test]
fn repeated_renders_are_byte_identical() {
    let service = DocumentService::new(MemoryTemplateStore::new(), DocumentSettings::default());
    let document = acme_quote();
    let first = service.preview("acme", &document).unwrap();
    let second = service.preview("acme", &document).unwrap();
    assert_eq!(first, second);
}
