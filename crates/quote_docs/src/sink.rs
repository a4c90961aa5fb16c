//! Output sinks for rendered quote markup

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Markup ready to be turned into a downloadable document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRequest {
    /// Suggested file name, e.g. `quote-ORC-0042.pdf`
    pub file_name: String,
    pub html: String,
}

impl ExportRequest {
    pub fn new(quote_number: &str, html: String) -> Self {
        Self {
            file_name: format!("quote-{}.pdf", safe_file_stem(quote_number)),
            html,
        }
    }
}

/// Turns final markup into a document. Pagination, rasterization and image
/// embedding are the renderer's job.
pub trait DocumentRenderer {
    /// Render and return where the document ended up
    fn render(&mut self, request: &ExportRequest) -> Result<PathBuf>;
}

/// Renderer that writes the markup itself as an `.html` file, for printing
/// from a browser
#[derive(Debug)]
pub struct HtmlFileRenderer {
    output_dir: PathBuf,
}

impl HtmlFileRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl DocumentRenderer for HtmlFileRenderer {
    fn render(&mut self, request: &ExportRequest) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self
            .output_dir
            .join(Path::new(&request.file_name).with_extension("html"));
        std::fs::write(&path, &request.html)?;
        Ok(path)
    }
}

/// Markup wrapped for display in an isolated inline frame.
///
/// The frame always carries a `sandbox` attribute, so script in the template
/// does not run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewFrame {
    pub html: String,
    pub sandbox: Vec<String>,
}

impl PreviewFrame {
    pub fn new(html: String, sandbox: Vec<String>) -> Self {
        Self { html, sandbox }
    }

    /// `<iframe>` element embedding the markup via `srcdoc`
    pub fn to_iframe(&self) -> String {
        format!(
            "<iframe sandbox=\"{}\" srcdoc=\"{}\" title=\"Quote preview\"></iframe>",
            escape_attribute(&self.sandbox.join(" ")),
            escape_attribute(&self.html)
        )
    }
}

fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn safe_file_stem(value: &str) -> String {
    let stem: String = value
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if stem.is_empty() {
        "untitled".to_string()
    } else {
        stem
    }
}
