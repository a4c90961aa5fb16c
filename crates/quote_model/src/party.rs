//! Company (issuer) and client (recipient) records

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::Violation;

/// Company logo, either hosted or embedded in the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Logo {
    /// Image reachable by URL
    Url { url: String },
    /// Image bytes carried inline as base64
    #[serde(rename_all = "camelCase")]
    Embedded { mime_type: String, data: String },
}

impl Logo {
    /// Embed raw image bytes
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Logo::Embedded {
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
        }
    }

    /// Value for an `<img src>` attribute
    pub fn src(&self) -> String {
        match self {
            Logo::Url { url } => url.clone(),
            Logo::Embedded { mime_type, data } => format!("data:{};base64,{}", mime_type, data),
        }
    }

    fn validate(&self, violations: &mut Vec<Violation>) {
        match self {
            Logo::Url { url } if url.trim().is_empty() => {
                violations.push(Violation::new("company.logo.url", "must not be empty"));
            }
            Logo::Url { .. } => {}
            Logo::Embedded { mime_type, data } => {
                if !mime_type.starts_with("image/") {
                    violations.push(Violation::new(
                        "company.logo.mimeType",
                        format!("'{}' is not an image type", mime_type),
                    ));
                }
                if STANDARD.decode(data).is_err() {
                    violations.push(Violation::new("company.logo.data", "is not valid base64"));
                }
            }
        }
    }
}

/// The company issuing the quote
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Company {
    pub name: String,
    /// Tax registration number (CNPJ)
    pub tax_id: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub logo: Option<Logo>,
}

impl Company {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_logo(mut self, logo: Logo) -> Self {
        self.logo = Some(logo);
        self
    }

    pub(crate) fn validate(&self, violations: &mut Vec<Violation>) {
        if self.name.trim().is_empty() {
            violations.push(Violation::new("company.name", "is required"));
        }
        if let Some(logo) = &self.logo {
            logo.validate(violations);
        }
    }
}

/// The client receiving the quote
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Client {
    pub name: String,
    pub company: String,
    pub phone: String,
    pub email: String,
    pub city: String,
    pub state: String,
}

impl Client {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_location(mut self, city: impl Into<String>, state: impl Into<String>) -> Self {
        self.city = city.into();
        self.state = state.into();
        self
    }

    /// `City - ST`, or whichever part is present
    pub fn location(&self) -> String {
        let city = self.city.trim();
        let state = self.state.trim();
        match (city.is_empty(), state.is_empty()) {
            (false, false) => format!("{} - {}", city, state),
            (false, true) => city.to_string(),
            (true, false) => state.to_string(),
            (true, true) => String::new(),
        }
    }

    pub(crate) fn validate(&self, violations: &mut Vec<Violation>) {
        if self.name.trim().is_empty() {
            violations.push(Violation::new("client.name", "is required"));
        }
    }
}
