//! Quotes and the document record bound into templates

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use template_engine::Context;

use crate::error::{ModelError, Result, Violation};
use crate::format::{format_currency, format_date, DEFAULT_CURRENCY_SYMBOL};
use crate::line_item::LineItem;
use crate::party::{Client, Company};

/// Name of the line-item list in the template context
pub const ITEMS_KEY: &str = "items";

/// Scalar fields [`QuoteDocument::to_context`] binds
pub const CONTEXT_FIELDS: &[&str] = &[
    "companyName",
    "companyTaxId",
    "companyAddress",
    "companyCity",
    "companyState",
    "companyPhone",
    "companyEmail",
    "companyWebsite",
    "companyLogo",
    "quoteNumber",
    "quoteDate",
    "validityDays",
    "validUntil",
    "clientName",
    "clientCompany",
    "clientPhone",
    "clientEmail",
    "clientLocation",
    "total",
    "material",
    "finishing",
    "hasTechnicalSpecs",
    "technicalSpecs",
    "paymentTerms",
    "warranty",
    "installationStatus",
    "installationDeadline",
    "deliveryTime",
    "observations",
];

/// Commercial terms printed under the line items
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommercialTerms {
    pub material: String,
    pub finishing: String,
    /// Free-text technical specifications
    pub technical_specs: String,
    pub payment_terms: String,
    pub warranty: String,
    pub installation_included: bool,
    pub installation_deadline: String,
    pub delivery_time: String,
    pub observations: String,
}

impl CommercialTerms {
    /// Whether any technical specification is filled in
    pub fn has_technical_specs(&self) -> bool {
        [&self.material, &self.finishing, &self.technical_specs]
            .iter()
            .any(|s| !s.trim().is_empty())
    }

    pub fn installation_status(&self) -> &'static str {
        if self.installation_included {
            "Installation included"
        } else {
            "Installation not included"
        }
    }
}

fn default_validity_days() -> u32 {
    15
}

/// A quote issued to a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Display identifier, e.g. `ORC-0042`
    pub number: String,
    pub issue_date: NaiveDate,
    #[serde(default = "default_validity_days")]
    pub validity_days: u32,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub terms: CommercialTerms,
}

impl Quote {
    pub fn new(number: impl Into<String>, issue_date: NaiveDate) -> Self {
        Self {
            number: number.into(),
            issue_date,
            validity_days: default_validity_days(),
            items: Vec::new(),
            terms: CommercialTerms::default(),
        }
    }

    pub fn with_item(mut self, item: LineItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn with_terms(mut self, terms: CommercialTerms) -> Self {
        self.terms = terms;
        self
    }

    pub fn total(&self) -> f64 {
        self.items.iter().map(LineItem::subtotal).sum()
    }

    /// Last day the quote is valid, if representable
    pub fn valid_until(&self) -> Option<NaiveDate> {
        self.issue_date
            .checked_add_days(Days::new(u64::from(self.validity_days)))
    }
}

/// Everything a quote document template is rendered from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDocument {
    pub company: Company,
    pub client: Client,
    pub quote: Quote,
}

impl QuoteDocument {
    pub fn new(company: Company, client: Client, quote: Quote) -> Self {
        Self {
            company,
            client,
            quote,
        }
    }

    /// Parse and validate a document from JSON
    pub fn from_json_str(data: &str) -> Result<Self> {
        let document: QuoteDocument = serde_json::from_str(data)?;
        document.validate()?;
        Ok(document)
    }

    /// Check every rule, reporting all violations at once
    pub fn validate(&self) -> Result<()> {
        let mut violations = Vec::new();
        self.company.validate(&mut violations);
        self.client.validate(&mut violations);

        if self.quote.number.trim().is_empty() {
            violations.push(Violation::new("quote.number", "is required"));
        }
        for (i, item) in self.quote.items.iter().enumerate() {
            item.validate(&format!("quote.items[{}]", i), &mut violations);
        }

        if violations.is_empty() {
            Ok(())
        } else {
            tracing::debug!(count = violations.len(), quote = %self.quote.number, "quote failed validation");
            Err(ModelError::Invalid(violations))
        }
    }

    /// Template context using the default currency symbol
    pub fn to_context(&self) -> Context {
        self.to_context_with_currency(DEFAULT_CURRENCY_SYMBOL)
    }

    /// Build the template context: company, quote, client and terms fields
    /// plus the `items` list.
    pub fn to_context_with_currency(&self, currency_symbol: &str) -> Context {
        let company = &self.company;
        let client = &self.client;
        let quote = &self.quote;
        let terms = &quote.terms;

        let mut ctx = Context::new();

        ctx.insert("companyName", company.name.as_str());
        ctx.insert("companyTaxId", company.tax_id.as_str());
        ctx.insert("companyAddress", company.address.as_str());
        ctx.insert("companyCity", company.city.as_str());
        ctx.insert("companyState", company.state.as_str());
        ctx.insert("companyPhone", company.phone.as_str());
        ctx.insert("companyEmail", company.email.as_str());
        ctx.insert("companyWebsite", company.website.as_str());
        ctx.insert(
            "companyLogo",
            company.logo.as_ref().map(|logo| logo.src()).unwrap_or_default(),
        );

        ctx.insert("quoteNumber", quote.number.as_str());
        ctx.insert("quoteDate", format_date(quote.issue_date));
        ctx.insert("validityDays", quote.validity_days);
        ctx.insert("validUntil", quote.valid_until().map(format_date));

        ctx.insert("clientName", client.name.as_str());
        ctx.insert("clientCompany", client.company.as_str());
        ctx.insert("clientPhone", client.phone.as_str());
        ctx.insert("clientEmail", client.email.as_str());
        ctx.insert("clientLocation", client.location());

        ctx.insert_list(
            ITEMS_KEY,
            quote
                .items
                .iter()
                .enumerate()
                .map(|(i, item)| item.to_record(i + 1, currency_symbol))
                .collect(),
        );
        ctx.insert("total", format_currency(quote.total(), currency_symbol));

        ctx.insert("material", terms.material.as_str());
        ctx.insert("finishing", terms.finishing.as_str());
        ctx.insert("hasTechnicalSpecs", terms.has_technical_specs());
        ctx.insert("technicalSpecs", terms.technical_specs.as_str());
        ctx.insert("paymentTerms", terms.payment_terms.as_str());
        ctx.insert("warranty", terms.warranty.as_str());
        ctx.insert("installationStatus", terms.installation_status());
        ctx.insert("installationDeadline", terms.installation_deadline.as_str());
        ctx.insert("deliveryTime", terms.delivery_time.as_str());
        ctx.insert("observations", terms.observations.as_str());

        ctx
    }
}
