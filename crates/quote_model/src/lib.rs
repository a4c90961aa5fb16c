//! Quote Records
//!
//! Typed company, client, quote and line-item records for the CRM's quote
//! documents. Records are validated at the boundary and then flattened into
//! the [`template_engine::Context`] a quote template renders against.
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use quote_model::{Client, Company, LineItem, PricingType, Quote, QuoteDocument};
//!
//! let quote = Quote::new("ORC-0001", NaiveDate::from_ymd_opt(2024, 5, 10).unwrap())
//!     .with_item(LineItem::new("Banner", PricingType::Unit, 100.0));
//! let document = QuoteDocument::new(Company::new("Acme"), Client::new("Maria"), quote);
//!
//! document.validate().unwrap();
//! let ctx = document.to_context();
//! assert_eq!(ctx.get("total").unwrap().to_string_value(), "R$ 100.00");
//! ```

mod error;
mod format;
mod line_item;
mod party;
mod quote;

pub use error::{ModelError, Result, Violation};
pub use format::{format_currency, format_date, DEFAULT_CURRENCY_SYMBOL};
pub use line_item::{LineItem, PricingType, ITEM_FIELDS};
pub use party::{Client, Company, Logo};
pub use quote::{CommercialTerms, Quote, QuoteDocument, CONTEXT_FIELDS, ITEMS_KEY};
