//! Quote Template Engine
//!
//! Compiles the Handlebars-style templates used for quote documents. The same
//! compiler serves the export and live-preview paths, so both produce
//! byte-identical markup for the same inputs.
//!
//! # Syntax
//!
//! - `{{name}}` inserts a value, or nothing if `name` is unbound
//! - `{{#if name}} ... {{/if}}` keeps its body when `name` is truthy; blocks nest
//! - `{{#each name}} ... {{/each}}` repeats its body once per record in a
//!   top-level list, resolving names against that record only
//!
//! Unresolvable names render as nothing and malformed directives are kept as
//! literal text. Compiling never fails.
//!
//! Substituted values are final: a value containing `{{...}}`, including a
//! loop item's field, is inserted as text and never expanded against the
//! top-level context.
//!
//! # Example
//!
//! ```rust
//! use template_engine::{compile, Context, Record};
//!
//! let mut banner = Record::new();
//! banner.insert("name".to_string(), "Banner".into());
//!
//! let ctx = Context::new()
//!     .with("companyName", "Acme")
//!     .with_list("items", vec![banner]);
//!
//! let html = compile("<h1>{{companyName}}</h1>{{#each items}}<li>{{name}}</li>{{/each}}", &ctx);
//! assert_eq!(html, "<h1>Acme</h1><li>Banner</li>");
//! ```

mod context;
mod error;
mod lexer;
mod parser;
mod template;
mod value;

pub use context::{Context, Scope};
pub use error::{Result, TemplateError};
pub use parser::{Diagnostic, DiagnosticKind, MAX_NESTING_DEPTH};
pub use template::{compile, Template};
pub use value::{Record, Value};
