//! Persistence for per-company custom quote templates
//!
//! A company's custom template is a single text field. Stores never interpret
//! the text; resolution against the shipped defaults happens in the service.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DocumentError, Result};

/// A saved custom template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTemplate {
    pub source: String,
    pub updated_at: DateTime<Utc>,
}

impl StoredTemplate {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            updated_at: Utc::now(),
        }
    }
}

/// Storage for custom templates, keyed by tenant (company account) id
pub trait TemplateStore {
    /// The tenant's custom template, if one was saved
    fn get(&self, tenant: &str) -> Result<Option<StoredTemplate>>;

    /// Save or replace the tenant's custom template
    fn put(&mut self, tenant: &str, source: &str) -> Result<StoredTemplate>;

    /// Remove the tenant's custom template. Returns whether one existed.
    fn remove(&mut self, tenant: &str) -> Result<bool>;
}

/// In-memory template store
#[derive(Debug, Default)]
pub struct MemoryTemplateStore {
    templates: HashMap<String, StoredTemplate>,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TemplateStore for MemoryTemplateStore {
    fn get(&self, tenant: &str) -> Result<Option<StoredTemplate>> {
        Ok(self.templates.get(tenant).cloned())
    }

    fn put(&mut self, tenant: &str, source: &str) -> Result<StoredTemplate> {
        let stored = StoredTemplate::new(source);
        self.templates.insert(tenant.to_string(), stored.clone());
        Ok(stored)
    }

    fn remove(&mut self, tenant: &str) -> Result<bool> {
        Ok(self.templates.remove(tenant).is_some())
    }
}

/// Template store keeping one JSON file per tenant in a directory
#[derive(Debug)]
pub struct FileTemplateStore {
    templates_dir: PathBuf,
}

impl FileTemplateStore {
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: templates_dir.into(),
        }
    }

    /// Path of the tenant's template file
    fn template_path(&self, tenant: &str) -> Result<PathBuf> {
        validate_tenant(tenant)?;
        Ok(self.templates_dir.join(format!("{}.json", tenant)))
    }
}

impl TemplateStore for FileTemplateStore {
    fn get(&self, tenant: &str) -> Result<Option<StoredTemplate>> {
        let path = self.template_path(tenant)?;
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn put(&mut self, tenant: &str, source: &str) -> Result<StoredTemplate> {
        let path = self.template_path(tenant)?;
        std::fs::create_dir_all(&self.templates_dir)?;
        let stored = StoredTemplate::new(source);
        std::fs::write(&path, serde_json::to_string_pretty(&stored)?)?;
        tracing::debug!(tenant, path = %path.display(), "saved custom template");
        Ok(stored)
    }

    fn remove(&mut self, tenant: &str) -> Result<bool> {
        let path = self.template_path(tenant)?;
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&path)?;
        Ok(true)
    }
}

/// Tenant ids become file names, so only `[A-Za-z0-9_-]` is accepted
fn validate_tenant(tenant: &str) -> Result<()> {
    let valid = !tenant.is_empty()
        && tenant
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(DocumentError::InvalidTenant(tenant.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryTemplateStore::new();
        assert!(store.get("acme").unwrap().is_none());

        store.put("acme", "<p>{{companyName}}</p>").unwrap();
        assert_eq!(store.get("acme").unwrap().unwrap().source, "<p>{{companyName}}</p>");

        assert!(store.remove("acme").unwrap());
        assert!(!store.remove("acme").unwrap());
    }

    #[test]
    fn test_file_store_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = FileTemplateStore::new(temp_dir.path().join("templates"));

        assert!(store.get("acme").unwrap().is_none());
        let saved = store.put("acme", "<h1>{{quoteNumber}}</h1>").unwrap();

        let reopened = FileTemplateStore::new(temp_dir.path().join("templates"));
        assert_eq!(reopened.get("acme").unwrap(), Some(saved));
        assert!(store.remove("acme").unwrap());
        assert!(store.get("acme").unwrap().is_none());
    }

    #[test]
    fn test_file_store_rejects_path_tenants() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = FileTemplateStore::new(temp_dir.path());
        for tenant in ["", "../etc", "a/b", "a.b"] {
            assert!(matches!(
                store.put(tenant, "x"),
                Err(DocumentError::InvalidTenant(_))
            ));
        }
    }
}
