//! Application state

use std::path::{Path, PathBuf};

use quote_docs::{DocumentService, FileTemplateStore, SettingsManager};

/// Environment variable naming the data directory
pub const DATA_DIR_ENV: &str = "CRM_DOCS_DATA_DIR";
/// Environment variable naming the company account
pub const TENANT_ENV: &str = "CRM_DOCS_TENANT";

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_TENANT: &str = "default";

/// Where the app keeps its files and whose templates it uses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub tenant: String,
}

impl AppConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = lookup(DATA_DIR_ENV)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
        let tenant = lookup(TENANT_ENV)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TENANT.to_string());
        Self {
            data_dir: PathBuf::from(data_dir),
            tenant,
        }
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.data_dir.join("templates")
    }

    pub fn exports_dir(&self) -> PathBuf {
        self.data_dir.join("exports")
    }
}

/// Loaded settings and the document service built from them
pub struct AppState {
    pub config: AppConfig,
    pub settings: SettingsManager,
    pub service: DocumentService<FileTemplateStore>,
}

impl AppState {
    /// Load settings from the data directory and open the template store
    pub async fn load(config: AppConfig) -> Self {
        let mut settings = SettingsManager::new(config.data_dir.clone());
        if let Err(e) = settings.load().await {
            tracing::warn!("Failed to load settings, using defaults: {}", e);
        }

        let store = FileTemplateStore::new(config.templates_dir());
        let service = DocumentService::new(store, settings.get().clone());

        Self {
            config,
            settings,
            service,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_config_defaults() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.tenant, "default");
        assert_eq!(config.templates_dir(), PathBuf::from("data").join("templates"));
    }

    #[test]
    fn test_config_from_environment() {
        let env: HashMap<&str, &str> =
            HashMap::from([(DATA_DIR_ENV, "/srv/crm"), (TENANT_ENV, "acme")]);
        let config = AppConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.data_dir, PathBuf::from("/srv/crm"));
        assert_eq!(config.tenant, "acme");
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = AppConfig::from_lookup(|_| Some("  ".to_string()));
        assert_eq!(config.tenant, "default");
    }

    #[tokio::test]
    async fn test_load_with_corrupt_settings_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("document_settings.json"), "{not json").unwrap();

        let state = AppState::load(AppConfig {
            data_dir: temp_dir.path().to_path_buf(),
            tenant: "acme".into(),
        })
        .await;
        assert_eq!(state.service.settings(), state.settings.get());
        assert_eq!(state.data_dir(), temp_dir.path());
    }
}
