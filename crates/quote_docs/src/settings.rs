//! Quote document settings
//!
//! Settings are stored as JSON next to the template store and fall back to
//! defaults when the file is missing or unreadable.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::default_template::DefaultTemplate;
use crate::Result;

const SETTINGS_FILE: &str = "document_settings.json";

/// Sandbox token that would let embedded script run in the preview
const ALLOW_SCRIPTS: &str = "allow-scripts";

/// Which shipped template to fall back to when no custom template exists
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DefaultTemplateSetting {
    /// Always the newest shipped template
    Latest,
    /// A specific shipped version
    Pinned { version: u32 },
    /// No fallback; a custom template is required
    Disabled,
}

impl Default for DefaultTemplateSetting {
    fn default() -> Self {
        Self::Latest
    }
}

impl DefaultTemplateSetting {
    /// The shipped template this setting selects, if any
    pub fn resolve(&self) -> Option<DefaultTemplate> {
        match self {
            DefaultTemplateSetting::Latest => Some(DefaultTemplate::latest()),
            DefaultTemplateSetting::Pinned { version } => DefaultTemplate::by_version(*version),
            DefaultTemplateSetting::Disabled => None,
        }
    }
}

/// Settings for generating quote documents
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DocumentSettings {
    /// Fallback template selection
    pub default_template: DefaultTemplateSetting,
    /// Currency symbol used for amounts
    pub currency_symbol: String,
    /// Extra `sandbox` tokens for the preview frame
    pub preview_sandbox: Vec<String>,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            default_template: DefaultTemplateSetting::Latest,
            currency_symbol: quote_model::DEFAULT_CURRENCY_SYMBOL.to_string(),
            preview_sandbox: Vec::new(),
        }
    }
}

impl DocumentSettings {
    /// Sandbox tokens safe to apply; script execution is never allowed
    pub fn sandbox_tokens(&self) -> Vec<String> {
        self.preview_sandbox
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .filter(|t| {
                if t.eq_ignore_ascii_case(ALLOW_SCRIPTS) {
                    tracing::warn!("ignoring '{}' in preview sandbox settings", t);
                    false
                } else {
                    true
                }
            })
            .map(str::to_string)
            .collect()
    }
}

/// Settings manager for loading, saving, and updating document settings
pub struct SettingsManager {
    /// Path to the settings file
    settings_path: PathBuf,
    /// Current settings (cached)
    current: DocumentSettings,
}

impl SettingsManager {
    /// Create a new settings manager for the given data directory
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            settings_path: data_dir.join(SETTINGS_FILE),
            current: DocumentSettings::default(),
        }
    }

    /// Load settings from disk, or return defaults if the file doesn't exist
    pub async fn load(&mut self) -> Result<&DocumentSettings> {
        self.current = if tokio::fs::try_exists(&self.settings_path).await? {
            let content = tokio::fs::read_to_string(&self.settings_path).await?;
            parse_or_default(&content)
        } else {
            DocumentSettings::default()
        };
        Ok(&self.current)
    }

    /// Save current settings to disk
    pub async fn save(&self) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(&self.current)?;
        tokio::fs::write(&self.settings_path, content).await?;
        Ok(())
    }

    /// Get current settings
    pub fn get(&self) -> &DocumentSettings {
        &self.current
    }

    /// Update settings and save to disk
    pub async fn update(&mut self, settings: DocumentSettings) -> Result<()> {
        self.current = settings;
        self.save().await
    }
}

fn parse_or_default(content: &str) -> DocumentSettings {
    match serde_json::from_str::<DocumentSettings>(content) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!("Failed to parse document settings, using defaults: {}", e);
            DocumentSettings::default()
        }
    }
}
