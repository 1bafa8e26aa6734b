use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::profile::Profile;
use crate::provider::ProviderKind;

// ============================================================================
// Persisted configuration
// ============================================================================

/// Persisted configuration: provider choice, per-provider API keys, model,
/// and the user profile. Key names follow the browser-extension storage
/// schema, hence camelCase on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub selected_provider: ProviderKind,
    pub gemini_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub selected_model: Option<String>,
    pub user_profile: Option<Profile>,
}

impl Settings {
    /// The API key configured for a provider, treating empty strings as
    /// absent.
    pub fn api_key_for(&self, provider: ProviderKind) -> Option<&str> {
        let key = match provider {
            ProviderKind::Gemini => self.gemini_api_key.as_deref(),
            ProviderKind::Anthropic => self.anthropic_api_key.as_deref(),
        };
        key.filter(|k| !k.is_empty())
    }

    /// Selected model, or the provider's default when none was chosen.
    pub fn resolved_model(&self) -> String {
        self.selected_model
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| self.selected_provider.default_model())
            .to_string()
    }

    /// True when both an API key and a profile exist — the gate the scan
    /// checks before doing any work.
    pub fn is_fill_ready(&self) -> bool {
        self.api_key_for(self.selected_provider).is_some() && self.user_profile.is_some()
    }
}

// ============================================================================
// SettingsStore — the seam between core logic and persisted state
// ============================================================================

/// Core logic never touches process-wide or on-disk state directly; it goes
/// through this trait, so tests run against the in-memory store.
pub trait SettingsStore {
    fn read(&self) -> Settings;
    fn write(&mut self, settings: &Settings) -> Result<(), Box<dyn std::error::Error>>;
}

/// In-memory store for tests and one-shot runs.
#[derive(Debug, Default)]
pub struct MemorySettings {
    settings: Settings,
}

impl MemorySettings {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }
}

impl SettingsStore for MemorySettings {
    fn read(&self) -> Settings {
        self.settings.clone()
    }

    fn write(&mut self, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
        self.settings = settings.clone();
        Ok(())
    }
}

/// YAML-file-backed store. Reads fall back to defaults when the file is
/// missing or malformed; writes create the file.
#[derive(Debug)]
pub struct FileSettings {
    path: PathBuf,
}

impl FileSettings {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileSettings {
    fn read(&self) -> Settings {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
            Err(_) => Settings::default(),
        }
    }

    fn write(&mut self, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
        let content = serde_yaml::to_string(settings)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}
