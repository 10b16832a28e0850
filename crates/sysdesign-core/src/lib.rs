pub mod catalog;
pub mod chat;
pub mod diagram;
pub mod error;
pub mod review;
pub mod rules;
pub mod store;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub use catalog::Component;
pub use chat::{ChatMessage, ChatRole};
pub use diagram::{Diagram, DiagramEdge, DiagramNode, EdgeMarker, EdgeStyle, NodeData, Position};
pub use error::{StoreError, ValidationError};
pub use review::{EvaluationCriteria, EvaluationCriterion, Rating};
pub use store::{DesignRecord, DesignStore, DesignSummary};

/// Explicit contract check for a payload crossing a flow boundary.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Resolve the application data directory (~/.sysdesign/).
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".sysdesign")
}

// --- AI Settings ---

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AiSettings {
    pub provider: String,
    pub api_key: String,
    pub model: String,
}

impl AiSettings {
    /// Apply `SYSDESIGN_PROVIDER`, `SYSDESIGN_API_KEY` and `SYSDESIGN_MODEL`
    /// on top of the stored values. Unset or empty variables leave the
    /// stored value alone.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(provider) = get("SYSDESIGN_PROVIDER") {
            self.provider = provider;
        }
        if let Some(api_key) = get("SYSDESIGN_API_KEY") {
            self.api_key = api_key;
        }
        if let Some(model) = get("SYSDESIGN_MODEL") {
            self.model = model;
        }
        self
    }
}

fn settings_path() -> PathBuf {
    data_dir().join("settings.json")
}

/// Stored settings with environment overrides applied. A missing or
/// unreadable settings file yields defaults.
pub fn read_settings() -> AiSettings {
    let path = settings_path();
    let stored = if path.exists() {
        fs::read_to_string(&path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    } else {
        AiSettings::default()
    };
    stored.with_env_overrides()
}

pub fn write_settings(settings: &AiSettings) -> Result<(), StoreError> {
    let dir = data_dir();
    fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(settings_path(), json)?;
    Ok(())
}

pub fn ai_configured(settings: &AiSettings) -> bool {
    !settings.provider.is_empty()
        && !settings.model.is_empty()
        && (settings.provider == "ollama" || !settings.api_key.is_empty())
}
