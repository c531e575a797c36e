//! Document formats for settings and backups, chosen by file extension.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::trace;

use crate::error::{AdminError, Result};

/// Supported document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocFormat {
    /// JSON (.json).
    Json,
    /// YAML (.yaml, .yml).
    Yaml,
    /// TOML (.toml).
    Toml,
}

impl DocFormat {
    /// Detect format from file extension.
    ///
    /// Returns `None` if the extension is not recognized.
    #[must_use]
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        trace!(extension = %ext, "Detecting document format from extension");
        match ext.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    /// Like [`from_extension`](Self::from_extension), but an unknown extension is an error.
    pub fn require(path: &Path) -> Result<Self> {
        Self::from_extension(path).ok_or_else(|| {
            AdminError::SettingsParse(format!(
                "Unknown format for '{}': expected .json, .yaml, .yml, or .toml",
                path.display()
            ))
        })
    }

    /// Get the canonical file extension for this format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Toml => "toml",
        }
    }

    /// Parse a document.
    pub fn parse<T: DeserializeOwned>(self, content: &str) -> Result<T> {
        match self {
            Self::Json => serde_json::from_str(content)
                .map_err(|e| AdminError::SettingsParse(format!("JSON: {e}"))),
            Self::Yaml => serde_yaml::from_str(content)
                .map_err(|e| AdminError::SettingsParse(format!("YAML: {e}"))),
            Self::Toml => {
                toml::from_str(content).map_err(|e| AdminError::SettingsParse(format!("TOML: {e}")))
            }
        }
    }

    /// Render a document.
    pub fn render<T: Serialize>(self, value: &T) -> Result<String> {
        match self {
            Self::Json => serde_json::to_string_pretty(value)
                .map_err(|e| AdminError::SettingsParse(format!("JSON: {e}"))),
            Self::Yaml => serde_yaml::to_string(value)
                .map_err(|e| AdminError::SettingsParse(format!("YAML: {e}"))),
            Self::Toml => toml::to_string_pretty(value)
                .map_err(|e| AdminError::SettingsParse(format!("TOML: {e}"))),
        }
    }
}
