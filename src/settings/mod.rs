//! User settings for the `coach` CLI.
//!
//! Loaded from `--config`, `COACH_CONFIG`, or `<config_dir>/coach/config.toml`.
//! A missing default file means built-in defaults; a missing explicit file is
//! an error.
//!
//! # Example TOML
//!
//! ```toml
//! [storage]
//! path = "~/coach/storage.db"
//! quota_bytes = 5242880
//!
//! [ingest]
//! max_width = 800
//! jpeg_quality = 70
//!
//! [onboarding]
//! step_interval_ms = 800
//! ```

mod format;
mod path;

pub use format::DocFormat;
pub use path::{PathResolver, default_settings_path, home_dir, resolve_path};

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::error::{AdminError, Result};
use crate::ingest::{DEFAULT_JPEG_QUALITY, DEFAULT_MAX_WIDTH, IngestOptions};
use crate::onboarding::STEP_INTERVAL;
use crate::store::{DEFAULT_QUOTA_BYTES, default_db_path};

/// Storage section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Database file. Relative paths resolve against the settings file.
    pub path: Option<PathBuf>,
    /// Byte budget for stored documents; 0 disables the check.
    pub quota_bytes: usize,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: None,
            quota_bytes: DEFAULT_QUOTA_BYTES,
        }
    }
}

/// Image ingestion section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestSettings {
    pub max_width: u32,
    pub jpeg_quality: u8,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// Onboarding section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OnboardingSettings {
    pub step_interval_ms: u64,
}

impl Default for OnboardingSettings {
    fn default() -> Self {
        #[allow(clippy::cast_possible_truncation)]
        let step_interval_ms = STEP_INTERVAL.as_millis() as u64;
        Self { step_interval_ms }
    }
}

/// All user settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub storage: StorageSettings,
    pub ingest: IngestSettings,
    pub onboarding: OnboardingSettings,
}

impl Settings {
    /// Load settings.
    ///
    /// `explicit` comes from `--config` / `COACH_CONFIG` and must exist.
    /// Without it the default location is tried and silently skipped when
    /// absent.
    #[instrument(skip_all, fields(explicit = ?explicit))]
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match default_settings_path() {
                Some(path) if path.is_file() => path,
                _ => {
                    debug!("No settings file, using defaults");
                    return Ok(Self::default());
                }
            },
        };
        Self::load_file(&path)
    }

    /// Load and validate one settings file.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load_file(path: &Path) -> Result<Self> {
        let format = DocFormat::require(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AdminError::SettingsInvalid(format!("Settings file not found: {}", path.display()))
            } else {
                AdminError::Io(e)
            }
        })?;
        let mut settings = Self::from_str_with(&content, format)?;

        if let Some(db) = settings.storage.path.take() {
            let resolver = PathResolver::new(path)?;
            settings.storage.path = Some(resolver.resolve(&db)?);
        }

        info!(path = %path.display(), "Settings loaded");
        Ok(settings)
    }

    /// Parse and validate settings text.
    pub fn from_str_with(content: &str, format: DocFormat) -> Result<Self> {
        let settings: Self = format.parse(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.ingest.max_width == 0 {
            return Err(AdminError::SettingsInvalid(
                "ingest.max_width must be greater than 0".to_string(),
            ));
        }
        if !(1..=100).contains(&self.ingest.jpeg_quality) {
            return Err(AdminError::SettingsInvalid(format!(
                "ingest.jpeg_quality must be 1-100, got {}",
                self.ingest.jpeg_quality
            )));
        }
        if self.onboarding.step_interval_ms == 0 {
            return Err(AdminError::SettingsInvalid(
                "onboarding.step_interval_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub const fn ingest_options(&self) -> IngestOptions {
        IngestOptions {
            max_width: self.ingest.max_width,
            jpeg_quality: self.ingest.jpeg_quality,
        }
    }

    #[must_use]
    pub const fn step_interval(&self) -> Duration {
        Duration::from_millis(self.onboarding.step_interval_ms)
    }

    /// Storage quota, `None` when disabled.
    #[must_use]
    pub const fn quota(&self) -> Option<usize> {
        match self.storage.quota_bytes {
            0 => None,
            n => Some(n),
        }
    }

    /// Database path from settings, or the platform default.
    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.storage.path {
            Some(path) => Ok(path.clone()),
            None => default_db_path(),
        }
    }
}
