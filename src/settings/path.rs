//! Path resolution helpers for settings files.
//!
//! Supports absolute paths, paths relative to the settings file, and "~" home
//! directory expansion.

use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use crate::error::{AdminError, Result};

/// Resolve a path read from a settings file.
///
/// Resolution rules:
/// 1. Paths starting with `~`: expanded to home directory
/// 2. Absolute paths: used as-is
/// 3. Relative paths: resolved relative to the settings file's directory
pub fn resolve_path(path: &Path, base_dir: &Path) -> Result<PathBuf> {
    trace!(
        path = %path.display(),
        base_dir = %base_dir.display(),
        "Resolving path"
    );

    let path_str = path.to_string_lossy();

    if path_str == "~" || path_str.starts_with("~/") {
        let home = home_dir()?;
        let rest = path_str.strip_prefix("~/").unwrap_or("");
        let resolved = if rest.is_empty() { home } else { home.join(rest) };
        debug!(
            original = %path.display(),
            resolved = %resolved.display(),
            "Expanded home directory path"
        );
        return Ok(resolved);
    }

    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    let resolved = base_dir.join(path);
    debug!(
        original = %path.display(),
        resolved = %resolved.display(),
        "Resolved relative path"
    );
    Ok(resolved)
}

/// Resolve the user's home directory (cross-platform).
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .ok_or_else(|| AdminError::SettingsInvalid("Could not determine home directory".to_string()))
}

/// Default settings file: `<config_dir>/coach/config.toml`.
#[must_use]
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("coach").join("config.toml"))
}

/// Resolves paths relative to one settings file.
#[derive(Debug, Clone)]
pub struct PathResolver {
    base_dir: PathBuf,
}

impl PathResolver {
    /// Create a resolver for a specific settings file path.
    pub fn new(settings_path: &Path) -> Result<Self> {
        let base_dir = settings_path.parent().ok_or_else(|| {
            AdminError::SettingsInvalid(format!(
                "Settings path has no parent directory: {}",
                settings_path.display()
            ))
        })?;

        let canonical = base_dir.canonicalize().unwrap_or_else(|_| {
            warn!(base_dir = %base_dir.display(), "Failed to canonicalize settings directory");
            base_dir.to_path_buf()
        });

        Ok(Self { base_dir: canonical })
    }

    /// Resolve a path relative to the settings file.
    pub fn resolve(&self, path: &Path) -> Result<PathBuf> {
        resolve_path(path, &self.base_dir)
    }
}
