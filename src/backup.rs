//! Export and import of the configuration record as a document file.

use std::path::Path;

use tracing::{info, instrument};

use crate::error::{AdminError, Result, ResultExt};
use crate::model::{AppConfig, find_duplicate_id};
use crate::settings::DocFormat;

/// Write `config` to `path` in the format named by its extension.
#[instrument(skip(config), fields(path = %path.display()))]
pub fn export(config: &AppConfig, path: &Path) -> Result<DocFormat> {
    let format = DocFormat::require(path)?;
    let content = format.render(config)?;
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(format = format.extension(), bytes = content.len(), "Configuration exported");
    Ok(format)
}

/// Read a record from `path` and check it before it goes near the store.
#[instrument(fields(path = %path.display()))]
pub fn import(path: &Path) -> Result<AppConfig> {
    let format = DocFormat::require(path)?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: AppConfig = format.parse(&content)?;
    if let Some(id) = find_duplicate_id(&config.services) {
        return Err(AdminError::DuplicateServiceId { id: id.to_string() });
    }
    info!(services = config.services.len(), "Configuration imported");
    Ok(config)
}
