//! Error types for profile admin operations.

use thiserror::Error;

/// Primary error type for profile admin operations.
#[derive(Error, Debug)]
pub enum AdminError {
    // Image errors
    #[error("Image file not found: {path}")]
    ImageNotFound { path: String },

    #[error("Could not decode image: {0}")]
    ImageDecode(String),

    #[error("Could not encode image: {0}")]
    ImageEncode(String),

    // Validation errors
    #[error("Missing required fields: {}", missing.join(", "))]
    Validation { missing: Vec<String> },

    #[error("Unknown field '{name}'")]
    UnknownField { name: String },

    #[error("Invalid theme color '{value}': expected one of orange, blue, green, purple")]
    InvalidThemeColor { value: String },

    #[error("Duplicate service id '{id}'")]
    DuplicateServiceId { id: String },

    #[error("Gallery index {index} out of range (0-{max_idx})")]
    GalleryIndexOutOfRange { index: usize, max_idx: usize },

    #[error("Detail key '{key}' is a service field")]
    ReservedDetailKey { key: String },

    #[error("Service not found: {id}")]
    ServiceNotFound { id: String },

    // Storage errors
    #[error("Failed to read from storage: {0}")]
    StorageRead(String),

    #[error("Failed to save to storage: {0}")]
    StorageWrite(String),

    #[error("Storage quota exceeded: {needed} bytes needed, {quota} bytes allowed")]
    StorageQuotaExceeded { needed: usize, quota: usize },

    // Flow errors
    #[error("Onboarding has not been completed")]
    NotOnboarded,

    #[error("Confirmation declined: {action}")]
    ConfirmationDeclined { action: String },

    // Settings errors
    #[error("Settings parse error: {0}")]
    SettingsParse(String),

    #[error("Invalid settings: {0}")]
    SettingsInvalid(String),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl AdminError {
    /// Returns true if the error is recoverable by the user.
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ImageNotFound { .. }
                | Self::ImageDecode(_)
                | Self::Validation { .. }
                | Self::UnknownField { .. }
                | Self::InvalidThemeColor { .. }
                | Self::DuplicateServiceId { .. }
                | Self::GalleryIndexOutOfRange { .. }
                | Self::ReservedDetailKey { .. }
                | Self::ServiceNotFound { .. }
                | Self::StorageQuotaExceeded { .. }
                | Self::NotOnboarded
                | Self::ConfirmationDeclined { .. }
        )
    }

    /// Returns a suggestion for how to fix the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::ImageDecode(_) => Some("Choose a PNG, JPEG, GIF, BMP or WebP image"),
            Self::Validation { missing } if missing.iter().any(|m| m == "title") => {
                Some("Pass --title <TITLE>")
            }
            Self::Validation { .. } => Some("Fill in your name and WhatsApp number"),
            Self::UnknownField { .. } => Some(
                "Fields: professionalName, slogan, phone, locationText, instagramUrl, themeColor",
            ),
            Self::InvalidThemeColor { .. } => Some("Use one of: orange, blue, green, purple"),
            Self::GalleryIndexOutOfRange { .. } => Some("Run: coach gallery"),
            Self::ReservedDetailKey { .. } => {
                Some("Use --title, --tag, --duration, --image or --popular instead")
            }
            Self::ServiceNotFound { .. } => Some("Run: coach services list"),
            Self::StorageQuotaExceeded { .. } => {
                Some("Use smaller images or raise storage.quota_bytes in the settings file")
            }
            Self::NotOnboarded => Some("Run: coach onboard --name <NAME> --phone <PHONE>"),
            Self::ConfirmationDeclined { .. } => Some("Pass --yes to confirm"),
            _ => None,
        }
    }

    /// Returns true if the error means a write was rejected by storage.
    pub const fn is_storage_write(&self) -> bool {
        matches!(
            self,
            Self::StorageWrite(_) | Self::StorageQuotaExceeded { .. }
        )
    }
}

/// Convenience type alias for Results using AdminError.
pub type Result<T> = std::result::Result<T, AdminError>;

/// Extension trait for adding context to errors.
pub trait ResultExt<T> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T, E: std::error::Error> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| AdminError::Other(format!("{}: {e}", f().into())))
    }
}
