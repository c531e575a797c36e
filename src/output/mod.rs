//! Output mode abstraction for robot and human output.

use std::path::Path;

use serde::Serialize;

use crate::cli::Cli;
use crate::error::AdminError;
use crate::gallery::GalleryImage;
use crate::ingest::{EmbeddedImage, ImageRef};
use crate::model::{AppConfig, Field, ImageSlot, Service};
use crate::onboarding::Advance;
use crate::session::{Screen, screen_for};
use crate::settings::DocFormat;

pub mod human;
pub mod robot;

pub use human::HumanOutput;
pub use robot::RobotOutput;

/// Summary of the stored record for `show`.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub screen: Screen,
    pub revision: String,
    pub storage: String,
    pub images: ImageSummary,
    pub config: AppConfig,
}

/// One-line descriptions of both image slots.
#[derive(Debug, Clone, Serialize)]
pub struct ImageSummary {
    pub profile: String,
    pub hero: String,
}

impl ProfileView {
    /// Build the view. Unless `full`, embedded image payloads are replaced by
    /// their description.
    #[must_use]
    pub fn new(config: &AppConfig, revision: String, storage: String, full: bool) -> Self {
        let images = ImageSummary {
            profile: ImageRef::classify(&config.profile_image).describe(),
            hero: ImageRef::classify(&config.hero_image).describe(),
        };
        let mut config = config.clone();
        if !full {
            for slot in [ImageSlot::Profile, ImageSlot::Hero] {
                let image = config.image_mut(slot);
                let described = match ImageRef::classify(image) {
                    embedded @ ImageRef::Embedded { .. } => Some(embedded.describe()),
                    _ => None,
                };
                if let Some(described) = described {
                    *image = described;
                }
            }
        }
        Self {
            screen: screen_for(&config),
            revision,
            storage,
            images,
            config,
        }
    }
}

/// JSON formatting options for robot mode.
#[derive(Debug, Clone, Copy)]
pub enum RobotFormat {
    /// Pretty-printed JSON (default for --robot).
    Json,
    /// Single-line JSON (--format=json-compact).
    JsonCompact,
}

/// Determines how command output is rendered.
#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    /// JSON output for agents and scripting.
    Robot(RobotFormat),
    /// Styled terminal output for human users.
    Human { color: bool },
}

impl OutputMode {
    /// Create OutputMode from CLI arguments.
    #[must_use]
    pub const fn from_cli(cli: &Cli) -> Self {
        if cli.use_json() {
            let format = if cli.use_compact_json() {
                RobotFormat::JsonCompact
            } else {
                RobotFormat::Json
            };
            Self::Robot(format)
        } else {
            Self::Human {
                color: !cli.no_color,
            }
        }
    }

    /// Returns true if output should be JSON.
    #[must_use]
    pub const fn is_robot(&self) -> bool {
        matches!(self, Self::Robot(_))
    }

    /// Convert into the appropriate Output implementation.
    #[must_use]
    pub fn into_output(self) -> Box<dyn Output> {
        match self {
            Self::Robot(format) => Box::new(RobotOutput::new(format)),
            Self::Human { color } => {
                if !color {
                    console::set_colors_enabled(false);
                    console::set_colors_enabled_stderr(false);
                }
                Box::new(HumanOutput::new())
            }
        }
    }
}

/// Trait for all output operations.
///
/// Commands call these methods without knowing the output mode.
pub trait Output {
    // Basic messages
    fn success(&self, message: &str);
    fn error(&self, error: &AdminError);
    fn warning(&self, message: &str);
    fn info(&self, message: &str);

    // Profile
    fn profile(&self, view: &ProfileView);
    fn field_set(&self, field: Field, value: &str, changed: bool);
    fn image_set(&self, slot: ImageSlot, image: &EmbeddedImage);
    fn gallery(&self, entries: &[GalleryImage], current: Option<usize>);
    fn hero_selected(&self, index: usize, entry: &GalleryImage);

    // Services
    fn service_list(&self, services: &[Service]);
    fn service_saved(&self, service: &Service, created: bool);
    fn service_deleted(&self, id: &str);

    // Lifecycle
    fn onboarding_started(&self, message: &str);
    fn onboarding_step(&self, step: &Advance);
    fn onboarded(&self, config: &AppConfig);
    fn reset_done(&self);
    fn exported(&self, path: &Path, format: DocFormat);
    fn imported(&self, path: &Path, config: &AppConfig);

    // Metadata
    fn quick_start(&self, onboarded: bool);
    fn version_info(&self, version: &str, git_sha: Option<&str>, build_time: Option<&str>);
}
