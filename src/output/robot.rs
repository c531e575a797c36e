//! Robot mode JSON output implementation.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, instrument, trace, warn};

use crate::error::AdminError;
use crate::gallery::GalleryImage;
use crate::ingest::EmbeddedImage;
use crate::model::{AppConfig, Field, ImageSlot, Service};
use crate::onboarding::Advance;
use crate::settings::DocFormat;

use super::{Output, ProfileView, RobotFormat};

/// JSON output implementation for agents and scripting.
pub struct RobotOutput {
    format: RobotFormat,
}

impl RobotOutput {
    #[must_use]
    pub fn new(format: RobotFormat) -> Self {
        debug!(?format, "Creating RobotOutput");
        Self { format }
    }

    /// Output any serializable data as JSON to stdout.
    #[instrument(skip(self, data), fields(format = ?self.format))]
    fn output_json<T: Serialize + ?Sized>(&self, data: &T) {
        let json = match self.format {
            RobotFormat::Json => serde_json::to_string_pretty(data),
            RobotFormat::JsonCompact => serde_json::to_string(data),
        };
        match json {
            Ok(json) => {
                trace!(json_len = json.len(), "JSON serialized");
                println!("{json}");
            }
            Err(e) => warn!(error = %e, "Failed to serialize output"),
        }
    }

    /// Output single-line JSON (for streaming events).
    fn output_json_line<T: Serialize>(&self, data: &T) {
        match serde_json::to_string(data) {
            Ok(json) => println!("{json}"),
            Err(e) => warn!(error = %e, "Failed to serialize event"),
        }
    }
}

impl Output for RobotOutput {
    fn success(&self, message: &str) {
        self.output_json(&serde_json::json!({
            "success": true,
            "message": message
        }));
    }

    #[instrument(skip(self))]
    fn error(&self, error: &AdminError) {
        debug!(error = %error, "Robot: error");
        let body = serde_json::json!({
            "error": true,
            "message": error.to_string(),
            "suggestion": error.suggestion(),
            "recoverable": error.is_user_recoverable(),
        });
        if let Ok(json) = serde_json::to_string_pretty(&body) {
            eprintln!("{json}");
        }
    }

    fn warning(&self, message: &str) {
        self.output_json(&serde_json::json!({
            "warning": true,
            "message": message
        }));
    }

    fn info(&self, message: &str) {
        self.output_json(&serde_json::json!({
            "info": true,
            "message": message
        }));
    }

    fn profile(&self, view: &ProfileView) {
        self.output_json(view);
    }

    fn field_set(&self, field: Field, value: &str, changed: bool) {
        self.output_json(&serde_json::json!({
            "field": field.key(),
            "value": value,
            "changed": changed,
            "ok": true
        }));
    }

    fn image_set(&self, slot: ImageSlot, image: &EmbeddedImage) {
        self.output_json(&serde_json::json!({
            "slot": slot,
            "image": image,
            "ok": true
        }));
    }

    fn gallery(&self, entries: &[GalleryImage], current: Option<usize>) {
        let entries: Vec<_> = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                serde_json::json!({
                    "index": index,
                    "label": entry.label,
                    "thumb": entry.thumb,
                    "full": entry.full,
                    "current": current == Some(index),
                })
            })
            .collect();
        self.output_json(&entries);
    }

    fn hero_selected(&self, index: usize, entry: &GalleryImage) {
        self.output_json(&serde_json::json!({
            "slot": ImageSlot::Hero,
            "gallery_index": index,
            "image": entry.full,
            "ok": true
        }));
    }

    fn service_list(&self, services: &[Service]) {
        self.output_json(services);
    }

    fn service_saved(&self, service: &Service, created: bool) {
        self.output_json(&serde_json::json!({
            "service": service,
            "created": created,
            "ok": true
        }));
    }

    fn service_deleted(&self, id: &str) {
        self.output_json(&serde_json::json!({ "deleted": id, "ok": true }));
    }

    fn onboarding_started(&self, message: &str) {
        self.output_json_line(&serde_json::json!({
            "event": "started",
            "message": message
        }));
    }

    fn onboarding_step(&self, step: &Advance) {
        self.output_json_line(step);
    }

    fn onboarded(&self, config: &AppConfig) {
        self.output_json_line(&serde_json::json!({
            "event": "onboarded",
            "professionalName": config.professional_name,
            "phone": config.phone,
            "isOnboarded": config.is_onboarded,
        }));
    }

    fn reset_done(&self) {
        self.output_json(&serde_json::json!({ "reset": true, "ok": true }));
    }

    fn exported(&self, path: &Path, format: DocFormat) {
        self.output_json(&serde_json::json!({
            "exported": path.display().to_string(),
            "format": format.extension(),
            "ok": true
        }));
    }

    fn imported(&self, path: &Path, config: &AppConfig) {
        self.output_json(&serde_json::json!({
            "imported": path.display().to_string(),
            "services": config.services.len(),
            "ok": true
        }));
    }

    fn quick_start(&self, onboarded: bool) {
        self.output_json(&serde_json::json!({
            "name": "coach",
            "onboarded": onboarded,
            "next": if onboarded { "coach show" } else { "coach onboard --name <NAME> --phone <PHONE>" },
            "commands": [
                "show", "set", "image", "gallery", "services", "onboard",
                "reset", "export", "import", "session", "version", "completions"
            ]
        }));
    }

    fn version_info(&self, version: &str, git_sha: Option<&str>, build_time: Option<&str>) {
        self.output_json(&serde_json::json!({
            "version": version,
            "git_sha": git_sha,
            "build_time": build_time
        }));
    }
}
