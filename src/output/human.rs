//! Human-friendly output implementation using console styling.

use std::cell::RefCell;
use std::path::Path;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, instrument, trace};

use crate::error::AdminError;
use crate::gallery::GalleryImage;
use crate::ingest::{EmbeddedImage, ImageRef};
use crate::model::{AppConfig, Field, ImageSlot, Service};
use crate::onboarding::Advance;
use crate::session::Screen;
use crate::settings::DocFormat;
use crate::theme::AdminTheme;

use super::{Output, ProfileView};

/// Styled terminal output implementation for human users.
pub struct HumanOutput {
    theme: AdminTheme,
    spinner: RefCell<Option<ProgressBar>>,
}

impl Default for HumanOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl HumanOutput {
    #[must_use]
    pub fn new() -> Self {
        debug!("Creating HumanOutput");
        Self {
            theme: AdminTheme::default(),
            spinner: RefCell::new(None),
        }
    }

    fn row(&self, label: &str, value: &str) {
        println!(
            "  {} {}",
            self.theme.label.apply_to(format!("{label:<10}")),
            self.theme.value.apply_to(value)
        );
    }

    fn service_line(&self, index: usize, service: &Service) {
        let star = if service.popular {
            format!(" {}", self.theme.badge.apply_to(" popular "))
        } else {
            String::new()
        };
        println!(
            "  {:>2}. {}{}  {}",
            index + 1,
            self.theme.value.apply_to(&service.title),
            star,
            self.theme.muted.apply_to(format!(
                "[{}] {} / {}",
                service.id, service.tag, service.duration
            ))
        );
    }
}

impl Output for HumanOutput {
    fn success(&self, message: &str) {
        println!("{} {message}", self.theme.success.apply_to("[OK]"));
    }

    #[instrument(skip(self))]
    fn error(&self, error: &AdminError) {
        debug!(
            error = %error,
            recoverable = error.is_user_recoverable(),
            "Outputting error"
        );
        eprintln!(
            "{} {}",
            self.theme.error.apply_to("Error:"),
            style(error).bold()
        );
        if let Some(suggestion) = error.suggestion() {
            eprintln!("{} {suggestion}", self.theme.muted.apply_to("Hint:"));
        }
    }

    fn warning(&self, message: &str) {
        println!("{} {message}", self.theme.warning.apply_to("[WARN]"));
    }

    fn info(&self, message: &str) {
        println!("{} {message}", self.theme.accent.apply_to("[INFO]"));
    }

    #[instrument(skip_all)]
    fn profile(&self, view: &ProfileView) {
        let config = &view.config;
        let theme = AdminTheme::for_color(config.theme_color);

        println!("{}", theme.header.apply_to(&config.professional_name));
        if view.screen == Screen::Onboarding {
            println!(
                "  {}",
                self.theme
                    .warning
                    .apply_to("Onboarding not completed: run `coach onboard`")
            );
        }
        self.row("Slogan", &config.slogan);
        self.row("Phone", &config.phone);
        self.row("Location", &config.location_text);
        self.row("Instagram", &config.instagram_url);
        self.row(
            "Theme",
            &format!(
                "{} ({})",
                config.theme_color.label(),
                config.theme_color.as_str()
            ),
        );
        self.row("Profile", &view.images.profile);
        self.row("Hero", &view.images.hero);

        println!();
        println!("{}", theme.accent.apply_to("Services"));
        for (i, service) in config.services.iter().enumerate() {
            self.service_line(i, service);
        }

        println!();
        println!(
            "  {}",
            self.theme
                .muted
                .apply_to(format!("revision {} | {}", view.revision, view.storage))
        );
    }

    fn field_set(&self, field: Field, value: &str, changed: bool) {
        if changed {
            self.success(&format!("{field} set to \"{value}\""));
        } else {
            self.info(&format!("{field} already \"{value}\""));
        }
    }

    fn image_set(&self, slot: ImageSlot, image: &EmbeddedImage) {
        let resized = if image.was_resized() {
            format!(
                " (resized from {}x{})",
                image.source_width, image.source_height
            )
        } else {
            String::new()
        };
        self.success(&format!(
            "{slot} image updated: {}x{}, {}{resized}",
            image.width,
            image.height,
            ImageRef::classify(&image.data_url).describe()
        ));
    }

    fn gallery(&self, entries: &[GalleryImage], current: Option<usize>) {
        println!("{}", self.theme.header.apply_to("Hero gallery"));
        for (i, entry) in entries.iter().enumerate() {
            let marker = if current == Some(i) { "*" } else { " " };
            println!(
                " {} {}  {}",
                self.theme.accent.apply_to(marker),
                self.theme.value.apply_to(format!("{i}. {}", entry.label)),
                self.theme.muted.apply_to(entry.thumb)
            );
        }
    }

    fn hero_selected(&self, index: usize, entry: &GalleryImage) {
        self.success(&format!("Hero image set to gallery #{index} ({})", entry.label));
    }

    fn service_list(&self, services: &[Service]) {
        if services.is_empty() {
            self.warning("No services yet. Add one with `coach services add --title ...`");
            return;
        }
        for (i, service) in services.iter().enumerate() {
            self.service_line(i, service);
        }
    }

    fn service_saved(&self, service: &Service, created: bool) {
        let verb = if created { "added" } else { "saved" };
        self.success(&format!("Service \"{}\" {verb} ({})", service.title, service.id));
    }

    fn service_deleted(&self, id: &str) {
        self.success(&format!("Service {id} deleted"));
    }

    fn onboarding_started(&self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(template) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(template);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        *self.spinner.borrow_mut() = Some(spinner);
    }

    fn onboarding_step(&self, step: &Advance) {
        trace!(?step, "Onboarding step");
        let spinner = self.spinner.borrow();
        match (step, spinner.as_ref()) {
            (Advance::Message { message, .. }, Some(spinner)) => {
                spinner.set_message(message.clone());
            }
            (Advance::Completed, Some(spinner)) => spinner.finish_and_clear(),
            _ => {}
        }
    }

    fn onboarded(&self, config: &AppConfig) {
        self.spinner.borrow_mut().take();
        self.success(&format!(
            "Welcome, {}! Your profile is ready.",
            config.first_name()
        ));
    }

    fn reset_done(&self) {
        self.success("Configuration reset to defaults");
    }

    fn exported(&self, path: &Path, format: DocFormat) {
        self.success(&format!(
            "Exported to {} ({})",
            path.display(),
            format.extension()
        ));
    }

    fn imported(&self, path: &Path, config: &AppConfig) {
        self.success(&format!(
            "Imported {} ({} services)",
            path.display(),
            config.services.len()
        ));
    }

    fn quick_start(&self, onboarded: bool) {
        println!("{}", self.theme.header.apply_to("coach - trainer profile admin"));
        println!();
        if !onboarded {
            println!(
                "  {}",
                self.theme.warning.apply_to("Start here:")
            );
            println!("    coach onboard --name \"Your Name\" --phone \"(11) 99999-9999\"");
            println!();
        }
        for (cmd, what) in [
            ("coach show", "view the profile"),
            ("coach set slogan \"...\"", "edit a field"),
            ("coach image hero photo.jpg", "upload an image"),
            ("coach gallery --select 2", "pick a built-in hero"),
            ("coach services list", "manage services"),
            ("coach session", "interactive editing"),
        ] {
            println!(
                "    {:<30} {}",
                self.theme.accent.apply_to(cmd),
                self.theme.muted.apply_to(what)
            );
        }
    }

    fn version_info(&self, version: &str, git_sha: Option<&str>, build_time: Option<&str>) {
        println!("{} {}", self.theme.header.apply_to("coach"), version);
        if let Some(sha) = git_sha {
            self.row("Git SHA", sha);
        }
        if let Some(time) = build_time {
            self.row("Built", time);
        }
        if let Some(rustc) = option_env!("VERGEN_RUSTC_SEMVER") {
            self.row("Rust", rustc);
        }
        if let Some(target) = option_env!("VERGEN_CARGO_TARGET_TRIPLE") {
            self.row("Target", target);
        }
    }
}
