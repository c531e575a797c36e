//! Draft editing of the configuration record.
//!
//! A [`DraftEditor`] holds a view-local copy of the record and the snapshot it
//! was cloned from. Edits only touch the draft until [`DraftEditor::commit`]
//! pushes the whole record through the store.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, trace, warn};

use crate::editor::{Confirm, EditorOutcome};
use crate::error::{AdminError, Result};
use crate::gallery;
use crate::ingest::EmbeddedImage;
use crate::model::{AppConfig, Change, Field, ImageSlot, Service, diff};
use crate::store::ConfigStore;

/// How long the acknowledgment stays up after a full commit.
pub const GLOBAL_SAVE_ACK: Duration = Duration::from_secs(3);

/// How long the acknowledgment stays up after saving a service.
pub const SERVICE_SAVE_ACK: Duration = Duration::from_secs(2);

/// Collapsible dashboard sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Identity,
    Appearance,
    Services,
}

impl Section {
    pub const ALL: [Self; 3] = [Self::Identity, Self::Appearance, Self::Services];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Appearance => "appearance",
            Self::Services => "services",
        }
    }
}

/// Which service the editor is working on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "target", content = "id", rename_all = "lowercase")]
pub enum EditTarget {
    Existing(String),
    New,
}

/// What the admin view is showing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Dashboard,
    Editor { target: EditTarget },
}

/// Transient save acknowledgment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SaveStatus {
    #[default]
    Neutral,
    Saved { until: Instant },
    Failed { reason: String },
}

impl SaveStatus {
    /// Short label for display.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Saved { .. } => "saved",
            Self::Failed { .. } => "failed",
        }
    }
}

/// How an editor outcome was folded into the draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Finished {
    Saved,
    Deleted,
    Declined,
    Cancelled,
}

/// View-local working copy of the configuration record.
#[derive(Debug, Clone)]
pub struct DraftEditor {
    draft: AppConfig,
    snapshot: AppConfig,
    mode: Mode,
    expanded: Option<Section>,
    status: SaveStatus,
}

impl DraftEditor {
    /// Clone draft and snapshot from the store.
    #[must_use]
    pub fn new(store: &ConfigStore) -> Self {
        let snapshot = store.read();
        Self {
            draft: snapshot.clone(),
            snapshot,
            mode: Mode::Dashboard,
            expanded: None,
            status: SaveStatus::Neutral,
        }
    }

    #[must_use]
    pub const fn draft(&self) -> &AppConfig {
        &self.draft
    }

    #[must_use]
    pub const fn snapshot(&self) -> &AppConfig {
        &self.snapshot
    }

    #[must_use]
    pub const fn mode(&self) -> &Mode {
        &self.mode
    }

    #[must_use]
    pub const fn expanded(&self) -> Option<Section> {
        self.expanded
    }

    /// Expand `section`, collapsing any other. Toggling the open one closes it.
    pub fn toggle_section(&mut self, section: Section) {
        self.expanded = if self.expanded == Some(section) {
            None
        } else {
            Some(section)
        };
        trace!(?section, expanded = ?self.expanded, "Section toggled");
    }

    /// Set one scalar field. Returns whether the value changed.
    pub fn set_field(&mut self, field: Field, value: &str) -> Result<bool> {
        let changed = self.draft.set_field(field, value)?;
        if changed {
            debug!(field = field.key(), "Draft field edited");
        }
        self.status = SaveStatus::Neutral;
        Ok(changed)
    }

    /// Put an ingested image into a slot.
    pub fn set_image(&mut self, slot: ImageSlot, image: &EmbeddedImage) {
        debug!(%slot, width = image.width, height = image.height, "Draft image set");
        image.data_url.clone_into(self.draft.image_mut(slot));
        self.status = SaveStatus::Neutral;
    }

    /// Use a built-in gallery image as the hero, skipping ingestion.
    pub fn select_gallery_hero(&mut self, index: usize) -> Result<()> {
        let entry = gallery::get(index)?;
        debug!(index, label = entry.label, "Gallery hero selected");
        self.draft.hero_image = entry.full.to_string();
        self.status = SaveStatus::Neutral;
        Ok(())
    }

    /// Replace the service with the same id, or append it.
    pub fn upsert_service(&mut self, service: Service) {
        if let Some(existing) = self.draft.services.iter_mut().find(|s| s.id == service.id) {
            trace!(id = %service.id, "Service replaced in draft");
            *existing = service;
        } else {
            trace!(id = %service.id, "Service appended to draft");
            self.draft.services.push(service);
        }
    }

    /// Remove a service after confirmation.
    ///
    /// Returns `Ok(false)` and leaves the list alone if the user declines.
    pub fn delete_service(&mut self, id: &str, confirm: &mut dyn Confirm) -> Result<bool> {
        let Some(pos) = self.draft.services.iter().position(|s| s.id == id) else {
            return Err(AdminError::ServiceNotFound { id: id.to_string() });
        };
        let prompt = format!("Delete service '{}'?", self.draft.services[pos].title);
        if !confirm.confirm(&prompt) {
            debug!(id, "Service deletion declined");
            return Ok(false);
        }
        self.draft.services.remove(pos);
        debug!(id, "Service removed from draft");
        Ok(true)
    }

    /// Persist the whole draft through the store.
    pub fn commit(&mut self, store: &mut ConfigStore) -> Result<()> {
        self.persist(store, GLOBAL_SAVE_ACK)?;
        info!(revision = %store.revision(), "Draft committed");
        Ok(())
    }

    /// Reset the store to defaults and start over from them.
    pub fn discard(&mut self, store: &mut ConfigStore) -> Result<()> {
        store.reset()?;
        self.rebase(store);
        info!("Draft discarded");
        Ok(())
    }

    /// Re-clone draft and snapshot from the store, dropping local edits.
    pub fn rebase(&mut self, store: &ConfigStore) {
        self.snapshot = store.read();
        self.draft = self.snapshot.clone();
        self.status = SaveStatus::Neutral;
    }

    /// Whether the draft differs from the last snapshot.
    #[must_use]
    pub fn is_unsaved(&self) -> bool {
        self.draft != self.snapshot
    }

    /// Every difference between snapshot and draft.
    #[must_use]
    pub fn pending_changes(&self) -> Vec<Change> {
        diff(&self.snapshot, &self.draft)
    }

    /// Save acknowledgment as seen at `now`. An expired `Saved` reads as neutral.
    #[must_use]
    pub fn status_at(&self, now: Instant) -> SaveStatus {
        match &self.status {
            SaveStatus::Saved { until } if now >= *until => SaveStatus::Neutral,
            other => other.clone(),
        }
    }

    /// Switch to the service editor for `id`, or for a new service.
    pub fn open_editor(&mut self, id: Option<&str>) -> Result<()> {
        let target = match id {
            Some(id) if self.draft.service(id).is_none() => {
                return Err(AdminError::ServiceNotFound { id: id.to_string() });
            }
            Some(id) => EditTarget::Existing(id.to_string()),
            None => EditTarget::New,
        };
        debug!(?target, "Service editor opened");
        self.mode = Mode::Editor { target };
        Ok(())
    }

    /// Return to the dashboard without applying anything.
    pub fn close_editor(&mut self) {
        self.mode = Mode::Dashboard;
    }

    /// Service the editor is working on. `None` when creating or not editing.
    #[must_use]
    pub fn editing_service(&self) -> Option<&Service> {
        match &self.mode {
            Mode::Editor {
                target: EditTarget::Existing(id),
            } => self.draft.service(id),
            _ => None,
        }
    }

    /// Fold a service editor outcome into the draft and the store.
    pub fn finish_editing(
        &mut self,
        outcome: EditorOutcome,
        store: &mut ConfigStore,
        confirm: &mut dyn Confirm,
    ) -> Result<Finished> {
        match outcome {
            EditorOutcome::Save(service) => {
                let id = service.id.clone();
                self.upsert_service(service);
                self.persist(store, SERVICE_SAVE_ACK)?;
                self.mode = Mode::Dashboard;
                info!(id = %id, "Service saved");
                Ok(Finished::Saved)
            }
            EditorOutcome::Delete(id) => {
                if !self.delete_service(&id, confirm)? {
                    return Ok(Finished::Declined);
                }
                self.persist(store, Duration::ZERO)?;
                self.status = SaveStatus::Neutral;
                self.mode = Mode::Dashboard;
                info!(id = %id, "Service deleted");
                Ok(Finished::Deleted)
            }
            EditorOutcome::Cancel => {
                self.mode = Mode::Dashboard;
                Ok(Finished::Cancelled)
            }
        }
    }

    fn persist(&mut self, store: &mut ConfigStore, ack: Duration) -> Result<()> {
        if let Err(e) = store.replace(self.draft.clone()) {
            warn!(error = %e, "Save failed, draft kept");
            self.status = SaveStatus::Failed {
                reason: e.to_string(),
            };
            return Err(e);
        }
        self.snapshot = self.draft.clone();
        self.status = SaveStatus::Saved {
            until: Instant::now() + ack,
        };
        Ok(())
    }
}
