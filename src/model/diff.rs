//! Structural comparison of two configuration records.
//!
//! Walks the record field by field so that the list of pending changes stays
//! accurate as fields are added, without comparing serialized text.

use serde::Serialize;

use super::config::{AppConfig, Field, ImageSlot};
use super::service::Service;

/// One difference between a base record and an edited record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Change {
    /// A scalar field holds a different value.
    Field {
        field: &'static str,
        from: String,
        to: String,
    },
    /// An image slot points at a different image.
    Image { slot: ImageSlot },
    /// The onboarding flag flipped.
    Onboarding { to: bool },
    /// A service exists only in the edited record.
    ServiceAdded { id: String, title: String },
    /// A service exists only in the base record.
    ServiceRemoved { id: String, title: String },
    /// A service with the same id differs in these fields.
    ServiceModified { id: String, fields: Vec<&'static str> },
    /// Same services, different order.
    ServicesReordered,
}

/// List every difference between `base` and `edited`.
///
/// Returns an empty list exactly when the two records are equal.
#[must_use]
pub fn diff(base: &AppConfig, edited: &AppConfig) -> Vec<Change> {
    let mut changes = Vec::new();

    for field in Field::ALL {
        let (from, to) = (base.field(field), edited.field(field));
        if from != to {
            changes.push(Change::Field {
                field: field.key(),
                from,
                to,
            });
        }
    }

    for slot in [ImageSlot::Profile, ImageSlot::Hero] {
        if base.image(slot) != edited.image(slot) {
            changes.push(Change::Image { slot });
        }
    }

    if base.is_onboarded != edited.is_onboarded {
        changes.push(Change::Onboarding {
            to: edited.is_onboarded,
        });
    }

    diff_services(&base.services, &edited.services, &mut changes);
    changes
}

fn diff_services(base: &[Service], edited: &[Service], changes: &mut Vec<Change>) {
    for old in base {
        match edited.iter().find(|s| s.id == old.id) {
            None => changes.push(Change::ServiceRemoved {
                id: old.id.clone(),
                title: old.title.clone(),
            }),
            Some(new) => {
                let fields = service_fields_changed(old, new);
                if !fields.is_empty() {
                    changes.push(Change::ServiceModified {
                        id: old.id.clone(),
                        fields,
                    });
                }
            }
        }
    }

    for new in edited {
        if !base.iter().any(|s| s.id == new.id) {
            changes.push(Change::ServiceAdded {
                id: new.id.clone(),
                title: new.title.clone(),
            });
        }
    }

    // Order only matters when the same ids survive on both sides.
    let kept_base: Vec<&str> = base
        .iter()
        .map(|s| s.id.as_str())
        .filter(|id| edited.iter().any(|s| s.id == *id))
        .collect();
    let kept_edited: Vec<&str> = edited
        .iter()
        .map(|s| s.id.as_str())
        .filter(|id| base.iter().any(|s| s.id == *id))
        .collect();
    if kept_base != kept_edited {
        changes.push(Change::ServicesReordered);
    }
}

fn service_fields_changed(old: &Service, new: &Service) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if old.title != new.title {
        fields.push("title");
    }
    if old.tag != new.tag {
        fields.push("tag");
    }
    if old.duration != new.duration {
        fields.push("duration");
    }
    if old.image != new.image {
        fields.push("image");
    }
    if old.popular != new.popular {
        fields.push("popular");
    }
    if old.details != new.details {
        fields.push("details");
    }
    fields
}
