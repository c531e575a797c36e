//! Boundary to the service detail editor and to interactive confirmation.
//!
//! The draft editor never looks inside the service editor: it hands over the
//! service being edited (or nothing, for a new one) and gets back one of three
//! outcomes.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{AdminError, Result};
use crate::model::Service;

/// What the service editor decided.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorOutcome {
    /// Insert or replace this service.
    Save(Service),
    /// Remove the service with this id.
    Delete(String),
    /// Leave everything as it was.
    Cancel,
}

/// A service detail editor.
pub trait ServiceEditor {
    /// Edit `initial`, or create a new service when it is `None`.
    fn edit(&mut self, initial: Option<&Service>) -> EditorOutcome;
}

impl<F> ServiceEditor for F
where
    F: FnMut(Option<&Service>) -> EditorOutcome,
{
    fn edit(&mut self, initial: Option<&Service>) -> EditorOutcome {
        self(initial)
    }
}

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    /// Returns true only on explicit confirmation.
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Confirmation that always answers the same way (for `--yes` and scripts).
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Confirm for FixedAnswer {
    fn confirm(&mut self, prompt: &str) -> bool {
        debug!(prompt, answer = self.0, "Confirmation answered without prompting");
        self.0
    }
}

/// Asks y/N on the terminal. Declines when nobody is attending it.
#[derive(Debug, Clone)]
pub struct TerminalConfirm {
    term: console::Term,
}

impl Default for TerminalConfirm {
    fn default() -> Self {
        Self {
            term: console::Term::stderr(),
        }
    }
}

impl Confirm for TerminalConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        if !self.term.is_term() {
            debug!(prompt, "No terminal attached, declining");
            return false;
        }
        if self.term.write_str(&format!("{prompt} [y/N] ")).is_err() {
            return false;
        }
        self.term
            .read_line()
            .is_ok_and(|answer| matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
    }
}

/// Set of changes to apply to a service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServicePatch {
    pub title: Option<String>,
    pub tag: Option<String>,
    pub duration: Option<String>,
    pub image: Option<String>,
    pub popular: Option<bool>,
    pub details: BTreeMap<String, Value>,
}

impl ServicePatch {
    /// True when the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the patch on top of `service`.
    pub fn apply(&self, service: &mut Service) {
        if let Some(title) = &self.title {
            service.title.clone_from(title);
        }
        if let Some(tag) = &self.tag {
            service.tag.clone_from(tag);
        }
        if let Some(duration) = &self.duration {
            service.duration.clone_from(duration);
        }
        if let Some(image) = &self.image {
            service.image.clone_from(image);
        }
        if let Some(popular) = self.popular {
            service.popular = popular;
        }
        for (key, value) in &self.details {
            if Service::is_field_key(key) {
                warn!(key = %key, "Ignoring detail that names a service field");
                continue;
            }
            if value.is_null() {
                service.details.remove(key);
            } else {
                service.details.insert(key.clone(), value.clone());
            }
        }
    }

    /// Reject details that would shadow a named service field.
    pub fn validate(&self) -> Result<()> {
        match self.details.keys().find(|k| Service::is_field_key(k)) {
            Some(key) => Err(AdminError::ReservedDetailKey { key: key.clone() }),
            None => Ok(()),
        }
    }

    /// Build a service from the patch alone. A title is required.
    pub fn build_new(&self) -> Result<Service> {
        let has_title = self.title.as_deref().is_some_and(|t| !t.trim().is_empty());
        if !has_title {
            return Err(AdminError::Validation {
                missing: vec!["title".to_string()],
            });
        }
        let mut service = Service::blank();
        self.apply(&mut service);
        Ok(service)
    }
}

/// Parse a `key=value` detail assignment.
///
/// Values that parse as JSON (numbers, booleans, arrays, `null`) are kept as
/// such; anything else is stored as a string. `null` removes the detail.
/// Keys naming a service field are rejected.
pub fn parse_detail(raw: &str) -> Result<(String, Value)> {
    let (key, value) = parse_assignment(raw)?;
    if Service::is_field_key(&key) {
        return Err(AdminError::ReservedDetailKey { key });
    }
    Ok((key, value))
}

/// Split and type a `key=value` word without checking the key.
pub fn parse_assignment(raw: &str) -> Result<(String, Value)> {
    let (key, value) = raw.split_once('=').ok_or_else(|| {
        AdminError::Other(format!("Invalid detail '{raw}': expected key=value"))
    })?;
    let key = key.trim();
    if key.is_empty() {
        return Err(AdminError::Other(format!("Invalid detail '{raw}': empty key")));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Non-interactive editor driven by a prepared patch.
///
/// Editing an existing service applies the patch to it; creating one builds a
/// fresh service with a new id. A new service without a title cancels and
/// keeps the validation error for the caller.
#[derive(Debug, Default)]
pub struct PatchEditor {
    patch: ServicePatch,
    error: Option<AdminError>,
}

impl PatchEditor {
    #[must_use]
    pub fn new(patch: ServicePatch) -> Self {
        Self { patch, error: None }
    }

    /// Error that made the editor cancel, if any.
    pub fn take_error(&mut self) -> Option<AdminError> {
        self.error.take()
    }
}

impl ServiceEditor for PatchEditor {
    fn edit(&mut self, initial: Option<&Service>) -> EditorOutcome {
        if let Err(e) = self.patch.validate() {
            self.error = Some(e);
            return EditorOutcome::Cancel;
        }
        match initial {
            Some(existing) => {
                let mut service = existing.clone();
                self.patch.apply(&mut service);
                EditorOutcome::Save(service)
            }
            None => match self.patch.build_new() {
                Ok(service) => EditorOutcome::Save(service),
                Err(e) => {
                    self.error = Some(e);
                    EditorOutcome::Cancel
                }
            },
        }
    }
}

/// Editor that asks for deletion of whatever it is given.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeleteEditor;

impl ServiceEditor for DeleteEditor {
    fn edit(&mut self, initial: Option<&Service>) -> EditorOutcome {
        initial.map_or(EditorOutcome::Cancel, |s| EditorOutcome::Delete(s.id.clone()))
    }
}
