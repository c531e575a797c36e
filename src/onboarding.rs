//! First-run onboarding: collect name and phone, play a fixed sequence of
//! progress messages, then mark the record as onboarded.
//!
//! The flow is a small state machine ([`OnboardingPhase`]) driven by timer
//! ticks. [`OnboardingFlow::run`] drives it on the tokio clock; tests can
//! call [`OnboardingFlow::advance`] directly.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::draft::DraftEditor;
use crate::error::{AdminError, Result};
use crate::store::ConfigStore;

/// Default time each progress message stays on screen.
pub const STEP_INTERVAL: Duration = Duration::from_millis(800);

/// Shown while the first interval runs.
pub const INITIAL_MESSAGE: &str = "Starting system...";

/// Where the flow is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OnboardingPhase {
    Form,
    Processing,
    Complete,
}

/// One progress message and how long it stays up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressStep {
    pub message: String,
    #[serde(with = "millis")]
    pub duration: Duration,
}

/// Result of one timer tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum Advance {
    /// Show this message next. `index` is 1-based.
    Message {
        index: usize,
        total: usize,
        message: String,
    },
    /// The record has been written and the flow is done.
    Completed,
}

/// The fixed sequence of progress messages.
#[must_use]
pub fn progress_steps(name: &str, interval: Duration) -> Vec<ProgressStep> {
    [
        "Connecting to server...".to_string(),
        "Creating professional profile...".to_string(),
        format!("Setting up {name}'s account..."),
        "Linking WhatsApp...".to_string(),
        "Building admin dashboard...".to_string(),
        "Applying visual theme...".to_string(),
        "Finishing setup...".to_string(),
    ]
    .into_iter()
    .map(|message| ProgressStep {
        message,
        duration: interval,
    })
    .collect()
}

/// Keep only the digits of a phone number.
#[must_use]
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Onboarding state machine.
#[derive(Debug, Clone)]
pub struct OnboardingFlow {
    name: String,
    phone: String,
    phase: OnboardingPhase,
    interval: Duration,
    steps: Vec<ProgressStep>,
    shown: usize,
}

impl Default for OnboardingFlow {
    fn default() -> Self {
        Self::new(STEP_INTERVAL)
    }
}

impl OnboardingFlow {
    /// Start in the form phase with the given step interval.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            name: String::new(),
            phone: String::new(),
            phase: OnboardingPhase::Form,
            interval,
            steps: Vec::new(),
            shown: 0,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> OnboardingPhase {
        self.phase
    }

    pub fn set_name(&mut self, name: &str) {
        name.clone_into(&mut self.name);
    }

    pub fn set_phone(&mut self, phone: &str) {
        phone.clone_into(&mut self.phone);
    }

    /// Message currently on screen while processing.
    #[must_use]
    pub fn current_message(&self) -> Option<&str> {
        match (self.phase, self.shown) {
            (OnboardingPhase::Processing, 0) => Some(INITIAL_MESSAGE),
            (OnboardingPhase::Processing, n) => self.steps.get(n - 1).map(|s| s.message.as_str()),
            _ => None,
        }
    }

    /// Validate the form and start processing.
    ///
    /// Name and phone must both be non-empty after trimming.
    #[instrument(skip(self))]
    pub fn submit(&mut self) -> Result<()> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name".to_string());
        }
        if self.phone.trim().is_empty() {
            missing.push("phone".to_string());
        }
        if !missing.is_empty() {
            return Err(AdminError::Validation { missing });
        }
        self.steps = progress_steps(self.name.trim(), self.interval);
        self.shown = 0;
        self.phase = OnboardingPhase::Processing;
        debug!(steps = self.steps.len(), "Onboarding submitted");
        Ok(())
    }

    /// Handle one timer tick.
    ///
    /// Shows the next message, or after the last one writes name, digits-only
    /// phone and the onboarded flag through the store and rebases the draft.
    pub fn advance(&mut self, store: &mut ConfigStore, draft: &mut DraftEditor) -> Result<Advance> {
        match self.phase {
            OnboardingPhase::Form => {
                return Err(AdminError::Other(
                    "Onboarding has not been submitted".to_string(),
                ));
            }
            OnboardingPhase::Complete => return Ok(Advance::Completed),
            OnboardingPhase::Processing => {}
        }

        if self.shown < self.steps.len() {
            self.shown += 1;
            let message = self.steps[self.shown - 1].message.clone();
            debug!(step = self.shown, %message, "Onboarding progress");
            return Ok(Advance::Message {
                index: self.shown,
                total: self.steps.len(),
                message,
            });
        }

        self.finalize(store, draft)?;
        Ok(Advance::Completed)
    }

    /// Drive the flow to completion on the tokio clock.
    ///
    /// Every step lasts its full duration. Dropping the future before the
    /// last tick leaves the store untouched.
    pub async fn run<F>(
        &mut self,
        store: &mut ConfigStore,
        draft: &mut DraftEditor,
        mut on_step: F,
    ) -> Result<()>
    where
        F: FnMut(&Advance),
    {
        if self.phase == OnboardingPhase::Form {
            self.submit()?;
        }
        loop {
            tokio::time::sleep(self.interval).await;
            let step = self.advance(store, draft)?;
            on_step(&step);
            if step == Advance::Completed {
                return Ok(());
            }
        }
    }

    fn finalize(&mut self, store: &mut ConfigStore, draft: &mut DraftEditor) -> Result<()> {
        let mut config = store.read();
        self.name.trim().clone_into(&mut config.professional_name);
        config.phone = normalize_phone(&self.phone);
        config.is_onboarded = true;
        store.replace(config)?;
        draft.rebase(store);
        self.phase = OnboardingPhase::Complete;
        info!(name = %self.name.trim(), "Onboarding complete");
        Ok(())
    }
}

mod millis {
    use std::time::Duration;

    use serde::Serializer;

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u128(d.as_millis())
    }
}
