//! Configuration store: the single source of truth for the profile record.
//!
//! The store is an explicit handle passed to whoever needs it. It owns the
//! current [`AppConfig`], persists every replacement through a
//! [`StorageBackend`], and notifies subscribers synchronously.
//!
//! # Usage
//!
//! ```ignore
//! use coach::store::{ConfigStore, MemoryStorage};
//!
//! let mut store = ConfigStore::open(Box::new(MemoryStorage::new()));
//! let id = store.subscribe(|config| println!("now: {}", config.professional_name));
//!
//! let mut next = store.read();
//! next.slogan = "Stronger every week".into();
//! store.replace(next)?;
//! store.unsubscribe(id);
//! ```

mod backend;
mod sqlite;

pub use backend::{BoxedBackend, MemoryStorage, StorageBackend};
pub use sqlite::{DEFAULT_QUOTA_BYTES, SqliteStorage, default_db_path};

use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument, warn};

use crate::error::{AdminError, Result};
use crate::model::AppConfig;

/// Well-known storage key holding the serialized record.
pub const STORAGE_KEY: &str = "coach.app_config";

/// Where an unparseable record is moved before defaults take over.
pub const CORRUPT_KEY: &str = "coach.app_config.corrupt";

/// Handle returned by [`ConfigStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&AppConfig)>;

/// Process-wide configuration state with read / replace / reset.
pub struct ConfigStore {
    backend: BoxedBackend,
    current: AppConfig,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl ConfigStore {
    /// Open the store over `backend`, loading the persisted record.
    ///
    /// A missing record means defaults (onboarding incomplete). An unreadable
    /// or corrupt record is logged and also falls back to defaults, so opening
    /// never fails. A corrupt document is first moved to [`CORRUPT_KEY`].
    #[instrument(skip_all, fields(backend = %backend.describe()))]
    pub fn open(mut backend: BoxedBackend) -> Self {
        let current = match backend.get_item(STORAGE_KEY) {
            Ok(raw) => parse(raw.as_deref()).unwrap_or_else(|e| {
                warn!(error = %e, "Stored configuration unusable, using defaults");
                if let Some(raw) = raw {
                    quarantine(backend.as_mut(), &raw);
                }
                AppConfig::default()
            }),
            Err(e) => {
                warn!(error = %e, "Stored configuration unreadable, using defaults");
                AppConfig::default()
            }
        };
        info!(onboarded = current.is_onboarded, "Configuration loaded");
        Self {
            backend,
            current,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Current persisted record.
    #[must_use]
    pub fn read(&self) -> AppConfig {
        self.current.clone()
    }

    /// Borrow the current record without cloning.
    #[must_use]
    pub const fn current(&self) -> &AppConfig {
        &self.current
    }

    /// Overwrite the whole record, persist it and notify subscribers.
    ///
    /// All-or-nothing: if storage rejects the write, the in-memory record is
    /// unchanged, nobody is notified and the error is returned.
    #[instrument(skip_all, fields(services = config.services.len()))]
    pub fn replace(&mut self, config: AppConfig) -> Result<()> {
        let json = serde_json::to_string(&config)
            .map_err(|e| AdminError::StorageWrite(format!("Failed to serialize: {e}")))?;
        if let Err(e) = self.backend.set_item(STORAGE_KEY, &json) {
            warn!(error = %e, "Storage rejected configuration write");
            return Err(e);
        }
        self.current = config;
        debug!(bytes = json.len(), revision = %self.revision(), "Configuration replaced");
        self.notify();
        Ok(())
    }

    /// Restore the built-in defaults, persist and notify.
    #[instrument(skip_all)]
    pub fn reset(&mut self) -> Result<()> {
        self.replace(AppConfig::default())?;
        info!("Configuration reset to defaults");
        Ok(())
    }

    /// Re-read storage and adopt a record written by another view.
    ///
    /// Returns true (and notifies) if the stored record differs from the
    /// current one. Last write wins; nothing is merged.
    #[instrument(skip_all)]
    pub fn reload(&mut self) -> Result<bool> {
        let stored = load(self.backend.as_ref())?;
        if stored == self.current {
            return Ok(false);
        }
        info!("Configuration changed in storage");
        self.current = stored;
        self.notify();
        Ok(true)
    }

    /// Register a callback run after every successful replace, reset or reload.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&AppConfig) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        debug!(id = id.0, "Subscriber added");
        id
    }

    /// Remove a subscriber. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        before != self.subscribers.len()
    }

    /// Short fingerprint of the current record.
    #[must_use]
    pub fn revision(&self) -> String {
        revision_of(&self.current)
    }

    /// Label of the storage backend.
    #[must_use]
    pub fn location(&self) -> String {
        self.backend.describe()
    }

    fn notify(&mut self) {
        let config = &self.current;
        for (_, subscriber) in &mut self.subscribers {
            subscriber(config);
        }
    }
}

/// Short SHA-256 fingerprint of a record's canonical JSON form.
#[must_use]
pub fn revision_of(config: &AppConfig) -> String {
    let json = serde_json::to_vec(config).unwrap_or_default();
    let digest = Sha256::digest(&json);
    hex::encode(&digest[..6])
}

fn load(backend: &dyn StorageBackend) -> Result<AppConfig> {
    parse(backend.get_item(STORAGE_KEY)?.as_deref())
}

fn parse(stored: Option<&str>) -> Result<AppConfig> {
    match stored {
        None => {
            debug!("No stored configuration, using defaults");
            Ok(AppConfig::default())
        }
        Some(json) => serde_json::from_str(json)
            .map_err(|e| AdminError::StorageRead(format!("Corrupt configuration: {e}"))),
    }
}

fn quarantine(backend: &mut dyn StorageBackend, raw: &str) {
    let moved = backend
        .set_item(CORRUPT_KEY, raw)
        .and_then(|()| backend.remove_item(STORAGE_KEY));
    match moved {
        Ok(()) => warn!(key = CORRUPT_KEY, bytes = raw.len(), "Corrupt configuration set aside"),
        Err(e) => warn!(error = %e, "Could not set corrupt configuration aside"),
    }
}
