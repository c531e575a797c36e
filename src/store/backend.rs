//! Key/value storage backends for the configuration store.
//!
//! The store only needs a tiny localStorage-like surface. Keeping it behind a
//! trait lets tests run against memory and inject write failures.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, trace};

use crate::error::{AdminError, Result};

/// Persistent key/value storage.
///
/// # Implementation Notes
///
/// - Values are UTF-8 documents (the store writes JSON)
/// - A successful `set_item` must survive a process restart for durable backends
/// - Capacity limits are reported as [`AdminError::StorageQuotaExceeded`]
pub trait StorageBackend {
    /// Read the value stored under `key`, if any.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Deleting a missing key is not an error.
    fn remove_item(&mut self, key: &str) -> Result<()>;

    /// Short human label for logs and `show` output.
    fn describe(&self) -> String;
}

/// Type alias for boxed trait object.
pub type BoxedBackend = Box<dyn StorageBackend>;

#[derive(Debug, Default)]
struct MemoryInner {
    items: HashMap<String, String>,
    quota_bytes: Option<usize>,
    fail_writes: Option<String>,
    write_count: usize,
}

/// In-process storage.
///
/// Clones share the same map, which models two views open over the same
/// storage file.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStorage {
    /// Create empty storage without a quota.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create empty storage that rejects writes past `quota_bytes`.
    #[must_use]
    pub fn with_quota(quota_bytes: usize) -> Self {
        let storage = Self::default();
        storage.lock_inner().quota_bytes = Some(quota_bytes);
        storage
    }

    /// Make every following write fail with `reason` (or succeed again with `None`).
    pub fn fail_writes(&self, reason: Option<&str>) {
        self.lock_inner().fail_writes = reason.map(str::to_string);
    }

    /// Number of successful writes so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.lock_inner().write_count
    }

    /// Raw value under `key`, bypassing the trait.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.lock_inner().items.get(key).cloned()
    }

    /// Put a raw value under `key`, bypassing quota and failure injection.
    pub fn put_raw(&self, key: &str, value: &str) {
        self.lock_inner()
            .items
            .insert(key.to_string(), value.to_string());
    }

    // A poisoned lock only means another test thread panicked mid-write; the
    // map itself is still usable.
    fn lock_inner(&self) -> MutexGuard<'_, MemoryInner> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        trace!(key, "Memory storage read");
        Ok(self.lock_inner().items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        let mut inner = self.lock_inner();
        if let Some(reason) = &inner.fail_writes {
            return Err(AdminError::StorageWrite(reason.clone()));
        }
        if let Some(quota) = inner.quota_bytes {
            let others: usize = inner
                .items
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > quota {
                return Err(AdminError::StorageQuotaExceeded { needed, quota });
            }
        }
        inner.items.insert(key.to_string(), value.to_string());
        inner.write_count += 1;
        debug!(key, bytes = value.len(), "Memory storage write");
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.lock_inner().items.remove(key);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
