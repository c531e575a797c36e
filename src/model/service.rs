//! Service offerings listed on the public profile.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single service (plan) offered by the trainer.
///
/// Fields beyond the summary card belong to the service editor. They are kept
/// as an opaque map so that whatever the editor writes survives a round trip
/// through storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Unique within the service list.
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub popular: bool,
    /// Editor-owned detail fields (description, price, highlights, ...).
    #[serde(flatten)]
    pub details: BTreeMap<String, Value>,
}

impl Service {
    /// Serialized names of the named fields. `details` keys must avoid them,
    /// or the flattened document carries the same key twice.
    pub const FIELD_KEYS: [&'static str; 6] = ["id", "title", "tag", "duration", "image", "popular"];

    /// True if `key` names one of the fixed fields.
    #[must_use]
    pub fn is_field_key(key: &str) -> bool {
        Self::FIELD_KEYS.contains(&key)
    }

    /// Create a service with a freshly generated id and empty fields.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            ..Self::default()
        }
    }

    /// Read a detail field as text, if present and a string.
    #[must_use]
    pub fn detail_str(&self, key: &str) -> Option<&str> {
        self.details.get(key).and_then(Value::as_str)
    }
}

/// Returns the first id that appears more than once, if any.
#[must_use]
pub fn find_duplicate_id(services: &[Service]) -> Option<&str> {
    let mut seen = std::collections::HashSet::new();
    services
        .iter()
        .map(|s| s.id.as_str())
        .find(|id| !seen.insert(*id))
}
