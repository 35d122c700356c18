//! State types for tracking sync progress
//!
//! These types are serialized to JSON and persisted between runs:
//!
//! ```json
//! {"bookmarks": {"conversations": {"updated_at": 1648771200000}},
//!  "currently_syncing": null}
//! ```

use crate::error::Result;
use crate::helpers::iso_to_epoch_millis;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single bookmark value
///
/// The export streams store integer epoch milliseconds; activity logs and
/// older state files store ISO-8601 strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BookmarkValue {
    /// Milliseconds since the epoch
    EpochMillis(i64),
    /// ISO-8601 timestamp
    Text(String),
}

impl BookmarkValue {
    /// Interpret the bookmark as epoch milliseconds
    pub fn to_epoch_millis(&self) -> Result<i64> {
        match self {
            BookmarkValue::EpochMillis(ms) => Ok(*ms),
            BookmarkValue::Text(text) => iso_to_epoch_millis(text),
        }
    }
}

impl std::fmt::Display for BookmarkValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookmarkValue::EpochMillis(ms) => write!(f, "{ms}"),
            BookmarkValue::Text(text) => f.write_str(text),
        }
    }
}

impl From<i64> for BookmarkValue {
    fn from(ms: i64) -> Self {
        BookmarkValue::EpochMillis(ms)
    }
}

impl From<String> for BookmarkValue {
    fn from(text: String) -> Self {
        BookmarkValue::Text(text)
    }
}

/// Complete state for the tap
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Per-stream bookmarks keyed by field name
    #[serde(default)]
    pub bookmarks: BTreeMap<String, BTreeMap<String, BookmarkValue>>,

    /// Stream being synced when the state was written
    #[serde(default)]
    pub currently_syncing: Option<String>,

    /// Top-level keys written by other tools, carried through unchanged
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl State {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a bookmark for a stream
    pub fn get_bookmark(&self, stream: &str, key: &str) -> Option<&BookmarkValue> {
        self.bookmarks.get(stream)?.get(key)
    }

    /// First bookmark present among `keys`, in order
    pub fn first_bookmark(&self, stream: &str, keys: &[&str]) -> Option<&BookmarkValue> {
        keys.iter().find_map(|key| self.get_bookmark(stream, key))
    }

    /// Set a bookmark for a stream
    pub fn set_bookmark(&mut self, stream: &str, key: &str, value: BookmarkValue) {
        self.bookmarks
            .entry(stream.to_string())
            .or_default()
            .insert(key.to_string(), value);
    }

    /// Set or clear the stream currently syncing
    pub fn set_currently_syncing(&mut self, stream: Option<&str>) {
        self.currently_syncing = stream.map(ToString::to_string);
    }
}
