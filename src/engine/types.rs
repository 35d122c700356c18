//! Engine types
//!
//! Message types and run statistics for the sync engine.

use crate::state::State;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A message emitted during sync, one JSON object per line on stdout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    /// Schema for a stream, emitted before its first record
    Schema {
        /// Stream id
        stream: String,
        /// JSON schema
        schema: Value,
        /// Primary key fields
        key_properties: Vec<String>,
        /// Replication key fields
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        bookmark_properties: Vec<String>,
    },
    /// A single record
    Record {
        /// Stream id
        stream: String,
        /// Record data
        record: Value,
        /// RFC 3339 instant the record was extracted
        #[serde(default, skip_serializing_if = "Option::is_none")]
        time_extracted: Option<String>,
    },
    /// State checkpoint
    State {
        /// Full state document
        value: State,
    },
}

impl Message {
    /// Create a schema message
    pub fn schema(
        stream: impl Into<String>,
        schema: Value,
        key_properties: Vec<String>,
        bookmark_properties: Vec<String>,
    ) -> Self {
        Self::Schema {
            stream: stream.into(),
            schema,
            key_properties,
            bookmark_properties,
        }
    }

    /// Create a record message
    pub fn record(stream: impl Into<String>, record: Value, time_extracted: Option<String>) -> Self {
        Self::Record {
            stream: stream.into(),
            record,
            time_extracted,
        }
    }

    /// Create a state message
    pub fn state(value: State) -> Self {
        Self::State { value }
    }

    /// Check if this is a record message
    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record { .. })
    }

    /// Check if this is a state message
    pub fn is_state(&self) -> bool {
        matches!(self, Self::State { .. })
    }
}

/// Statistics from a sync operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Records emitted
    pub records_emitted: u64,
    /// Records dropped for being older than the bookmark
    pub records_skipped: u64,
    /// API responses processed
    pub pages_fetched: u64,
    /// Streams completed
    pub streams_synced: u64,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl SyncStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add emitted records
    pub fn add_emitted(&mut self, count: u64) {
        self.records_emitted += count;
    }

    /// Add skipped records
    pub fn add_skipped(&mut self, count: u64) {
        self.records_skipped += count;
    }

    /// Add a page
    pub fn add_page(&mut self) {
        self.pages_fetched += 1;
    }

    /// Add a stream
    pub fn add_stream(&mut self) {
        self.streams_synced += 1;
    }

    /// Fold another run's counters into this one
    pub fn merge(&mut self, other: &SyncStats) {
        self.records_emitted += other.records_emitted;
        self.records_skipped += other.records_skipped;
        self.pages_fetched += other.pages_fetched;
        self.streams_synced += other.streams_synced;
        self.duration_ms += other.duration_ms;
    }
}
