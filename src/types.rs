//! Common types used throughout the tap
//!
//! This module contains shared type definitions, type aliases,
//! and small enums used across multiple modules.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// Ordered query parameters
pub type QueryParams = Vec<(String, String)>;

// ============================================================================
// API Roots
// ============================================================================

/// The two Dixa API roots
///
/// Each root has its own authorization scheme: the exports API takes a
/// Basic header over `bearer:<token>`, the integrations API takes the raw
/// token as the Authorization value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DixaApi {
    /// `https://exports.dixa.io`
    Exports,
    /// `https://dev.dixa.io`
    Integrations,
}

impl DixaApi {
    /// Production base URL
    pub const fn default_base_url(self) -> &'static str {
        match self {
            DixaApi::Exports => "https://exports.dixa.io",
            DixaApi::Integrations => "https://dev.dixa.io",
        }
    }
}

// ============================================================================
// Replication
// ============================================================================

/// How a stream is replicated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReplicationMethod {
    /// Only records at or past the bookmark are emitted
    Incremental,
    /// Everything is emitted on every run
    FullTable,
}

impl ReplicationMethod {
    /// Catalog spelling (`INCREMENTAL` / `FULL_TABLE`)
    pub const fn as_str(self) -> &'static str {
        match self {
            ReplicationMethod::Incremental => "INCREMENTAL",
            ReplicationMethod::FullTable => "FULL_TABLE",
        }
    }
}

/// Shape in which a bookmark is persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkFormat {
    /// Integer milliseconds since the epoch
    EpochMillis,
    /// RFC 3339 string with millisecond precision
    Iso8601,
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.trim().is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        if self.trim().is_empty() {
            None
        } else {
            Some(self)
        }
    }
}
