//! Configuration and catalog types
//!
//! `TapConfig` is the user-supplied JSON config; `Catalog` is the Singer
//! catalog produced by discovery and fed back into sync.

use crate::error::{Error, Result, ResultExt};
use crate::helpers::iso_to_epoch_millis;
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::types::{DixaApi, OptionStringExt};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

/// Default number of activity log records per page
pub const DEFAULT_PAGE_SIZE: u64 = 10_000;

// ============================================================================
// Tap Config
// ============================================================================

/// User configuration for the tap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TapConfig {
    /// API token, used for both API roots
    pub api_token: String,

    /// ISO-8601 instant to start from when a stream has no bookmark
    pub start_date: String,

    /// Window size: HOUR, DAY, WEEK or MONTH
    #[serde(default)]
    pub interval: Option<String>,

    /// Activity log records per page
    #[serde(default, deserialize_with = "lenient_u64")]
    pub page_size: Option<u64>,

    /// Activity log pagination strategy
    #[serde(default)]
    pub activity_logs_pagination: ActivityLogsPagination,

    /// Client-side request throttle
    #[serde(default)]
    pub requests_per_second: Option<u32>,

    /// Override for the exports API root
    #[serde(default)]
    pub exports_base_url: Option<String>,

    /// Override for the integrations API root
    #[serde(default)]
    pub integrations_base_url: Option<String>,

    /// Per-request timeout
    #[serde(default, deserialize_with = "lenient_u64")]
    pub request_timeout_seconds: Option<u64>,
}

impl TapConfig {
    /// Load config from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_json_str(&contents)
    }

    /// Parse config from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse config from a JSON value, checking required fields
    pub fn from_value(value: Value) -> Result<Self> {
        for field in ["api_token", "start_date"] {
            let present = value
                .get(field)
                .and_then(Value::as_str)
                .is_some_and(|s| !s.trim().is_empty());
            if !present {
                return Err(Error::missing_field(field));
            }
        }

        let config: TapConfig = serde_json::from_value(value)?;
        config.start_date_millis()?;
        Ok(config)
    }

    /// `start_date` as epoch milliseconds
    pub fn start_date_millis(&self) -> Result<i64> {
        iso_to_epoch_millis(&self.start_date)
            .map_err(|e| Error::invalid_value("start_date", e.to_string()))
    }

    /// Activity log page size
    pub fn page_size(&self) -> u64 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1)
    }

    /// HTTP client settings derived from this config
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder();

        if let Some(url) = self.exports_base_url.clone().none_if_empty() {
            builder = builder.exports_url(url);
        }
        if let Some(url) = self.integrations_base_url.clone().none_if_empty() {
            builder = builder.integrations_url(url);
        }
        if let Some(secs) = self.request_timeout_seconds.filter(|s| *s > 0) {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(rps) = self.requests_per_second.filter(|r| *r > 0) {
            builder = builder.rate_limit(RateLimiterConfig::per_second(rps));
        }

        builder.build()
    }

    /// Root URL for an API after overrides
    pub fn base_url(&self, api: DixaApi) -> String {
        let configured = match api {
            DixaApi::Exports => self.exports_base_url.clone(),
            DixaApi::Integrations => self.integrations_base_url.clone(),
        };
        configured
            .none_if_empty()
            .unwrap_or_else(|| api.default_base_url().to_string())
    }
}

/// Activity log pagination strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLogsPagination {
    /// Conversation id batches, each paginated by `pageKey`
    #[default]
    PageKey,
    /// One time range paginated by numeric `offset`
    Offset,
}

/// Accept integers or numeric strings
fn lenient_u64<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("expected a positive integer, got {n}"))),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("expected a positive integer, got '{s}'"))),
        Some(other) => Err(D::Error::custom(format!(
            "expected a positive integer, got {other}"
        ))),
    }
}

// ============================================================================
// Catalog Types
// ============================================================================

/// Singer catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Streams in declaration order
    pub streams: Vec<CatalogEntry>,
}

impl Catalog {
    /// Load a catalog from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read catalog file {}: {e}", path.display()))
        })?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Invalid catalog file {}", path.display()))
    }

    /// Find an entry by stream id
    pub fn get_stream(&self, tap_stream_id: &str) -> Option<&CatalogEntry> {
        self.streams
            .iter()
            .find(|entry| entry.tap_stream_id == tap_stream_id)
    }

    /// Entries to sync, in catalog order
    ///
    /// When no entry carries a `selected` flag, every entry is returned.
    pub fn selected_streams(&self) -> Vec<&CatalogEntry> {
        let any_flag = self.streams.iter().any(|e| e.selected().is_some());
        self.streams
            .iter()
            .filter(|e| !any_flag || e.selected() == Some(true))
            .collect()
    }
}

/// One stream in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Stream name
    pub stream: String,

    /// Stream id
    pub tap_stream_id: String,

    /// JSON schema
    #[serde(default)]
    pub schema: Value,

    /// Primary key fields
    #[serde(default)]
    pub key_properties: Vec<String>,

    /// `INCREMENTAL` or `FULL_TABLE`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_method: Option<String>,

    /// Replication key field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_key: Option<String>,

    /// Singer metadata
    #[serde(default)]
    pub metadata: Vec<MetadataEntry>,
}

impl CatalogEntry {
    /// Metadata for the empty breadcrumb
    pub fn root_metadata(&self) -> Option<&serde_json::Map<String, Value>> {
        self.metadata
            .iter()
            .find(|m| m.breadcrumb.is_empty())
            .map(|m| &m.metadata)
    }

    /// The `selected` flag on the root metadata, if present
    pub fn selected(&self) -> Option<bool> {
        self.root_metadata()?.get("selected")?.as_bool()
    }
}

/// Metadata attached to a breadcrumb
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataEntry {
    /// Path into the schema; empty for the stream itself
    pub breadcrumb: Vec<String>,

    /// Metadata values
    pub metadata: serde_json::Map<String, Value>,
}
