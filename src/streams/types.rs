//! Stream definitions and the record source contract

use super::activity_logs::ActivityLogsSource;
use super::conversations::ConversationsSource;
use super::messages::MessagesSource;
use crate::config::{ActivityLogsPagination, TapConfig};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::types::{BookmarkFormat, DixaApi, ReplicationMethod};
use crate::window::{Interval, Windower};
use async_trait::async_trait;
use serde_json::Value;

// ============================================================================
// Definitions
// ============================================================================

/// Which extraction logic a definition uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Conversations,
    Messages,
    ActivityLogs,
}

/// Static description of a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamDefinition {
    /// Stream id, also the schema file name
    pub stream_id: &'static str,
    /// Extraction logic
    pub kind: StreamKind,
    /// How the stream is replicated
    pub replication_method: ReplicationMethod,
    /// Replication key; set exactly when incremental
    pub replication_key: Option<&'static str>,
    /// Older bookmark field, read when the current one is absent
    pub legacy_replication_key: Option<&'static str>,
    /// Primary key fields
    pub key_properties: &'static [&'static str],
    /// API root the endpoint lives on
    pub api: DixaApi,
    /// Endpoint path
    pub endpoint: &'static str,
    /// Shape the bookmark is written in
    pub bookmark_format: BookmarkFormat,
}

impl StreamDefinition {
    /// State keys to look for, current key first
    pub fn bookmark_keys(&self) -> Vec<&'static str> {
        self.replication_key
            .into_iter()
            .chain(self.legacy_replication_key)
            .collect()
    }

    /// Primary key fields as owned strings
    pub fn key_properties(&self) -> Vec<String> {
        self.key_properties.iter().map(ToString::to_string).collect()
    }
}

pub const CONVERSATIONS: StreamDefinition = StreamDefinition {
    stream_id: "conversations",
    kind: StreamKind::Conversations,
    replication_method: ReplicationMethod::Incremental,
    replication_key: Some("updated_at"),
    legacy_replication_key: Some("updated_at_datestring"),
    key_properties: &["id"],
    api: DixaApi::Exports,
    endpoint: "/v1/conversation_export",
    bookmark_format: BookmarkFormat::EpochMillis,
};

pub const MESSAGES: StreamDefinition = StreamDefinition {
    stream_id: "messages",
    kind: StreamKind::Messages,
    replication_method: ReplicationMethod::Incremental,
    replication_key: Some("created_at"),
    legacy_replication_key: Some("updated_at_datestring"),
    key_properties: &["id"],
    api: DixaApi::Exports,
    endpoint: "/v1/message_export",
    bookmark_format: BookmarkFormat::EpochMillis,
};

pub const ACTIVITY_LOGS: StreamDefinition = StreamDefinition {
    stream_id: "activity_logs",
    kind: StreamKind::ActivityLogs,
    replication_method: ReplicationMethod::Incremental,
    replication_key: Some("activityTimestamp"),
    legacy_replication_key: None,
    key_properties: &["id"],
    api: DixaApi::Integrations,
    endpoint: "/v1/conversations/activitylog",
    bookmark_format: BookmarkFormat::Iso8601,
};

/// All streams, in discovery order
pub const STREAMS: &[StreamDefinition] = &[CONVERSATIONS, MESSAGES, ACTIVITY_LOGS];

/// Look up a stream by id
pub fn find_stream(stream_id: &str) -> Option<&'static StreamDefinition> {
    STREAMS.iter().find(|def| def.stream_id == stream_id)
}

// ============================================================================
// Sources
// ============================================================================

/// Pull-based record producer
///
/// Each call issues at most the requests needed for one response and
/// returns its records in API order. `None` means the source is finished.
#[async_trait]
pub trait RecordSource: Send {
    /// Fetch the next batch of records
    async fn next_batch(&mut self, client: &HttpClient) -> Result<Option<Vec<Value>>>;
}

/// Per-sync settings shared by all sources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceOptions {
    /// Window size for the export endpoints
    pub interval: Interval,
    /// Activity log page size
    pub page_size: u64,
    /// Activity log pagination strategy
    pub activity_logs_pagination: ActivityLogsPagination,
}

impl SourceOptions {
    /// Resolve options from config; fails on an unknown interval
    pub fn from_config(config: &TapConfig) -> Result<Self> {
        Ok(Self {
            interval: Interval::resolve(config.interval.as_deref())?,
            page_size: config.page_size(),
            activity_logs_pagination: config.activity_logs_pagination,
        })
    }
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            interval: Interval::default(),
            page_size: crate::config::DEFAULT_PAGE_SIZE,
            activity_logs_pagination: ActivityLogsPagination::default(),
        }
    }
}

/// Build the source for a stream over `[start_ms, now_ms)`
pub fn open_source(
    def: &StreamDefinition,
    start_ms: i64,
    now_ms: i64,
    options: &SourceOptions,
) -> Box<dyn RecordSource> {
    let windows = Windower::new(start_ms, now_ms, options.interval);
    match def.kind {
        StreamKind::Conversations => Box::new(ConversationsSource::new(windows)),
        StreamKind::Messages => Box::new(MessagesSource::new(windows)),
        StreamKind::ActivityLogs => match options.activity_logs_pagination {
            ActivityLogsPagination::PageKey => {
                Box::new(ActivityLogsSource::page_key(windows, options.page_size))
            }
            ActivityLogsPagination::Offset => Box::new(ActivityLogsSource::offset(
                start_ms,
                now_ms,
                options.page_size,
            )),
        },
    }
}

/// Records from a response body: a bare array or an object's `data` array
pub fn extract_records(body: Value) -> Result<Vec<Value>> {
    match body {
        Value::Array(records) => Ok(records),
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(records)) => Ok(records),
            Some(Value::Null) | None => Ok(Vec::new()),
            Some(other) => Err(Error::decode(format!(
                "expected 'data' to be an array, got {other}"
            ))),
        },
        Value::Null => Ok(Vec::new()),
        other => Err(Error::decode(format!(
            "expected an array of records, got {other}"
        ))),
    }
}
