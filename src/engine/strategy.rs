//! Replication strategies
//!
//! Incremental streams filter records against the starting bookmark and
//! advance it once the stream is exhausted; full-table streams emit
//! everything and leave state alone.

use super::types::{Message, SyncStats};
use crate::error::{Error, Result};
use crate::helpers::{epoch_millis_to_rfc3339_millis, iso_to_epoch_millis};
use crate::http::HttpClient;
use crate::output::MessageSink;
use crate::schema::RecordProjection;
use crate::state::{BookmarkValue, StateManager};
use crate::streams::{RecordSource, StreamDefinition};
use crate::types::{BookmarkFormat, ReplicationMethod};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use tracing::debug;

/// Everything a strategy needs while a stream runs
pub struct SyncContext<'c> {
    pub client: &'c HttpClient,
    pub state: &'c StateManager,
    pub sink: &'c mut dyn MessageSink,
    pub stats: &'c mut SyncStats,
    /// Field filter applied to every record; `None` emits records as received
    pub projection: Option<&'c RecordProjection>,
}

impl SyncContext<'_> {
    fn project(&self, record: Value) -> Value {
        match self.projection {
            Some(projection) => projection.apply(record),
            None => record,
        }
    }

    async fn emit_state(&mut self) -> Result<()> {
        let snapshot = self.state.snapshot().await;
        self.sink.emit(&Message::state(snapshot))
    }
}

/// Replication behavior of a stream
#[async_trait]
pub trait ReplicationStrategy: Send + Sync {
    /// Lower bound of the range to extract
    async fn start_ms(
        &self,
        state: &StateManager,
        stream: &StreamDefinition,
        start_date_ms: i64,
    ) -> Result<i64>;

    /// Pull every batch from `source` and emit records and state
    async fn replicate(
        &self,
        ctx: &mut SyncContext<'_>,
        stream: &StreamDefinition,
        start_ms: i64,
        source: &mut dyn RecordSource,
    ) -> Result<()>;
}

/// Strategy for a replication method
pub fn strategy_for(method: ReplicationMethod) -> &'static dyn ReplicationStrategy {
    match method {
        ReplicationMethod::Incremental => &IncrementalSync,
        ReplicationMethod::FullTable => &FullTableSync,
    }
}

fn time_extracted() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

// ============================================================================
// Incremental
// ============================================================================

/// Bookmark-driven replication
#[derive(Debug, Clone, Copy, Default)]
pub struct IncrementalSync;

impl IncrementalSync {
    async fn persist(
        ctx: &mut SyncContext<'_>,
        stream: &StreamDefinition,
        key: &str,
        max_ms: i64,
    ) -> Result<()> {
        let value = match stream.bookmark_format {
            BookmarkFormat::EpochMillis => BookmarkValue::EpochMillis(max_ms),
            BookmarkFormat::Iso8601 => BookmarkValue::Text(epoch_millis_to_rfc3339_millis(max_ms)?),
        };
        ctx.state.set_bookmark(stream.stream_id, key, value).await?;
        ctx.emit_state().await
    }
}

#[async_trait]
impl ReplicationStrategy for IncrementalSync {
    async fn start_ms(
        &self,
        state: &StateManager,
        stream: &StreamDefinition,
        start_date_ms: i64,
    ) -> Result<i64> {
        match state
            .first_bookmark(stream.stream_id, &stream.bookmark_keys())
            .await
        {
            Some(bookmark) => bookmark.to_epoch_millis(),
            None => Ok(start_date_ms),
        }
    }

    async fn replicate(
        &self,
        ctx: &mut SyncContext<'_>,
        stream: &StreamDefinition,
        start_ms: i64,
        source: &mut dyn RecordSource,
    ) -> Result<()> {
        let key = stream.replication_key.ok_or_else(|| {
            Error::schema(stream.stream_id, "incremental stream has no replication key")
        })?;

        let mut max_ms = start_ms;

        while let Some(batch) = source.next_batch(ctx.client).await? {
            ctx.stats.add_page();
            let extracted = time_extracted();
            let mut emitted = 0;

            for record in batch {
                let value_ms = replication_value_ms(&record, stream.stream_id, key)?;
                if value_ms < start_ms {
                    ctx.stats.add_skipped(1);
                    continue;
                }
                let record = ctx.project(record);
                ctx.sink.emit(&Message::record(
                    stream.stream_id,
                    record,
                    Some(extracted.clone()),
                ))?;
                emitted += 1;
                max_ms = max_ms.max(value_ms);
            }

            ctx.stats.add_emitted(emitted);
            debug!(stream = stream.stream_id, emitted, max_ms, "Processed page");
        }

        // Later pages may hold older values; persist once the source is exhausted
        Self::persist(ctx, stream, key, max_ms).await
    }
}

/// Replication key value of a record in epoch milliseconds
pub fn replication_value_ms(record: &Value, stream: &str, key: &str) -> Result<i64> {
    let missing = || Error::MissingReplicationKey {
        stream: stream.to_string(),
        field: key.to_string(),
    };

    match record.get(key).ok_or_else(missing)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.floor() as i64))
            .ok_or_else(missing),
        Value::String(s) => iso_to_epoch_millis(s),
        _ => Err(missing()),
    }
}

// ============================================================================
// Full Table
// ============================================================================

/// Emit everything, keep state as is
#[derive(Debug, Clone, Copy, Default)]
pub struct FullTableSync;

#[async_trait]
impl ReplicationStrategy for FullTableSync {
    async fn start_ms(
        &self,
        _state: &StateManager,
        _stream: &StreamDefinition,
        start_date_ms: i64,
    ) -> Result<i64> {
        Ok(start_date_ms)
    }

    async fn replicate(
        &self,
        ctx: &mut SyncContext<'_>,
        stream: &StreamDefinition,
        _start_ms: i64,
        source: &mut dyn RecordSource,
    ) -> Result<()> {
        while let Some(batch) = source.next_batch(ctx.client).await? {
            ctx.stats.add_page();
            let extracted = time_extracted();
            let count = batch.len() as u64;

            for record in batch {
                let record = ctx.project(record);
                ctx.sink.emit(&Message::record(
                    stream.stream_id,
                    record,
                    Some(extracted.clone()),
                ))?;
            }
            ctx.stats.add_emitted(count);
        }

        ctx.emit_state().await
    }
}
