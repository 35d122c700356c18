//! Conversations export
//!
//! One request per window against the exports API. The same windows also
//! feed activity logs with batches of conversation ids.

use super::types::{extract_records, RecordSource, CONVERSATIONS};
use crate::error::Result;
use crate::helpers::{chunk, epoch_millis_to_iso, MAX_IDS_PER_BATCH};
use crate::http::{HttpClient, RequestConfig};
use crate::window::{Window, Windower};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use tracing::debug;

/// Field derived from `updated_at` for older state files and schemas
pub const UPDATED_AT_DATESTRING: &str = "updated_at_datestring";

/// Fetch every conversation updated inside one window
pub(crate) async fn fetch_window(client: &HttpClient, window: &Window) -> Result<Vec<Value>> {
    debug!(
        stream = CONVERSATIONS.stream_id,
        updated_after = window.start_ms,
        updated_before = window.end_ms,
        "Requesting window"
    );

    let body = client
        .get(
            CONVERSATIONS.api,
            CONVERSATIONS.endpoint,
            RequestConfig::new().params(window.params("updated_after", "updated_before")),
        )
        .await?;

    extract_records(body)
}

/// Add `updated_at_datestring` when `updated_at` is an epoch integer
pub fn inject_updated_at_datestring(record: &mut Value) -> Result<()> {
    let Some(updated_at) = record.get("updated_at").and_then(Value::as_i64) else {
        return Ok(());
    };
    let datestring = epoch_millis_to_iso(updated_at)?;
    if let Value::Object(map) = record {
        map.insert(UPDATED_AT_DATESTRING.to_string(), Value::String(datestring));
    }
    Ok(())
}

/// Conversation id as a string, whether the API sent a number or a string
pub fn conversation_id(record: &Value) -> Option<String> {
    match record.get("id")? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

// ============================================================================
// Records
// ============================================================================

/// Conversation records, one window per batch
#[derive(Debug, Clone)]
pub struct ConversationsSource {
    windows: Windower,
}

impl ConversationsSource {
    pub fn new(windows: Windower) -> Self {
        Self { windows }
    }
}

#[async_trait]
impl RecordSource for ConversationsSource {
    async fn next_batch(&mut self, client: &HttpClient) -> Result<Option<Vec<Value>>> {
        let Some(window) = self.windows.next() else {
            return Ok(None);
        };

        let mut records = fetch_window(client, &window).await?;
        for record in &mut records {
            inject_updated_at_datestring(record)?;
        }
        Ok(Some(records))
    }
}

// ============================================================================
// Id batches
// ============================================================================

/// Conversation ids grouped into batches the activity log endpoint accepts
///
/// Windows are fetched lazily; ids of one window are exhausted before the
/// next window is requested.
#[derive(Debug, Clone)]
pub struct ConversationIdBatches {
    windows: Windower,
    pending: VecDeque<Vec<String>>,
    batch_size: usize,
}

impl ConversationIdBatches {
    pub fn new(windows: Windower) -> Self {
        Self {
            windows,
            pending: VecDeque::new(),
            batch_size: MAX_IDS_PER_BATCH,
        }
    }

    /// Next batch of at most ten ids, or `None` when every window is done
    pub async fn next_ids(&mut self, client: &HttpClient) -> Result<Option<Vec<String>>> {
        loop {
            if let Some(batch) = self.pending.pop_front() {
                return Ok(Some(batch));
            }

            let Some(window) = self.windows.next() else {
                return Ok(None);
            };

            let records = fetch_window(client, &window).await?;
            let ids: Vec<String> = records.iter().filter_map(conversation_id).collect();
            debug!(
                conversations = ids.len(),
                updated_after = window.start_ms,
                "Collected conversation ids"
            );
            self.pending
                .extend(chunk(&ids, self.batch_size).map(<[String]>::to_vec));
        }
    }
}
