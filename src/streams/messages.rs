//! Messages export
//!
//! Same windowing as conversations over its own `created_*` range.

use super::types::{extract_records, RecordSource, MESSAGES};
use crate::error::Result;
use crate::helpers::iso_to_epoch_millis;
use crate::http::{HttpClient, RequestConfig};
use crate::window::Windower;
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

/// Message records, one window per batch
#[derive(Debug, Clone)]
pub struct MessagesSource {
    windows: Windower,
}

impl MessagesSource {
    pub fn new(windows: Windower) -> Self {
        Self { windows }
    }
}

#[async_trait]
impl RecordSource for MessagesSource {
    async fn next_batch(&mut self, client: &HttpClient) -> Result<Option<Vec<Value>>> {
        let Some(window) = self.windows.next() else {
            return Ok(None);
        };

        debug!(
            stream = MESSAGES.stream_id,
            created_after = window.start_ms,
            created_before = window.end_ms,
            "Requesting window"
        );

        let body = client
            .get(
                MESSAGES.api,
                MESSAGES.endpoint,
                RequestConfig::new().params(window.params("created_after", "created_before")),
            )
            .await?;

        let mut records = extract_records(body)?;
        for record in &mut records {
            normalize_created_at(record)?;
        }
        Ok(Some(records))
    }
}

/// Rewrite an ISO `created_at` as epoch milliseconds
pub fn normalize_created_at(record: &mut Value) -> Result<()> {
    if let Some(Value::String(created_at)) = record.get("created_at") {
        let ms = iso_to_epoch_millis(created_at)?;
        record["created_at"] = Value::from(ms);
    }
    Ok(())
}
