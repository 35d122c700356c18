//! Activity logs
//!
//! Two pagination strategies over the integrations API:
//!
//! - page key: conversation ids from the conversations windows, ten at a
//!   time in `csids`, each batch followed through `meta.next`
//! - offset: one `fromDatetime`/`toDatetime` range walked by `offset`

use super::conversations::ConversationIdBatches;
use super::types::{extract_records, RecordSource, ACTIVITY_LOGS};
use crate::error::Result;
use crate::helpers::{csid_param, epoch_millis_to_datetime, format_rfc3339};
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::{
    NextPage, OffsetPaginator, PageKeyPaginator, PaginationState, Paginator,
};
use crate::types::QueryParams;
use crate::window::Windower;
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

/// Activity log source in either pagination mode
#[derive(Debug)]
pub enum ActivityLogsSource {
    PageKey(PageKeyLogs),
    Offset(OffsetLogs),
}

impl ActivityLogsSource {
    /// Page-key mode over the conversations in `windows`
    pub fn page_key(windows: Windower, page_size: u64) -> Self {
        Self::PageKey(PageKeyLogs {
            batches: ConversationIdBatches::new(windows),
            paginator: PageKeyPaginator::new().with_page_limit("pageLimit", page_size),
            current: None,
        })
    }

    /// Offset mode over `[start_ms, now_ms)`
    pub fn offset(start_ms: i64, now_ms: i64, page_size: u64) -> Self {
        let paginator = OffsetPaginator::new("offset", "pageLimit", page_size);
        Self::Offset(OffsetLogs {
            start_ms,
            end_ms: now_ms,
            next: Some(paginator.initial_params()),
            paginator,
            state: PaginationState::new(),
        })
    }
}

#[async_trait]
impl RecordSource for ActivityLogsSource {
    async fn next_batch(&mut self, client: &HttpClient) -> Result<Option<Vec<Value>>> {
        match self {
            Self::PageKey(logs) => logs.next_page(client).await,
            Self::Offset(logs) => logs.next_page(client).await,
        }
    }
}

/// Fetch one page and advance the paginator
///
/// `params` holds the request filter, `page` the pagination parameters.
async fn fetch_page(
    client: &HttpClient,
    mut params: QueryParams,
    page: QueryParams,
    paginator: &dyn Paginator,
    state: &mut PaginationState,
) -> Result<(Vec<Value>, NextPage)> {
    params.extend(page);

    let body = client
        .get(
            ACTIVITY_LOGS.api,
            ACTIVITY_LOGS.endpoint,
            RequestConfig::new().params(params),
        )
        .await?;

    let count = match &body {
        Value::Array(records) => records.len(),
        other => other
            .get("data")
            .and_then(Value::as_array)
            .map_or(0, Vec::len),
    };
    let next = paginator.process_response(&body, count, state);
    Ok((extract_records(body)?, next))
}

// ============================================================================
// Page key
// ============================================================================

/// Pagination position within one conversation id batch
#[derive(Debug)]
struct Batch {
    csids: (String, String),
    page: QueryParams,
    state: PaginationState,
}

/// Page-key pagination per conversation id batch
#[derive(Debug)]
pub struct PageKeyLogs {
    batches: ConversationIdBatches,
    paginator: PageKeyPaginator,
    current: Option<Batch>,
}

impl PageKeyLogs {
    async fn next_page(&mut self, client: &HttpClient) -> Result<Option<Vec<Value>>> {
        if self.current.is_none() {
            let Some(ids) = self.batches.next_ids(client).await? else {
                return Ok(None);
            };
            self.current = Some(Batch {
                csids: csid_param(&ids),
                page: self.paginator.initial_params(),
                state: PaginationState::new(),
            });
        }

        let Some(batch) = self.current.as_mut() else {
            return Ok(None);
        };

        debug!(
            csids = %batch.csids.1,
            page = batch.state.pages_fetched + 1,
            "Requesting activity logs"
        );
        let (records, next) = fetch_page(
            client,
            vec![batch.csids.clone()],
            batch.page.clone(),
            &self.paginator,
            &mut batch.state,
        )
        .await?;

        match next {
            NextPage::Continue { query_params } => batch.page = query_params,
            NextPage::Done => self.current = None,
        }
        Ok(Some(records))
    }
}

// ============================================================================
// Offset
// ============================================================================

/// Offset pagination over a fixed time range
#[derive(Debug)]
pub struct OffsetLogs {
    start_ms: i64,
    end_ms: i64,
    paginator: OffsetPaginator,
    next: Option<QueryParams>,
    state: PaginationState,
}

impl OffsetLogs {
    async fn next_page(&mut self, client: &HttpClient) -> Result<Option<Vec<Value>>> {
        if self.start_ms >= self.end_ms {
            return Ok(None);
        }
        let Some(page) = self.next.take() else {
            return Ok(None);
        };

        let params = vec![
            (
                "fromDatetime".to_string(),
                format_rfc3339(epoch_millis_to_datetime(self.start_ms)?),
            ),
            (
                "toDatetime".to_string(),
                format_rfc3339(epoch_millis_to_datetime(self.end_ms)?),
            ),
        ];

        debug!(offset = self.state.offset, "Requesting activity logs");
        let (records, next) =
            fetch_page(client, params, page, &self.paginator, &mut self.state).await?;

        if let NextPage::Continue { query_params } = next {
            self.next = Some(query_params);
        }
        Ok(Some(records))
    }
}
