//! Pagination strategy implementations
//!
//! Each strategy handles a specific pagination pattern.

use super::types::{NextPage, PaginationState, Paginator};
use crate::helpers::parse_next_page_key;
use crate::types::QueryParams;
use serde_json::Value;
use tracing::warn;

// ============================================================================
// Page Key Pagination
// ============================================================================

/// Opaque token pagination
///
/// The response carries `meta.next`, a relative URL whose query string holds
/// the token for the following page:
/// `{"meta": {"next": "/v1/conversations/activitylog?pageKey=abc"}}`.
/// Pagination ends when `meta.next` is absent, carries no token, or repeats
/// a token already followed.
#[derive(Debug, Clone)]
pub struct PageKeyPaginator {
    /// Query parameter name for the token
    pub key_param: String,
    /// Optional page size sent with every request
    pub page_limit: Option<(String, u64)>,
}

impl PageKeyPaginator {
    /// Create a paginator using the `pageKey` parameter
    pub fn new() -> Self {
        Self {
            key_param: "pageKey".to_string(),
            page_limit: None,
        }
    }

    /// Send a page size with every request
    #[must_use]
    pub fn with_page_limit(mut self, param: impl Into<String>, limit: u64) -> Self {
        self.page_limit = Some((param.into(), limit));
        self
    }
}

impl Default for PageKeyPaginator {
    fn default() -> Self {
        Self::new()
    }
}

impl Paginator for PageKeyPaginator {
    fn initial_params(&self) -> QueryParams {
        self.page_limit
            .iter()
            .map(|(param, limit)| (param.clone(), limit.to_string()))
            .collect()
    }

    fn process_response(
        &self,
        body: &Value,
        records_count: usize,
        state: &mut PaginationState,
    ) -> NextPage {
        state.add_page(records_count);

        let next = body
            .get("meta")
            .and_then(|meta| meta.get("next"))
            .and_then(Value::as_str);

        let Some(key) = parse_next_page_key(next)
            .remove(&self.key_param)
            .filter(|key| !key.is_empty())
        else {
            return NextPage::Done;
        };

        if !state.seen_keys.insert(key.clone()) {
            warn!(
                page_key = %key,
                pages = state.pages_fetched,
                "Page key repeated, ending pagination"
            );
            return NextPage::Done;
        }

        let mut query_params = self.initial_params();
        query_params.push((self.key_param.clone(), key));
        NextPage::Continue { query_params }
    }
}

// ============================================================================
// Offset Pagination
// ============================================================================

/// Offset-based pagination
///
/// Sends `offset` and `pageLimit`; a page shorter than the limit is the last.
#[derive(Debug, Clone)]
pub struct OffsetPaginator {
    /// Query parameter name for offset
    pub offset_param: String,
    /// Query parameter name for limit
    pub limit_param: String,
    /// Number of records per page
    pub limit_value: u64,
}

impl OffsetPaginator {
    /// Create a new offset paginator
    pub fn new(
        offset_param: impl Into<String>,
        limit_param: impl Into<String>,
        limit_value: u64,
    ) -> Self {
        Self {
            offset_param: offset_param.into(),
            limit_param: limit_param.into(),
            limit_value: limit_value.max(1),
        }
    }

    fn params_at(&self, offset: u64) -> QueryParams {
        vec![
            (self.offset_param.clone(), offset.to_string()),
            (self.limit_param.clone(), self.limit_value.to_string()),
        ]
    }
}

impl Paginator for OffsetPaginator {
    fn initial_params(&self) -> QueryParams {
        self.params_at(0)
    }

    fn process_response(
        &self,
        _body: &Value,
        records_count: usize,
        state: &mut PaginationState,
    ) -> NextPage {
        state.add_page(records_count);

        if (records_count as u64) < self.limit_value {
            return NextPage::Done;
        }

        state.offset += records_count as u64;
        NextPage::Continue {
            query_params: self.params_at(state.offset),
        }
    }
}
