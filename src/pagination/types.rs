//! Pagination types and traits
//!
//! Defines the core pagination abstractions used by all strategies.

use crate::types::QueryParams;
use serde_json::Value;
use std::collections::HashSet;

/// Result of the next page computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// More pages available
    Continue {
        /// Pagination parameters for the next request
        query_params: QueryParams,
    },
    /// No more pages
    Done,
}

impl NextPage {
    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// Tracks pagination state during iteration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationState {
    /// Current offset (for offset-based pagination)
    pub offset: u64,
    /// Page keys already handed out
    pub seen_keys: HashSet<String>,
    /// Pages processed so far
    pub pages_fetched: u64,
    /// Total records fetched so far
    pub records_fetched: u64,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one processed page
    pub fn add_page(&mut self, records: usize) {
        self.pages_fetched += 1;
        self.records_fetched += records as u64;
    }
}

/// Core trait for pagination strategies
pub trait Paginator: Send + Sync {
    /// Pagination parameters for the first request
    fn initial_params(&self) -> QueryParams;

    /// Process a response and determine if there's a next page
    fn process_response(
        &self,
        body: &Value,
        records_count: usize,
        state: &mut PaginationState,
    ) -> NextPage;
}
