//! Pagination module
//!
//! Supports: opaque page-key tokens and numeric offsets
//!
//! # Overview
//!
//! Each strategy turns a response into the query parameters for the next
//! request and tracks when pagination is complete. Only the activity log
//! endpoint paginates; the export endpoints return a full window per call.

mod strategies;
mod types;

pub use strategies::{OffsetPaginator, PageKeyPaginator};
pub use types::{NextPage, PaginationState, Paginator};

#[cfg(test)]
mod tests;
