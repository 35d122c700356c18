//! HTTP client module
//!
//! Provides the shared Dixa API client with retry, optional rate limiting,
//! and status-code classification.
//!
//! # Features
//!
//! - **Error classification**: non-200 statuses map to an [`ApiErrorKind`](crate::error::ApiErrorKind)
//! - **Automatic retries**: only for rate limits, server errors, timeouts and
//!   connection failures, with a fixed backoff between attempts
//! - **Rate limiting**: optional token bucket using governor
//! - **Authentication**: scheme chosen per API root

mod classifier;
mod client;
mod rate_limit;

pub use classifier::ErrorClassifier;
pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
