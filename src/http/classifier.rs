//! Status code classification
//!
//! The status → (kind, message) table is immutable once built and owned by
//! the [`HttpClient`](super::HttpClient) that uses it.

use crate::error::{ApiErrorKind, Error};
use std::collections::HashMap;

const FALLBACK_MESSAGE: &str = "Client Error";

/// Maps HTTP status codes to typed API errors
#[derive(Debug, Clone)]
pub struct ErrorClassifier {
    table: HashMap<u16, (ApiErrorKind, &'static str)>,
}

impl ErrorClassifier {
    /// Build a classifier from explicit entries
    pub fn from_entries(
        entries: impl IntoIterator<Item = (u16, ApiErrorKind, &'static str)>,
    ) -> Self {
        Self {
            table: entries
                .into_iter()
                .map(|(status, kind, message)| (status, (kind, message)))
                .collect(),
        }
    }

    /// The kind and fixed message for a status
    pub fn lookup(&self, status: u16) -> (ApiErrorKind, &'static str) {
        self.table
            .get(&status)
            .copied()
            .unwrap_or((ApiErrorKind::ClientError, FALLBACK_MESSAGE))
    }

    /// Turn a failed response into an [`Error::Api`]
    pub fn classify(&self, status: u16, body: impl Into<String>) -> Error {
        let (kind, message) = self.lookup(status);
        Error::api(kind, status, message, body)
    }
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::from_entries([
            (400, ApiErrorKind::InvalidParameters, "Invalid query parameters"),
            (401, ApiErrorKind::InvalidCredentials, "Invalid or missing credentials"),
            (408, ApiErrorKind::RequestTimeout, "Request Timeout"),
            (
                422,
                ApiErrorKind::BatchSizeExceeded,
                "Exceeded max allowed 10 csids per request",
            ),
            (429, ApiErrorKind::RateLimited, "API limit has been reached"),
            (500, ApiErrorKind::ServerError, "Dixa Server Error"),
            (503, ApiErrorKind::ServerError, "Dixa Server Unavailable"),
        ])
    }
}
