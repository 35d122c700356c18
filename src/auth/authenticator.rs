//! Authenticator implementation
//!
//! Applies authentication headers to outgoing requests.

use super::types::AuthConfig;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::RequestBuilder;

/// Authenticator handles applying authentication to HTTP requests
#[derive(Debug, Clone)]
pub struct Authenticator {
    config: AuthConfig,
}

impl Authenticator {
    /// Create a new authenticator with the given config
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// The wrapped configuration
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Header name and value this authenticator adds, if any
    pub fn header(&self) -> Option<(String, String)> {
        match &self.config {
            AuthConfig::None => None,

            AuthConfig::Basic { username, password } => Some((
                "Authorization".to_string(),
                format!("Basic {}", encode_basic_credentials(username, password)),
            )),

            AuthConfig::ApiKey {
                header_name,
                prefix,
                value,
            } => Some((
                header_name.clone(),
                format!("{}{}", prefix.as_deref().unwrap_or(""), value),
            )),
        }
    }

    /// Apply authentication to a request builder
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        match self.header() {
            Some((name, value)) => req.header(name, value),
            None => req,
        }
    }
}

/// Base64 of `username:password`
pub fn encode_basic_credentials(username: &str, password: &str) -> String {
    STANDARD.encode(format!("{username}:{password}"))
}
