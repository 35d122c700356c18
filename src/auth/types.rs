//! Auth configuration types

use crate::types::DixaApi;

/// Username sent with Basic auth on the exports API
pub const EXPORTS_BASIC_USERNAME: &str = "bearer";

/// Authentication configuration for a single request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthConfig {
    /// No authentication required
    #[default]
    None,

    /// HTTP Basic authentication
    Basic {
        /// Username
        username: String,
        /// Password
        password: String,
    },

    /// A header carrying the key verbatim, optionally prefixed
    ApiKey {
        /// Header name
        header_name: String,
        /// Prefix to add before the value
        prefix: Option<String>,
        /// The API key value
        value: String,
    },
}

impl AuthConfig {
    /// Auth scheme required by the given API root
    pub fn for_api(api: DixaApi, api_token: &str) -> Self {
        match api {
            DixaApi::Exports => AuthConfig::Basic {
                username: EXPORTS_BASIC_USERNAME.to_string(),
                password: api_token.to_string(),
            },
            DixaApi::Integrations => AuthConfig::ApiKey {
                header_name: "Authorization".to_string(),
                prefix: None,
                value: api_token.to_string(),
            },
        }
    }
}
