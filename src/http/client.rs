//! HTTP client with retry and rate limiting
//!
//! One client serves both Dixa API roots. Each request:
//! - waits on the optional rate limiter
//! - picks the base URL and auth scheme for the target [`DixaApi`]
//! - treats only `200` as success and classifies everything else
//! - retries transient failures a bounded number of times with backoff

use super::classifier::ErrorClassifier;
use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::auth::{AuthConfig, Authenticator};
use crate::error::{Error, Result};
use crate::types::{DixaApi, QueryParams};
use reqwest::Client;
use serde_json::Value;
use url::Url;
use std::time::Duration;
use tracing::{debug, warn};

/// Default number of attempts per request, including the first one
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default sleep between attempts
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(60);

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Root of the exports API
    pub exports_url: String,
    /// Root of the integrations API
    pub integrations_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Total attempts per request
    pub max_attempts: u32,
    /// Sleep between attempts
    pub backoff: Duration,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            exports_url: DixaApi::Exports.default_base_url().to_string(),
            integrations_url: DixaApi::Integrations.default_base_url().to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: DEFAULT_BACKOFF,
            rate_limit: None,
            user_agent: format!("tap-dixa/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }

    /// Base URL for an API root
    pub fn base_url(&self, api: DixaApi) -> &str {
        match api {
            DixaApi::Exports => &self.exports_url,
            DixaApi::Integrations => &self.integrations_url,
        }
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Override the exports API root
    pub fn exports_url(mut self, url: impl Into<String>) -> Self {
        self.config.exports_url = url.into();
        self
    }

    /// Override the integrations API root
    pub fn integrations_url(mut self, url: impl Into<String>) -> Self {
        self.config.integrations_url = url.into();
        self
    }

    /// Point both API roots at the same URL
    pub fn base_url(self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.exports_url(url.clone()).integrations_url(url)
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set total attempts per request
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.config.max_attempts = attempts;
        self
    }

    /// Set the sleep between attempts
    pub fn backoff(mut self, backoff: Duration) -> Self {
        self.config.backoff = backoff;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Configuration for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters, sent in order. Keys may repeat.
    pub query: QueryParams,
    /// Override timeout for this request
    pub timeout: Option<Duration>,
    /// Override total attempts for this request
    pub max_attempts: Option<u32>,
}

impl RequestConfig {
    /// Create a new request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append several query parameters
    #[must_use]
    pub fn params(mut self, params: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(params);
        self
    }

    /// Set timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set total attempts
    #[must_use]
    pub fn attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }
}

/// HTTP client for the Dixa APIs
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    exports_auth: Authenticator,
    integrations_auth: Authenticator,
    classifier: ErrorClassifier,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create a client for the given API token
    pub fn new(api_token: &str, config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            exports_auth: Authenticator::new(AuthConfig::for_api(DixaApi::Exports, api_token)),
            integrations_auth: Authenticator::new(AuthConfig::for_api(
                DixaApi::Integrations,
                api_token,
            )),
            config,
            classifier: ErrorClassifier::default(),
            rate_limiter,
        })
    }

    /// The client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Authenticator used for an API root
    pub fn authenticator(&self, api: DixaApi) -> &Authenticator {
        match api {
            DixaApi::Exports => &self.exports_auth,
            DixaApi::Integrations => &self.integrations_auth,
        }
    }

    /// Make a GET request and parse the JSON body, retrying transient failures
    pub async fn get(&self, api: DixaApi, endpoint: &str, config: RequestConfig) -> Result<Value> {
        let url = self.build_url(api, endpoint)?;
        let max_attempts = config
            .max_attempts
            .unwrap_or(self.config.max_attempts)
            .max(1);

        let mut attempt = 0;
        loop {
            attempt += 1;

            match self.send_once(api, &url, &config).await {
                Ok(body) => {
                    debug!("Request succeeded: GET {}", url);
                    return Ok(body);
                }
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    let delay = self.config.backoff;
                    warn!(
                        "{}, attempt {}/{}, backing off {:.2} seconds",
                        e,
                        attempt,
                        max_attempts,
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// A single attempt: send, check status, parse
    async fn send_once(
        &self,
        api: DixaApi,
        url: &Url,
        config: &RequestConfig,
    ) -> Result<Value> {
        if let Some(ref limiter) = self.rate_limiter {
            limiter.wait().await;
        }

        let mut req = self.client.get(url.clone());
        if !config.query.is_empty() {
            req = req.query(&config.query);
        }
        if let Some(timeout) = config.timeout {
            req = req.timeout(timeout);
        }
        req = self.authenticator(api).apply(req);

        let response = req.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        if status != 200 {
            return Err(self.classifier.classify(status, text));
        }

        Ok(serde_json::from_str(&text)?)
    }

    /// Join an endpoint onto the root for its API
    fn build_url(&self, api: DixaApi, endpoint: &str) -> Result<Url> {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return Ok(Url::parse(endpoint)?);
        }

        let base = self.config.base_url(api).trim_end_matches('/');
        let path = endpoint.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}
