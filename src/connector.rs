//! Connector trait and the Dixa implementation
//!
//! A connector checks credentials, discovers the catalog, and syncs the
//! selected streams into a message sink.

use crate::config::{Catalog, TapConfig};
use crate::engine::{SyncEngine, SyncStats};
use crate::error::Result;
use crate::http::{HttpClient, RequestConfig};
use crate::output::MessageSink;
use crate::schema::build_catalog;
use crate::state::StateManager;
use crate::streams::ACTIVITY_LOGS;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// ============================================================================
// Check Result
// ============================================================================

/// Result of a connection check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Whether the check succeeded
    pub success: bool,

    /// Error message if failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckResult {
    /// Create a successful check result
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    /// Create a failed check result
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

// ============================================================================
// Connector Trait
// ============================================================================

/// Core trait for the tap
#[async_trait]
pub trait Connector: Send + Sync {
    /// Tests if credentials are valid
    async fn check(&self) -> Result<CheckResult>;

    /// Lists available streams with their schemas and metadata
    async fn discover(&self) -> Result<Catalog>;

    /// Syncs the selected catalog streams into `sink`
    async fn sync(
        &self,
        catalog: &Catalog,
        state: StateManager,
        sink: &mut dyn MessageSink,
    ) -> Result<SyncStats>;
}

// ============================================================================
// Dixa Connector
// ============================================================================

/// Connector for the Dixa exports and integrations APIs
#[derive(Debug)]
pub struct DixaConnector {
    config: TapConfig,
    client: HttpClient,
}

impl DixaConnector {
    /// Create a connector with an HTTP client built from `config`
    pub fn new(config: TapConfig) -> Result<Self> {
        let client = HttpClient::new(&config.api_token, config.http_client_config())?;
        Ok(Self { config, client })
    }

    /// Create a connector around an existing client
    pub fn with_client(config: TapConfig, client: HttpClient) -> Self {
        Self { config, client }
    }

    /// Get the tap config
    pub fn config(&self) -> &TapConfig {
        &self.config
    }

    /// Issue one activity log request over the last hour
    ///
    /// The response is discarded; only the status matters.
    pub async fn validate(&self) -> Result<()> {
        let now = Utc::now();
        let hour_ago = now - Duration::hours(1);

        self.client
            .get(
                ACTIVITY_LOGS.api,
                ACTIVITY_LOGS.endpoint,
                RequestConfig::new()
                    .query("created_after", hour_ago.timestamp_millis().to_string())
                    .query("created_before", now.timestamp_millis().to_string()),
            )
            .await?;

        Ok(())
    }
}

#[async_trait]
impl Connector for DixaConnector {
    async fn check(&self) -> Result<CheckResult> {
        match self.validate().await {
            Ok(()) => Ok(CheckResult::success()),
            Err(e) if e.api_kind().is_some() => {
                warn!(error = %e, "Connection check failed");
                Ok(CheckResult::failure(e.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    async fn discover(&self) -> Result<Catalog> {
        self.validate().await?;
        let catalog = build_catalog()?;
        info!(streams = catalog.streams.len(), "Discovered streams");
        Ok(catalog)
    }

    async fn sync(
        &self,
        catalog: &Catalog,
        state: StateManager,
        sink: &mut dyn MessageSink,
    ) -> Result<SyncStats> {
        let mut engine = SyncEngine::new(&self.client, state, sink, &self.config)?;
        engine.run(catalog).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ApiErrorKind, Error};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn connector(uri: &str) -> DixaConnector {
        let config = TapConfig::from_value(json!({
            "api_token": "test-token",
            "start_date": "2022-04-01T00:00:00Z",
            "integrations_base_url": uri,
            "exports_base_url": uri,
        }))
        .unwrap();
        DixaConnector::new(config).unwrap()
    }

    #[test]
    fn test_check_result_serialization() {
        let ok = serde_json::to_value(CheckResult::success()).unwrap();
        assert_eq!(ok, json!({"success": true}));

        let failed = serde_json::to_value(CheckResult::failure("nope")).unwrap();
        assert_eq!(failed, json!({"success": false, "message": "nope"}));
    }

    #[tokio::test]
    async fn test_discover_validates_then_lists_streams() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/conversations/activitylog"))
            .and(header("Authorization", "test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let catalog = connector(&mock_server.uri()).discover().await.unwrap();
        let ids: Vec<_> = catalog.streams.iter().map(|s| s.tap_stream_id.as_str()).collect();
        assert_eq!(ids, vec!["conversations", "messages", "activity_logs"]);
    }

    #[tokio::test]
    async fn test_discover_surfaces_invalid_credentials() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&mock_server)
            .await;

        let err = connector(&mock_server.uri()).discover().await.unwrap_err();
        assert_eq!(err.api_kind(), Some(ApiErrorKind::InvalidCredentials));
        assert!(matches!(err, Error::Api { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_check_reports_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&mock_server)
            .await;

        let result = connector(&mock_server.uri()).check().await.unwrap();
        assert!(!result.success);
        assert_eq!(result.message.as_deref(), Some("Invalid query parameters"));
    }
}
