//! HTTP client for the server-side plugin registry.
//!
//! Fetches the remote plugin descriptor list and downloads module
//! artifacts, verifying checksums when the registry provides them.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::HostConfig;
use crate::error::{PluginError, PluginResult};
use crate::host::ApiClient;
use crate::types::PluginDescriptor;

/// Errors from the plugin registry endpoint.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The session's credentials are no longer accepted.
    #[error("Session expired")]
    Unauthorized,

    /// Any other non-success status.
    #[error("Unexpected status: HTTP {0}")]
    Status(u16),

    /// The response body did not match the expected shape.
    #[error("Invalid response: {0}")]
    Decode(String),
}

/// Response envelope for the plugin list endpoint.
///
/// A missing `data` field is an empty list, not an error.
#[derive(Debug, Deserialize)]
struct PluginListResponse {
    #[serde(default)]
    data: Vec<PluginDescriptor>,
}

/// Join a base URL and a relative address, normalizing the slash between.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    match (base.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{}{}", base, &path[1..]),
        (false, false) => format!("{base}/{path}"),
        _ => format!("{base}{path}"),
    }
}

/// reqwest-backed [`ApiClient`].
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    http: reqwest::Client,
    list_url: String,
}

impl HttpApiClient {
    /// Create a client from host configuration.
    pub fn new(config: &HostConfig) -> PluginResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(format!("plugboard/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PluginError::Config(e.to_string()))?;

        Ok(Self { http, list_url: join_url(&config.base_url, &config.plugin_list_path) })
    }

    /// Download a module artifact, verifying its checksum when given.
    ///
    /// Building block for host [`crate::host::ModuleLoader`] implementations
    /// that fetch plugin code over HTTP.
    pub async fn fetch_module(&self, url: &str, checksum: Option<&str>) -> PluginResult<Vec<u8>> {
        let response = self.http.get(url).send().await.map_err(ApiError::Http)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()).into());
        }

        let bytes = response.bytes().await.map_err(ApiError::Http)?;

        if let Some(expected) = checksum {
            use sha2::{Digest, Sha256};
            let mut hasher = Sha256::new();
            hasher.update(&bytes);
            let actual = format!("{:x}", hasher.finalize());

            if actual != expected {
                return Err(PluginError::Checksum { expected: expected.to_string(), actual });
            }
        }

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn plugin_descriptors(&self) -> Result<Vec<PluginDescriptor>, ApiError> {
        debug!(url = %self.list_url, "fetching plugin descriptors");

        let response = self.http.get(&self.list_url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }

        let body: PluginListResponse =
            response.json().await.map_err(|e| ApiError::Decode(e.to_string()))?;

        Ok(body.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::{Digest, Sha256};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> HttpApiClient {
        let config = HostConfig::default().with_base_url(format!("{}/api/", server.uri()));
        HttpApiClient::new(&config).unwrap()
    }

    #[test]
    fn test_join_url_normalizes_slashes() {
        assert_eq!(join_url("http://h/api/", "plugins/a.js"), "http://h/api/plugins/a.js");
        assert_eq!(join_url("http://h/api", "plugins/a.js"), "http://h/api/plugins/a.js");
        assert_eq!(join_url("http://h/api/", "/plugins/a.js"), "http://h/api/plugins/a.js");
        assert_eq!(join_url("http://h/api", "/plugins/a.js"), "http://h/api/plugins/a.js");
    }

    #[tokio::test]
    async fn test_plugin_descriptors() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/app:getPlugins"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{
                    "name": "workflow",
                    "packageName": "@app/plugin-workflow",
                    "version": "1.0.0",
                    "url": "plugins/workflow/index.js",
                    "type": "npm"
                }]
            })))
            .mount(&server)
            .await;

        let descriptors = client_for(&server).plugin_descriptors().await.unwrap();
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].name, "workflow");
    }

    #[tokio::test]
    async fn test_absent_data_field_is_empty_list() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/app:getPlugins"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let descriptors = client_for(&server).plugin_descriptors().await.unwrap();
        assert!(descriptors.is_empty());
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_session_expired() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/app:getPlugins"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let result = client_for(&server).plugin_descriptors().await;
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_server_error_propagates_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/app:getPlugins"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = client_for(&server).plugin_descriptors().await;
        assert!(matches!(result, Err(ApiError::Status(500))));
    }

    #[tokio::test]
    async fn test_fetch_module_verifies_checksum() {
        let server = MockServer::start().await;
        let body = b"plugin module bytes".to_vec();
        let digest = format!("{:x}", Sha256::digest(&body));

        Mock::given(method("GET"))
            .and(path("/api/plugins/a.js"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let url = format!("{}/api/plugins/a.js", server.uri());

        let bytes = client.fetch_module(&url, Some(&digest)).await.unwrap();
        assert_eq!(bytes, body);

        let mismatch = client.fetch_module(&url, Some("deadbeef")).await;
        assert!(matches!(mismatch, Err(PluginError::Checksum { .. })));

        // No checksum provided means no verification.
        let unverified = client.fetch_module(&url, None).await.unwrap();
        assert_eq!(unverified, body);
    }
}
