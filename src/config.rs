//! Host configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PluginError, PluginResult};
use crate::types::PLUGIN_LIST_PATH;

/// Configuration for the plugin host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Base URL the plugin API is served under.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Route of the plugin list endpoint, relative to `base_url`.
    #[serde(default = "default_plugin_list_path")]
    pub plugin_list_path: String,

    /// Request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Whether the host registers a bundled module index so locally built
    /// plugins skip the network fetch.
    #[serde(default)]
    pub dev_mode: bool,
}

fn default_base_url() -> String {
    "http://127.0.0.1:13000/api/".to_string()
}

fn default_plugin_list_path() -> String {
    PLUGIN_LIST_PATH.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            plugin_list_path: default_plugin_list_path(),
            request_timeout_secs: default_request_timeout(),
            dev_mode: false,
        }
    }
}

impl HostConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> PluginResult<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| PluginError::Config(e.to_string()))
    }

    /// Override the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}
