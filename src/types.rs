//! Core plugin types.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Stable identity token for a plugin type.
///
/// The registry keys instances by this token. At most one live instance
/// exists per key; re-registering a key replaces the prior instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PluginKey(Arc<str>);

impl PluginKey {
    /// Create a key from any string-like value.
    pub fn new(key: impl AsRef<str>) -> Self {
        Self(Arc::from(key.as_ref()))
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PluginKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PluginKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for PluginKey {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}

/// Options supplied when adding a plugin.
#[derive(Debug, Clone, Default)]
pub struct PluginOptions {
    /// Optional alias; registers the instance for name-based lookup.
    pub name: Option<String>,
    /// Opaque configuration handed to the plugin factory.
    pub config: Option<serde_json::Value>,
}

impl PluginOptions {
    /// Empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the alias name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the opaque plugin configuration.
    pub fn with_config(mut self, config: serde_json::Value) -> Self {
        self.config = Some(config);
        self
    }
}

/// Where a remotely registered plugin's code comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Built alongside the application.
    Local,
    /// Uploaded to the server's storage.
    Upload,
    /// Published to a package registry.
    Npm,
}

/// Metadata record for a remotely registered plugin.
///
/// Produced by the server-side registry and consumed by the descriptor
/// resolver; the orchestrator only ever sees resolved factories.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginDescriptor {
    /// Plugin name.
    pub name: String,
    /// Package name the plugin is published under.
    pub package_name: String,
    /// Plugin version.
    pub version: String,
    /// Module address, relative to the API base URL.
    pub url: String,
    /// Code source.
    #[serde(rename = "type")]
    pub source: SourceKind,
    /// SHA256 checksum of the module artifact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

impl PluginDescriptor {
    /// Canonical package key used for dev-index lookups.
    pub fn package_key(&self) -> &str {
        if self.package_name.is_empty() {
            &self.name
        } else {
            &self.package_name
        }
    }
}

/// Well-known route the server-side plugin registry answers on.
pub const PLUGIN_LIST_PATH: &str = "app:getPlugins";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_key_equality() {
        let a = PluginKey::new("acl");
        let b = PluginKey::from("acl");
        let c = PluginKey::from("workflow".to_string());

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_str(), "acl");
        assert_eq!(c.to_string(), "workflow");
    }

    #[test]
    fn test_plugin_options_builder() {
        let options = PluginOptions::new()
            .with_name("acl")
            .with_config(serde_json::json!({ "strict": true }));

        assert_eq!(options.name.as_deref(), Some("acl"));
        assert_eq!(options.config.unwrap()["strict"], true);
    }

    #[test]
    fn test_descriptor_deserialize_camel_case() {
        let json = r#"{
            "name": "workflow",
            "packageName": "@app/plugin-workflow",
            "version": "1.2.0",
            "url": "plugins/workflow/index.js",
            "type": "npm"
        }"#;

        let descriptor: PluginDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(descriptor.package_name, "@app/plugin-workflow");
        assert_eq!(descriptor.source, SourceKind::Npm);
        assert!(descriptor.checksum.is_none());
    }

    #[test]
    fn test_descriptor_source_kinds() {
        for (raw, expected) in [
            ("local", SourceKind::Local),
            ("upload", SourceKind::Upload),
            ("npm", SourceKind::Npm),
        ] {
            let json = format!(
                r#"{{"name":"p","packageName":"pkg","version":"0.1.0","url":"u","type":"{raw}"}}"#
            );
            let descriptor: PluginDescriptor = serde_json::from_str(&json).unwrap();
            assert_eq!(descriptor.source, expected);
        }
    }

    #[test]
    fn test_package_key_falls_back_to_name() {
        let mut descriptor = PluginDescriptor {
            name: "audit".to_string(),
            package_name: "@app/plugin-audit".to_string(),
            version: "0.1.0".to_string(),
            url: "plugins/audit.js".to_string(),
            source: SourceKind::Local,
            checksum: None,
        };

        assert_eq!(descriptor.package_key(), "@app/plugin-audit");

        descriptor.package_name.clear();
        assert_eq!(descriptor.package_key(), "audit");
    }
}
