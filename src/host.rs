//! Host capabilities consumed by the plugin orchestrator.
//!
//! The application embedding the orchestrator supplies these: an API client
//! for the plugin metadata endpoint, a module loader for runtime plugin
//! code, session control for credential recovery, and, in development
//! builds, an index of locally bundled plugin modules.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::client::ApiError;
use crate::error::PluginResult;
use crate::interface::PluginFactory;
use crate::types::PluginDescriptor;

/// Client for the server-side plugin registry.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Fetch the list of remotely registered plugin descriptors.
    ///
    /// A 401-equivalent response must surface as [`ApiError::Unauthorized`]
    /// so the orchestrator can run session recovery instead of failing
    /// bootstrap.
    async fn plugin_descriptors(&self) -> Result<Vec<PluginDescriptor>, ApiError>;
}

/// Session credential control.
///
/// The orchestrator invokes these when the metadata fetch reports an
/// expired session. The host decides what a reload means: a process
/// restart, a UI redirect, or anything else that restarts bootstrap.
pub trait SessionControl: Send + Sync {
    /// Clear the current session's role/credential state.
    fn clear_role(&self);

    /// Request a full host reload, aborting in-flight bootstrap work.
    fn request_reload(&self);
}

/// Fetches and instantiates plugin modules at runtime.
#[async_trait]
pub trait ModuleLoader: Send + Sync {
    /// Load the module at `url` and return its exported plugin factory.
    ///
    /// `Ok(None)` means the module loaded but carries no usable plugin
    /// export; the caller drops the descriptor.
    async fn load(&self, url: &str) -> PluginResult<Option<Arc<dyn PluginFactory>>>;
}

/// Development-mode index of locally bundled plugin modules.
#[async_trait]
pub trait DevModuleIndex: Send + Sync {
    /// Resolve a package name to a bundled factory.
    ///
    /// `Ok(None)` is the "not available locally" signal, not an error.
    async fn resolve(&self, package_name: &str) -> PluginResult<Option<Arc<dyn PluginFactory>>>;
}

/// In-process dev index over the generated package map.
///
/// Development builds register their locally compiled plugins here so the
/// resolver can skip the network fetch for packages already in the build.
#[derive(Default)]
pub struct BundledModuleIndex {
    modules: HashMap<String, Arc<dyn PluginFactory>>,
}

impl BundledModuleIndex {
    /// Empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bundled factory under its package name.
    pub fn register(&mut self, package_name: impl Into<String>, factory: Arc<dyn PluginFactory>) {
        self.modules.insert(package_name.into(), factory);
    }

    /// Number of bundled packages.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether the index carries no packages.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[async_trait]
impl DevModuleIndex for BundledModuleIndex {
    async fn resolve(&self, package_name: &str) -> PluginResult<Option<Arc<dyn PluginFactory>>> {
        Ok(self.modules.get(package_name).cloned())
    }
}

/// Capabilities the host application provides to the orchestrator.
pub struct AppContext {
    api: Arc<dyn ApiClient>,
    modules: Arc<dyn ModuleLoader>,
    session: Arc<dyn SessionControl>,
    dev_index: Option<Arc<dyn DevModuleIndex>>,
    base_url: String,
}

impl AppContext {
    /// Create a context from the required capabilities.
    pub fn new(
        api: Arc<dyn ApiClient>,
        modules: Arc<dyn ModuleLoader>,
        session: Arc<dyn SessionControl>,
        base_url: impl Into<String>,
    ) -> Self {
        Self { api, modules, session, dev_index: None, base_url: base_url.into() }
    }

    /// Attach a development-mode module index.
    pub fn with_dev_index(mut self, index: Arc<dyn DevModuleIndex>) -> Self {
        self.dev_index = Some(index);
        self
    }

    /// The plugin registry API client.
    pub fn api(&self) -> &Arc<dyn ApiClient> {
        &self.api
    }

    /// The runtime module loader.
    pub fn modules(&self) -> &Arc<dyn ModuleLoader> {
        &self.modules
    }

    /// Session credential control.
    pub fn session(&self) -> &Arc<dyn SessionControl> {
        &self.session
    }

    /// The dev-mode module index, when attached.
    pub fn dev_index(&self) -> Option<&Arc<dyn DevModuleIndex>> {
        self.dev_index.as_ref()
    }

    /// Base URL module addresses are resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
