//! Remote plugin descriptor resolution.
//!
//! Turns the descriptor list from the server-side registry into loaded
//! plugin factories, without the orchestrator knowing whether a plugin's
//! code is already in the running build or must be fetched.

use std::sync::Arc;

use futures::future;
use tracing::{debug, warn};

use crate::client::join_url;
use crate::host::{AppContext, DevModuleIndex, ModuleLoader};
use crate::interface::PluginFactory;
use crate::types::PluginDescriptor;

/// Resolves remote plugin descriptors to executable factories.
pub struct DescriptorResolver {
    loader: Arc<dyn ModuleLoader>,
    dev_index: Option<Arc<dyn DevModuleIndex>>,
    base_url: String,
}

impl DescriptorResolver {
    /// Create a resolver from explicit capabilities.
    pub fn new(
        loader: Arc<dyn ModuleLoader>,
        dev_index: Option<Arc<dyn DevModuleIndex>>,
        base_url: impl Into<String>,
    ) -> Self {
        Self { loader, dev_index, base_url: base_url.into() }
    }

    /// Create a resolver from the host context capabilities.
    pub fn from_context(ctx: &AppContext) -> Self {
        Self::new(ctx.modules().clone(), ctx.dev_index().cloned(), ctx.base_url())
    }

    /// Resolve all descriptors concurrently, preserving descriptor order.
    ///
    /// A descriptor that fails to resolve or carries no usable export is
    /// dropped; a drop never affects sibling descriptors. Drops are
    /// observable as a count mismatch between descriptors in and factories
    /// out.
    pub async fn resolve(&self, descriptors: &[PluginDescriptor]) -> Vec<Arc<dyn PluginFactory>> {
        let resolved =
            future::join_all(descriptors.iter().map(|descriptor| self.resolve_one(descriptor)))
                .await;

        let factories: Vec<_> = resolved.into_iter().flatten().collect();

        if factories.len() != descriptors.len() {
            debug!(
                requested = descriptors.len(),
                resolved = factories.len(),
                "dropped unresolvable plugin descriptors"
            );
        }

        factories
    }

    async fn resolve_one(&self, descriptor: &PluginDescriptor) -> Option<Arc<dyn PluginFactory>> {
        let package = descriptor.package_key();

        // Development builds may already carry the plugin; prefer the
        // bundled index over a network fetch.
        if let Some(index) = &self.dev_index {
            match index.resolve(package).await {
                Ok(Some(factory)) => {
                    debug!(package, "resolved plugin from bundled index");
                    return Some(factory);
                }
                Ok(None) => {}
                Err(error) => {
                    warn!(package, %error, "bundled index lookup failed, falling back to fetch");
                }
            }
        }

        let url = join_url(&self.base_url, &descriptor.url);
        match self.loader.load(&url).await {
            Ok(Some(factory)) => Some(factory),
            Ok(None) => {
                warn!(package, %url, "plugin module has no usable export, skipping");
                None
            }
            Err(error) => {
                warn!(package, %url, %error, "failed to load plugin module, skipping");
                None
            }
        }
    }
}
