//! Plugin interface definition.
//!
//! Defines the lifecycle contract plugins must implement and the factory
//! seam the orchestrator uses to construct them.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::PluginResult;
use crate::host::AppContext;
use crate::types::{PluginKey, PluginOptions};

/// Lifecycle contract every registrable plugin honors.
///
/// Hooks run in a fixed sequence across the whole registry: `after_add`
/// immediately after registration, then, at `load()` time, one full
/// `before_load` pass over every instance followed by one full `load`
/// pass. A plugin may rely on every other plugin having finished
/// `before_load` before its own `load` runs, so capabilities registered in
/// `before_load` are safe to consume in `load`.
///
/// Every hook defaults to an immediately-resolving no-op.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Runs immediately after the instance is registered.
    async fn after_add(&self) -> PluginResult<()> {
        Ok(())
    }

    /// First lifecycle pass. Register capabilities other plugins consume here.
    async fn before_load(&self) -> PluginResult<()> {
        Ok(())
    }

    /// Second lifecycle pass. Every registered plugin has finished
    /// `before_load` by the time this runs.
    async fn load(&self) -> PluginResult<()> {
        Ok(())
    }
}

/// Constructs plugin instances for the orchestrator.
///
/// The registry never constructs plugins directly; statically bundled and
/// remotely loaded plugins both register through this seam.
pub trait PluginFactory: Send + Sync {
    /// Stable identity token. At most one live instance per key.
    fn key(&self) -> PluginKey;

    /// Build a new instance from opaque configuration and the host context.
    fn create(
        &self,
        config: Option<serde_json::Value>,
        ctx: Arc<AppContext>,
    ) -> PluginResult<Arc<dyn Plugin>>;
}

/// A statically declared plugin: a bare factory or a factory with options.
///
/// The static phase of bootstrap normalizes both shapes into a uniform
/// factory-options pair before registering.
pub enum StaticPlugin {
    /// Factory registered with default options.
    Bare(Arc<dyn PluginFactory>),
    /// Factory registered with explicit options.
    Configured(Arc<dyn PluginFactory>, PluginOptions),
}

impl StaticPlugin {
    /// Normalize the shorthand into a factory-options pair.
    pub fn into_parts(self) -> (Arc<dyn PluginFactory>, PluginOptions) {
        match self {
            Self::Bare(factory) => (factory, PluginOptions::default()),
            Self::Configured(factory, options) => (factory, options),
        }
    }
}

impl From<Arc<dyn PluginFactory>> for StaticPlugin {
    fn from(factory: Arc<dyn PluginFactory>) -> Self {
        Self::Bare(factory)
    }
}

impl From<(Arc<dyn PluginFactory>, PluginOptions)> for StaticPlugin {
    fn from((factory, options): (Arc<dyn PluginFactory>, PluginOptions)) -> Self {
        Self::Configured(factory, options)
    }
}
