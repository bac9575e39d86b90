//! Plugin lifecycle orchestration.
//!
//! The manager drives the two-phase bootstrap (statically declared plugins
//! first, then plugins discovered from the remote registry) and the
//! two-pass load sequence across the full registry.

use std::mem;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::client::ApiError;
use crate::error::{PluginError, PluginResult};
use crate::host::AppContext;
use crate::interface::{Plugin, PluginFactory, StaticPlugin};
use crate::registry::PluginRegistry;
use crate::resolver::DescriptorResolver;
use crate::types::{PluginKey, PluginOptions};

/// One-shot bootstrap handle: created at construction, resolved into a
/// cached result on first await, never re-created.
enum Bootstrap {
    Running(JoinHandle<PluginResult<()>>),
    Done(Result<(), Arc<PluginError>>),
}

struct LifecycleState {
    bootstrap: Bootstrap,
    loaded: bool,
}

struct Shared {
    ctx: Arc<AppContext>,
    registry: Mutex<PluginRegistry>,
}

/// Registers, instantiates, and sequences application plugins.
///
/// Construction spawns bootstrap in the background; `load()` awaits it and
/// then runs the lifecycle passes across the full registry.
pub struct PluginManager {
    shared: Arc<Shared>,
    lifecycle: AsyncMutex<LifecycleState>,
}

impl PluginManager {
    /// Create the manager and immediately begin bootstrap in the
    /// background, without blocking the caller.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn new(static_plugins: Vec<StaticPlugin>, ctx: Arc<AppContext>) -> Self {
        let shared = Arc::new(Shared { ctx, registry: Mutex::new(PluginRegistry::new()) });

        let handle = tokio::spawn(Self::bootstrap(shared.clone(), static_plugins));

        Self {
            shared,
            lifecycle: AsyncMutex::new(LifecycleState {
                bootstrap: Bootstrap::Running(handle),
                loaded: false,
            }),
        }
    }

    async fn bootstrap(shared: Arc<Shared>, static_plugins: Vec<StaticPlugin>) -> PluginResult<()> {
        Self::add_static_plugins(&shared, static_plugins).await?;
        Self::add_remote_plugins(&shared).await
    }

    /// Static phase: declaration order, later same-key entries replace
    /// earlier ones silently.
    async fn add_static_plugins(
        shared: &Arc<Shared>,
        plugins: Vec<StaticPlugin>,
    ) -> PluginResult<()> {
        for entry in plugins {
            let (factory, options) = entry.into_parts();
            Self::register(shared, factory, options).await?;
        }
        Ok(())
    }

    /// Remote phase: one metadata request, then resolve and add every
    /// resolvable descriptor in resolver order.
    async fn add_remote_plugins(shared: &Arc<Shared>) -> PluginResult<()> {
        let descriptors = match shared.ctx.api().plugin_descriptors().await {
            Ok(descriptors) => descriptors,
            // Session guard: an expired session is recovered by clearing
            // credentials and requesting a host reload, never surfaced to
            // `load()` callers.
            Err(ApiError::Unauthorized) => {
                warn!("session expired while fetching plugin list, clearing role and reloading");
                shared.ctx.session().clear_role();
                shared.ctx.session().request_reload();
                return Ok(());
            }
            Err(error) => return Err(error.into()),
        };

        debug!(count = descriptors.len(), "discovered remote plugins");

        let resolver = DescriptorResolver::from_context(&shared.ctx);
        let factories = resolver.resolve(&descriptors).await;

        for factory in factories {
            Self::register(shared, factory, PluginOptions::default()).await?;
        }
        Ok(())
    }

    async fn register(
        shared: &Arc<Shared>,
        factory: Arc<dyn PluginFactory>,
        options: PluginOptions,
    ) -> PluginResult<()> {
        let key = factory.key();
        let instance = factory.create(options.config.clone(), shared.ctx.clone())?;

        {
            let mut registry = shared.registry.lock();
            registry.insert(key.clone(), instance.clone(), options.name.as_deref());
        }

        debug!(plugin = %key, "registered plugin");
        instance.after_add().await
    }

    /// Register a plugin outside the bootstrap sequence.
    ///
    /// The instance is constructed from `options.config` and the host
    /// context, registered under its key (and under `options.name` when
    /// given), and its `after_add` hook is awaited before returning.
    /// Collisions with an in-flight bootstrap get last-write-wins semantics
    /// on identity and alias.
    pub async fn add(
        &self,
        factory: Arc<dyn PluginFactory>,
        options: PluginOptions,
    ) -> PluginResult<()> {
        Self::register(&self.shared, factory, options).await
    }

    /// Look up a plugin by identity key. Absence is a valid outcome.
    pub fn get(&self, key: &PluginKey) -> Option<Arc<dyn Plugin>> {
        self.shared.registry.lock().by_key(key)
    }

    /// Look up a plugin by alias name. Absence is a valid outcome.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn Plugin>> {
        self.shared.registry.lock().by_alias(name)
    }

    /// Number of registered plugins.
    pub fn len(&self) -> usize {
        self.shared.registry.lock().len()
    }

    /// Whether no plugins are registered.
    pub fn is_empty(&self) -> bool {
        self.shared.registry.lock().is_empty()
    }

    /// Await bootstrap, then run the two-pass load sequence.
    ///
    /// Every registered plugin finishes `before_load` before any plugin's
    /// `load` begins. Both passes iterate a single snapshot of the registry
    /// taken when the passes start, in insertion order.
    ///
    /// A successful call is terminal: later calls await the cached
    /// bootstrap result and return without re-running hooks. A failed call
    /// may be retried and re-runs both passes from the start. Concurrent
    /// callers serialize; the loser of the race observes the completed
    /// state.
    pub async fn load(&self) -> PluginResult<()> {
        let mut state = self.lifecycle.lock().await;

        // Resolve the one-shot bootstrap handle into a cached result so
        // every caller observes the same outcome.
        let current = mem::replace(&mut state.bootstrap, Bootstrap::Done(Ok(())));
        let outcome = match current {
            Bootstrap::Done(outcome) => outcome,
            Bootstrap::Running(handle) => match handle.await {
                Ok(Ok(())) => Ok(()),
                Ok(Err(error)) => Err(Arc::new(error)),
                Err(join_error) => Err(Arc::new(PluginError::TaskFailed(join_error.to_string()))),
            },
        };
        state.bootstrap = Bootstrap::Done(outcome.clone());
        outcome.map_err(PluginError::Bootstrap)?;

        if state.loaded {
            return Ok(());
        }

        let plugins = self.shared.registry.lock().snapshot();

        for plugin in &plugins {
            plugin.before_load().await?;
        }

        for plugin in &plugins {
            plugin.load().await?;
        }

        state.loaded = true;
        debug!(count = plugins.len(), "plugins loaded");
        Ok(())
    }
}
