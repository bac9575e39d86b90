//! # Plugboard
//!
//! Plugin lifecycle orchestration for extensible applications.
//!
//! Plugboard registers, instantiates, and sequences application plugins,
//! including plugins whose code is not known at build time and must be
//! fetched from a remote registry while the application boots.
//!
//! ## Lifecycle
//!
//! Constructing a [`PluginManager`] spawns a two-phase bootstrap in the
//! background: statically declared plugins are added first, in declaration
//! order, then the remote registry is consulted and every resolvable
//! descriptor is added. A later `load()` call awaits bootstrap, then runs
//! `before_load` across every registered plugin followed by `load`, with a
//! hard barrier between the passes: no plugin's `load` starts until every
//! plugin has finished `before_load`.
//!
//! An expired session during remote discovery is recovered in place: the
//! manager clears the session role and asks the host to reload instead of
//! failing bootstrap.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use plugboard::{
//!     AppContext, HostConfig, HttpApiClient, PluginManager, PluginOptions, StaticPlugin,
//! };
//!
//! #[tokio::main]
//! async fn main() -> plugboard::PluginResult<()> {
//!     let config = HostConfig::default();
//!     let api = Arc::new(HttpApiClient::new(&config)?);
//!
//!     let ctx = Arc::new(AppContext::new(api, module_loader, session, config.base_url));
//!
//!     let manager = PluginManager::new(
//!         vec![
//!             StaticPlugin::Bare(Arc::new(AclPluginFactory)),
//!             StaticPlugin::Configured(
//!                 Arc::new(WorkflowPluginFactory),
//!                 PluginOptions::new().with_name("workflow"),
//!             ),
//!         ],
//!         ctx,
//!     );
//!
//!     manager.load().await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod host;
pub mod interface;
pub mod manager;
pub mod registry;
pub mod resolver;
pub mod types;

pub use client::{ApiError, HttpApiClient};
pub use config::HostConfig;
pub use error::{PluginError, PluginResult};
pub use host::{
    ApiClient, AppContext, BundledModuleIndex, DevModuleIndex, ModuleLoader, SessionControl,
};
pub use interface::{Plugin, PluginFactory, StaticPlugin};
pub use manager::PluginManager;
pub use registry::PluginRegistry;
pub use resolver::DescriptorResolver;
pub use types::{PluginDescriptor, PluginKey, PluginOptions, SourceKind, PLUGIN_LIST_PATH};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
