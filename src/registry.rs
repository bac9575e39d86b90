//! Plugin instance registry.
//!
//! Insertion-ordered store with two lookup views over the same set of
//! instances: by identity key and by alias name.

use std::collections::HashMap;
use std::sync::Arc;

use crate::interface::Plugin;
use crate::types::PluginKey;

/// Instance store keyed by plugin identity, with name aliases.
///
/// Additive for the lifetime of the session: there is no removal path, no
/// capacity bound, no expiry. Re-inserting a key replaces the instance in
/// place, keeping its original position in iteration order. A later alias
/// silently shadows an earlier one.
#[derive(Default)]
pub struct PluginRegistry {
    order: Vec<PluginKey>,
    instances: HashMap<PluginKey, Arc<dyn Plugin>>,
    aliases: HashMap<String, Arc<dyn Plugin>>,
}

impl PluginRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an instance under `key`, and under `alias` when given.
    pub fn insert(&mut self, key: PluginKey, instance: Arc<dyn Plugin>, alias: Option<&str>) {
        if self.instances.insert(key.clone(), instance.clone()).is_none() {
            self.order.push(key);
        }

        if let Some(name) = alias {
            self.aliases.insert(name.to_string(), instance);
        }
    }

    /// Look up an instance by identity key.
    pub fn by_key(&self, key: &PluginKey) -> Option<Arc<dyn Plugin>> {
        self.instances.get(key).cloned()
    }

    /// Look up an instance by alias name.
    pub fn by_alias(&self, name: &str) -> Option<Arc<dyn Plugin>> {
        self.aliases.get(name).cloned()
    }

    /// Instances in insertion order.
    pub fn snapshot(&self) -> Vec<Arc<dyn Plugin>> {
        self.order.iter().filter_map(|key| self.instances.get(key).cloned()).collect()
    }

    /// Identity keys in insertion order.
    pub fn keys(&self) -> Vec<PluginKey> {
        self.order.clone()
    }

    /// Number of registered instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether the registry holds no instances.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
