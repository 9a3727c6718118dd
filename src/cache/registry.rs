//! Cache registry - one place that owns every named cache.

use std::any::{Any, type_name};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use super::{CacheConfig, TypedCache};

/// Registry of named caches shared between repositories.
#[derive(Clone, Default)]
pub struct CacheRegistry {
    caches: Arc<RwLock<HashMap<String, RegisteredCache>>>,
}

/// Type-erased cache plus the type name it was registered with.
struct RegisteredCache {
    cache: Box<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl CacheRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cache registered under `name`, creating it with `config`
    /// on first use.
    ///
    /// A name already taken by a cache of another key/value type yields a
    /// private, unregistered cache instead of sharing the wrong one.
    pub fn get_or_create<K, V>(&self, name: &str, config: CacheConfig) -> TypedCache<K, V>
    where
        K: Hash + Eq + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        if let Some(entry) = self.caches.read().get(name) {
            if let Some(cache) = entry.cache.downcast_ref::<TypedCache<K, V>>() {
                return cache.clone();
            }
            warn!(
                "Cache '{}' is registered as {}, not {}; using an unshared cache",
                name,
                entry.type_name,
                type_name::<TypedCache<K, V>>()
            );
            return TypedCache::new(name, config);
        }

        let mut caches = self.caches.write();
        // Another caller may have registered it between the two locks.
        if let Some(cache) = caches
            .get(name)
            .and_then(|entry| entry.cache.downcast_ref::<TypedCache<K, V>>())
        {
            return cache.clone();
        }

        debug!("Creating cache: {}", name);
        let cache = TypedCache::new(name, config);
        caches.insert(
            name.to_string(),
            RegisteredCache {
                cache: Box::new(cache.clone()),
                type_name: type_name::<TypedCache<K, V>>(),
            },
        );
        cache
    }

    /// Names of all registered caches.
    pub fn cache_names(&self) -> Vec<String> {
        self.caches.read().keys().cloned().collect()
    }
}

impl std::fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheRegistry")
            .field("cache_names", &self.cache_names())
            .finish()
    }
}
