// src/cache.rs

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use tracing::trace;

use crate::resource::{ObjectKey, Resource};

/// A cached snapshot together with the time it was stored.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedResource {
    pub resource: Resource,
    pub last_seen: DateTime<Utc>,
}

/// Last-seen snapshot of every tracked entity.
///
/// Shared by all per-kind workers. Readers run in parallel; writers are
/// serialized, so a reader never observes a partially replaced entry. The
/// cache owns its copies: `set` stores a clone and `get` hands out a clone.
#[derive(Debug, Default)]
pub struct ResourceCache {
    resources: RwLock<HashMap<ObjectKey, CachedResource>>,
}

impl ResourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the stored snapshot and its timestamp, if the key was seen.
    pub fn get(&self, key: &ObjectKey) -> Option<CachedResource> {
        // Entries are replaced whole, so a poisoned lock still guards
        // consistent data.
        let resources = self.resources.read().unwrap_or_else(PoisonError::into_inner);
        resources.get(key).cloned()
    }

    /// Store a copy of `resource` stamped with the current time.
    pub fn set(&self, key: ObjectKey, resource: &Resource) {
        let entry = CachedResource {
            resource: resource.clone(),
            last_seen: Utc::now(),
        };

        trace!(%key, "caching resource");
        let mut resources = self.resources.write().unwrap_or_else(PoisonError::into_inner);
        resources.insert(key, entry);
    }

    pub fn delete(&self, key: &ObjectKey) {
        let mut resources = self.resources.write().unwrap_or_else(PoisonError::into_inner);
        if resources.remove(key).is_some() {
            trace!(%key, "evicted resource");
        }
    }

    pub fn len(&self) -> usize {
        self.resources.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
