// src/engine/core.rs

//! Per-notification state machine.
//!
//! The [`Dispatcher`] turns one [`Notification`] into a before/after pair via
//! the cache, renders it, hands the result to the sink and updates the
//! cache. It is synchronous and performs no waiting, so a worker that is
//! cancelled between two notifications never leaves one half-processed.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, warn};

use crate::cache::ResourceCache;
use crate::diff::Differ;
use crate::engine::filter::IdentityFilter;
use crate::errors::Result;
use crate::output::DiffSink;
use crate::resource::{Notification, Resource};
use crate::types::EventType;

/// What happened to a single notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A diff block was written to the sink.
    Rendered,
    /// Projections were identical and empty diffs are hidden.
    Suppressed,
    /// Rejected by the name/namespace filter; cache untouched.
    Filtered,
    /// Payload was not a structured snapshot; cache untouched.
    Malformed,
    /// Rendering or output failed; the cache was still updated.
    Failed,
}

pub struct Dispatcher {
    differ: Differ,
    cache: Arc<ResourceCache>,
    filter: IdentityFilter,
    sink: Arc<dyn DiffSink>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("differ", &self.differ)
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    pub fn new(
        differ: Differ,
        cache: Arc<ResourceCache>,
        filter: IdentityFilter,
        sink: Arc<dyn DiffSink>,
    ) -> Self {
        Self {
            differ,
            cache,
            filter,
            sink,
        }
    }

    pub fn cache(&self) -> &Arc<ResourceCache> {
        &self.cache
    }

    /// Handle a single notification.
    ///
    /// - `Added`: diff from nothing, then store.
    /// - `Modified`: diff from the cached snapshot (or nothing, if this
    ///   entity was never seen), then store.
    /// - `Deleted`: diff to nothing, then evict.
    pub fn dispatch(&self, notification: &Notification) -> DispatchOutcome {
        let resource = match Resource::from_value(notification.payload.clone()) {
            Ok(resource) => resource,
            Err(err) => {
                debug!(event = %notification.event, error = %err, "skipping notification");
                return DispatchOutcome::Malformed;
            }
        };

        if !self.filter.matches(&resource) {
            return DispatchOutcome::Filtered;
        }

        let key = resource.key();
        debug!(event = %notification.event, %key, "dispatching");

        let rendered = match notification.event {
            EventType::Added => {
                let rendered = self.differ.render(None, Some(&resource), None);
                self.cache.set(key, &resource);
                rendered
            }
            EventType::Modified => {
                let previous = self.cache.get(&key);
                let rendered = self.differ.render(
                    previous.as_ref().map(|cached| &cached.resource),
                    Some(&resource),
                    previous.as_ref().map(|cached| cached.last_seen),
                );
                self.cache.set(key, &resource);
                rendered
            }
            EventType::Deleted => {
                let rendered = self.differ.render(Some(&resource), None, Some(Utc::now()));
                self.cache.delete(&key);
                rendered
            }
        };

        self.emit(&resource, rendered)
    }

    fn emit(&self, resource: &Resource, rendered: Result<Option<String>>) -> DispatchOutcome {
        match rendered {
            Ok(Some(block)) => match self.sink.emit(&block) {
                Ok(()) => DispatchOutcome::Rendered,
                Err(err) => {
                    warn!(resource = %resource.key(), error = %err, "failed to write diff");
                    DispatchOutcome::Failed
                }
            },
            Ok(None) => DispatchOutcome::Suppressed,
            Err(err) => {
                error!(resource = %resource.key(), error = %err, "failed to show diff");
                DispatchOutcome::Failed
            }
        }
    }
}
