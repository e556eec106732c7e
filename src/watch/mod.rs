// src/watch/mod.rs

//! Notification sources.
//!
//! A source turns some outside stream of resource states into
//! [`Notification`](crate::resource::Notification)s on a bounded channel:
//! - [`stdin`] decodes YAML/JSON documents from a reader (`kubectl get -w`).
//! - [`dir`] watches a directory of manifests with `notify`.
//!
//! Sources know nothing about diffing; the engine consumes their channels.

pub mod decode;
pub mod dir;
pub mod hash;
pub mod patterns;
pub mod stdin;

pub use decode::{decode_yaml_documents, expand_document, into_notification, notifications_from_value};
pub use dir::{spawn_directory_source, ManifestTracker, WatcherHandle, DIRECTORY_CHANNEL_CAPACITY};
pub use hash::content_hash;
pub use patterns::{ManifestPatterns, DEFAULT_MANIFEST_PATTERNS};
pub use stdin::{read_notifications, spawn_reader_source, READER_CHANNEL_CAPACITY};
