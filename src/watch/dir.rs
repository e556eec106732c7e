// src/watch/dir.rs

//! Notification source backed by a directory of manifest files.
//!
//! Every manifest file may hold several resources. When a file changes, the
//! resources it now contains are compared with the ones it held before, by
//! identity, and each difference becomes an Added/Modified/Deleted
//! notification. Removing a file deletes everything it held.

use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::{Path, PathBuf};

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::resource::{Notification, ObjectKey, Resource};
use crate::watch::decode::{decode_yaml_documents, expand_document};
use crate::watch::hash::content_hash;
use crate::watch::patterns::ManifestPatterns;

/// Channel capacity between the directory watcher and the runtime.
pub const DIRECTORY_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Default)]
struct TrackedFile {
    hash: String,
    resources: BTreeMap<ObjectKey, Value>,
}

/// Remembers what every manifest file contained last time it was read.
#[derive(Debug, Default)]
pub struct ManifestTracker {
    files: HashMap<PathBuf, TrackedFile>,
}

impl ManifestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of files currently tracked.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// A manifest was created or rewritten with `contents`.
    ///
    /// Unchanged contents and files that fail to decode (e.g. caught halfway
    /// through a save) produce no notifications and keep the previous state.
    pub fn file_written(&mut self, path: &Path, contents: &str) -> Vec<Notification> {
        let hash = content_hash(contents.as_bytes());
        if self.files.get(path).is_some_and(|tracked| tracked.hash == hash) {
            debug!(?path, "manifest content unchanged");
            return Vec::new();
        }

        let resources = match decode_resources(contents) {
            Ok(resources) => resources,
            Err(err) => {
                warn!(?path, error = %err, "failed to decode manifest; ignoring change");
                return Vec::new();
            }
        };

        let previous = self
            .files
            .insert(path.to_path_buf(), TrackedFile { hash, resources: resources.clone() })
            .map(|tracked| tracked.resources)
            .unwrap_or_default();

        diff_resources(previous, resources)
    }

    /// A manifest disappeared; everything it held is deleted.
    pub fn file_removed(&mut self, path: &Path) -> Vec<Notification> {
        match self.files.remove(path) {
            Some(tracked) => diff_resources(tracked.resources, BTreeMap::new()),
            None => Vec::new(),
        }
    }
}

fn decode_resources(contents: &str) -> Result<BTreeMap<ObjectKey, Value>> {
    let mut resources = BTreeMap::new();

    for document in decode_yaml_documents(contents) {
        for item in expand_document(document?) {
            // Non-object items cannot be keyed; the dispatcher would skip them anyway.
            if let Ok(resource) = Resource::from_value(item.clone()) {
                resources.insert(resource.key(), item);
            }
        }
    }

    Ok(resources)
}

/// Notifications turning `before` into `after`.
fn diff_resources(
    mut before: BTreeMap<ObjectKey, Value>,
    after: BTreeMap<ObjectKey, Value>,
) -> Vec<Notification> {
    let mut notifications = Vec::new();

    for (key, value) in after {
        match before.remove(&key) {
            None => notifications.push(Notification::added(value)),
            Some(old) if old != value => notifications.push(Notification::modified(value)),
            Some(_) => {}
        }
    }

    notifications.extend(before.into_values().map(Notification::deleted));
    notifications
}

/// Handle for the directory watcher.
///
/// Keeps the underlying `RecommendedWatcher` alive. Dropping this handle
/// stops watching; the notification channel closes shortly after.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Watch `root` (non-recursively) for manifest changes.
///
/// Existing manifests are reported as Added first, then changes follow as
/// they happen.
pub fn spawn_directory_source(
    root: impl Into<PathBuf>,
    patterns: ManifestPatterns,
) -> Result<(mpsc::Receiver<Notification>, WatcherHandle)> {
    let root = root.into();
    let root = root.canonicalize().unwrap_or(root);

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    // Called synchronously by notify on its own thread.
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    eprintln!("driftwatch: failed to forward notify event: {err}");
                }
            }
            Err(err) => eprintln!("driftwatch: file watch error: {err}"),
        },
        Config::default(),
    )
    .map_err(anyhow::Error::from)?;

    watcher
        .watch(&root, RecursiveMode::NonRecursive)
        .map_err(anyhow::Error::from)?;

    info!("directory watcher started on {:?}", root);

    let (tx, rx) = mpsc::channel(DIRECTORY_CHANNEL_CAPACITY);

    tokio::spawn(async move {
        let mut tracker = ManifestTracker::new();

        match initial_scan(&root, &patterns, &mut tracker).await {
            Ok(notifications) => {
                if !forward(&tx, notifications).await {
                    return;
                }
            }
            Err(err) => warn!(error = %err, "initial directory scan failed"),
        }

        while let Some(event) = event_rx.recv().await {
            debug!(?event, "received notify event");

            for path in &event.paths {
                if !patterns.is_manifest(path) {
                    continue;
                }

                let notifications = match event.kind {
                    EventKind::Remove(_) => tracker.file_removed(path),
                    EventKind::Create(_) | EventKind::Modify(_) => read_manifest(&mut tracker, path).await,
                    _ => continue,
                };

                if !forward(&tx, notifications).await {
                    debug!("notification receiver dropped; stopping directory source");
                    return;
                }
            }
        }

        debug!("directory watcher event loop finished");
    });

    Ok((rx, WatcherHandle { _inner: watcher }))
}

async fn initial_scan(
    root: &Path,
    patterns: &ManifestPatterns,
    tracker: &mut ManifestTracker,
) -> io::Result<Vec<Notification>> {
    let mut paths = Vec::new();
    let mut entries = tokio::fs::read_dir(root).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if patterns.is_manifest(&path) && entry.file_type().await?.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut notifications = Vec::new();
    for path in paths {
        notifications.extend(read_manifest(tracker, &path).await);
    }

    Ok(notifications)
}

async fn read_manifest(tracker: &mut ManifestTracker, path: &Path) -> Vec<Notification> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => tracker.file_written(path, &contents),
        // Renamed away between the event and the read.
        Err(err) if err.kind() == io::ErrorKind::NotFound => tracker.file_removed(path),
        Err(err) => {
            warn!(?path, error = %err, "failed to read manifest");
            Vec::new()
        }
    }
}

/// Send all notifications; `false` once the receiver is gone.
async fn forward(tx: &mpsc::Sender<Notification>, notifications: Vec<Notification>) -> bool {
    for notification in notifications {
        if tx.send(notification).await.is_err() {
            return false;
        }
    }
    true
}
