// src/projection/prune.rs

//! Structural filtering of object trees by [`Path`].
//!
//! Both functions borrow their input and return a new map, so a tree that is
//! shared (e.g. a cached snapshot) is never modified in place.

use serde_json::{Map, Value};
use thiserror::Error;

use super::path::Path;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PruneError {
    #[error("path cannot be empty")]
    EmptyPath,

    #[error("paths cannot be empty")]
    EmptyPathSet,

    #[error("path {0} is empty")]
    InvalidPath(usize),
}

/// Remove the value addressed by `path`.
///
/// Parents that become empty because of the removal are removed as well, so
/// removing `foo.bar` from `{"foo":{"bar":1}}` yields `{}`, not `{"foo":{}}`.
/// Missing keys and non-object intermediate values leave the tree unchanged.
pub fn remove_path(tree: &Map<String, Value>, path: &Path) -> Result<Map<String, Value>, PruneError> {
    if path.is_empty() {
        return Err(PruneError::EmptyPath);
    }

    let head = path.head();
    let tail = path.tail();
    let mut result = tree.clone();

    if tail.is_empty() {
        result.remove(head);
        return Ok(result);
    }

    let child = match tree.get(head) {
        Some(Value::Object(child)) => child,
        // Absent key, array or scalar: nothing to descend into.
        Some(_) | None => return Ok(result),
    };

    let pruned_child = remove_path(child, &tail)?;
    if pruned_child.is_empty() {
        result.remove(head);
    } else {
        result.insert(head.to_string(), Value::Object(pruned_child));
    }

    Ok(result)
}

/// Keep only the subtrees of `tree` reachable by at least one of `paths`.
///
/// A path that ends at a key keeps that key's whole value, even when longer
/// paths with the same head are also given. Values that are not objects are
/// kept whole once their key is addressed.
pub fn prune_object(tree: &Map<String, Value>, paths: &[Path]) -> Result<Map<String, Value>, PruneError> {
    if paths.is_empty() {
        return Err(PruneError::EmptyPathSet);
    }

    if let Some(index) = paths.iter().position(Path::is_empty) {
        return Err(PruneError::InvalidPath(index));
    }

    let mut result = Map::new();

    for (key, value) in tree {
        if let Some(kept) = prune_value(key, value, paths)? {
            result.insert(key.clone(), kept);
        }
    }

    Ok(result)
}

fn prune_value(key: &str, value: &Value, paths: &[Path]) -> Result<Option<Value>, PruneError> {
    let sub_paths = sub_paths(paths, key);

    if sub_paths.is_empty() {
        return Ok(None);
    }

    // A path ending exactly here selects the entire value.
    if sub_paths.iter().any(Path::is_empty) {
        return Ok(Some(value.clone()));
    }

    match value {
        Value::Object(child) => Ok(Some(Value::Object(prune_object(child, &sub_paths)?))),
        leaf => Ok(Some(leaf.clone())),
    }
}

/// Tails of all paths whose head is `head`; `["metadata.name", "status"]`
/// with head `metadata` gives `["name"]`.
fn sub_paths(paths: &[Path], head: &str) -> Vec<Path> {
    paths
        .iter()
        .filter(|path| path.head() == head)
        .map(Path::tail)
        .collect()
}
