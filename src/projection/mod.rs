// src/projection/mod.rs

//! Projection of snapshot trees before diffing.
//!
//! This module is responsible for:
//! - Parsing dotted field addresses (`path`).
//! - Pruning trees down to included paths and removing excluded ones
//!   (`prune`).
//! - Extracting sub-trees or scalars with a query expression (`query`).
//!
//! It knows nothing about caching or rendering; everything here is a pure
//! function over `serde_json::Value`.

pub mod path;
pub mod prune;
pub mod query;

pub use path::{Path, PathError};
pub use prune::{prune_object, remove_path, PruneError};
pub use query::{JsonPathQuery, Query};
