// src/config/mod.rs

//! Configuration loading and validation for driftwatch.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk and merge CLI flags (`loader.rs`).
//! - Parse paths, queries and filter patterns up front (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{apply_overrides, load_and_validate, load_from_path, load_with_overrides};
pub use model::{ConfigFile, DiffSection, FilterSection, ProjectionSection, RawConfigFile};
