// src/config/loader.rs

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** parse paths or
/// queries. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Build the effective configuration for a CLI invocation.
///
/// Starts from `--config` (or built-in defaults when absent), then applies
/// the command-line flags on top and validates the result. A list given on
/// the command line replaces the file's list rather than extending it.
pub fn load_with_overrides(args: &CliArgs) -> Result<ConfigFile> {
    let mut raw = match &args.config {
        Some(path) => {
            debug!(path, "loading config file");
            load_from_path(path)?
        }
        None => RawConfigFile::default(),
    };

    apply_overrides(&mut raw, args);
    ConfigFile::try_from(raw)
}

/// Overlay command-line flags onto a raw config.
pub fn apply_overrides(raw: &mut RawConfigFile, args: &CliArgs) {
    if let Some(lines) = args.context_lines {
        raw.diff.context_lines = lines;
    }
    if args.diff_by_line {
        raw.diff.diff_by_line = true;
    }
    if args.show_empty {
        raw.diff.show_empty = true;
    }
    if let Some(color) = args.color {
        raw.diff.color = color;
    }

    if let Some(expr) = &args.jsonpath {
        raw.projection.jsonpath = Some(expr.clone());
    }
    if !args.show.is_empty() {
        raw.projection.show = args.show.clone();
    }
    if !args.hide.is_empty() {
        raw.projection.hide = args.hide.clone();
    }
    if let Some(hide) = args.hide_managed {
        raw.projection.hide_managed_fields = hide;
    }

    if !args.names.is_empty() {
        raw.filter.names = args.names.clone();
    }
    if !args.namespaces.is_empty() {
        raw.filter.namespaces = args.namespaces.clone();
    }
}
