// src/diff/options.rs

use std::fmt;
use std::sync::Arc;

use crate::config::ConfigFile;
use crate::diff::theme::Themes;
use crate::projection::{Path, Query};
use crate::types::DiffMode;

/// Default number of context lines around each change.
pub const DEFAULT_CONTEXT_LINES: usize = 3;

/// Path hidden by `hide_managed_fields`.
pub const MANAGED_FIELDS_PATH: &str = "metadata.managedFields";

/// Validated projection and rendering options for the [`Differ`](super::Differ).
///
/// Everything in here is already parsed, so building a differ cannot fail.
/// Use [`DiffOptions::from_config`] in the application; tests can start from
/// `Default` and use the `with_*` helpers.
#[derive(Clone)]
pub struct DiffOptions {
    pub context_lines: usize,
    pub mode: DiffMode,
    /// Skip rendering when both projected sides are identical.
    pub hide_empty_diffs: bool,
    pub query: Option<Arc<dyn Query>>,
    pub include_paths: Vec<Path>,
    pub exclude_paths: Vec<Path>,
    pub themes: Themes,
    pub color: bool,
}

impl fmt::Debug for DiffOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiffOptions")
            .field("context_lines", &self.context_lines)
            .field("mode", &self.mode)
            .field("hide_empty_diffs", &self.hide_empty_diffs)
            .field("query", &self.query.as_ref().map(|q| q.expression()))
            .field("include_paths", &self.include_paths)
            .field("exclude_paths", &self.exclude_paths)
            .field("color", &self.color)
            .finish_non_exhaustive()
    }
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            context_lines: DEFAULT_CONTEXT_LINES,
            mode: DiffMode::Word,
            hide_empty_diffs: true,
            query: None,
            include_paths: Vec::new(),
            exclude_paths: Vec::new(),
            themes: Themes::for_mode(DiffMode::Word),
            color: false,
        }
    }
}

impl DiffOptions {
    /// Options for a validated config. Also fixes the process-wide colour
    /// decision (see [`ColorMode::resolve`](crate::types::ColorMode::resolve)).
    pub fn from_config(cfg: &ConfigFile) -> Self {
        let mode = cfg.diff_mode();

        Self {
            context_lines: cfg.context_lines(),
            mode,
            hide_empty_diffs: !cfg.diff_section().show_empty,
            query: cfg.query(),
            include_paths: cfg.include_paths().to_vec(),
            exclude_paths: cfg.exclude_paths().to_vec(),
            themes: Themes::for_mode(mode),
            color: cfg.diff_section().color.resolve(),
        }
    }

    pub fn with_mode(mut self, mode: DiffMode) -> Self {
        self.mode = mode;
        self.themes = Themes::for_mode(mode);
        self
    }

    pub fn with_context_lines(mut self, lines: usize) -> Self {
        self.context_lines = lines;
        self
    }

    pub fn with_hide_empty_diffs(mut self, hide: bool) -> Self {
        self.hide_empty_diffs = hide;
        self
    }

    pub fn with_query(mut self, query: Arc<dyn Query>) -> Self {
        self.query = Some(query);
        self
    }

    pub fn with_include_paths(mut self, paths: Vec<Path>) -> Self {
        self.include_paths = paths;
        self
    }

    pub fn with_exclude_paths(mut self, paths: Vec<Path>) -> Self {
        self.exclude_paths = paths;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }
}
