// src/config/model.rs

use std::sync::Arc;

use serde::Deserialize;

use crate::diff::DEFAULT_CONTEXT_LINES;
use crate::engine::IdentityFilter;
use crate::projection::{Path, Query};
use crate::types::{ColorMode, DiffMode};

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [diff]
/// context_lines = 3
/// diff_by_line = false
/// show_empty = false
/// color = "auto"
///
/// [projection]
/// jsonpath = "{.spec}"
/// show = ["spec", "metadata.labels"]
/// hide = ["spec.template"]
/// hide_managed_fields = true
///
/// [filter]
/// names = ["web-*"]
/// namespaces = ["default"]
/// ```
///
/// All sections are optional. Nothing here is parsed beyond TOML; see
/// [`ConfigFile`] for the validated form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub diff: DiffSection,

    #[serde(default)]
    pub projection: ProjectionSection,

    #[serde(default)]
    pub filter: FilterSection,
}

/// `[diff]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiffSection {
    /// Lines of context around each change. Signed so that a negative value
    /// can be reported instead of failing deserialization.
    #[serde(default = "default_context_lines")]
    pub context_lines: i64,

    /// Compare whole lines instead of highlighting changed words.
    #[serde(default)]
    pub diff_by_line: bool,

    /// Print diffs even when the projected objects are identical.
    #[serde(default)]
    pub show_empty: bool,

    #[serde(default)]
    pub color: ColorMode,
}

fn default_context_lines() -> i64 {
    DEFAULT_CONTEXT_LINES as i64
}

impl Default for DiffSection {
    fn default() -> Self {
        Self {
            context_lines: default_context_lines(),
            diff_by_line: false,
            show_empty: false,
            color: ColorMode::default(),
        }
    }
}

/// `[projection]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectionSection {
    /// Query applied before any path filtering, e.g. `{.spec}` or `$.spec`.
    #[serde(default)]
    pub jsonpath: Option<String>,

    /// Include paths; when non-empty only these subtrees are diffed.
    #[serde(default)]
    pub show: Vec<String>,

    /// Exclude paths, removed after the include step.
    #[serde(default)]
    pub hide: Vec<String>,

    /// Append `metadata.managedFields` to the exclude paths.
    #[serde(default = "default_hide_managed_fields")]
    pub hide_managed_fields: bool,
}

fn default_hide_managed_fields() -> bool {
    true
}

impl Default for ProjectionSection {
    fn default() -> Self {
        Self {
            jsonpath: None,
            show: Vec::new(),
            hide: Vec::new(),
            hide_managed_fields: default_hide_managed_fields(),
        }
    }
}

/// `[filter]` section. Entries containing `*` are globs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterSection {
    #[serde(default)]
    pub names: Vec<String>,

    #[serde(default)]
    pub namespaces: Vec<String>,
}

/// Validated configuration.
///
/// Built from [`RawConfigFile`] via `TryFrom` (see `validate.rs`), so every
/// path, query and filter pattern in here is known to be well formed.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    diff: DiffSection,
    projection: ProjectionSection,
    filter_section: FilterSection,

    context_lines: usize,
    query: Option<Arc<dyn Query>>,
    include_paths: Vec<Path>,
    exclude_paths: Vec<Path>,
    filter: IdentityFilter,
}

impl ConfigFile {
    /// Assemble a config from already-validated parts.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new_unchecked(
        diff: DiffSection,
        projection: ProjectionSection,
        filter_section: FilterSection,
        context_lines: usize,
        query: Option<Arc<dyn Query>>,
        include_paths: Vec<Path>,
        exclude_paths: Vec<Path>,
        filter: IdentityFilter,
    ) -> Self {
        Self {
            diff,
            projection,
            filter_section,
            context_lines,
            query,
            include_paths,
            exclude_paths,
            filter,
        }
    }

    pub fn diff_section(&self) -> &DiffSection {
        &self.diff
    }

    pub fn projection_section(&self) -> &ProjectionSection {
        &self.projection
    }

    pub fn filter_section(&self) -> &FilterSection {
        &self.filter_section
    }

    pub fn context_lines(&self) -> usize {
        self.context_lines
    }

    pub fn diff_mode(&self) -> DiffMode {
        if self.diff.diff_by_line {
            DiffMode::Line
        } else {
            DiffMode::Word
        }
    }

    pub fn query(&self) -> Option<Arc<dyn Query>> {
        self.query.clone()
    }

    pub fn include_paths(&self) -> &[Path] {
        &self.include_paths
    }

    /// Exclude paths, including `metadata.managedFields` when enabled.
    pub fn exclude_paths(&self) -> &[Path] {
        &self.exclude_paths
    }

    pub fn identity_filter(&self) -> &IdentityFilter {
        &self.filter
    }
}
