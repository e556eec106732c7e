// src/diff/differ.rs

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use tracing::debug;

use crate::diff::options::DiffOptions;
use crate::diff::render::{render_unified, RenderSpec};
use crate::diff::theme::ThemeKind;
use crate::errors::{DriftwatchError, Result};
use crate::projection::{prune_object, remove_path};
use crate::resource::Resource;

/// Title used for the absent side of a diff.
pub const ABSENT_TITLE: &str = "(none)";

/// Result of projecting one snapshot, before encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// An object tree that went through include/exclude filtering.
    Object(Map<String, Value>),
    /// The query produced a non-object value; include/exclude were skipped.
    Scalar(Value),
    /// Absent snapshot, or the query matched nothing.
    Empty,
}

/// Projects snapshots and renders the diff between two of them.
#[derive(Debug, Clone)]
pub struct Differ {
    options: DiffOptions,
}

impl Differ {
    pub fn new(options: DiffOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DiffOptions {
        &self.options
    }

    /// Render the diff from `previous` to `current`.
    ///
    /// `previous_seen` is shown in the left title; the right title uses the
    /// current time. Returns `Ok(None)` when there is nothing to show: both
    /// sides absent, or identical projections while empty diffs are hidden.
    pub fn render(
        &self,
        previous: Option<&Resource>,
        current: Option<&Resource>,
        previous_seen: Option<DateTime<Utc>>,
    ) -> Result<Option<String>> {
        if previous.is_none() && current.is_none() {
            return Ok(None);
        }

        let old_text = self
            .encode(previous)
            .map_err(|err| encoding_context("previous", err))?;
        let new_text = self
            .encode(current)
            .map_err(|err| encoding_context("current", err))?;

        // A change entirely outside the projected fields.
        if old_text == new_text && self.options.hide_empty_diffs {
            debug!("projected snapshots identical; skipping diff");
            return Ok(None);
        }

        let title_old = diff_title(previous, previous_seen);
        let title_new = diff_title(current, Some(Utc::now()));
        let theme = self.options.themes.get(Self::theme_kind(previous, current));

        let spec = RenderSpec {
            title_old: &title_old,
            title_new: &title_new,
            context_lines: self.options.context_lines,
            mode: self.options.mode,
            theme,
            color: self.options.color,
        };

        Ok(Some(render_unified(&old_text, &new_text, &spec)))
    }

    /// Theme used for a diff between these two sides.
    pub fn theme_kind(previous: Option<&Resource>, current: Option<&Resource>) -> ThemeKind {
        ThemeKind::for_pair(previous.is_some(), current.is_some())
    }

    /// Apply query, include and exclude projection to one snapshot.
    pub fn project(&self, resource: Option<&Resource>) -> Result<Projection> {
        let Some(resource) = resource else {
            return Ok(Projection::Empty);
        };

        let mut tree = resource.object().clone();

        if let Some(query) = &self.options.query {
            match query.evaluate(&Value::Object(tree)) {
                None => {
                    debug!(query = query.expression(), "query matched nothing");
                    return Ok(Projection::Empty);
                }
                Some(Value::Object(object)) => tree = object,
                Some(scalar) => return Ok(Projection::Scalar(scalar)),
            }
        }

        if !self.options.include_paths.is_empty() {
            tree = prune_object(&tree, &self.options.include_paths)?;
        }

        for path in &self.options.exclude_paths {
            tree = remove_path(&tree, path)?;
        }

        Ok(Projection::Object(tree))
    }

    /// Projected, canonical YAML text for one snapshot (`""` when absent).
    pub fn encode(&self, resource: Option<&Resource>) -> Result<String> {
        match self.project(resource)? {
            Projection::Empty => Ok(String::new()),
            Projection::Scalar(value) => to_yaml(&value),
            Projection::Object(tree) => to_yaml(&Value::Object(tree)),
        }
    }
}

fn to_yaml(value: &Value) -> Result<String> {
    serde_yaml::to_string(value)
        .map_err(|err| DriftwatchError::Encoding(format!("failed to encode object as YAML: {err}")))
}

fn encoding_context(side: &str, err: DriftwatchError) -> DriftwatchError {
    match err {
        DriftwatchError::Encoding(msg) => {
            DriftwatchError::Encoding(format!("failed to process {side} object: {msg}"))
        }
        other => other,
    }
}

/// `Deployment default/web v42 (2024-01-01T00:00:00Z) (gen. 3)`, or
/// [`ABSENT_TITLE`] when there is no snapshot.
pub fn diff_title(resource: Option<&Resource>, seen: Option<DateTime<Utc>>) -> String {
    let Some(resource) = resource else {
        return ABSENT_TITLE.to_string();
    };

    let timestamp = seen
        .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| "unknown".to_string());

    format!(
        "{} {} v{} ({}) (gen. {})",
        resource.kind(),
        resource.display_name(),
        resource.resource_version(),
        timestamp,
        resource.generation()
    )
}
