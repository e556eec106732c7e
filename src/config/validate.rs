// src/config/validate.rs

use std::sync::Arc;

use crate::config::model::{ConfigFile, FilterSection, RawConfigFile};
use crate::diff::MANAGED_FIELDS_PATH;
use crate::engine::IdentityFilter;
use crate::errors::{DriftwatchError, Result};
use crate::projection::{JsonPathQuery, Path, Query};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::DriftwatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let context_lines = validate_context_lines(raw.diff.context_lines)?;
        let query = compile_query(raw.projection.jsonpath.as_deref())?;
        let include_paths = parse_paths("include", &raw.projection.show)?;

        let mut exclude_paths = parse_paths("exclude", &raw.projection.hide)?;
        if raw.projection.hide_managed_fields {
            let managed = parse_path("exclude", MANAGED_FIELDS_PATH)?;
            if !exclude_paths.contains(&managed) {
                exclude_paths.push(managed);
            }
        }

        let filter = build_filter(&raw.filter)?;

        Ok(ConfigFile::new_unchecked(
            raw.diff,
            raw.projection,
            raw.filter,
            context_lines,
            query,
            include_paths,
            exclude_paths,
            filter,
        ))
    }
}

fn validate_context_lines(lines: i64) -> Result<usize> {
    usize::try_from(lines).map_err(|_| {
        DriftwatchError::ConfigError(format!("[diff].context_lines must be >= 0 (got {lines})"))
    })
}

fn compile_query(expr: Option<&str>) -> Result<Option<Arc<dyn Query>>> {
    match expr.map(str::trim) {
        None | Some("") => Ok(None),
        Some(expr) => Ok(Some(Arc::new(JsonPathQuery::compile(expr)?))),
    }
}

fn parse_paths(role: &'static str, exprs: &[String]) -> Result<Vec<Path>> {
    exprs.iter().map(|expr| parse_path(role, expr)).collect()
}

fn parse_path(role: &'static str, expr: &str) -> Result<Path> {
    Path::parse(expr).map_err(|source| DriftwatchError::InvalidPath {
        role,
        expr: expr.to_string(),
        source,
    })
}

fn build_filter(section: &FilterSection) -> Result<IdentityFilter> {
    IdentityFilter::new(&section.names, &section.namespaces)
        .map_err(|err| DriftwatchError::ConfigError(format!("[filter]: {err}")))
}
