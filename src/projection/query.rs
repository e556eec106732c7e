// src/projection/query.rs

//! Query-expression extraction, applied before include/exclude paths.
//!
//! The differ only depends on the [`Query`] trait; [`JsonPathQuery`] is the
//! implementation wired up from configuration.

use std::fmt;

use serde_json::Value;
use serde_json_path::JsonPath;

use crate::errors::{DriftwatchError, Result};

/// A compiled query that reduces a tree to a sub-tree or a scalar.
pub trait Query: Send + Sync + fmt::Debug {
    /// The expression as given by the user.
    fn expression(&self) -> &str;

    /// Evaluate against `tree`, returning the first match.
    ///
    /// `None` means the expression matched nothing.
    fn evaluate(&self, tree: &Value) -> Option<Value>;
}

/// JSONPath query (RFC 9535).
///
/// Kubernetes-style template expressions are accepted as well: surrounding
/// braces are stripped and a leading `.` is anchored at the root, so
/// `{.spec.replicas}` and `$.spec.replicas` are equivalent.
pub struct JsonPathQuery {
    expression: String,
    compiled: JsonPath,
}

impl fmt::Debug for JsonPathQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonPathQuery")
            .field("expression", &self.expression)
            .finish_non_exhaustive()
    }
}

impl JsonPathQuery {
    pub fn compile(expression: &str) -> Result<Self> {
        let normalized = normalize_expression(expression);

        let compiled = JsonPath::parse(&normalized).map_err(|err| DriftwatchError::InvalidQuery {
            expr: expression.to_string(),
            message: err.to_string(),
        })?;

        Ok(Self {
            expression: expression.to_string(),
            compiled,
        })
    }
}

impl Query for JsonPathQuery {
    fn expression(&self) -> &str {
        &self.expression
    }

    fn evaluate(&self, tree: &Value) -> Option<Value> {
        self.compiled
            .query(tree)
            .all()
            .into_iter()
            .next()
            .cloned()
    }
}

fn normalize_expression(expression: &str) -> String {
    let trimmed = expression.trim();

    let inner = trimmed
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .map(str::trim)
        .unwrap_or(trimmed);

    if inner.starts_with('.') || inner.starts_with('[') {
        format!("${inner}")
    } else {
        inner.to_string()
    }
}
