// src/projection/path.rs

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Reasons a dotted path expression can be rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("path cannot be empty")]
    EmptyExpression,

    #[error("path {0:?} does not contain a single path element")]
    NoValidSegments(String),
}

/// A parsed field address such as `metadata.labels`.
///
/// Paths produced by [`Path::parse`] always have at least one segment. The
/// remainder returned by [`Path::tail`] may be empty; the pruning functions
/// treat an empty path as "this exact key".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    /// Split `expr` on `.`, dropping empty segments.
    pub fn parse(expr: &str) -> Result<Self, PathError> {
        if expr.is_empty() {
            return Err(PathError::EmptyExpression);
        }

        let segments: Vec<String> = expr
            .split('.')
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect();

        if segments.is_empty() {
            return Err(PathError::NoValidSegments(expr.to_string()));
        }

        Ok(Self { segments })
    }

    /// First segment, or `""` for an empty path.
    pub fn head(&self) -> &str {
        self.segments.first().map(String::as_str).unwrap_or("")
    }

    /// Everything after the first segment; empty if there is nothing left.
    pub fn tail(&self) -> Path {
        if self.segments.len() <= 1 {
            return Path::default();
        }

        Path {
            segments: self.segments[1..].to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}
