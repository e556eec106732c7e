// src/engine/filter.rs

//! Name / namespace allow-lists applied before any cache interaction.

use std::fmt;

use anyhow::Context;
use globset::{Glob, GlobMatcher};

use crate::errors::Result;
use crate::resource::Resource;

/// A single allow-list entry: exact unless it contains `*`.
#[derive(Clone)]
enum NamePattern {
    Exact(String),
    Glob(GlobMatcher),
}

impl NamePattern {
    fn compile(pattern: &str) -> Result<Self> {
        if !pattern.contains('*') {
            return Ok(NamePattern::Exact(pattern.to_string()));
        }

        let glob = Glob::new(pattern).with_context(|| format!("invalid glob pattern: {pattern}"))?;
        Ok(NamePattern::Glob(glob.compile_matcher()))
    }

    fn matches(&self, value: &str) -> bool {
        match self {
            NamePattern::Exact(expected) => expected == value,
            NamePattern::Glob(matcher) => matcher.is_match(value),
        }
    }

    fn as_str(&self) -> &str {
        match self {
            NamePattern::Exact(s) => s,
            NamePattern::Glob(matcher) => matcher.glob().glob(),
        }
    }
}

/// Decides whether a resource is interesting at all.
///
/// An empty list matches everything. Otherwise the resource's name (or
/// namespace) must match at least one entry.
#[derive(Clone, Default)]
pub struct IdentityFilter {
    names: Vec<NamePattern>,
    namespaces: Vec<NamePattern>,
}

impl fmt::Debug for IdentityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.names.iter().map(NamePattern::as_str).collect();
        let namespaces: Vec<&str> = self.namespaces.iter().map(NamePattern::as_str).collect();
        f.debug_struct("IdentityFilter")
            .field("names", &names)
            .field("namespaces", &namespaces)
            .finish()
    }
}

impl IdentityFilter {
    /// A filter that lets everything through.
    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn new(names: &[String], namespaces: &[String]) -> Result<Self> {
        Ok(Self {
            names: compile_all(names)?,
            namespaces: compile_all(namespaces)?,
        })
    }

    pub fn matches(&self, resource: &Resource) -> bool {
        any_match(&self.names, resource.name()) && any_match(&self.namespaces, resource.namespace())
    }
}

fn compile_all(patterns: &[String]) -> Result<Vec<NamePattern>> {
    patterns.iter().map(|p| NamePattern::compile(p)).collect()
}

fn any_match(patterns: &[NamePattern], value: &str) -> bool {
    patterns.is_empty() || patterns.iter().any(|p| p.matches(value))
}
