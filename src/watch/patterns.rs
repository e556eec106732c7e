// src/watch/patterns.rs

use std::fmt;
use std::path::Path;

use anyhow::Context;
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::errors::Result;

/// File names treated as manifests by the directory source.
pub const DEFAULT_MANIFEST_PATTERNS: &[&str] = &["*.yaml", "*.yml", "*.json"];

/// Compiled file-name patterns selecting which files are manifests.
///
/// Matching is done on the file name only. Hidden files (editor temporaries
/// such as `.web.yaml.swp`) never match.
#[derive(Clone)]
pub struct ManifestPatterns {
    patterns: Vec<String>,
    set: GlobSet,
}

impl fmt::Debug for ManifestPatterns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManifestPatterns")
            .field("patterns", &self.patterns)
            .finish_non_exhaustive()
    }
}

impl ManifestPatterns {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pat in patterns {
            let pat = pat.as_ref();
            let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
            builder.add(glob);
        }

        let set = builder.build().context("building manifest globset")?;

        Ok(Self {
            patterns: patterns.iter().map(|p| p.as_ref().to_string()).collect(),
            set,
        })
    }

    pub fn is_manifest(&self, path: &Path) -> bool {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };

        !file_name.starts_with('.') && self.set.is_match(file_name)
    }
}

impl Default for ManifestPatterns {
    fn default() -> Self {
        let mut builder = GlobSetBuilder::new();
        for pat in DEFAULT_MANIFEST_PATTERNS {
            if let Ok(glob) = Glob::new(pat) {
                builder.add(glob);
            }
        }

        Self {
            patterns: DEFAULT_MANIFEST_PATTERNS.iter().map(|p| p.to_string()).collect(),
            set: builder.build().unwrap_or_else(|_| GlobSet::empty()),
        }
    }
}
