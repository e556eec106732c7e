// src/diff/mod.rs

//! Snapshot diffing.
//!
//! The pipeline for one notification is:
//! query extraction → include pruning → exclude removal → canonical YAML →
//! word/line diff → coloured unified rendering.
//!
//! Options and themes are validated values built once at startup
//! ([`options`], [`theme`]); the [`Differ`] itself holds no mutable state
//! and can be shared between workers.

pub mod differ;
pub mod options;
pub mod render;
pub mod theme;

pub use differ::{diff_title, Differ, Projection, ABSENT_TITLE};
pub use options::{DiffOptions, DEFAULT_CONTEXT_LINES, MANAGED_FIELDS_PATH};
pub use theme::{ColorTheme, Style, ThemeKind, Themes};
