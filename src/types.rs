use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Granularity of the rendered diff.
///
/// - `Word`: changed lines are shown with the changed words highlighted
///   (default behaviour).
/// - `Line`: entire lines are compared; no highlighting within a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffMode {
    Word,
    Line,
}

impl Default for DiffMode {
    fn default() -> Self {
        DiffMode::Word
    }
}

/// When to emit terminal colour escapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Colour only when stdout is a terminal.
    Auto,
    Always,
    Never,
}

impl Default for ColorMode {
    fn default() -> Self {
        ColorMode::Auto
    }
}

impl ColorMode {
    /// Resolve `Auto` against the current stdout.
    pub fn enabled(self) -> bool {
        use std::io::IsTerminal;

        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        }
    }

    /// Resolve the mode and make `colored` follow it process-wide.
    ///
    /// `colored` otherwise applies its own TTY check, which would strip
    /// escapes from `always` output piped into a pager or a file.
    pub fn resolve(self) -> bool {
        let enabled = self.enabled();
        colored::control::set_override(enabled);
        enabled
    }
}

impl FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(ColorMode::Auto),
            "always" => Ok(ColorMode::Always),
            "never" => Ok(ColorMode::Never),
            other => Err(format!(
                "invalid color mode: {other} (expected \"auto\", \"always\" or \"never\")"
            )),
        }
    }
}

/// Kind of change a notification reports for one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventType {
    Added,
    Modified,
    Deleted,
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "added" => Ok(EventType::Added),
            "modified" => Ok(EventType::Modified),
            "deleted" => Ok(EventType::Deleted),
            other => Err(format!(
                "invalid event type: {other} (expected ADDED, MODIFIED or DELETED)"
            )),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EventType::Added => "ADDED",
            EventType::Modified => "MODIFIED",
            EventType::Deleted => "DELETED",
        };
        f.write_str(s)
    }
}
