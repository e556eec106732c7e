// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{ArgAction, Parser, ValueEnum};

use crate::types::ColorMode;

/// Command-line arguments for `driftwatch`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "driftwatch",
    version,
    about = "Print colourised diffs as watched resources change.",
    long_about = None
)]
pub struct CliArgs {
    /// Where notifications come from: `-` for stdin (e.g. piped from
    /// `kubectl get -w -o yaml`), or a directory of manifest files.
    #[arg(value_name = "SOURCE")]
    pub source: String,

    /// Only show resources with these names. Entries containing `*` are globs.
    #[arg(value_name = "NAMES")]
    pub names: Vec<String>,

    /// Only show resources in these namespaces (repeatable).
    #[arg(short = 'n', long = "namespace", value_name = "NAMESPACE")]
    pub namespaces: Vec<String>,

    /// Query applied to each object before diffing, e.g. `{.spec}`.
    #[arg(short = 'j', long, value_name = "EXPR")]
    pub jsonpath: Option<String>,

    /// Only diff these dot-separated paths (repeatable).
    #[arg(short = 's', long, value_name = "PATH")]
    pub show: Vec<String>,

    /// Never diff these dot-separated paths (repeatable).
    #[arg(short = 'x', long, value_name = "PATH")]
    pub hide: Vec<String>,

    /// Hide `metadata.managedFields` (default: true).
    #[arg(long, value_name = "BOOL", action = ArgAction::Set)]
    pub hide_managed: Option<bool>,

    /// Print a diff even when the projected objects are identical.
    #[arg(short = 'e', long)]
    pub show_empty: bool,

    /// Compare whole lines instead of highlighting changed words.
    #[arg(short = 'w', long)]
    pub diff_by_line: bool,

    /// Lines of context around each change (default: 3).
    #[arg(short = 'c', long, value_name = "N", allow_negative_numbers = true)]
    pub context_lines: Option<i64>,

    /// When to colour the output.
    #[arg(long, value_enum, value_name = "WHEN")]
    pub color: Option<ColorMode>,

    /// Optional config file (TOML). Command-line flags take precedence.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DRIFTWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Validate options, print the effective configuration, and exit.
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// Whether notifications are read from stdin.
    pub fn reads_stdin(&self) -> bool {
        self.source == "-"
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
