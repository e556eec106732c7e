// src/lib.rs

pub mod cache;
pub mod cli;
pub mod config;
pub mod diff;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod output;
pub mod projection;
pub mod resource;
pub mod types;
pub mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cache::ResourceCache;
use crate::cli::CliArgs;
use crate::config::{load_with_overrides, ConfigFile};
use crate::diff::{DiffOptions, Differ};
use crate::engine::{Dispatcher, Runtime};
use crate::output::StdoutSink;
use crate::watch::{spawn_directory_source, spawn_reader_source, ManifestPatterns};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (file + CLI flags)
/// - differ / cache / dispatcher
/// - the notification source (stdin or a manifest directory)
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_with_overrides(&args)?;

    if args.dry_run {
        print_dry_run(&args, &cfg);
        return Ok(());
    }

    let differ = Differ::new(DiffOptions::from_config(&cfg));
    let cache = Arc::new(ResourceCache::new());
    let dispatcher = Arc::new(Dispatcher::new(
        differ,
        cache,
        cfg.identity_filter().clone(),
        Arc::new(StdoutSink::new()),
    ));

    // Ctrl-C → graceful shutdown.
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            cancel.cancel();
        });
    }

    // The watcher handle must outlive the runtime.
    let (source_rx, _watcher_handle) = if args.reads_stdin() {
        info!("reading notifications from stdin");
        (spawn_reader_source(std::io::stdin())?, None)
    } else {
        let root = PathBuf::from(&args.source);
        if !root.is_dir() {
            anyhow::bail!("source {:?} is neither `-` nor a directory", args.source);
        }
        let (rx, handle) = spawn_directory_source(root, ManifestPatterns::default())
            .with_context(|| format!("watching {}", args.source))?;
        (rx, Some(handle))
    };

    let summary = Runtime::new(dispatcher, source_rx, cancel).run().await?;
    for (kind, count) in &summary {
        debug!(%kind, count, "notifications handled");
    }

    Ok(())
}

/// Print the effective options without watching anything.
fn print_dry_run(args: &CliArgs, cfg: &ConfigFile) {
    let diff = cfg.diff_section();
    let projection = cfg.projection_section();

    println!("driftwatch dry-run");
    println!("  source = {:?}", args.source);
    println!();

    println!("diff:");
    println!("  context_lines = {}", cfg.context_lines());
    println!("  mode = {:?}", cfg.diff_mode());
    println!("  show_empty = {}", diff.show_empty);
    println!("  color = {:?}", diff.color);
    println!();

    println!("projection:");
    if let Some(query) = cfg.query() {
        println!("  jsonpath = {}", query.expression());
    }
    if !cfg.include_paths().is_empty() {
        let show: Vec<String> = cfg.include_paths().iter().map(ToString::to_string).collect();
        println!("  show = {show:?}");
    }
    if !cfg.exclude_paths().is_empty() {
        let hide: Vec<String> = cfg.exclude_paths().iter().map(ToString::to_string).collect();
        println!("  hide = {hide:?}");
    }
    println!("  hide_managed_fields = {}", projection.hide_managed_fields);
    println!();

    let filter = cfg.filter_section();
    println!("filter:");
    println!("  names = {:?}", filter.names);
    println!("  namespaces = {:?}", filter.namespaces);

    debug!("dry-run complete (no watching)");
}
