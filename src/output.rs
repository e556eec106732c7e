// src/output.rs

//! Pluggable destination for rendered diffs.
//!
//! The dispatcher talks to a `DiffSink` instead of writing to stdout
//! directly. Production uses [`StdoutSink`]; tests provide a sink that
//! records the blocks it receives.

use std::io::Write;

use crate::errors::Result;

/// Receives one rendered diff block per notification.
///
/// Implementations are shared between per-kind workers and must keep each
/// block contiguous in their output.
pub trait DiffSink: Send + Sync {
    fn emit(&self, block: &str) -> Result<()>;
}

/// Writes blocks to stdout, separated by a blank line.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl StdoutSink {
    pub fn new() -> Self {
        Self
    }
}

impl DiffSink for StdoutSink {
    fn emit(&self, block: &str) -> Result<()> {
        // Holding the lock for the whole block keeps concurrent workers from
        // interleaving lines.
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();

        handle.write_all(block.as_bytes())?;
        if !block.ends_with('\n') {
            handle.write_all(b"\n")?;
        }
        handle.write_all(b"\n")?;
        handle.flush()?;
        Ok(())
    }
}
