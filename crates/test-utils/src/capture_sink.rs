use std::sync::Mutex;

use driftwatch::errors::{DriftwatchError, Result};
use driftwatch::output::DiffSink;

/// A `DiffSink` that records every block instead of printing it.
///
/// Can be told to fail, to exercise the dispatcher's error path.
#[derive(Debug, Default)]
pub struct CaptureSink {
    blocks: Mutex<Vec<String>>,
    fail: bool,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose `emit` always returns an error.
    pub fn failing() -> Self {
        Self {
            blocks: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn blocks(&self) -> Vec<String> {
        self.blocks.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.blocks.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiffSink for CaptureSink {
    fn emit(&self, block: &str) -> Result<()> {
        if self.fail {
            return Err(DriftwatchError::IoError(std::io::Error::other("capture sink configured to fail")));
        }
        self.blocks.lock().unwrap().push(block.to_string());
        Ok(())
    }
}
