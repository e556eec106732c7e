// src/watch/stdin.rs

//! Notification source reading a stream of documents, typically stdin.
//!
//! Supports both `kubectl get -w -o yaml` style output (YAML documents
//! separated by `---`) and `-o json` style output (concatenated JSON
//! values). The format is picked from the first non-blank byte.

use std::io::{self, BufRead, BufReader, Read};

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::errors::Result;
use crate::resource::Notification;
use crate::types::EventType;
use crate::watch::decode::notifications_from_value;

/// Channel capacity between the reader thread and the runtime.
pub const READER_CHANNEL_CAPACITY: usize = 64;

/// Documents without an explicit event type are treated as modifications.
const DEFAULT_EVENT: EventType = EventType::Modified;

/// Spawn a thread that decodes `reader` and forwards notifications.
///
/// The returned channel closes when the reader hits EOF or the receiver is
/// dropped. A plain thread is used rather than `spawn_blocking` so that a
/// blocked stdin read never delays runtime shutdown.
pub fn spawn_reader_source<R>(reader: R) -> Result<mpsc::Receiver<Notification>>
where
    R: Read + Send + 'static,
{
    let (tx, rx) = mpsc::channel(READER_CHANNEL_CAPACITY);

    std::thread::Builder::new()
        .name("driftwatch-reader".to_string())
        .spawn(move || {
            let reader = BufReader::new(reader);
            let result = read_notifications(reader, |notification| tx.blocking_send(notification).is_ok());

            match result {
                Ok(count) => info!(count, "input stream finished"),
                Err(err) => error!(error = %err, "failed to read input stream"),
            }
        })?;

    Ok(rx)
}

/// Decode all documents from `reader`, calling `emit` for each notification.
///
/// `emit` returns `false` to stop reading. Documents that fail to decode are
/// logged and skipped. Returns the number of notifications emitted.
pub fn read_notifications<R, F>(mut reader: R, mut emit: F) -> Result<usize>
where
    R: BufRead,
    F: FnMut(Notification) -> bool,
{
    match first_significant_byte(&mut reader)? {
        None => Ok(0),
        Some(b'{') | Some(b'[') => read_json_stream(reader, &mut emit),
        Some(_) => read_yaml_stream(reader, &mut emit),
    }
}

fn read_json_stream<R, F>(reader: R, emit: &mut F) -> Result<usize>
where
    R: BufRead,
    F: FnMut(Notification) -> bool,
{
    let mut emitted = 0;

    for decoded in serde_json::Deserializer::from_reader(reader).into_iter::<Value>() {
        let value = match decoded {
            Ok(value) => value,
            Err(err) => {
                // The stream cannot resynchronise after a syntax error.
                warn!(error = %err, "failed to decode JSON document; stopping");
                break;
            }
        };

        for notification in notifications_from_value(value, DEFAULT_EVENT) {
            if !emit(notification) {
                return Ok(emitted);
            }
            emitted += 1;
        }
    }

    Ok(emitted)
}

fn read_yaml_stream<R, F>(reader: R, emit: &mut F) -> Result<usize>
where
    R: BufRead,
    F: FnMut(Notification) -> bool,
{
    let mut emitted = 0;
    let mut document = String::new();

    for line in reader.lines() {
        let line = line?;

        if is_document_separator(&line) {
            if !flush_yaml_document(&mut document, emit, &mut emitted) {
                return Ok(emitted);
            }
            continue;
        }

        document.push_str(&line);
        document.push('\n');
    }

    flush_yaml_document(&mut document, emit, &mut emitted);
    Ok(emitted)
}

/// Decode and emit the buffered document; returns `false` if `emit` asked
/// to stop.
fn flush_yaml_document<F>(document: &mut String, emit: &mut F, emitted: &mut usize) -> bool
where
    F: FnMut(Notification) -> bool,
{
    let text = std::mem::take(document);
    if text.trim().is_empty() {
        return true;
    }

    let value: Value = match serde_yaml::from_str(&text) {
        Ok(Value::Null) => return true,
        Ok(value) => value,
        Err(err) => {
            error!(error = %err, "failed to decode YAML document");
            return true;
        }
    };

    for notification in notifications_from_value(value, DEFAULT_EVENT) {
        debug!(event = %notification.event, "decoded document");
        if !emit(notification) {
            return false;
        }
        *emitted += 1;
    }

    true
}

fn is_document_separator(line: &str) -> bool {
    let line = line.trim_end();
    line == "---" || line == "..." || line.starts_with("--- ")
}

/// Skip leading whitespace and peek at the first remaining byte.
fn first_significant_byte<R: BufRead>(reader: &mut R) -> io::Result<Option<u8>> {
    loop {
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            return Ok(None);
        }

        match buf.iter().position(|b| !b.is_ascii_whitespace()) {
            Some(pos) => {
                let byte = buf[pos];
                reader.consume(pos);
                return Ok(Some(byte));
            }
            None => {
                let len = buf.len();
                reader.consume(len);
            }
        }
    }
}
