// tests/stdin_source.rs

use std::error::Error;
use std::io::Cursor;

use serde_json::json;

use driftwatch::types::EventType;
use driftwatch::watch::{into_notification, read_notifications, spawn_reader_source};
use driftwatch::resource::Notification;
use driftwatch_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

fn collect(input: &str) -> Result<Vec<Notification>, Box<dyn Error>> {
    let mut out = Vec::new();
    read_notifications(Cursor::new(input.as_bytes().to_vec()), |n| {
        out.push(n);
        true
    })?;
    Ok(out)
}

fn name_of(n: &Notification) -> &str {
    n.payload["metadata"]["name"].as_str().unwrap_or("")
}

#[test]
fn yaml_documents_become_modified_notifications() -> TestResult {
    let input = "\
apiVersion: v1
kind: ConfigMap
metadata:
  name: first
---
apiVersion: v1
kind: ConfigMap
metadata:
  name: second
data:
  key: value
";
    let notifications = collect(input)?;

    assert_eq!(notifications.len(), 2);
    assert!(notifications.iter().all(|n| n.event == EventType::Modified));
    assert_eq!(name_of(&notifications[0]), "first");
    assert_eq!(notifications[1].payload["data"], json!({"key": "value"}));
    Ok(())
}

#[test]
fn leading_separator_and_empty_documents_are_skipped() -> TestResult {
    let input = "---\n---\napiVersion: v1\nkind: Pod\nmetadata:\n  name: p\n---\n\n...\n";
    let notifications = collect(input)?;
    assert_eq!(notifications.len(), 1);
    assert_eq!(name_of(&notifications[0]), "p");
    Ok(())
}

#[test]
fn json_stream_is_decoded() -> TestResult {
    let input = r#"{"apiVersion":"v1","kind":"Pod","metadata":{"name":"a"}}
{"apiVersion":"v1","kind":"Pod","metadata":{"name":"b"}}"#;
    let notifications = collect(input)?;

    let names: Vec<&str> = notifications.iter().map(name_of).collect();
    assert_eq!(names, vec!["a", "b"]);
    Ok(())
}

#[test]
fn watch_event_envelopes_carry_their_type() -> TestResult {
    let input = r#"
{"type":"ADDED","object":{"apiVersion":"v1","kind":"Pod","metadata":{"name":"a"}}}
{"type":"DELETED","object":{"apiVersion":"v1","kind":"Pod","metadata":{"name":"a"}}}
"#;
    let notifications = collect(input)?;

    assert_eq!(notifications.len(), 2);
    assert_eq!(notifications[0].event, EventType::Added);
    assert_eq!(notifications[1].event, EventType::Deleted);
    assert_eq!(name_of(&notifications[1]), "a");
    Ok(())
}

#[test]
fn list_documents_are_expanded() -> TestResult {
    let input = "\
apiVersion: v1
kind: List
items:
- apiVersion: v1
  kind: Pod
  metadata:
    name: a
- apiVersion: v1
  kind: Pod
  metadata:
    name: b
";
    let notifications = collect(input)?;
    let names: Vec<&str> = notifications.iter().map(name_of).collect();
    assert_eq!(names, vec!["a", "b"]);
    Ok(())
}

#[test]
fn undecodable_yaml_document_is_skipped() -> TestResult {
    let input = "kind: [unclosed\n---\napiVersion: v1\nkind: Pod\nmetadata:\n  name: ok\n";
    let notifications = collect(input)?;
    assert_eq!(notifications.len(), 1);
    assert_eq!(name_of(&notifications[0]), "ok");
    Ok(())
}

#[test]
fn emit_returning_false_stops_reading() -> TestResult {
    let input = "a: 1\n---\nb: 2\n---\nc: 3\n";
    let mut seen = 0;
    let emitted = read_notifications(Cursor::new(input.as_bytes().to_vec()), |_| {
        seen += 1;
        seen < 2
    })?;
    assert_eq!(seen, 2);
    assert_eq!(emitted, 1);
    Ok(())
}

#[test]
fn blank_input_yields_nothing() -> TestResult {
    assert!(collect("  \n\n")?.is_empty());
    Ok(())
}

#[tokio::test]
async fn reader_source_closes_at_eof() -> TestResult {
    init_tracing();
    let input = "apiVersion: v1\nkind: Pod\nmetadata:\n  name: a\n---\napiVersion: v1\nkind: Pod\nmetadata:\n  name: b\n";
    let mut rx = spawn_reader_source(Cursor::new(input.as_bytes().to_vec()))?;

    let mut names = Vec::new();
    while let Some(n) = with_timeout(rx.recv()).await {
        names.push(name_of(&n).to_string());
    }

    assert_eq!(names, vec!["a", "b"]);
    Ok(())
}

#[test]
fn bookmark_and_error_watch_events_are_skipped() -> TestResult {
    let input = r#"
{"type":"BOOKMARK","object":{"apiVersion":"v1","kind":"Pod","metadata":{"resourceVersion":"12"}}}
{"type":"ERROR","object":{"kind":"Status","apiVersion":"v1","status":"Failure","code":410}}
{"type":"MODIFIED","object":{"apiVersion":"v1","kind":"Pod","metadata":{"name":"a"}}}
"#;
    let notifications = collect(input)?;

    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].event, EventType::Modified);
    assert_eq!(name_of(&notifications[0]), "a");
    Ok(())
}

#[test]
fn plain_documents_keep_the_default_event() {
    let pod = json!({"apiVersion": "v1", "kind": "Pod", "type": "ERROR", "object": {}});
    let notification = into_notification(pod.clone(), EventType::Modified).expect("plain document");
    assert_eq!(notification.event, EventType::Modified);
    assert_eq!(notification.payload, pod);
}
