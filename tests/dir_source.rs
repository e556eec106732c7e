// tests/dir_source.rs

use std::error::Error;
use std::path::Path;

use driftwatch::resource::Notification;
use driftwatch::types::EventType;
use driftwatch::watch::{spawn_directory_source, ManifestPatterns, ManifestTracker};
use driftwatch_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

const TWO_DEPLOYMENTS: &str = "\
apiVersion: apps/v1
kind: Deployment
metadata:
  name: web
  namespace: default
spec:
  replicas: 1
---
apiVersion: apps/v1
kind: Deployment
metadata:
  name: api
  namespace: default
spec:
  replicas: 1
";

fn summary(notifications: &[Notification]) -> Vec<(EventType, String)> {
    notifications
        .iter()
        .map(|n| {
            let name = n.payload["metadata"]["name"].as_str().unwrap_or("").to_string();
            (n.event, name)
        })
        .collect()
}

#[test]
fn first_write_adds_every_resource() {
    let mut tracker = ManifestTracker::new();
    let out = tracker.file_written(Path::new("app.yaml"), TWO_DEPLOYMENTS);

    assert_eq!(
        summary(&out),
        vec![(EventType::Added, "api".into()), (EventType::Added, "web".into())]
    );
    assert_eq!(tracker.len(), 1);
}

#[test]
fn rewriting_identical_content_is_silent() {
    let mut tracker = ManifestTracker::new();
    tracker.file_written(Path::new("app.yaml"), TWO_DEPLOYMENTS);
    assert!(tracker.file_written(Path::new("app.yaml"), TWO_DEPLOYMENTS).is_empty());
}

#[test]
fn changes_are_reported_per_resource() {
    let mut tracker = ManifestTracker::new();
    tracker.file_written(Path::new("app.yaml"), TWO_DEPLOYMENTS);

    let updated = "\
apiVersion: apps/v1
kind: Deployment
metadata:
  name: web
  namespace: default
spec:
  replicas: 3
---
apiVersion: v1
kind: Service
metadata:
  name: web
  namespace: default
";
    let out = tracker.file_written(Path::new("app.yaml"), updated);

    let mut got = summary(&out);
    got.sort_by(|a, b| a.1.cmp(&b.1).then(format!("{:?}", a.0).cmp(&format!("{:?}", b.0))));
    assert_eq!(
        got,
        vec![
            (EventType::Deleted, "api".into()),
            (EventType::Added, "web".into()),
            (EventType::Modified, "web".into()),
        ]
    );

    let modified = out
        .iter()
        .find(|n| n.event == EventType::Modified)
        .expect("modified notification");
    assert_eq!(modified.payload["spec"]["replicas"], 3);
}

#[test]
fn removing_a_file_deletes_its_resources() {
    let mut tracker = ManifestTracker::new();
    tracker.file_written(Path::new("app.yaml"), TWO_DEPLOYMENTS);

    let out = tracker.file_removed(Path::new("app.yaml"));
    assert_eq!(
        summary(&out),
        vec![(EventType::Deleted, "api".into()), (EventType::Deleted, "web".into())]
    );
    assert!(tracker.is_empty());
    assert!(tracker.file_removed(Path::new("app.yaml")).is_empty());
}

#[test]
fn undecodable_write_keeps_previous_state() {
    let mut tracker = ManifestTracker::new();
    tracker.file_written(Path::new("app.yaml"), TWO_DEPLOYMENTS);

    assert!(tracker.file_written(Path::new("app.yaml"), "kind: [broken").is_empty());

    let out = tracker.file_removed(Path::new("app.yaml"));
    assert_eq!(out.len(), 2);
}

#[test]
fn manifest_patterns_match_file_names() -> TestResult {
    let patterns = ManifestPatterns::default();
    assert!(patterns.is_manifest(Path::new("/tmp/x/app.yaml")));
    assert!(patterns.is_manifest(Path::new("svc.json")));
    assert!(!patterns.is_manifest(Path::new("notes.txt")));
    assert!(!patterns.is_manifest(Path::new(".app.yaml")));

    let custom = ManifestPatterns::new(&["*.k8s"])?;
    assert!(custom.is_manifest(Path::new("a.k8s")));
    assert!(!custom.is_manifest(Path::new("a.yaml")));
    Ok(())
}

#[tokio::test]
async fn initial_scan_reports_existing_manifests() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("app.yaml"), TWO_DEPLOYMENTS)?;
    std::fs::write(dir.path().join("README.md"), "not a manifest")?;

    let (mut rx, _handle) = spawn_directory_source(dir.path(), ManifestPatterns::default())?;

    let mut seen = Vec::new();
    for _ in 0..2 {
        let n = with_timeout(rx.recv()).await.ok_or("source closed early")?;
        seen.push(n);
    }

    assert_eq!(
        summary(&seen),
        vec![(EventType::Added, "api".into()), (EventType::Added, "web".into())]
    );
    Ok(())
}
