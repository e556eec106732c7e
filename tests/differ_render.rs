// tests/differ_render.rs

use std::error::Error;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use serde_json::json;

use driftwatch::diff::{diff_title, DiffOptions, Differ, Projection, ThemeKind, ABSENT_TITLE};
use driftwatch::projection::{JsonPathQuery, Path};
use driftwatch::types::{ColorMode, DiffMode};
use driftwatch_test_utils::{ConfigFileBuilder, ResourceBuilder};

type TestResult = Result<(), Box<dyn Error>>;

fn paths(exprs: &[&str]) -> Vec<Path> {
    exprs.iter().map(|e| Path::parse(e).unwrap()).collect()
}

#[test]
fn create_diff_has_absent_left_title_and_only_insertions() -> TestResult {
    let differ = Differ::new(DiffOptions::default());
    let web = ResourceBuilder::deployment("web")
        .resource_version("7")
        .generation(2)
        .field("spec", json!({"replicas": 1}))
        .build();

    let out = differ.render(None, Some(&web), None)?.ok_or("expected a diff")?;
    let lines: Vec<&str> = out.lines().collect();

    assert_eq!(lines[0], "--- (none)");
    assert!(lines[1].starts_with("+++ Deployment default/web v7 ("), "{}", lines[1]);
    assert!(lines[1].ends_with(") (gen. 2)"), "{}", lines[1]);
    assert!(lines[2].starts_with("@@ -0,0 +1,"), "{}", lines[2]);
    assert!(lines[3..].iter().all(|l| l.starts_with('+')), "{out}");
    assert!(out.contains("+  replicas: 1"), "{out}");
    Ok(())
}

#[test]
fn delete_diff_has_absent_right_title() -> TestResult {
    let differ = Differ::new(DiffOptions::default());
    let web = ResourceBuilder::deployment("web").build();

    let out = differ
        .render(Some(&web), None, Some(Utc::now()))?
        .ok_or("expected a diff")?;
    let lines: Vec<&str> = out.lines().collect();

    assert!(lines[0].starts_with("--- Deployment default/web"));
    assert_eq!(lines[1], format!("+++ {ABSENT_TITLE}"));
    assert!(lines[3..].iter().all(|l| l.starts_with('-')), "{out}");
    Ok(())
}

#[test]
fn update_diff_shows_changed_line_with_context() -> TestResult {
    let differ = Differ::new(DiffOptions::default().with_mode(DiffMode::Line));
    let old = ResourceBuilder::deployment("web")
        .field("spec", json!({"replicas": 1, "paused": false}))
        .build();
    let new = ResourceBuilder::deployment("web")
        .field("spec", json!({"replicas": 3, "paused": false}))
        .build();

    let out = differ.render(Some(&old), Some(&new), None)?.ok_or("expected a diff")?;

    assert!(out.contains("\n-  replicas: 1\n"), "{out}");
    assert!(out.contains("\n+  replicas: 3\n"), "{out}");
    assert!(out.contains("\n   paused: false\n"), "{out}");
    assert_eq!(out.matches("\n@@ ").count(), 1, "{out}");
    Ok(())
}

#[test]
fn context_lines_limit_the_hunk() -> TestResult {
    let spec = json!({"a": 1, "b": 2, "c": 3, "d": 4, "e": 5, "f": 6, "g": 7});
    let mut changed = spec.clone();
    changed["d"] = json!(40);

    let old = ResourceBuilder::deployment("web").field("spec", spec).build();
    let new = ResourceBuilder::deployment("web").field("spec", changed).build();

    let differ = Differ::new(
        DiffOptions::default()
            .with_mode(DiffMode::Line)
            .with_context_lines(0),
    );
    let out = differ.render(Some(&old), Some(&new), None)?.ok_or("expected a diff")?;

    let body: Vec<&str> = out.lines().skip(3).collect();
    assert_eq!(body, vec!["-  d: 4", "+  d: 40"], "{out}");
    Ok(())
}

#[test]
fn identical_projections_are_suppressed() -> TestResult {
    let differ = Differ::new(DiffOptions::default().with_include_paths(paths(&["spec"])));
    let old = ResourceBuilder::deployment("web").resource_version("1").build();
    let new = ResourceBuilder::deployment("web").resource_version("2").build();

    assert_eq!(differ.render(Some(&old), Some(&new), None)?, None);
    Ok(())
}

#[test]
fn identical_projections_render_when_empty_diffs_shown() -> TestResult {
    let differ = Differ::new(DiffOptions::default().with_hide_empty_diffs(false));
    let web = ResourceBuilder::deployment("web").build();

    let out = differ.render(Some(&web), Some(&web), None)?.ok_or("expected headers")?;
    assert_eq!(out.lines().count(), 2, "{out}");
    Ok(())
}

#[test]
fn both_sides_absent_renders_nothing() -> TestResult {
    let differ = Differ::new(DiffOptions::default().with_hide_empty_diffs(false));
    assert_eq!(differ.render(None, None, None)?, None);
    Ok(())
}

#[test]
fn include_runs_before_exclude() -> TestResult {
    let differ = Differ::new(
        DiffOptions::default()
            .with_include_paths(paths(&["metadata"]))
            .with_exclude_paths(paths(&["metadata.namespace"])),
    );
    let web = ResourceBuilder::deployment("web").label("app", "web").build();

    match differ.project(Some(&web))? {
        Projection::Object(tree) => assert_eq!(
            serde_json::Value::Object(tree),
            json!({"metadata": {"name": "web", "labels": {"app": "web"}}})
        ),
        other => panic!("unexpected projection {other:?}"),
    }
    Ok(())
}

#[test]
fn scalar_query_result_skips_path_filters() -> TestResult {
    let differ = Differ::new(
        DiffOptions::default()
            .with_query(Arc::new(JsonPathQuery::compile("{.spec.replicas}")?))
            .with_include_paths(paths(&["metadata"])),
    );
    let web = ResourceBuilder::deployment("web")
        .field("spec", json!({"replicas": 4}))
        .build();

    assert_eq!(differ.project(Some(&web))?, Projection::Scalar(json!(4)));
    assert_eq!(differ.encode(Some(&web))?, "4\n");
    Ok(())
}

#[test]
fn object_query_result_is_filtered() -> TestResult {
    let differ = Differ::new(
        DiffOptions::default()
            .with_query(Arc::new(JsonPathQuery::compile("{.spec}")?))
            .with_exclude_paths(paths(&["template"])),
    );
    let web = ResourceBuilder::deployment("web")
        .field("spec", json!({"replicas": 4, "template": {"x": 1}}))
        .build();

    assert_eq!(differ.encode(Some(&web))?, "replicas: 4\n");
    Ok(())
}

#[test]
fn query_without_match_encodes_as_empty() -> TestResult {
    let differ = Differ::new(
        DiffOptions::default().with_query(Arc::new(JsonPathQuery::compile("{.status}")?)),
    );
    let web = ResourceBuilder::deployment("web").build();

    assert_eq!(differ.project(Some(&web))?, Projection::Empty);
    assert_eq!(differ.encode(Some(&web))?, "");
    Ok(())
}

#[test]
fn encoding_sorts_keys() -> TestResult {
    let differ = Differ::new(DiffOptions::default());
    let web = ResourceBuilder::deployment("web")
        .field("spec", json!({"zeta": 1, "alpha": 2}))
        .build();

    let text = differ.encode(Some(&web))?;
    let alpha = text.find("alpha").ok_or("alpha missing")?;
    let zeta = text.find("zeta").ok_or("zeta missing")?;
    assert!(alpha < zeta, "{text}");
    assert!(text.starts_with("apiVersion: apps/v1\n"), "{text}");
    Ok(())
}

#[test]
fn colour_disabled_emits_no_escapes() -> TestResult {
    let differ = Differ::new(DiffOptions::default().with_color(false));
    let web = ResourceBuilder::deployment("web").build();

    let out = differ.render(None, Some(&web), None)?.ok_or("expected a diff")?;
    assert!(!out.contains('\u{1b}'), "{out:?}");
    Ok(())
}

#[test]
fn colour_always_emits_escapes_without_a_terminal() -> TestResult {
    // Test output is captured, so stdout is never a terminal here.
    let cfg = ConfigFileBuilder::new().color(ColorMode::Always).build();
    let differ = Differ::new(DiffOptions::from_config(&cfg));
    let web = ResourceBuilder::deployment("web").build();

    let out = differ.render(None, Some(&web), None)?.ok_or("expected a diff")?;
    assert!(out.contains('\u{1b}'), "{out:?}");
    assert!(out.starts_with("\u{1b}["), "{out:?}");
    Ok(())
}

#[test]
fn theme_kind_follows_present_sides() {
    let web = ResourceBuilder::deployment("web").build();

    assert_eq!(Differ::theme_kind(None, Some(&web)), ThemeKind::Create);
    assert_eq!(Differ::theme_kind(Some(&web), None), ThemeKind::Delete);
    assert_eq!(Differ::theme_kind(Some(&web), Some(&web)), ThemeKind::Update);
}

#[test]
fn title_formats_identity_and_timestamp() {
    let web = ResourceBuilder::deployment("web")
        .resource_version("42")
        .generation(3)
        .build();
    let seen = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    assert_eq!(
        diff_title(Some(&web), Some(seen)),
        "Deployment default/web v42 (2024-01-01T00:00:00Z) (gen. 3)"
    );
    assert_eq!(diff_title(None, Some(seen)), "(none)");
}

#[test]
fn title_of_cluster_scoped_resource_has_no_namespace() {
    let node = ResourceBuilder::new("Node", "worker-1")
        .api_version("v1")
        .cluster_scoped()
        .build();
    assert_eq!(diff_title(Some(&node), None), "Node worker-1 v (unknown) (gen. 0)");
}

#[test]
fn themes_follow_change_kind_and_mode() {
    use colored::Color;
    use driftwatch::diff::{Style, Themes};

    let word = Themes::for_mode(DiffMode::Word);
    assert_eq!(word.update.header, Style::fg(Color::Yellow));
    assert_eq!(word.create.header, word.update.header);
    assert_eq!(word.delete.header, word.update.header);
    assert!(word.create.inserted_emphasis.is_none());
    assert!(word.create.deleted_emphasis.is_some());
    assert!(word.delete.deleted_emphasis.is_none());
    assert!(word.update.inserted_emphasis.is_some());

    let line = Themes::for_mode(DiffMode::Line);
    for theme in [&line.create, &line.update, &line.delete] {
        assert!(theme.inserted_emphasis.is_none());
        assert!(theme.deleted_emphasis.is_none());
        assert_eq!(theme.inserted_word(), theme.inserted);
    }
}
