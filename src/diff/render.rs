// src/diff/render.rs

//! Unified diff rendering on top of `similar`.

use std::ops::Range;

use similar::{Algorithm, ChangeTag, DiffOp, TextDiff};

use crate::diff::theme::{ColorTheme, Style};
use crate::types::DiffMode;

/// Everything needed to turn two encoded texts into a unified diff.
#[derive(Debug, Clone, Copy)]
pub struct RenderSpec<'a> {
    pub title_old: &'a str,
    pub title_new: &'a str,
    pub context_lines: usize,
    pub mode: DiffMode,
    pub theme: &'a ColorTheme,
    pub color: bool,
}

/// Render a unified diff of `old` against `new`.
///
/// Output always starts with the `---`/`+++` title lines; each hunk header
/// sits on its own line. The returned text ends with a newline.
pub fn render_unified(old: &str, new: &str, spec: &RenderSpec<'_>) -> String {
    let painter = Painter { color: spec.color };
    let theme = spec.theme;

    let diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_lines(old, new);

    let mut out = String::new();
    push_line(&mut out, painter.paint(theme.header, &format!("--- {}", spec.title_old)));
    push_line(&mut out, painter.paint(theme.header, &format!("+++ {}", spec.title_new)));

    for group in diff.grouped_ops(spec.context_lines) {
        push_line(&mut out, painter.paint(theme.section, &hunk_header(&group)));

        for op in &group {
            match spec.mode {
                DiffMode::Word => {
                    for change in diff.iter_inline_changes(op) {
                        let segments: Vec<(bool, String)> = change
                            .iter_strings_lossy()
                            .map(|(emphasized, text)| (emphasized, text.into_owned()))
                            .collect();
                        out.push_str(&painter.line(change.tag(), &segments, theme));
                    }
                }
                DiffMode::Line => {
                    for change in diff.iter_changes(op) {
                        let segments = vec![(false, change.to_string_lossy().into_owned())];
                        out.push_str(&painter.line(change.tag(), &segments, theme));
                    }
                }
            }
        }
    }

    out
}

/// `@@ -old +new @@` for a group of ops, in unified-diff numbering.
pub fn hunk_header(group: &[DiffOp]) -> String {
    let (old, new) = match (group.first(), group.last()) {
        (Some(first), Some(last)) => (
            first.old_range().start..last.old_range().end,
            first.new_range().start..last.new_range().end,
        ),
        _ => (0..0, 0..0),
    };

    format!("@@ -{} +{} @@", format_range(&old), format_range(&new))
}

fn format_range(range: &Range<usize>) -> String {
    let len = range.len();
    let start = if len == 0 { range.start } else { range.start + 1 };

    if len == 1 {
        start.to_string()
    } else {
        format!("{start},{len}")
    }
}

fn push_line(out: &mut String, line: String) {
    out.push_str(&line);
    out.push('\n');
}

struct Painter {
    color: bool,
}

impl Painter {
    fn paint(&self, style: Style, text: &str) -> String {
        if self.color && !text.is_empty() {
            style.apply(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// One diff line with its `-`/`+`/` ` marker and trailing newline.
    fn line(&self, tag: ChangeTag, segments: &[(bool, String)], theme: &ColorTheme) -> String {
        let (marker, plain, emphasis) = match tag {
            ChangeTag::Delete => ("-", theme.deleted, theme.deleted_word()),
            ChangeTag::Insert => ("+", theme.inserted, theme.inserted_word()),
            ChangeTag::Equal => (" ", theme.context, theme.context),
        };

        let mut line = self.paint(plain, marker);
        let last = segments.len().saturating_sub(1);

        for (index, (emphasized, text)) in segments.iter().enumerate() {
            let text = if index == last {
                text.trim_end_matches(['\n', '\r'])
            } else {
                text.as_str()
            };
            let style = if *emphasized { emphasis } else { plain };
            line.push_str(&self.paint(style, text));
        }

        line.push('\n');
        line
    }
}
