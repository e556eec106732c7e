// src/diff/theme.rs

//! Colour themes for rendered diffs.
//!
//! Three themes exist, one per kind of change. They are plain values built
//! once from the diff mode and carried in [`DiffOptions`](super::DiffOptions).

use colored::{Color, ColoredString, Colorize};

use crate::types::DiffMode;

/// Which theme a rendering uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeKind {
    /// No previous snapshot (entity appeared).
    Create,
    /// Both snapshots present.
    Update,
    /// No current snapshot (entity went away).
    Delete,
}

impl ThemeKind {
    /// Select the theme from which sides of the diff are present.
    pub fn for_pair(previous_present: bool, current_present: bool) -> Self {
        match (previous_present, current_present) {
            (false, _) => ThemeKind::Create,
            (true, false) => ThemeKind::Delete,
            (true, true) => ThemeKind::Update,
        }
    }
}

/// Terminal text style.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
}

impl Style {
    pub const fn plain() -> Self {
        Self {
            fg: None,
            bg: None,
            bold: false,
        }
    }

    pub const fn fg(color: Color) -> Self {
        Self {
            fg: Some(color),
            bg: None,
            bold: false,
        }
    }

    pub fn on(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn apply(&self, text: &str) -> ColoredString {
        let mut styled = text.normal();
        if let Some(fg) = self.fg {
            styled = styled.color(fg);
        }
        if let Some(bg) = self.bg {
            styled = styled.on_color(bg);
        }
        if self.bold {
            styled = styled.bold();
        }
        styled
    }
}

/// Styles for each part of a unified diff.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorTheme {
    /// `---` / `+++` title lines.
    pub header: Style,
    /// `@@ ... @@` hunk headers.
    pub section: Style,
    pub context: Style,
    pub deleted: Style,
    pub inserted: Style,
    /// Changed words inside a deleted line; `None` falls back to `deleted`.
    pub deleted_emphasis: Option<Style>,
    /// Changed words inside an inserted line; `None` falls back to `inserted`.
    pub inserted_emphasis: Option<Style>,
}

impl ColorTheme {
    pub fn deleted_word(&self) -> Style {
        self.deleted_emphasis.unwrap_or(self.deleted)
    }

    pub fn inserted_word(&self) -> Style {
        self.inserted_emphasis.unwrap_or(self.inserted)
    }

    fn base() -> Self {
        Self {
            header: Style::fg(Color::White).bold(),
            section: Style::fg(Color::Cyan),
            context: Style::plain(),
            deleted: Style::fg(Color::Red),
            inserted: Style::fg(Color::Green),
            deleted_emphasis: Some(Style::fg(Color::White).on(Color::Red).bold()),
            inserted_emphasis: Some(Style::fg(Color::Black).on(Color::Green).bold()),
        }
    }

    fn without_word_emphasis(mut self) -> Self {
        self.deleted_emphasis = None;
        self.inserted_emphasis = None;
        self
    }
}

/// The create/update/delete theme set.
#[derive(Debug, Clone, PartialEq)]
pub struct Themes {
    pub create: ColorTheme,
    pub update: ColorTheme,
    pub delete: ColorTheme,
}

impl Themes {
    /// Default themes for the given diff granularity.
    ///
    /// All three share the yellow title style. Create diffs are all
    /// insertions and delete diffs all deletions, so word emphasis is dropped
    /// on the one side that matters. Line mode drops word emphasis everywhere.
    pub fn for_mode(mode: DiffMode) -> Self {
        let mut update = ColorTheme::base();
        update.header = Style::fg(Color::Yellow);

        let mut create = update.clone();
        create.inserted_emphasis = None;

        let mut delete = update.clone();
        delete.deleted_emphasis = None;

        match mode {
            DiffMode::Word => Self {
                create,
                update,
                delete,
            },
            DiffMode::Line => Self {
                create: create.without_word_emphasis(),
                update: update.without_word_emphasis(),
                delete: delete.without_word_emphasis(),
            },
        }
    }

    pub fn get(&self, kind: ThemeKind) -> &ColorTheme {
        match kind {
            ThemeKind::Create => &self.create,
            ThemeKind::Update => &self.update,
            ThemeKind::Delete => &self.delete,
        }
    }
}

impl Default for Themes {
    fn default() -> Self {
        Self::for_mode(DiffMode::default())
    }
}
