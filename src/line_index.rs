//! Line-offset index over a block of rendered text.
//!
//! Splits text into lines and records each line's half-open character range
//! so later hit-testing and match mapping can translate between flat offsets
//! and line numbers. Tabs are pre-expanded to a fixed number of spaces to
//! keep offsets stable under an external fixed-width measurement callback.

use serde::{Deserialize, Serialize};

/// Width a tab expands to before indexing.
pub const TAB_WIDTH: usize = 4;

// ─────────────────────────────────────────────────────────────────────────────
// Types
// ─────────────────────────────────────────────────────────────────────────────

/// One line's half-open offset range within the indexed text.
///
/// `end` is exclusive and excludes the newline; the next record's `start` is
/// `end + 1`. Lines are contiguous and gapless, and together cover the text
/// exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRecord {
    pub start: usize,
    pub end: usize,

    /// Leading-space count of the line
    pub indent: u32,
}

/// Index of lines over one region's text.
#[derive(Debug, Clone, Default)]
pub struct LineIndex {
    text: String,
    lines: Vec<LineRecord>,
}

impl LineIndex {
    /// Build an index over `text`, expanding tabs first.
    ///
    /// Empty text yields a single zero-length line record.
    pub fn build(text: &str) -> Self {
        let text = expand_tabs(text);
        let mut lines = Vec::new();
        let mut start = 0usize;

        for line in text.split('\n') {
            let indent = line.chars().take_while(|c| *c == ' ').count() as u32;
            lines.push(LineRecord {
                start,
                end: start + line.len(),
                indent,
            });
            start += line.len() + 1;
        }

        Self { text, lines }
    }

    /// The indexed (tab-expanded) text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn lines(&self) -> &[LineRecord] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Index of the line containing `offset`.
    ///
    /// Out-of-range offsets clamp to the last line. Binary search over the
    /// monotonically increasing line starts.
    pub fn line_at(&self, offset: usize) -> usize {
        let after = self.lines.partition_point(|l| l.start <= offset);
        after.saturating_sub(1)
    }

    /// The text of line `index`, or `""` for an out-of-range index.
    pub fn line_text(&self, index: usize) -> &str {
        match self.lines.get(index) {
            Some(line) => &self.text[line.start..line.end],
            None => "",
        }
    }
}

/// Expand each tab to a fixed run of [`TAB_WIDTH`] spaces.
pub fn expand_tabs(text: &str) -> String {
    if !text.contains('\t') {
        return text.to_string();
    }
    text.replace('\t', &" ".repeat(TAB_WIDTH))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
