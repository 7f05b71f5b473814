//! Per-cell text model façade.
//!
//! A display cell is a flyweight reused across many logical rows, so this
//! model makes "did the content change" an explicit predicate: [`bind`]
//! against an unchanged value is a no-op, and an actual change rebuilds every
//! region's line index, search index, and selection state in one pass. No
//! partially-stale state is ever observable: a rebuild bumps the search
//! session, which re-anchors the match cursor on the next navigation step.
//!
//! [`bind`]: CellTextModel::bind

use tracing::trace;

use crate::line_index::LineIndex;
use crate::search::{Match, MatchCursor, MatchKey, RegionMatches, SearchIndex};
use crate::selection::SelectionRange;
use crate::style::StyledRun;

// ─────────────────────────────────────────────────────────────────────────────
// Collaborator Interfaces
// ─────────────────────────────────────────────────────────────────────────────

/// A pixel position within a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Measurement and hit-testing callback, implemented by the renderer.
///
/// The core holds no font or graphics state; it only ever calls through this
/// injected trait.
pub trait TextMeasurer {
    /// Pixel width and height of one rendered line of runs.
    fn measure_line(&self, runs: &[StyledRun]) -> (f32, f32);

    /// Character offset within the region's text for a pixel position.
    fn hit_test(&self, region: usize, point: Point) -> usize;
}

// ─────────────────────────────────────────────────────────────────────────────
// CellTextModel
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Region {
    index: LineIndex,
    selection: SelectionRange,
    search: SearchIndex,
}

/// Selection and search state for one display cell.
///
/// Owns one [`LineIndex`] + [`SelectionRange`] + [`SearchIndex`] per visible
/// region (e.g. a message region and a detail region), searched as one
/// ordered sequence.
#[derive(Debug, Default)]
pub struct CellTextModel {
    bound: Option<u64>,
    keyword: Option<String>,
    regions: Vec<Region>,
    cursor: MatchCursor,
    session: u64,
}

impl CellTextModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the cell to a logical value identified by `value_id`.
    ///
    /// A no-op when the id matches the currently bound value: cells are
    /// reused across many rows and rebuilding on every paint would both be
    /// wasteful and desynchronize selection state mid-gesture. On an actual
    /// change every region is rebuilt in one pass and any selection whose
    /// endpoints exceed the new text length resets to unset. Returns whether
    /// a rebuild happened.
    pub fn bind(&mut self, value_id: u64, region_texts: &[String]) -> bool {
        if self.bound == Some(value_id) {
            return false;
        }
        self.rebuild(value_id, region_texts);
        true
    }

    /// Rebuild unconditionally, even for the currently bound value.
    pub fn bind_forced(&mut self, value_id: u64, region_texts: &[String]) {
        self.rebuild(value_id, region_texts);
    }

    /// Detach from the bound value and drop all derived state.
    pub fn unbind(&mut self) {
        self.bound = None;
        self.regions.clear();
        self.cursor.reset();
        self.session += 1;
    }

    fn rebuild(&mut self, value_id: u64, region_texts: &[String]) {
        trace!(value_id, regions = region_texts.len(), "rebuilding cell text model");

        let same_shape = self.regions.len() == region_texts.len();
        let mut old: Vec<Region> = std::mem::take(&mut self.regions);
        let keyword = self.keyword.clone();

        self.regions = region_texts
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let index = LineIndex::build(text);
                let mut search = SearchIndex::new();
                search.set_keyword(keyword.as_deref(), index.text());

                // Selections survive a rebuild only while still in range of
                // the new text.
                let mut selection = if same_shape {
                    std::mem::take(&mut old[i].selection)
                } else {
                    SelectionRange::new()
                };
                if selection.normalized().is_some_and(|(_, hi)| hi > index.text().len()) {
                    selection.clear();
                }

                Region {
                    index,
                    selection,
                    search,
                }
            })
            .collect();

        self.bound = Some(value_id);
        self.session += 1;
    }

    pub fn bound_value(&self) -> Option<u64> {
        self.bound
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub fn region_text(&self, region: usize) -> &str {
        self.regions.get(region).map_or("", |r| r.index.text())
    }

    pub fn line_index(&self, region: usize) -> Option<&LineIndex> {
        self.regions.get(region).map(|r| &r.index)
    }

    pub fn selection(&self, region: usize) -> Option<&SelectionRange> {
        self.regions.get(region).map(|r| &r.selection)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────────────────────

    /// Anchor a new selection at `offset`. Out-of-range offsets clamp.
    pub fn select_from_point(&mut self, region: usize, offset: usize) {
        let Some(r) = self.regions.get_mut(region) else {
            return;
        };
        let offset = offset.min(r.index.text().len()) as i64;
        r.selection.set_from(offset);
        r.selection.set_to(offset);
    }

    /// Extend the selection of `region` to `offset` as a drag progresses.
    pub fn drag_to(&mut self, region: usize, offset: usize) {
        let Some(r) = self.regions.get_mut(region) else {
            return;
        };
        r.selection.set_to(offset.min(r.index.text().len()) as i64);
    }

    /// Anchor a selection at the character hit by `point`.
    pub fn select_at_point(&mut self, region: usize, point: Point, measurer: &dyn TextMeasurer) {
        let offset = measurer.hit_test(region, point);
        self.select_from_point(region, offset);
    }

    /// Extend the selection to the character hit by `point`.
    pub fn drag_at_point(&mut self, region: usize, point: Point, measurer: &dyn TextMeasurer) {
        let offset = measurer.hit_test(region, point);
        self.drag_to(region, offset);
    }

    pub fn clear_selection(&mut self) {
        for r in &mut self.regions {
            r.selection.clear();
        }
    }

    /// The selected text across all regions, joined with newlines.
    ///
    /// With `entire_text_fallback`, an empty selection yields the whole cell
    /// text instead ("copy whole line if nothing is selected").
    pub fn selected_text(&self, entire_text_fallback: bool) -> String {
        let selected: Vec<&str> = self
            .regions
            .iter()
            .map(|r| r.selection.substring(r.index.text()))
            .filter(|s| !s.is_empty())
            .collect();

        if !selected.is_empty() {
            return selected.join("\n");
        }
        if entire_text_fallback {
            let all: Vec<&str> = self.regions.iter().map(|r| r.index.text()).collect();
            return all.join("\n");
        }
        String::new()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Search
    // ─────────────────────────────────────────────────────────────────────────

    /// Set the find keyword for every region. Empty/absent clears all
    /// highlighting state. An unchanged keyword is a no-op. Returns whether
    /// anything changed.
    pub fn set_find_keyword(&mut self, keyword: Option<&str>) -> bool {
        let keyword = keyword.filter(|k| !k.is_empty());
        if self.keyword.as_deref() == keyword {
            return false;
        }
        self.keyword = keyword.map(str::to_string);
        for r in &mut self.regions {
            r.search.set_keyword(keyword, r.index.text());
        }
        self.session += 1;
        self.cursor.reset();
        true
    }

    pub fn find_keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    /// Total match count across all regions.
    pub fn match_count(&self) -> usize {
        self.regions.iter().map(|r| r.search.match_count()).sum()
    }

    /// Matches of one region, in text order.
    pub fn region_matches(&self, region: usize) -> &[Match] {
        self.regions.get(region).map_or(&[], |r| r.search.matches())
    }

    /// Step the match cursor forward or backward across all regions.
    ///
    /// Returns `None` when no match exists, or when stepping past the
    /// boundary; the next call restarts from the opposite end.
    pub fn focus_next_match(&mut self, forward: bool) -> Option<MatchKey> {
        let regions: Vec<RegionMatches> = self
            .regions
            .iter()
            .map(|r| RegionMatches::new(&r.index, &r.search))
            .collect();
        self.cursor.next(self.session, &regions, forward)
    }

    /// The focused key, if navigation has one.
    pub fn focused_match(&self) -> Option<MatchKey> {
        self.cursor.current()
    }

    /// Resolve a match key back to its region and text offsets.
    pub fn match_range(&self, key: MatchKey) -> Option<(usize, Match)> {
        let r = self.regions.get(key.region)?;
        let line = r.index.lines().get(key.line)?;
        let m = *r.search.matches_in_line(line).get(key.ordinal)?;
        Some((key.region, m))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
