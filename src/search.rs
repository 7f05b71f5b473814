//! Incremental literal search over indexed region text.
//!
//! [`SearchIndex`] compiles a keyword into match offsets over one region's
//! text; [`MatchCursor`] steps through the matches of an ordered sequence of
//! regions as one navigation space. The keyword is always treated as a quoted
//! literal (`regex::escape`), never as a general pattern, so there is no
//! invalid-pattern error class: an empty keyword is the "clear" signal.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::line_index::{LineIndex, LineRecord};

// ─────────────────────────────────────────────────────────────────────────────
// SearchIndex
// ─────────────────────────────────────────────────────────────────────────────

/// One keyword occurrence within a region's text.
///
/// `end - start` always equals the keyword length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub start: usize,
    pub end: usize,
}

/// Compile a keyword into a literal-matching pattern.
///
/// Empty or absent keywords compile to `None`, which clears all highlighting
/// state downstream.
pub fn compile(keyword: Option<&str>) -> Option<Regex> {
    let keyword = keyword.filter(|k| !k.is_empty())?;
    Regex::new(&regex::escape(keyword)).ok()
}

/// Match offsets of one keyword over one region's text.
#[derive(Debug, Default)]
pub struct SearchIndex {
    keyword: Option<String>,
    pattern: Option<Regex>,
    matches: Vec<Match>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the keyword and rescan `text`.
    ///
    /// An unchanged keyword is a no-op (the last keyword is cached to avoid
    /// redundant scans); use [`SearchIndex::refresh`] when the text itself
    /// was rebuilt. Returns whether the keyword actually changed.
    pub fn set_keyword(&mut self, keyword: Option<&str>, text: &str) -> bool {
        let keyword = keyword.filter(|k| !k.is_empty());
        if self.keyword.as_deref() == keyword {
            return false;
        }
        self.keyword = keyword.map(str::to_string);
        self.pattern = compile(keyword);
        self.rescan(text);
        true
    }

    /// Rescan after the region text changed under an unchanged keyword.
    pub fn refresh(&mut self, text: &str) {
        self.rescan(text);
    }

    fn rescan(&mut self, text: &str) {
        self.matches.clear();
        if let Some(pattern) = &self.pattern {
            // Non-overlapping occurrences, left to right.
            self.matches.extend(pattern.find_iter(text).map(|m| Match {
                start: m.start(),
                end: m.end(),
            }));
        }
    }

    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// Matches whose start lies within `line`'s range, in text order.
    pub fn matches_in_line(&self, line: &LineRecord) -> &[Match] {
        let lo = self.matches.partition_point(|m| m.start < line.start);
        let hi = self.matches.partition_point(|m| m.start <= line.end);
        &self.matches[lo..hi]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// MatchCursor
// ─────────────────────────────────────────────────────────────────────────────

/// Composite key identifying one match: region ordinal, line index within the
/// region, and match ordinal within the line. Lexicographic order is the
/// navigation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchKey {
    pub region: usize,
    pub line: usize,
    pub ordinal: usize,
}

/// Per-line match counts of one region, the shape [`MatchCursor`] steps over.
#[derive(Debug, Clone)]
pub struct RegionMatches {
    counts: Vec<usize>,
}

impl RegionMatches {
    pub fn new(index: &LineIndex, search: &SearchIndex) -> Self {
        let mut counts = vec![0usize; index.line_count()];
        for m in search.matches() {
            counts[index.line_at(m.start)] += 1;
        }
        Self { counts }
    }

    fn count(&self, line: usize) -> usize {
        self.counts.get(line).copied().unwrap_or(0)
    }
}

/// Wrap-around-free cursor over the matches of an ordered region sequence.
///
/// Holds the last returned key together with the search session it belongs
/// to; a session change (new keyword or rebound entry) re-anchors the cursor.
/// Stepping past either end returns `None` and clears the cursor, so the next
/// call restarts from the boundary — the "search again loops to start" UX is
/// the caller re-invoking, never an implicit wrap within one call.
#[derive(Debug, Default)]
pub struct MatchCursor {
    session: Option<u64>,
    last: Option<MatchKey>,
}

impl MatchCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the current position (back to idle).
    pub fn reset(&mut self) {
        self.session = None;
        self.last = None;
    }

    pub fn current(&self) -> Option<MatchKey> {
        self.last
    }

    /// Step to the next (or previous) match key.
    ///
    /// Returns `None` when no match exists anywhere, or when stepping past
    /// the boundary of the sequence.
    pub fn next(
        &mut self,
        session: u64,
        regions: &[RegionMatches],
        forward: bool,
    ) -> Option<MatchKey> {
        if self.session != Some(session) {
            self.session = Some(session);
            self.last = None;
        }

        // A key from before a rebuild may point past the new line/match
        // tables; re-anchor by restarting.
        if let Some(key) = self.last {
            if !key_valid(regions, key) {
                self.last = None;
            }
        }

        let next = match self.last {
            None => {
                if forward {
                    first_key(regions)
                } else {
                    last_key(regions)
                }
            }
            Some(key) => {
                if forward {
                    step_forward(regions, key)
                } else {
                    step_backward(regions, key)
                }
            }
        };

        self.last = next;
        next
    }
}

fn key_valid(regions: &[RegionMatches], key: MatchKey) -> bool {
    regions
        .get(key.region)
        .is_some_and(|r| key.ordinal < r.count(key.line))
}

fn first_key(regions: &[RegionMatches]) -> Option<MatchKey> {
    for (region, r) in regions.iter().enumerate() {
        if let Some(line) = r.counts.iter().position(|&c| c > 0) {
            return Some(MatchKey {
                region,
                line,
                ordinal: 0,
            });
        }
    }
    None
}

fn last_key(regions: &[RegionMatches]) -> Option<MatchKey> {
    for (region, r) in regions.iter().enumerate().rev() {
        if let Some(line) = r.counts.iter().rposition(|&c| c > 0) {
            return Some(MatchKey {
                region,
                line,
                ordinal: r.counts[line] - 1,
            });
        }
    }
    None
}

fn step_forward(regions: &[RegionMatches], key: MatchKey) -> Option<MatchKey> {
    let r = regions.get(key.region)?;

    // Next match within the current line.
    if key.ordinal + 1 < r.count(key.line) {
        return Some(MatchKey {
            ordinal: key.ordinal + 1,
            ..key
        });
    }

    // Next line with a match within the current region.
    for line in key.line + 1..r.counts.len() {
        if r.counts[line] > 0 {
            return Some(MatchKey {
                region: key.region,
                line,
                ordinal: 0,
            });
        }
    }

    // Continue into the following regions.
    for (offset, r) in regions[key.region + 1..].iter().enumerate() {
        if let Some(line) = r.counts.iter().position(|&c| c > 0) {
            return Some(MatchKey {
                region: key.region + 1 + offset,
                line,
                ordinal: 0,
            });
        }
    }

    None
}

fn step_backward(regions: &[RegionMatches], key: MatchKey) -> Option<MatchKey> {
    let r = regions.get(key.region)?;

    if key.ordinal > 0 {
        return Some(MatchKey {
            ordinal: key.ordinal - 1,
            ..key
        });
    }

    for line in (0..key.line).rev() {
        if r.counts[line] > 0 {
            return Some(MatchKey {
                region: key.region,
                line,
                ordinal: r.counts[line] - 1,
            });
        }
    }

    for region in (0..key.region).rev() {
        let r = &regions[region];
        if let Some(line) = r.counts.iter().rposition(|&c| c > 0) {
            return Some(MatchKey {
                region,
                line,
                ordinal: r.counts[line] - 1,
            });
        }
    }

    None
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
