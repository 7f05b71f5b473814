//! Background search session for a search-as-you-type field.
//!
//! The cell model itself searches synchronously; this session exists for the
//! higher-level field that scans every entry of a large buffer. At most one
//! task is active per session: starting a new search cancels the in-flight
//! one, and a cancelled task never publishes again — the cancellation flag is
//! checked between work units and before every send. Each publication
//! carries the session generation and strictly supersedes the previous one.

use tokio::sync::mpsc;
use tracing::debug;

use crate::cancel::CancelFlag;
use crate::search::compile;

/// Entries scanned between publications.
const PUBLISH_BATCH: usize = 64;

// ─────────────────────────────────────────────────────────────────────────────
// Types
// ─────────────────────────────────────────────────────────────────────────────

/// One keyword occurrence somewhere in the scanned buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit {
    /// Index of the entry containing the match
    pub entry: usize,
    /// Region ordinal within the entry
    pub region: usize,
    /// Byte offset of match start within the region text
    pub start: usize,
    /// Byte offset of match end within the region text
    pub end: usize,
}

/// An incremental publication of search results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchProgress {
    /// Session generation this publication belongs to
    pub generation: u64,
    /// Hits found since the previous publication
    pub hits: Vec<SearchHit>,
    /// Whether the scan ran to completion
    pub done: bool,
}

/// Owner of the at-most-one in-flight background search.
#[derive(Debug, Default)]
pub struct SearchSession {
    generation: u64,
    cancel: CancelFlag,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a search, cancelling any in-flight one.
    ///
    /// `entries` holds the region texts of every entry to scan. Results
    /// arrive on the returned channel in batches; the final batch has
    /// `done = true`. An empty keyword publishes a single empty `done`
    /// batch (the "clear" signal).
    pub fn start(
        &mut self,
        keyword: &str,
        entries: Vec<Vec<String>>,
    ) -> mpsc::UnboundedReceiver<SearchProgress> {
        self.cancel.cancel();
        self.cancel = CancelFlag::new();
        self.generation += 1;

        debug!(generation = self.generation, keyword, "starting background search");

        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = self.cancel.clone();
        let generation = self.generation;
        let keyword = keyword.to_string();
        tokio::spawn(async move {
            run_search(generation, &keyword, &entries, &cancel, &tx);
        });
        rx
    }

    /// Cancel the in-flight search, if any.
    pub fn cancel_active(&mut self) {
        self.cancel.cancel();
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Synchronous scan body. Checks `cancel` between entries and before every
/// send, so a cancelled scan publishes nothing further.
fn run_search(
    generation: u64,
    keyword: &str,
    entries: &[Vec<String>],
    cancel: &CancelFlag,
    tx: &mpsc::UnboundedSender<SearchProgress>,
) {
    let Some(pattern) = compile(Some(keyword)) else {
        let _ = tx.send(SearchProgress {
            generation,
            hits: Vec::new(),
            done: true,
        });
        return;
    };

    let mut pending = Vec::new();
    for (entry, regions) in entries.iter().enumerate() {
        if cancel.is_cancelled() {
            return;
        }

        for (region, text) in regions.iter().enumerate() {
            pending.extend(pattern.find_iter(text).map(|m| SearchHit {
                entry,
                region,
                start: m.start(),
                end: m.end(),
            }));
        }

        if (entry + 1) % PUBLISH_BATCH == 0 && !pending.is_empty() {
            if cancel.is_cancelled() {
                return;
            }
            let batch = SearchProgress {
                generation,
                hits: std::mem::take(&mut pending),
                done: false,
            };
            if tx.send(batch).is_err() {
                return;
            }
        }
    }

    if cancel.is_cancelled() {
        return;
    }
    let _ = tx.send(SearchProgress {
        generation,
        hits: pending,
        done: true,
    });
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
