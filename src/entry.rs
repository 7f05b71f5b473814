//! Log entry kinds and their plain-text rendering.
//!
//! Entries come in three kinds (message, progress, exception) as a tagged
//! union, and a per-kind formatter turns a record into the region texts the
//! text/search core consumes. The caller owns the formatted shape (time
//! prefix, progress suffix) through the [`ValueSource`] trait; the defaults
//! here render `"{time} {message}"`.

use std::rc::Rc;

use chrono::{DateTime, Local};

use crate::stack_trace::{self, Throwable};
use crate::style::{StyleRole, StyledRun};

// ─────────────────────────────────────────────────────────────────────────────
// Types
// ─────────────────────────────────────────────────────────────────────────────

/// The kind of a log entry.
#[derive(Debug, Clone)]
pub enum EntryKind {
    /// A plain message line
    Message(String),

    /// A progress update, possibly still running
    Progress { label: String, finished: bool },

    /// An exception with its full throwable chain
    Exception(Rc<Throwable>),
}

/// One logical log entry: a timestamp plus its kind.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub timestamp: DateTime<Local>,
    pub kind: EntryKind,
}

impl LogRecord {
    pub fn new(kind: EntryKind) -> Self {
        Self {
            timestamp: Local::now(),
            kind,
        }
    }

    pub fn at(timestamp: DateTime<Local>, kind: EntryKind) -> Self {
        Self { timestamp, kind }
    }
}

/// Supplies the raw domain value and its formatted plain text on demand.
///
/// Implemented by the caller; the text/search core never formats values
/// itself.
pub trait ValueSource {
    fn record(&self) -> &LogRecord;

    /// Region texts for the record, first the summary line, then an optional
    /// detail region (the formatted stack trace for exceptions).
    fn region_texts(&self) -> Vec<String> {
        entry_regions(self.record())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Formatting
// ─────────────────────────────────────────────────────────────────────────────

/// One-line summary of an entry kind, without the timestamp.
pub fn entry_summary(kind: &EntryKind) -> String {
    match kind {
        EntryKind::Message(text) => text.clone(),
        EntryKind::Progress { label, finished } => {
            if *finished {
                format!("{label} (done)")
            } else {
                format!("{label}...")
            }
        }
        EntryKind::Exception(throwable) => throwable.display(),
    }
}

/// Default `"{time} {message}"` rendering of a record's summary line.
pub fn format_entry(record: &LogRecord) -> String {
    format!(
        "{} {}",
        record.timestamp.format("%H:%M:%S%.3f"),
        entry_summary(&record.kind)
    )
}

/// The region texts a cell shows for a record: the summary line, plus the
/// formatted stack trace as a separate detail region for exceptions.
pub fn entry_regions(record: &LogRecord) -> Vec<String> {
    let mut regions = vec![format_entry(record)];
    if let EntryKind::Exception(throwable) = &record.kind {
        regions.push(stack_trace::format_text(throwable));
    }
    regions
}

/// Styled runs of the summary line: a `Time` run and a `Message` run.
pub fn entry_runs(record: &LogRecord) -> Vec<StyledRun> {
    vec![
        StyledRun::new(
            format!("{} ", record.timestamp.format("%H:%M:%S%.3f")),
            StyleRole::Time,
        ),
        StyledRun::new(entry_summary(&record.kind), StyleRole::Message),
    ]
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
