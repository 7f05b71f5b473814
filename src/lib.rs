//! # logcell - Log Cell Text Core
//!
//! Attributed text model, stack trace formatting, and incremental search for
//! reusable log display cells. The crate renders structured log records
//! (plain messages, progress updates, exceptions) as styled runs, indexes the
//! resulting text by line, and supports character-range selection and
//! find-next/previous navigation across multiple text regions of one cell.
//!
//! This is the in-process core only: window chrome, painting, and event
//! delivery live in the embedding renderer, which calls in through
//! [`CellTextModel`] and the [`TextMeasurer`] trait. The core holds no font,
//! color, or graphics state.
//!
//! ## Public API
//!
//! ### Entries (`entry`)
//! - [`EntryKind`] - Tagged union of log entry kinds (message, progress, exception)
//! - [`LogRecord`] - A timestamped entry
//! - [`ValueSource`] - Caller-owned supplier of a record's region texts
//!
//! ### Styling (`style`)
//! - [`StyleRole`] - Semantic tag of a rendered segment (never a color)
//! - [`StyleDepth`] - Chain nesting depth for per-depth style sets
//! - [`StyledRun`] - Ordered atomic unit of formatted output
//!
//! ### Stack Traces (`frame`, `stack_trace`)
//! - [`Frame`] - One parsed stack frame
//! - [`Throwable`] - A throwable chain with cause/suppressed links
//! - [`format_links`], [`format_runs`] - Chain formatting with common-suffix
//!   elision and identity-based cycle detection
//!
//! ### Text Model (`line_index`, `selection`, `search`, `cell_model`)
//! - [`LineIndex`] - Gapless half-open line ranges with offset lookup
//! - [`SelectionRange`] - Two-endpoint selection with normalization
//! - [`SearchIndex`], [`MatchCursor`] - Literal keyword matching and ordered
//!   cross-region navigation
//! - [`CellTextModel`] - The per-cell façade composing all of the above
//!
//! ### Background Search (`search_task`)
//! - [`SearchSession`] - At-most-one in-flight buffer scan with cooperative
//!   cancellation and incremental publication

pub mod cancel;
pub mod cell_model;
pub mod entry;
pub mod error;
pub mod frame;
pub mod line_index;
pub mod logging;
pub mod search;
pub mod search_task;
pub mod selection;
pub mod stack_trace;
pub mod style;

/// Prelude for common imports
pub mod prelude {
    pub use super::error::{Error, Result};
    pub use tracing::{debug, error, info, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use cancel::CancelFlag;
pub use cell_model::{CellTextModel, Point, TextMeasurer};
pub use entry::{entry_regions, entry_runs, format_entry, EntryKind, LogRecord, ValueSource};
pub use error::{Error, Result};
pub use frame::{frame_runs, Frame};
pub use line_index::{expand_tabs, LineIndex, LineRecord, TAB_WIDTH};
pub use search::{compile, Match, MatchCursor, MatchKey, RegionMatches, SearchIndex};
pub use search_task::{SearchHit, SearchProgress, SearchSession};
pub use selection::{SelectionRange, UNSET};
pub use stack_trace::{
    format_links, format_links_cancellable, format_runs, format_text, CauseLink, LinkHead,
    Throwable,
};
pub use style::{runs_text, StyleDepth, StyleRole, StyledRun};
