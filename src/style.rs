//! Style roles and styled text runs.
//!
//! A [`StyleRole`] is a semantic tag, not a color. The renderer owns the
//! mapping from role (plus nesting depth) to an actual color, so this crate
//! never holds a style registry or any per-document style cache.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Types
// ─────────────────────────────────────────────────────────────────────────────

/// Semantic tag attached to a rendered text segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StyleRole {
    /// Timestamp prefix of a log line
    Time,

    /// Plain message text, including throwable headline lines
    Message,

    /// Module prefix of a stack frame (`module/` before the class path)
    Module,

    /// Package path of a stack frame
    Package,

    /// Outermost class name of a stack frame
    ClassName,

    /// Inner (`$`-separated) class name of a stack frame
    InnerClassName,

    /// Method name and surrounding punctuation
    Method,

    /// File/line location inside the parentheses
    FileName,
}

/// Nesting depth of a throwable chain link.
///
/// A renderer can use this to color top-level frames differently from nested
/// "Caused by:" frames. `Last` marks the deepest link of the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StyleDepth {
    /// The root throwable
    Top,

    /// A cause/suppressed link that itself has a further cause
    Middle,

    /// The final link of the chain (no further cause)
    Last,
}

/// An ordered atomic unit of formatted output.
///
/// Concatenating the `text` of all runs produced for one entry reproduces the
/// full rendered text exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledRun {
    /// Text content of the run
    pub text: String,

    /// Semantic role, or `None` for untagged text (separators, prefixes)
    pub role: Option<StyleRole>,
}

impl StyledRun {
    /// Create a run tagged with a role.
    pub fn new(text: impl Into<String>, role: StyleRole) -> Self {
        Self {
            text: text.into(),
            role: Some(role),
        }
    }

    /// Create an untagged run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            role: None,
        }
    }
}

/// Concatenate the text of a run sequence.
pub fn runs_text(runs: &[StyledRun]) -> String {
    runs.iter().map(|r| r.text.as_str()).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_styled_run_constructors() {
        let tagged = StyledRun::new("Foo", StyleRole::ClassName);
        assert_eq!(tagged.text, "Foo");
        assert_eq!(tagged.role, Some(StyleRole::ClassName));

        let plain = StyledRun::plain("\tat ");
        assert_eq!(plain.role, None);
    }

    #[test]
    fn test_runs_text_concatenation() {
        let runs = vec![
            StyledRun::plain("\tat "),
            StyledRun::new("Foo", StyleRole::ClassName),
            StyledRun::new(".bar(", StyleRole::Method),
            StyledRun::new("Foo.java:10", StyleRole::FileName),
            StyledRun::new(")", StyleRole::Method),
        ];
        assert_eq!(runs_text(&runs), "\tat Foo.bar(Foo.java:10)");
    }

    #[test]
    fn test_style_role_serde_round_trip() {
        let json = serde_json::to_string(&StyleRole::InnerClassName).unwrap();
        let back: StyleRole = serde_json::from_str(&json).unwrap();
        assert_eq!(back, StyleRole::InnerClassName);
    }
}
