//! Throwable chain formatting with common-suffix elision and cycle detection.
//!
//! Formats a throwable and its cause/suppressed chain into styled runs the
//! way the platform's own exception printer renders text: every frame of a
//! nested link that is shared with the tail of the immediately enclosing
//! link's frames collapses into a single `"... N more"` line, and a chain
//! that cycles back to an ancestor (by identity, not structural equality)
//! terminates with a single `[CIRCULAR REFERENCE: ...]` marker.
//!
//! Each chain link carries a [`StyleDepth`] so a renderer can color
//! top-level frames differently from nested "Caused by:" frames.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use crate::cancel::CancelFlag;
use crate::frame::{frame_runs, Frame};
use crate::style::{runs_text, StyleDepth, StyleRole, StyledRun};

// ─────────────────────────────────────────────────────────────────────────────
// Types
// ─────────────────────────────────────────────────────────────────────────────

/// A throwable with its stack frames and chain links.
///
/// Cause and suppressed links are interior-mutable so chains (including
/// reference cycles) can be assembled after construction. Identity of the
/// `Rc` allocation is what the formatter's cycle detection keys on.
#[derive(Debug)]
pub struct Throwable {
    class_name: String,
    message: Option<String>,
    frames: Vec<String>,
    cause: RefCell<Option<Rc<Throwable>>>,
    suppressed: RefCell<Vec<Rc<Throwable>>>,
}

impl Throwable {
    pub fn new(class_name: impl Into<String>, message: Option<&str>) -> Rc<Self> {
        Rc::new(Self {
            class_name: class_name.into(),
            message: message.map(str::to_string),
            frames: Vec::new(),
            cause: RefCell::new(None),
            suppressed: RefCell::new(Vec::new()),
        })
    }

    pub fn with_frames(
        class_name: impl Into<String>,
        message: Option<&str>,
        frames: &[&str],
    ) -> Rc<Self> {
        Rc::new(Self {
            class_name: class_name.into(),
            message: message.map(str::to_string),
            frames: frames.iter().map(|f| f.to_string()).collect(),
            cause: RefCell::new(None),
            suppressed: RefCell::new(Vec::new()),
        })
    }

    pub fn set_cause(&self, cause: Rc<Throwable>) {
        *self.cause.borrow_mut() = Some(cause);
    }

    pub fn add_suppressed(&self, suppressed: Rc<Throwable>) {
        self.suppressed.borrow_mut().push(suppressed);
    }

    pub fn cause(&self) -> Option<Rc<Throwable>> {
        self.cause.borrow().clone()
    }

    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    /// Headline form: `class: message`, or just the class name.
    pub fn display(&self) -> String {
        match &self.message {
            Some(message) => format!("{}: {}", self.class_name, message),
            None => self.class_name.clone(),
        }
    }
}

/// What introduced a chain link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkHead {
    Root,
    CausedBy,
    Suppressed,
}

impl LinkHead {
    fn caption(&self) -> &'static str {
        match self {
            LinkHead::Root => "",
            LinkHead::CausedBy => "Caused by: ",
            LinkHead::Suppressed => "Suppressed: ",
        }
    }
}

/// One rendered link of a throwable chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CauseLink {
    pub head: LinkHead,
    pub depth: StyleDepth,
    pub runs: Vec<StyledRun>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Formatting
// ─────────────────────────────────────────────────────────────────────────────

/// Format a throwable chain into per-link styled runs.
pub fn format_links(throwable: &Rc<Throwable>) -> Vec<CauseLink> {
    format_links_cancellable(throwable, &CancelFlag::new())
}

/// Like [`format_links`], checking `cancel` between frames and returning a
/// partial result once it is set.
pub fn format_links_cancellable(throwable: &Rc<Throwable>, cancel: &CancelFlag) -> Vec<CauseLink> {
    let mut visited = HashSet::new();
    let mut links = Vec::new();
    format_chain(
        throwable,
        &mut visited,
        &mut links,
        "",
        LinkHead::Root,
        StyleDepth::Top,
        &[],
        cancel,
    );
    links
}

/// Format a throwable chain into a flat run sequence.
///
/// The trailing newline of the final output is trimmed exactly once.
pub fn format_runs(throwable: &Rc<Throwable>) -> Vec<StyledRun> {
    let mut runs: Vec<StyledRun> = format_links(throwable)
        .into_iter()
        .flat_map(|link| link.runs)
        .collect();

    if let Some(last) = runs.last_mut() {
        if last.text.ends_with('\n') {
            last.text.pop();
        }
        if last.text.is_empty() {
            runs.pop();
        }
    }
    runs
}

/// Plain-text form of a formatted chain.
pub fn format_text(throwable: &Rc<Throwable>) -> String {
    runs_text(&format_runs(throwable))
}

#[allow(clippy::too_many_arguments)]
fn format_chain(
    throwable: &Rc<Throwable>,
    visited: &mut HashSet<*const Throwable>,
    links: &mut Vec<CauseLink>,
    line_prefix: &str,
    head: LinkHead,
    depth: StyleDepth,
    previous_frames: &[String],
    cancel: &CancelFlag,
) {
    let identity = Rc::as_ptr(throwable);

    // Identity cycle check is the only recursion bound besides a chain end.
    if visited.contains(&identity) {
        links.push(CauseLink {
            head,
            depth,
            runs: vec![StyledRun::new(
                format!(
                    "{line_prefix}{}[CIRCULAR REFERENCE: {}]\n",
                    head.caption(),
                    throwable.display()
                ),
                StyleRole::Message,
            )],
        });
        return;
    }
    visited.insert(identity);

    let mut runs = vec![StyledRun::new(
        format!("{line_prefix}{}{}\n", head.caption(), throwable.display()),
        StyleRole::Message,
    )];

    let frames = throwable.frames();
    let common = common_suffix_len(frames, previous_frames);

    for frame in &frames[..frames.len() - common] {
        if cancel.is_cancelled() {
            links.push(CauseLink { head, depth, runs });
            return;
        }
        runs.push(StyledRun::plain(format!("{line_prefix}\tat ")));
        runs.extend(frame_runs(frame));
        runs.push(StyledRun::plain("\n"));
    }

    if common > 0 {
        runs.push(StyledRun::plain(format!(
            "{line_prefix}\t... {common} more\n"
        )));
    }

    links.push(CauseLink { head, depth, runs });

    let suppressed = throwable.suppressed.borrow().clone();
    for s in &suppressed {
        format_chain(
            s,
            visited,
            links,
            &format!("{line_prefix}\t"),
            LinkHead::Suppressed,
            depth_of(s),
            frames,
            cancel,
        );
    }

    if let Some(cause) = throwable.cause() {
        format_chain(
            &cause,
            visited,
            links,
            line_prefix,
            LinkHead::CausedBy,
            depth_of(&cause),
            frames,
            cancel,
        );
    }
}

/// `Last` when the link has no further cause, `Middle` otherwise.
fn depth_of(throwable: &Rc<Throwable>) -> StyleDepth {
    if throwable.cause().is_none() {
        StyleDepth::Last
    } else {
        StyleDepth::Middle
    }
}

/// Number of equal trailing frame pairs between the current chain's frames
/// and the immediately enclosing chain's frames.
fn common_suffix_len(frames: &[String], previous: &[String]) -> usize {
    let mut common = 0;
    while common < frames.len()
        && common < previous.len()
        && frames_equal(
            &frames[frames.len() - 1 - common],
            &previous[previous.len() - 1 - common],
        )
    {
        common += 1;
    }
    common
}

/// Frame equality for elision: every parsed segment participates (class,
/// enclosing class, method, file and line), mirroring the platform's frame
/// equality. Unparseable frames fall back to raw string comparison.
fn frames_equal(a: &str, b: &str) -> bool {
    match (Frame::parse(a), Frame::parse(b)) {
        (Some(fa), Some(fb)) => fa == fb,
        _ => a == b,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn simple(class: &str, frames: &[&str]) -> Rc<Throwable> {
        Throwable::with_frames(class, None, frames)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Single Chain
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_single_throwable_text() {
        let t = Throwable::with_frames(
            "java.lang.IllegalStateException",
            Some("boom"),
            &["a/Foo.bar(Foo.java:10)", "a/Foo.main(Foo.java:30)"],
        );

        assert_eq!(
            format_text(&t),
            "java.lang.IllegalStateException: boom\n\
             \tat a/Foo.bar(Foo.java:10)\n\
             \tat a/Foo.main(Foo.java:30)"
        );
    }

    #[test]
    fn test_headline_without_message() {
        let t = simple("java.lang.Error", &[]);
        assert_eq!(format_text(&t), "java.lang.Error");
    }

    #[test]
    fn test_trailing_newline_trimmed_once() {
        let t = simple("E", &["a/Foo.bar(Foo.java:10)"]);
        let text = format_text(&t);
        assert!(!text.ends_with('\n'));
        assert_eq!(text.lines().count(), 2);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Elision
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_cause_with_shared_suffix_elided() {
        let outer = Throwable::with_frames(
            "Outer",
            None,
            &["a/Foo.qux(Foo.java:5)", "a/Foo.baz(Foo.java:20)"],
        );
        let inner = Throwable::with_frames(
            "Inner",
            None,
            &["a/Foo.bar(Foo.java:10)", "a/Foo.baz(Foo.java:20)"],
        );
        outer.set_cause(inner);

        let text = format_text(&outer);
        assert!(text.contains("Caused by: Inner"));
        assert!(text.contains("\tat a/Foo.bar(Foo.java:10)"));
        assert!(text.contains("\t... 1 more"));
        // The shared frame appears once, in the outer chain only.
        assert_eq!(text.matches("a/Foo.baz(Foo.java:20)").count(), 1);
    }

    #[test]
    fn test_elision_count_for_every_suffix_length() {
        // Shared trailing run of length k elides exactly k frame lines and
        // emits a single "... k more" line.
        let shared = [
            "a/Foo.s0(Foo.java:1)",
            "a/Foo.s1(Foo.java:2)",
            "a/Foo.s2(Foo.java:3)",
        ];
        for k in 0..=shared.len() {
            let mut outer_frames = vec!["a/Bar.run(Bar.java:9)"];
            outer_frames.extend_from_slice(&shared[shared.len() - k..]);
            let mut inner_frames = vec!["a/Baz.go(Baz.java:7)"];
            inner_frames.extend_from_slice(&shared[shared.len() - k..]);

            let outer = simple("Outer", &outer_frames);
            let inner = simple("Inner", &inner_frames);
            outer.set_cause(inner);

            let text = format_text(&outer);
            let more_lines = text.matches(" more").count();
            if k == 0 {
                assert_eq!(more_lines, 0, "k={k}");
            } else {
                assert_eq!(more_lines, 1, "k={k}");
                assert!(text.contains(&format!("\t... {k} more")), "k={k}");
            }

            // Inner emits exactly (len - k) explicit frame lines after its
            // headline; outer emits all of its own.
            let explicit_inner = text
                .lines()
                .skip_while(|l| !l.starts_with("Caused by:"))
                .filter(|l| l.starts_with("\tat "))
                .count();
            assert_eq!(explicit_inner, inner_frames.len() - k, "k={k}");
        }
    }

    #[test]
    fn test_no_elision_between_unrelated_traces() {
        let outer = simple("Outer", &["a/Foo.a(Foo.java:1)"]);
        let inner = simple("Inner", &["a/Foo.b(Foo.java:2)"]);
        outer.set_cause(inner);

        let text = format_text(&outer);
        assert!(!text.contains("more"));
        assert!(text.contains("\tat a/Foo.b(Foo.java:2)"));
    }

    #[test]
    fn test_elision_requires_matching_location() {
        // Same class and method but a different line must not elide.
        let outer = simple("Outer", &["a/Foo.baz(Foo.java:21)"]);
        let inner = simple("Inner", &["a/Foo.baz(Foo.java:20)"]);
        outer.set_cause(inner);

        assert!(!format_text(&outer).contains("more"));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Cycle Detection
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_cycle_terminates_with_single_marker() {
        let a = simple("A", &["a/Foo.a(Foo.java:1)"]);
        let b = simple("B", &["a/Foo.b(Foo.java:2)"]);
        a.set_cause(b.clone());
        b.set_cause(a.clone());

        let text = format_text(&a);
        assert_eq!(text.matches("[CIRCULAR REFERENCE:").count(), 1);
        assert!(text.contains("[CIRCULAR REFERENCE: A]"));
    }

    #[test]
    fn test_self_cause_cycle() {
        let a = simple("A", &["a/Foo.a(Foo.java:1)"]);
        a.set_cause(a.clone());

        let text = format_text(&a);
        assert_eq!(text.matches("[CIRCULAR REFERENCE: A]").count(), 1);
    }

    #[test]
    fn test_cycle_is_by_identity_not_structure() {
        // Two structurally identical throwables are distinct links.
        let a = simple("Same", &["a/Foo.a(Foo.java:1)"]);
        let b = simple("Same", &["a/Foo.a(Foo.java:1)"]);
        a.set_cause(b);

        let text = format_text(&a);
        assert!(!text.contains("CIRCULAR"));
        assert!(text.contains("Caused by: Same"));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Suppressed
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_suppressed_indented_and_elided_against_parent() {
        let outer = simple(
            "Outer",
            &["a/Foo.bar(Foo.java:10)", "a/Foo.main(Foo.java:30)"],
        );
        let sup = simple(
            "Sup",
            &["a/Foo.close(Foo.java:50)", "a/Foo.main(Foo.java:30)"],
        );
        outer.add_suppressed(sup);

        let text = format_text(&outer);
        assert!(text.contains("\tSuppressed: Sup"));
        // Suppressed frames carry the extra tab prefix.
        assert!(text.contains("\t\tat a/Foo.close(Foo.java:50)"));
        // The frame shared with the parent chain is elided.
        assert!(text.contains("\t\t... 1 more"));
    }

    #[test]
    fn test_suppressed_order_preserved() {
        let outer = simple("Outer", &[]);
        outer.add_suppressed(simple("First", &[]));
        outer.add_suppressed(simple("Second", &[]));

        let text = format_text(&outer);
        let first = text.find("Suppressed: First").unwrap();
        let second = text.find("Suppressed: Second").unwrap();
        assert!(first < second);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Style Depths
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_link_depths() {
        let top = simple("Top", &[]);
        let mid = simple("Mid", &[]);
        let last = simple("Last", &[]);
        mid.set_cause(last);
        top.set_cause(mid);

        let links = format_links(&top);
        let depths: Vec<_> = links.iter().map(|l| l.depth).collect();
        assert_eq!(
            depths,
            vec![StyleDepth::Top, StyleDepth::Middle, StyleDepth::Last]
        );
        assert_eq!(links[1].head, LinkHead::CausedBy);
    }

    #[test]
    fn test_root_depth_is_top_even_without_cause() {
        let links = format_links(&simple("Only", &[]));
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].depth, StyleDepth::Top);
        assert_eq!(links[0].head, LinkHead::Root);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Cancellation
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_cancelled_format_returns_partial() {
        let frames: Vec<String> = (0..100)
            .map(|i| format!("a/Foo.f{i}(Foo.java:{i})"))
            .collect();
        let refs: Vec<&str> = frames.iter().map(String::as_str).collect();
        let t = simple("Big", &refs);

        let cancel = CancelFlag::new();
        cancel.cancel();
        let links = format_links_cancellable(&t, &cancel);

        // Headline only, no frame lines.
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].runs.len(), 1);
    }
}
