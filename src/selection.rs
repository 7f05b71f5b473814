//! Per-region selection range with normalization and clamping.

/// Endpoint value meaning "unset".
pub const UNSET: i64 = -1;

/// A two-endpoint character range over one region's text.
///
/// `from` and `to` are set independently as a drag gesture progresses, so
/// `from <= to` is not required; callers normalize at read time. An endpoint
/// of `-1` means the selection is unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRange {
    from: i64,
    to: i64,
}

impl Default for SelectionRange {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionRange {
    pub fn new() -> Self {
        Self {
            from: UNSET,
            to: UNSET,
        }
    }

    pub fn set_from(&mut self, offset: i64) {
        self.from = offset;
    }

    pub fn set_to(&mut self, offset: i64) {
        self.to = offset;
    }

    pub fn from(&self) -> i64 {
        self.from
    }

    pub fn to(&self) -> i64 {
        self.to
    }

    pub fn clear(&mut self) {
        self.from = UNSET;
        self.to = UNSET;
    }

    pub fn is_set(&self) -> bool {
        self.from >= 0 && self.to >= 0
    }

    /// Ordered endpoints, or `None` when either endpoint is unset.
    pub fn normalized(&self) -> Option<(usize, usize)> {
        if !self.is_set() {
            return None;
        }
        let (lo, hi) = if self.from <= self.to {
            (self.from, self.to)
        } else {
            (self.to, self.from)
        };
        Some((lo as usize, hi as usize))
    }

    /// The selected slice of `text`.
    ///
    /// Both endpoints clamp into `[0, len]` (and down to a char boundary), so
    /// out-of-range indices never panic. Returns `""` when unset.
    pub fn substring<'a>(&self, text: &'a str) -> &'a str {
        let Some((lo, hi)) = self.normalized() else {
            return "";
        };
        let lo = clamp_boundary(text, lo);
        let hi = clamp_boundary(text, hi);
        &text[lo..hi]
    }
}

fn clamp_boundary(text: &str, mut offset: usize) -> usize {
    offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_unset() {
        let sel = SelectionRange::new();
        assert!(!sel.is_set());
        assert_eq!(sel.normalized(), None);
        assert_eq!(sel.substring("hello"), "");
    }

    #[test]
    fn test_normalized_orders_endpoints() {
        let mut forward = SelectionRange::new();
        forward.set_from(2);
        forward.set_to(5);

        let mut backward = SelectionRange::new();
        backward.set_from(5);
        backward.set_to(2);

        assert_eq!(forward.normalized(), Some((2, 5)));
        assert_eq!(backward.normalized(), forward.normalized());
    }

    #[test]
    fn test_partial_selection_is_unset() {
        let mut sel = SelectionRange::new();
        sel.set_from(3);
        assert!(!sel.is_set());
        assert_eq!(sel.normalized(), None);
    }

    #[test]
    fn test_substring() {
        let mut sel = SelectionRange::new();
        sel.set_from(6);
        sel.set_to(11);
        assert_eq!(sel.substring("hello world"), "world");
    }

    #[test]
    fn test_substring_reversed_endpoints() {
        let mut sel = SelectionRange::new();
        sel.set_from(11);
        sel.set_to(6);
        assert_eq!(sel.substring("hello world"), "world");
    }

    #[test]
    fn test_substring_clamps_out_of_range() {
        let mut sel = SelectionRange::new();
        sel.set_from(3);
        sel.set_to(9999);
        assert_eq!(sel.substring("hello"), "lo");
    }

    #[test]
    fn test_substring_clamps_to_char_boundary() {
        let mut sel = SelectionRange::new();
        sel.set_from(0);
        sel.set_to(1);
        // First char is multi-byte; clamping must not split it.
        assert_eq!(sel.substring("αβ"), "");
    }

    #[test]
    fn test_clear_resets_both_endpoints() {
        let mut sel = SelectionRange::new();
        sel.set_from(1);
        sel.set_to(2);
        sel.clear();
        assert!(!sel.is_set());
        assert_eq!(sel.from(), UNSET);
    }
}
