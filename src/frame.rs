//! Stack frame parsing and per-segment formatting.
//!
//! Parses one frame's canonical textual form
//! `module/package.Class$Inner.method(File.ext:line)` into typed segments and
//! emits them as styled runs. The module, package, and inner-class segments
//! are all optional. A string without `'('` cannot be split into segments and
//! degrades to a single fallback run rather than failing the whole format.

use serde::{Deserialize, Serialize};

use crate::style::{StyleRole, StyledRun};

// ─────────────────────────────────────────────────────────────────────────────
// Types
// ─────────────────────────────────────────────────────────────────────────────

/// One parsed stack frame. Immutable once created.
///
/// Equality compares every segment, matching the platform's frame equality
/// (class, method, file and line all participate), which is what the
/// common-suffix elision in the trace formatter relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Module prefix before the first `/`, if any
    pub module: Option<String>,

    /// Package path before the last `.` of the class path, if any
    pub package: Option<String>,

    /// Class name. When `enclosing_name` is set this is the inner class name.
    pub class_name: String,

    /// Enclosing class name when the class path contains `$`
    pub enclosing_name: Option<String>,

    /// Method name (never contains dots)
    pub method: String,

    /// Location inside the parentheses, e.g. `Foo.java:10`
    pub location: String,
}

impl Frame {
    /// Parse one canonical frame string.
    ///
    /// Returns `None` when the string has no `'('` and therefore cannot be
    /// split into segments.
    pub fn parse(s: &str) -> Option<Frame> {
        let method_end = s.find('(')?;

        let location = {
            let inner = &s[method_end + 1..];
            inner.strip_suffix(')').unwrap_or(inner).to_string()
        };

        // The method name has no dots; the last '.' before '(' separates it
        // from the class path.
        let (type_part, method) = match s[..method_end].rfind('.') {
            Some(dot) => (&s[..dot], s[dot + 1..method_end].to_string()),
            None => ("", s[..method_end].to_string()),
        };

        let (module, class_path) = match type_part.rfind('/') {
            Some(slash) => (
                non_empty(&type_part[..slash]),
                &type_part[slash + 1..],
            ),
            None => (None, type_part),
        };

        let (package, class_full) = match class_path.rfind('.') {
            Some(dot) => (non_empty(&class_path[..dot]), &class_path[dot + 1..]),
            None => (None, class_path),
        };

        let (enclosing_name, class_name) = match class_full.rfind('$') {
            Some(dollar) => (
                non_empty(&class_full[..dollar]),
                class_full[dollar + 1..].to_string(),
            ),
            None => (None, class_full.to_string()),
        };

        Some(Frame {
            module,
            package,
            class_name,
            enclosing_name,
            method,
            location,
        })
    }

    /// Emit this frame as styled runs.
    ///
    /// Concatenating the run texts reproduces the original frame string.
    pub fn runs(&self) -> Vec<StyledRun> {
        let mut runs = Vec::with_capacity(7);

        if let Some(module) = &self.module {
            runs.push(StyledRun::new(format!("{module}/"), StyleRole::Module));
        }
        if let Some(package) = &self.package {
            runs.push(StyledRun::new(format!("{package}."), StyleRole::Package));
        }
        let has_type = self.module.is_some()
            || self.package.is_some()
            || self.enclosing_name.is_some()
            || !self.class_name.is_empty();
        match &self.enclosing_name {
            Some(enclosing) => {
                runs.push(StyledRun::new(enclosing.clone(), StyleRole::ClassName));
                runs.push(StyledRun::new(
                    format!("${}", self.class_name),
                    StyleRole::InnerClassName,
                ));
            }
            None if has_type => {
                runs.push(StyledRun::new(self.class_name.clone(), StyleRole::ClassName));
            }
            None => {}
        }
        // The separating dot only exists when there is a class part.
        let method = if has_type {
            format!(".{}(", self.method)
        } else {
            format!("{}(", self.method)
        };
        runs.push(StyledRun::new(method, StyleRole::Method));
        runs.push(StyledRun::new(self.location.clone(), StyleRole::FileName));
        runs.push(StyledRun::new(")", StyleRole::Method));

        runs
    }
}

/// Format one frame string into styled runs.
///
/// Unparseable input (no `'('`) degrades to a single `Method`-tagged run
/// carrying the whole string, so no input is ever dropped.
pub fn frame_runs(s: &str) -> Vec<StyledRun> {
    match Frame::parse(s) {
        Some(frame) => frame.runs(),
        None => vec![StyledRun::new(s, StyleRole::Method)],
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
