//! Compile-time configuration passed into a `Checker` run (§6 "Configuration").
//!
//! Plain data, no I/O: no file/env/CLI parsing happens in this crate. A host binary
//! builds a `CheckerOptions` however it likes and hands it to `Checker::new`.

use sema_common::TraceLevel;

#[derive(Clone, Copy, Debug)]
pub struct CheckerOptions {
    /// Emit `SemaAlienSyntax` info hints when a dialect classifier is confident a file
    /// resembles a foreign language (§6, §4.8). On by default.
    pub alien_hints: bool,
    pub trace_level: TraceLevel,
    /// Recursion guard for call-graph-shaped walks (generic instantiation chains,
    /// `@nosend`/`@copy` cycle checks). Mirrors `sema_common::limits::DEFAULT_MAX_CALL_DEPTH`.
    pub max_call_depth: u32,
    pub max_instantiation_depth: u32,
}

impl Default for CheckerOptions {
    fn default() -> Self {
        CheckerOptions {
            alien_hints: true,
            trace_level: TraceLevel::default(),
            max_call_depth: sema_common::limits::DEFAULT_MAX_CALL_DEPTH,
            max_instantiation_depth: sema_common::limits::DEFAULT_MAX_INSTANTIATION_DEPTH,
        }
    }
}
