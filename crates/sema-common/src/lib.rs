//! Common types and utilities shared across the semantic analysis core.
//!
//! This crate provides foundational types used by `sema-ast`, `sema-types`, and
//! `sema-checker`:
//! - String interning (`Atom`, `Interner`)
//! - Source spans (`Span`)
//! - Diagnostics (`Diagnostic`, `DiagnosticsBag`, stable codes, fix suggestions)
//! - Compiler limits and thresholds
//! - Tracing setup helpers

pub mod diagnostics;
pub mod interner;
pub mod limits;
pub mod span;
pub mod trace;

pub use diagnostics::{
    Applicability, Diagnostic, DiagnosticCode, DiagnosticsBag, FixKind, FixSuggestion, Note,
    Severity, TextEdit,
};
pub use interner::{Atom, Interner};
pub use span::{Span, Spanned};
pub use trace::TraceLevel;
