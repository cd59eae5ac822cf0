//! Checker core: expression/statement typer, borrow engine, attribute validator,
//! lock/concurrency analyzer, and task lifetime tracker, wired together by the
//! `Checker` orchestrator.
//!
//! This crate is organized into several submodules:
//! - `checker` - `Checker` orchestrator, the crate's single entry point
//! - `typer` - expression/statement type checking (C3)
//! - `dispatch` - operator/method/call overload resolution
//! - `generics` - generic instantiation and substitution
//! - `literal` - numeric literal materialization
//! - `exhaustiveness` - pattern-match coverage checking
//! - `borrow` - region-scoped borrow checker (C4)
//! - `places` - place interning used by the borrow checker
//! - `attrs` - declarative attribute validator (C5)
//! - `locks` - path-sensitive lock/concurrency analyzer (C6)
//! - `tasks` - structured-concurrency task lifetime tracker (C7)
//! - `options` - `CheckerOptions`
//! - `result` - the per-file `CheckResult` record (§3)

mod attrs;
mod borrow;
mod checker;
mod dispatch;
mod exhaustiveness;
mod generics;
mod literal;
mod locks;
mod options;
mod places;
mod result;
mod tasks;
mod typer;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use attrs::{AttrOwner, AttributeValidator, Backend, ValidatedAttrs};
pub use borrow::{BorrowEngine, BorrowEvent, BorrowId, BorrowKind, Issue};
pub use checker::Checker;
pub use dispatch::{resolve_binary_op, resolve_method_call, resolve_overload, resolve_unary_op, usable_as_bool, Resolved};
pub use exhaustiveness::ExhaustivenessChecker;
pub use generics::{infer_substitution, substitute, Substitution};
pub use literal::{materialize_float_literal, materialize_int_literal};
pub use locks::{
    classify_method_name, infer_lock_kind, ConcurrencySummary, LockAnalyzer, LockKey, LockKind, LockMethodEffect, LockState, LockStmt,
};
pub use options::CheckerOptions;
pub use places::{PlaceId, PlaceTable, Segment};
pub use result::{CapturedRegion, CheckResult};
pub use tasks::{ContainerSafety, DrainCondition, TaskState, TaskTracker};
pub use typer::{ResolvedCallee, Typer};
