//! Centralized limits and thresholds.
//!
//! Kept in one module, as in the teacher codebase, so that recursion guards across
//! unrelated components (generic instantiation, `@nosend`/`@copy` cycle detection,
//! reborrow chains) agree on one set of numbers instead of each picking its own.

/// Default ceiling on call-site recursion depth (`Checker::check_call` self-recursion
/// through default parameter expressions, nested generic calls, etc).
pub const DEFAULT_MAX_CALL_DEPTH: u32 = 128;

/// Default ceiling on generic instantiation recursion (substitution of a substituted
/// type argument that itself names a generic parameter of an outer instantiation).
pub const DEFAULT_MAX_INSTANTIATION_DEPTH: u32 = 64;

/// Bound on `@copy`/`@send`/`@nosend` recursive field-type visits; the visited-set
/// discipline in §4.5 makes this a safety net, not the primary cycle-breaker.
pub const MAX_ATTRIBUTE_RECURSION: usize = 256;

/// Bound on reborrow-chain walks in the borrow engine (§10.5); reborrows are not
/// chained arbitrarily deep in this design.
pub const MAX_REBORROW_CHAIN: usize = 64;

/// Bound on scope-parent walks when resolving a name, matching the teacher's
/// `MAX_SCOPE_WALK_ITERATIONS` guard against a malformed (cyclic) scope tree.
pub const MAX_SCOPE_WALK_ITERATIONS: usize = 10_000;
