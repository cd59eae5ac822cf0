//! Lock & Concurrency Analyzer (C6, §4.6): path-sensitive lock state across a function
//! body, inter-procedural lock contracts, and `@nonblocking` enforcement.
//!
//! The statement walker itself lives in the checker's control-flow dispatch; this
//! module is the state machine it threads through `if`/`while`/`for`/`return`, plus the
//! lock-ordering graph and per-function concurrency summaries. `LockStmt` is the small
//! control-flow shape the walker lowers real statement bodies into before calling
//! `LockAnalyzer::analyze` — the parts of a function body that don't affect lock state
//! collapse to `LockStmt::Opaque`.

use crate::attrs::ValidatedAttrs;
use rustc_hash::{FxHashMap, FxHashSet};
use sema_ast::symbols::SymbolId;
use sema_common::{Atom, Diagnostic, DiagnosticCode, Span};
use sema_types::{NominalKey, Type, TypeId, TypeRegistry};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LockKind {
    Mutex,
    RwRead,
    RwWrite,
}

/// Names the spec recognizes as acquire/release operations on `Mutex`/`RwLock`
/// receivers (§4.6 "Recognized lock operations").
pub fn classify_method_name(name: &str) -> Option<LockMethodEffect> {
    match name {
        "lock" | "write_lock" => Some(LockMethodEffect::Acquire(LockKind::RwWrite)),
        "read_lock" => Some(LockMethodEffect::Acquire(LockKind::RwRead)),
        "unlock" | "write_unlock" => Some(LockMethodEffect::Release),
        "read_unlock" => Some(LockMethodEffect::Release),
        "try_lock" | "try_read_lock" | "try_write_lock" => Some(LockMethodEffect::TryAcquire),
        _ => None,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LockMethodEffect {
    Acquire(LockKind),
    Release,
    TryAcquire,
}

/// Infer a field's lock kind from its declared type: `Mutex` → `Mutex`; `RwLock` → the
/// write kind, the most restrictive assumption (§9 open question, resolved in favor of
/// no read/write distinction for contracts).
pub fn infer_lock_kind(registry: &TypeRegistry, field_ty: TypeId) -> Option<LockKind> {
    match registry.lookup(field_ty) {
        Type::Struct(NominalKey { name, .. }) => match registry.atom_str(*name) {
            "Mutex" => Some(LockKind::Mutex),
            "RwLock" => Some(LockKind::RwWrite),
            _ => None,
        },
        _ => None,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LockKey {
    pub base: SymbolId,
    pub field: Atom,
    pub kind: LockKind,
}

#[derive(Clone, Default, Debug)]
pub struct LockState {
    held: FxHashMap<(SymbolId, Atom), (LockKind, Span)>,
}

impl LockState {
    pub fn is_held(&self, base: SymbolId, field: Atom) -> bool {
        self.held.contains_key(&(base, field))
    }

    pub fn acquire(&mut self, key: LockKey, span: Span) {
        self.held.insert((key.base, key.field), (key.kind, span));
    }

    pub fn release(&mut self, base: SymbolId, field: Atom) {
        self.held.remove(&(base, field));
    }

    pub fn held_keys(&self) -> impl Iterator<Item = LockKey> + '_ {
        self.held
            .iter()
            .map(|(&(base, field), &(kind, _))| LockKey { base, field, kind })
    }

    /// Merge two branch-exit states at an if/else join (§4.6). A lock held in both
    /// remains held; a lock held in only one is an imbalance unless that branch is a
    /// definite early exit, which the caller signals by passing `None` for it.
    fn merge(then_state: Option<&LockState>, else_state: Option<&LockState>) -> (LockState, Vec<(SymbolId, Atom)>) {
        match (then_state, else_state) {
            (Some(t), Some(e)) => {
                let mut merged = LockState::default();
                let mut imbalanced = Vec::new();
                let mut all_keys: FxHashSet<(SymbolId, Atom)> = FxHashSet::default();
                all_keys.extend(t.held.keys().copied());
                all_keys.extend(e.held.keys().copied());
                for key in all_keys {
                    let in_t = t.held.contains_key(&key);
                    let in_e = e.held.contains_key(&key);
                    if in_t && in_e {
                        merged.held.insert(key, t.held[&key]);
                    } else {
                        imbalanced.push(key);
                    }
                }
                (merged, imbalanced)
            }
            (Some(t), None) => (t.clone(), Vec::new()),
            (None, Some(e)) => (e.clone(), Vec::new()),
            (None, None) => (LockState::default(), Vec::new()),
        }
    }
}

/// The control-flow shapes the lock analyzer needs to thread state through; everything
/// else in a function body is `Opaque`.
pub enum LockStmt {
    Seq(Vec<LockStmt>),
    Acquire { key: LockKey, span: Span },
    Release { base: SymbolId, field: Atom, span: Span },
    TryAcquire,
    If {
        then_branch: Vec<LockStmt>,
        /// `None` when the branch is a definite early exit (return/break/continue).
        then_exits: bool,
        else_branch: Option<Vec<LockStmt>>,
        else_exits: bool,
        span: Span,
    },
    Loop { body: Vec<LockStmt> },
    Return { span: Span },
    Opaque,
}

#[derive(Clone, Debug, Default)]
pub struct ConcurrencySummary {
    pub requires: Vec<(Atom, LockKind)>,
    pub acquires: Vec<(Atom, LockKind)>,
    pub releases: Vec<(Atom, LockKind)>,
    pub nonblocking: bool,
    pub waits_on: Vec<Atom>,
}

impl ConcurrencySummary {
    pub fn may_block(&self) -> bool {
        !self.waits_on.is_empty()
    }

    /// Build from a declaration's validated attributes plus the receiver's struct
    /// layout (to resolve each named field's lock kind).
    pub fn from_attrs(attrs: &ValidatedAttrs, receiver_fields: &FxHashMap<Atom, LockKind>) -> Self {
        let resolve = |names: &[Atom]| -> Vec<(Atom, LockKind)> {
            names
                .iter()
                .filter_map(|&f| receiver_fields.get(&f).map(|&k| (f, k)))
                .collect()
        };
        ConcurrencySummary {
            requires: resolve(&attrs.requires_lock),
            acquires: resolve(&attrs.acquires_lock),
            releases: resolve(&attrs.releases_lock),
            nonblocking: attrs.nonblocking,
            waits_on: attrs.waits_on.clone(),
        }
    }
}

#[derive(Default)]
pub struct LockAnalyzer {
    summaries: FxHashMap<SymbolId, ConcurrencySummary>,
    /// Lock-ordering graph: `edges[x]` is the set of locks ever acquired while `x` was
    /// already held. A new edge that would close a 2-cycle (acquiring `y` while holding
    /// `x`, when `x` was previously acquired while holding `y`) is a deadlock risk
    /// (§4.6); this is the graph's transitive closure collapsed to direct reversals,
    /// which is what "checked against prior edges" calls for without a full
    /// cross-function reachability search.
    ordering_edges: FxHashMap<Atom, FxHashSet<Atom>>,
}

impl LockAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache_summary(&mut self, owner: SymbolId, summary: ConcurrencySummary) {
        self.summaries.insert(owner, summary);
    }

    pub fn summary(&self, owner: SymbolId) -> Option<&ConcurrencySummary> {
        self.summaries.get(&owner)
    }

    /// Analyze one function body. `receiver` identifies `self` for this function so
    /// `LockKey`s compare correctly against the caller-observed state; `try_lock_seen`
    /// starts the analysis directly in conservative mode if the body contains any
    /// `try_lock`-family call (detected ahead of time by the walker, §4.6).
    pub fn analyze(
        &mut self,
        body: &[LockStmt],
        contract: &ConcurrencySummary,
        receiver: SymbolId,
    ) -> (LockState, Vec<Diagnostic>) {
        let mut diags = Vec::new();
        let mut conservative = body_has_try_lock(body);
        let mut state = LockState::default();
        for (field, kind) in &contract.requires {
            state.acquire(LockKey { base: receiver, field: *field, kind: *kind }, Span::DUMMY);
        }
        let (end_state, returned) = self.walk_seq(body, state, &mut diags, &mut conservative, receiver);
        if !returned {
            self.check_exit_balance(&end_state, contract, receiver, Span::DUMMY, &mut diags);
        }
        (end_state, diags)
    }

    fn walk_seq(
        &mut self,
        stmts: &[LockStmt],
        mut state: LockState,
        diags: &mut Vec<Diagnostic>,
        conservative: &mut bool,
        receiver: SymbolId,
    ) -> (LockState, bool) {
        for stmt in stmts {
            let (next, returned) = self.walk_one(stmt, state, diags, conservative, receiver);
            state = next;
            if returned {
                return (state, true);
            }
        }
        (state, false)
    }

    fn walk_one(
        &mut self,
        stmt: &LockStmt,
        mut state: LockState,
        diags: &mut Vec<Diagnostic>,
        conservative: &mut bool,
        receiver: SymbolId,
    ) -> (LockState, bool) {
        match stmt {
            LockStmt::Seq(inner) => self.walk_seq(inner, state, diags, conservative, receiver),
            LockStmt::Acquire { key, span } => {
                if state.is_held(key.base, key.field) && !*conservative {
                    diags.push(Diagnostic::new(
                        DiagnosticCode::SemaLockDoubleAcquire,
                        *span,
                        "lock already held at this program point".to_string(),
                    ));
                }
                self.record_ordering_edge(&state, *key, *span, diags);
                state.acquire(*key, *span);
                (state, false)
            }
            LockStmt::Release { base, field, span } => {
                if !state.is_held(*base, *field) && !*conservative {
                    diags.push(Diagnostic::new(
                        DiagnosticCode::SemaLockReleaseNotHeld,
                        *span,
                        "releasing a lock that is not held".to_string(),
                    ));
                }
                state.release(*base, *field);
                (state, false)
            }
            LockStmt::TryAcquire => {
                *conservative = true;
                (state, false)
            }
            LockStmt::If { then_branch, then_exits, else_branch, else_exits, span } => {
                let then_result = self.walk_seq(then_branch, state.clone(), diags, conservative, receiver);
                let then_state = if *then_exits || then_result.1 { None } else { Some(then_result.0) };
                let else_state = match else_branch {
                    Some(eb) => {
                        let r = self.walk_seq(eb, state.clone(), diags, conservative, receiver);
                        if *else_exits || r.1 { None } else { Some(r.0) }
                    }
                    None => Some(state.clone()),
                };
                let (merged, imbalanced) = LockState::merge(then_state.as_ref(), else_state.as_ref());
                if !imbalanced.is_empty() && !*conservative {
                    diags.push(Diagnostic::new(
                        DiagnosticCode::SemaLockUnbalanced,
                        *span,
                        "lock held on only one branch of this conditional".to_string(),
                    ));
                }
                state = merged;
                (state, false)
            }
            LockStmt::Loop { body } => {
                // Analyze the body once with the incoming state; early exits from the
                // body propagate as "continues" for lock-state purposes, so the loop's
                // exit state is simply the incoming state merged with a completed
                // iteration (zero-iteration case, §4.6).
                let (body_end, _body_returned) =
                    self.walk_seq(body, state.clone(), diags, conservative, receiver);
                let (merged, imbalanced) = LockState::merge(Some(&state), Some(&body_end));
                if !imbalanced.is_empty() && !*conservative {
                    diags.push(Diagnostic::new(
                        DiagnosticCode::SemaLockUnbalanced,
                        Span::DUMMY,
                        "lock state differs between zero and one loop iterations".to_string(),
                    ));
                }
                (merged, false)
            }
            LockStmt::Return { span: _ } => (state, true),
            LockStmt::Opaque => (state, false),
        }
    }

    fn check_exit_balance(
        &self,
        state: &LockState,
        contract: &ConcurrencySummary,
        _receiver: SymbolId,
        span: Span,
        diags: &mut Vec<Diagnostic>,
    ) {
        let allowed: FxHashSet<Atom> = contract
            .requires
            .iter()
            .chain(contract.acquires.iter())
            .map(|(f, _)| *f)
            .collect();
        for key in state.held_keys() {
            if !allowed.contains(&key.field) {
                diags.push(Diagnostic::new(
                    DiagnosticCode::SemaLockNotReleasedOnExit,
                    span,
                    "lock is still held at function exit".to_string(),
                ));
            }
        }
    }

    fn record_ordering_edge(&mut self, state: &LockState, acquiring: LockKey, span: Span, diags: &mut Vec<Diagnostic>) {
        for held in state.held_keys() {
            if held.field == acquiring.field {
                continue;
            }
            let reversed_exists = self
                .ordering_edges
                .get(&acquiring.field)
                .map(|succs| succs.contains(&held.field))
                .unwrap_or(false);
            if reversed_exists {
                diags.push(Diagnostic::new(
                    DiagnosticCode::SemaLockOrderingCycle,
                    span,
                    "acquiring this lock while holding another would close a lock-ordering cycle".to_string(),
                ));
            }
            self.ordering_edges.entry(held.field).or_default().insert(acquiring.field);
        }
    }
}

fn body_has_try_lock(stmts: &[LockStmt]) -> bool {
    stmts.iter().any(|s| match s {
        LockStmt::TryAcquire => true,
        LockStmt::Seq(inner) | LockStmt::Loop { body: inner } => body_has_try_lock(inner),
        LockStmt::If { then_branch, else_branch, .. } => {
            body_has_try_lock(then_branch) || else_branch.as_deref().map(body_has_try_lock).unwrap_or(false)
        }
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mk_key(field: Atom, kind: LockKind) -> LockKey {
        LockKey { base: SymbolId(0), field, kind }
    }

    #[test]
    fn double_acquire_is_reported() {
        let mut analyzer = LockAnalyzer::new();
        let field = Atom(1);
        let body = vec![
            LockStmt::Acquire { key: mk_key(field, LockKind::Mutex), span: Span::new(0, 1) },
            LockStmt::Acquire { key: mk_key(field, LockKind::Mutex), span: Span::new(2, 3) },
        ];
        let (_state, diags) = analyzer.analyze(&body, &ConcurrencySummary::default(), SymbolId(0));
        assert!(diags.iter().any(|d| d.code == DiagnosticCode::SemaLockDoubleAcquire));
    }

    #[test]
    fn imbalanced_if_branch_is_reported() {
        let mut analyzer = LockAnalyzer::new();
        let field = Atom(1);
        let body = vec![LockStmt::If {
            then_branch: vec![LockStmt::Acquire { key: mk_key(field, LockKind::Mutex), span: Span::new(0, 1) }],
            then_exits: false,
            else_branch: None,
            else_exits: false,
            span: Span::new(0, 5),
        }];
        let (_state, diags) = analyzer.analyze(&body, &ConcurrencySummary::default(), SymbolId(0));
        assert!(diags.iter().any(|d| d.code == DiagnosticCode::SemaLockUnbalanced));
    }

    #[test]
    fn try_lock_suppresses_imbalance_and_double_acquire() {
        let mut analyzer = LockAnalyzer::new();
        let field = Atom(1);
        let body = vec![
            LockStmt::TryAcquire,
            LockStmt::If {
                then_branch: vec![LockStmt::Acquire { key: mk_key(field, LockKind::Mutex), span: Span::new(0, 1) }],
                then_exits: false,
                else_branch: None,
                else_exits: false,
                span: Span::new(0, 5),
            },
        ];
        let (_state, diags) = analyzer.analyze(&body, &ConcurrencySummary::default(), SymbolId(0));
        assert!(diags.is_empty());
    }

    #[test]
    fn balanced_if_else_is_silent() {
        let mut analyzer = LockAnalyzer::new();
        let field = Atom(1);
        let body = vec![LockStmt::If {
            then_branch: vec![LockStmt::Acquire { key: mk_key(field, LockKind::Mutex), span: Span::new(0, 1) }],
            then_exits: false,
            else_branch: Some(vec![LockStmt::Acquire { key: mk_key(field, LockKind::Mutex), span: Span::new(2, 3) }]),
            else_exits: false,
            span: Span::new(0, 5),
        }];
        let (state, diags) = analyzer.analyze(&body, &ConcurrencySummary::default(), SymbolId(0));
        assert!(!diags.iter().any(|d| d.code == DiagnosticCode::SemaLockUnbalanced));
        assert!(state.is_held(SymbolId(0), field));
    }
}
