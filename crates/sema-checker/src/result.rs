//! The `Result` record (§3): everything a single `Checker::check_file` run produces,
//! handed back to the embedder alongside (not instead of) the diagnostics list.

use crate::borrow::BorrowEvent;
use crate::typer::ResolvedCallee;
use rustc_hash::FxHashMap;
use sema_ast::ExprId;
use sema_common::{Diagnostic, DiagnosticsBag};
use sema_types::TypeId;

/// One `spawn`/`async` region's captured variables, by symbol name, for the escape
/// analysis the embedder's lowering pass needs when generating closures (§3 "Captured
/// variables").
#[derive(Clone, Debug, Default)]
pub struct CapturedRegion {
    pub region_expr: ExprId,
    pub captures: Vec<sema_ast::symbols::SymbolId>,
}

#[derive(Default)]
pub struct CheckResult {
    pub expr_types: FxHashMap<ExprId, TypeId>,
    pub resolved_callees: FxHashMap<ExprId, ResolvedCallee>,
    pub borrow_events: Vec<BorrowEvent>,
    pub captured_regions: Vec<CapturedRegion>,
    /// Numeric literals that were materialized away from their "any-width" starting
    /// type, for a host that wants to re-render literals with their final width.
    pub materialized_literals: Vec<ExprId>,
    pub diagnostics: DiagnosticsBag,
}

impl CheckResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn type_of(&self, expr: ExprId) -> Option<TypeId> {
        self.expr_types.get(&expr).copied()
    }

    pub fn push_diagnostic(&mut self, diag: Diagnostic) {
        self.diagnostics.push(diag);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    pub fn merge_typer(&mut self, expr_types: FxHashMap<ExprId, TypeId>, resolved_callees: FxHashMap<ExprId, ResolvedCallee>, diagnostics: Vec<Diagnostic>) {
        self.expr_types.extend(expr_types);
        self.resolved_callees.extend(resolved_callees);
        for d in diagnostics {
            self.diagnostics.push(d);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sema_common::{DiagnosticCode, Span};

    #[test]
    fn merge_typer_folds_types_and_diagnostics_into_result() {
        let mut result = CheckResult::new();
        let mut types = FxHashMap::default();
        types.insert(ExprId(0), TypeId(0));
        result.merge_typer(
            types,
            FxHashMap::default(),
            vec![Diagnostic::new(DiagnosticCode::SemaTypeMismatch, Span::DUMMY, "x")],
        );
        assert_eq!(result.type_of(ExprId(0)), Some(TypeId(0)));
        assert!(result.has_errors());
    }
}
