//! Operator, call, and method dispatch (§4.3): lowest-cost-wins resolution over the
//! candidate set produced by `sema_types::MethodIndex`, with ambiguity reported when two
//! or more candidates tie for the lowest cost.

use sema_ast::{BinaryOp, UnaryOp};
use sema_common::{Diagnostic, DiagnosticCode, Span};
use sema_types::{direct_param_compat, receiver_compat, ConversionCost, MethodEntry, MethodIndex, ReceiverCompat, TypeId, TypeRegistry};

#[derive(Clone, Copy, Debug)]
pub struct Resolved<'a> {
    pub entry: &'a MethodEntry,
    pub index: usize,
    pub receiver: ReceiverCompat,
}

/// Resolve a method/operator call against the candidates returned by `MethodIndex`,
/// scoring each by receiver compatibility plus the sum of its argument costs, and
/// picking the (unique) lowest-cost candidate. `None` for "no overload"; `Err` carries
/// an ambiguity diagnostic when the lowest cost is shared by more than one candidate.
pub fn resolve_overload<'a>(
    registry: &TypeRegistry,
    candidates: &'a [MethodEntry],
    receiver_ty: TypeId,
    receiver_mutable: bool,
    arg_tys: &[TypeId],
    call_span: Span,
) -> Result<Option<Resolved<'a>>, Diagnostic> {
    let mut scored: Vec<(ConversionCost, usize, ReceiverCompat)> = Vec::new();
    'candidate: for (i, entry) in candidates.iter().enumerate() {
        let params = &entry.info.param_keys;
        if params.is_empty() {
            continue;
        }
        let self_param = params[0];
        let Some(recv) = receiver_compat(registry, receiver_ty, receiver_mutable, self_param) else {
            continue;
        };
        let rest = &params[1..];
        if rest.len() != arg_tys.len() && !entry.info.variadic.iter().skip(1).any(|&v| v) {
            continue;
        }
        let mut total = recv.cost();
        for (param_ty, arg_ty) in rest.iter().zip(arg_tys.iter()) {
            match direct_param_compat(registry, *arg_ty, *param_ty) {
                Some(c) => total = ConversionCost(total.0.max(c.0)),
                None => continue 'candidate,
            }
        }
        scored.push((total, i, recv));
    }
    if scored.is_empty() {
        return Ok(None);
    }
    let min_cost = scored.iter().map(|(c, _, _)| *c).min().unwrap();
    let winners: Vec<_> = scored.iter().filter(|(c, _, _)| *c == min_cost).collect();
    if winners.len() > 1 {
        return Err(Diagnostic::new(
            DiagnosticCode::SemaAmbiguousOverload,
            call_span,
            "call is ambiguous between multiple equally-good overloads".to_string(),
        ));
    }
    let (_, idx, recv) = winners[0];
    Ok(Some(Resolved {
        entry: &candidates[*idx],
        index: *idx,
        receiver: *recv,
    }))
}

pub fn resolve_binary_op<'a>(
    registry: &TypeRegistry,
    index: &'a MethodIndex,
    op: BinaryOp,
    lhs_ty: TypeId,
    rhs_ty: TypeId,
    span: Span,
) -> Result<Option<Resolved<'a>>, Diagnostic> {
    let candidates = index.lookup_binary_op(registry, lhs_ty, op);
    resolve_overload(registry, candidates, lhs_ty, false, &[rhs_ty], span)
}

pub fn resolve_unary_op<'a>(
    registry: &TypeRegistry,
    index: &'a MethodIndex,
    op: UnaryOp,
    operand_ty: TypeId,
    span: Span,
) -> Result<Option<Resolved<'a>>, Diagnostic> {
    let candidates = index.lookup_unary_op(registry, operand_ty, op);
    resolve_overload(registry, candidates, operand_ty, false, &[], span)
}

pub fn resolve_method_call<'a>(
    registry: &TypeRegistry,
    index: &'a MethodIndex,
    method_name: &str,
    receiver_ty: TypeId,
    receiver_mutable: bool,
    arg_tys: &[TypeId],
    span: Span,
) -> Result<Option<Resolved<'a>>, Diagnostic> {
    let candidates = index.lookup(registry, receiver_ty, method_name);
    resolve_overload(registry, candidates, receiver_ty, receiver_mutable, arg_tys, span)
}

/// A value is usable as a boolean condition (`if`, `while`) either directly (`bool`) or
/// via a nullary `__bool` method (§4.3 "Boolean contexts").
pub fn usable_as_bool(registry: &TypeRegistry, index: &MethodIndex, ty: TypeId) -> bool {
    use sema_types::Type;
    if matches!(registry.lookup(ty), Type::Bool) {
        return true;
    }
    index.has_any(registry, ty, sema_types::BOOL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sema_types::FnInfo;

    fn fn_info(params: Vec<TypeId>, result: TypeId) -> FnInfo {
        let len = params.len();
        FnInfo {
            param_keys: params,
            variadic: vec![false; len],
            allow_to: vec![false; len],
            has_self: true,
            result,
        }
    }

    #[test]
    fn unique_lowest_cost_candidate_wins() {
        let mut reg = TypeRegistry::new();
        let int_any = reg.builtins().int_any;
        let mut idx = MethodIndex::new();
        let name = reg.intern_name("__add");
        idx.insert(&reg, int_any, "__add", fn_info(vec![int_any, int_any], int_any), name);
        let result = resolve_binary_op(&reg, &idx, BinaryOp::Add, int_any, int_any, Span::DUMMY).unwrap();
        assert!(result.is_some());
    }

    #[test]
    fn no_candidates_is_none_not_error() {
        let reg = TypeRegistry::new();
        let idx = MethodIndex::new();
        let int_any = reg.builtins().int_any;
        let result = resolve_binary_op(&reg, &idx, BinaryOp::Add, int_any, int_any, Span::DUMMY).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn mismatched_arg_type_is_filtered_out() {
        let mut reg = TypeRegistry::new();
        let int_any = reg.builtins().int_any;
        let string = reg.builtins().string;
        let mut idx = MethodIndex::new();
        let name = reg.intern_name("__add");
        idx.insert(&reg, int_any, "__add", fn_info(vec![int_any, string], int_any), name);
        let result = resolve_binary_op(&reg, &idx, BinaryOp::Add, int_any, int_any, Span::DUMMY).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn bool_is_directly_usable_in_conditions() {
        let reg = TypeRegistry::new();
        let idx = MethodIndex::new();
        assert!(usable_as_bool(&reg, &idx, reg.builtins().bool_));
    }

    #[test]
    fn non_bool_without_dunder_bool_is_rejected() {
        let reg = TypeRegistry::new();
        let idx = MethodIndex::new();
        assert!(!usable_as_bool(&reg, &idx, reg.builtins().int_any));
    }

    #[test]
    fn ambiguous_tie_is_reported() {
        let mut reg = TypeRegistry::new();
        let int_any = reg.builtins().int_any;
        let mut idx = MethodIndex::new();
        let name1 = reg.intern_name("__add_a");
        let name2 = reg.intern_name("__add_b");
        idx.insert(&reg, int_any, "__add", fn_info(vec![int_any, int_any], int_any), name1);
        idx.insert(&reg, int_any, "__add", fn_info(vec![int_any, int_any], int_any), name2);
        let result = resolve_binary_op(&reg, &idx, BinaryOp::Add, int_any, int_any, Span::DUMMY);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_param_type_is_treated_as_compatible_for_recovery() {
        let mut reg = TypeRegistry::new();
        let int_any = reg.builtins().int_any;
        let unknown = reg.builtins().unknown;
        let mut idx = MethodIndex::new();
        let name = reg.intern_name("__add");
        idx.insert(&reg, int_any, "__add", fn_info(vec![int_any, unknown], int_any), name);
        let result = resolve_binary_op(&reg, &idx, BinaryOp::Add, int_any, int_any, Span::DUMMY).unwrap();
        assert!(result.is_some());
    }
}
