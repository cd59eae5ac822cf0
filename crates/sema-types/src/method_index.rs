//! Method & Operator Index (C2, §4.2): maps `(receiver-key, method-name)` to the list
//! of signatures declared for it, built once per file pass before C3 runs.

use crate::key::{render, strip_one_alias_layer};
use crate::magic;
use crate::registry::TypeRegistry;
use crate::types::{FnInfo, TypeId};
use rustc_hash::FxHashMap;
use sema_common::Atom;
use tracing::warn;

/// One declared method signature, indexed by receiver key and name.
#[derive(Clone, Debug)]
pub struct MethodEntry {
    pub info: FnInfo,
    /// The symbol this entry came from, for diagnostics that need a span.
    pub symbol_name: Atom,
}

#[derive(Default)]
pub struct MethodIndex {
    // receiver-key -> method-name -> overload set
    entries: FxHashMap<String, FxHashMap<String, Vec<MethodEntry>>>,
}

impl MethodIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a method declaration. `receiver_ty` is the self-parameter's declared type
    /// (reference stripped to its key form exactly as written — the index keys on the
    /// literal receiver key, not a borrow-normalized one, per §4.2).
    pub fn insert(
        &mut self,
        registry: &TypeRegistry,
        receiver_ty: TypeId,
        method_name: &str,
        info: FnInfo,
        symbol_name: Atom,
    ) {
        let key = render(registry, receiver_ty);
        self.entries
            .entry(key)
            .or_default()
            .entry(method_name.to_string())
            .or_default()
            .push(MethodEntry { info, symbol_name });
    }

    /// Validate and insert a `__to` conversion method. A `__to` entry must take exactly
    /// `(self-like, target)` with no variadic parameter; the self parameter may be the
    /// exact receiver type or any alias of it. Invalid shapes are rejected (the caller
    /// turns the `false` return into a `SemaTypeMismatch` diagnostic) and never indexed,
    /// so later lookups never see a malformed `__to`.
    pub fn insert_to(
        &mut self,
        registry: &TypeRegistry,
        receiver_ty: TypeId,
        target_ty: TypeId,
        info: FnInfo,
        symbol_name: Atom,
    ) -> bool {
        if info.param_keys.len() != 1 || info.variadic.iter().any(|&v| v) {
            warn!("__to declaration has wrong arity or is variadic; dropping");
            return false;
        }
        if info.result != target_ty {
            warn!("__to declaration's result does not match its declared target; dropping");
            return false;
        }
        let self_param = info.param_keys[0];
        let self_ok = self_param == receiver_ty || registry.resolve_alias(self_param) == registry.resolve_alias(receiver_ty);
        if !self_ok {
            warn!("__to declaration's self parameter does not match its receiver; dropping");
            return false;
        }
        self.insert(registry, receiver_ty, magic::TO, info, symbol_name);
        true
    }

    /// Look up overloads of `method_name` reachable from `receiver_ty`, generating the
    /// alias-fallback candidate set: the receiver's own key, then (if it is an alias)
    /// its base type's key, so an operator defined on the base still applies through a
    /// transparent alias unless the alias itself redefines it (§4.2 L2 "alias fallback").
    pub fn lookup(&self, registry: &TypeRegistry, receiver_ty: TypeId, method_name: &str) -> &[MethodEntry] {
        let key = render(registry, receiver_ty);
        if let Some(overloads) = self.entries.get(&key).and_then(|m| m.get(method_name)) {
            if !overloads.is_empty() {
                return overloads;
            }
        }
        if let Some(base) = strip_one_alias_layer(registry, receiver_ty) {
            let base_key = render(registry, base);
            if let Some(overloads) = self.entries.get(&base_key).and_then(|m| m.get(method_name)) {
                return overloads;
            }
        }
        &[]
    }

    pub fn lookup_binary_op(&self, registry: &TypeRegistry, receiver_ty: TypeId, op: sema_ast::BinaryOp) -> &[MethodEntry] {
        self.lookup(registry, receiver_ty, magic::binary_op_method(op))
    }

    pub fn lookup_unary_op(&self, registry: &TypeRegistry, receiver_ty: TypeId, op: sema_ast::UnaryOp) -> &[MethodEntry] {
        self.lookup(registry, receiver_ty, magic::unary_op_method(op))
    }

    pub fn has_any(&self, registry: &TypeRegistry, receiver_ty: TypeId, method_name: &str) -> bool {
        !self.lookup(registry, receiver_ty, method_name).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Type;

    fn sample_info(param: TypeId, result: TypeId) -> FnInfo {
        FnInfo {
            param_keys: vec![param],
            variadic: vec![false],
            allow_to: vec![false],
            has_self: true,
            result,
        }
    }

    #[test]
    fn direct_lookup_finds_registered_method() {
        let mut reg = TypeRegistry::new();
        let int_any = reg.builtins().int_any;
        let name = reg.intern_name("add_one");
        let mut idx = MethodIndex::new();
        idx.insert(&reg, int_any, "add_one", sample_info(int_any, int_any), name);
        assert_eq!(idx.lookup(&reg, int_any, "add_one").len(), 1);
        assert!(idx.lookup(&reg, int_any, "missing").is_empty());
    }

    #[test]
    fn alias_fallback_finds_base_operator() {
        let mut reg = TypeRegistry::new();
        let int_any = reg.builtins().int_any;
        let alias_name = reg.intern_name("MyInt");
        let alias = reg.register_alias(alias_name, vec![], int_any);
        let sym = reg.intern_name("__add");
        let mut idx = MethodIndex::new();
        idx.insert(&reg, int_any, "__add", sample_info(int_any, int_any), sym);
        assert!(!idx.lookup(&reg, alias, "__add").is_empty());
    }

    #[test]
    fn to_rejects_wrong_arity() {
        let mut reg = TypeRegistry::new();
        let int_any = reg.builtins().int_any;
        let string = reg.builtins().string;
        let sym = reg.intern_name("__to");
        let mut idx = MethodIndex::new();
        let bad = FnInfo {
            param_keys: vec![int_any, int_any],
            variadic: vec![false, false],
            allow_to: vec![false, false],
            has_self: true,
            result: string,
        };
        assert!(!idx.insert_to(&reg, int_any, string, bad, sym));
    }

    #[test]
    fn to_accepts_matching_self_and_target() {
        let mut reg = TypeRegistry::new();
        let int_any = reg.builtins().int_any;
        let string = reg.builtins().string;
        let sym = reg.intern_name("__to");
        let mut idx = MethodIndex::new();
        let good = FnInfo {
            param_keys: vec![int_any],
            variadic: vec![false],
            allow_to: vec![false],
            has_self: true,
            result: string,
        };
        assert!(idx.insert_to(&reg, int_any, string, good, sym));
        assert_eq!(idx.lookup(&reg, int_any, magic::TO).len(), 1);
    }

    #[test]
    fn registry_error_type_smoke() {
        let reg = TypeRegistry::new();
        assert!(matches!(reg.lookup(reg.builtins().error), Type::Error));
    }
}
