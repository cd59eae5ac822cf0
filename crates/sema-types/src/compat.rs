//! Parameter and receiver compatibility rules used by operator dispatch and call
//! resolution (§4.3). Pure type-level judgments — borrow-state-aware decisions (is the
//! *binding* actually mutable right now) are layered on top by the checker, which is
//! the only component that also sees the borrow engine.

use crate::registry::TypeRegistry;
use crate::types::{Type, TypeId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ConversionCost(pub u8);

impl ConversionCost {
    pub const EXACT: ConversionCost = ConversionCost(0);
    pub const REBORROW: ConversionCost = ConversionCost(1);
    pub const IMPLICIT_BORROW: ConversionCost = ConversionCost(2);
    pub const OWN_TO_COPY: ConversionCost = ConversionCost(3);
    pub const IMPLICIT_TO: ConversionCost = ConversionCost(4);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReceiverCompat {
    Exact,
    ValueToSharedBorrow,
    ValueToMutBorrow,
    OwnToCopy,
    MutBorrowToSharedBorrow,
}

impl ReceiverCompat {
    pub fn cost(self) -> ConversionCost {
        match self {
            ReceiverCompat::Exact => ConversionCost::EXACT,
            ReceiverCompat::MutBorrowToSharedBorrow => ConversionCost::REBORROW,
            ReceiverCompat::ValueToSharedBorrow | ReceiverCompat::ValueToMutBorrow => {
                ConversionCost::IMPLICIT_BORROW
            }
            ReceiverCompat::OwnToCopy => ConversionCost::OWN_TO_COPY,
        }
    }
}

/// Two types are "the same through alias resolution" for dispatch purposes — aliases
/// never collapse the *label* (§3), but they are transparent for matching (§4.2 L2).
pub fn same_through_alias(registry: &TypeRegistry, a: TypeId, b: TypeId) -> bool {
    a == b || registry.resolve_alias(a) == registry.resolve_alias(b)
}

/// Direct (non-`__to`) argument/parameter compatibility: exact match modulo alias
/// resolution. `__to`-mediated compatibility is the checker's job (it must also check
/// the parameter's `allow_to` flag and look up a `__to` method via `MethodIndex`).
pub fn direct_param_compat(registry: &TypeRegistry, arg_ty: TypeId, param_ty: TypeId) -> Option<ConversionCost> {
    if matches!(registry.lookup(arg_ty), Type::Error) || matches!(registry.lookup(param_ty), Type::Unknown) {
        // Recovery: an already-erroneous argument is treated as compatible with
        // anything so one failure doesn't cascade into "no overload" everywhere (§7).
        return Some(ConversionCost::EXACT);
    }
    if same_through_alias(registry, arg_ty, param_ty) {
        Some(ConversionCost::EXACT)
    } else {
        None
    }
}

/// The self-parameter compatibility rules of §4.3 "Method dispatch": exact match;
/// value→`&T`/`&mut T` gated by `binding_mutable`; `own T`→`T` when `T` is `Copy`;
/// `&mut T`→`&T` reborrow.
pub fn receiver_compat(
    registry: &TypeRegistry,
    binding_ty: TypeId,
    binding_mutable: bool,
    self_param_ty: TypeId,
) -> Option<ReceiverCompat> {
    if same_through_alias(registry, binding_ty, self_param_ty) {
        return Some(ReceiverCompat::Exact);
    }
    match registry.lookup(self_param_ty) {
        Type::Reference(inner, mutable) => {
            if same_through_alias(registry, *inner, binding_ty) {
                return if *mutable {
                    binding_mutable.then_some(ReceiverCompat::ValueToMutBorrow)
                } else {
                    Some(ReceiverCompat::ValueToSharedBorrow)
                };
            }
            // &mut T (binding) -> &T (param): reborrow as shared.
            if !*mutable {
                if let Type::Reference(binding_inner, true) = registry.lookup(binding_ty) {
                    if same_through_alias(registry, *binding_inner, *inner) {
                        return Some(ReceiverCompat::MutBorrowToSharedBorrow);
                    }
                }
            }
            None
        }
        _ => {
            // own T (binding) -> T (param) when T is Copy.
            if let Type::Own(inner) = registry.lookup(binding_ty) {
                if same_through_alias(registry, *inner, self_param_ty) && registry.is_copy(self_param_ty) {
                    return Some(ReceiverCompat::OwnToCopy);
                }
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TypeRegistry;

    #[test]
    fn exact_receiver_match_is_free() {
        let reg = TypeRegistry::new();
        let int_any = reg.builtins().int_any;
        assert_eq!(
            receiver_compat(&reg, int_any, false, int_any),
            Some(ReceiverCompat::Exact)
        );
    }

    #[test]
    fn value_to_mut_ref_requires_mutable_binding() {
        let mut reg = TypeRegistry::new();
        let int_any = reg.builtins().int_any;
        let mut_ref = reg.intern(Type::Reference(int_any, true));
        assert_eq!(receiver_compat(&reg, int_any, false, mut_ref), None);
        assert_eq!(
            receiver_compat(&reg, int_any, true, mut_ref),
            Some(ReceiverCompat::ValueToMutBorrow)
        );
    }

    #[test]
    fn own_copy_to_value_is_allowed_only_when_copy() {
        let mut reg = TypeRegistry::new();
        let int_any = reg.builtins().int_any;
        let owned = reg.intern(Type::Own(int_any));
        assert_eq!(
            receiver_compat(&reg, owned, false, int_any),
            Some(ReceiverCompat::OwnToCopy)
        );
    }

    #[test]
    fn mut_ref_reborrows_as_shared() {
        let mut reg = TypeRegistry::new();
        let int_any = reg.builtins().int_any;
        let mut_ref = reg.intern(Type::Reference(int_any, true));
        let shared_ref = reg.intern(Type::Reference(int_any, false));
        assert_eq!(
            receiver_compat(&reg, mut_ref, false, shared_ref),
            Some(ReceiverCompat::MutBorrowToSharedBorrow)
        );
    }
}
