//! Generic instantiation (§4.3 "Generics"): hygienic name-to-type substitution for a
//! single call/struct-literal site, with support for an explicit `::<T, ...>` override
//! that takes priority over inference from argument types.

use rustc_hash::FxHashMap;
use sema_common::Atom;
use sema_types::{Type, TypeId, TypeRegistry};

/// Keys a substitution by `(owner, param name)` rather than bare name, so two distinct
/// generic declarations that happen to both call a type parameter `T` never collide
/// within the same instantiation (hygiene, §4.3).
#[derive(Default, Clone, Debug)]
pub struct Substitution {
    map: FxHashMap<(Atom, Atom), TypeId>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, owner: Atom, param: Atom, ty: TypeId) {
        self.map.insert((owner, param), ty);
    }

    pub fn get(&self, owner: Atom, param: Atom) -> Option<TypeId> {
        self.map.get(&(owner, param)).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Infer a substitution for `owner`'s type parameters by structurally unifying each
/// declared parameter type against the corresponding argument type. Explicit type
/// arguments (`explicit`, positional, matching `type_params` order) always win over
/// inference for the parameters they cover; remaining parameters are inferred.
pub fn infer_substitution(
    registry: &TypeRegistry,
    owner: Atom,
    type_params: &[Atom],
    param_types: &[TypeId],
    arg_types: &[TypeId],
    explicit: &[TypeId],
) -> Substitution {
    let mut subst = Substitution::new();
    for (i, &param_name) in type_params.iter().enumerate() {
        if let Some(&explicit_ty) = explicit.get(i) {
            subst.bind(owner, param_name, explicit_ty);
        }
    }
    for (param_ty, arg_ty) in param_types.iter().zip(arg_types.iter()) {
        unify(registry, owner, *param_ty, *arg_ty, &mut subst, type_params);
    }
    subst
}

fn unify(registry: &TypeRegistry, owner: Atom, param_ty: TypeId, arg_ty: TypeId, subst: &mut Substitution, type_params: &[Atom]) {
    match registry.lookup(param_ty) {
        Type::GenericParam { name, owner: param_owner, .. } if *param_owner == owner && type_params.contains(name) => {
            subst.map.entry((owner, *name)).or_insert(arg_ty);
        }
        Type::Reference(inner, _) => {
            if let Type::Reference(arg_inner, _) = registry.lookup(arg_ty) {
                unify(registry, owner, *inner, *arg_inner, subst, type_params);
            }
        }
        Type::Own(inner) => {
            if let Type::Own(arg_inner) = registry.lookup(arg_ty) {
                unify(registry, owner, *inner, *arg_inner, subst, type_params);
            }
        }
        Type::Array(inner) => {
            if let Type::Array(arg_inner) = registry.lookup(arg_ty) {
                unify(registry, owner, *inner, *arg_inner, subst, type_params);
            }
        }
        Type::Struct(nk) | Type::Union(nk) => {
            let arg_args = match registry.lookup(arg_ty) {
                Type::Struct(ank) | Type::Union(ank) if ank.name == nk.name => ank.type_args.clone(),
                _ => return,
            };
            for (p, a) in nk.type_args.clone().iter().zip(arg_args.iter()) {
                unify(registry, owner, *p, *a, subst, type_params);
            }
        }
        _ => {}
    }
}

/// Substitute every occurrence of a bound generic parameter in `ty` with its mapped
/// type. Unbound parameters (shouldn't happen once inference has seen every parameter
/// position, but can for a parameter that appears only in the return type) pass through
/// unchanged — the caller treats that as "could not instantiate" if it matters.
pub fn substitute(registry: &mut TypeRegistry, owner: Atom, subst: &Substitution, ty: TypeId) -> TypeId {
    match registry.lookup(ty).clone() {
        Type::GenericParam { name, owner: param_owner, .. } if param_owner == owner => {
            subst.get(owner, name).unwrap_or(ty)
        }
        Type::Reference(inner, mutable) => {
            let new_inner = substitute(registry, owner, subst, inner);
            registry.intern(Type::Reference(new_inner, mutable))
        }
        Type::Own(inner) => {
            let new_inner = substitute(registry, owner, subst, inner);
            registry.intern(Type::Own(new_inner))
        }
        Type::Array(inner) => {
            let new_inner = substitute(registry, owner, subst, inner);
            registry.intern(Type::Array(new_inner))
        }
        _ => ty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_generic_param_from_argument() {
        let mut reg = TypeRegistry::new();
        let owner = reg.intern_name("Box");
        let t_param = reg.intern_name("T");
        let generic_param = reg.intern(Type::GenericParam { name: t_param, owner, index: 0 });
        let int_any = reg.builtins().int_any;
        let subst = infer_substitution(&reg, owner, &[t_param], &[generic_param], &[int_any], &[]);
        assert_eq!(subst.get(owner, t_param), Some(int_any));
    }

    #[test]
    fn explicit_type_argument_overrides_inference() {
        let mut reg = TypeRegistry::new();
        let owner = reg.intern_name("Box");
        let t_param = reg.intern_name("T");
        let generic_param = reg.intern(Type::GenericParam { name: t_param, owner, index: 0 });
        let int_any = reg.builtins().int_any;
        let string = reg.builtins().string;
        let subst = infer_substitution(&reg, owner, &[t_param], &[generic_param], &[int_any], &[string]);
        assert_eq!(subst.get(owner, t_param), Some(string));
    }

    #[test]
    fn substitute_rewrites_nested_reference() {
        let mut reg = TypeRegistry::new();
        let owner = reg.intern_name("Box");
        let t_param = reg.intern_name("T");
        let generic_param = reg.intern(Type::GenericParam { name: t_param, owner, index: 0 });
        let ref_ty = reg.intern(Type::Reference(generic_param, false));
        let int_any = reg.builtins().int_any;
        let mut subst = Substitution::new();
        subst.bind(owner, t_param, int_any);
        let result = substitute(&mut reg, owner, &subst, ref_ty);
        assert_eq!(reg.lookup(result), &Type::Reference(int_any, false));
    }
}
