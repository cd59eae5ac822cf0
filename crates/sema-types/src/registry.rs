//! Type Registry & Keys (C1): interns structural/nominal types, assigns one
//! `TypeId` per unique structure, and caches the per-type side tables (struct/union
//! bodies, copy-bit, layout attributes) that are filled in after first registration.

use crate::types::{
    FieldInfo, FloatWidth, FnInfo, IntWidth, LayoutAttrs, NominalKey, StructInfo, Type, TypeId,
    UnionInfo,
};
use rustc_hash::FxHashMap;
use sema_common::Atom;
use sema_common::Interner;

/// Commonly-needed builtin type ids, resolved once at registry construction so callers
/// never have to re-intern `Type::Bool` etc.
#[derive(Clone, Copy, Debug)]
pub struct Builtins {
    pub bool_: TypeId,
    pub string: TypeId,
    pub nothing: TypeId,
    pub unit: TypeId,
    pub int_any: TypeId,
    pub uint_any: TypeId,
    pub float64: TypeId,
    pub unknown: TypeId,
    pub error: TypeId,
}

pub struct TypeRegistry {
    types: Vec<Type>,
    by_shape: FxHashMap<Type, TypeId>,
    names: Interner,
    struct_info: FxHashMap<TypeId, StructInfo>,
    union_info: FxHashMap<TypeId, UnionInfo>,
    fn_info: FxHashMap<TypeId, FnInfo>,
    alias_target: FxHashMap<TypeId, TypeId>,
    is_copy: FxHashMap<TypeId, bool>,
    layout_attrs: FxHashMap<TypeId, LayoutAttrs>,
    builtins: Builtins,
}

impl TypeRegistry {
    pub fn new() -> Self {
        let mut registry = TypeRegistry {
            types: Vec::new(),
            by_shape: FxHashMap::default(),
            names: Interner::new(),
            struct_info: FxHashMap::default(),
            union_info: FxHashMap::default(),
            fn_info: FxHashMap::default(),
            alias_target: FxHashMap::default(),
            is_copy: FxHashMap::default(),
            layout_attrs: FxHashMap::default(),
            builtins: Builtins {
                bool_: TypeId(0),
                string: TypeId(0),
                nothing: TypeId(0),
                unit: TypeId(0),
                int_any: TypeId(0),
                uint_any: TypeId(0),
                float64: TypeId(0),
                unknown: TypeId(0),
                error: TypeId(0),
            },
        };
        let bool_ = registry.intern(Type::Bool);
        let string = registry.intern(Type::String);
        let nothing = registry.intern(Type::Nothing);
        let unit = registry.intern(Type::Unit);
        let int_any = registry.intern(Type::Int(IntWidth::Any));
        let uint_any = registry.intern(Type::UInt(IntWidth::Any));
        let float64 = registry.intern(Type::Float(FloatWidth::W64));
        let unknown = registry.intern(Type::Unknown);
        let error = registry.intern(Type::Error);
        for &(id, copy) in &[
            (bool_, true),
            (string, false),
            (nothing, true),
            (unit, true),
            (int_any, true),
            (uint_any, true),
            (float64, true),
        ] {
            registry.is_copy.insert(id, copy);
        }
        registry.builtins = Builtins {
            bool_,
            string,
            nothing,
            unit,
            int_any,
            uint_any,
            float64,
            unknown,
            error,
        };
        registry
    }

    pub fn builtins(&self) -> Builtins {
        self.builtins
    }

    /// Intern a structural type. Structural equality implies identity (§3): interning
    /// the same `Type` shape twice returns the same id.
    pub fn intern(&mut self, ty: Type) -> TypeId {
        if let Some(&id) = self.by_shape.get(&ty) {
            return id;
        }
        let id = TypeId(self.types.len() as u32);
        self.by_shape.insert(ty.clone(), id);
        self.types.push(ty);
        id
    }

    pub fn lookup(&self, id: TypeId) -> &Type {
        &self.types[id.0 as usize]
    }

    pub fn intern_name(&mut self, s: &str) -> Atom {
        self.names.intern(s)
    }

    pub fn atom_str(&self, atom: Atom) -> &str {
        self.names.lookup(atom)
    }

    /// Register a (possibly not-yet-fully-known) struct instance; returns the shell id
    /// immediately so recursive field types (e.g. `own Node` inside `Node`) can refer
    /// to it before `set_struct_fields` is called.
    pub fn register_struct_instance(&mut self, name: Atom, type_args: Vec<TypeId>) -> TypeId {
        self.intern(Type::Struct(NominalKey { name, type_args }))
    }

    pub fn register_union_instance(&mut self, name: Atom, type_args: Vec<TypeId>) -> TypeId {
        self.intern(Type::Union(NominalKey { name, type_args }))
    }

    pub fn register_alias(&mut self, name: Atom, type_args: Vec<TypeId>, target: TypeId) -> TypeId {
        let id = self.intern(Type::Alias(NominalKey { name, type_args }));
        self.alias_target.insert(id, target);
        id
    }

    pub fn register_tuple(&mut self, elems: Vec<TypeId>) -> TypeId {
        self.intern(Type::Tuple(elems))
    }

    pub fn register_fn(&mut self, info: FnInfo) -> TypeId {
        let ty = Type::Fn {
            params: info.param_keys.clone(),
            result: info.result,
        };
        let id = self.intern(ty);
        self.fn_info.insert(id, info);
        id
    }

    pub fn set_struct_fields(&mut self, id: TypeId, type_params: Vec<Atom>, fields: Vec<FieldInfo>, base: Option<TypeId>) {
        self.struct_info
            .insert(id, StructInfo { type_params, fields, base });
    }

    pub fn set_union_members(
        &mut self,
        id: TypeId,
        type_params: Vec<Atom>,
        members: Vec<crate::types::UnionMemberInfo>,
    ) {
        self.union_info.insert(id, UnionInfo { type_params, members });
    }

    pub fn set_type_layout_attrs(&mut self, id: TypeId, attrs: LayoutAttrs) {
        self.layout_attrs.insert(id, attrs);
    }

    pub fn layout_attrs(&self, id: TypeId) -> LayoutAttrs {
        self.layout_attrs.get(&id).copied().unwrap_or_default()
    }

    pub fn struct_info(&self, id: TypeId) -> Option<&StructInfo> {
        self.struct_info.get(&id)
    }

    pub fn union_info(&self, id: TypeId) -> Option<&UnionInfo> {
        self.union_info.get(&id)
    }

    pub fn fn_info(&self, id: TypeId) -> Option<&FnInfo> {
        self.fn_info.get(&id)
    }

    pub fn alias_target(&self, id: TypeId) -> Option<TypeId> {
        self.alias_target.get(&id).copied()
    }

    pub fn alias_target_of(&self, nk: &NominalKey) -> Option<TypeId> {
        let id = self.by_shape.get(&Type::Alias(nk.clone()))?;
        self.alias_target(*id)
    }

    /// The alias-resolved form of a type: for an alias, the target (recursively); for
    /// anything else, itself. Never collapses the *label* shown to users (§3) — this
    /// is purely for structural queries like method dispatch and copy-ness.
    pub fn resolve_alias(&self, mut id: TypeId) -> TypeId {
        let mut guard = 0;
        while let Type::Alias(nk) = self.lookup(id) {
            guard += 1;
            if guard > 64 {
                break;
            }
            match self.alias_target_of(nk) {
                Some(target) => id = target,
                None => break,
            }
        }
        id
    }

    pub fn is_copy(&self, id: TypeId) -> bool {
        self.is_copy.get(&id).copied().unwrap_or(false)
    }

    pub fn mark_copy_type(&mut self, id: TypeId, copy: bool) {
        self.is_copy.insert(id, copy);
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_identity_preserving() {
        let mut reg = TypeRegistry::new();
        let a = reg.intern(Type::Array(reg.builtins().int_any));
        let b = reg.intern(Type::Array(reg.builtins().int_any));
        assert_eq!(a, b);
    }

    #[test]
    fn struct_shell_then_fields_supports_recursive_field_types() {
        let mut reg = TypeRegistry::new();
        let name = reg.intern_name("Node");
        let shell = reg.register_struct_instance(name, vec![]);
        let own_self = reg.intern(Type::Own(shell));
        let next_field = reg.intern_name("next");
        reg.set_struct_fields(
            shell,
            vec![],
            vec![FieldInfo {
                name: next_field,
                ty: own_self,
                inherited: false,
            }],
            None,
        );
        let info = reg.struct_info(shell).unwrap();
        assert_eq!(info.fields[0].ty, own_self);
    }

    #[test]
    fn alias_resolves_without_collapsing_identity() {
        let mut reg = TypeRegistry::new();
        let int_any = reg.builtins().int_any;
        let name = reg.intern_name("MyInt");
        let alias = reg.register_alias(name, vec![], int_any);
        assert_ne!(alias, int_any);
        assert_eq!(reg.resolve_alias(alias), int_any);
    }
}
