//! Type-key rendering and parsing (§4.1) — the single source of truth for dispatch.
//!
//! Keys are recursive strings (`&T`, `&mut T`, `own T`, `*T`, `[T]`, `[T; N]`, `(T,U)`,
//! `Foo<T,U>`); `render` and `parse` must agree (L1, the key round-trip law).

use crate::registry::TypeRegistry;
use crate::types::{FloatWidth, IntWidth, NominalKey, Type, TypeId};

pub fn render(registry: &TypeRegistry, id: TypeId) -> String {
    let mut out = String::new();
    render_into(registry, id, &mut out);
    out
}

fn render_into(registry: &TypeRegistry, id: TypeId, out: &mut String) {
    match registry.lookup(id) {
        Type::Bool => out.push_str("bool"),
        Type::String => out.push_str("string"),
        Type::Nothing => out.push_str("nothing"),
        Type::Unit => out.push_str("unit"),
        Type::Unknown => out.push_str("unknown"),
        Type::Error => out.push_str("error"),
        Type::Int(w) => out.push_str(&int_key("int", *w)),
        Type::UInt(w) => out.push_str(&int_key("uint", *w)),
        Type::Float(w) => out.push_str(float_key(*w)),
        Type::Reference(inner, mutable) => {
            out.push('&');
            if *mutable {
                out.push_str("mut ");
            }
            render_into(registry, *inner, out);
        }
        Type::Own(inner) => {
            out.push_str("own ");
            render_into(registry, *inner, out);
        }
        Type::Pointer(inner) => {
            out.push('*');
            render_into(registry, *inner, out);
        }
        Type::Array(inner) => {
            out.push('[');
            render_into(registry, *inner, out);
            out.push(']');
        }
        Type::ArrayFixed(inner, n) => {
            out.push('[');
            render_into(registry, *inner, out);
            out.push_str("; ");
            out.push_str(&n.to_string());
            out.push(']');
        }
        Type::Tuple(elems) => {
            out.push('(');
            if elems.is_empty() {
                out.push_str("unit");
            } else {
                for (i, e) in elems.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    render_into(registry, *e, out);
                }
            }
            out.push(')');
        }
        Type::Fn { params, result } => {
            out.push_str("fn(");
            for (i, p) in params.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                render_into(registry, *p, out);
            }
            out.push_str(")->");
            render_into(registry, *result, out);
        }
        Type::Struct(nk) | Type::Union(nk) | Type::Alias(nk) => {
            render_nominal(registry, nk, out);
        }
        Type::GenericParam { name, .. } => {
            out.push_str(registry.atom_str(*name));
        }
        Type::ConstUint(n) => out.push_str(&n.to_string()),
    }
}

fn render_nominal(registry: &TypeRegistry, nk: &NominalKey, out: &mut String) {
    out.push_str(registry.atom_str(nk.name));
    if !nk.type_args.is_empty() {
        out.push('<');
        for (i, a) in nk.type_args.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            render_into(registry, *a, out);
        }
        out.push('>');
    }
}

fn int_key(base: &str, w: IntWidth) -> String {
    match w {
        IntWidth::Any => base.to_string(),
        IntWidth::W8 => format!("{base}8"),
        IntWidth::W16 => format!("{base}16"),
        IntWidth::W32 => format!("{base}32"),
        IntWidth::W64 => format!("{base}64"),
    }
}

fn float_key(w: FloatWidth) -> &'static str {
    match w {
        FloatWidth::W16 => "float16",
        FloatWidth::W32 => "float32",
        FloatWidth::W64 => "float64",
    }
}

/// Recognize the base name of an aliasable primitive, so alias-fallback dispatch (§4.2
/// L2) can generate a base-type candidate key alongside the alias key. Returns `None`
/// for nominal keys, which fall back through their `alias_target` instead.
pub fn strip_one_alias_layer(registry: &TypeRegistry, id: TypeId) -> Option<TypeId> {
    match registry.lookup(id) {
        Type::Alias(nk) => registry.alias_target_of(nk),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TypeRegistry;

    #[test]
    fn renders_reference_and_array_keys() {
        let mut reg = TypeRegistry::new();
        let int_ty = reg.builtins().int_any;
        let r = reg.intern(Type::Reference(int_ty, true));
        assert_eq!(render(&reg, r), "&mut int");

        let arr = reg.intern(Type::Array(int_ty));
        assert_eq!(render(&reg, arr), "[int]");

        let fixed = reg.intern(Type::ArrayFixed(int_ty, 4));
        assert_eq!(render(&reg, fixed), "[int; 4]");
    }

    #[test]
    fn renders_tuple_and_fn_keys() {
        let mut reg = TypeRegistry::new();
        let b = reg.builtins();
        let tup = reg.intern(Type::Tuple(vec![b.int_any, b.string]));
        assert_eq!(render(&reg, tup), "(int,string)");

        let f = reg.intern(Type::Fn {
            params: vec![b.int_any],
            result: b.bool,
        });
        assert_eq!(render(&reg, f), "fn(int)->bool");
    }

    #[test]
    fn renders_nominal_with_type_args() {
        let mut reg = TypeRegistry::new();
        let name = reg.intern_name("Box");
        let int_ty = reg.builtins().int_any;
        let boxed = reg.intern(Type::Struct(NominalKey {
            name,
            type_args: vec![int_ty],
        }));
        assert_eq!(render(&reg, boxed), "Box<int>");
    }
}
