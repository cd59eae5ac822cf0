//! Attribute Validator (C5, §4.5): parses/validates declarative attributes and caches
//! the validated record per declaration so later passes (deprecation at usage sites,
//! lock-kind inference, copy/send recursion) can query it without re-parsing.

use rustc_hash::FxHashMap;
use sema_ast::{AttrArg, AttrTarget, Attribute};
use sema_common::limits::MAX_ATTRIBUTE_RECURSION;
use sema_common::{Atom, Diagnostic, DiagnosticCode, Interner, Severity, Span};
use sema_types::{StructInfo, Type, TypeId, TypeRegistry};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    Cpu,
    Gpu,
    Tpu,
    Wasm,
    Native,
}

fn known_backend(name: &str) -> Option<Backend> {
    match name {
        "cpu" => Some(Backend::Cpu),
        "gpu" => Some(Backend::Gpu),
        "tpu" => Some(Backend::Tpu),
        "wasm" => Some(Backend::Wasm),
        "native" => Some(Backend::Native),
        _ => None,
    }
}

/// The fully-parsed, validated attribute set for one declaration. Unset fields mean the
/// attribute was absent, not that it was rejected. Field-name arguments (`guarded_by`,
/// the lock-contract attributes, `waits_on`) are re-interned into the type registry's
/// atom space so they compare equal to `FieldInfo::name` (see `TypeRegistry::intern_name`
/// for why the two interners are kept separate).
#[derive(Clone, Debug, Default)]
pub struct ValidatedAttrs {
    pub align: Option<u32>,
    pub packed: bool,
    pub sealed: bool,
    pub no_inherit: bool,
    pub copy: bool,
    /// `Some(true)` = `@send`, `Some(false)` = `@nosend`.
    pub send: Option<bool>,
    pub readonly: bool,
    pub atomic: bool,
    pub guarded_by: Option<Atom>,
    pub requires_lock: Vec<Atom>,
    pub acquires_lock: Vec<Atom>,
    pub releases_lock: Vec<Atom>,
    pub nonblocking: bool,
    pub waits_on: Vec<Atom>,
    pub backend: Option<Backend>,
    pub deprecated: Option<Option<String>>,
    pub intrinsic: bool,
    pub raii: bool,
}

/// Opaque key for the per-declaration attribute cache; the checker hands in whichever
/// arena id (`ItemId`, `FieldId`, `ParamId`, a synthetic let-binding id) identifies the
/// declaration, packed with a tag so the spaces never collide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AttrOwner(pub u8, pub u32);

#[derive(Default)]
pub struct AttributeValidator {
    cache: FxHashMap<AttrOwner, ValidatedAttrs>,
}

fn str_arg(args: &[AttrArg], ast_interner: &Interner) -> Option<String> {
    args.iter().find_map(|a| match a {
        AttrArg::Str(atom) | AttrArg::Ident(atom) => Some(ast_interner.lookup(*atom).to_string()),
        AttrArg::Int(_) => None,
    })
}

fn int_arg(args: &[AttrArg]) -> Option<i64> {
    args.iter().find_map(|a| match a {
        AttrArg::Int(n) => Some(*n),
        _ => None,
    })
}

impl AttributeValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cached(&self, owner: AttrOwner) -> Option<&ValidatedAttrs> {
        self.cache.get(&owner)
    }

    /// Validate one declaration's attribute list for `target`, caching and returning the
    /// parsed record plus any diagnostics. Unknown names are a warning; a recognized
    /// name used on the wrong target is an error (§4.5 "Unknown names produce a
    /// warning; wrong target, an error"). `ast_interner` resolves attribute names and
    /// string arguments as written in source; `registry` re-interns field-name
    /// arguments into the type registry's atom space.
    pub fn validate(
        &mut self,
        owner: AttrOwner,
        attrs: &[Attribute],
        target: AttrTarget,
        ast_interner: &Interner,
        registry: &mut TypeRegistry,
    ) -> Vec<Diagnostic> {
        let mut out = ValidatedAttrs::default();
        let mut diags = Vec::new();

        for attr in attrs {
            let name = ast_interner.lookup(attr.name);
            match name {
                "align" => {
                    if !matches!(target, AttrTarget::Type | AttrTarget::Field) {
                        diags.push(wrong_target(attr.span, "align"));
                        continue;
                    }
                    match int_arg(&attr.args) {
                        Some(n) if n > 0 && (n as u64).is_power_of_two() => out.align = Some(n as u32),
                        _ => diags.push(Diagnostic::new(
                            DiagnosticCode::SemaAttrAlignNotPowerOfTwo,
                            attr.span,
                            "@align requires a positive power-of-two integer".to_string(),
                        )),
                    }
                }
                "packed" => {
                    if target != AttrTarget::Type {
                        diags.push(wrong_target(attr.span, "packed"));
                        continue;
                    }
                    out.packed = true;
                }
                "sealed" => {
                    if target != AttrTarget::Type {
                        diags.push(wrong_target(attr.span, "sealed"));
                        continue;
                    }
                    out.sealed = true;
                }
                "noinherit" => {
                    if !matches!(target, AttrTarget::Type | AttrTarget::Field) {
                        diags.push(wrong_target(attr.span, "noinherit"));
                        continue;
                    }
                    out.no_inherit = true;
                }
                "copy" => {
                    if target != AttrTarget::Type {
                        diags.push(wrong_target(attr.span, "copy"));
                        continue;
                    }
                    out.copy = true;
                }
                "send" => {
                    if target != AttrTarget::Type {
                        diags.push(wrong_target(attr.span, "send"));
                        continue;
                    }
                    out.send = Some(true);
                }
                "nosend" => {
                    if target != AttrTarget::Type {
                        diags.push(wrong_target(attr.span, "nosend"));
                        continue;
                    }
                    out.send = Some(false);
                }
                "readonly" => {
                    if target != AttrTarget::Field {
                        diags.push(wrong_target(attr.span, "readonly"));
                        continue;
                    }
                    out.readonly = true;
                }
                "atomic" => {
                    if target != AttrTarget::Field {
                        diags.push(wrong_target(attr.span, "atomic"));
                        continue;
                    }
                    out.atomic = true;
                }
                "guarded_by" => {
                    if target != AttrTarget::Field {
                        diags.push(wrong_target(attr.span, "guarded_by"));
                        continue;
                    }
                    if let Some(field) = str_arg(&attr.args, ast_interner) {
                        out.guarded_by = Some(registry.intern_name(&field));
                    }
                }
                "requires_lock" => {
                    if target != AttrTarget::Fn {
                        diags.push(wrong_target(attr.span, "requires_lock"));
                        continue;
                    }
                    if let Some(field) = str_arg(&attr.args, ast_interner) {
                        out.requires_lock.push(registry.intern_name(&field));
                    }
                }
                "acquires_lock" => {
                    if target != AttrTarget::Fn {
                        diags.push(wrong_target(attr.span, "acquires_lock"));
                        continue;
                    }
                    if let Some(field) = str_arg(&attr.args, ast_interner) {
                        out.acquires_lock.push(registry.intern_name(&field));
                    }
                }
                "releases_lock" => {
                    if target != AttrTarget::Fn {
                        diags.push(wrong_target(attr.span, "releases_lock"));
                        continue;
                    }
                    if let Some(field) = str_arg(&attr.args, ast_interner) {
                        out.releases_lock.push(registry.intern_name(&field));
                    }
                }
                "nonblocking" => {
                    if target != AttrTarget::Fn {
                        diags.push(wrong_target(attr.span, "nonblocking"));
                        continue;
                    }
                    out.nonblocking = true;
                }
                "waits_on" => {
                    if target != AttrTarget::Fn {
                        diags.push(wrong_target(attr.span, "waits_on"));
                        continue;
                    }
                    if let Some(field) = str_arg(&attr.args, ast_interner) {
                        out.waits_on.push(registry.intern_name(&field));
                    }
                }
                "backend" => {
                    if target != AttrTarget::Fn {
                        diags.push(wrong_target(attr.span, "backend"));
                        continue;
                    }
                    match str_arg(&attr.args, ast_interner).as_deref().and_then(known_backend) {
                        Some(b) => out.backend = Some(b),
                        None => diags.push(
                            Diagnostic::new(
                                DiagnosticCode::SemaAttrBadBackendTarget,
                                attr.span,
                                "@backend target is not recognized".to_string(),
                            )
                            .with_severity(Severity::Warning),
                        ),
                    }
                }
                "deprecated" => {
                    out.deprecated = Some(str_arg(&attr.args, ast_interner));
                }
                "intrinsic" => {
                    if target != AttrTarget::Type {
                        diags.push(wrong_target(attr.span, "intrinsic"));
                        continue;
                    }
                    out.intrinsic = true;
                }
                "raii" => {
                    if target != AttrTarget::Type {
                        diags.push(wrong_target(attr.span, "raii"));
                        continue;
                    }
                    out.raii = true;
                }
                other => diags.push(
                    Diagnostic::new(
                        DiagnosticCode::SemaUnknownAttribute,
                        attr.span,
                        format!("unknown attribute `@{other}`"),
                    )
                    .with_severity(Severity::Warning),
                ),
            }
        }

        if out.packed && out.align.is_some() {
            diags.push(Diagnostic::new(
                DiagnosticCode::SemaAttrConflict,
                Span::DUMMY,
                "@packed conflicts with @align on the same declaration".to_string(),
            ));
        }
        if out.nonblocking && !out.waits_on.is_empty() {
            diags.push(Diagnostic::new(
                DiagnosticCode::SemaAttrConflict,
                Span::DUMMY,
                "@nonblocking conflicts with @waits_on on the same function".to_string(),
            ));
        }

        self.cache.insert(owner, out.clone());
        diags
    }

    /// Recursively check whether a `@copy`-attributed type's fields are all `Copy`,
    /// rejecting cycles (a struct field referring back to itself through only @copy
    /// types never bottoms out). Bounded by `MAX_ATTRIBUTE_RECURSION` as a hard
    /// backstop against a malformed type graph.
    pub fn check_copy_cycle(&self, registry: &TypeRegistry, root: TypeId) -> Result<bool, Span> {
        let mut visiting = Vec::new();
        self.copy_walk(registry, root, &mut visiting, 0)
    }

    fn copy_walk(
        &self,
        registry: &TypeRegistry,
        id: TypeId,
        visiting: &mut Vec<TypeId>,
        depth: u32,
    ) -> Result<bool, Span> {
        if depth > MAX_ATTRIBUTE_RECURSION {
            return Ok(false);
        }
        if visiting.contains(&id) {
            return Err(Span::DUMMY);
        }
        if registry.is_copy(id) {
            return Ok(true);
        }
        let Some(info) = registry.struct_info(id) else {
            return Ok(false);
        };
        visiting.push(id);
        let result = self.copy_fields(registry, info, visiting, depth);
        visiting.pop();
        result
    }

    fn copy_fields(
        &self,
        registry: &TypeRegistry,
        info: &StructInfo,
        visiting: &mut Vec<TypeId>,
        depth: u32,
    ) -> Result<bool, Span> {
        for field in &info.fields {
            match registry.lookup(field.ty) {
                Type::Struct(_) => {
                    if !self.copy_walk(registry, field.ty, visiting, depth + 1)? {
                        return Ok(false);
                    }
                }
                _ if registry.is_copy(field.ty) => {}
                _ => return Ok(false),
            }
        }
        Ok(true)
    }
}

fn wrong_target(span: Span, name: &str) -> Diagnostic {
    Diagnostic::new(
        DiagnosticCode::SemaAttrWrongTarget,
        span,
        format!("@{name} is not valid on this kind of declaration"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_power_of_two_is_accepted() {
        let mut registry = TypeRegistry::new();
        let mut ast_interner = Interner::new();
        let name = ast_interner.intern("align");
        let mut validator = AttributeValidator::new();
        let attr = Attribute {
            name,
            args: vec![AttrArg::Int(8)],
            span: Span::DUMMY,
        };
        let diags = validator.validate(AttrOwner(0, 0), &[attr], AttrTarget::Type, &ast_interner, &mut registry);
        assert!(diags.is_empty());
        assert_eq!(validator.cached(AttrOwner(0, 0)).unwrap().align, Some(8));
    }

    #[test]
    fn align_non_power_of_two_is_rejected() {
        let mut registry = TypeRegistry::new();
        let mut ast_interner = Interner::new();
        let name = ast_interner.intern("align");
        let mut validator = AttributeValidator::new();
        let attr = Attribute {
            name,
            args: vec![AttrArg::Int(3)],
            span: Span::DUMMY,
        };
        let diags = validator.validate(AttrOwner(0, 1), &[attr], AttrTarget::Type, &ast_interner, &mut registry);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, DiagnosticCode::SemaAttrAlignNotPowerOfTwo);
    }

    #[test]
    fn wrong_target_is_an_error() {
        let mut registry = TypeRegistry::new();
        let mut ast_interner = Interner::new();
        let name = ast_interner.intern("readonly");
        let mut validator = AttributeValidator::new();
        let attr = Attribute {
            name,
            args: vec![],
            span: Span::DUMMY,
        };
        let diags = validator.validate(AttrOwner(0, 2), &[attr], AttrTarget::Type, &ast_interner, &mut registry);
        assert_eq!(diags[0].code, DiagnosticCode::SemaAttrWrongTarget);
    }

    #[test]
    fn unknown_attribute_is_a_warning() {
        let mut registry = TypeRegistry::new();
        let mut ast_interner = Interner::new();
        let name = ast_interner.intern("frobnicate");
        let mut validator = AttributeValidator::new();
        let attr = Attribute {
            name,
            args: vec![],
            span: Span::DUMMY,
        };
        let diags = validator.validate(AttrOwner(0, 3), &[attr], AttrTarget::Type, &ast_interner, &mut registry);
        assert_eq!(diags[0].code, DiagnosticCode::SemaUnknownAttribute);
        assert_eq!(diags[0].severity, Severity::Warning);
    }
}
