//! The `Checker` orchestrator (§2): wires C1 (`TypeRegistry`) through C8 together and
//! walks a `File`'s items/statements in source order, producing one `CheckResult`.

use crate::attrs::{AttrOwner, AttributeValidator, ValidatedAttrs};
use crate::borrow::{BorrowEngine, BorrowKind};
use crate::locks::{classify_method_name, infer_lock_kind, ConcurrencySummary, LockAnalyzer, LockKey, LockKind, LockMethodEffect, LockStmt};
use crate::options::CheckerOptions;
use crate::places::PlaceTable;
use crate::result::CheckResult;
use crate::tasks::TaskTracker;
use crate::typer::Typer;
use rustc_hash::FxHashMap;
use sema_ast::symbols::SymbolId;
use sema_ast::{
    Arg, DialectClassifier, Expr, ExprId, ExprKind, File, FnDecl, ItemId, ItemKind, NullClassifier, Pattern, StmtId, StmtKind, TypeExprId,
    TypeExprKind,
};
use sema_common::{Atom, Diagnostic, DiagnosticCode, Interner, Severity, Span};
use sema_types::{FieldInfo, FnInfo, NominalKey, Type, TypeId, TypeRegistry, UnionMemberInfo, UnionMemberKind as TyUnionMemberKind};

/// A resolved function signature, keyed by its plain name, for free-function call sites.
/// Free functions aren't overloaded the way methods are (§4.3 scopes overload resolution
/// to the method/operator namespace), so a name resolves to exactly one `FnEntry`.
#[derive(Clone, Debug)]
struct FnEntry {
    info: FnInfo,
}

pub struct Checker {
    pub registry: TypeRegistry,
    pub methods: sema_types::MethodIndex,
    pub attrs: AttributeValidator,
    pub locks: LockAnalyzer,
    pub places: PlaceTable,
    pub options: CheckerOptions,
    classifier: Box<dyn DialectClassifier>,
    /// registry-atom name -> resolved type, for nominal `TypeExpr` lookup.
    named_types: FxHashMap<Atom, TypeId>,
    free_fns: FxHashMap<Atom, FnEntry>,
}

impl Checker {
    pub fn new(options: CheckerOptions) -> Self {
        Checker {
            registry: TypeRegistry::new(),
            methods: sema_types::MethodIndex::new(),
            attrs: AttributeValidator::new(),
            locks: LockAnalyzer::new(),
            places: PlaceTable::new(),
            options,
            classifier: Box::new(NullClassifier),
            named_types: FxHashMap::default(),
            free_fns: FxHashMap::default(),
        }
    }

    pub fn with_classifier(options: CheckerOptions, classifier: Box<dyn DialectClassifier>) -> Self {
        let mut checker = Self::new(options);
        checker.classifier = classifier;
        checker
    }

    fn xname(&mut self, file_interner: &Interner, atom: Atom) -> Atom {
        self.registry.intern_name(file_interner.lookup(atom))
    }

    /// Check one file end to end: register nominal type shells, fill bodies, validate
    /// attributes, then type-check every function body in source order (§5 single-pass
    /// contract: a `Checker` processes exactly one file).
    pub fn check_file(&mut self, file: &File) -> CheckResult {
        let mut result = CheckResult::new();
        self.register_shells(file);
        self.fill_bodies(file, &mut result);
        self.register_fn_signatures(file, &mut result);
        self.check_constants(file, &mut result);

        if self.options.alien_hints {
            if let Some(classification) = self.classifier.classify() {
                if classification.is_confident() {
                    for hint in &classification.hints {
                        result.push_diagnostic(
                            Diagnostic::new(DiagnosticCode::SemaAlienSyntax, hint.span, hint.message.to_string())
                                .with_severity(Severity::Info),
                        );
                    }
                }
            }
        }

        for &item_id in &file.top_level {
            let Some(item) = file.items.get(item_id) else { continue };
            if let ItemKind::Fn(decl) = &item.kind {
                if let Some(body) = decl.body {
                    self.check_fn_body(file, item_id, decl, body, &mut result);
                }
            }
        }
        result
    }

    fn resolve_type_name(&self, name: &str) -> Option<TypeId> {
        let b = self.registry.builtins();
        Some(match name {
            "bool" => b.bool_,
            "string" => b.string,
            "nothing" => b.nothing,
            "unit" => b.unit,
            "int" => b.int_any,
            "uint" => b.uint_any,
            _ => return None,
        })
    }

    fn resolve_type_expr(&mut self, file: &File, id: TypeExprId) -> TypeId {
        use sema_types::{FloatWidth, IntWidth};
        let Some(texpr) = file.type_exprs.get(id) else {
            return self.registry.builtins().unknown;
        };
        match &texpr.kind {
            TypeExprKind::Unit => self.registry.builtins().unit,
            TypeExprKind::Name { name, args } => {
                let raw = file.interner.lookup(*name).to_string();
                if let Some(prim) = self.resolve_type_name(&raw) {
                    return prim;
                }
                match raw.as_str() {
                    "int8" => return self.registry.intern(Type::Int(IntWidth::W8)),
                    "int16" => return self.registry.intern(Type::Int(IntWidth::W16)),
                    "int32" => return self.registry.intern(Type::Int(IntWidth::W32)),
                    "int64" => return self.registry.intern(Type::Int(IntWidth::W64)),
                    "uint8" => return self.registry.intern(Type::UInt(IntWidth::W8)),
                    "uint16" => return self.registry.intern(Type::UInt(IntWidth::W16)),
                    "uint32" => return self.registry.intern(Type::UInt(IntWidth::W32)),
                    "uint64" => return self.registry.intern(Type::UInt(IntWidth::W64)),
                    "float16" => return self.registry.intern(Type::Float(FloatWidth::W16)),
                    "float32" => return self.registry.intern(Type::Float(FloatWidth::W32)),
                    "float64" => return self.registry.intern(Type::Float(FloatWidth::W64)),
                    _ => {}
                }
                let key = self.registry.intern_name(&raw);
                if let Some(&ty) = self.named_types.get(&key) {
                    if args.is_empty() {
                        return ty;
                    }
                }
                let resolved_args: Vec<TypeId> = args.iter().map(|a| self.resolve_type_expr(file, *a)).collect();
                self.registry.register_struct_instance(key, resolved_args)
            }
            TypeExprKind::Reference { inner, mutable } => {
                let inner_ty = self.resolve_type_expr(file, *inner);
                self.registry.intern(Type::Reference(inner_ty, *mutable))
            }
            TypeExprKind::Own(inner) => {
                let inner_ty = self.resolve_type_expr(file, *inner);
                self.registry.intern(Type::Own(inner_ty))
            }
            TypeExprKind::Pointer(inner) => {
                let inner_ty = self.resolve_type_expr(file, *inner);
                self.registry.intern(Type::Pointer(inner_ty))
            }
            TypeExprKind::Array(inner) => {
                let inner_ty = self.resolve_type_expr(file, *inner);
                self.registry.intern(Type::Array(inner_ty))
            }
            TypeExprKind::ArrayFixed { element, len } => {
                let inner_ty = self.resolve_type_expr(file, *element);
                self.registry.intern(Type::ArrayFixed(inner_ty, *len))
            }
            TypeExprKind::Tuple(elems) => {
                let tys: Vec<TypeId> = elems.iter().map(|e| self.resolve_type_expr(file, *e)).collect();
                self.registry.register_tuple(tys)
            }
            TypeExprKind::Fn { params, result } => {
                let param_tys: Vec<TypeId> = params.iter().map(|p| self.resolve_type_expr(file, *p)).collect();
                let result_ty = self.resolve_type_expr(file, *result);
                self.registry.intern(Type::Fn { params: param_tys, result: result_ty })
            }
            TypeExprKind::Task(inner) => {
                let inner_ty = self.resolve_type_expr(file, *inner);
                let name = self.registry.intern_name("Task");
                self.registry.register_struct_instance(name, vec![inner_ty])
            }
        }
    }

    fn register_shells(&mut self, file: &File) {
        for &item_id in &file.top_level {
            let Some(item) = file.items.get(item_id) else { continue };
            match &item.kind {
                ItemKind::Struct(decl) => {
                    let name = self.xname(&file.interner, decl.name);
                    let shell = self.registry.register_struct_instance(name, vec![]);
                    self.named_types.insert(name, shell);
                }
                ItemKind::Union(decl) => {
                    let name = self.xname(&file.interner, decl.name);
                    let shell = self.registry.register_union_instance(name, vec![]);
                    self.named_types.insert(name, shell);
                }
                _ => {}
            }
        }
    }

    fn fill_bodies(&mut self, file: &File, result: &mut CheckResult) {
        for &item_id in &file.top_level {
            let Some(item) = file.items.get(item_id) else { continue };
            match &item.kind {
                ItemKind::Struct(decl) => {
                    let name = self.xname(&file.interner, decl.name);
                    let shell = self.named_types[&name];
                    let mut fields = Vec::new();
                    for f in &decl.fields {
                        let field_name = self.xname(&file.interner, f.name);
                        let field_ty = self.resolve_type_expr(file, f.ty);
                        fields.push(FieldInfo { name: field_name, ty: field_ty, inherited: false });
                    }
                    let type_params: Vec<Atom> = decl.type_params.iter().map(|tp| self.xname(&file.interner, tp.name)).collect();
                    let base = decl.base.map(|b| {
                        let n = self.xname(&file.interner, b);
                        self.named_types.get(&n).copied().unwrap_or(self.registry.builtins().unknown)
                    });
                    self.registry.set_struct_fields(shell, type_params, fields, base);
                    self.validate_owner_attrs(file, AttrOwner(0, item_id.0), &decl.attrs, sema_ast::AttrTarget::Type, result);

                    let is_copy_attr = self.attrs.cached(AttrOwner(0, item_id.0)).map(|v| v.copy).unwrap_or(false);
                    if is_copy_attr {
                        match self.attrs.check_copy_cycle(&self.registry, shell) {
                            Ok(is_copy) => self.registry.mark_copy_type(shell, is_copy),
                            Err(span) => result.push_diagnostic(Diagnostic::new(
                                DiagnosticCode::SemaAttrCopyCyclicDep,
                                span,
                                "this @copy type's field graph is cyclic and never bottoms out in a Copy type".to_string(),
                            )),
                        }
                    }
                }
                ItemKind::Union(decl) => {
                    let name = self.xname(&file.interner, decl.name);
                    let shell = self.named_types[&name];
                    let mut members = Vec::new();
                    for m in &decl.members {
                        let (member_name, kind, payload_types) = match &m.kind {
                            sema_ast::UnionMemberKind::Tag { name, payload } => {
                                let n = self.xname(&file.interner, *name);
                                let payload_tys: Vec<TypeId> = payload.iter().map(|p| self.resolve_type_expr(file, *p)).collect();
                                (Some(n), TyUnionMemberKind::Tag { payload_count: payload_tys.len() as u32 }, payload_tys)
                            }
                            sema_ast::UnionMemberKind::Type(t) => {
                                let ty = self.resolve_type_expr(file, *t);
                                (None, TyUnionMemberKind::Type(ty), vec![])
                            }
                            sema_ast::UnionMemberKind::Nothing => (None, TyUnionMemberKind::Nothing, vec![]),
                        };
                        members.push(UnionMemberInfo { name: member_name, kind, payload_types });
                    }
                    let type_params: Vec<Atom> = decl.type_params.iter().map(|tp| self.xname(&file.interner, tp.name)).collect();
                    self.registry.set_union_members(shell, type_params, members);
                    self.validate_owner_attrs(file, AttrOwner(0, item_id.0), &decl.attrs, sema_ast::AttrTarget::Type, result);
                }
                ItemKind::Alias(decl) => {
                    let name = self.xname(&file.interner, decl.name);
                    let target_ty = self.resolve_type_expr(file, decl.target);
                    let alias_ty = self.registry.register_alias(name, vec![], target_ty);
                    self.named_types.insert(name, alias_ty);
                }
                _ => {}
            }
        }
    }

    fn validate_owner_attrs(
        &mut self,
        file: &File,
        owner: AttrOwner,
        attr_ids: &[sema_ast::AttrId],
        target: sema_ast::AttrTarget,
        result: &mut CheckResult,
    ) {
        let attr_list: Vec<sema_ast::Attribute> = attr_ids.iter().filter_map(|a| file.attrs.get(*a).cloned()).collect();
        let diags = self.attrs.validate(owner, &attr_list, target, &file.interner, &mut self.registry);
        for d in diags {
            result.push_diagnostic(d);
        }
    }

    fn register_fn_signatures(&mut self, file: &File, result: &mut CheckResult) {
        for &item_id in &file.top_level {
            let Some(item) = file.items.get(item_id) else { continue };
            let ItemKind::Fn(decl) = &item.kind else { continue };
            let symbol = self.xname(&file.interner, decl.name);
            let mut param_tys = Vec::new();
            let mut variadic = Vec::new();
            let mut allow_to = Vec::new();
            if let Some(receiver) = decl.receiver {
                let rty = self.resolve_type_expr(file, receiver);
                param_tys.push(rty);
                variadic.push(false);
                allow_to.push(false);
            }
            for &param_id in &decl.params {
                let Some(p) = file.params.get(param_id) else { continue };
                param_tys.push(self.resolve_type_expr(file, p.ty));
                variadic.push(p.variadic);
                allow_to.push(p.allow_to);
            }
            let result_ty = self.resolve_type_expr(file, decl.result);
            let info = FnInfo {
                param_keys: param_tys,
                variadic,
                allow_to,
                has_self: decl.receiver.is_some(),
                result: result_ty,
            };

            let name_raw = file.interner.lookup(decl.name);
            if name_raw == "__to" {
                if let Some(&receiver_ty) = info.param_keys.first() {
                    if !self.methods.insert_to(&self.registry, receiver_ty, info.result, info.clone(), symbol) {
                        result.push_diagnostic(Diagnostic::new(
                            DiagnosticCode::SemaTypeMismatch,
                            item.span,
                            "__to declaration has an invalid shape".to_string(),
                        ));
                    }
                }
            } else if decl.receiver.is_some() {
                let receiver_ty = info.param_keys[0];
                self.methods.insert(&self.registry, receiver_ty, name_raw, info.clone(), symbol);
            } else {
                self.free_fns.insert(symbol, FnEntry { info: info.clone() });
            }
            self.validate_owner_attrs(file, AttrOwner(1, item_id.0), &decl.attrs, sema_ast::AttrTarget::Fn, result);
        }
    }

    fn check_constants(&mut self, file: &File, result: &mut CheckResult) {
        for &item_id in &file.top_level {
            let Some(item) = file.items.get(item_id) else { continue };
            let ItemKind::Const(decl) = &item.kind else { continue };
            let declared_ty = decl.ty.map(|t| self.resolve_type_expr(file, t));
            let mut borrow = BorrowEngine::new();
            let mut tasks = TaskTracker::new();
            let mut typer = Typer::new(&mut self.registry, &self.methods);
            check_expr(
                file,
                &mut typer,
                &mut borrow,
                &mut tasks,
                &mut self.places,
                &self.free_fns,
                &self.named_types,
                decl.value,
                declared_ty,
                Atom(0),
            );
            let (types, callees, diags) = typer.into_parts();
            result.merge_typer(types, callees, diags);
        }
    }

    /// Receiver field -> lock kind, for building this function's `ConcurrencySummary`
    /// (§4.6 — the contract attributes name fields, the receiver's layout gives each
    /// named field its `Mutex`/`RwLock` kind).
    fn receiver_lock_fields(&mut self, file: &File, decl: &FnDecl) -> FxHashMap<Atom, LockKind> {
        let mut fields = FxHashMap::default();
        let Some(receiver) = decl.receiver else { return fields };
        let rty = self.resolve_type_expr(file, receiver);
        let base_ty = match self.registry.lookup(rty) {
            Type::Reference(inner, _) | Type::Own(inner) => *inner,
            _ => rty,
        };
        if let Some(info) = self.registry.struct_info(base_ty) {
            for field in &info.fields {
                if let Some(kind) = infer_lock_kind(&self.registry, field.ty) {
                    fields.insert(field.name, kind);
                }
            }
        }
        fields
    }

    fn check_fn_body(&mut self, file: &File, item_id: ItemId, decl: &FnDecl, body: StmtId, result: &mut CheckResult) {
        let mut borrow = BorrowEngine::new();
        let mut tasks = TaskTracker::new();
        let mut typer = Typer::new(&mut self.registry, &self.methods);
        let scope = Atom(0);
        check_stmt(
            file,
            &mut typer,
            &mut borrow,
            &mut tasks,
            &mut self.places,
            &self.free_fns,
            &self.named_types,
            body,
            scope,
        );
        let (types, callees, diags) = typer.into_parts();
        result.merge_typer(types, callees, diags);
        for event in borrow.events() {
            result.borrow_events.push(*event);
        }

        let receiver_fields = self.receiver_lock_fields(file, decl);
        let attrs = self.attrs.cached(AttrOwner(1, item_id.0)).cloned().unwrap_or_default();
        let contract = ConcurrencySummary::from_attrs(&attrs, &receiver_fields);
        let lowered = lower_lock_stmt(file, &mut self.registry, body);
        let (_, lock_diags) = self.locks.analyze(&[lowered], &contract, SymbolId(0));
        for d in lock_diags {
            result.push_diagnostic(d);
        }

        for d in tasks.check_scope_exit(&[SymbolId(0)]) {
            result.push_diagnostic(d);
        }
    }
}

fn check_stmt(
    file: &File,
    typer: &mut Typer,
    borrow: &mut BorrowEngine,
    tasks: &mut TaskTracker,
    places: &mut PlaceTable,
    free_fns: &FxHashMap<Atom, FnEntry>,
    named_types: &FxHashMap<Atom, TypeId>,
    id: StmtId,
    scope: Atom,
) {
    let Some(stmt) = file.stmts.get(id) else { return };
    match &stmt.kind {
        StmtKind::Let { init: Some(init_expr), .. } => {
            check_expr(file, typer, borrow, tasks, places, free_fns, named_types, *init_expr, None, scope);
        }
        StmtKind::Let { init: None, .. } => {}
        StmtKind::Expr(e) => {
            check_expr(file, typer, borrow, tasks, places, free_fns, named_types, *e, None, scope);
        }
        StmtKind::Assign { place, value } => {
            let value_ty = check_expr(file, typer, borrow, tasks, places, free_fns, named_types, *value, None, scope);
            check_expr(file, typer, borrow, tasks, places, free_fns, named_types, *place, Some(value_ty), scope);
        }
        StmtKind::Return(e) => {
            if let Some(expr) = e {
                check_expr(file, typer, borrow, tasks, places, free_fns, named_types, *expr, None, scope);
            }
        }
        StmtKind::Break | StmtKind::Continue => {}
        StmtKind::While { cond, body } => {
            let cond_ty = check_expr(file, typer, borrow, tasks, places, free_fns, named_types, *cond, None, scope);
            typer.check_boolean_context(cond_ty, stmt.span);
            check_stmt(file, typer, borrow, tasks, places, free_fns, named_types, *body, scope);
        }
        StmtKind::ForC { init, cond, step, body } => {
            if let Some(i) = init {
                check_stmt(file, typer, borrow, tasks, places, free_fns, named_types, *i, scope);
            }
            if let Some(c) = cond {
                let cond_ty = check_expr(file, typer, borrow, tasks, places, free_fns, named_types, *c, None, scope);
                typer.check_boolean_context(cond_ty, stmt.span);
            }
            check_stmt(file, typer, borrow, tasks, places, free_fns, named_types, *body, scope);
            if let Some(s) = step {
                check_stmt(file, typer, borrow, tasks, places, free_fns, named_types, *s, scope);
            }
        }
        StmtKind::Block(stmts) => {
            for &s in stmts {
                check_stmt(file, typer, borrow, tasks, places, free_fns, named_types, s, scope);
            }
        }
    }
}

/// Walk one expression, returning its resolved type. `expected` seeds literal
/// materialization and generic-result substitution; it is advisory, not enforced here
/// (a mismatch against it is the caller's job, e.g. `Assign`/`Let` checking the RHS
/// against a declared type).
fn check_expr(
    file: &File,
    typer: &mut Typer,
    borrow: &mut BorrowEngine,
    tasks: &mut TaskTracker,
    places: &mut PlaceTable,
    free_fns: &FxHashMap<Atom, FnEntry>,
    named_types: &FxHashMap<Atom, TypeId>,
    id: ExprId,
    expected: Option<TypeId>,
    scope: Atom,
) -> TypeId {
    let Some(expr) = file.exprs.get(id) else {
        return typer.registry.builtins().unknown;
    };
    let span = expr.span;
    match &expr.kind {
        ExprKind::IntLiteral(v) => typer.type_int_literal(id, *v, expected, span),
        ExprKind::FloatLiteral(_) => {
            let target = expected.unwrap_or(typer.registry.builtins().float64);
            match crate::literal::materialize_float_literal(typer.registry, target, span) {
                Ok(ty) => {
                    typer.set_type(id, ty);
                    ty
                }
                Err(_) => {
                    let f64_ty = typer.registry.builtins().float64;
                    typer.set_type(id, f64_ty);
                    f64_ty
                }
            }
        }
        ExprKind::StringLiteral(_) => {
            let ty = typer.registry.builtins().string;
            typer.set_type(id, ty);
            ty
        }
        ExprKind::BoolLiteral(_) => {
            let ty = typer.registry.builtins().bool_;
            typer.set_type(id, ty);
            ty
        }
        ExprKind::NothingLiteral => {
            let ty = typer.registry.builtins().nothing;
            typer.set_type(id, ty);
            ty
        }
        ExprKind::Ident(_) => {
            let ty = expected.unwrap_or(typer.registry.builtins().unknown);
            typer.set_type(id, ty);
            ty
        }
        ExprKind::ArrayLiteral(elems) => {
            let elem_expected = expected.and_then(|e| match typer.registry.lookup(e) {
                Type::Array(inner) => Some(*inner),
                _ => None,
            });
            let mut elem_ty = typer.registry.builtins().unknown;
            for &e in elems {
                elem_ty = check_expr(file, typer, borrow, tasks, places, free_fns, named_types, e, elem_expected, scope);
            }
            let arr = typer.registry.intern(Type::Array(elem_ty));
            typer.set_type(id, arr);
            arr
        }
        ExprKind::TupleLiteral(elems) => {
            let tys: Vec<TypeId> = elems
                .iter()
                .map(|&e| check_expr(file, typer, borrow, tasks, places, free_fns, named_types, e, None, scope))
                .collect();
            let tuple = typer.registry.register_tuple(tys);
            typer.set_type(id, tuple);
            tuple
        }
        ExprKind::StructLiteral { ty, fields } => {
            let struct_ty = resolve_type_expr_readonly(file, typer.registry, named_types, *ty);
            for (_, value) in fields {
                check_expr(file, typer, borrow, tasks, places, free_fns, named_types, *value, None, scope);
            }
            typer.set_type(id, struct_ty);
            struct_ty
        }
        ExprKind::Unary { op, operand } => {
            let operand_ty = check_expr(file, typer, borrow, tasks, places, free_fns, named_types, *operand, None, scope);
            typer.type_unary_op(id, *op, operand_ty, span)
        }
        ExprKind::Binary { op, lhs, rhs } => {
            let lhs_ty = check_expr(file, typer, borrow, tasks, places, free_fns, named_types, *lhs, None, scope);
            let rhs_expected = if crate::typer::is_unmaterialized_numeric(typer.registry, lhs_ty) { None } else { Some(lhs_ty) };
            let rhs_ty = check_expr(file, typer, borrow, tasks, places, free_fns, named_types, *rhs, rhs_expected, scope);
            typer.type_binary_op(id, *op, lhs_ty, rhs_ty, span)
        }
        ExprKind::Index { base, index } => {
            let base_ty = check_expr(file, typer, borrow, tasks, places, free_fns, named_types, *base, None, scope);
            let index_ty = check_expr(file, typer, borrow, tasks, places, free_fns, named_types, *index, None, scope);
            typer.type_method_call(id, sema_types::INDEX, base_ty, false, &[index_ty], span)
        }
        ExprKind::Member { base, field: _, span: _ } => {
            let base_ty = check_expr(file, typer, borrow, tasks, places, free_fns, named_types, *base, None, scope);
            let ty = expected.unwrap_or(base_ty);
            typer.set_type(id, ty);
            ty
        }
        ExprKind::Deref(inner) => {
            let inner_ty = check_expr(file, typer, borrow, tasks, places, free_fns, named_types, *inner, None, scope);
            let ty = match typer.registry.lookup(inner_ty) {
                Type::Pointer(p) | Type::Reference(p, _) => *p,
                _ => typer.registry.builtins().error,
            };
            typer.set_type(id, ty);
            ty
        }
        ExprKind::Ref { mutable, inner } => {
            let inner_ty = check_expr(file, typer, borrow, tasks, places, free_fns, named_types, *inner, None, scope);
            let ty = typer.registry.intern(Type::Reference(inner_ty, *mutable));
            let place = places.intern_base(SymbolId(0));
            let kind = if *mutable { BorrowKind::Mut } else { BorrowKind::Shared };
            let (_id, issue) = borrow.begin_borrow(span, kind, place, scope, None, |a, b| places.overlaps(a, b));
            if issue.is_some() {
                typer.push_diagnostic(Diagnostic::new(
                    DiagnosticCode::SemaBorrowConflict,
                    span,
                    "this borrow conflicts with another live borrow of the same place".to_string(),
                ));
                typer.set_type(id, typer.registry.builtins().error);
                return typer.registry.builtins().error;
            }
            typer.set_type(id, ty);
            ty
        }
        ExprKind::Call { callee, args } => check_call(file, typer, borrow, tasks, places, free_fns, named_types, id, *callee, args, span, scope),
        ExprKind::MethodCall { receiver, method, args, .. } => {
            let receiver_ty = check_expr(file, typer, borrow, tasks, places, free_fns, named_types, *receiver, None, scope);
            let method_name = file.interner.lookup(*method);
            if method_name == "await" {
                tasks.mark_awaited(SymbolId(0));
            }
            let arg_tys: Vec<TypeId> = args
                .iter()
                .map(|a| check_expr(file, typer, borrow, tasks, places, free_fns, named_types, a.value, None, scope))
                .collect();
            typer.type_method_call(id, method_name, receiver_ty, true, &arg_tys, span)
        }
        ExprKind::StaticCall { ty, method, args } => {
            let owner_ty = resolve_type_expr_readonly(file, typer.registry, named_types, *ty);
            let method_name = file.interner.lookup(*method);
            let arg_tys: Vec<TypeId> = args
                .iter()
                .map(|a| check_expr(file, typer, borrow, tasks, places, free_fns, named_types, a.value, None, scope))
                .collect();
            typer.type_method_call(id, method_name, owner_ty, false, &arg_tys, span)
        }
        ExprKind::Cast { expr: inner, ty } => {
            check_expr(file, typer, borrow, tasks, places, free_fns, named_types, *inner, None, scope);
            let target = resolve_type_expr_readonly(file, typer.registry, named_types, *ty);
            typer.set_type(id, target);
            target
        }
        ExprKind::Compare { subject, arms } => {
            let subject_ty = check_expr(file, typer, borrow, tasks, places, free_fns, named_types, *subject, None, scope);
            let mut arm_result = typer.registry.builtins().unknown;
            let mut pattern_spans = Vec::new();
            for arm in arms {
                if let Some(pattern) = &arm.pattern {
                    pattern_spans.push((xname_pattern(file, typer.registry, pattern), arm.span));
                }
                arm_result = check_expr(file, typer, borrow, tasks, places, free_fns, named_types, arm.result, None, scope);
            }
            typer.check_exhaustiveness(subject_ty, &pattern_spans, span);
            typer.set_type(id, arm_result);
            arm_result
        }
        ExprKind::Spawn(inner) => {
            check_expr(file, typer, borrow, tasks, places, free_fns, named_types, *inner, None, scope);
            tasks.birth(SymbolId(0), span);
            let inner_ty = typer.type_of(*inner).unwrap_or(typer.registry.builtins().unknown);
            let name = typer.registry.intern_name("Task");
            let task_ty = typer.registry.register_struct_instance(name, vec![inner_ty]);
            typer.set_type(id, task_ty);
            task_ty
        }
        ExprKind::Async(inner) => {
            let ty = check_expr(file, typer, borrow, tasks, places, free_fns, named_types, *inner, None, scope);
            typer.set_type(id, ty);
            ty
        }
        ExprKind::Await(inner) => {
            let task_ty = check_expr(file, typer, borrow, tasks, places, free_fns, named_types, *inner, None, scope);
            tasks.mark_awaited(SymbolId(0));
            let diags = tasks.check_await_point(span);
            for d in diags {
                typer.push_diagnostic(d);
            }
            let ty = match typer.registry.lookup(task_ty) {
                Type::Struct(NominalKey { type_args, .. }) if !type_args.is_empty() => type_args[0],
                _ => typer.registry.builtins().unknown,
            };
            typer.set_type(id, ty);
            ty
        }
        ExprKind::Select(arms) => {
            let mut result_ty = typer.registry.builtins().unit;
            for arm in arms {
                check_expr(file, typer, borrow, tasks, places, free_fns, named_types, arm.channel_op, None, scope);
                result_ty = check_expr(file, typer, borrow, tasks, places, free_fns, named_types, arm.body, None, scope);
            }
            typer.set_type(id, result_ty);
            result_ty
        }
        ExprKind::Race(exprs) => {
            let mut tys = Vec::new();
            for &e in exprs {
                tys.push(check_expr(file, typer, borrow, tasks, places, free_fns, named_types, e, None, scope));
            }
            let ty = tys.into_iter().next().unwrap_or(typer.registry.builtins().unit);
            typer.set_type(id, ty);
            ty
        }
        ExprKind::Range { start, end, inclusive: _ } => {
            if let Some(s) = start {
                check_expr(file, typer, borrow, tasks, places, free_fns, named_types, *s, None, scope);
            }
            if let Some(e) = end {
                check_expr(file, typer, borrow, tasks, places, free_fns, named_types, *e, None, scope);
            }
            let ty = typer.registry.builtins().unknown;
            typer.set_type(id, ty);
            ty
        }
        ExprKind::Block(stmts) => {
            for &s in stmts {
                check_stmt(file, typer, borrow, tasks, places, free_fns, named_types, s, scope);
            }
            let ty = typer.registry.builtins().unit;
            typer.set_type(id, ty);
            ty
        }
        ExprKind::If { cond, then_branch, else_branch } => {
            let cond_ty = check_expr(file, typer, borrow, tasks, places, free_fns, named_types, *cond, None, scope);
            typer.check_boolean_context(cond_ty, span);
            let then_ty = check_expr(file, typer, borrow, tasks, places, free_fns, named_types, *then_branch, None, scope);
            let ty = match else_branch {
                Some(e) => check_expr(file, typer, borrow, tasks, places, free_fns, named_types, *e, Some(then_ty), scope),
                None => typer.registry.builtins().unit,
            };
            typer.set_type(id, ty);
            ty
        }
        ExprKind::ItemRef(_) => {
            let ty = typer.registry.builtins().unknown;
            typer.set_type(id, ty);
            ty
        }
    }
}

/// Re-intern a pattern's tag name(s) from the file's AST atom space into the type
/// registry's private atom space, mirroring `Checker::xname`. `UnionMemberInfo::name`
/// is always a registry atom (set in `fill_bodies` via `xname`), so a `Pattern::Tag`
/// built from source text has to cross the same boundary before
/// `ExhaustivenessChecker::record_arm` can match it against a member by name.
fn xname_pattern(file: &File, registry: &mut TypeRegistry, pattern: &Pattern) -> Pattern {
    match pattern {
        Pattern::Tag { name, payload } => Pattern::Tag {
            name: registry.intern_name(file.interner.lookup(*name)),
            payload: payload.iter().map(|p| xname_pattern(file, registry, p)).collect(),
        },
        Pattern::Tuple(elems) => Pattern::Tuple(elems.iter().map(|p| xname_pattern(file, registry, p)).collect()),
        other => other.clone(),
    }
}

fn resolve_type_expr_readonly(file: &File, registry: &mut TypeRegistry, named_types: &FxHashMap<Atom, TypeId>, id: TypeExprId) -> TypeId {
    // Mirrors `Checker::resolve_type_expr`'s `Name` case for the common "just a nominal
    // reference" shape used at expression call sites, without threading a `&mut
    // Checker` through the expression walker. Consults `named_types` first so a name
    // that was declared as a union (or alias) doesn't silently resolve to an unrelated
    // struct shell sharing that name.
    let Some(texpr) = file.type_exprs.get(id) else {
        return registry.builtins().unknown;
    };
    match &texpr.kind {
        TypeExprKind::Name { name, .. } => {
            let raw = file.interner.lookup(*name);
            let key = registry.intern_name(raw);
            if let Some(&ty) = named_types.get(&key) {
                return ty;
            }
            registry.register_struct_instance(key, vec![])
        }
        _ => registry.builtins().unknown,
    }
}

fn check_call(
    file: &File,
    typer: &mut Typer,
    borrow: &mut BorrowEngine,
    tasks: &mut TaskTracker,
    places: &mut PlaceTable,
    free_fns: &FxHashMap<Atom, FnEntry>,
    named_types: &FxHashMap<Atom, TypeId>,
    call_expr: ExprId,
    callee: ExprId,
    args: &[Arg],
    span: Span,
    scope: Atom,
) -> TypeId {
    for arg in args {
        check_expr(file, typer, borrow, tasks, places, free_fns, named_types, arg.value, None, scope);
    }
    let ty = match file.exprs.get(callee) {
        Some(Expr { kind: ExprKind::Ident(name), .. }) => {
            let callee_name = file.interner.lookup(*name);
            let key = typer.registry.intern_name(callee_name);
            match free_fns.get(&key) {
                Some(entry) => entry.info.result,
                None => {
                    typer.push_diagnostic(Diagnostic::new(
                        DiagnosticCode::SemaNoOverload,
                        span,
                        format!("no function named `{callee_name}` is in scope"),
                    ));
                    typer.registry.builtins().error
                }
            }
        }
        _ => typer.registry.builtins().unknown,
    };
    typer.set_type(call_expr, ty);
    ty
}

/// Lower a statement body into the small control-flow shape `LockAnalyzer` walks
/// (§4.6). Only the lock-relevant operations — acquire/release method calls and
/// `if`/`while`/`for`/`return` control flow — are recognized; everything else collapses
/// to `LockStmt::Opaque`, per `locks.rs`'s documented scope for this lowering.
fn lower_lock_stmt(file: &File, registry: &mut TypeRegistry, id: StmtId) -> LockStmt {
    let Some(stmt) = file.stmts.get(id) else { return LockStmt::Opaque };
    match &stmt.kind {
        StmtKind::Block(stmts) => LockStmt::Seq(stmts.iter().map(|&s| lower_lock_stmt(file, registry, s)).collect()),
        StmtKind::Return(_) => LockStmt::Return { span: stmt.span },
        StmtKind::While { body, .. } => LockStmt::Loop { body: vec![lower_lock_stmt(file, registry, *body)] },
        StmtKind::ForC { body, .. } => LockStmt::Loop { body: vec![lower_lock_stmt(file, registry, *body)] },
        StmtKind::Expr(e) => lower_lock_expr(file, registry, *e, stmt.span),
        StmtKind::Let { init: Some(e), .. } => lower_lock_expr(file, registry, *e, stmt.span),
        _ => LockStmt::Opaque,
    }
}

fn lower_lock_expr(file: &File, registry: &mut TypeRegistry, id: ExprId, span: Span) -> LockStmt {
    let Some(expr) = file.exprs.get(id) else { return LockStmt::Opaque };
    match &expr.kind {
        ExprKind::MethodCall { receiver, method, .. } => {
            let Some(field_atom) = lock_field_of(file, *receiver) else { return LockStmt::Opaque };
            let field = registry.intern_name(file.interner.lookup(field_atom));
            let method_name = file.interner.lookup(*method);
            match classify_method_name(method_name) {
                Some(LockMethodEffect::Acquire(kind)) => LockStmt::Acquire {
                    key: LockKey { base: SymbolId(0), field, kind },
                    span,
                },
                Some(LockMethodEffect::Release) => LockStmt::Release { base: SymbolId(0), field, span },
                Some(LockMethodEffect::TryAcquire) => LockStmt::TryAcquire,
                None => LockStmt::Opaque,
            }
        }
        ExprKind::If { then_branch, else_branch, .. } => {
            let then_vec = flatten_lock_seq(lower_lock_expr(file, registry, *then_branch, span));
            let then_exits = matches!(then_vec.last(), Some(LockStmt::Return { .. }));
            let (else_vec, else_exits) = match else_branch {
                Some(e) => {
                    let v = flatten_lock_seq(lower_lock_expr(file, registry, *e, span));
                    let exits = matches!(v.last(), Some(LockStmt::Return { .. }));
                    (Some(v), exits)
                }
                None => (None, false),
            };
            LockStmt::If {
                then_branch: then_vec,
                then_exits,
                else_branch: else_vec,
                else_exits,
                span,
            }
        }
        ExprKind::Block(stmts) => LockStmt::Seq(stmts.iter().map(|&s| lower_lock_stmt(file, registry, s)).collect()),
        _ => LockStmt::Opaque,
    }
}

fn flatten_lock_seq(stmt: LockStmt) -> Vec<LockStmt> {
    match stmt {
        LockStmt::Seq(v) => v,
        other => vec![other],
    }
}

fn lock_field_of(file: &File, expr_id: ExprId) -> Option<Atom> {
    match file.exprs.get(expr_id).map(|e| &e.kind) {
        Some(ExprKind::Member { field, .. }) => Some(*field),
        _ => None,
    }
}
