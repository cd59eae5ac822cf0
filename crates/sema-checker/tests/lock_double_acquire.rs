//! End-to-end: acquiring the same lock twice in sequence with no release between.

use sema_ast::builder::FileBuilder;
use sema_ast::item::{FieldDecl, StructDecl};
use sema_ast::{ExprKind, StmtKind};
use sema_checker::test_support::check;
use sema_common::{DiagnosticCode, Span};

fn lock_call_stmt(b: &mut FileBuilder, lock_field: sema_common::Atom) -> sema_ast::StmtId {
    let self_expr = b.ident_expr("self");
    let member = b.push_expr(ExprKind::Member {
        base: self_expr,
        field: lock_field,
        span: Span::DUMMY,
    });
    let lock_call = b.push_expr(ExprKind::MethodCall {
        receiver: member,
        method: b.atom("lock"),
        method_span: Span::DUMMY,
        args: vec![],
        explicit_type_args: vec![],
    });
    b.push_stmt(StmtKind::Expr(lock_call))
}

#[test]
fn acquiring_a_held_lock_again_is_a_double_acquire() {
    let mut b = FileBuilder::new("lock_double_acquire");
    let scope = b.file.symbols.file_scope();

    let lock_field = b.atom("lock");
    let mutex_ty = b.name_type("Mutex");
    let field = FieldDecl {
        name: lock_field,
        ty: mutex_ty,
        attrs: vec![],
        span: Span::DUMMY,
    };
    let box_decl = StructDecl {
        name: b.atom("Box"),
        type_params: vec![],
        fields: vec![field],
        base: None,
        attrs: vec![],
        span: Span::DUMMY,
    };
    b.declare_struct(scope, "Box", box_decl);

    let box_ty = b.name_type("Box");
    let receiver_ty = b.reference_type(box_ty, false);

    let first = lock_call_stmt(&mut b, lock_field);
    let second = lock_call_stmt(&mut b, lock_field);
    let body = b.block(vec![first, second]);

    let result_ty = b.name_type("unit");
    b.declare_fn(scope, "use_lock", Some(receiver_ty), vec![], result_ty, Some(body), vec![]);

    let result = check(&b.file);
    assert!(result.diagnostics.iter().any(|d| d.code == DiagnosticCode::SemaLockDoubleAcquire));
}
