//! End-to-end: a lock acquired on only one branch of an `if` is an imbalance.

use sema_ast::builder::FileBuilder;
use sema_ast::item::{FieldDecl, StructDecl};
use sema_ast::{ExprKind, StmtKind};
use sema_checker::test_support::check;
use sema_common::{DiagnosticCode, Span};

/// `struct Box { lock: Mutex }` plus a method `fn use_lock(&Box)` whose body is
/// `if true { self.lock.lock(); }` with no `else` and no matching release — the lock
/// analyzer should flag `SemaLockUnbalanced` at the join point.
fn build_file() -> sema_ast::File {
    let mut b = FileBuilder::new("lock_imbalance");
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
    let call_stmt = b.push_stmt(StmtKind::Expr(lock_call));
    let then_branch = b.push_expr(ExprKind::Block(vec![call_stmt]));

    let cond = b.push_expr(ExprKind::BoolLiteral(true));
    let if_expr = b.push_expr(ExprKind::If {
        cond,
        then_branch,
        else_branch: None,
    });
    let if_stmt = b.push_stmt(StmtKind::Expr(if_expr));
    let body = b.block(vec![if_stmt]);

    let result_ty = b.name_type("unit");
    b.declare_fn(scope, "use_lock", Some(receiver_ty), vec![], result_ty, Some(body), vec![]);
    b.file
}

#[test]
fn lock_held_on_only_one_branch_is_unbalanced() {
    let file = build_file();
    let result = check(&file);
    assert!(result.diagnostics.iter().any(|d| d.code == DiagnosticCode::SemaLockUnbalanced));
}
