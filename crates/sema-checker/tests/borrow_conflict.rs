//! End-to-end: two live `&mut` borrows over the same place inside one function body.

use sema_ast::builder::FileBuilder;
use sema_ast::ExprKind;
use sema_checker::test_support::check;
use sema_common::DiagnosticCode;

#[test]
fn second_mut_borrow_of_a_live_place_is_a_conflict() {
    let mut b = FileBuilder::new("borrow_conflict");
    let scope = b.file.symbols.file_scope();

    let x = b.ident_expr("x");
    let first_ref = b.push_expr(ExprKind::Ref { mutable: true, inner: x });
    let first_stmt = b.push_stmt(sema_ast::StmtKind::Expr(first_ref));

    let second_ref = b.push_expr(ExprKind::Ref { mutable: true, inner: x });
    let second_stmt = b.push_stmt(sema_ast::StmtKind::Expr(second_ref));

    let body = b.block(vec![first_stmt, second_stmt]);
    let result_ty = b.name_type("unit");
    b.declare_fn(scope, "f", None, vec![], result_ty, Some(body), vec![]);

    let result = check(&b.file);
    assert!(result.diagnostics.iter().any(|d| d.code == DiagnosticCode::SemaBorrowConflict));
}

#[test]
fn two_shared_borrows_of_the_same_place_are_silent() {
    let mut b = FileBuilder::new("borrow_shared_ok");
    let scope = b.file.symbols.file_scope();

    let x = b.ident_expr("x");
    let first_ref = b.push_expr(ExprKind::Ref { mutable: false, inner: x });
    let first_stmt = b.push_stmt(sema_ast::StmtKind::Expr(first_ref));

    let second_ref = b.push_expr(ExprKind::Ref { mutable: false, inner: x });
    let second_stmt = b.push_stmt(sema_ast::StmtKind::Expr(second_ref));

    let body = b.block(vec![first_stmt, second_stmt]);
    let result_ty = b.name_type("unit");
    b.declare_fn(scope, "f", None, vec![], result_ty, Some(body), vec![]);

    let result = check(&b.file);
    assert!(!result.diagnostics.iter().any(|d| d.code == DiagnosticCode::SemaBorrowConflict));
}
