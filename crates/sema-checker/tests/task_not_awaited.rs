//! End-to-end: a `spawn`ed task that is never awaited, returned, or passed before its
//! function body ends.

use sema_ast::builder::FileBuilder;
use sema_ast::{ExprKind, StmtKind};
use sema_checker::test_support::check;
use sema_common::DiagnosticCode;

#[test]
fn spawned_task_never_awaited_is_reported_at_scope_exit() {
    let mut b = FileBuilder::new("task_not_awaited");
    let scope = b.file.symbols.file_scope();

    let inner = b.int_literal(42);
    let spawn_expr = b.push_expr(ExprKind::Spawn(inner));
    let stmt = b.push_stmt(StmtKind::Expr(spawn_expr));
    let body = b.block(vec![stmt]);

    let result_ty = b.name_type("unit");
    b.declare_fn(scope, "fire_and_forget", None, vec![], result_ty, Some(body), vec![]);

    let result = check(&b.file);
    assert!(result.diagnostics.iter().any(|d| d.code == DiagnosticCode::SemaTaskNotAwaited));
}

#[test]
fn spawned_task_that_is_awaited_is_silent() {
    let mut b = FileBuilder::new("task_awaited");
    let scope = b.file.symbols.file_scope();

    let inner = b.int_literal(42);
    let spawn_expr = b.push_expr(ExprKind::Spawn(inner));
    let await_expr = b.push_expr(ExprKind::Await(spawn_expr));
    let stmt = b.push_stmt(StmtKind::Expr(await_expr));
    let body = b.block(vec![stmt]);

    let result_ty = b.name_type("unit");
    b.declare_fn(scope, "fire_and_wait", None, vec![], result_ty, Some(body), vec![]);

    let result = check(&b.file);
    assert!(!result.diagnostics.iter().any(|d| d.code == DiagnosticCode::SemaTaskNotAwaited));
}
