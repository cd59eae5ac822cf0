//! End-to-end: a `compare` over a union subject whose arms don't cover every member.

use sema_ast::builder::FileBuilder;
use sema_ast::item::{UnionDecl, UnionMember, UnionMemberKind};
use sema_ast::{ExprKind, MatchArm, Pattern, StmtKind};
use sema_checker::test_support::check;
use sema_common::{DiagnosticCode, Span};

fn build_status_union(b: &mut FileBuilder, scope: sema_ast::symbols::ScopeId) {
    let ok_name = b.atom("Ok");
    let err_name = b.atom("Err");
    let decl = UnionDecl {
        name: b.atom("Status"),
        type_params: vec![],
        members: vec![
            UnionMember {
                kind: UnionMemberKind::Tag { name: ok_name, payload: vec![] },
                span: Span::DUMMY,
            },
            UnionMember {
                kind: UnionMemberKind::Tag { name: err_name, payload: vec![] },
                span: Span::DUMMY,
            },
        ],
        attrs: vec![],
        span: Span::DUMMY,
    };
    b.declare_union(scope, decl);
}

#[test]
fn compare_missing_a_union_member_is_nonexhaustive() {
    let mut b = FileBuilder::new("exhaustiveness_missing");
    let scope = b.file.symbols.file_scope();
    build_status_union(&mut b, scope);

    let status_ty = b.name_type("Status");
    let subject_inner = b.int_literal(0);
    let subject = b.push_expr(ExprKind::Cast { expr: subject_inner, ty: status_ty });

    let ok_name = b.atom("Ok");
    let arm_result = b.int_literal(1);
    let arm = MatchArm {
        pattern: Some(Pattern::Tag { name: ok_name, payload: vec![] }),
        guard: None,
        result: arm_result,
        span: Span::DUMMY,
    };
    let compare_expr = b.push_expr(ExprKind::Compare { subject, arms: vec![arm] });
    let stmt = b.push_stmt(StmtKind::Expr(compare_expr));
    let body = b.block(vec![stmt]);

    let result_ty = b.name_type("unit");
    b.declare_fn(scope, "handle", None, vec![], result_ty, Some(body), vec![]);

    let result = check(&b.file);
    assert!(result.diagnostics.iter().any(|d| d.code == DiagnosticCode::SemaNonexhaustiveMatch));
}

#[test]
fn compare_covering_every_union_member_is_silent() {
    let mut b = FileBuilder::new("exhaustiveness_covered");
    let scope = b.file.symbols.file_scope();
    build_status_union(&mut b, scope);

    let status_ty = b.name_type("Status");
    let subject_inner = b.int_literal(0);
    let subject = b.push_expr(ExprKind::Cast { expr: subject_inner, ty: status_ty });

    let ok_name = b.atom("Ok");
    let err_name = b.atom("Err");
    let ok_result = b.int_literal(1);
    let err_result = b.int_literal(2);
    let ok_arm = MatchArm {
        pattern: Some(Pattern::Tag { name: ok_name, payload: vec![] }),
        guard: None,
        result: ok_result,
        span: Span::DUMMY,
    };
    let err_arm = MatchArm {
        pattern: Some(Pattern::Tag { name: err_name, payload: vec![] }),
        guard: None,
        result: err_result,
        span: Span::DUMMY,
    };
    let compare_expr = b.push_expr(ExprKind::Compare { subject, arms: vec![ok_arm, err_arm] });
    let stmt = b.push_stmt(StmtKind::Expr(compare_expr));
    let body = b.block(vec![stmt]);

    let result_ty = b.name_type("unit");
    b.declare_fn(scope, "handle", None, vec![], result_ty, Some(body), vec![]);

    let result = check(&b.file);
    assert!(!result.diagnostics.iter().any(|d| d.code == DiagnosticCode::SemaNonexhaustiveMatch));
}
