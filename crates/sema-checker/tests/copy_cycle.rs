//! End-to-end: a `@copy` struct whose only field refers back to itself never bottoms
//! out in a Copy type, so it's a cyclic dependency, not a valid Copy type.

use sema_ast::builder::FileBuilder;
use sema_ast::item::{FieldDecl, StructDecl};
use sema_ast::Attribute;
use sema_checker::test_support::check;
use sema_common::{DiagnosticCode, Span};

#[test]
fn self_referential_copy_struct_is_a_cyclic_dependency() {
    let mut b = FileBuilder::new("copy_cycle");
    let scope = b.file.symbols.file_scope();

    let copy_attr = Attribute {
        name: b.atom("copy"),
        args: vec![],
        span: Span::DUMMY,
    };
    let attr_id = b.file.attrs.push(copy_attr);

    let a_name = b.atom("A");
    let self_ty = b.name_type("A");
    let field = FieldDecl {
        name: b.atom("next"),
        ty: self_ty,
        attrs: vec![],
        span: Span::DUMMY,
    };
    let decl = StructDecl {
        name: a_name,
        type_params: vec![],
        fields: vec![field],
        base: None,
        attrs: vec![attr_id],
        span: Span::DUMMY,
    };
    b.declare_struct(scope, "A", decl);

    let result = check(&b.file);
    assert!(result.diagnostics.iter().any(|d| d.code == DiagnosticCode::SemaAttrCopyCyclicDep));
}
