//! Hand-assembly helpers for building a `File` without a real parser.
//!
//! There is no lexer/parser in scope for this crate (§1); tests build fixture files
//! directly against the arenas instead, mirroring the teacher's `test_fixtures.rs`
//! helpers that construct a `NodeArena` by hand rather than invoking the scanner.

use crate::expr::{Expr, ExprKind};
use crate::file::File;
use crate::ids::{AttrId, ExprId, ItemId, ParamId, StmtId, TypeExprId};
use crate::item::{FnDecl, Item, ItemKind, ParamDecl, StructDecl, TypeParam, UnionDecl};
use crate::stmt::{Stmt, StmtKind};
use crate::symbols::{ScopeId, Symbol, SymbolDecl, SymbolFlags, SymbolId, SymbolKind};
use crate::type_expr::{TypeExpr, TypeExprKind};
use sema_common::{Atom, Span};

/// Thin builder wrapping a `File`, offering span-free convenience constructors for
/// tests. Every method returns the id of what it pushed so callers can compose larger
/// expressions.
pub struct FileBuilder {
    pub file: File,
    next_span: u32,
}

impl FileBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        FileBuilder {
            file: File::new(name),
            next_span: 0,
        }
    }

    fn span(&mut self) -> Span {
        let start = self.next_span;
        self.next_span += 1;
        Span::new(start, start + 1)
    }

    pub fn atom(&mut self, s: &str) -> Atom {
        self.file.interner.intern(s)
    }

    pub fn name_type(&mut self, name: &str) -> TypeExprId {
        let name = self.atom(name);
        let span = self.span();
        self.file.type_exprs.push(TypeExpr {
            kind: TypeExprKind::Name { name, args: vec![] },
            span,
        })
    }

    pub fn reference_type(&mut self, inner: TypeExprId, mutable: bool) -> TypeExprId {
        let span = self.span();
        self.file
            .type_exprs
            .push(TypeExpr { kind: TypeExprKind::Reference { inner, mutable }, span })
    }

    pub fn ident_expr(&mut self, name: &str) -> ExprId {
        let name = self.atom(name);
        let span = self.span();
        self.file
            .exprs
            .push(Expr { kind: ExprKind::Ident(name), span })
    }

    pub fn int_literal(&mut self, value: i128) -> ExprId {
        let span = self.span();
        self.file
            .exprs
            .push(Expr { kind: ExprKind::IntLiteral(value), span })
    }

    pub fn push_expr(&mut self, kind: ExprKind) -> ExprId {
        let span = self.span();
        self.file.exprs.push(Expr { kind, span })
    }

    pub fn push_stmt(&mut self, kind: StmtKind) -> StmtId {
        let span = self.span();
        self.file.stmts.push(Stmt { kind, span })
    }

    pub fn let_stmt(
        &mut self,
        name: &str,
        mutable: bool,
        init: Option<ExprId>,
    ) -> (StmtId, Atom) {
        let atom = self.atom(name);
        let span = self.span();
        let id = self.file.stmts.push(Stmt {
            kind: StmtKind::Let {
                name: atom,
                mutable,
                declared_type: None,
                init,
            },
            span,
        });
        (id, atom)
    }

    pub fn block(&mut self, stmts: Vec<StmtId>) -> StmtId {
        let span = self.span();
        self.file.stmts.push(Stmt { kind: StmtKind::Block(stmts), span })
    }

    pub fn param(&mut self, name: &str, ty: TypeExprId) -> ParamId {
        let name = self.atom(name);
        let span = self.span();
        self.file.params.push(ParamDecl {
            name,
            ty,
            variadic: false,
            allow_to: true,
            attrs: vec![],
            span,
        })
    }

    pub fn declare_fn(
        &mut self,
        scope: ScopeId,
        name: &str,
        receiver: Option<TypeExprId>,
        params: Vec<ParamId>,
        result: TypeExprId,
        body: Option<StmtId>,
        attrs: Vec<AttrId>,
    ) -> (ItemId, SymbolId) {
        let atom = self.atom(name);
        let span = self.span();
        let decl = FnDecl {
            name: atom,
            type_params: vec![],
            receiver,
            params,
            result,
            body,
            attrs,
            span,
        };
        let item_id = self.file.items.push(Item { kind: ItemKind::Fn(decl), span });
        self.file.top_level.push(item_id);
        let sym = self.file.symbols.declare(
            scope,
            Symbol {
                name: atom,
                kind: SymbolKind::Function,
                scope,
                decl: SymbolDecl::Item(item_id),
                flags: SymbolFlags::empty(),
                receiver_key: None,
                span,
            },
        );
        (item_id, sym)
    }

    pub fn declare_struct(
        &mut self,
        scope: ScopeId,
        name: &str,
        decl: StructDecl,
    ) -> (ItemId, SymbolId) {
        let atom = decl.name;
        let span = decl.span;
        let item_id = self.file.items.push(Item { kind: ItemKind::Struct(decl), span });
        self.file.top_level.push(item_id);
        let sym = self.file.symbols.declare(
            scope,
            Symbol {
                name: atom,
                kind: SymbolKind::Type,
                scope,
                decl: SymbolDecl::Item(item_id),
                flags: SymbolFlags::empty(),
                receiver_key: None,
                span,
            },
        );
        let _ = name;
        (item_id, sym)
    }

    pub fn declare_union(
        &mut self,
        scope: ScopeId,
        decl: UnionDecl,
    ) -> (ItemId, SymbolId) {
        let atom = decl.name;
        let span = decl.span;
        let item_id = self.file.items.push(Item { kind: ItemKind::Union(decl), span });
        self.file.top_level.push(item_id);
        let sym = self.file.symbols.declare(
            scope,
            Symbol {
                name: atom,
                kind: SymbolKind::Type,
                scope,
                decl: SymbolDecl::Item(item_id),
                flags: SymbolFlags::empty(),
                receiver_key: None,
                span,
            },
        );
        (item_id, sym)
    }

    pub fn type_param(&mut self, name: &str) -> TypeParam {
        TypeParam {
            name: self.atom(name),
            bounds: vec![],
        }
    }
}
