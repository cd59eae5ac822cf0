//! AST/IR arenas, symbol table, and dialect-classifier interface consumed by the
//! semantic analysis core (§6 "External interfaces").
//!
//! This crate models the upstream front-end's *output* — it defines no lexer or
//! parser. Real source text is turned into a `File` by a front-end outside this
//! workspace's scope; `builder::FileBuilder` is the hand-assembly path tests use
//! instead.

pub mod arena;
pub mod attr;
pub mod builder;
pub mod dialect;
pub mod expr;
pub mod file;
pub mod ids;
pub mod item;
pub mod stmt;
pub mod symbols;
pub mod type_expr;

pub use attr::{AttrArena, AttrArg, AttrTarget, Attribute};
pub use dialect::{Dialect, DialectClassification, DialectClassifier, DialectHint, NullClassifier};
pub use expr::{Arg, BinaryOp, Expr, ExprArena, ExprKind, MatchArm, Pattern, SelectArm, UnaryOp};
pub use file::File;
pub use ids::{AttrId, ExprId, FieldId, ItemId, ParamId, StmtId, TypeExprId};
pub use item::{
    AliasDecl, ConstDecl, FieldDecl, FnDecl, Item, ItemArena, ItemKind, ParamArena, ParamDecl,
    StructDecl, TypeParam, UnionDecl, UnionMember, UnionMemberKind,
};
pub use stmt::{Stmt, StmtArena, StmtKind};
pub use symbols::{Scope, ScopeId, Symbol, SymbolDecl, SymbolFlags, SymbolId, SymbolKind, SymbolTable};
pub use type_expr::{TypeExpr, TypeExprArena, TypeExprKind};
