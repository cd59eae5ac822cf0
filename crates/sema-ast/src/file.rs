//! The whole-file AST store the checker walks (§6 "AST store").

use crate::attr::AttrArena;
use crate::expr::ExprArena;
use crate::ids::ItemId;
use crate::item::{ItemArena, ParamArena};
use crate::stmt::StmtArena;
use crate::symbols::SymbolTable;
use crate::type_expr::TypeExprArena;
use sema_common::Interner;

/// One parsed, indexed file: the arenas plus the pre-populated symbol table, as handed
/// to `sema_checker::Checker::check_file`. Construction (i.e. actually parsing source
/// text into these arenas) is the upstream front-end's job and out of scope here; see
/// `sema_ast::builder::FileBuilder` for the hand-assembly path tests use instead.
pub struct File {
    pub name: String,
    pub interner: Interner,
    pub exprs: ExprArena,
    pub stmts: StmtArena,
    pub items: ItemArena,
    pub type_exprs: TypeExprArena,
    pub attrs: AttrArena,
    pub params: ParamArena,
    pub symbols: SymbolTable,
    /// Top-level items in source order.
    pub top_level: Vec<ItemId>,
}

impl File {
    pub fn new(name: impl Into<String>) -> Self {
        File {
            name: name.into(),
            interner: Interner::new(),
            exprs: ExprArena::new(),
            stmts: StmtArena::new(),
            items: ItemArena::new(),
            type_exprs: TypeExprArena::new(),
            attrs: AttrArena::new(),
            params: ParamArena::new(),
            symbols: SymbolTable::new(),
            top_level: Vec::new(),
        }
    }
}
