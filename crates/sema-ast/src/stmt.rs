//! Statement records.

use crate::ids::{ExprId, StmtId, TypeExprId};
use sema_common::{Atom, Span};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StmtKind {
    Let {
        name: Atom,
        mutable: bool,
        declared_type: Option<TypeExprId>,
        init: Option<ExprId>,
    },
    /// An expression in statement position (includes bare calls and assignments —
    /// assignment is modeled as a statement since it is never itself a value in this
    /// language).
    Expr(ExprId),
    Assign {
        place: ExprId,
        value: ExprId,
    },
    Return(Option<ExprId>),
    Break,
    Continue,
    While {
        cond: ExprId,
        body: StmtId,
    },
    ForC {
        init: Option<StmtId>,
        cond: Option<ExprId>,
        step: Option<StmtId>,
        body: StmtId,
    },
    Block(Vec<StmtId>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

pub type StmtArena = crate::arena::Arena<Stmt, StmtId>;
