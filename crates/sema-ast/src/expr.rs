//! Expression records (§6 "Expressions have a kind tag, a span, and a kind-specific
//! payload stored in a side-table").

use crate::ids::{ExprId, ItemId, TypeExprId};
use sema_common::{Atom, Span};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
    BitNot,
}

/// A single call argument, possibly named (`f(name: value)`), possibly the spread of a
/// variadic tail is just a trailing positional argument — variadic expansion is purely
/// arity-driven at the signature side (§4.3).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Arg {
    pub name: Option<Atom>,
    pub value: ExprId,
}

/// One arm of a `compare` (pattern match) expression (§4.3).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchArm {
    pub pattern: Option<Pattern>,
    pub guard: Option<ExprId>,
    pub result: ExprId,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Pattern {
    /// `finally` — consumes all remaining union members (wildcard/catch-all).
    Finally,
    /// A bare identifier: binds the subject (or narrowed member) to a name.
    Bind(Atom),
    /// A literal pattern, including the `nothing` literal.
    Literal(ExprId),
    /// `nothing` member pattern (distinct from a literal "nothing" *value* — this
    /// matches the union's absence member).
    Nothing,
    /// `Tag(inner...)` — a tag constructor pattern, possibly nested.
    Tag { name: Atom, payload: Vec<Pattern> },
    Tuple(Vec<Pattern>),
}

/// One arm of a `select` (wait on multiple channel-like operations) expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectArm {
    pub channel_op: ExprId,
    pub bind: Option<Atom>,
    pub body: ExprId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExprKind {
    Ident(Atom),
    IntLiteral(i128),
    FloatLiteral(u64), // bit pattern, to keep ExprKind: Eq
    StringLiteral(Atom),
    BoolLiteral(bool),
    NothingLiteral,
    ArrayLiteral(Vec<ExprId>),
    TupleLiteral(Vec<ExprId>),
    StructLiteral {
        ty: TypeExprId,
        fields: Vec<(Atom, ExprId)>,
    },
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    Binary {
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    },
    Index {
        base: ExprId,
        index: ExprId,
    },
    /// `base.field`
    Member {
        base: ExprId,
        field: Atom,
        span: Span,
    },
    /// `*base`
    Deref(ExprId),
    /// `&base` / `&mut base`
    Ref {
        mutable: bool,
        inner: ExprId,
    },
    /// Direct call `callee(args)`.
    Call {
        callee: ExprId,
        args: Vec<Arg>,
    },
    /// `receiver.method(args)`.
    MethodCall {
        receiver: ExprId,
        method: Atom,
        method_span: Span,
        args: Vec<Arg>,
        /// Explicit `::<T, ...>` type arguments, if given.
        explicit_type_args: Vec<TypeExprId>,
    },
    /// `Type::method(args)` — static call, no self argument.
    StaticCall {
        ty: TypeExprId,
        method: Atom,
        args: Vec<Arg>,
    },
    Cast {
        expr: ExprId,
        ty: TypeExprId,
    },
    Compare {
        subject: ExprId,
        arms: Vec<MatchArm>,
    },
    /// `spawn expr` / `task expr` — begins a task.
    Spawn(ExprId),
    /// `async { ... }` block, represented as a body expression (usually a `Block`).
    Async(ExprId),
    /// `t.await()`
    Await(ExprId),
    /// `select { arm, arm, ... }`
    Select(Vec<SelectArm>),
    /// `race(task, task, ...)`
    Race(Vec<ExprId>),
    Range {
        start: Option<ExprId>,
        end: Option<ExprId>,
        inclusive: bool,
    },
    Block(Vec<crate::ids::StmtId>),
    If {
        cond: ExprId,
        then_branch: ExprId,
        else_branch: Option<ExprId>,
    },
    /// A nested item used as an expression position is not modeled; `ItemRef` lets a
    /// closure/function literal reuse the item arena without duplicating the payload.
    ItemRef(ItemId),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

pub type ExprArena = crate::arena::Arena<Expr, ExprId>;
