//! Syntactic type annotations as written in source, prior to resolution.
//!
//! These are distinct from `sema_types::Type`: a `TypeExpr` is what the parser recorded
//! (a name plus syntactic shape); the checker resolves it to an interned `Type` via
//! `sema_types::TypeRegistry`.

use crate::ids::TypeExprId;
use sema_common::{Atom, Span};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeExprKind {
    /// `Name<Arg, Arg>` — a nominal reference, possibly with type arguments. Also used
    /// for primitive keywords (`int`, `bool`, ...) and generic-parameter references;
    /// the checker disambiguates by scope lookup.
    Name {
        name: Atom,
        args: Vec<TypeExprId>,
    },
    Reference {
        inner: TypeExprId,
        mutable: bool,
    },
    Own(TypeExprId),
    Pointer(TypeExprId),
    Array(TypeExprId),
    ArrayFixed {
        element: TypeExprId,
        len: u64,
    },
    Tuple(Vec<TypeExprId>),
    Fn {
        params: Vec<TypeExprId>,
        result: TypeExprId,
    },
    /// `Task<T>`, written explicitly for a task-typed binding.
    Task(TypeExprId),
    Unit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeExpr {
    pub kind: TypeExprKind,
    pub span: Span,
}

pub type TypeExprArena = crate::arena::Arena<TypeExpr, TypeExprId>;
