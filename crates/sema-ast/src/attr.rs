//! Declarative attribute records (`@name(args…)`), consumed by C5.

use crate::ids::AttrId;
use sema_common::{Atom, Span};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttrArg {
    Int(i64),
    Str(Atom),
    Ident(Atom),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    pub name: Atom,
    pub args: Vec<AttrArg>,
    pub span: Span,
}

pub type AttrArena = crate::arena::Arena<Attribute, AttrId>;

/// Declaration targets an attribute may attach to (§4.5).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttrTarget {
    Type,
    Field,
    Fn,
    Param,
    Let,
}
