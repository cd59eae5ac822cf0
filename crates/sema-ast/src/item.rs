//! Item (top-level declaration) records.

use crate::ids::{AttrId, ItemId, ParamId, StmtId, TypeExprId};
use sema_common::{Atom, Span};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: Atom,
    pub ty: TypeExprId,
    pub attrs: Vec<AttrId>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnionMemberKind {
    /// `Tag(payload, ...)`
    Tag { name: Atom, payload: Vec<TypeExprId> },
    /// A bare type alternative, e.g. `int` inside `type E = int | string`.
    Type(TypeExprId),
    /// The absence member, written `nothing`.
    Nothing,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnionMember {
    pub kind: UnionMemberKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeParam {
    pub name: Atom,
    /// Contract (bound) names the argument must satisfy, if any.
    pub bounds: Vec<Atom>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamDecl {
    pub name: Atom,
    pub ty: TypeExprId,
    pub variadic: bool,
    /// Whether an implicit `__to` conversion may fire for an argument in this
    /// position (§3 function signature, §4.3 call resolution).
    pub allow_to: bool,
    pub attrs: Vec<AttrId>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FnDecl {
    pub name: Atom,
    pub type_params: Vec<TypeParam>,
    /// Present for methods: the self-parameter's syntactic type (receiver key is
    /// computed from this by `sema-types`).
    pub receiver: Option<TypeExprId>,
    pub params: Vec<ParamId>,
    pub result: TypeExprId,
    pub body: Option<StmtId>,
    pub attrs: Vec<AttrId>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructDecl {
    pub name: Atom,
    pub type_params: Vec<TypeParam>,
    pub fields: Vec<FieldDecl>,
    pub base: Option<Atom>,
    pub attrs: Vec<AttrId>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnionDecl {
    pub name: Atom,
    pub type_params: Vec<TypeParam>,
    pub members: Vec<UnionMember>,
    pub attrs: Vec<AttrId>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AliasDecl {
    pub name: Atom,
    pub target: TypeExprId,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstDecl {
    pub name: Atom,
    pub ty: Option<TypeExprId>,
    pub value: crate::ids::ExprId,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemKind {
    Struct(StructDecl),
    Union(UnionDecl),
    Fn(FnDecl),
    Alias(AliasDecl),
    Const(ConstDecl),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    pub kind: ItemKind,
    pub span: Span,
}

pub type ItemArena = crate::arena::Arena<Item, ItemId>;
pub type ParamArena = crate::arena::Arena<ParamDecl, ParamId>;
