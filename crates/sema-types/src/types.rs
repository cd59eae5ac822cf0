//! The `Type` sum (§3 "Type") and the handful of nominal metadata records that are
//! filled in after a struct/union's shell is first interned (so recursive field types
//! referencing the struct itself are representable).

use sema_common::Atom;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntWidth {
    Any,
    W8,
    W16,
    W32,
    W64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FloatWidth {
    W16,
    W32,
    W64,
}

/// A nominal type's identity: name plus the type arguments it was instantiated with.
/// Structural equality on this (inside `Type::Struct`/`Type::Union`) is exactly the
/// identity condition §3 specifies for nominal types.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NominalKey {
    pub name: Atom,
    pub type_args: Vec<TypeId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Bool,
    Int(IntWidth),
    UInt(IntWidth),
    Float(FloatWidth),
    String,
    /// The absence type, distinct from `Unit`: a union member can be `nothing`.
    Nothing,
    Unit,
    Pointer(TypeId),
    Reference(TypeId, bool),
    Own(TypeId),
    Array(TypeId),
    ArrayFixed(TypeId, u64),
    Tuple(Vec<TypeId>),
    Fn {
        params: Vec<TypeId>,
        result: TypeId,
    },
    Struct(NominalKey),
    Union(NominalKey),
    Alias(NominalKey),
    GenericParam {
        name: Atom,
        owner: Atom,
        index: u32,
    },
    ConstUint(u64),
    /// Not a real type a program can have; recorded for expressions that couldn't be
    /// inferred (§3 invariant 1) or whose sub-check failed (§7 local recovery).
    Unknown,
    /// Distinct from `Unknown`: a hard type error already diagnosed once, so parent
    /// expressions suppress duplicate diagnostics that only reference it (§7).
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnionMemberKind {
    Type(TypeId),
    Tag { payload_count: u32 },
    Nothing,
}

#[derive(Clone, Debug)]
pub struct UnionMemberInfo {
    pub name: Option<Atom>,
    pub kind: UnionMemberKind,
    pub payload_types: Vec<TypeId>,
}

#[derive(Clone, Debug)]
pub struct FieldInfo {
    pub name: Atom,
    pub ty: TypeId,
    pub inherited: bool,
}

#[derive(Clone, Debug, Default)]
pub struct StructInfo {
    pub type_params: Vec<Atom>,
    pub fields: Vec<FieldInfo>,
    pub base: Option<TypeId>,
}

#[derive(Clone, Debug, Default)]
pub struct UnionInfo {
    pub type_params: Vec<Atom>,
    pub members: Vec<UnionMemberInfo>,
}

#[derive(Clone, Debug)]
pub struct FnInfo {
    pub param_keys: Vec<TypeId>,
    pub variadic: Vec<bool>,
    pub allow_to: Vec<bool>,
    pub has_self: bool,
    pub result: TypeId,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayoutAttrs {
    pub align: Option<u32>,
    pub packed: bool,
}
