//! Type interning, type-key rendering, and method/operator dispatch (C1, C2).
//!
//! `TypeRegistry` is the single owner of `TypeId` identity for a file pass; everything
//! downstream (C3's typer, C4's borrow engine, C5's attribute validator) looks types up
//! through it rather than holding its own copy.

mod compat;
mod key;
mod magic;
mod method_index;
mod registry;
mod types;

pub use compat::{direct_param_compat, receiver_compat, same_through_alias, ConversionCost, ReceiverCompat};
pub use key::{render, strip_one_alias_layer};
pub use magic::{binary_op_method, is_magic_name, unary_op_method, BOOL, CLONE, INDEX, INDEX_SET, LEN, RANGE, TO};
pub use method_index::{MethodEntry, MethodIndex};
pub use registry::{Builtins, TypeRegistry};
pub use types::{
    FieldInfo, FloatWidth, FnInfo, IntWidth, LayoutAttrs, NominalKey, StructInfo, Type, TypeId,
    UnionInfo, UnionMemberInfo, UnionMemberKind,
};
