//! Magic (operator) method names (§4.2).

use sema_ast::{BinaryOp, UnaryOp};

pub const TO: &str = "__to";
pub const CLONE: &str = "__clone";
pub const BOOL: &str = "__bool";
pub const INDEX: &str = "__index";
pub const INDEX_SET: &str = "__index_set";
pub const RANGE: &str = "__range";
pub const LEN: &str = "__len";

pub fn binary_op_method(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "__add",
        BinaryOp::Sub => "__sub",
        BinaryOp::Mul => "__mul",
        BinaryOp::Div => "__div",
        BinaryOp::Rem => "__rem",
        BinaryOp::Eq => "__eq",
        BinaryOp::Ne => "__ne",
        BinaryOp::Lt => "__lt",
        BinaryOp::Le => "__le",
        BinaryOp::Gt => "__gt",
        BinaryOp::Ge => "__ge",
        BinaryOp::And => "__and",
        BinaryOp::Or => "__or",
        BinaryOp::BitAnd => "__bitand",
        BinaryOp::BitOr => "__bitor",
        BinaryOp::BitXor => "__bitxor",
        BinaryOp::Shl => "__shl",
        BinaryOp::Shr => "__shr",
    }
}

pub fn unary_op_method(op: UnaryOp) -> &'static str {
    match op {
        UnaryOp::Neg => "__neg",
        UnaryOp::Not => "__not",
        UnaryOp::BitNot => "__bitnot",
    }
}

/// Whether `name` follows the `__`-prefixed magic-method naming convention (§4.2).
pub fn is_magic_name(name: &str) -> bool {
    name.starts_with("__")
}
