//! Literal materialization (§4.3): numeric and array literals start "any-width" and are
//! widened/narrowed to an expected type once one is known from context.

use sema_common::{Diagnostic, DiagnosticCode, Span};
use sema_types::{FloatWidth, IntWidth, Type, TypeId, TypeRegistry};

fn int_bounds(width: IntWidth) -> (i128, i128) {
    match width {
        IntWidth::Any => (i128::MIN, i128::MAX),
        IntWidth::W8 => (i8::MIN as i128, i8::MAX as i128),
        IntWidth::W16 => (i16::MIN as i128, i16::MAX as i128),
        IntWidth::W32 => (i32::MIN as i128, i32::MAX as i128),
        IntWidth::W64 => (i64::MIN as i128, i64::MAX as i128),
    }
}

fn uint_bounds(width: IntWidth) -> (u128, u128) {
    match width {
        IntWidth::Any => (0, u128::MAX),
        IntWidth::W8 => (0, u8::MAX as u128),
        IntWidth::W16 => (0, u16::MAX as u128),
        IntWidth::W32 => (0, u32::MAX as u128),
        IntWidth::W64 => (0, u64::MAX as u128),
    }
}

/// Attempt to materialize an integer literal to `expected`. On success returns the
/// expected type id; on range failure returns a diagnostic and the literal keeps its
/// original "any-width" type (§4.3 "the expression retains the original type").
pub fn materialize_int_literal(
    registry: &TypeRegistry,
    value: i128,
    expected: TypeId,
    span: Span,
) -> Result<TypeId, Diagnostic> {
    match registry.lookup(expected) {
        Type::Int(w) => {
            let (lo, hi) = int_bounds(*w);
            if value >= lo && value <= hi {
                Ok(expected)
            } else {
                Err(range_error(value, span))
            }
        }
        Type::UInt(w) => {
            if value < 0 {
                return Err(range_error(value, span));
            }
            let (lo, hi) = uint_bounds(*w);
            let v = value as u128;
            if v >= lo && v <= hi {
                Ok(expected)
            } else {
                Err(range_error(value, span))
            }
        }
        Type::Float(_) => Ok(expected),
        _ => Err(Diagnostic::new(
            DiagnosticCode::SemaTypeMismatch,
            span,
            "integer literal is not compatible with the expected type".to_string(),
        )),
    }
}

pub fn materialize_float_literal(registry: &TypeRegistry, expected: TypeId, span: Span) -> Result<TypeId, Diagnostic> {
    match registry.lookup(expected) {
        Type::Float(FloatWidth::W16 | FloatWidth::W32 | FloatWidth::W64) => Ok(expected),
        _ => Err(Diagnostic::new(
            DiagnosticCode::SemaTypeMismatch,
            span,
            "float literal is not compatible with the expected type".to_string(),
        )),
    }
}

fn range_error(value: i128, span: Span) -> Diagnostic {
    Diagnostic::new(
        DiagnosticCode::SemaTypeMismatch,
        span,
        format!("literal value {value} is out of range for the expected type"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_range_int_literal_materializes() {
        let mut reg = TypeRegistry::new();
        let i8_ty = reg.intern(Type::Int(IntWidth::W8));
        let any = reg.builtins().int_any;
        let result = materialize_int_literal(&reg, 100, i8_ty, Span::DUMMY);
        assert_eq!(result, Ok(i8_ty));
    }

    #[test]
    fn out_of_range_int_literal_is_rejected() {
        let mut reg = TypeRegistry::new();
        let i8_ty = reg.intern(Type::Int(IntWidth::W8));
        let result = materialize_int_literal(&reg, 1000, i8_ty, Span::DUMMY);
        assert!(result.is_err());
    }

    #[test]
    fn negative_value_rejected_for_unsigned() {
        let mut reg = TypeRegistry::new();
        let u8_ty = reg.intern(Type::UInt(IntWidth::W8));
        let result = materialize_int_literal(&reg, -1, u8_ty, Span::DUMMY);
        assert!(result.is_err());
    }
}
