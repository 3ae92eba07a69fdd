//! Primitive type conversions.

use extcall_core::{DataType, TypeHash, primitives};

use super::{Conversion, ConversionKind};

/// Find a numeric conversion between two primitive types.
pub fn find_primitive_conversion(source: &DataType, target: &DataType) -> Option<Conversion> {
    let from = source.type_hash;
    let to = target.type_hash;

    if !is_primitive_numeric(from) || !is_primitive_numeric(to) {
        return None;
    }

    if from == to {
        return Some(Conversion::identity());
    }

    let float_widening = from == primitives::FLOAT && to == primitives::DOUBLE;
    let float_narrowing = from == primitives::DOUBLE && to == primitives::FLOAT;
    let cost = if is_integer_widening(from, to) || float_widening {
        Conversion::COST_PRIMITIVE_WIDENING
    } else if is_integer_narrowing(from, to) || float_narrowing {
        Conversion::COST_PRIMITIVE_NARROWING
    } else if let Some(cost) = sign_conversion_cost(from, to) {
        cost
    } else if is_integer(from) && is_float(to) {
        Conversion::COST_INT_TO_FLOAT
    } else if is_float(from) && is_integer(to) {
        Conversion::COST_FLOAT_TO_INT
    } else {
        // Cross-signed size changes (int64 -> uint8 and friends).
        Conversion::COST_PRIMITIVE_NARROWING
    };

    Some(Conversion {
        kind: ConversionKind::Primitive { from, to },
        cost,
    })
}

fn is_integer_widening(from: TypeHash, to: TypeHash) -> bool {
    matches!(
        (from, to),
        // Signed widening
        (primitives::INT8, primitives::INT16)
            | (primitives::INT8, primitives::INT32)
            | (primitives::INT8, primitives::INT64)
            | (primitives::INT16, primitives::INT32)
            | (primitives::INT16, primitives::INT64)
            | (primitives::INT32, primitives::INT64)
            // Unsigned widening
            | (primitives::UINT8, primitives::UINT16)
            | (primitives::UINT8, primitives::UINT32)
            | (primitives::UINT8, primitives::UINT64)
            | (primitives::UINT16, primitives::UINT32)
            | (primitives::UINT16, primitives::UINT64)
            | (primitives::UINT32, primitives::UINT64)
            // Unsigned to larger signed
            | (primitives::UINT8, primitives::INT16)
            | (primitives::UINT8, primitives::INT32)
            | (primitives::UINT8, primitives::INT64)
            | (primitives::UINT16, primitives::INT32)
            | (primitives::UINT16, primitives::INT64)
            | (primitives::UINT32, primitives::INT64)
    )
}

fn is_integer_narrowing(from: TypeHash, to: TypeHash) -> bool {
    matches!(
        (from, to),
        (primitives::INT64, primitives::INT32)
            | (primitives::INT64, primitives::INT16)
            | (primitives::INT64, primitives::INT8)
            | (primitives::INT32, primitives::INT16)
            | (primitives::INT32, primitives::INT8)
            | (primitives::INT16, primitives::INT8)
            | (primitives::UINT64, primitives::UINT32)
            | (primitives::UINT64, primitives::UINT16)
            | (primitives::UINT64, primitives::UINT8)
            | (primitives::UINT32, primitives::UINT16)
            | (primitives::UINT32, primitives::UINT8)
            | (primitives::UINT16, primitives::UINT8)
    )
}

/// Same size, different signedness.
fn sign_conversion_cost(from: TypeHash, to: TypeHash) -> Option<u32> {
    if matches!(
        (from, to),
        (primitives::INT8, primitives::UINT8)
            | (primitives::INT16, primitives::UINT16)
            | (primitives::INT32, primitives::UINT32)
            | (primitives::INT64, primitives::UINT64)
    ) {
        return Some(Conversion::COST_SIGNED_TO_UNSIGNED);
    }

    if matches!(
        (from, to),
        (primitives::UINT8, primitives::INT8)
            | (primitives::UINT16, primitives::INT16)
            | (primitives::UINT32, primitives::INT32)
            | (primitives::UINT64, primitives::INT64)
    ) {
        return Some(Conversion::COST_UNSIGNED_TO_SIGNED);
    }

    None
}

fn is_integer(hash: TypeHash) -> bool {
    matches!(
        hash,
        primitives::INT8
            | primitives::INT16
            | primitives::INT32
            | primitives::INT64
            | primitives::UINT8
            | primitives::UINT16
            | primitives::UINT32
            | primitives::UINT64
    )
}

fn is_float(hash: TypeHash) -> bool {
    matches!(hash, primitives::FLOAT | primitives::DOUBLE)
}

/// Check if a type hash is a primitive numeric type.
pub fn is_primitive_numeric(hash: TypeHash) -> bool {
    is_integer(hash) || is_float(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cost(from: TypeHash, to: TypeHash) -> Option<u32> {
        find_primitive_conversion(&DataType::simple(from), &DataType::simple(to)).map(|c| c.cost)
    }

    #[test]
    fn widening_beats_narrowing() {
        assert_eq!(
            cost(primitives::INT8, primitives::INT32),
            Some(Conversion::COST_PRIMITIVE_WIDENING)
        );
        assert_eq!(
            cost(primitives::INT64, primitives::INT32),
            Some(Conversion::COST_PRIMITIVE_NARROWING)
        );
        assert_eq!(
            cost(primitives::FLOAT, primitives::DOUBLE),
            Some(Conversion::COST_PRIMITIVE_WIDENING)
        );
        assert_eq!(
            cost(primitives::DOUBLE, primitives::FLOAT),
            Some(Conversion::COST_PRIMITIVE_NARROWING)
        );
    }

    #[test]
    fn sign_changes() {
        assert_eq!(
            cost(primitives::INT32, primitives::UINT32),
            Some(Conversion::COST_SIGNED_TO_UNSIGNED)
        );
        assert_eq!(
            cost(primitives::UINT32, primitives::INT32),
            Some(Conversion::COST_UNSIGNED_TO_SIGNED)
        );
    }

    #[test]
    fn int_float_crossings() {
        assert_eq!(
            cost(primitives::INT32, primitives::DOUBLE),
            Some(Conversion::COST_INT_TO_FLOAT)
        );
        assert_eq!(cost(primitives::FLOAT, primitives::INT64), Some(Conversion::COST_FLOAT_TO_INT));
    }

    #[test]
    fn same_numeric_type_is_identity() {
        let conv = find_primitive_conversion(
            &DataType::simple(primitives::UINT16),
            &DataType::simple(primitives::UINT16),
        )
        .unwrap();
        assert!(conv.is_exact());
    }

    #[test]
    fn bool_and_void_are_not_numeric() {
        assert_eq!(cost(primitives::BOOL, primitives::INT32), None);
        assert_eq!(cost(primitives::INT32, primitives::VOID), None);
        assert!(!is_primitive_numeric(primitives::BOOL));
    }
}
