//! Implicit conversions and their costs.
//!
//! Argument matching, receiver matching, and the return-compatibility check
//! of constraint requirements all ask the same question: can a value of type
//! `source` be used where `target` is expected, and how good is the fit?
//!
//! ## Conversion Priority
//!
//! Lower cost is a better match:
//! 1. Identity
//! 2. Const addition
//! 3. Primitive widening, narrowing, sign change, int/float
//! 4. Derived class to base class

use extcall_core::{DataType, TypeHash};
use extcall_registry::SymbolRegistry;

mod primitive;

pub use primitive::{find_primitive_conversion, is_primitive_numeric};

/// A conversion with its ranking cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conversion {
    pub kind: ConversionKind,
    /// Lower is better.
    pub cost: u32,
}

/// What the conversion does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionKind {
    /// Same type, nothing to do.
    Identity,
    /// Binding a non-const object to a const reference or pointer.
    ConstAddition,
    /// Numeric conversion between primitives.
    Primitive { from: TypeHash, to: TypeHash },
    /// Derived class object or address used as its base.
    DerivedToBase { base: TypeHash },
}

impl Conversion {
    // Lower cost = better match. The gaps leave the primitive categories in
    // the usual C-family order.

    /// Cost for an exact match.
    pub const COST_EXACT: u32 = 0;
    /// Cost for adding a const qualifier.
    pub const COST_CONST_ADDITION: u32 = 1;
    /// Cost for primitive widening (int8 -> int32, float -> double).
    pub const COST_PRIMITIVE_WIDENING: u32 = 4;
    /// Cost for primitive narrowing (int32 -> int8, double -> float).
    pub const COST_PRIMITIVE_NARROWING: u32 = 5;
    /// Cost for signed to unsigned integer conversion.
    pub const COST_SIGNED_TO_UNSIGNED: u32 = 6;
    /// Cost for unsigned to signed integer conversion.
    pub const COST_UNSIGNED_TO_SIGNED: u32 = 7;
    /// Cost for integer to float conversion.
    pub const COST_INT_TO_FLOAT: u32 = 8;
    /// Cost for float to integer conversion.
    pub const COST_FLOAT_TO_INT: u32 = 9;
    /// Cost for derived-to-base conversion.
    pub const COST_DERIVED_TO_BASE: u32 = 10;

    /// Create an identity conversion.
    pub fn identity() -> Self {
        Self {
            kind: ConversionKind::Identity,
            cost: Self::COST_EXACT,
        }
    }

    /// Check if this is an exact match (no conversion).
    pub fn is_exact(&self) -> bool {
        matches!(self.kind, ConversionKind::Identity)
    }
}

/// Find the implicit conversion from `source` to `target`, if one exists.
///
/// A reference or pointer target binds to an object of the same class or a
/// derived class; the source's own indirection does not matter, only what it
/// designates. Binding never drops const.
pub fn find_conversion(
    source: &DataType,
    target: &DataType,
    registry: &SymbolRegistry,
) -> Option<Conversion> {
    if target.indirection.is_indirect() {
        if source.is_const && !target.is_const {
            return None;
        }
        let const_added = target.is_const && !source.is_const;
        if source.type_hash == target.type_hash {
            return Some(if const_added {
                Conversion {
                    kind: ConversionKind::ConstAddition,
                    cost: Conversion::COST_CONST_ADDITION,
                }
            } else {
                Conversion::identity()
            });
        }
        return find_derived_to_base(source.type_hash, target.type_hash, registry);
    }

    // By value: the parameter is a copy, constness on either side is free.
    if source.type_hash == target.type_hash {
        return Some(Conversion::identity());
    }
    if let Some(conv) = find_primitive_conversion(source, target) {
        return Some(conv);
    }
    find_derived_to_base(source.type_hash, target.type_hash, registry)
}

fn find_derived_to_base(
    derived: TypeHash,
    base: TypeHash,
    registry: &SymbolRegistry,
) -> Option<Conversion> {
    if registry.get_class(derived).is_none() || !registry.is_derived_from(derived, base) {
        return None;
    }
    Some(Conversion {
        kind: ConversionKind::DerivedToBase { base },
        cost: Conversion::COST_DERIVED_TO_BASE,
    })
}
