//! DataType - a type with qualifiers.
//!
//! This module provides the `DataType` structure which represents a complete
//! type as it appears at a call site or in a parameter list: the base type plus
//! const qualification and indirection. This is distinct from `TypeHash` which
//! only identifies the base type.
//!
//! # Example
//!
//! ```
//! use extcall_core::{DataType, Indirection, TypeHash, primitives};
//!
//! // int
//! let int = DataType::simple(primitives::INT32);
//!
//! // const Shape&
//! let shape = TypeHash::from_name("Shape");
//! let shape_ref = DataType::const_reference(shape);
//! assert_eq!(shape_ref.indirection, Indirection::Reference);
//! assert!(shape_ref.is_const);
//! ```

use std::fmt::{self, Display, Formatter};

use xxhash_rust::xxh64::xxh64;

use crate::{TypeHash, primitives};

/// How a value is reached.
///
/// Parameters and receiver expressions in a C-family language are either
/// plain values, references (`T&`), or pointers (`T*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Indirection {
    /// Plain value
    #[default]
    Value,
    /// `T&`
    Reference,
    /// `T*`
    Pointer,
}

impl Indirection {
    /// Whether the referenced object keeps its dynamic type (reference or pointer).
    #[inline]
    pub fn is_indirect(self) -> bool {
        !matches!(self, Indirection::Value)
    }
}

impl Display for Indirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Indirection::Value => Ok(()),
            Indirection::Reference => write!(f, "&"),
            Indirection::Pointer => write!(f, "*"),
        }
    }
}

/// A complete type including qualifiers.
///
/// This struct is `Copy` for efficient passing without allocation.
///
/// ```text
/// int          -> DataType { type_hash: INT32, is_const: false, indirection: Value }
/// const A&     -> DataType { type_hash: A,     is_const: true,  indirection: Reference }
/// D*           -> DataType { type_hash: D,     is_const: false, indirection: Pointer }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DataType {
    /// The base type hash
    pub type_hash: TypeHash,

    /// Whether the referred-to value is const
    pub is_const: bool,

    /// Value, reference, or pointer
    pub indirection: Indirection,
}

impl DataType {
    /// Create a plain value type with no qualifiers.
    #[inline]
    pub const fn simple(type_hash: TypeHash) -> Self {
        Self {
            type_hash,
            is_const: false,
            indirection: Indirection::Value,
        }
    }

    /// Create a const value type.
    #[inline]
    pub const fn with_const(type_hash: TypeHash) -> Self {
        Self {
            type_hash,
            is_const: true,
            indirection: Indirection::Value,
        }
    }

    /// Create a `T&`.
    #[inline]
    pub const fn reference(type_hash: TypeHash) -> Self {
        Self {
            type_hash,
            is_const: false,
            indirection: Indirection::Reference,
        }
    }

    /// Create a `const T&`.
    #[inline]
    pub const fn const_reference(type_hash: TypeHash) -> Self {
        Self {
            type_hash,
            is_const: true,
            indirection: Indirection::Reference,
        }
    }

    /// Create a `T*`.
    #[inline]
    pub const fn pointer(type_hash: TypeHash) -> Self {
        Self {
            type_hash,
            is_const: false,
            indirection: Indirection::Pointer,
        }
    }

    /// Create a `const T*`.
    #[inline]
    pub const fn const_pointer(type_hash: TypeHash) -> Self {
        Self {
            type_hash,
            is_const: true,
            indirection: Indirection::Pointer,
        }
    }

    /// The `void` type.
    #[inline]
    pub const fn void() -> Self {
        Self::simple(primitives::VOID)
    }

    /// Whether this is `void`.
    #[inline]
    pub fn is_void(&self) -> bool {
        self.type_hash == primitives::VOID
    }

    /// Whether this is the `SELF` placeholder used in constraint requirements.
    #[inline]
    pub fn is_self(&self) -> bool {
        self.type_hash == primitives::SELF
    }

    /// Replace the `SELF` placeholder with a concrete type, keeping qualifiers.
    #[inline]
    pub fn substitute_self(self, concrete: TypeHash) -> Self {
        if self.is_self() {
            Self {
                type_hash: concrete,
                ..self
            }
        } else {
            self
        }
    }

    /// Same type with a different indirection.
    #[inline]
    pub fn with_indirection(self, indirection: Indirection) -> Self {
        Self {
            indirection,
            ..self
        }
    }

    /// Same type, dropping const and indirection.
    #[inline]
    pub fn unqualified(self) -> Self {
        Self::simple(self.type_hash)
    }

    /// Identity of the full type inside an overload signature.
    ///
    /// Const and indirection take part, so `D*` and `const D*` declare
    /// different overloads. Const on a plain value does not.
    pub fn signature_hash(&self) -> TypeHash {
        let indirection: u8 = match self.indirection {
            Indirection::Value => 0,
            Indirection::Reference => 1,
            Indirection::Pointer => 2,
        };
        let is_const = self.is_const && self.indirection.is_indirect();

        let mut bytes = [0u8; 10];
        bytes[..8].copy_from_slice(&self.type_hash.0.to_le_bytes());
        bytes[8] = indirection;
        bytes[9] = u8::from(is_const);
        TypeHash(xxh64(&bytes, 0))
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_const {
            write!(f, "const ")?;
        }
        write!(f, "{}{}", self.type_hash, self.indirection)
    }
}
