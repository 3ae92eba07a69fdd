//! Deterministic hash-based identity for types, callables, and constraints.
//!
//! [`TypeHash`] is a 64-bit hash computed from names and signatures. The host
//! compiler hands us types as opaque handles; we only ever compare them and use
//! them as map keys, so a stable hash of the qualified name is all we need.
//!
//! # Hash Computation
//!
//! Uses XXHash64 with domain-specific mixing constants so that a type, a free
//! function, a member function, and a constraint sharing a name never collide.
//!
//! # Examples
//!
//! ```
//! use extcall_core::{TypeHash, primitives};
//!
//! let int_hash = TypeHash::from_name("int");
//! assert_eq!(int_hash, primitives::INT32);
//!
//! let f1 = TypeHash::from_function("foo", &[primitives::INT32]);
//! let f2 = TypeHash::from_function("foo", &[primitives::UINT32]);
//! assert_ne!(f1, f2);
//! ```

use std::fmt;
use xxhash_rust::const_xxh64;
use xxhash_rust::xxh64::xxh64;

/// Domain-specific mixing constants for hash computation.
pub mod hash_constants {
    /// Separator constant for parameter mixing.
    pub const SEP: u64 = 0x4bc94d6bd06053ad;

    /// Domain marker for type hashes
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;

    /// Domain marker for free function hashes
    pub const FUNCTION: u64 = 0x5ea77ffbcdf5f302;

    /// Domain marker for member function hashes
    pub const METHOD: u64 = 0x7d3c8b4a92e15f6d;

    /// Domain marker for constraint hashes
    pub const CONSTRAINT: u64 = 0x61c8864680b583eb;

    /// Parameter position mixing constants.
    /// Each parameter position gets a unique constant so parameter order matters.
    pub const PARAM_MARKERS: [u64; 16] = [
        0x9e3779b97f4a7c15,
        0xbf58476d1ce4e5b9,
        0x94d049bb133111eb,
        0xd6e8feb86659fd93,
        0xe7037ed1a0b428db,
        0xc6a4a7935bd1e995,
        0x8648dbbc94d49b8d,
        0xa2b48b2c69e0d657,
        0x7c3e9f2a5b8d1403,
        0x5d8c7b4a3e9f2106,
        0x3f1e9d8c7b5a4203,
        0x1a2b3c4d5e6f7089,
        0x9f8e7d6c5b4a3210,
        0x2468ace013579bdf,
        0xfdb97531eca86420,
        0x123456789abcdef0,
    ];
}

/// A deterministic 64-bit hash identifying a type, callable, or constraint.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Create a type hash from a qualified type name.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Compile-time variant of [`TypeHash::from_name`], used for the
    /// well-known [`primitives`]. Produces the same value.
    #[inline]
    pub const fn from_static_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ const_xxh64::xxh64(name.as_bytes(), 0))
    }

    /// Create a free function hash from its qualified name and parameter types.
    ///
    /// Parameter order matters: `(int, float)` differs from `(float, int)`.
    #[inline]
    pub fn from_function(name: &str, param_hashes: &[TypeHash]) -> Self {
        let hash = hash_constants::FUNCTION ^ xxh64(name.as_bytes(), 0);
        TypeHash(mix_params(hash, param_hashes))
    }

    /// Create a member function hash from owner type, name, parameter types, and
    /// const qualification.
    #[inline]
    pub fn from_method(
        owner: TypeHash,
        name: &str,
        param_hashes: &[TypeHash],
        is_const: bool,
    ) -> Self {
        let const_modifier = if is_const { 0x1 } else { 0x0 };
        let hash = hash_constants::METHOD ^ owner.0 ^ xxh64(name.as_bytes(), 0) ^ const_modifier;
        TypeHash(mix_params(hash, param_hashes))
    }

    /// Create a constraint hash from its qualified name.
    #[inline]
    pub fn from_constraint(name: &str) -> Self {
        TypeHash(hash_constants::CONSTRAINT ^ xxh64(name.as_bytes(), 0))
    }

    /// Check if this is an empty/invalid hash.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Get the underlying u64 value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

fn mix_params(mut hash: u64, param_hashes: &[TypeHash]) -> u64 {
    for (i, param) in param_hashes.iter().enumerate() {
        let marker = hash_constants::PARAM_MARKERS
            .get(i)
            .copied()
            .unwrap_or_else(|| hash_constants::PARAM_MARKERS[0].wrapping_add(i as u64));
        // wrapping_mul keeps the mix order-dependent, unlike a plain XOR
        hash = hash.wrapping_mul(hash_constants::SEP).wrapping_add(marker ^ param.0);
    }
    hash
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// Well-known hashes for primitive types and placeholders.
pub mod primitives {
    use super::TypeHash;

    /// Hash for `void` type
    pub const VOID: TypeHash = TypeHash::from_static_name("void");

    /// Hash for `bool` type
    pub const BOOL: TypeHash = TypeHash::from_static_name("bool");

    /// Hash for `int8` type
    pub const INT8: TypeHash = TypeHash::from_static_name("int8");

    /// Hash for `int16` type
    pub const INT16: TypeHash = TypeHash::from_static_name("int16");

    /// Hash for `int` type (32-bit signed integer)
    pub const INT32: TypeHash = TypeHash::from_static_name("int");

    /// Hash for `int64` type
    pub const INT64: TypeHash = TypeHash::from_static_name("int64");

    /// Hash for `uint8` type
    pub const UINT8: TypeHash = TypeHash::from_static_name("uint8");

    /// Hash for `uint16` type
    pub const UINT16: TypeHash = TypeHash::from_static_name("uint16");

    /// Hash for `unsigned` type (32-bit unsigned integer)
    pub const UINT32: TypeHash = TypeHash::from_static_name("unsigned");

    /// Hash for `uint64` type
    pub const UINT64: TypeHash = TypeHash::from_static_name("uint64");

    /// Hash for `float` type
    pub const FLOAT: TypeHash = TypeHash::from_static_name("float");

    /// Hash for `double` type
    pub const DOUBLE: TypeHash = TypeHash::from_static_name("double");

    /// Placeholder for "the type under test" inside constraint requirements.
    /// A sentinel, not computed from a name.
    pub const SELF: TypeHash = TypeHash(0xfffffffffffffffe);

    /// Placeholder for a parameter whose type is given by the callable's
    /// constraint rather than a concrete class. A sentinel, not computed from a name.
    pub const CONSTRAINED: TypeHash = TypeHash(0xfffffffffffffffd);

    /// All primitive types with their spelled names, in registration order.
    pub const ALL: [(&str, TypeHash); 12] = [
        ("void", VOID),
        ("bool", BOOL),
        ("int8", INT8),
        ("int16", INT16),
        ("int", INT32),
        ("int64", INT64),
        ("uint8", UINT8),
        ("uint16", UINT16),
        ("unsigned", UINT32),
        ("uint64", UINT64),
        ("float", FLOAT),
        ("double", DOUBLE),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_hash_determinism() {
        let hash1 = TypeHash::from_name("int");
        let hash2 = TypeHash::from_name("int");
        assert_eq!(hash1, hash2);

        let hash3 = TypeHash::from_name("Geometry::Shape");
        let hash4 = TypeHash::from_name("Geometry::Shape");
        assert_eq!(hash3, hash4);
    }

    #[test]
    fn static_names_match_runtime_hashing() {
        for (name, hash) in primitives::ALL {
            assert_eq!(TypeHash::from_name(name), hash, "mismatch for {name}");
        }
    }

    #[test]
    fn function_hash_overload_distinction() {
        let func_int = TypeHash::from_function("print", &[primitives::INT32]);
        let func_float = TypeHash::from_function("print", &[primitives::FLOAT]);
        let func_two = TypeHash::from_function("print", &[primitives::INT32, primitives::FLOAT]);

        assert_ne!(func_int, func_float);
        assert_ne!(func_int, func_two);
    }

    #[test]
    fn function_hash_parameter_order_matters() {
        let func1 = TypeHash::from_function("foo", &[primitives::INT32, primitives::FLOAT]);
        let func2 = TypeHash::from_function("foo", &[primitives::FLOAT, primitives::INT32]);
        assert_ne!(func1, func2);
    }

    #[test]
    fn method_hash_includes_owner_and_const() {
        let a = TypeHash::from_name("A");
        let b = TypeHash::from_name("B");

        assert_ne!(
            TypeHash::from_method(a, "foo", &[], false),
            TypeHash::from_method(b, "foo", &[], false)
        );
        assert_ne!(
            TypeHash::from_method(a, "foo", &[], false),
            TypeHash::from_method(a, "foo", &[], true)
        );
    }

    #[test]
    fn domains_do_not_collide() {
        let name = "Fooable";
        let as_type = TypeHash::from_name(name);
        let as_function = TypeHash::from_function(name, &[]);
        let as_constraint = TypeHash::from_constraint(name);

        assert_ne!(as_type, as_function);
        assert_ne!(as_type, as_constraint);
        assert_ne!(as_function, as_constraint);
    }
}
