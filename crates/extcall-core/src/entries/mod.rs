//! Registry entry types.
//!
//! - [`TypeEntry`] - Unified enum wrapping primitives and classes
//! - [`ClassEntry`] - Class types with their declared members
//! - [`FunctionEntry`] / [`FunctionDef`] - Members, free functions, extensions
//! - [`ConstraintEntry`] - Structural constraints (concepts)

mod class;
mod constraint;
mod function;
mod type_entry;

pub use class::ClassEntry;
pub use constraint::{ConstraintEntry, LookupMode, RequiredSignature, Requirement};
pub use function::{FunctionDef, FunctionEntry, FunctionFlags, MemberRef, Param};
pub use type_entry::{PrimitiveEntry, TypeEntry};
