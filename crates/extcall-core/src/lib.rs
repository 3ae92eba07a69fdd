//! Shared vocabulary for extension-method resolution.
//!
//! This crate holds everything the registry and the resolver both speak:
//!
//! - [`TypeHash`] identities and the well-known [`primitives`]
//! - [`DataType`] (type + const + indirection)
//! - registry entries: [`ClassEntry`], [`FunctionEntry`], [`ConstraintEntry`]
//! - candidate classification: [`Tier`], [`AccessVerdict`], [`CandidateInfo`]
//! - [`ExtensionConfig`], the system-wide policy
//! - the error taxonomy: [`RegistrationError`], [`ResolutionError`]

mod candidate;
mod config;
mod data_type;
pub mod entries;
mod error;
mod qualified_name;
mod span;
mod type_hash;
mod visibility;

pub use candidate::{AccessVerdict, CandidateInfo, Tier};
pub use config::{ExtensionConfig, ReceiverConvention};
pub use data_type::{DataType, Indirection};
pub use entries::{
    ClassEntry, ConstraintEntry, FunctionDef, FunctionEntry, FunctionFlags, LookupMode, MemberRef,
    Param, PrimitiveEntry, RequiredSignature, Requirement, TypeEntry,
};
pub use error::{CallSiteSummary, RegistrationError, ResolutionError};
pub use qualified_name::QualifiedName;
pub use span::Span;
pub use type_hash::{TypeHash, hash_constants, primitives};
pub use visibility::Visibility;
