//! Extension methods with two-tier member-call resolution.
//!
//! A host compiler registers its classes, members, free functions and
//! structural constraints in a [`SymbolRegistry`], then resolves every
//! member-call expression through a [`ResolutionContext`]:
//!
//! ```
//! use extcall::prelude::*;
//!
//! let mut registry = SymbolRegistry::with_primitives();
//! let d = registry.register_class(ClassEntry::new("D")).unwrap();
//!
//! // struct D { void foo(unsigned); };
//! registry
//!     .register_member(
//!         d,
//!         FunctionEntry::new(
//!             FunctionDef::method(d, "foo").with_param(DataType::simple(primitives::UINT32)),
//!         ),
//!     )
//!     .unwrap();
//!
//! // void foo(D* self, int);
//! registry
//!     .register_free_function(FunctionEntry::new(
//!         FunctionDef::free("foo")
//!             .with_param(DataType::simple(primitives::INT32))
//!             .with_receiver(DataType::pointer(d)),
//!     ))
//!     .unwrap();
//!
//! // d.foo(3) calls the member: members always win.
//! let ctx = ResolutionContext::new(&registry);
//! let int = DataType::simple(primitives::INT32);
//! let call = CallSite::new(DataType::simple(d), "foo").with_arg(int);
//! assert_eq!(ctx.resolve(&call).unwrap().tier(), Tier::Member);
//! ```
//!
//! The pieces live in three crates, re-exported here:
//!
//! - `extcall-core`: hashes, data types, entries, errors, configuration
//! - `extcall-registry`: the symbol table and its registration checks
//! - `extcall-resolver`: matching, constraints, gathering, ranking, binding

pub use extcall_core as core;
pub use extcall_registry as registry;
pub use extcall_resolver as resolver;

pub use extcall_core::{
    AccessVerdict, CandidateInfo, ExtensionConfig, ReceiverConvention, RegistrationError,
    ResolutionError, Tier,
};
pub use extcall_registry::SymbolRegistry;
pub use extcall_resolver::{BoundCall, CallSite, ResolutionContext, ResolutionResult};

pub mod prelude {
    pub use extcall_core::{
        AccessVerdict, CallSiteSummary, CandidateInfo, ClassEntry, ConstraintEntry, DataType,
        ExtensionConfig, FunctionDef, FunctionEntry, LookupMode, MemberRef, ReceiverConvention,
        RegistrationError, RequiredSignature, ResolutionError, Span, Tier, TypeHash, Visibility,
        primitives,
    };
    pub use extcall_registry::SymbolRegistry;
    pub use extcall_resolver::{
        BoundArg, BoundCall, CallContext, CallSite, DispatchKind, ReceiverPassing,
        ResolutionContext, ResolutionResult,
    };
}
