//! Member-call resolution with extension methods.
//!
//! For a member-call expression `x.f(args)` the resolver picks exactly one
//! callable:
//!
//! - members of `x`'s static type always win when any of them accepts the
//!   call, even if the winner turns out to be private or deleted
//! - otherwise an extension method (a free function whose first parameter
//!   binds the receiver, possibly constrained by a structural concept) is
//!   chosen by ordinary overload ranking
//!
//! The result is bound to the static receiver type and never revisited.
//!
//! # Example
//!
//! ```
//! use extcall_core::{ClassEntry, DataType, FunctionDef, FunctionEntry, primitives};
//! use extcall_registry::SymbolRegistry;
//! use extcall_resolver::{BoundCall, CallSite, ResolutionContext};
//!
//! let mut registry = SymbolRegistry::with_primitives();
//! let d = registry.register_class(ClassEntry::new("D")).unwrap();
//! let ext = FunctionDef::free("foo")
//!     .with_param(DataType::simple(primitives::INT32))
//!     .with_receiver(DataType::pointer(d));
//! registry.register_free_function(FunctionEntry::new(ext)).unwrap();
//!
//! let ctx = ResolutionContext::new(&registry);
//! let call = CallSite::new(DataType::simple(d), "foo")
//!     .with_arg(DataType::simple(primitives::INT32));
//! assert!(matches!(ctx.resolve(&call), Ok(BoundCall::Extension { .. })));
//! ```

mod access;
pub mod concept;
mod context;
pub mod conversion;
mod dispatch;
mod gather;
pub mod overload;
mod resolve;
pub mod signature;

pub use concept::ConstraintCache;
pub use context::{CallContext, CallSite, ResolutionContext};
pub use conversion::{Conversion, ConversionKind, find_conversion};
pub use dispatch::{BoundArg, BoundCall, DispatchKind, ReceiverPassing};
pub use gather::Gathered;
pub use overload::{Candidate, Selection};
pub use resolve::ResolutionResult;
pub use signature::SignatureMatch;
