//! Dispatch Binder: the call the host emits for a selected candidate.
//!
//! A member keeps the host's own dispatch rule. An extension becomes a plain
//! call `f(&x, args...)` (or `f(x, args...)` under the reference
//! convention), bound to the receiver's static type and never virtual.

use extcall_core::{DataType, ReceiverConvention, Tier, TypeHash};

use crate::context::{CallSite, ResolutionContext};
use crate::conversion::Conversion;
use crate::overload::Candidate;

/// How a member call is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchKind {
    Direct,
    /// Through the object's virtual table.
    Virtual,
}

/// How the receiver is handed to an extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiverPassing {
    /// `f(&x, ...)`
    AddressOf,
    /// `f(x, ...)` binding a reference.
    ByReference,
}

impl From<ReceiverConvention> for ReceiverPassing {
    fn from(convention: ReceiverConvention) -> Self {
        match convention {
            ReceiverConvention::Pointer => ReceiverPassing::AddressOf,
            ReceiverConvention::Reference => ReceiverPassing::ByReference,
        }
    }
}

/// One argument slot of the emitted call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundArg {
    /// Call-site argument after conversion.
    Converted(Conversion),
    /// Parameter filled from its default.
    Default,
}

/// The emitted call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundCall {
    Member {
        func_hash: TypeHash,
        /// Static receiver type.
        receiver: DataType,
        dispatch: DispatchKind,
        args: Vec<BoundArg>,
    },
    Extension {
        func_hash: TypeHash,
        /// Static receiver type the extension was bound against.
        bound_type: TypeHash,
        receiver: ReceiverPassing,
        /// Receiver to parameter 0 (const addition, derived-to-base).
        receiver_conversion: Conversion,
        args: Vec<BoundArg>,
    },
}

impl BoundCall {
    pub fn func_hash(&self) -> TypeHash {
        match self {
            BoundCall::Member { func_hash, .. } | BoundCall::Extension { func_hash, .. } => {
                *func_hash
            }
        }
    }

    pub fn tier(&self) -> Tier {
        match self {
            BoundCall::Member { .. } => Tier::Member,
            BoundCall::Extension { .. } => Tier::Extension,
        }
    }

    pub fn is_extension(&self) -> bool {
        matches!(self, BoundCall::Extension { .. })
    }

    pub fn args(&self) -> &[BoundArg] {
        match self {
            BoundCall::Member { args, .. } | BoundCall::Extension { args, .. } => args,
        }
    }
}

impl<'a> ResolutionContext<'a> {
    /// Bind a selected candidate to `call`.
    pub fn bind(&self, candidate: &Candidate<'_>, call: &CallSite) -> BoundCall {
        let args = candidate
            .matched
            .arg_conversions
            .iter()
            .map(|conv| match conv {
                Some(conv) => BoundArg::Converted(*conv),
                None => BoundArg::Default,
            })
            .collect();

        match candidate.tier {
            Tier::Member => {
                let dispatch =
                    if candidate.entry.def.is_virtual() && call.receiver.indirection.is_indirect() {
                        DispatchKind::Virtual
                    } else {
                        DispatchKind::Direct
                    };
                BoundCall::Member {
                    func_hash: candidate.func_hash(),
                    receiver: call.receiver,
                    dispatch,
                    args,
                }
            }
            Tier::Extension => BoundCall::Extension {
                func_hash: candidate.func_hash(),
                bound_type: call.receiver.type_hash,
                receiver: self.config().receiver_convention.into(),
                receiver_conversion: candidate
                    .matched
                    .receiver_conversion
                    .unwrap_or_else(Conversion::identity),
                args,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use extcall_core::{
        ClassEntry, ExtensionConfig, FunctionDef, FunctionEntry, primitives,
    };
    use extcall_registry::SymbolRegistry;

    fn int() -> DataType {
        DataType::simple(primitives::INT32)
    }

    #[test]
    fn virtual_member_through_reference_dispatches_virtually() {
        let mut registry = SymbolRegistry::with_primitives();
        let shape = registry.register_class(ClassEntry::new("Shape")).unwrap();
        registry
            .register_member(
                shape,
                FunctionEntry::new(FunctionDef::method(shape, "draw").with_virtual()),
            )
            .unwrap();
        let ctx = ResolutionContext::new(&registry);

        let by_ref = CallSite::new(DataType::reference(shape), "draw");
        let gathered = ctx.gather(&by_ref);
        match ctx.bind(&gathered.members[0], &by_ref) {
            BoundCall::Member { dispatch, .. } => assert_eq!(dispatch, DispatchKind::Virtual),
            other => panic!("unexpected {other:?}"),
        }

        let by_value = CallSite::new(DataType::simple(shape), "draw");
        let gathered = ctx.gather(&by_value);
        match ctx.bind(&gathered.members[0], &by_value) {
            BoundCall::Member { dispatch, .. } => assert_eq!(dispatch, DispatchKind::Direct),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn defaulted_params_are_marked() {
        let mut registry = SymbolRegistry::with_primitives();
        let d = registry.register_class(ClassEntry::new("D")).unwrap();
        registry
            .register_member(
                d,
                FunctionEntry::new(
                    FunctionDef::method(d, "pad")
                        .with_param(int())
                        .with_default_param(int()),
                ),
            )
            .unwrap();
        let ctx = ResolutionContext::new(&registry);

        let call = CallSite::new(DataType::simple(d), "pad").with_arg(int());
        let gathered = ctx.gather(&call);
        let bound = ctx.bind(&gathered.members[0], &call);
        assert_eq!(
            bound.args(),
            &[BoundArg::Converted(Conversion::identity()), BoundArg::Default]
        );
    }

    #[test]
    fn extension_follows_receiver_convention() {
        let mut registry = SymbolRegistry::with_config(
            ExtensionConfig::new().with_receiver_convention(ReceiverConvention::Reference),
        );
        registry.register_all_primitives();
        let d = registry.register_class(ClassEntry::new("D")).unwrap();
        let hash = registry
            .register_free_function(FunctionEntry::new(
                FunctionDef::free("twice").with_receiver(DataType::reference(d)),
            ))
            .unwrap();
        let ctx = ResolutionContext::new(&registry);

        let call = CallSite::new(DataType::simple(d), "twice");
        let gathered = ctx.gather(&call);
        match ctx.bind(&gathered.extensions[0], &call) {
            BoundCall::Extension {
                func_hash,
                bound_type,
                receiver,
                ..
            } => {
                assert_eq!(func_hash, hash);
                assert_eq!(bound_type, d);
                assert_eq!(receiver, ReceiverPassing::ByReference);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
