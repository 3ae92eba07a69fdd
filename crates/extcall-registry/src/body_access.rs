//! Definition-time access check for extension bodies.
//!
//! An extension is a non-member: its body may only touch what any outside
//! code could. The check runs once, when the extension is registered, and
//! never again at call sites.

use tracing::trace;

use extcall_core::{FunctionEntry, LookupMode, RegistrationError, Visibility, primitives};

use crate::SymbolRegistry;

/// Validate every receiver member the extension body references.
///
/// For a concrete receiver class each name must resolve (with inheritance
/// and name hiding) to at least one public member. For a constrained
/// receiver each name must be one of the constraint's member-mode
/// requirements, since nothing else is known about the receiver.
pub(crate) fn check_extension_body(
    registry: &SymbolRegistry,
    entry: &FunctionEntry,
) -> Result<(), RegistrationError> {
    let Some(receiver) = entry.def.receiver_param() else {
        return Ok(());
    };
    let receiver_type = receiver.data_type.type_hash;
    let function = entry.def.name.to_string();

    if receiver_type == primitives::CONSTRAINED {
        let Some(constraint) = entry.def.constraint else {
            return Ok(());
        };
        for member in &entry.body_refs {
            let required = registry
                .requirements(constraint)
                .iter()
                .any(|r| r.mode == LookupMode::Member && r.signature.name == member.name);
            if !required {
                return Err(RegistrationError::UnknownMember {
                    function,
                    member: member.name.clone(),
                    receiver: registry
                        .get_constraint(constraint)
                        .map(|c| c.name.to_string())
                        .unwrap_or_else(|| constraint.to_string()),
                    span: member.span,
                });
            }
        }
        return Ok(());
    }

    for member in &entry.body_refs {
        let (_, overloads) = registry.lookup_members(receiver_type, &member.name);
        if overloads.is_empty() {
            return Err(RegistrationError::UnknownMember {
                function,
                member: member.name.clone(),
                receiver: registry.type_name(receiver_type),
                span: member.span,
            });
        }
        if overloads.iter().any(|m| m.def.visibility.is_public()) {
            trace!(function = %function, member = %member.name, "body reference ok");
            continue;
        }
        let visibility = overloads
            .iter()
            .map(|m| m.def.visibility)
            .find(|v| *v == Visibility::Private)
            .unwrap_or(Visibility::Protected);
        return Err(RegistrationError::ConstraintViolationInDefinition {
            function,
            member: member.name.clone(),
            visibility,
            span: member.span,
        });
    }
    Ok(())
}
