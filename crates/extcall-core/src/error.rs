//! Error types for extension-method resolution.
//!
//! ## Error Hierarchy
//!
//! ```text
//! RegistrationError   - declaration-time failures (one per declaration)
//! ResolutionError     - call-site failures (one per member-call expression)
//! ```
//!
//! Every variant carries enough structured data for the host compiler to
//! render its own diagnostic. None of these are recoverable: the host reports
//! them and compilation fails.

use std::fmt;

use thiserror::Error;

use crate::{AccessVerdict, CandidateInfo, Span, Tier};

// ============================================================================
// Registration Errors
// ============================================================================

/// Errors raised while populating the symbol table.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistrationError {
    /// A type, callable, or constraint with the same identity already exists.
    #[error("at {span}: duplicate definition '{name}'")]
    DuplicateDefinition { name: String, span: Span },

    /// A declaration refers to a type that is not registered.
    #[error("at {span}: unknown type '{name}'")]
    UnknownType { name: String, span: Span },

    /// A declaration refers to a constraint that is not registered.
    #[error("at {span}: unknown constraint '{name}'")]
    UnknownConstraint { name: String, span: Span },

    /// The receiver-binding parameter must be the first parameter.
    #[error("at {span}: receiver of '{function}' must be parameter 0, found index {index}")]
    ReceiverNotFirst {
        function: String,
        index: usize,
        span: Span,
    },

    /// The receiver parameter does not follow the system-wide convention.
    #[error("at {span}: receiver of '{function}' must be passed by {expected}")]
    ReceiverConventionMismatch {
        function: String,
        expected: &'static str,
        span: Span,
    },

    /// Member functions cannot carry a receiver parameter or a constraint.
    #[error("at {span}: member '{function}' cannot declare a receiver parameter or constraint")]
    MemberWithReceiver { function: String, span: Span },

    /// A constrained parameter without a constraint, or the reverse.
    #[error("at {span}: '{function}' mixes a constrained parameter with {detail}")]
    ConstraintMismatch {
        function: String,
        detail: &'static str,
        span: Span,
    },

    /// A class would become its own base.
    #[error("at {span}: circular inheritance for '{name}'")]
    CircularInheritance { name: String, span: Span },

    /// A constraint refines itself, directly or indirectly.
    #[error("at {span}: circular refinement for constraint '{name}'")]
    CircularRefinement { name: String, span: Span },

    /// An extension body references a non-public member of its receiver.
    /// Raised once, at the extension's definition.
    #[error("at {span}: extension '{function}' references {visibility} receiver member '{member}'")]
    ConstraintViolationInDefinition {
        function: String,
        member: String,
        visibility: crate::Visibility,
        span: Span,
    },

    /// An extension body references a member its receiver does not have.
    #[error(
        "at {span}: extension '{function}' references unknown member '{member}' on '{receiver}'"
    )]
    UnknownMember {
        function: String,
        member: String,
        receiver: String,
        span: Span,
    },
}

impl RegistrationError {
    /// Get the span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            RegistrationError::DuplicateDefinition { span, .. } => *span,
            RegistrationError::UnknownType { span, .. } => *span,
            RegistrationError::UnknownConstraint { span, .. } => *span,
            RegistrationError::ReceiverNotFirst { span, .. } => *span,
            RegistrationError::ReceiverConventionMismatch { span, .. } => *span,
            RegistrationError::MemberWithReceiver { span, .. } => *span,
            RegistrationError::ConstraintMismatch { span, .. } => *span,
            RegistrationError::CircularInheritance { span, .. } => *span,
            RegistrationError::CircularRefinement { span, .. } => *span,
            RegistrationError::ConstraintViolationInDefinition { span, .. } => *span,
            RegistrationError::UnknownMember { span, .. } => *span,
        }
    }
}

// ============================================================================
// Resolution Errors
// ============================================================================

/// The call expression a resolution failure belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSiteSummary {
    /// Called name.
    pub name: String,
    /// Rendered static receiver type.
    pub receiver: String,
    /// Rendered argument types.
    pub args: Vec<String>,
    /// Where the call occurred.
    pub span: Span,
}

impl fmt::Display for CallSiteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}.{}({})'",
            self.receiver,
            self.name,
            self.args.join(", ")
        )
    }
}

fn join_candidates(candidates: &[CandidateInfo]) -> String {
    candidates
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors raised while resolving one member-call expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolutionError {
    /// Neither a member nor an extension accepts the call.
    #[error("at {}: no viable candidate for {call}", .call.span)]
    NoViableCandidate { call: CallSiteSummary },

    /// Ranking left more than one best candidate within a tier.
    #[error("at {}: ambiguous {tier} call {call}: {}", .call.span, join_candidates(.candidates))]
    AmbiguousCandidates {
        call: CallSiteSummary,
        tier: Tier,
        candidates: Vec<CandidateInfo>,
    },

    /// The selected member is private, protected, or deleted. The extension
    /// tier was not consulted because a viable member shadows it.
    #[error("at {}: {call} selects {reason} member {}", .call.span, .candidate.signature)]
    SelectedButInaccessible {
        call: CallSiteSummary,
        candidate: CandidateInfo,
        reason: AccessVerdict,
    },
}

impl ResolutionError {
    /// Get the span where this error occurred.
    pub fn span(&self) -> Span {
        self.call().span
    }

    /// The call site this error belongs to.
    pub fn call(&self) -> &CallSiteSummary {
        match self {
            ResolutionError::NoViableCandidate { call } => call,
            ResolutionError::AmbiguousCandidates { call, .. } => call,
            ResolutionError::SelectedButInaccessible { call, .. } => call,
        }
    }
}
