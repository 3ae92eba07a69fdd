//! Constraint (concept) entries.
//!
//! A constraint is a named structural predicate over one type: a conjunction
//! of required signatures, each checked either by member lookup (`t.f(args)`)
//! or by free-function lookup (`f(t, args)`). Types never declare conformance;
//! a type satisfies a constraint when the signatures are there.
//!
//! ```
//! use extcall_core::{ConstraintEntry, LookupMode, RequiredSignature};
//!
//! // concept Fooable = requires(T t) { t.foo(); };
//! let fooable = ConstraintEntry::new("Fooable", LookupMode::Member)
//!     .with_requirement(RequiredSignature::new("foo"));
//! assert_eq!(fooable.requirements.len(), 1);
//! ```

use std::fmt;

use crate::{DataType, QualifiedName, Span, TypeHash};

/// How the requirements of a constraint are looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupMode {
    /// `t.f(args)`: public member lookup on the type.
    Member,
    /// `f(t, args)`: free functions visible where the constraint is defined.
    Free,
}

impl fmt::Display for LookupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupMode::Member => write!(f, "member"),
            LookupMode::Free => write!(f, "free"),
        }
    }
}

/// One required signature.
///
/// Parameter and return types may use [`crate::primitives::SELF`] to mean the
/// type being checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequiredSignature {
    /// Function name.
    pub name: String,
    /// Argument types, excluding `t` itself.
    pub params: Vec<DataType>,
    /// Required return type; `None` accepts any return.
    pub return_type: Option<DataType>,
    /// Whether `t` is used as a const object.
    pub const_subject: bool,
}

impl RequiredSignature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            return_type: None,
            const_subject: false,
        }
    }

    pub fn with_param(mut self, data_type: DataType) -> Self {
        self.params.push(data_type);
        self
    }

    pub fn returning(mut self, return_type: DataType) -> Self {
        self.return_type = Some(return_type);
        self
    }

    /// Require the call to work on a const `t`.
    pub fn on_const(mut self) -> Self {
        self.const_subject = true;
        self
    }
}

/// A requirement together with the lookup mode of the constraint that
/// declared it. Refinement flattens requirements from several constraints,
/// each keeping its own mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Requirement {
    pub mode: LookupMode,
    pub signature: RequiredSignature,
}

/// Registry entry for a constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintEntry {
    /// Qualified name; its namespace is the point of definition.
    pub name: QualifiedName,
    /// Identity.
    pub type_hash: TypeHash,
    /// Lookup mode for `requirements`.
    pub mode: LookupMode,
    /// Directly declared requirements.
    pub requirements: Vec<RequiredSignature>,
    /// Constraints whose requirements are included (`A && B`).
    pub refines: Vec<TypeHash>,
    /// Where the constraint is declared.
    pub span: Span,
}

impl ConstraintEntry {
    pub fn new(name: impl Into<QualifiedName>, mode: LookupMode) -> Self {
        let name = name.into();
        let type_hash = TypeHash::from_constraint(&name.to_string());
        Self {
            name,
            type_hash,
            mode,
            requirements: Vec::new(),
            refines: Vec::new(),
            span: Span::default(),
        }
    }

    pub fn with_requirement(mut self, signature: RequiredSignature) -> Self {
        self.requirements.push(signature);
        self
    }

    /// Include every requirement of `other`.
    pub fn refining(mut self, other: TypeHash) -> Self {
        self.refines.push(other);
        self
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Directly declared requirements tagged with this constraint's mode.
    pub fn own_requirements(&self) -> impl Iterator<Item = Requirement> + '_ {
        self.requirements.iter().map(|signature| Requirement {
            mode: self.mode,
            signature: signature.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives;

    #[test]
    fn own_requirements_carry_mode() {
        let free_fooable = ConstraintEntry::new("FreeFooable", LookupMode::Free)
            .with_requirement(RequiredSignature::new("foo"));
        let reqs: Vec<_> = free_fooable.own_requirements().collect();
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].mode, LookupMode::Free);
        assert_eq!(reqs[0].signature.name, "foo");
    }

    #[test]
    fn constraint_hash_uses_qualified_name() {
        let c = ConstraintEntry::new("Geo::Measurable", LookupMode::Member);
        assert_eq!(c.type_hash, TypeHash::from_constraint("Geo::Measurable"));
        assert_eq!(c.name.namespace_string(), "Geo");
    }

    #[test]
    fn signature_builder() {
        let sig = RequiredSignature::new("area")
            .with_param(DataType::simple(primitives::INT32))
            .returning(DataType::simple(primitives::DOUBLE))
            .on_const();
        assert_eq!(sig.params.len(), 1);
        assert_eq!(sig.return_type, Some(DataType::simple(primitives::DOUBLE)));
        assert!(sig.const_subject);
    }
}
