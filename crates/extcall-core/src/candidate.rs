//! Candidate classification shared between the resolver and its diagnostics.

use std::fmt;

use crate::{TypeHash, Visibility};

/// Which tier a candidate was gathered in. Fixed at gathering time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// A member function of the receiver's static type.
    Member,
    /// A free function bound through its receiver parameter.
    Extension,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Member => write!(f, "member"),
            Tier::Extension => write!(f, "extension"),
        }
    }
}

/// Whether the caller may use a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessVerdict {
    Accessible,
    /// Inaccessible from the call site; carries the declared visibility.
    PrivateOrProtected(Visibility),
    /// Declared `= delete`.
    Deleted,
}

impl AccessVerdict {
    pub fn is_accessible(self) -> bool {
        matches!(self, AccessVerdict::Accessible)
    }
}

impl fmt::Display for AccessVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessVerdict::Accessible => write!(f, "accessible"),
            AccessVerdict::PrivateOrProtected(v) => write!(f, "{v}"),
            AccessVerdict::Deleted => write!(f, "deleted"),
        }
    }
}

/// Diagnostic view of a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateInfo {
    pub func_hash: TypeHash,
    /// Rendered signature, e.g. `D::foo(unsigned)` or `foo(D*, int)`.
    pub signature: String,
    pub tier: Tier,
    pub access: AccessVerdict,
}

impl fmt::Display for CandidateInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.signature, self.tier)
    }
}
