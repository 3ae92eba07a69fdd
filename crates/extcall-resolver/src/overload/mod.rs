//! Candidates and overload selection within one tier.
//!
//! ## Algorithm
//!
//! 1. Every candidate has already passed signature matching
//! 2. Pairwise comparison with the tier's tie-breaking rules
//! 3. A unique candidate better than every other wins
//! 4. Otherwise all candidates not worse than the front-runner tie

mod ranking;

pub use ranking::{compare, select_best};

use extcall_core::{AccessVerdict, FunctionEntry, Tier, TypeHash};

use crate::signature::SignatureMatch;

/// A callable that accepts the call, with its tier and access verdict.
#[derive(Debug, Clone)]
pub struct Candidate<'r> {
    /// Registry entry of the callable.
    pub entry: &'r FunctionEntry,
    /// Member or extension; fixed at gathering time.
    pub tier: Tier,
    /// How the call binds.
    pub matched: SignatureMatch,
    /// Access Guard verdict from the call site.
    pub access: AccessVerdict,
}

impl<'r> Candidate<'r> {
    pub fn func_hash(&self) -> TypeHash {
        self.entry.def.func_hash
    }

    /// Constraint on the receiver parameter, if any.
    pub fn constraint(&self) -> Option<TypeHash> {
        match self.tier {
            Tier::Member => None,
            Tier::Extension => self.entry.def.constraint,
        }
    }
}

/// Outcome of ranking a non-empty candidate set.
#[derive(Debug)]
pub enum Selection<'c, 'r> {
    /// One candidate beats all others.
    Unique(&'c Candidate<'r>),
    /// No unique best; every tied candidate, front-runner first.
    Ambiguous(Vec<&'c Candidate<'r>>),
}
