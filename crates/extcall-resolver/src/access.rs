//! Access Guard: may the call site use the candidate it selected?
//!
//! Only members are guarded at call sites. Extensions are non-members whose
//! bodies were checked once, at registration, so they are always accessible.

use extcall_core::{AccessVerdict, FunctionEntry, Tier, TypeHash, Visibility};

use crate::context::{CallContext, ResolutionContext};
use crate::overload::Candidate;
use crate::signature::SignatureMatch;

impl<'a> ResolutionContext<'a> {
    /// Verdict for `candidate` as seen from `context`.
    pub fn check_access(&self, candidate: &Candidate<'_>, context: &CallContext) -> AccessVerdict {
        match candidate.tier {
            Tier::Member => self.member_access(candidate.entry, context.calling_class),
            Tier::Extension => AccessVerdict::Accessible,
        }
    }

    /// A matched callable, tagged with its verdict from `context`.
    pub(crate) fn guarded(
        &self,
        entry: &'a FunctionEntry,
        tier: Tier,
        matched: SignatureMatch,
        context: &CallContext,
    ) -> Candidate<'a> {
        let mut candidate = Candidate {
            entry,
            tier,
            matched,
            access: AccessVerdict::Accessible,
        };
        candidate.access = self.check_access(&candidate, context);
        candidate
    }

    /// Deleted, then visibility: private is open to the owning class only,
    /// protected to the owning class and its derived classes.
    fn member_access(
        &self,
        entry: &FunctionEntry,
        calling_class: Option<TypeHash>,
    ) -> AccessVerdict {
        if entry.def.is_deleted() {
            return AccessVerdict::Deleted;
        }
        let Some(owner) = entry.def.owner else {
            return AccessVerdict::Accessible;
        };

        let allowed = match entry.def.visibility {
            Visibility::Public => true,
            Visibility::Private => calling_class == Some(owner),
            Visibility::Protected => {
                calling_class.is_some_and(|caller| self.registry().is_derived_from(caller, owner))
            }
        };

        if allowed {
            AccessVerdict::Accessible
        } else {
            AccessVerdict::PrivateOrProtected(entry.def.visibility)
        }
    }
}
