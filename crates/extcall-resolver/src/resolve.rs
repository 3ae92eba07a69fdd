//! Resolution Engine: the two-tier rule.
//!
//! 1. Members of the static receiver type that accept the call
//! 2. If any: rank them; the best wins even if it is inaccessible, and an
//!    inaccessible best is an error (no fallthrough to extensions)
//! 3. If none: rank the visible, satisfied extensions
//! 4. Bind the winner

use tracing::debug;

use extcall_core::{CandidateInfo, ResolutionError, Tier};

use crate::context::{CallSite, ResolutionContext};
use crate::dispatch::BoundCall;
use crate::overload::{Candidate, Selection, select_best};

/// A bound call or the reason there is none.
pub type ResolutionResult = Result<BoundCall, ResolutionError>;

impl<'a> ResolutionContext<'a> {
    /// Resolve one member-call expression.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn resolve(&self, call: &CallSite) -> ResolutionResult {
        let members = self.gather_members(call);
        if !members.is_empty() {
            let chosen = self.select(&members, Tier::Member, call)?;
            if !chosen.access.is_accessible() {
                debug!(
                    name = %call.name,
                    reason = %chosen.access,
                    "selected member is inaccessible"
                );
                return Err(ResolutionError::SelectedButInaccessible {
                    call: self.summarize(call),
                    candidate: self.candidate_info(chosen),
                    reason: chosen.access,
                });
            }
            return Ok(self.finish(chosen, call));
        }

        let extensions = self.gather_extensions(call);
        if extensions.is_empty() {
            debug!(name = %call.name, "no viable candidate");
            return Err(ResolutionError::NoViableCandidate {
                call: self.summarize(call),
            });
        }
        let chosen = self.select(&extensions, Tier::Extension, call)?;
        Ok(self.finish(chosen, call))
    }

    fn select<'c>(
        &self,
        candidates: &'c [Candidate<'a>],
        tier: Tier,
        call: &CallSite,
    ) -> Result<&'c Candidate<'a>, ResolutionError> {
        match select_best(candidates, &call.receiver, self.registry()) {
            Some(Selection::Unique(chosen)) => Ok(chosen),
            Some(Selection::Ambiguous(tied)) => {
                debug!(name = %call.name, %tier, tied = tied.len(), "ambiguous call");
                Err(ResolutionError::AmbiguousCandidates {
                    call: self.summarize(call),
                    tier,
                    candidates: tied.into_iter().map(|c| self.candidate_info(c)).collect(),
                })
            }
            None => Err(ResolutionError::NoViableCandidate {
                call: self.summarize(call),
            }),
        }
    }

    fn finish(&self, chosen: &Candidate<'_>, call: &CallSite) -> BoundCall {
        let bound = self.bind(chosen, call);
        debug!(
            name = %call.name,
            tier = %chosen.tier,
            target = %self.registry().format_signature(&chosen.entry.def),
            "resolved call"
        );
        bound
    }

    /// Diagnostic view of a candidate.
    pub fn candidate_info(&self, candidate: &Candidate<'_>) -> CandidateInfo {
        CandidateInfo {
            func_hash: candidate.func_hash(),
            signature: self.registry().format_signature(&candidate.entry.def),
            tier: candidate.tier,
            access: candidate.access,
        }
    }
}
