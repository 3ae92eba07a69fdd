//! Candidate gathering for one call site.
//!
//! Members come from the receiver's static type: the most derived class that
//! declares the name supplies every overload. Extensions are visible free
//! functions with a receiver parameter whose constraint, if any, holds for
//! the static type. Extensions are only looked at when no member matches.

use tracing::trace;

use extcall_core::Tier;

use crate::context::{CallSite, ResolutionContext};
use crate::overload::Candidate;
use crate::signature::{match_bound_call, match_member};

/// Both candidate sets of a call site.
#[derive(Debug, Default)]
pub struct Gathered<'r> {
    pub members: Vec<Candidate<'r>>,
    /// Empty whenever `members` is not.
    pub extensions: Vec<Candidate<'r>>,
}

impl<'r> Gathered<'r> {
    pub fn is_empty(&self) -> bool {
        self.members.is_empty() && self.extensions.is_empty()
    }
}

impl<'a> ResolutionContext<'a> {
    /// Gather both tiers for `call`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn gather(&self, call: &CallSite) -> Gathered<'a> {
        let members = self.gather_members(call);
        let extensions = if members.is_empty() {
            self.gather_extensions(call)
        } else {
            Vec::new()
        };
        Gathered {
            members,
            extensions,
        }
    }

    /// Matching members of the receiver's static type, access-tagged.
    pub fn gather_members(&self, call: &CallSite) -> Vec<Candidate<'a>> {
        let (declaring, overloads) = self
            .registry()
            .lookup_members(call.receiver.type_hash, &call.name);

        let members: Vec<_> = overloads
            .into_iter()
            .filter_map(|entry| {
                let matched = match_member(entry, &call.receiver, &call.args, self.registry())?;
                Some(self.guarded(entry, Tier::Member, matched, &call.context))
            })
            .collect();

        trace!(
            name = %call.name,
            declaring = ?declaring,
            viable = members.len(),
            "gathered member candidates"
        );
        members
    }

    /// Matching extensions visible from the call site.
    pub fn gather_extensions(&self, call: &CallSite) -> Vec<Candidate<'a>> {
        let visible = self
            .registry()
            .visible_free_functions(&call.context.namespace, &call.name);

        let extensions: Vec<_> = visible
            .into_iter()
            .filter(|entry| entry.def.is_extension())
            .filter_map(|entry| {
                let matched = match_bound_call(
                    entry,
                    &call.receiver,
                    &call.args,
                    self.registry(),
                    &mut |constraint, ty| self.satisfies(constraint, ty),
                )?;
                Some(self.guarded(entry, Tier::Extension, matched, &call.context))
            })
            .collect();

        trace!(name = %call.name, viable = extensions.len(), "gathered extension candidates");
        extensions
    }
}
