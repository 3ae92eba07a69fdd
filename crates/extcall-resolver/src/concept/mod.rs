//! Concept evaluation: does a type satisfy a structural constraint?
//!
//! Types never declare conformance. A constraint is satisfied when every one
//! of its requirements (own and refined) can be called on the type:
//!
//! - member mode, `t.f(args) -> R`: member overload resolution on the type
//!   picks a unique best that is public and not deleted
//! - free mode, `f(t, args) -> R`: overload resolution among the free
//!   functions visible where the constraint is defined picks a unique best
//!   that is not deleted
//!
//! and the chosen function's return converts to `R` when one is required.
//!
//! A free-mode requirement may be met by a constrained function, which
//! re-enters the evaluator. Re-entry on a `(constraint, type)` pair already
//! being evaluated is a cycle and answers `false`; nothing computed under a
//! cycle is memoized.

mod cache;

pub use cache::ConstraintCache;

use tracing::{debug, trace};

use extcall_core::{
    ConstraintEntry, DataType, FunctionEntry, Indirection, LookupMode, Requirement, Tier,
    TypeHash, Visibility,
};
use extcall_registry::SymbolRegistry;

use crate::context::{CallContext, ResolutionContext};
use crate::conversion::find_conversion;
use crate::overload::{Candidate, Selection, select_best};
use crate::signature::{match_bound_call, match_member};

/// Whether `a` is strictly more constrained than `b`: its flattened
/// requirement set is a strict superset of `b`'s.
pub fn subsumes(registry: &SymbolRegistry, a: TypeHash, b: TypeHash) -> bool {
    let a_reqs = registry.requirements(a);
    let b_reqs = registry.requirements(b);
    a_reqs.len() > b_reqs.len() && b_reqs.iter().all(|r| a_reqs.contains(r))
}

/// Recursion bookkeeping for one top-level `satisfies` query.
#[derive(Debug, Default)]
pub(crate) struct EvalState {
    in_progress: Vec<(TypeHash, TypeHash)>,
    /// A cycle or the depth limit was hit below the current frame.
    tainted: bool,
}

impl<'a> ResolutionContext<'a> {
    /// Whether `ty` satisfies `constraint`. Unknown constraints are never
    /// satisfied.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn satisfies(&self, constraint: TypeHash, ty: TypeHash) -> bool {
        let mut state = EvalState::default();
        self.satisfies_with(constraint, ty, &mut state)
    }

    /// Whether constraint `a` subsumes constraint `b`.
    pub fn subsumes(&self, a: TypeHash, b: TypeHash) -> bool {
        subsumes(self.registry(), a, b)
    }

    pub(crate) fn satisfies_with(
        &self,
        constraint: TypeHash,
        ty: TypeHash,
        state: &mut EvalState,
    ) -> bool {
        let memoize = self.config().memoize_constraints;
        if memoize {
            if let Some(hit) = self.constraint_cache().get(constraint, ty) {
                trace!(?constraint, ?ty, satisfied = hit, "constraint cache hit");
                return hit;
            }
        }

        let Some(entry) = self.registry().get_constraint(constraint) else {
            return false;
        };

        let key = (constraint, ty);
        if state.in_progress.contains(&key)
            || state.in_progress.len() >= self.config().max_constraint_depth
        {
            trace!(constraint = %entry.name, ?ty, "constraint cycle or depth limit");
            state.tainted = true;
            return false;
        }

        let outer_tainted = std::mem::take(&mut state.tainted);
        state.in_progress.push(key);
        let satisfied = self
            .registry()
            .requirements(constraint)
            .iter()
            .all(|req| self.requirement_holds(entry, req, ty, state));
        state.in_progress.pop();

        let tainted = state.tainted;
        state.tainted = outer_tainted || tainted;
        if memoize && !tainted {
            self.constraint_cache().insert(constraint, ty, satisfied);
        }

        debug!(
            constraint = %entry.name,
            ty = %self.registry().type_name(ty),
            satisfied,
            "evaluated constraint"
        );
        satisfied
    }

    fn requirement_holds(
        &self,
        constraint: &ConstraintEntry,
        req: &Requirement,
        ty: TypeHash,
        state: &mut EvalState,
    ) -> bool {
        let sig = &req.signature;
        let subject = DataType {
            type_hash: ty,
            is_const: sig.const_subject,
            indirection: Indirection::Reference,
        };
        let args: Vec<DataType> = sig.params.iter().map(|p| p.substitute_self(ty)).collect();

        let candidates = match req.mode {
            LookupMode::Member => self.member_requirement_candidates(&sig.name, &subject, &args),
            LookupMode::Free => {
                self.free_requirement_candidates(constraint, &sig.name, &subject, &args, state)
            }
        };

        let chosen = match select_best(&candidates, &subject, self.registry()) {
            Some(Selection::Unique(chosen)) => chosen.entry,
            Some(Selection::Ambiguous(_)) | None => {
                trace!(requirement = %sig.name, mode = %req.mode, "requirement unmet");
                return false;
            }
        };

        if chosen.def.is_deleted() {
            return false;
        }
        if req.mode == LookupMode::Member && chosen.def.visibility != Visibility::Public {
            return false;
        }
        match sig.return_type {
            Some(required) => returns_into(chosen, &required.substitute_self(ty), self.registry()),
            None => true,
        }
    }

    fn member_requirement_candidates(
        &self,
        name: &str,
        subject: &DataType,
        args: &[DataType],
    ) -> Vec<Candidate<'a>> {
        let (_, members) = self.registry().lookup_members(subject.type_hash, name);
        members
            .into_iter()
            .filter_map(|entry| {
                let matched = match_member(entry, subject, args, self.registry())?;
                Some(self.guarded(entry, Tier::Member, matched, &CallContext::default()))
            })
            .collect()
    }

    fn free_requirement_candidates(
        &self,
        constraint: &ConstraintEntry,
        name: &str,
        subject: &DataType,
        args: &[DataType],
        state: &mut EvalState,
    ) -> Vec<Candidate<'a>> {
        let visible = self
            .registry()
            .visible_free_functions(constraint.name.namespace_path(), name);

        let mut candidates = Vec::new();
        for entry in visible {
            let matched = match_bound_call(entry, subject, args, self.registry(), &mut |c, t| {
                self.satisfies_with(c, t, state)
            });
            if let Some(matched) = matched {
                let context = CallContext::default();
                candidates.push(self.guarded(entry, Tier::Extension, matched, &context));
            }
        }
        candidates
    }
}

fn returns_into(func: &FunctionEntry, required: &DataType, registry: &SymbolRegistry) -> bool {
    find_conversion(&func.def.return_type, required, registry).is_some()
}
