//! Cost-based ranking with per-tier tie-breakers.
//!
//! Member rules, in order:
//! 1. Lower total argument conversion cost
//! 2. More exact matches
//! 3. Non-const member for a non-const receiver
//!
//! Extension rules, in order:
//! 1. Lower total conversion cost on the tail arguments
//! 2. More exact matches
//! 3. Concrete receiver over a constrained one
//! 4. More constrained (subsuming) receiver
//! 5. Cheaper receiver conversion
//!
//! Receiver binding only breaks ties between equally good tails, so an
//! exact tail through a base-class receiver beats a converted tail on the
//! exact receiver type.

use std::cmp::Ordering;

use extcall_core::{DataType, Tier};
use extcall_registry::SymbolRegistry;

use super::{Candidate, Selection};
use crate::concept::subsumes;

/// Compare two candidates of the same tier. `Less` means `a` is better.
pub fn compare(
    a: &Candidate<'_>,
    b: &Candidate<'_>,
    receiver: &DataType,
    registry: &SymbolRegistry,
) -> Ordering {
    let by_cost = a
        .matched
        .total_cost
        .cmp(&b.matched.total_cost)
        .then_with(|| b.matched.exact_count().cmp(&a.matched.exact_count()));
    if by_cost != Ordering::Equal {
        return by_cost;
    }

    match a.tier {
        Tier::Member => {
            if receiver.is_const {
                Ordering::Equal
            } else {
                // false < true: the non-const member sorts first.
                a.entry.def.is_const().cmp(&b.entry.def.is_const())
            }
        }
        Tier::Extension => compare_receivers(a, b, registry),
    }
}

fn compare_receivers(a: &Candidate<'_>, b: &Candidate<'_>, registry: &SymbolRegistry) -> Ordering {
    match (a.constraint(), b.constraint()) {
        (None, Some(_)) => return Ordering::Less,
        (Some(_), None) => return Ordering::Greater,
        (Some(ca), Some(cb)) => {
            if subsumes(registry, ca, cb) {
                return Ordering::Less;
            }
            if subsumes(registry, cb, ca) {
                return Ordering::Greater;
            }
        }
        (None, None) => {}
    }
    a.matched.receiver_cost().cmp(&b.matched.receiver_cost())
}

/// Pick the best candidate. `None` only for an empty set.
pub fn select_best<'c, 'r>(
    candidates: &'c [Candidate<'r>],
    receiver: &DataType,
    registry: &SymbolRegistry,
) -> Option<Selection<'c, 'r>> {
    let first = candidates.first()?;
    if candidates.len() == 1 {
        return Some(Selection::Unique(first));
    }

    let mut best = first;
    for candidate in &candidates[1..] {
        if compare(candidate, best, receiver, registry) == Ordering::Less {
            best = candidate;
        }
    }

    let tied: Vec<_> = candidates
        .iter()
        .filter(|c| !std::ptr::eq(*c, best))
        .filter(|c| compare(best, c, receiver, registry) != Ordering::Less)
        .collect();

    if tied.is_empty() {
        return Some(Selection::Unique(best));
    }

    let mut all = Vec::with_capacity(tied.len() + 1);
    all.push(best);
    all.extend(tied);
    Some(Selection::Ambiguous(all))
}
