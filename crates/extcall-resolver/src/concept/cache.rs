//! Memo of constraint satisfaction results.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use extcall_core::TypeHash;

/// `(constraint, type) -> satisfied`, shared by every resolution in a
/// context.
///
/// Reads vastly outnumber writes. Two threads racing on the same key compute
/// the same answer, so a lost insert is harmless.
#[derive(Debug, Default)]
pub struct ConstraintCache {
    entries: RwLock<FxHashMap<(TypeHash, TypeHash), bool>>,
}

impl ConstraintCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, constraint: TypeHash, ty: TypeHash) -> Option<bool> {
        self.entries.read().get(&(constraint, ty)).copied()
    }

    pub fn insert(&self, constraint: TypeHash, ty: TypeHash, satisfied: bool) {
        self.entries.write().insert((constraint, ty), satisfied);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
