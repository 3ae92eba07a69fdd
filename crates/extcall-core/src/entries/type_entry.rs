//! Unified type entry.

use crate::{QualifiedName, TypeHash};

use super::ClassEntry;

/// A built-in primitive type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimitiveEntry {
    pub name: String,
    pub type_hash: TypeHash,
}

impl PrimitiveEntry {
    pub fn new(name: impl Into<String>, type_hash: TypeHash) -> Self {
        Self {
            name: name.into(),
            type_hash,
        }
    }
}

/// Any type known to the registry.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeEntry {
    Primitive(PrimitiveEntry),
    Class(ClassEntry),
}

impl TypeEntry {
    pub fn type_hash(&self) -> TypeHash {
        match self {
            TypeEntry::Primitive(p) => p.type_hash,
            TypeEntry::Class(c) => c.type_hash,
        }
    }

    /// Human-readable qualified name.
    pub fn qualified_name(&self) -> QualifiedName {
        match self {
            TypeEntry::Primitive(p) => QualifiedName::global(p.name.clone()),
            TypeEntry::Class(c) => c.name.clone(),
        }
    }

    pub fn as_class(&self) -> Option<&ClassEntry> {
        match self {
            TypeEntry::Class(c) => Some(c),
            TypeEntry::Primitive(_) => None,
        }
    }

    pub fn as_class_mut(&mut self) -> Option<&mut ClassEntry> {
        match self {
            TypeEntry::Class(c) => Some(c),
            TypeEntry::Primitive(_) => None,
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeEntry::Primitive(_))
    }
}

impl From<ClassEntry> for TypeEntry {
    fn from(entry: ClassEntry) -> Self {
        TypeEntry::Class(entry)
    }
}

impl From<PrimitiveEntry> for TypeEntry {
    fn from(entry: PrimitiveEntry) -> Self {
        TypeEntry::Primitive(entry)
    }
}
