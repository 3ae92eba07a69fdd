//! Class type entry.

use crate::{QualifiedName, Span, TypeHash};

use super::FunctionEntry;

/// Registry entry for a class type.
///
/// Members are stored on the class that declares them; lookup through the
/// base chain (and name hiding) is the registry's job.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassEntry {
    /// Qualified name (with namespace).
    pub name: QualifiedName,
    /// Type hash for identity.
    pub type_hash: TypeHash,
    /// Base class type hash (single inheritance).
    pub base_class: Option<TypeHash>,
    /// Member functions declared directly on this class.
    pub methods: Vec<FunctionEntry>,
    /// Where the class is declared.
    pub span: Span,
}

impl ClassEntry {
    /// Create a new class entry. `name` may be qualified ("Geometry::Shape").
    pub fn new(name: impl Into<QualifiedName>) -> Self {
        let name = name.into();
        let type_hash = TypeHash::from_name(&name.to_string());
        Self {
            name,
            type_hash,
            base_class: None,
            methods: Vec::new(),
            span: Span::default(),
        }
    }

    // === Builder Methods ===

    /// Set the base class.
    pub fn with_base(mut self, base: TypeHash) -> Self {
        self.base_class = Some(base);
        self
    }

    /// Set the declaration site.
    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Find the directly declared methods named `name`.
    pub fn methods_named<'a, 'n>(
        &'a self,
        name: &'n str,
    ) -> impl Iterator<Item = &'a FunctionEntry> + use<'a, 'n> {
        self.methods
            .iter()
            .filter(move |m| m.def.simple_name() == name)
    }

    /// Whether this class itself declares a member named `name`.
    pub fn declares(&self, name: &str) -> bool {
        self.methods_named(name).next().is_some()
    }
}
