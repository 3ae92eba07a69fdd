//! SymbolRegistry - the program's symbol table as seen by member-call resolution.
//!
//! This module provides [`SymbolRegistry`], the storage for every class,
//! member function, free function, and constraint the host compiler declares.
//!
//! # Storage Model
//!
//! - **Types**: primitives and classes by `TypeHash`
//! - **Members**: stored on the declaring `ClassEntry`; `member_owner` maps a
//!   member hash back to its class
//! - **Free functions**: stored by hash, and indexed by namespace in the
//!   [`NamespaceTree`] for visibility queries
//! - **Constraints**: stored by hash, plus their requirement set flattened
//!   through refinement at registration time
//!
//! # Thread Safety
//!
//! Registration needs `&mut self`; after that the registry is only read.
//! It is `Send + Sync`, so one registry can back any number of concurrent
//! resolutions.
//!
//! # Example
//!
//! ```
//! use extcall_registry::SymbolRegistry;
//! use extcall_core::{ClassEntry, DataType, FunctionDef, FunctionEntry, primitives};
//!
//! let mut registry = SymbolRegistry::with_primitives();
//! let d = registry.register_class(ClassEntry::new("D")).unwrap();
//! let foo = FunctionDef::method(d, "foo").with_param(DataType::simple(primitives::UINT32));
//! registry.register_member(d, FunctionEntry::new(foo)).unwrap();
//!
//! let (_, overloads) = registry.lookup_members(d, "foo");
//! assert_eq!(overloads.len(), 1);
//! ```

use rustc_hash::FxHashMap;
use tracing::debug;

use extcall_core::{
    ClassEntry, ConstraintEntry, DataType, ExtensionConfig, FunctionDef, FunctionEntry,
    Indirection, PrimitiveEntry, ReceiverConvention, RegistrationError, Requirement, TypeEntry,
    TypeHash, primitives,
};

use crate::body_access;
use crate::namespace_tree::NamespaceTree;

/// The program's symbol table.
#[derive(Default)]
pub struct SymbolRegistry {
    /// System-wide policy, fixed at construction.
    config: ExtensionConfig,

    /// Primitives and classes.
    types: FxHashMap<TypeHash, TypeEntry>,

    /// Member hash -> owning class.
    member_owner: FxHashMap<TypeHash, TypeHash>,

    /// Free functions (plain and extension).
    functions: FxHashMap<TypeHash, FunctionEntry>,

    /// Constraints.
    constraints: FxHashMap<TypeHash, ConstraintEntry>,

    /// Constraint -> own + refined requirements.
    requirements: FxHashMap<TypeHash, Vec<Requirement>>,

    /// Free-function visibility.
    namespaces: NamespaceTree,
}

impl SymbolRegistry {
    /// Create a new empty registry with the default policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry with an explicit policy.
    pub fn with_config(config: ExtensionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Create a registry with all primitives pre-registered.
    pub fn with_primitives() -> Self {
        let mut registry = Self::new();
        registry.register_all_primitives();
        registry
    }

    /// Register every primitive in [`primitives::ALL`].
    pub fn register_all_primitives(&mut self) {
        for (name, hash) in primitives::ALL {
            self.types
                .insert(hash, TypeEntry::Primitive(PrimitiveEntry::new(name, hash)));
        }
    }

    /// The policy every declaration was validated against.
    pub fn config(&self) -> &ExtensionConfig {
        &self.config
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    /// Register a class. Its base may be registered later, but the chain must
    /// never loop back onto the class itself.
    pub fn register_class(&mut self, entry: ClassEntry) -> Result<TypeHash, RegistrationError> {
        let hash = entry.type_hash;
        if self.types.contains_key(&hash) {
            return Err(RegistrationError::DuplicateDefinition {
                name: entry.name.to_string(),
                span: entry.span,
            });
        }

        let mut current = entry.base_class;
        while let Some(base) = current {
            if base == hash {
                return Err(RegistrationError::CircularInheritance {
                    name: entry.name.to_string(),
                    span: entry.span,
                });
            }
            current = self.get_class(base).and_then(|c| c.base_class);
        }

        debug!(class = %entry.name, "registered class");
        self.types.insert(hash, TypeEntry::Class(entry));
        Ok(hash)
    }

    /// Register a member function on `owner`.
    pub fn register_member(
        &mut self,
        owner: TypeHash,
        mut entry: FunctionEntry,
    ) -> Result<TypeHash, RegistrationError> {
        if entry.def.receiver.is_some() || entry.def.constraint.is_some() {
            return Err(RegistrationError::MemberWithReceiver {
                function: entry.def.name.to_string(),
                span: entry.span,
            });
        }

        entry.def.owner = Some(owner);
        self.check_known_types(&entry)?;
        let hash = entry.def.compute_hash();
        entry.def.func_hash = hash;

        if self.member_owner.contains_key(&hash) {
            return Err(RegistrationError::DuplicateDefinition {
                name: self.format_signature(&entry.def),
                span: entry.span,
            });
        }

        let unknown = RegistrationError::UnknownType {
            name: owner.to_string(),
            span: entry.span,
        };
        let class = self
            .types
            .get_mut(&owner)
            .and_then(TypeEntry::as_class_mut)
            .ok_or(unknown)?;

        debug!(class = %class.name, member = %entry.def.name, "registered member");
        class.methods.push(entry);
        self.member_owner.insert(hash, owner);
        Ok(hash)
    }

    /// Register a free function.
    ///
    /// An extension (receiver index set) is validated against the receiver
    /// convention and its body's member references are checked here, once.
    pub fn register_free_function(
        &mut self,
        mut entry: FunctionEntry,
    ) -> Result<TypeHash, RegistrationError> {
        entry.def.owner = None;
        self.validate_free_function(&entry)?;
        if entry.def.is_extension() {
            body_access::check_extension_body(self, &entry)?;
        }

        let hash = entry.def.compute_hash();
        entry.def.func_hash = hash;
        if self.functions.contains_key(&hash) {
            return Err(RegistrationError::DuplicateDefinition {
                name: self.format_signature(&entry.def),
                span: entry.span,
            });
        }

        debug!(
            function = %entry.def.name,
            extension = entry.def.is_extension(),
            constrained = entry.def.constraint.is_some(),
            "registered free function"
        );
        self.namespaces.add_function(
            entry.def.name.namespace_path(),
            entry.def.simple_name(),
            hash,
        );
        self.functions.insert(hash, entry);
        Ok(hash)
    }

    fn validate_free_function(&self, entry: &FunctionEntry) -> Result<(), RegistrationError> {
        let def = &entry.def;
        let function = def.name.to_string();

        if let Some(index) = def.receiver {
            if index != 0 || def.params.is_empty() {
                return Err(RegistrationError::ReceiverNotFirst {
                    function,
                    index,
                    span: entry.span,
                });
            }
            let (expected, name) = match self.config.receiver_convention {
                ReceiverConvention::Pointer => (Indirection::Pointer, "pointer"),
                ReceiverConvention::Reference => (Indirection::Reference, "reference"),
            };
            if def.params[0].data_type.indirection != expected {
                return Err(RegistrationError::ReceiverConventionMismatch {
                    function,
                    expected: name,
                    span: entry.span,
                });
            }
        }

        match (def.constraint, def.has_constrained_first_param()) {
            (Some(constraint), true) => {
                if !self.constraints.contains_key(&constraint) {
                    return Err(RegistrationError::UnknownConstraint {
                        name: constraint.to_string(),
                        span: entry.span,
                    });
                }
            }
            (Some(_), false) => {
                return Err(RegistrationError::ConstraintMismatch {
                    function,
                    detail: "a concrete first parameter",
                    span: entry.span,
                });
            }
            (None, true) => {
                return Err(RegistrationError::ConstraintMismatch {
                    function,
                    detail: "no constraint",
                    span: entry.span,
                });
            }
            (None, false) => {}
        }

        self.check_known_types(entry)
    }

    /// Every parameter and the return type must name a registered type or
    /// the constrained placeholder.
    fn check_known_types(&self, entry: &FunctionEntry) -> Result<(), RegistrationError> {
        let def = &entry.def;
        let types = def
            .params
            .iter()
            .map(|p| p.data_type.type_hash)
            .chain(std::iter::once(def.return_type.type_hash));
        for hash in types {
            if hash != primitives::CONSTRAINED && !self.types.contains_key(&hash) {
                return Err(RegistrationError::UnknownType {
                    name: hash.to_string(),
                    span: entry.span,
                });
            }
        }
        Ok(())
    }

    /// Register a constraint. Refined constraints must
    /// already be registered.
    pub fn register_constraint(
        &mut self,
        entry: ConstraintEntry,
    ) -> Result<TypeHash, RegistrationError> {
        let hash = entry.type_hash;
        if self.constraints.contains_key(&hash) {
            return Err(RegistrationError::DuplicateDefinition {
                name: entry.name.to_string(),
                span: entry.span,
            });
        }

        let mut flattened: Vec<Requirement> = entry.own_requirements().collect();
        for refined in &entry.refines {
            if *refined == hash {
                return Err(RegistrationError::CircularRefinement {
                    name: entry.name.to_string(),
                    span: entry.span,
                });
            }
            let inherited = self.requirements.get(refined).ok_or_else(|| {
                RegistrationError::UnknownConstraint {
                    name: refined.to_string(),
                    span: entry.span,
                }
            })?;
            for requirement in inherited {
                if !flattened.contains(requirement) {
                    flattened.push(requirement.clone());
                }
            }
        }

        debug!(
            constraint = %entry.name,
            mode = %entry.mode,
            requirements = flattened.len(),
            "registered constraint"
        );
        self.requirements.insert(hash, flattened);
        self.constraints.insert(hash, entry);
        Ok(hash)
    }

    /// Record `using namespace imported;` inside `namespace`.
    pub fn register_using<S: AsRef<str>>(&mut self, namespace: &[S], imported: &[S]) {
        let from = self.namespaces.get_or_create_path(namespace);
        let target = self.namespaces.get_or_create_path(imported);
        self.namespaces.add_using_directive(from, target);
    }

    // ==========================================================================
    // Type Lookup
    // ==========================================================================

    /// Get a class by hash.
    pub fn get_class(&self, hash: TypeHash) -> Option<&ClassEntry> {
        self.types.get(&hash).and_then(TypeEntry::as_class)
    }

    /// The class and all of its bases, most derived first.
    pub fn base_class_chain(&self, hash: TypeHash) -> Vec<&ClassEntry> {
        let mut chain = Vec::new();
        let mut current = self.get_class(hash);
        while let Some(class) = current {
            chain.push(class);
            current = class.base_class.and_then(|base| self.get_class(base));
        }
        chain
    }

    /// Whether `derived` is `base` or inherits from it.
    pub fn is_derived_from(&self, derived: TypeHash, base: TypeHash) -> bool {
        derived == base
            || self
                .base_class_chain(derived)
                .iter()
                .any(|class| class.type_hash == base)
    }

    // ==========================================================================
    // Function Lookup
    // ==========================================================================

    /// Get a member or free function by hash.
    pub fn get_function(&self, hash: TypeHash) -> Option<&FunctionEntry> {
        if let Some(owner) = self.member_owner.get(&hash) {
            return self
                .get_class(*owner)?
                .methods
                .iter()
                .find(|m| m.def.func_hash == hash);
        }
        self.functions.get(&hash)
    }

    /// Members named `name` on `class`, honoring name hiding: the most
    /// derived class that declares `name` supplies every overload, bases are
    /// not searched further. Returns the declaring class too.
    pub fn lookup_members(
        &self,
        class: TypeHash,
        name: &str,
    ) -> (Option<TypeHash>, Vec<&FunctionEntry>) {
        for entry in self.base_class_chain(class) {
            if entry.declares(name) {
                return (Some(entry.type_hash), entry.methods_named(name).collect());
            }
        }
        (None, Vec::new())
    }

    /// Free functions named `name` visible from `namespace`.
    pub fn visible_free_functions<S: AsRef<str>>(
        &self,
        namespace: &[S],
        name: &str,
    ) -> Vec<&FunctionEntry> {
        self.namespaces
            .visible_functions(namespace, name)
            .into_iter()
            .filter_map(|hash| self.functions.get(&hash))
            .collect()
    }

    // ==========================================================================
    // Constraint Lookup
    // ==========================================================================

    /// Get a constraint by hash.
    pub fn get_constraint(&self, hash: TypeHash) -> Option<&ConstraintEntry> {
        self.constraints.get(&hash)
    }

    /// Own plus refined requirements of a constraint.
    pub fn requirements(&self, hash: TypeHash) -> &[Requirement] {
        self.requirements
            .get(&hash)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    // ==========================================================================
    // Formatting
    // ==========================================================================

    /// Human-readable name of a type.
    pub fn type_name(&self, hash: TypeHash) -> String {
        if hash == primitives::SELF {
            return "T".to_string();
        }
        if hash == primitives::CONSTRAINED {
            return "auto".to_string();
        }
        self.types
            .get(&hash)
            .map(|entry| entry.qualified_name().to_string())
            .unwrap_or_else(|| format!("{:?}", hash))
    }

    /// Human-readable `DataType`, C-style (`const D*`).
    pub fn format_data_type(&self, data_type: &DataType) -> String {
        let constness = if data_type.is_const { "const " } else { "" };
        format!(
            "{}{}{}",
            constness,
            self.type_name(data_type.type_hash),
            data_type.indirection
        )
    }

    /// Human-readable signature, e.g. `D::foo(unsigned)` or `foo(D*, int)`.
    pub fn format_signature(&self, def: &FunctionDef) -> String {
        let params = def
            .params
            .iter()
            .map(|p| self.format_data_type(&p.data_type))
            .collect::<Vec<_>>()
            .join(", ");
        let constness = if def.is_const() { " const" } else { "" };
        match def.owner {
            Some(owner) => format!(
                "{}::{}({}){}",
                self.type_name(owner),
                def.simple_name(),
                params,
                constness
            ),
            None => format!("{}({})", def.name, params),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use extcall_core::{LookupMode, RequiredSignature, Visibility};

    fn registry_with_d() -> (SymbolRegistry, TypeHash) {
        let mut registry = SymbolRegistry::with_primitives();
        let d = registry.register_class(ClassEntry::new("D")).unwrap();
        (registry, d)
    }

    #[test]
    fn duplicate_class_rejected() {
        let (mut registry, _) = registry_with_d();
        let err = registry.register_class(ClassEntry::new("D")).unwrap_err();
        assert!(matches!(err, RegistrationError::DuplicateDefinition { .. }));
    }

    #[test]
    fn const_and_mutable_overloads_coexist() {
        let (mut registry, d) = registry_with_d();
        let w = registry.register_class(ClassEntry::new("W")).unwrap();

        let peek = FunctionDef::free("peek").with_receiver(DataType::pointer(d));
        let peek_const = FunctionDef::free("peek").with_receiver(DataType::const_pointer(d));
        let mutable = registry
            .register_free_function(FunctionEntry::new(peek.clone()))
            .unwrap();
        let constant = registry
            .register_free_function(FunctionEntry::new(peek_const))
            .unwrap();
        assert_ne!(mutable, constant);

        let again = registry
            .register_free_function(FunctionEntry::new(peek))
            .unwrap_err();
        assert!(matches!(again, RegistrationError::DuplicateDefinition { .. }));

        let set = FunctionDef::method(d, "set").with_param(DataType::reference(w));
        let set_const = FunctionDef::method(d, "set").with_param(DataType::const_reference(w));
        assert!(registry.register_member(d, FunctionEntry::new(set)).is_ok());
        assert!(registry.register_member(d, FunctionEntry::new(set_const)).is_ok());
    }

    #[test]
    fn self_inheritance_rejected() {
        let mut registry = SymbolRegistry::new();
        let hash = TypeHash::from_name("Loop");
        let err = registry
            .register_class(ClassEntry::new("Loop").with_base(hash))
            .unwrap_err();
        assert!(matches!(err, RegistrationError::CircularInheritance { .. }));
    }

    #[test]
    fn forward_base_reference_cycle_rejected() {
        let mut registry = SymbolRegistry::new();
        let a = TypeHash::from_name("A");
        let b = TypeHash::from_name("B");
        registry.register_class(ClassEntry::new("A").with_base(b)).unwrap();
        let err = registry
            .register_class(ClassEntry::new("B").with_base(a))
            .unwrap_err();
        assert!(matches!(err, RegistrationError::CircularInheritance { .. }));
    }

    #[test]
    fn member_on_unknown_class_rejected() {
        let mut registry = SymbolRegistry::new();
        let ghost = TypeHash::from_name("Ghost");
        let err = registry
            .register_member(ghost, FunctionEntry::new(FunctionDef::method(ghost, "foo")))
            .unwrap_err();
        assert!(matches!(err, RegistrationError::UnknownType { .. }));
    }

    #[test]
    fn member_cannot_carry_receiver() {
        let (mut registry, d) = registry_with_d();
        let def = FunctionDef::method(d, "foo").with_receiver(DataType::pointer(d));
        let err = registry
            .register_member(d, FunctionEntry::new(def))
            .unwrap_err();
        assert!(matches!(err, RegistrationError::MemberWithReceiver { .. }));
    }

    #[test]
    fn name_hiding_stops_at_most_derived_declaration() {
        let mut registry = SymbolRegistry::with_primitives();
        let base = registry.register_class(ClassEntry::new("Base")).unwrap();
        let derived = registry
            .register_class(ClassEntry::new("Derived").with_base(base))
            .unwrap();

        registry
            .register_member(
                base,
                FunctionEntry::new(
                    FunctionDef::method(base, "f").with_param(DataType::simple(primitives::INT32)),
                ),
            )
            .unwrap();
        let derived_f = registry
            .register_member(derived, FunctionEntry::new(FunctionDef::method(derived, "f")))
            .unwrap();

        let (owner, found) = registry.lookup_members(derived, "f");
        assert_eq!(owner, Some(derived));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].def.func_hash, derived_f);

        let (owner, found) = registry.lookup_members(derived, "g");
        assert_eq!(owner, None);
        assert!(found.is_empty());
    }

    #[test]
    fn inherited_members_found_through_chain() {
        let mut registry = SymbolRegistry::with_primitives();
        let base = registry.register_class(ClassEntry::new("Base")).unwrap();
        let derived = registry
            .register_class(ClassEntry::new("Derived").with_base(base))
            .unwrap();
        registry
            .register_member(base, FunctionEntry::new(FunctionDef::method(base, "size")))
            .unwrap();

        let (owner, found) = registry.lookup_members(derived, "size");
        assert_eq!(owner, Some(base));
        assert_eq!(found.len(), 1);
        assert!(registry.is_derived_from(derived, base));
        assert!(!registry.is_derived_from(base, derived));
    }

    #[test]
    fn extension_receiver_must_be_first() {
        let (mut registry, d) = registry_with_d();
        let def = FunctionDef::free("foo")
            .with_param(DataType::simple(primitives::INT32))
            .with_param(DataType::pointer(d))
            .with_receiver_index(1);
        let err = registry
            .register_free_function(FunctionEntry::new(def))
            .unwrap_err();
        assert!(matches!(err, RegistrationError::ReceiverNotFirst { index: 1, .. }));
    }

    #[test]
    fn extension_receiver_follows_convention() {
        let (mut registry, d) = registry_with_d();
        let by_ref = FunctionDef::free("foo").with_receiver(DataType::reference(d));
        let err = registry
            .register_free_function(FunctionEntry::new(by_ref))
            .unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::ReceiverConventionMismatch { expected: "pointer", .. }
        ));

        let mut by_ref_registry = SymbolRegistry::with_config(
            ExtensionConfig::new().with_receiver_convention(ReceiverConvention::Reference),
        );
        by_ref_registry.register_all_primitives();
        let d = by_ref_registry.register_class(ClassEntry::new("D")).unwrap();
        let by_ref = FunctionDef::free("foo").with_receiver(DataType::reference(d));
        assert!(by_ref_registry.register_free_function(FunctionEntry::new(by_ref)).is_ok());
    }

    #[test]
    fn constrained_parameter_requires_registered_constraint() {
        let (mut registry, _) = registry_with_d();
        let missing = TypeHash::from_constraint("Missing");
        let def = FunctionDef::free("bar")
            .with_receiver(DataType::pointer(primitives::CONSTRAINED))
            .with_constraint(missing);
        let err = registry
            .register_free_function(FunctionEntry::new(def))
            .unwrap_err();
        assert!(matches!(err, RegistrationError::UnknownConstraint { .. }));

        let unconstrained =
            FunctionDef::free("bar").with_receiver(DataType::pointer(primitives::CONSTRAINED));
        let err = registry
            .register_free_function(FunctionEntry::new(unconstrained))
            .unwrap_err();
        assert!(matches!(err, RegistrationError::ConstraintMismatch { .. }));
    }

    #[test]
    fn refinement_flattens_requirements() {
        let mut registry = SymbolRegistry::with_primitives();
        let fooable = registry
            .register_constraint(
                ConstraintEntry::new("Fooable", LookupMode::Member)
                    .with_requirement(RequiredSignature::new("foo")),
            )
            .unwrap();
        let both = registry
            .register_constraint(
                ConstraintEntry::new("FooBarable", LookupMode::Free)
                    .with_requirement(RequiredSignature::new("bar"))
                    .refining(fooable),
            )
            .unwrap();

        let reqs = registry.requirements(both);
        assert_eq!(reqs.len(), 2);
        assert!(reqs.iter().any(|r| r.mode == LookupMode::Free && r.signature.name == "bar"));
        assert!(reqs.iter().any(|r| r.mode == LookupMode::Member && r.signature.name == "foo"));
    }

    #[test]
    fn refining_unknown_constraint_rejected() {
        let mut registry = SymbolRegistry::new();
        let err = registry
            .register_constraint(
                ConstraintEntry::new("Child", LookupMode::Member)
                    .refining(TypeHash::from_constraint("Parent")),
            )
            .unwrap_err();
        assert!(matches!(err, RegistrationError::UnknownConstraint { .. }));
    }

    #[test]
    fn signatures_format_like_declarations() {
        let (mut registry, d) = registry_with_d();
        let member = FunctionDef::method(d, "foo")
            .with_param(DataType::simple(primitives::UINT32))
            .with_visibility(Visibility::Private);
        registry.register_member(d, FunctionEntry::new(member.clone())).unwrap();
        assert_eq!(registry.format_signature(&member), "D::foo(unsigned)");

        let ext = FunctionDef::free("foo")
            .with_param(DataType::simple(primitives::INT32))
            .with_receiver(DataType::pointer(d));
        assert_eq!(registry.format_signature(&ext), "foo(D*, int)");
    }

    #[test]
    fn visible_free_functions_follow_namespaces() {
        let (mut registry, d) = registry_with_d();
        registry
            .register_free_function(FunctionEntry::new(
                FunctionDef::free("Ext::wibble").with_receiver(DataType::pointer(d)),
            ))
            .unwrap();

        assert!(registry.visible_free_functions::<&str>(&[], "wibble").is_empty());
        assert_eq!(registry.visible_free_functions(&["Ext"], "wibble").len(), 1);

        registry.register_using(&["App"], &["Ext"]);
        assert_eq!(registry.visible_free_functions(&["App"], "wibble").len(), 1);
    }
}
