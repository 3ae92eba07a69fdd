//! Callable entries for the registry.
//!
//! A callable is either a member function (it has an `owner`) or a free
//! function. A free function becomes an extension method when its first
//! parameter is marked as the receiver; it may additionally be constrained,
//! in which case parameter 0 has the [`primitives::CONSTRAINED`] placeholder
//! type and accepts any type satisfying the constraint.

use bitflags::bitflags;

use crate::{DataType, QualifiedName, Span, TypeHash, Visibility, primitives};

bitflags! {
    /// Declaration flags on a callable.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FunctionFlags: u8 {
        /// `void f() const`
        const CONST = 1 << 0;
        /// `virtual void f()`
        const VIRTUAL = 1 << 1;
        /// `void f() = delete`
        const DELETED = 1 << 2;
    }
}

/// A function parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Param {
    /// Declared parameter type.
    pub data_type: DataType,
    /// Whether the parameter has a default argument.
    pub has_default: bool,
}

impl Param {
    /// A parameter without a default argument.
    pub fn new(data_type: DataType) -> Self {
        Self {
            data_type,
            has_default: false,
        }
    }

    /// A parameter with a default argument.
    pub fn with_default(data_type: DataType) -> Self {
        Self {
            data_type,
            has_default: true,
        }
    }
}

/// Signature and declaration facts of a callable.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    /// Identity; assigned by the registry on registration.
    pub func_hash: TypeHash,
    /// Qualified name. For members the namespace part is unused.
    pub name: QualifiedName,
    /// Owning class for members, `None` for free functions.
    pub owner: Option<TypeHash>,
    /// Ordered parameters. For extensions this includes the receiver.
    pub params: Vec<Param>,
    /// Return type.
    pub return_type: DataType,
    /// Member visibility (free functions are always public).
    pub visibility: Visibility,
    /// Declaration flags.
    pub flags: FunctionFlags,
    /// Index of the receiver-binding parameter, if this is an extension.
    pub receiver: Option<usize>,
    /// Constraint on parameter 0, if this is a constrained free function.
    pub constraint: Option<TypeHash>,
}

impl FunctionDef {
    /// Start a member function declaration on `owner`.
    pub fn method(owner: TypeHash, name: impl Into<String>) -> Self {
        Self {
            func_hash: TypeHash::EMPTY,
            name: QualifiedName::global(name),
            owner: Some(owner),
            params: Vec::new(),
            return_type: DataType::void(),
            visibility: Visibility::Public,
            flags: FunctionFlags::empty(),
            receiver: None,
            constraint: None,
        }
    }

    /// Start a free function declaration. `name` may be qualified ("Geo::area").
    pub fn free(name: impl Into<QualifiedName>) -> Self {
        Self {
            func_hash: TypeHash::EMPTY,
            name: name.into(),
            owner: None,
            params: Vec::new(),
            return_type: DataType::void(),
            visibility: Visibility::Public,
            flags: FunctionFlags::empty(),
            receiver: None,
            constraint: None,
        }
    }

    // === Builder Methods ===

    /// Append a parameter.
    pub fn with_param(mut self, data_type: DataType) -> Self {
        self.params.push(Param::new(data_type));
        self
    }

    /// Append a parameter with a default argument.
    pub fn with_default_param(mut self, data_type: DataType) -> Self {
        self.params.push(Param::with_default(data_type));
        self
    }

    /// Prepend the receiver-binding parameter and mark it.
    pub fn with_receiver(mut self, data_type: DataType) -> Self {
        self.params.insert(0, Param::new(data_type));
        self.receiver = Some(0);
        self
    }

    /// Mark an existing parameter as the receiver. Only index 0 is legal;
    /// the registry rejects anything else.
    pub fn with_receiver_index(mut self, index: usize) -> Self {
        self.receiver = Some(index);
        self
    }

    /// Constrain parameter 0.
    pub fn with_constraint(mut self, constraint: TypeHash) -> Self {
        self.constraint = Some(constraint);
        self
    }

    /// Set the return type.
    pub fn returning(mut self, return_type: DataType) -> Self {
        self.return_type = return_type;
        self
    }

    /// Set member visibility.
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Mark as a const member function.
    pub fn with_const(mut self) -> Self {
        self.flags |= FunctionFlags::CONST;
        self
    }

    /// Mark as virtual.
    pub fn with_virtual(mut self) -> Self {
        self.flags |= FunctionFlags::VIRTUAL;
        self
    }

    /// Mark as deleted (`= delete`).
    pub fn with_deleted(mut self) -> Self {
        self.flags |= FunctionFlags::DELETED;
        self
    }

    // === Queries ===

    /// Simple name used for call-site lookup.
    pub fn simple_name(&self) -> &str {
        self.name.simple_name()
    }

    pub fn is_member(&self) -> bool {
        self.owner.is_some()
    }

    pub fn is_extension(&self) -> bool {
        self.owner.is_none() && self.receiver.is_some()
    }

    pub fn is_const(&self) -> bool {
        self.flags.contains(FunctionFlags::CONST)
    }

    pub fn is_virtual(&self) -> bool {
        self.flags.contains(FunctionFlags::VIRTUAL)
    }

    pub fn is_deleted(&self) -> bool {
        self.flags.contains(FunctionFlags::DELETED)
    }

    /// The receiver parameter of an extension.
    pub fn receiver_param(&self) -> Option<&Param> {
        self.receiver.and_then(|i| self.params.get(i))
    }

    /// Parameters left for the call's arguments. Parameter 0 of a free
    /// function binds the receiver or the subject of a free-mode requirement.
    pub fn tail_params(&self) -> &[Param] {
        if self.is_member() {
            &self.params
        } else {
            self.params.get(1..).unwrap_or_default()
        }
    }

    /// Whether parameter 0 takes its type from the constraint.
    pub fn has_constrained_first_param(&self) -> bool {
        self.params
            .first()
            .is_some_and(|p| p.data_type.type_hash == primitives::CONSTRAINED)
    }

    /// Compute the identity hash from the declaration.
    pub fn compute_hash(&self) -> TypeHash {
        let mut param_hashes: Vec<TypeHash> = self
            .params
            .iter()
            .map(|p| p.data_type.signature_hash())
            .collect();
        match self.owner {
            Some(owner) => {
                TypeHash::from_method(owner, self.simple_name(), &param_hashes, self.is_const())
            }
            None => {
                // Two constrained overloads differ only by their constraint.
                if let Some(constraint) = self.constraint {
                    param_hashes.push(constraint);
                }
                TypeHash::from_function(&self.name.to_string(), &param_hashes)
            }
        }
    }
}

/// A reference from an extension body to a member of its receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRef {
    /// Referenced member name.
    pub name: String,
    /// Where the body references it.
    pub span: Span,
}

impl MemberRef {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// Registry entry for a callable.
///
/// Combines the definition with where it was declared and, for extension
/// methods, which receiver members the body touches. The latter is consumed
/// once by the definition-time access check.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionEntry {
    /// Signature and flags.
    pub def: FunctionDef,
    /// Declaration site.
    pub span: Span,
    /// Receiver members referenced by the body (extensions only).
    pub body_refs: Vec<MemberRef>,
}

impl FunctionEntry {
    pub fn new(def: FunctionDef) -> Self {
        Self {
            def,
            span: Span::default(),
            body_refs: Vec::new(),
        }
    }

    /// Set the declaration site.
    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Record a body reference to a receiver member.
    pub fn referencing(mut self, member: MemberRef) -> Self {
        self.body_refs.push(member);
        self
    }

    pub fn func_hash(&self) -> TypeHash {
        self.def.func_hash
    }
}

impl From<FunctionDef> for FunctionEntry {
    fn from(def: FunctionDef) -> Self {
        Self::new(def)
    }
}
