//! System-wide extension-method policy.
//!
//! Fixed once per program: the registry owns the config, validates
//! declarations against it, and every resolution context reads it back.

/// How the receiver is passed to an extension method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReceiverConvention {
    /// `void foo(D* self, int)`, called as `foo(&d, 3)`.
    #[default]
    Pointer,
    /// `void foo(D& self, int)`, called as `foo(d, 3)`.
    Reference,
}

/// Configuration for registration and resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionConfig {
    /// Receiver passing convention for every extension method.
    pub receiver_convention: ReceiverConvention,
    /// Cache constraint satisfaction per (constraint, type).
    pub memoize_constraints: bool,
    /// Nesting limit for constraint checks that recurse through
    /// constrained free functions.
    pub max_constraint_depth: usize,
}

impl ExtensionConfig {
    pub fn new() -> Self {
        Self {
            receiver_convention: ReceiverConvention::Pointer,
            memoize_constraints: true,
            max_constraint_depth: 16,
        }
    }

    pub fn with_receiver_convention(mut self, convention: ReceiverConvention) -> Self {
        self.receiver_convention = convention;
        self
    }

    pub fn with_memoization(mut self, enabled: bool) -> Self {
        self.memoize_constraints = enabled;
        self
    }

    pub fn with_max_constraint_depth(mut self, depth: usize) -> Self {
        self.max_constraint_depth = depth;
        self
    }
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self::new()
    }
}
