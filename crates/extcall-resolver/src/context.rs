//! ResolutionContext and the call-site description it resolves.
//!
//! One context per compilation unit. It borrows the registry read-only and
//! owns the constraint memo, so it can be shared by reference across threads.

use extcall_core::{CallSiteSummary, DataType, ExtensionConfig, Span, TypeHash};
use extcall_registry::SymbolRegistry;

use crate::concept::ConstraintCache;

/// Where a call expression appears.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallContext {
    /// Enclosing namespace path; decides which extensions are visible.
    pub namespace: Vec<String>,
    /// Class whose member function contains the call, if any.
    pub calling_class: Option<TypeHash>,
    /// Source location of the call.
    pub span: Span,
}

/// One member-call expression `receiver.name(args...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CallSite {
    /// Static type of the receiver expression.
    pub receiver: DataType,
    /// Called name.
    pub name: String,
    /// Static argument types.
    pub args: Vec<DataType>,
    pub context: CallContext,
}

impl CallSite {
    pub fn new(receiver: DataType, name: impl Into<String>) -> Self {
        Self {
            receiver,
            name: name.into(),
            args: Vec::new(),
            context: CallContext::default(),
        }
    }

    pub fn with_arg(mut self, arg: DataType) -> Self {
        self.args.push(arg);
        self
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = DataType>) -> Self {
        self.args.extend(args);
        self
    }

    /// Set the enclosing namespace path, e.g. `&["App", "Ui"]`.
    pub fn in_namespace<S: AsRef<str>>(mut self, path: &[S]) -> Self {
        self.context.namespace = path.iter().map(|s| s.as_ref().to_string()).collect();
        self
    }

    /// The call is made from inside a member function of `class`.
    pub fn from_class(mut self, class: TypeHash) -> Self {
        self.context.calling_class = Some(class);
        self
    }

    pub fn at(mut self, span: Span) -> Self {
        self.context.span = span;
        self
    }
}

/// Resolution state shared by every call site of a compilation unit.
pub struct ResolutionContext<'a> {
    registry: &'a SymbolRegistry,
    constraints: ConstraintCache,
}

impl<'a> ResolutionContext<'a> {
    pub fn new(registry: &'a SymbolRegistry) -> Self {
        Self {
            registry,
            constraints: ConstraintCache::new(),
        }
    }

    pub fn registry(&self) -> &'a SymbolRegistry {
        self.registry
    }

    pub fn config(&self) -> &'a ExtensionConfig {
        self.registry.config()
    }

    /// Memoized constraint results so far.
    pub fn constraint_cache(&self) -> &ConstraintCache {
        &self.constraints
    }

    /// Diagnostic rendering of a call site.
    pub fn summarize(&self, call: &CallSite) -> CallSiteSummary {
        CallSiteSummary {
            name: call.name.clone(),
            receiver: self.registry.format_data_type(&call.receiver),
            args: call
                .args
                .iter()
                .map(|arg| self.registry.format_data_type(arg))
                .collect(),
            span: call.context.span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use extcall_core::{ClassEntry, primitives};

    #[test]
    fn builder_fills_context() {
        let d = TypeHash::from_name("D");
        let call = CallSite::new(DataType::reference(d), "foo")
            .with_arg(DataType::simple(primitives::INT32))
            .in_namespace(&["App"])
            .from_class(d)
            .at(Span::new(3, 9, 5));

        assert_eq!(call.args.len(), 1);
        assert_eq!(call.context.namespace, vec!["App".to_string()]);
        assert_eq!(call.context.calling_class, Some(d));
        assert_eq!(call.context.span, Span::new(3, 9, 5));
    }

    #[test]
    fn summary_renders_types() {
        let mut registry = SymbolRegistry::with_primitives();
        let d = registry.register_class(ClassEntry::new("D")).unwrap();
        let ctx = ResolutionContext::new(&registry);

        let call = CallSite::new(DataType::const_reference(d), "foo")
            .with_args([DataType::simple(primitives::INT32), DataType::simple(primitives::DOUBLE)]);
        let summary = ctx.summarize(&call);
        assert_eq!(summary.to_string(), "'const D&.foo(int, double)'");
    }

    #[test]
    fn context_is_shareable() {
        fn assert_sync<T: Sync + Send>() {}
        assert_sync::<ResolutionContext<'static>>();
        assert_sync::<SymbolRegistry>();
    }
}
