use std::fmt;

/// Qualified name for types, callables, and constraints.
///
/// The namespace part doubles as the "point of definition" of a declaration:
/// free-function lookup for a constraint starts from the constraint's
/// namespace, and extension lookup starts from the call site's namespace.
///
/// # Examples
///
/// ```
/// use extcall_core::QualifiedName;
///
/// let shape = QualifiedName::global("Shape");
/// assert_eq!(shape.to_string(), "Shape");
///
/// let area = QualifiedName::new("area", vec!["Geometry".into(), "Ext".into()]);
/// assert_eq!(area.to_string(), "Geometry::Ext::area");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct QualifiedName {
    /// Simple name (e.g., "Shape", "area")
    pub name: String,
    /// Namespace path (e.g., ["Geometry", "Ext"]), empty for the global namespace
    pub namespace: Vec<String>,
}

impl QualifiedName {
    /// Create a new qualified name with namespace.
    pub fn new(name: impl Into<String>, namespace: Vec<String>) -> Self {
        Self {
            name: name.into(),
            namespace,
        }
    }

    /// Create a qualified name in the global namespace.
    pub fn global(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Vec::new(),
        }
    }

    /// Create from a qualified string (e.g., "Geometry::Shape").
    ///
    /// Splits on "::"; the last segment is the name, the rest is the namespace.
    /// A leading "::" is ignored.
    pub fn from_qualified_string(s: &str) -> Self {
        let mut parts: Vec<String> = s
            .split("::")
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        match parts.pop() {
            Some(name) => Self {
                name,
                namespace: parts,
            },
            None => Self::global(""),
        }
    }

    /// Check if this is in the global namespace.
    pub fn is_global(&self) -> bool {
        self.namespace.is_empty()
    }

    /// Get the simple (unqualified) name.
    pub fn simple_name(&self) -> &str {
        &self.name
    }

    /// Get the namespace path.
    pub fn namespace_path(&self) -> &[String] {
        &self.namespace
    }

    /// Get the namespace as a joined string.
    pub fn namespace_string(&self) -> String {
        self.namespace.join("::")
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}::{}", self.namespace.join("::"), self.name)
        }
    }
}

impl From<&str> for QualifiedName {
    fn from(s: &str) -> Self {
        Self::from_qualified_string(s)
    }
}
