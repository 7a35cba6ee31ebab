//! Type names and lookup keys.

use std::fmt;

use smol_str::SmolStr;

/// Separator between namespace segments (`System.Collections`).
pub const NAMESPACE_SEPARATOR: char = '.';

/// The identity of a type for lookup and caching purposes.
///
/// Two declarations with the same namespace path, simple name and arity denote
/// the same logical type (possibly split across partial declarations).
/// Comparisons are ordinal.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey {
    /// Dotted namespace path; empty for the global namespace.
    pub namespace: SmolStr,
    /// Simple (unqualified) name.
    pub name: SmolStr,
    /// Number of type parameters.
    pub arity: u32,
}

impl TypeKey {
    /// Create a new key.
    pub fn new(namespace: impl Into<SmolStr>, name: impl Into<SmolStr>, arity: u32) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            arity,
        }
    }

    /// The namespace-qualified name, without arity (`System.Object`).
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.to_string()
        } else {
            format!("{}{}{}", self.namespace, NAMESPACE_SEPARATOR, self.name)
        }
    }

    /// The name as it appears in metadata (`List`1` for arity one).
    pub fn reflection_name(&self) -> String {
        if self.arity == 0 {
            self.full_name()
        } else {
            format!("{}`{}", self.full_name(), self.arity)
        }
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.reflection_name())
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reflection_name())
    }
}

/// Iterate over the segments of a namespace path.
///
/// The global namespace (empty string) has no segments.
pub fn namespace_segments(namespace: &str) -> impl Iterator<Item = &str> {
    namespace
        .split(NAMESPACE_SEPARATOR)
        .filter(move |_| !namespace.is_empty())
}

/// Check that every segment of a non-empty namespace path is non-empty.
pub fn is_well_formed_namespace(namespace: &str) -> bool {
    namespace_segments(namespace).all(|segment| !segment.is_empty())
}

/// Split `System.Collections.Generic.List` into namespace and simple name.
pub fn split_full_name(full_name: &str) -> (&str, &str) {
    match full_name.rfind(NAMESPACE_SEPARATOR) {
        Some(idx) => (&full_name[..idx], &full_name[idx + 1..]),
        None => ("", full_name),
    }
}
