//! Errors for malformed resolution queries.

use smol_str::SmolStr;
use thiserror::Error;

use crate::base::{NAMESPACE_SEPARATOR, TypeKey};
use crate::base::name::is_well_formed_namespace;

/// A query that breaks the resolution contract.
///
/// These are caller bugs. A well-formed query for a type that does not exist
/// is *not* an error: it resolves to the unknown-type placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("type name must not be empty")]
    EmptyName,
    #[error("type name `{name}` must be a simple name; pass its namespace separately")]
    QualifiedName { name: SmolStr },
    #[error("namespace path `{namespace}` contains an empty segment")]
    EmptyNamespaceSegment { namespace: SmolStr },
}

impl ResolveError {
    /// Check a query key at the compilation boundary.
    pub(crate) fn check(key: &TypeKey) -> Result<(), ResolveError> {
        if key.name.is_empty() {
            return Err(ResolveError::EmptyName);
        }
        if key.name.contains(NAMESPACE_SEPARATOR) {
            return Err(ResolveError::QualifiedName { name: key.name.clone() });
        }
        if !is_well_formed_namespace(&key.namespace) {
            return Err(ResolveError::EmptyNamespaceSegment {
                namespace: key.namespace.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_keys_pass() {
        assert!(ResolveError::check(&TypeKey::new("", "Foo", 0)).is_ok());
        assert!(ResolveError::check(&TypeKey::new("System.Collections", "List", 1)).is_ok());
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(
            ResolveError::check(&TypeKey::new("System", "", 0)),
            Err(ResolveError::EmptyName)
        );
    }

    #[test]
    fn test_qualified_name() {
        let err = ResolveError::check(&TypeKey::new("", "System.Object", 0)).unwrap_err();
        assert!(matches!(err, ResolveError::QualifiedName { .. }));
        assert!(err.to_string().contains("System.Object"));
    }

    #[test]
    fn test_empty_namespace_segment() {
        let err = ResolveError::check(&TypeKey::new("System..IO", "File", 0)).unwrap_err();
        assert!(matches!(err, ResolveError::EmptyNamespaceSegment { .. }));
    }
}
