//! Project host holding the current snapshot.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::hir::{AssemblyReference, Compilation, ParsedFile, ProjectContent};

/// Owns the latest [`ProjectContent`] and the compilation built from it.
///
/// Writers replace the snapshot under a write lock; readers clone it (or the
/// compilation) under a read lock and keep working on their copy while newer
/// versions are published. The compilation is built on first request after
/// each change and shared by every caller until the next change.
#[derive(Debug, Default)]
pub struct ProjectHost {
    inner: RwLock<HostInner>,
}

#[derive(Debug, Default)]
struct HostInner {
    project: ProjectContent,
    /// Compilation for `project`, if one has been requested since it changed.
    compilation: Option<Arc<Compilation>>,
}

impl ProjectHost {
    /// Create a host starting from `project`.
    pub fn new(project: ProjectContent) -> Self {
        Self {
            inner: RwLock::new(HostInner {
                project,
                compilation: None,
            }),
        }
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> ProjectContent {
        self.inner.read().project.clone()
    }

    /// Version of the current snapshot.
    pub fn version(&self) -> u64 {
        self.inner.read().project.version()
    }

    /// Replace the snapshot with `change(current)` and return the new version.
    ///
    /// The change runs under the write lock, so concurrent updates are applied
    /// one after another and none is lost. Every call publishes a strictly
    /// newer version: a result numbered at or below the current version is
    /// renumbered to follow it. The cached compilation is always dropped.
    pub fn apply(&self, change: impl FnOnce(&ProjectContent) -> ProjectContent) -> u64 {
        let mut inner = self.inner.write();
        let current = inner.project.version();
        let next = change(&inner.project).published_after(current);
        let version = next.version();
        inner.compilation = None;
        inner.project = next;
        tracing::debug!(version, "published project snapshot");
        version
    }

    /// Insert or replace a parsed file.
    pub fn set_file(&self, file: impl Into<Arc<ParsedFile>>) -> u64 {
        let file = file.into();
        self.apply(|project| project.with_updated_file(file))
    }

    /// Remove a parsed file by identity.
    pub fn remove_file(&self, identity: &str) -> u64 {
        self.apply(|project| project.without_file(identity))
    }

    /// Add assembly references.
    pub fn add_assembly_references<I, R>(&self, references: I) -> u64
    where
        I: IntoIterator<Item = R>,
        R: Into<Arc<AssemblyReference>>,
    {
        self.apply(|project| project.with_assembly_references(references))
    }

    /// The compilation for the current snapshot.
    pub fn compilation(&self) -> Arc<Compilation> {
        // Fast path: read lock
        {
            let inner = self.inner.read();
            if let Some(compilation) = &inner.compilation {
                return compilation.clone();
            }
        }

        // Slow path: write lock
        let mut inner = self.inner.write();

        // Double-check
        if let Some(compilation) = &inner.compilation {
            return compilation.clone();
        }

        let compilation = Arc::new(inner.project.create_compilation());
        inner.compilation = Some(compilation.clone());
        compilation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::UnresolvedTypeDefinition;

    fn file(identity: &str, name: &str) -> ParsedFile {
        ParsedFile::new(identity, [UnresolvedTypeDefinition::class("", name)])
    }

    #[test]
    fn test_compilation_is_shared_until_change() {
        let host = ProjectHost::default();
        host.set_file(file("a.cs", "A"));

        let first = host.compilation();
        let second = host.compilation();
        assert!(Arc::ptr_eq(&first, &second));

        host.set_file(file("b.cs", "B"));
        let third = host.compilation();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(third.version(), host.version());
    }

    #[test]
    fn test_old_compilation_keeps_its_snapshot() {
        let host = ProjectHost::default();
        host.set_file(file("a.cs", "A"));
        let before = host.compilation();

        host.remove_file("a.cs");
        let after = host.compilation();

        assert!(!before.resolve("", "A", 0).unwrap().is_unknown());
        assert!(after.resolve("", "A", 0).unwrap().is_unknown());
    }

    #[test]
    fn test_apply_with_same_version_replaces_compilation() {
        let host = ProjectHost::default();
        host.set_file(file("a.cs", "A"));
        let before = host.compilation();

        let unrelated = ProjectContent::new().with_updated_file(file("b.cs", "B"));
        assert_eq!(unrelated.version(), host.version());
        assert_eq!(host.apply(|_| unrelated), 2);

        let after = host.compilation();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(after.version(), 2);
        assert!(!after.resolve("", "B", 0).unwrap().is_unknown());
        assert!(after.resolve("", "A", 0).unwrap().is_unknown());
    }

    #[test]
    fn test_apply_never_moves_version_back() {
        let host = ProjectHost::default();
        host.set_file(file("a.cs", "A"));
        host.set_file(file("b.cs", "B"));

        assert_eq!(host.apply(|_| ProjectContent::new()), 3);
        assert_eq!(host.snapshot().file_count(), 0);
        assert_eq!(host.compilation().version(), 3);
    }

    #[test]
    fn test_apply_returns_new_version() {
        let host = ProjectHost::default();
        assert_eq!(host.version(), 0);
        assert_eq!(host.set_file(file("a.cs", "A")), 1);
        assert_eq!(host.apply(|p| p.with_assembly_name("App")), 2);
        assert_eq!(host.snapshot().assembly_name(), "App");
    }
}
