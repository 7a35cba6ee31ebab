//! Project content — the versioned input snapshot of a compilation.

use std::sync::Arc;

use indexmap::IndexMap;
use smol_str::SmolStr;

use super::assembly::{AssemblyName, AssemblyReference};
use super::compilation::Compilation;
use super::options::CompilationOptions;
use super::parsed_file::ParsedFile;
use super::unresolved::UnresolvedTypeDefinition;

/// One immutable version of the set of parsed files and assembly references
/// that make up a project.
///
/// Every update method returns a *new* snapshot and leaves `self` untouched,
/// so a snapshot (and any [`Compilation`] built from it) can be read from any
/// number of threads while an editor keeps producing newer versions.
///
/// Parsed files and assembly references are held behind `Arc` and shared
/// between a snapshot and its successors; an update copies the ordered maps of
/// pointers, never a file or an assembly. Editing a file leaves the reference
/// map itself shared, and changing references leaves the file map shared.
#[derive(Clone, Debug, Default)]
pub struct ProjectContent {
    /// Identity → file, in insertion order.
    files: Arc<IndexMap<SmolStr, Arc<ParsedFile>>>,
    /// Identity → assembly, in insertion order.
    assemblies: Arc<IndexMap<AssemblyName, Arc<AssemblyReference>>>,
    assembly_name: SmolStr,
    project_file_name: Option<SmolStr>,
    options: CompilationOptions,
    version: u64,
}

impl ProjectContent {
    /// Create an empty project content at version 0.
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // UPDATES
    // ========================================================================

    /// Insert or replace a parsed file.
    ///
    /// A replaced file keeps its position in the file order; a new file is
    /// appended. Replacing an identity that is not present is an add.
    pub fn with_updated_file(&self, file: impl Into<Arc<ParsedFile>>) -> Self {
        let file = file.into();
        let mut files = (*self.files).clone();
        let replaced = files.insert(SmolStr::new(file.identity()), file.clone()).is_some();

        let next = self.successor().with_files(files);
        tracing::debug!(
            file = file.identity(),
            replaced,
            version = next.version,
            "updated parsed file"
        );
        next
    }

    /// Insert or replace several parsed files in one step.
    pub fn with_updated_files<I, F>(&self, files: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Arc<ParsedFile>>,
    {
        let mut map = (*self.files).clone();
        let mut count = 0usize;
        for file in files {
            let file = file.into();
            map.insert(SmolStr::new(file.identity()), file);
            count += 1;
        }

        let next = self.successor().with_files(map);
        tracing::debug!(count, version = next.version, "updated parsed files");
        next
    }

    /// Remove a parsed file. Removing an absent identity is not an error.
    ///
    /// The remaining files keep their relative order.
    pub fn without_file(&self, identity: &str) -> Self {
        let removed = self.files.contains_key(identity);
        let next = if removed {
            let mut files = (*self.files).clone();
            files.shift_remove(identity);
            self.successor().with_files(files)
        } else {
            self.successor()
        };
        tracing::debug!(file = identity, removed, version = next.version, "removed parsed file");
        next
    }

    /// Replace, rename, add or remove a file in one step.
    ///
    /// - `(Some(old), Some(new))` with the same identity replaces in place.
    /// - `(Some(old), Some(new))` with different identities removes `old` and
    ///   adds `new` at the end.
    /// - `(None, Some(new))` adds or replaces `new`.
    /// - `(Some(old), None)` removes `old`.
    /// - `(None, None)` only advances the version.
    pub fn update_file(&self, old_identity: Option<&str>, new_file: Option<ParsedFile>) -> Self {
        let mut files = (*self.files).clone();
        match (old_identity, new_file) {
            (Some(old), Some(new)) if old == new.identity() => {
                files.insert(SmolStr::new(old), Arc::new(new));
            }
            (old, new) => {
                if let Some(old) = old {
                    files.shift_remove(old);
                }
                if let Some(new) = new {
                    files.insert(SmolStr::new(new.identity()), Arc::new(new));
                }
            }
        }

        let next = self.successor().with_files(files);
        tracing::debug!(old = ?old_identity, version = next.version, "updated project content");
        next
    }

    /// Add assembly references, deduplicated by identity.
    ///
    /// References are kept in the order they were first added. When an
    /// identity is already present, the newly supplied reference replaces the
    /// stored value but keeps the original position (last-added wins).
    /// Assemblies are expected to be stable once loaded, so in practice both
    /// values describe the same metadata.
    pub fn with_assembly_references<I, R>(&self, references: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Arc<AssemblyReference>>,
    {
        let mut assemblies = (*self.assemblies).clone();
        let mut added = 0usize;
        for reference in references {
            let reference = reference.into();
            if assemblies
                .insert(reference.identity().clone(), reference)
                .is_none()
            {
                added += 1;
            }
        }

        let mut next = self.successor();
        next.assemblies = Arc::new(assemblies);
        tracing::debug!(
            added,
            total = next.assemblies.len(),
            version = next.version,
            "added assembly references"
        );
        next
    }

    /// Remove assembly references by identity; absent identities are ignored.
    pub fn without_assembly_references<'a, I>(&self, identities: I) -> Self
    where
        I: IntoIterator<Item = &'a AssemblyName>,
    {
        let mut assemblies = (*self.assemblies).clone();
        for identity in identities {
            assemblies.shift_remove(identity);
        }

        let mut next = self.successor();
        next.assemblies = Arc::new(assemblies);
        tracing::debug!(
            total = next.assemblies.len(),
            version = next.version,
            "removed assembly references"
        );
        next
    }

    /// Set the name of the assembly this project compiles to.
    pub fn with_assembly_name(&self, name: impl Into<SmolStr>) -> Self {
        let mut next = self.successor();
        next.assembly_name = name.into();
        next
    }

    /// Set the path of the project file this content was loaded from.
    pub fn with_project_file_name(&self, path: impl Into<SmolStr>) -> Self {
        let mut next = self.successor();
        next.project_file_name = Some(path.into());
        next
    }

    /// Replace the compilation options.
    pub fn with_options(&self, options: CompilationOptions) -> Self {
        let mut next = self.successor();
        next.options = options;
        next
    }

    /// Build a new compilation bound to this snapshot.
    ///
    /// Every call returns an independent compilation with its own cache.
    pub fn create_compilation(&self) -> Compilation {
        Compilation::new(self.clone())
    }

    /// A copy of this snapshot with the version advanced; shares everything.
    fn successor(&self) -> Self {
        Self {
            version: self.version + 1,
            ..self.clone()
        }
    }

    /// Renumber this snapshot to follow version `floor`, if it does not already.
    pub(crate) fn published_after(mut self, floor: u64) -> Self {
        self.version = self.version.max(floor + 1);
        self
    }

    fn with_files(mut self, files: IndexMap<SmolStr, Arc<ParsedFile>>) -> Self {
        self.files = Arc::new(files);
        self
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    /// Monotonically increasing version marker; every update adds one.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Get a parsed file by identity.
    pub fn file(&self, identity: &str) -> Option<&Arc<ParsedFile>> {
        self.files.get(identity)
    }

    /// Check if a file with this identity is present.
    pub fn contains_file(&self, identity: &str) -> bool {
        self.files.contains_key(identity)
    }

    /// Iterate over parsed files in insertion order.
    pub fn files(&self) -> impl Iterator<Item = &Arc<ParsedFile>> + '_ {
        self.files.values()
    }

    /// Get the number of parsed files.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Iterate over assembly references in insertion order.
    pub fn assembly_references(&self) -> impl Iterator<Item = &Arc<AssemblyReference>> + '_ {
        self.assemblies.values()
    }

    /// Get an assembly reference by identity.
    pub fn assembly_reference(&self, identity: &AssemblyName) -> Option<&Arc<AssemblyReference>> {
        self.assemblies.get(identity)
    }

    /// Get the number of assembly references.
    pub fn assembly_reference_count(&self) -> usize {
        self.assemblies.len()
    }

    /// Name of the assembly this project compiles to.
    pub fn assembly_name(&self) -> &str {
        &self.assembly_name
    }

    /// Path of the project file, if known.
    pub fn project_file_name(&self) -> Option<&str> {
        self.project_file_name.as_deref()
    }

    /// Options every compilation of this snapshot resolves with.
    pub fn options(&self) -> CompilationOptions {
        self.options
    }

    /// All source declarations: file order, then declaration order.
    pub fn top_level_type_definitions(&self) -> impl Iterator<Item = &UnresolvedTypeDefinition> + '_ {
        self.files
            .values()
            .flat_map(|file| file.top_level_type_definitions().iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::assembly::Version;

    fn file(identity: &str, names: &[&str]) -> ParsedFile {
        ParsedFile::new(
            identity,
            names.iter().map(|n| UnresolvedTypeDefinition::class("", *n)),
        )
    }

    fn asm(name: &str) -> AssemblyReference {
        AssemblyReference::new(AssemblyName::new(name, Version::new(1, 0, 0, 0)), [])
    }

    #[test]
    fn test_update_does_not_touch_receiver() {
        let pc = ProjectContent::new();
        let next = pc.with_updated_file(file("a.cs", &["A"]));

        assert_eq!(pc.file_count(), 0);
        assert_eq!(next.file_count(), 1);
        assert_eq!(next.version(), pc.version() + 1);
    }

    #[test]
    fn test_replace_keeps_position() {
        let pc = ProjectContent::new()
            .with_updated_file(file("a.cs", &["A"]))
            .with_updated_file(file("b.cs", &["B"]))
            .with_updated_file(file("a.cs", &["A2"]));

        let order: Vec<_> = pc.files().map(|f| f.identity().to_string()).collect();
        assert_eq!(order, vec!["a.cs", "b.cs"]);
        assert_eq!(pc.file("a.cs").map(|f| f.top_level_type_definitions()[0].name.as_str()), Some("A2"));
    }

    #[test]
    fn test_unchanged_files_are_shared() {
        let pc = ProjectContent::new()
            .with_updated_file(file("a.cs", &["A"]))
            .with_updated_file(file("b.cs", &["B"]));
        let next = pc.with_updated_file(file("b.cs", &["B2"]));

        assert!(Arc::ptr_eq(pc.file("a.cs").unwrap(), next.file("a.cs").unwrap()));
        assert!(!Arc::ptr_eq(pc.file("b.cs").unwrap(), next.file("b.cs").unwrap()));
        assert!(Arc::ptr_eq(&pc.assemblies, &next.assemblies));
    }

    #[test]
    fn test_without_file_preserves_order() {
        let pc = ProjectContent::new()
            .with_updated_files([file("a.cs", &[]), file("b.cs", &[]), file("c.cs", &[])])
            .without_file("a.cs");

        let order: Vec<_> = pc.files().map(|f| f.identity().to_string()).collect();
        assert_eq!(order, vec!["b.cs", "c.cs"]);
    }

    #[test]
    fn test_without_absent_file_is_noop() {
        let pc = ProjectContent::new().with_updated_file(file("a.cs", &["A"]));
        let next = pc.without_file("missing.cs");

        assert_eq!(next.file_count(), 1);
        assert_eq!(next.version(), pc.version() + 1);
        assert!(Arc::ptr_eq(&pc.files, &next.files));
    }

    #[test]
    fn test_update_file_rename() {
        let pc = ProjectContent::new()
            .with_updated_files([file("a.cs", &["A"]), file("b.cs", &["B"])])
            .update_file(Some("a.cs"), Some(file("z.cs", &["A"])));

        let order: Vec<_> = pc.files().map(|f| f.identity().to_string()).collect();
        assert_eq!(order, vec!["b.cs", "z.cs"]);
    }

    #[test]
    fn test_update_file_remove_only() {
        let pc = ProjectContent::new()
            .with_updated_file(file("a.cs", &["A"]))
            .update_file(Some("a.cs"), None);
        assert_eq!(pc.file_count(), 0);
    }

    #[test]
    fn test_assembly_references_dedup_last_wins_first_position() {
        let first = Arc::new(asm("mscorlib"));
        let second = Arc::new(asm("mscorlib"));
        let pc = ProjectContent::new()
            .with_assembly_references([first.clone(), Arc::new(asm("System"))])
            .with_assembly_references([second.clone()]);

        assert_eq!(pc.assembly_reference_count(), 2);
        let refs: Vec<_> = pc.assembly_references().collect();
        assert_eq!(refs[0].identity().name.as_str(), "mscorlib");
        assert!(Arc::ptr_eq(refs[0], &second));
    }

    #[test]
    fn test_without_assembly_references() {
        let pc = ProjectContent::new().with_assembly_references([asm("a"), asm("b")]);
        let a = AssemblyName::new("a", Version::new(1, 0, 0, 0));
        let next = pc.without_assembly_references([&a]);

        assert_eq!(next.assembly_reference_count(), 1);
        assert!(next.assembly_reference(&a).is_none());
        assert_eq!(pc.assembly_reference_count(), 2);
    }

    #[test]
    fn test_metadata_setters() {
        let pc = ProjectContent::new()
            .with_assembly_name("MyLib")
            .with_project_file_name("MyLib.csproj");
        assert_eq!(pc.assembly_name(), "MyLib");
        assert_eq!(pc.project_file_name(), Some("MyLib.csproj"));
        assert_eq!(pc.version(), 2);
    }

    #[test]
    fn test_top_level_type_definitions_order() {
        let pc = ProjectContent::new()
            .with_updated_file(file("b.cs", &["B1", "B2"]))
            .with_updated_file(file("a.cs", &["A1"]));
        let names: Vec<_> = pc.top_level_type_definitions().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["B1", "B2", "A1"]);
    }
}
