//! Compilation — the resolution engine bound to one snapshot.

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashSet;

use crate::base::TypeKey;
use super::assembly::{AssemblyName, AssemblyReference};
use super::diagnostics::Diagnostic;
use super::error::ResolveError;
use super::ids::TypeId;
use super::input::ProjectContent;
use super::parsed_file::ParsedFile;
use super::resolve::{CacheStats, ResolutionCache, Resolver, Sources, TypeIndex};
use super::resolved::{ResolvedMember, ResolvedTypeDefinition};
use super::unresolved::TypeReference;

/// Answers type-resolution queries against one [`ProjectContent`] snapshot.
///
/// A compilation never changes which snapshot it reads. Results are computed
/// on first request and memoized; asking again for the same type returns the
/// same `Arc`. The cache sits behind a mutex, so a compilation can be shared
/// between threads, and each type is resolved at most once.
///
/// Unresolvable references never fail: they yield the unknown-type
/// placeholder ([`ResolvedTypeDefinition::is_unknown`]). Only malformed query
/// arguments are rejected with a [`ResolveError`].
pub struct Compilation {
    project: ProjectContent,
    /// The snapshot's files and references, in order, frozen for indexing.
    files: Vec<Arc<ParsedFile>>,
    assemblies: Vec<Arc<AssemblyReference>>,
    index: TypeIndex,
    cache: Mutex<ResolutionCache>,
}

impl Compilation {
    pub(crate) fn new(project: ProjectContent) -> Self {
        let _span = tracing::debug_span!("create_compilation", version = project.version()).entered();

        let files: Vec<_> = project.files().cloned().collect();
        let assemblies: Vec<_> = project.assembly_references().cloned().collect();
        let index = TypeIndex::build(&files);

        tracing::debug!(
            files = files.len(),
            assemblies = assemblies.len(),
            source_types = index.len(),
            "created compilation"
        );

        Self {
            project,
            files,
            assemblies,
            index,
            cache: Mutex::new(ResolutionCache::default()),
        }
    }

    // ========================================================================
    // SNAPSHOT
    // ========================================================================

    /// The snapshot this compilation is bound to.
    pub fn project(&self) -> &ProjectContent {
        &self.project
    }

    /// Version of the bound snapshot.
    pub fn version(&self) -> u64 {
        self.project.version()
    }

    /// Name of the assembly being compiled.
    pub fn assembly_name(&self) -> &str {
        self.project.assembly_name()
    }

    /// Identities of the referenced assemblies, in lookup order.
    pub fn referenced_assemblies(&self) -> impl Iterator<Item = &AssemblyName> + '_ {
        self.assemblies.iter().map(|a| a.identity())
    }

    // ========================================================================
    // RESOLUTION
    // ========================================================================

    /// Resolve a type by namespace path, simple name and arity.
    ///
    /// Returns the placeholder when nothing declares the type. Fails only for
    /// an empty name, a dotted name, or a namespace path with an empty segment.
    pub fn resolve(
        &self,
        namespace: &str,
        name: &str,
        arity: u32,
    ) -> Result<Arc<ResolvedTypeDefinition>, ResolveError> {
        self.resolve_key(&TypeKey::new(namespace, name, arity))
    }

    /// Resolve a by-name reference.
    pub fn resolve_reference(
        &self,
        reference: &TypeReference,
    ) -> Result<Arc<ResolvedTypeDefinition>, ResolveError> {
        self.resolve_key(&reference.key())
    }

    /// Resolve a type by key.
    pub fn resolve_key(&self, key: &TypeKey) -> Result<Arc<ResolvedTypeDefinition>, ResolveError> {
        ResolveError::check(key)?;
        let _span = tracing::debug_span!("resolve", %key, version = self.version()).entered();
        Ok(self.resolve_unchecked(key))
    }

    /// Resolve a key taken from declaration data; malformed names simply miss.
    fn resolve_unchecked(&self, key: &TypeKey) -> Arc<ResolvedTypeDefinition> {
        let sources = self.sources();
        let mut cache = self.cache.lock();
        let id = Resolver::new(&sources, &mut cache).resolve(key);
        Self::fetch(&cache, id)
    }

    fn sources(&self) -> Sources<'_> {
        Sources {
            files: &self.files,
            assemblies: &self.assemblies,
            index: &self.index,
            options: self.project.options(),
        }
    }

    fn fetch(cache: &ResolutionCache, id: TypeId) -> Arc<ResolvedTypeDefinition> {
        cache.at(id).clone()
    }

    /// Look up a resolved type by id.
    ///
    /// Ids come from definitions handed out by this compilation; an id issued
    /// by another compilation may point at an unrelated type or nothing.
    pub fn get(&self, id: TypeId) -> Option<Arc<ResolvedTypeDefinition>> {
        self.cache.lock().get(id).cloned()
    }

    /// The resolved direct base types of `def`, in declaration order.
    pub fn direct_base_types(&self, def: &ResolvedTypeDefinition) -> Vec<Arc<ResolvedTypeDefinition>> {
        let cache = self.cache.lock();
        def.base_type_ids()
            .iter()
            .filter_map(|&id| cache.get(id).cloned())
            .collect()
    }

    /// Every type `def` inherits from, directly or not: breadth-first in base
    /// order, each type once. Placeholders appear where a link is broken.
    pub fn all_base_types(&self, def: &ResolvedTypeDefinition) -> Vec<Arc<ResolvedTypeDefinition>> {
        self.cache.lock().all_base_types(def)
    }

    /// Check whether `base` appears in the inheritance closure of `def`.
    pub fn is_derived_from(&self, def: &ResolvedTypeDefinition, base: &ResolvedTypeDefinition) -> bool {
        self.all_base_types(def).iter().any(|t| t.id() == base.id())
    }

    /// Resolve the declared type of a member, if it has one.
    pub fn member_type(&self, member: &ResolvedMember) -> Option<Arc<ResolvedTypeDefinition>> {
        member
            .return_type
            .as_ref()
            .map(|ty| self.resolve_unchecked(&ty.key()))
    }

    /// Resolve every type visible to this compilation.
    ///
    /// Source types come first, in order of first declaration, followed by the
    /// assembly exports that no source declaration or earlier assembly shadows,
    /// in reference order.
    pub fn all_type_definitions(&self) -> Vec<Arc<ResolvedTypeDefinition>> {
        let _span = tracing::debug_span!("all_type_definitions", version = self.version()).entered();

        let mut seen: FxHashSet<TypeKey> = self.index.keys().iter().cloned().collect();
        let mut keys: Vec<TypeKey> = self.index.keys().to_vec();
        for assembly in &self.assemblies {
            for def in assembly.top_level_type_definitions() {
                let key = def.key();
                if seen.insert(key.clone()) {
                    keys.push(key);
                }
            }
        }

        let sources = self.sources();
        let mut cache = self.cache.lock();
        let mut resolver = Resolver::new(&sources, &mut cache);
        let ids: Vec<TypeId> = keys.iter().map(|key| resolver.resolve(key)).collect();
        drop(resolver);
        ids.into_iter().map(|id| Self::fetch(&cache, id)).collect()
    }

    // ========================================================================
    // DIAGNOSTICS
    // ========================================================================

    /// Recoverable conditions recorded so far.
    ///
    /// Resolution is lazy, so this only covers types resolved up to now; use
    /// [`check_all`](Self::check_all) for the whole compilation.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.cache.lock().diagnostics.diagnostics().to_vec()
    }

    /// Resolve every type and return all recoverable conditions.
    pub fn check_all(&self) -> Vec<Diagnostic> {
        self.all_type_definitions();
        self.diagnostics()
    }

    /// Hit/miss counters of the resolution cache.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.lock().stats
    }

    /// Number of resolved types (placeholders included) held by this compilation.
    pub fn resolved_count(&self) -> usize {
        self.cache.lock().len()
    }
}

impl std::fmt::Debug for Compilation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compilation")
            .field("version", &self.version())
            .field("files", &self.files.len())
            .field("assemblies", &self.assemblies.len())
            .finish()
    }
}
