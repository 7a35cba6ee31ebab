//! Type resolution — binding type keys to resolved definitions.
//!
//! # Architecture
//!
//! Resolution is split the same way as name lookup in an IDE database:
//!
//! 1. **Index** - [`TypeIndex`] is built once per compilation and maps every
//!    source [`TypeKey`] to its declarations in file order, then declaration
//!    order. Assemblies carry their own index.
//! 2. **Cache** - [`ResolutionCache`] is the compilation's arena of resolved
//!    types plus a key → [`TypeId`] memo table.
//! 3. **Resolver** - [`Resolver`] runs one query against the cache. Base
//!    types are walked with an explicit frame stack; reaching a key that
//!    still has an open frame is a cycle.
//!
//! Lookup order for a key: every source declaration (merged as partial
//! parts), otherwise the first assembly in reference order that exports it,
//! otherwise the unknown-type placeholder.

use std::collections::VecDeque;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

use crate::base::{FileId, TypeKey};
use super::assembly::AssemblyReference;
use super::diagnostics::DiagnosticCollector;
use super::ids::{DeclId, LocalDeclId, TypeId};
use super::options::CompilationOptions;
use super::parsed_file::ParsedFile;
use super::resolved::{ResolvedMember, ResolvedTypeDefinition, TypeOrigin, UnknownReason};
use super::unresolved::{TypeKind, UnresolvedMember, UnresolvedTypeDefinition};

// ============================================================================
// TYPE INDEX
// ============================================================================

/// Source declarations of one snapshot, grouped by key.
#[derive(Clone, Debug, Default)]
pub struct TypeIndex {
    /// Key → declarations in merge order.
    by_key: FxHashMap<TypeKey, Vec<DeclId>>,
    /// Distinct keys in order of first declaration.
    keys: Vec<TypeKey>,
}

impl TypeIndex {
    /// Index the files of a snapshot.
    ///
    /// Keys are extracted per file in parallel; the merge that fixes the order
    /// is sequential.
    pub fn build(files: &[Arc<ParsedFile>]) -> Self {
        let per_file: Vec<Vec<(TypeKey, DeclId)>> = files
            .par_iter()
            .enumerate()
            .map(|(file_idx, file)| {
                let file_id = FileId::new(file_idx as u32);
                file.top_level_type_definitions()
                    .iter()
                    .enumerate()
                    .map(|(local, def)| {
                        (def.key(), DeclId::new(file_id, LocalDeclId::new(local as u32)))
                    })
                    .collect()
            })
            .collect();

        let mut index = Self::default();
        for (key, decl) in per_file.into_iter().flatten() {
            match index.by_key.entry(key) {
                Entry::Occupied(mut entry) => entry.get_mut().push(decl),
                Entry::Vacant(entry) => {
                    index.keys.push(entry.key().clone());
                    entry.insert(vec![decl]);
                }
            }
        }
        index
    }

    /// Declarations of `key`, in merge order. Empty if none.
    pub fn declarations(&self, key: &TypeKey) -> &[DeclId] {
        self.by_key.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Distinct declared keys, in order of first declaration.
    pub fn keys(&self) -> &[TypeKey] {
        &self.keys
    }

    /// Get the number of distinct declared keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if nothing is declared in source.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Everything a resolver reads: the bound snapshot's contents and its index.
pub(crate) struct Sources<'a> {
    pub files: &'a [Arc<ParsedFile>],
    pub assemblies: &'a [Arc<AssemblyReference>],
    pub index: &'a TypeIndex,
    pub options: CompilationOptions,
}

impl<'a> Sources<'a> {
    fn declaration(&self, decl: DeclId) -> &'a UnresolvedTypeDefinition {
        let files: &'a [Arc<ParsedFile>] = self.files;
        &files[decl.file.index() as usize].top_level_type_definitions()[decl.local.index() as usize]
    }
}

// ============================================================================
// CACHE
// ============================================================================

/// Hit/miss counters for a compilation's resolution cache.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    pub fn hit_ratio(&self) -> f64 {
        match self.lookups() {
            0 => 0.0,
            total => self.hits as f64 / total as f64,
        }
    }
}

/// Arena of resolved types plus the memo table keyed by [`TypeKey`].
///
/// Entries are only ever appended; nothing is invalidated for the lifetime of
/// the owning compilation.
#[derive(Debug, Default)]
pub(crate) struct ResolutionCache {
    arena: Vec<Arc<ResolvedTypeDefinition>>,
    by_key: FxHashMap<TypeKey, TypeId>,
    pub diagnostics: DiagnosticCollector,
    pub stats: CacheStats,
}

impl ResolutionCache {
    pub fn get(&self, id: TypeId) -> Option<&Arc<ResolvedTypeDefinition>> {
        self.arena.get(id.index())
    }

    /// Arena access for ids issued by this cache's resolver.
    pub fn at(&self, id: TypeId) -> &Arc<ResolvedTypeDefinition> {
        &self.arena[id.index()]
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    fn alloc(&mut self, build: impl FnOnce(TypeId) -> ResolvedTypeDefinition) -> TypeId {
        let id = TypeId::new(self.arena.len() as u32);
        self.arena.push(Arc::new(build(id)));
        id
    }

    fn is_unresolved(&self, id: TypeId) -> bool {
        self.get(id)
            .is_some_and(|def| def.unknown_reason() == Some(UnknownReason::Unresolved))
    }

    /// Transitive base types of `def`, breadth-first in base order, each once.
    pub fn all_base_types(&self, def: &ResolvedTypeDefinition) -> Vec<Arc<ResolvedTypeDefinition>> {
        let mut seen = FxHashSet::default();
        seen.insert(def.id);
        let mut queue: VecDeque<TypeId> = def.base_types.iter().copied().collect();
        let mut result = Vec::new();

        while let Some(id) = queue.pop_front() {
            if !seen.insert(id) {
                continue;
            }
            let Some(base) = self.get(id) else {
                continue;
            };
            queue.extend(base.base_types.iter().copied());
            result.push(base.clone());
        }
        result
    }
}

// ============================================================================
// RESOLVER
// ============================================================================

/// Where a key's declaration was found.
enum Lookup<'a> {
    Source(&'a [DeclId]),
    Assembly(&'a AssemblyReference, &'a UnresolvedTypeDefinition),
    Missing,
}

/// A base type reference waiting to be resolved.
struct BaseRef {
    key: TypeKey,
    /// File of the declaring part, for diagnostics.
    file: Option<SmolStr>,
    /// `false` for implicit roots added by [`CompilationOptions::implicit_base_types`].
    explicit: bool,
}

/// A resolved type before it has been given its slot in the arena.
struct Draft<'a> {
    kind: TypeKind,
    origin: TypeOrigin,
    parts: Vec<DeclId>,
    base_types: Vec<TypeId>,
    members: Vec<(&'a UnresolvedMember, Option<SmolStr>)>,
}

impl Draft<'_> {
    fn finish(self, id: TypeId, key: TypeKey) -> ResolvedTypeDefinition {
        let members = self
            .members
            .into_iter()
            .map(|(member, file)| ResolvedMember::from_unresolved(member, id, file))
            .collect();
        ResolvedTypeDefinition {
            id,
            key,
            kind: Some(self.kind),
            origin: self.origin,
            parts: self.parts,
            base_types: self.base_types,
            members,
        }
    }
}

/// One type on the resolution stack, waiting for its base types.
struct Frame<'a> {
    key: TypeKey,
    /// `None` when nothing declares the key.
    draft: Option<Draft<'a>>,
    pending: std::vec::IntoIter<BaseRef>,
    /// The base reference whose frame sits directly above this one.
    awaiting: Option<BaseRef>,
}

impl Frame<'_> {
    fn push_base(&mut self, id: TypeId) {
        if let Some(draft) = &mut self.draft {
            draft.base_types.push(id);
        }
    }
}

/// Runs resolution queries against one compilation's cache.
///
/// The caller holds the cache exclusively for the duration of the query, so
/// each key is resolved at most once (single flight). Base types are walked
/// with an explicit stack of [`Frame`]s, so inheritance depth is bounded by
/// memory, not by the native call stack.
pub(crate) struct Resolver<'s, 'c> {
    sources: &'s Sources<'s>,
    cache: &'c mut ResolutionCache,
    /// Keys with an open frame.
    in_progress: FxHashSet<TypeKey>,
}

impl<'s, 'c> Resolver<'s, 'c> {
    pub fn new(sources: &'s Sources<'s>, cache: &'c mut ResolutionCache) -> Self {
        Self {
            sources,
            cache,
            in_progress: FxHashSet::default(),
        }
    }

    /// Resolve a key, returning the memoized result if there is one.
    pub fn resolve(&mut self, key: &TypeKey) -> TypeId {
        if let Some(id) = self.memoized(key) {
            return id;
        }

        let mut current = self.open(key.clone());
        let mut parents: Vec<Frame<'s>> = Vec::new();
        loop {
            if let Some(base) = current.pending.next() {
                if self.in_progress.contains(&base.key) {
                    let id = self.break_cycle(&current.key, base, parents.len() + 1);
                    current.push_base(id);
                } else if let Some(id) = self.memoized(&base.key) {
                    self.report_unresolved(&current.key, base, id);
                    current.push_base(id);
                } else {
                    let child = self.open(base.key.clone());
                    current.awaiting = Some(base);
                    parents.push(std::mem::replace(&mut current, child));
                }
                continue;
            }

            let id = self.close(current);
            match parents.pop() {
                None => return id,
                Some(mut parent) => {
                    if let Some(base) = parent.awaiting.take() {
                        self.report_unresolved(&parent.key, base, id);
                    }
                    parent.push_base(id);
                    current = parent;
                }
            }
        }
    }

    fn memoized(&mut self, key: &TypeKey) -> Option<TypeId> {
        let id = *self.cache.by_key.get(key)?;
        self.cache.stats.hits += 1;
        tracing::trace!(target: "typesys::cache", cache_hit = true, %key, ?id);
        Some(id)
    }

    /// Start resolving a key that missed the cache.
    fn open(&mut self, key: TypeKey) -> Frame<'s> {
        self.cache.stats.misses += 1;
        self.in_progress.insert(key.clone());

        let (draft, base_refs) = match self.lookup(&key) {
            Lookup::Source(decls) => {
                let (draft, base_refs) = self.resolve_source(&key, decls);
                (Some(draft), base_refs)
            }
            Lookup::Assembly(assembly, def) => {
                let (draft, base_refs) = self.resolve_assembly(&key, assembly, def);
                (Some(draft), base_refs)
            }
            Lookup::Missing => (None, Vec::new()),
        };

        Frame {
            key,
            draft,
            pending: base_refs.into_iter(),
            awaiting: None,
        }
    }

    /// Give a finished frame its arena slot and memoize it.
    fn close(&mut self, frame: Frame<'s>) -> TypeId {
        let Frame { key, draft, .. } = frame;
        self.in_progress.remove(&key);

        let id = match draft {
            Some(draft) => self.cache.alloc(|id| draft.finish(id, key.clone())),
            None => self.cache.alloc(|id| {
                ResolvedTypeDefinition::placeholder(id, key.clone(), UnknownReason::Unresolved)
            }),
        };
        tracing::trace!(target: "typesys::cache", cache_hit = false, %key, ?id);
        self.cache.by_key.insert(key, id);
        id
    }

    fn lookup(&self, key: &TypeKey) -> Lookup<'s> {
        let sources = self.sources;
        let decls = sources.index.declarations(key);
        if !decls.is_empty() {
            return Lookup::Source(decls);
        }
        sources
            .assemblies
            .iter()
            .find_map(|assembly| assembly.find(key).map(|def| Lookup::Assembly(assembly.as_ref(), def)))
            .unwrap_or(Lookup::Missing)
    }

    /// Merge the source declarations of `key`; bases come back unresolved.
    fn resolve_source(&mut self, key: &TypeKey, decls: &'s [DeclId]) -> (Draft<'s>, Vec<BaseRef>) {
        let sources = self.sources;
        let parts = self.select_parts(key, decls);

        let first = sources.declaration(parts[0]);
        let mut base_refs: Vec<BaseRef> = Vec::new();
        let mut members = Vec::new();
        let mut files: Vec<SmolStr> = Vec::new();

        for &decl in &parts {
            let def = sources.declaration(decl);
            if def.kind != first.kind {
                self.cache.diagnostics.conflicting_kinds(
                    def.declaring_file.clone(),
                    key,
                    first.kind.display(),
                    def.kind.display(),
                );
            }
            for base in &def.base_types {
                let base_key = base.key();
                if base_refs.iter().all(|b| b.key != base_key) {
                    base_refs.push(BaseRef {
                        key: base_key,
                        file: def.declaring_file.clone(),
                        explicit: true,
                    });
                }
            }
            members.extend(def.members.iter().map(|m| (m, def.declaring_file.clone())));
            if let Some(file) = &def.declaring_file {
                if !files.contains(file) {
                    files.push(file.clone());
                }
            }
        }

        self.add_implicit_base(key, first.kind, first.declaring_file.clone(), &mut base_refs);

        let draft = Draft {
            kind: first.kind,
            origin: TypeOrigin::Source { files },
            parts,
            base_types: Vec::with_capacity(base_refs.len()),
            members,
        };
        (draft, base_refs)
    }

    /// Choose which declarations merge, reporting the ones that do not belong.
    fn select_parts(&mut self, key: &TypeKey, decls: &'s [DeclId]) -> Vec<DeclId> {
        let sources = self.sources;
        let first = sources.declaration(decls[0]);

        if !sources.options.require_partial_modifier {
            for &decl in &decls[1..] {
                let def = sources.declaration(decl);
                if !(first.is_partial && def.is_partial) {
                    self.cache.diagnostics.duplicate_declaration(
                        def.declaring_file.clone(),
                        key,
                        first.declaring_file.clone(),
                    );
                }
            }
            return decls.to_vec();
        }

        let (parts, excluded): (Vec<DeclId>, Vec<DeclId>) = if first.is_partial {
            decls
                .iter()
                .partition(|&&decl| sources.declaration(decl).is_partial)
        } else {
            (vec![decls[0]], decls[1..].to_vec())
        };
        for decl in excluded {
            self.cache.diagnostics.duplicate_declaration(
                sources.declaration(decl).declaring_file.clone(),
                key,
                first.declaring_file.clone(),
            );
        }
        parts
    }

    fn resolve_assembly(
        &mut self,
        key: &TypeKey,
        assembly: &'s AssemblyReference,
        def: &'s UnresolvedTypeDefinition,
    ) -> (Draft<'s>, Vec<BaseRef>) {
        let mut base_refs: Vec<BaseRef> = Vec::new();
        for base in &def.base_types {
            let base_key = base.key();
            if base_refs.iter().all(|b| b.key != base_key) {
                base_refs.push(BaseRef { key: base_key, file: None, explicit: true });
            }
        }
        self.add_implicit_base(key, def.kind, None, &mut base_refs);

        let draft = Draft {
            kind: def.kind,
            origin: TypeOrigin::Assembly(assembly.identity().clone()),
            parts: Vec::new(),
            base_types: Vec::with_capacity(base_refs.len()),
            members: def.members.iter().map(|m| (m, None)).collect(),
        };
        (draft, base_refs)
    }

    fn add_implicit_base(
        &self,
        key: &TypeKey,
        kind: TypeKind,
        file: Option<SmolStr>,
        base_refs: &mut Vec<BaseRef>,
    ) {
        if !self.sources.options.implicit_base_types || !base_refs.is_empty() {
            return;
        }
        if let Some(implicit) = kind.implicit_base_type() {
            let implicit = implicit.key();
            if implicit != *key {
                base_refs.push(BaseRef { key: implicit, file, explicit: false });
            }
        }
    }

    /// Substitute the placeholder for a base reference that closes a cycle.
    fn break_cycle(&mut self, subject: &TypeKey, base: BaseRef, depth: usize) -> TypeId {
        tracing::debug!(%subject, base = %base.key, depth, "inheritance cycle; substituting unknown type");
        self.cache
            .diagnostics
            .circular_base_type(base.file, subject, &base.key);
        let key = base.key;
        self.cache
            .alloc(|id| ResolvedTypeDefinition::placeholder(id, key, UnknownReason::Cycle))
    }

    fn report_unresolved(&mut self, subject: &TypeKey, base: BaseRef, id: TypeId) {
        if base.explicit && self.cache.is_unresolved(id) {
            self.cache
                .diagnostics
                .unresolved_base_type(base.file, subject, &base.key);
        }
    }
}
