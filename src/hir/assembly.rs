//! Assembly references — read-only metadata produced by an external loader.

use std::fmt;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::base::TypeKey;
use super::unresolved::UnresolvedTypeDefinition;

/// A four-part assembly version (`major.minor.build.revision`).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version {
    pub major: u16,
    pub minor: u16,
    pub build: u16,
    pub revision: u16,
}

impl Version {
    pub const fn new(major: u16, minor: u16, build: u16, revision: u16) -> Self {
        Self { major, minor, build, revision }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}.{}", self.major, self.minor, self.build, self.revision)
    }
}

/// The identity of an assembly: simple name plus version.
///
/// Two references with the same `AssemblyName` are the same assembly as far
/// as a [`ProjectContent`](super::ProjectContent) is concerned.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssemblyName {
    pub name: SmolStr,
    pub version: Version,
}

impl AssemblyName {
    pub fn new(name: impl Into<SmolStr>, version: Version) -> Self {
        Self { name: name.into(), version }
    }
}

impl fmt::Display for AssemblyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, Version={}", self.name, self.version)
    }
}

/// A loaded metadata assembly and the types it exports.
///
/// Assemblies do not change during a session, so the lookup index is built
/// once here and shared by every snapshot and compilation that references
/// the assembly.
#[derive(Clone, Debug)]
pub struct AssemblyReference {
    identity: AssemblyName,
    definitions: Vec<UnresolvedTypeDefinition>,
    /// Key → index into `definitions`; the first export of a key wins.
    by_key: FxHashMap<TypeKey, usize>,
}

impl AssemblyReference {
    /// Wrap the loader's output. Any `declaring_file` on the exports is cleared.
    pub fn new<I>(identity: AssemblyName, definitions: I) -> Self
    where
        I: IntoIterator<Item = UnresolvedTypeDefinition>,
    {
        let definitions: Vec<_> = definitions
            .into_iter()
            .map(|mut def| {
                def.declaring_file = None;
                def
            })
            .collect();

        let mut by_key = FxHashMap::default();
        for (idx, def) in definitions.iter().enumerate() {
            by_key.entry(def.key()).or_insert(idx);
        }

        Self { identity, definitions, by_key }
    }

    pub fn identity(&self) -> &AssemblyName {
        &self.identity
    }

    /// Exported type definitions, in metadata order.
    pub fn top_level_type_definitions(&self) -> &[UnresolvedTypeDefinition] {
        &self.definitions
    }

    /// Find the exported type with the given key.
    pub fn find(&self, key: &TypeKey) -> Option<&UnresolvedTypeDefinition> {
        self.by_key.get(key).map(|&idx| &self.definitions[idx])
    }

    /// Get the number of exported types.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Check if the assembly exports nothing.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
