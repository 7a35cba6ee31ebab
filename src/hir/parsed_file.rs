//! Parsed files — the per-source-unit output of the parser.

use smol_str::SmolStr;

use super::unresolved::UnresolvedTypeDefinition;

/// All top-level type declarations found in one source unit.
///
/// Identified by a path-like logical name that is unique within a
/// [`ProjectContent`](super::ProjectContent). Immutable: an edit produces a new
/// `ParsedFile` that replaces the old one in a new snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedFile {
    identity: SmolStr,
    definitions: Vec<UnresolvedTypeDefinition>,
}

impl ParsedFile {
    /// Create a parsed file, stamping each declaration with this file's identity.
    pub fn new<I>(identity: impl Into<SmolStr>, definitions: I) -> Self
    where
        I: IntoIterator<Item = UnresolvedTypeDefinition>,
    {
        let identity = identity.into();
        let definitions = definitions
            .into_iter()
            .map(|mut def| {
                def.declaring_file = Some(identity.clone());
                def
            })
            .collect();
        Self { identity, definitions }
    }

    /// Create a parsed file with no declarations.
    pub fn empty(identity: impl Into<SmolStr>) -> Self {
        Self::new(identity, std::iter::empty())
    }

    /// The logical identity (path) of this file.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Top-level declarations, in declaration order.
    pub fn top_level_type_definitions(&self) -> &[UnresolvedTypeDefinition] {
        &self.definitions
    }

    /// Get the number of top-level declarations.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Check if the file declares nothing.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
