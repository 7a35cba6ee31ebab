//! Resolved type model — what a compilation hands out.

use std::fmt;

use smol_str::SmolStr;

use crate::base::TypeKey;
use super::assembly::AssemblyName;
use super::ids::{DeclId, TypeId};
use super::unresolved::{MemberKind, TypeKind, TypeReference, UnresolvedMember};

/// Why a reference resolved to the unknown-type placeholder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnknownReason {
    /// No source file and no referenced assembly declares the name.
    Unresolved,
    /// The reference closes an inheritance cycle.
    Cycle,
}

/// Where a resolved type came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeOrigin {
    /// Declared in source; the distinct declaring files in merge order.
    Source { files: Vec<SmolStr> },
    /// Exported by a referenced assembly.
    Assembly(AssemblyName),
    /// The unknown-type placeholder.
    Unknown(UnknownReason),
}

/// A member of a resolved type, tagged with the part that declared it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedMember {
    pub name: SmolStr,
    pub kind: MemberKind,
    /// Declared type, still by name; see
    /// [`Compilation::member_type`](super::Compilation::member_type).
    pub return_type: Option<TypeReference>,
    pub parameters: Vec<TypeReference>,
    pub is_static: bool,
    pub declaring_type: TypeId,
    /// The parsed file of the declaring part; `None` for assembly members.
    pub declaring_file: Option<SmolStr>,
}

impl ResolvedMember {
    pub(crate) fn from_unresolved(
        member: &UnresolvedMember,
        declaring_type: TypeId,
        declaring_file: Option<SmolStr>,
    ) -> Self {
        Self {
            name: member.name.clone(),
            kind: member.kind,
            return_type: member.return_type.clone(),
            parameters: member.parameters.clone(),
            is_static: member.is_static,
            declaring_type,
            declaring_file,
        }
    }
}

/// A type whose base types have been bound, with all of its partial
/// declarations merged.
///
/// Owned by the [`Compilation`](super::Compilation) that built it and never
/// modified afterwards. Base types are [`TypeId`]s into the same compilation.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedTypeDefinition {
    pub(crate) id: TypeId,
    pub(crate) key: TypeKey,
    pub(crate) kind: Option<TypeKind>,
    pub(crate) origin: TypeOrigin,
    pub(crate) parts: Vec<DeclId>,
    pub(crate) base_types: Vec<TypeId>,
    pub(crate) members: Vec<ResolvedMember>,
}

impl ResolvedTypeDefinition {
    pub(crate) fn placeholder(id: TypeId, key: TypeKey, reason: UnknownReason) -> Self {
        Self {
            id,
            key,
            kind: None,
            origin: TypeOrigin::Unknown(reason),
            parts: Vec::new(),
            base_types: Vec::new(),
            members: Vec::new(),
        }
    }

    /// This type's slot in its compilation.
    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn key(&self) -> &TypeKey {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.key.name
    }

    pub fn namespace(&self) -> &str {
        &self.key.namespace
    }

    pub fn arity(&self) -> u32 {
        self.key.arity
    }

    /// The namespace-qualified name, without arity.
    pub fn full_name(&self) -> String {
        self.key.full_name()
    }

    /// The declaration kind; `None` for the placeholder.
    pub fn kind(&self) -> Option<TypeKind> {
        self.kind
    }

    pub fn origin(&self) -> &TypeOrigin {
        &self.origin
    }

    /// Check if this is the unknown-type placeholder.
    pub fn is_unknown(&self) -> bool {
        matches!(self.origin, TypeOrigin::Unknown(_))
    }

    /// The reason this is a placeholder, if it is one.
    pub fn unknown_reason(&self) -> Option<UnknownReason> {
        match self.origin {
            TypeOrigin::Unknown(reason) => Some(reason),
            _ => None,
        }
    }

    /// The exporting assembly, for types loaded from metadata.
    pub fn assembly(&self) -> Option<&AssemblyName> {
        match &self.origin {
            TypeOrigin::Assembly(name) => Some(name),
            _ => None,
        }
    }

    /// The source declarations merged into this type, in merge order.
    pub fn parts(&self) -> &[DeclId] {
        &self.parts
    }

    /// Direct base types in declaration order (merged across parts).
    pub fn base_type_ids(&self) -> &[TypeId] {
        &self.base_types
    }

    /// Members in merge order.
    pub fn members(&self) -> &[ResolvedMember] {
        &self.members
    }

    /// Find members by name.
    pub fn members_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ResolvedMember> + 'a {
        self.members.iter().filter(move |m| m.name == name)
    }
}

impl fmt::Debug for ResolvedTypeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedTypeDefinition")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("origin", &self.origin)
            .field("base_types", &self.base_types)
            .field("members", &self.members.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_inert() {
        let p = ResolvedTypeDefinition::placeholder(
            TypeId::new(0),
            TypeKey::new("", "Missing", 0),
            UnknownReason::Unresolved,
        );
        assert!(p.is_unknown());
        assert_eq!(p.unknown_reason(), Some(UnknownReason::Unresolved));
        assert!(p.base_type_ids().is_empty());
        assert!(p.members().is_empty());
        assert!(p.kind().is_none());
        assert!(p.assembly().is_none());
        assert_eq!(p.full_name(), "Missing");
    }
}
