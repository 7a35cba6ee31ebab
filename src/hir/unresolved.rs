//! Unresolved type model — purely syntactic declarations.
//!
//! Everything in this module is produced by external collaborators (a parser
//! or a metadata loader) and carries names only. Nothing here points at another
//! declaration; binding names to definitions is the job of a
//! [`Compilation`](super::Compilation).

use smol_str::SmolStr;

use crate::base::TypeKey;
use crate::base::name::split_full_name;

// ============================================================================
// KINDS
// ============================================================================

/// The shape of a type declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
}

impl TypeKind {
    /// Get a human-readable name for this kind.
    pub fn display(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Struct => "struct",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
            TypeKind::Delegate => "delegate",
        }
    }

    /// The base type every declaration of this kind derives from when it
    /// names none explicitly. Interfaces have no implicit base.
    pub fn implicit_base_type(&self) -> Option<TypeReference> {
        let full_name = match self {
            TypeKind::Class => "System.Object",
            TypeKind::Struct => "System.ValueType",
            TypeKind::Enum => "System.Enum",
            TypeKind::Delegate => "System.MulticastDelegate",
            TypeKind::Interface => return None,
        };
        Some(TypeReference::from_full_name(full_name, 0))
    }
}

/// The shape of a member declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Field,
    Property,
    Method,
    Event,
    Constructor,
    EnumValue,
}

impl MemberKind {
    /// Get a human-readable name for this kind.
    pub fn display(&self) -> &'static str {
        match self {
            MemberKind::Field => "field",
            MemberKind::Property => "property",
            MemberKind::Method => "method",
            MemberKind::Event => "event",
            MemberKind::Constructor => "constructor",
            MemberKind::EnumValue => "enum value",
        }
    }
}

// ============================================================================
// REFERENCES
// ============================================================================

/// A by-name reference to a type, as written in a declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeReference {
    /// Dotted namespace path; empty for the global namespace.
    pub namespace: SmolStr,
    /// Simple name of the referenced type.
    pub name: SmolStr,
    /// Number of type arguments.
    pub arity: u32,
}

impl TypeReference {
    /// Create a reference from its parts.
    pub fn new(namespace: impl Into<SmolStr>, name: impl Into<SmolStr>, arity: u32) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            arity,
        }
    }

    /// Create a reference from a dotted full name such as `System.Object`.
    pub fn from_full_name(full_name: &str, arity: u32) -> Self {
        let (namespace, name) = split_full_name(full_name);
        Self::new(namespace, name, arity)
    }

    /// The lookup key this reference denotes.
    pub fn key(&self) -> TypeKey {
        TypeKey::new(self.namespace.clone(), self.name.clone(), self.arity)
    }
}

// ============================================================================
// DECLARATIONS
// ============================================================================

/// A member declared inside a type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnresolvedMember {
    pub name: SmolStr,
    pub kind: MemberKind,
    /// Field/property/event type or method return type. `None` for
    /// constructors, `void` methods and enum values.
    pub return_type: Option<TypeReference>,
    pub parameters: Vec<TypeReference>,
    pub is_static: bool,
}

impl UnresolvedMember {
    /// Create a member with no type information.
    pub fn new(kind: MemberKind, name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            kind,
            return_type: None,
            parameters: Vec::new(),
            is_static: false,
        }
    }

    pub fn with_return_type(mut self, ty: TypeReference) -> Self {
        self.return_type = Some(ty);
        self
    }

    pub fn with_parameter(mut self, ty: TypeReference) -> Self {
        self.parameters.push(ty);
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }
}

/// A type declaration as seen by a parser or a metadata loader.
///
/// Immutable once placed into a [`ParsedFile`](super::ParsedFile) or an
/// [`AssemblyReference`](super::AssemblyReference); the builder methods are
/// for the producing collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnresolvedTypeDefinition {
    pub name: SmolStr,
    /// Dotted namespace path; empty for the global namespace.
    pub namespace: SmolStr,
    pub kind: TypeKind,
    /// Type parameter names; their count is the arity.
    pub type_parameters: Vec<SmolStr>,
    /// Base class and implemented interfaces, in source order.
    pub base_types: Vec<TypeReference>,
    pub members: Vec<UnresolvedMember>,
    pub is_partial: bool,
    /// Identity of the parsed file that declared this type; `None` for
    /// assembly exports. Stamped by [`ParsedFile::new`](super::ParsedFile::new).
    pub declaring_file: Option<SmolStr>,
}

impl UnresolvedTypeDefinition {
    /// Create a declaration with no bases and no members.
    pub fn new(namespace: impl Into<SmolStr>, name: impl Into<SmolStr>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            kind,
            type_parameters: Vec::new(),
            base_types: Vec::new(),
            members: Vec::new(),
            is_partial: false,
            declaring_file: None,
        }
    }

    /// Shorthand for a class declaration.
    pub fn class(namespace: impl Into<SmolStr>, name: impl Into<SmolStr>) -> Self {
        Self::new(namespace, name, TypeKind::Class)
    }

    /// Shorthand for an interface declaration.
    pub fn interface(namespace: impl Into<SmolStr>, name: impl Into<SmolStr>) -> Self {
        Self::new(namespace, name, TypeKind::Interface)
    }

    pub fn with_type_parameters<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        self.type_parameters = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_base_type(mut self, base: TypeReference) -> Self {
        self.base_types.push(base);
        self
    }

    pub fn with_member(mut self, member: UnresolvedMember) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_partial(mut self, is_partial: bool) -> Self {
        self.is_partial = is_partial;
        self
    }

    /// Number of type parameters.
    pub fn arity(&self) -> u32 {
        self.type_parameters.len() as u32
    }

    /// The lookup key of this declaration.
    pub fn key(&self) -> TypeKey {
        TypeKey::new(self.namespace.clone(), self.name.clone(), self.arity())
    }

    /// The namespace-qualified name, without arity.
    pub fn full_name(&self) -> String {
        self.key().full_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_from_type_parameters() {
        let def = UnresolvedTypeDefinition::class("System.Collections.Generic", "List")
            .with_type_parameters(["T"]);
        assert_eq!(def.arity(), 1);
        assert_eq!(def.key(), TypeKey::new("System.Collections.Generic", "List", 1));
    }

    #[test]
    fn test_reference_from_full_name() {
        let r = TypeReference::from_full_name("System.Object", 0);
        assert_eq!(r.namespace.as_str(), "System");
        assert_eq!(r.name.as_str(), "Object");

        let global = TypeReference::from_full_name("Foo", 0);
        assert!(global.namespace.is_empty());
    }

    #[test]
    fn test_implicit_base_types() {
        assert_eq!(
            TypeKind::Struct.implicit_base_type().map(|r| r.key().full_name()),
            Some("System.ValueType".to_string())
        );
        assert!(TypeKind::Interface.implicit_base_type().is_none());
    }

    #[test]
    fn test_builder_keeps_base_order() {
        let def = UnresolvedTypeDefinition::class("", "Foo")
            .with_base_type(TypeReference::new("", "Bar", 0))
            .with_base_type(TypeReference::new("", "IBaz", 0));
        let names: Vec<_> = def.base_types.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Bar", "IBaz"]);
    }
}
