//! Identifiers for declarations and resolved types.

use std::fmt;

use crate::base::FileId;

/// Identifies one source declaration within a compilation.
///
/// Combines the position of the parsed file with the position of the
/// declaration inside that file. Ordering follows file order first, then
/// declaration order, which is exactly the order partial declarations merge in.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct DeclId {
    /// The file containing this declaration
    pub file: FileId,
    /// The declaration's index among the file's top-level types
    pub local: LocalDeclId,
}

impl DeclId {
    /// Create a new DeclId.
    #[inline]
    pub const fn new(file: FileId, local: LocalDeclId) -> Self {
        Self { file, local }
    }
}

impl fmt::Debug for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeclId({:?}:{})", self.file, self.local.0)
    }
}

/// A file-local declaration index.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct LocalDeclId(pub u32);

impl LocalDeclId {
    /// Create a new LocalDeclId.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw index.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for LocalDeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocalDeclId({})", self.0)
    }
}

/// Index of a resolved type in its compilation's arena.
///
/// Resolved types refer to each other (base types) through `TypeId`s, so
/// the arena never holds a reference cycle. A `TypeId` is only meaningful
/// for the compilation that issued it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TypeId(pub u32);

impl TypeId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decl_id_equality() {
        let file1 = FileId::new(1);
        let file2 = FileId::new(2);

        let a = DeclId::new(file1, LocalDeclId::new(0));
        let b = DeclId::new(file1, LocalDeclId::new(0));
        let c = DeclId::new(file1, LocalDeclId::new(1));
        let d = DeclId::new(file2, LocalDeclId::new(0));

        assert_eq!(a, b);
        assert_ne!(a, c); // different local
        assert_ne!(a, d); // different file
    }

    #[test]
    fn test_decl_id_orders_by_file_then_local() {
        let early_file_late_decl = DeclId::new(FileId::new(0), LocalDeclId::new(9));
        let late_file_early_decl = DeclId::new(FileId::new(1), LocalDeclId::new(0));
        assert!(early_file_late_decl < late_file_early_decl);
    }

    #[test]
    fn test_decl_id_size() {
        // DeclId should be 8 bytes (FileId + LocalDeclId)
        assert_eq!(std::mem::size_of::<DeclId>(), 8);
    }

    #[test]
    fn test_type_id_index() {
        assert_eq!(TypeId::new(7).index(), 7);
    }
}
