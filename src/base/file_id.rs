//! Compilation-scoped file identifiers.

use std::fmt;

/// The position of a parsed file within the snapshot a compilation is bound to.
///
/// `FileId` is a lightweight handle (just a u32); the file's logical identity
/// (its path-like name) is stored in the snapshot. Positions follow the
/// snapshot's file order, so comparing two ids compares insertion order.
///
/// A `FileId` is only meaningful for the compilation that produced it: the
/// same path can sit at a different position in another snapshot.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct FileId(pub u32);

impl FileId {
    /// Create a new FileId from a raw index.
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

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileId({})", self.0)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file#{}", self.0)
    }
}

impl From<u32> for FileId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}
