//! Settings that influence how a compilation resolves types.

/// Options carried by a [`ProjectContent`](super::ProjectContent) and read by
/// every [`Compilation`](super::Compilation) built from it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CompilationOptions {
    /// Give a type that names no base types the conventional root of its
    /// kind (`System.Object`, `System.ValueType`, ...).
    pub implicit_base_types: bool,
    /// Only merge declarations that carry the partial flag. A non-partial
    /// first declaration then stands alone and the others are reported as
    /// duplicates.
    pub require_partial_modifier: bool,
}

impl CompilationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_implicit_base_types(mut self, enabled: bool) -> Self {
        self.implicit_base_types = enabled;
        self
    }

    pub fn with_require_partial_modifier(mut self, enabled: bool) -> Self {
        self.require_partial_modifier = enabled;
        self
    }
}
