//! # typesys-core
//!
//! Type-system core for a C#-style language service: immutable project
//! snapshots and lazily resolving compilations.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide     → ProjectHost: the latest snapshot and its shared compilation
//!   ↓
//! hir     → Snapshots, declarations, resolution and diagnostics
//!   ↓
//! base    → Primitives (FileId, TypeKey, namespace paths)
//! ```

/// Foundation types: FileId, TypeKey, namespace helpers
pub mod base;

/// High-level IR: project snapshots and type resolution
pub mod hir;

/// Editor-facing state over the snapshot model
pub mod ide;

// Re-export foundation types
pub use base::{FileId, TypeKey};

// Re-export the snapshot and compilation entry points
pub use hir::{
    AssemblyName, AssemblyReference, Compilation, CompilationOptions, ParsedFile, ProjectContent,
    ResolveError, ResolvedTypeDefinition,
};
