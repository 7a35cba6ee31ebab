//! High-level IR: the semantic model of a project.
//!
//! ## Layers (dependency order)
//!
//! ```text
//! compilation → resolution queries, cache, diagnostics
//!   ↓
//! input       → ProjectContent: versioned snapshot of files + references
//!   ↓
//! parsed_file, assembly → containers produced by external collaborators
//!   ↓
//! unresolved  → syntactic type and member declarations
//! ```

mod assembly;
mod compilation;
mod diagnostics;
mod error;
mod ids;
mod input;
mod options;
mod parsed_file;
mod resolve;
mod resolved;
mod unresolved;

pub use assembly::{AssemblyName, AssemblyReference, Version};
pub use compilation::Compilation;
pub use diagnostics::{Diagnostic, DiagnosticCollector, RelatedInfo, Severity, codes};
pub use error::ResolveError;
pub use ids::{DeclId, LocalDeclId, TypeId};
pub use input::ProjectContent;
pub use options::CompilationOptions;
pub use parsed_file::ParsedFile;
pub use resolve::{CacheStats, TypeIndex};
pub use resolved::{ResolvedMember, ResolvedTypeDefinition, TypeOrigin, UnknownReason};
pub use unresolved::{
    MemberKind, TypeKind, TypeReference, UnresolvedMember, UnresolvedTypeDefinition,
};
