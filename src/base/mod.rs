//! Foundation types for the type system core.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`FileId`] - Compilation-scoped file positions
//! - [`TypeKey`] - Full name + arity, the identity of a type
//!
//! This module has NO dependencies on other crate modules.

mod file_id;
pub mod name;

pub use file_id::FileId;
pub use name::{NAMESPACE_SEPARATOR, TypeKey};
