//! IDE-facing state — the editor's view of a project.
//!
//! Snapshots in [`hir`](crate::hir) are immutable values; an editor needs one
//! mutable slot that always holds the latest version and a compilation to
//! query against it. [`ProjectHost`] is that slot.
//!
//! ## Usage
//!
//! ```ignore
//! use typesys::ide::ProjectHost;
//!
//! let host = ProjectHost::default();
//! host.set_file(ParsedFile::new("Foo.cs", [foo]));
//!
//! let compilation = host.compilation();
//! let foo = compilation.resolve("", "Foo", 0)?;
//! ```

mod host;

pub use host::ProjectHost;
