//! NeuroGraph Core - the host-facing vocabulary
//!
//! This crate defines what the page graph needs from the outside world
//! without knowing anything about the graph itself:
//!
//! - [`Document`]: a handle to a real file in the vault
//! - [`MetadataIndex`]: the host's link tables (backlinks, resolved and
//!   unresolved links)
//! - [`FieldLinkExtractor`]: structured `field:: [[target]]` references
//! - [`HierarchyConfig`]: which field names mean parent, child or friend
//!
//! In-memory implementations of both collaborator traits are included so
//! a host can materialize its state up front, or load it from a JSON
//! snapshot.
//!
//! # Example
//!
//! ```
//! use neuro_core::{Document, MemoryIndex, MetadataIndex};
//!
//! let mut index = MemoryIndex::new();
//! index.add_document("notes/a.md");
//! index.add_document("notes/b.md");
//! index.add_link("notes/a.md", "b");
//! index.add_link("notes/a.md", "Ghost");
//!
//! assert_eq!(index.backlinks("notes/b.md"), vec!["notes/a.md".to_string()]);
//! assert_eq!(Document::new("notes/b.md").basename, "b");
//! ```

mod config;
mod document;
mod error;
mod fields;
mod index;

pub use config::HierarchyConfig;
pub use document::Document;
pub use error::{CoreError, Result};
pub use fields::{FieldLink, FieldLinkExtractor, MemoryFieldLinks};
pub use index::{LinkTable, MemoryIndex, MetadataIndex};
