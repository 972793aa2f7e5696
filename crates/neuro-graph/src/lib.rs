//! NeuroGraph - typed page relationships
//!
//! This crate maintains a graph of pages (notes) connected by parent,
//! child and friend relations. Edges come from several independent
//! sources and are merged without duplication:
//!
//! - Backlinks and resolved links, recorded as inferred parent/child
//! - Unresolved links, which point at placeholder pages
//! - Structured fields such as `up:: [[Topic]]`, recorded as defined
//!   relations that remember the field name
//!
//! # Architecture
//!
//! [`PageRegistry`] owns all pages and is the only writer. Every edge is
//! created with [`PageRegistry::link`], which updates both endpoints, so
//! the neighbour slots on either side always agree. Deleting a page also
//! removes placeholders that nothing links to any more.
//!
//! # Example
//!
//! ```
//! use neuro_core::{HierarchyConfig, MemoryFieldLinks, MemoryIndex};
//! use neuro_graph::{PageRegistry, RelationKind};
//!
//! let mut index = MemoryIndex::new();
//! index.add_document("a.md");
//! index.add_document("b.md");
//! index.add_link("a.md", "b");
//!
//! let mut registry = PageRegistry::new(index, MemoryFieldLinks::new(), HierarchyConfig::default());
//! let documents: Vec<_> = registry.index().documents().collect();
//! registry.load(documents);
//!
//! let b = registry.get("b.md").unwrap();
//! assert_eq!(b.relation_to("a.md").map(|r| r.kind), Some(RelationKind::Parent));
//! ```

mod diagnostics;
mod error;
mod export;
mod graph;
mod page;
mod registry;
mod relation;

pub use diagnostics::{Diagnostics, MemoryDiagnostics, TracingDiagnostics};
pub use error::{GraphError, Result};
pub use export::{GraphStats, PageEdge};
pub use graph::{NodeId, PageGraph};
pub use page::{Page, PageSource, PageView};
pub use registry::PageRegistry;
pub use relation::{Relation, RelationKind, RelationType};
