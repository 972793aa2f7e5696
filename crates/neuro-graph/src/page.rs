//! Page nodes.
//!
//! A page is either backed by a real document or is a placeholder for a
//! link target that doesn't exist yet. The page itself only carries its
//! identity and source; its neighbour slots are the outgoing edges of its
//! node in the [`PageGraph`](crate::graph::PageGraph), read through a
//! [`PageView`].

use crate::graph::{NodeId, PageGraph};
use crate::relation::{Relation, RelationKind};
use neuro_core::Document;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// What backs a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "document", rename_all = "snake_case")]
pub enum PageSource {
    /// A real file.
    Resolved(Document),

    /// An unresolved link target.
    Placeholder,
}

/// A node in the page graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    id: String,
    source: PageSource,
}

impl Page {
    /// A page backed by `document`, identified by its path.
    pub fn resolved(document: Document) -> Self {
        Self {
            id: document.path.clone(),
            source: PageSource::Resolved(document),
        }
    }

    /// A placeholder for the unresolved link target `id`.
    pub fn placeholder(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: PageSource::Placeholder,
        }
    }

    /// The page identity (document path or unresolved link text).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// What backs this page.
    pub fn source(&self) -> &PageSource {
        &self.source
    }

    /// The backing document, if the page isn't a placeholder.
    pub fn document(&self) -> Option<&Document> {
        match &self.source {
            PageSource::Resolved(doc) => Some(doc),
            PageSource::Placeholder => None,
        }
    }

    /// Whether the page stands in for an unresolved link.
    pub fn is_placeholder(&self) -> bool {
        matches!(self.source, PageSource::Placeholder)
    }

    /// Attaches a document, turning a placeholder into a real page.
    pub(crate) fn promote(&mut self, document: Document) {
        self.source = PageSource::Resolved(document);
    }
}

/// A registered page together with its neighbour slots.
///
/// Derefs to [`Page`].
#[derive(Clone, Copy)]
pub struct PageView<'a> {
    graph: &'a PageGraph,
    index: NodeId,
    page: &'a Page,
}

impl<'a> PageView<'a> {
    pub(crate) fn new(graph: &'a PageGraph, index: NodeId, page: &'a Page) -> Self {
        Self { graph, index, page }
    }

    /// The underlying page.
    pub fn page(&self) -> &'a Page {
        self.page
    }

    /// Neighbour identities with their relations, sorted by identity.
    pub fn neighbours(&self) -> impl Iterator<Item = (&'a str, &'a Relation)> {
        let pages: &'a PageGraph = self.graph;
        let graph = &pages.graph;
        let mut slots: Vec<(&'a str, &'a Relation)> = graph
            .edges_directed(self.index, Direction::Outgoing)
            .filter_map(|edge| {
                let target = graph.node_weight(edge.target())?;
                Some((target.id(), graph.edge_weight(edge.id())?))
            })
            .collect();
        slots.sort_by(|a, b| a.0.cmp(b.0));
        slots.into_iter()
    }

    /// Number of neighbour slots.
    pub fn neighbour_count(&self) -> usize {
        self.graph
            .graph
            .edges_directed(self.index, Direction::Outgoing)
            .count()
    }

    /// The relation recorded for neighbour `id`.
    pub fn relation_to(&self, id: &str) -> Option<&'a Relation> {
        let pages: &'a PageGraph = self.graph;
        let graph = &pages.graph;
        let other = pages.index_of(id)?;
        let edge = graph.find_edge(self.index, other)?;
        graph.edge_weight(edge)
    }

    /// A placeholder nothing points at. Never kept in the registry.
    pub fn is_dangling(&self) -> bool {
        self.page.is_placeholder() && self.neighbour_count() == 0
    }

    /// Identities of neighbours recorded as parents.
    pub fn parents(&self) -> impl Iterator<Item = &'a str> {
        self.with_kind(RelationKind::Parent)
    }

    /// Identities of neighbours recorded as children.
    pub fn children(&self) -> impl Iterator<Item = &'a str> {
        self.with_kind(RelationKind::Child)
    }

    /// Identities of neighbours recorded as friends.
    pub fn friends(&self) -> impl Iterator<Item = &'a str> {
        self.with_kind(RelationKind::Friend)
    }

    fn with_kind(&self, kind: RelationKind) -> impl Iterator<Item = &'a str> {
        self.neighbours()
            .filter(move |(_, rel)| rel.kind == kind)
            .map(|(id, _)| id)
    }
}

impl Deref for PageView<'_> {
    type Target = Page;

    fn deref(&self) -> &Page {
        self.page
    }
}

impl std::fmt::Debug for PageView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageView")
            .field("page", self.page)
            .field("neighbours", &self.neighbours().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_has_no_document() {
        let ghost = Page::placeholder("Ghost");
        assert!(ghost.is_placeholder());
        assert!(ghost.document().is_none());
        assert_eq!(ghost.source(), &PageSource::Placeholder);
    }

    #[test]
    fn test_resolved_page_uses_document_path() {
        let page = Page::resolved(Document::new("notes/a.md"));
        assert_eq!(page.id(), "notes/a.md");
        assert!(!page.is_placeholder());
        assert_eq!(page.document().map(|d| d.basename.as_str()), Some("a"));
    }

    #[test]
    fn test_promote_attaches_document() {
        let mut page = Page::placeholder("Ghost.md");
        page.promote(Document::new("Ghost.md"));

        assert!(!page.is_placeholder());
        assert_eq!(page.id(), "Ghost.md");
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(Page::placeholder("Ghost")).unwrap();
        assert_eq!(json["id"], "Ghost");
        assert_eq!(json["source"]["state"], "placeholder");
    }
}
