//! Page graph storage.
//!
//! Wraps a petgraph `StableDiGraph` and keeps an identity index beside it.
//! Each neighbour slot is one outgoing edge: the edge `a -> b` carries the
//! role `b` plays for `a`. A logical edge is therefore stored twice, once
//! per endpoint, and the registry always writes both.

use crate::page::{Page, PageView};
use crate::relation::{Relation, RelationKind, RelationType};
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;

/// Unique identifier for a node in the graph.
pub type NodeId = NodeIndex;

/// Pages as nodes, neighbour slots as edges.
#[derive(Debug, Default)]
pub struct PageGraph {
    /// The underlying petgraph graph. Stable so removals don't shift
    /// the indexes held in `id_index`.
    pub(crate) graph: StableDiGraph<Page, Relation>,

    /// Maps page identities to graph node indexes.
    id_index: HashMap<String, NodeId>,
}

impl PageGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a page, or replaces the weight of the page with the same
    /// identity while keeping its edges.
    pub fn insert(&mut self, page: Page) -> NodeId {
        if let Some(&index) = self.id_index.get(page.id()) {
            if let Some(weight) = self.graph.node_weight_mut(index) {
                *weight = page;
            }
            return index;
        }
        let id = page.id().to_string();
        let index = self.graph.add_node(page);
        self.id_index.insert(id, index);
        index
    }

    /// Removes a page and every edge touching it.
    pub fn remove(&mut self, id: &str) -> Option<Page> {
        let index = self.id_index.remove(id)?;
        self.graph.remove_node(index)
    }

    /// Gets the node index for an identity.
    pub fn index_of(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).copied()
    }

    /// Gets a page view by identity.
    pub fn get(&self, id: &str) -> Option<PageView<'_>> {
        let index = self.index_of(id)?;
        self.view(index)
    }

    /// Gets a page by identity for in-place updates.
    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Page> {
        let index = self.index_of(id)?;
        self.graph.node_weight_mut(index)
    }

    /// Whether a page is stored under `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.id_index.contains_key(id)
    }

    /// Returns the number of pages.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Whether the graph holds no pages.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Iterates over all pages.
    pub fn pages(&self) -> impl Iterator<Item = PageView<'_>> {
        self.graph
            .node_indices()
            .filter_map(move |index| self.view(index))
    }

    /// Identities of every neighbour of `id`. `None` if `id` is unknown.
    pub fn neighbour_ids(&self, id: &str) -> Option<Vec<String>> {
        let index = self.index_of(id)?;
        Some(
            self.graph
                .edges_directed(index, Direction::Outgoing)
                .filter_map(|edge| self.graph.node_weight(edge.target()))
                .map(|page| page.id().to_string())
                .collect(),
        )
    }

    /// Removes every page and edge.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.id_index.clear();
    }

    fn view(&self, index: NodeId) -> Option<PageView<'_>> {
        let page = self.graph.node_weight(index)?;
        Some(PageView::new(self, index, page))
    }

    // ─────────────────────────────────────────────────────────────────────
    // One-sided slot operations. The registry always pairs these with the
    // inverse call on the neighbour.
    // ─────────────────────────────────────────────────────────────────────

    pub(crate) fn add_parent(&mut self, owner: &str, other: &str, relation_type: RelationType) {
        self.set_slot(owner, other, Relation::new(RelationKind::Parent, relation_type));
    }

    pub(crate) fn add_child(&mut self, owner: &str, other: &str, relation_type: RelationType) {
        self.set_slot(owner, other, Relation::new(RelationKind::Child, relation_type));
    }

    pub(crate) fn add_friend(&mut self, owner: &str, other: &str, relation_type: RelationType) {
        self.set_slot(owner, other, Relation::new(RelationKind::Friend, relation_type));
    }

    /// Writes `owner`'s slot for `other`, replacing any earlier relation.
    fn set_slot(&mut self, owner: &str, other: &str, relation: Relation) {
        if let (Some(from), Some(to)) = (self.index_of(owner), self.index_of(other)) {
            self.graph.update_edge(from, to, relation);
        }
    }

    /// Removes `owner`'s slot for `other`. Absent slots are ignored.
    pub(crate) fn unlink_neighbour(&mut self, owner: &str, other: &str) -> Option<Relation> {
        let from = self.index_of(owner)?;
        let to = self.index_of(other)?;
        let edge = self.graph.find_edge(from, to)?;
        self.graph.remove_edge(edge)
    }
}
