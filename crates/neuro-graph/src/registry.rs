//! The page registry.
//!
//! The registry owns every page and is the only place edges are created
//! or removed. It folds three kinds of evidence into the graph:
//!
//! 1. Backlinks reported by the metadata index (single-page onboarding only)
//! 2. The resolved and unresolved link tables
//! 3. Structured field links, classified by [`HierarchyConfig`]
//!
//! Every edge is written through [`PageRegistry::link`], which updates both
//! endpoints at once. Later evidence for the same pair of pages replaces
//! earlier evidence.

use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::error::{GraphError, Result};
use crate::graph::PageGraph;
use crate::page::{Page, PageView};
use crate::relation::{RelationKind, RelationType};
use neuro_core::{Document, FieldLink, FieldLinkExtractor, HierarchyConfig, MetadataIndex};
use std::collections::BTreeSet;
use std::time::Instant;
use tracing::{debug, info};

/// Owns every page of the graph, keyed by identity.
///
/// Collaborators are injected at construction; the registry never reaches
/// for global state. Calls are expected to be serialized by the host.
pub struct PageRegistry<M, F> {
    pages: PageGraph,

    /// Source of backlinks and link tables.
    index: M,

    /// Source of structured field links.
    extractor: F,

    hierarchy: HierarchyConfig,

    /// Where skipped references are reported.
    diagnostics: Box<dyn Diagnostics>,
}

impl<M: MetadataIndex, F: FieldLinkExtractor> PageRegistry<M, F> {
    /// Creates an empty registry that reports anomalies through `tracing`.
    pub fn new(index: M, extractor: F, hierarchy: HierarchyConfig) -> Self {
        Self {
            pages: PageGraph::new(),
            index,
            extractor,
            hierarchy,
            diagnostics: Box::new(TracingDiagnostics),
        }
    }

    /// Replaces the diagnostics sink.
    pub fn with_diagnostics(mut self, sink: impl Diagnostics + 'static) -> Self {
        self.diagnostics = Box::new(sink);
        self
    }

    /// The injected metadata index.
    pub fn index(&self) -> &M {
        &self.index
    }

    /// Mutable access for hosts that keep the index inside the registry.
    pub fn index_mut(&mut self) -> &mut M {
        &mut self.index
    }

    /// The injected field-link extractor.
    pub fn extractor(&self) -> &F {
        &self.extractor
    }

    /// Mutable access to the field-link extractor.
    pub fn extractor_mut(&mut self) -> &mut F {
        &mut self.extractor
    }

    /// The field-name groups used for defined relations.
    pub fn hierarchy(&self) -> &HierarchyConfig {
        &self.hierarchy
    }

    // ─────────────────────────────────────────────────────────────────────
    // Lookup
    // ─────────────────────────────────────────────────────────────────────

    /// Gets a page and its neighbours by identity.
    pub fn get(&self, id: &str) -> Option<PageView<'_>> {
        self.pages.get(id)
    }

    /// Whether a page is registered under `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.pages.contains(id)
    }

    /// Number of registered pages, placeholders included.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether no page is registered.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Iterates over all pages in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = PageView<'_>> {
        self.pages.pages()
    }

    /// Iterates over placeholder pages only.
    pub fn placeholders(&self) -> impl Iterator<Item = PageView<'_>> {
        self.pages.pages().filter(|p| p.is_placeholder())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Registration and linking
    // ─────────────────────────────────────────────────────────────────────

    /// Registers a bare page under its own identity.
    ///
    /// A page already registered under that identity is torn down first
    /// with [`PageRegistry::delete`] and returned.
    pub fn add(&mut self, page: Page) -> Option<Page> {
        let previous = self.delete(page.id());
        debug!("Registered page {}", page.id());
        self.pages.insert(page);
        previous
    }

    /// Records `b` as the `kind` of `a`, and `a` as the inverse of `kind`
    /// for `b`.
    ///
    /// Both slots are overwritten if present. Nothing changes when either
    /// page is missing. Self-links are ignored.
    pub fn link(
        &mut self,
        a: &str,
        b: &str,
        kind: RelationKind,
        relation_type: RelationType,
    ) -> Result<()> {
        for id in [a, b] {
            if !self.pages.contains(id) {
                return Err(GraphError::PageNotFound(id.to_string()));
            }
        }
        self.link_unchecked(a, b, kind, relation_type);
        Ok(())
    }

    /// [`PageRegistry::link`] for callers that already know both pages
    /// are registered.
    fn link_unchecked(&mut self, a: &str, b: &str, kind: RelationKind, relation_type: RelationType) {
        if a == b {
            return;
        }
        self.attach(a, b, kind, relation_type.clone());
        self.attach(b, a, kind.inverse(), relation_type);
    }

    fn attach(&mut self, owner: &str, other: &str, kind: RelationKind, relation_type: RelationType) {
        match kind {
            RelationKind::Parent => self.pages.add_parent(owner, other, relation_type),
            RelationKind::Child => self.pages.add_child(owner, other, relation_type),
            RelationKind::Friend => self.pages.add_friend(owner, other, relation_type),
        }
    }

    /// Removes a page and its edges.
    ///
    /// Each direct neighbour drops its slot for `id`; a placeholder left
    /// without neighbours is removed as well. Pruning is one hop deep.
    /// Unknown identities are a no-op.
    pub fn delete(&mut self, id: &str) -> Option<Page> {
        self.detach(id)?;
        let page = self.pages.remove(id)?;
        debug!("Deleted page {}", id);
        Some(page)
    }

    /// Drops every edge of `id` on both sides, pruning neighbours that
    /// become dangling placeholders. The page itself stays registered.
    ///
    /// Returns the former neighbours, or `None` if `id` is unknown.
    fn detach(&mut self, id: &str) -> Option<Vec<String>> {
        let neighbours = self.pages.neighbour_ids(id)?;

        for neighbour_id in &neighbours {
            self.pages.unlink_neighbour(neighbour_id, id);
            self.pages.unlink_neighbour(id, neighbour_id);
            let dangling = self
                .pages
                .get(neighbour_id)
                .is_some_and(|n| n.is_dangling());
            if dangling {
                self.pages.remove(neighbour_id);
                debug!("Pruned placeholder {}", neighbour_id);
            }
        }
        Some(neighbours)
    }

    /// Removes every page.
    pub fn clear(&mut self) {
        self.pages.clear();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Population
    // ─────────────────────────────────────────────────────────────────────

    /// Onboards a single document: registers it, seeds parents from its
    /// backlinks, then runs every propagation pass scoped to it.
    ///
    /// A placeholder with the same identity (a link target whose file was
    /// just created) is promoted in place and keeps its edges. A page that
    /// already has a document is treated as changed: its edges are dropped
    /// and rebuilt from the current index, and former neighbours re-apply
    /// their own fields so their defined relations to it survive.
    pub fn add_with_connections(&mut self, document: Document) {
        let id = document.path.clone();
        let mut refresh = Vec::new();

        match self.pages.get(&id).map(|p| p.is_placeholder()) {
            Some(true) => debug!("Promoting placeholder {}", id),
            Some(false) => {
                debug!("Re-indexing page {}", id);
                refresh = self.detach(&id).unwrap_or_default();
            }
            None => debug!("Registered page {}", id),
        }
        match self.pages.get_mut(&id) {
            Some(existing) => existing.promote(document),
            None => {
                self.pages.insert(Page::resolved(document));
            }
        }

        self.seed_backlinks(&id);
        self.add_resolved_links(Some(id.as_str()));
        self.add_unresolved_links(Some(id.as_str()));
        self.add_field_links(&id);

        for neighbour in &refresh {
            self.add_field_links(neighbour);
        }
    }

    /// Rebuilds the graph from scratch for `documents`.
    ///
    /// All documents are registered before any link is folded in, so the
    /// forward link tables cover every edge and backlinks aren't needed.
    pub fn load(&mut self, documents: impl IntoIterator<Item = Document>) {
        let start = Instant::now();
        self.clear();

        let ids: Vec<String> = documents
            .into_iter()
            .map(|doc| {
                let id = doc.path.clone();
                self.pages.insert(Page::resolved(doc));
                id
            })
            .collect();

        self.add_resolved_links(None);
        self.add_unresolved_links(None);
        for id in &ids {
            self.add_field_links(id);
        }

        info!(
            "Loaded {} documents ({} pages, {} placeholders) in {}ms",
            ids.len(),
            self.len(),
            self.placeholders().count(),
            start.elapsed().as_millis()
        );
    }

    /// Re-applies both link tables to every page.
    pub fn refresh_links(&mut self) {
        self.add_resolved_links(None);
        self.add_unresolved_links(None);
    }

    /// Moves a page to a new document path.
    pub fn rename(&mut self, old_id: &str, document: Document) {
        debug!("Renaming {} -> {}", old_id, document.path);
        self.delete(old_id);
        self.add_with_connections(document);
    }

    /// Links every parent -> child pair from the resolved link table.
    ///
    /// With a scope, only rows whose source is that page are applied.
    pub fn add_resolved_links(&mut self, scope: Option<&str>) {
        let pairs = scoped_pairs(self.index.resolved_links(), scope);

        for (parent, child) in pairs {
            if let Err(err) = self.link(&parent, &child, RelationKind::Child, RelationType::Inferred) {
                debug!("Skipping link {} -> {}: {}", parent, child, err);
                self.diagnostics.report(&GraphError::MissingLinkEndpoint {
                    from: parent,
                    to: child,
                });
            }
        }
    }

    /// Links every source page to a placeholder for each unresolved target.
    ///
    /// Existing pages under the target name are reused.
    pub fn add_unresolved_links(&mut self, scope: Option<&str>) {
        let pairs = scoped_pairs(self.index.unresolved_links(), scope);

        for (parent, target) in pairs {
            if !self.pages.contains(&parent) {
                self.diagnostics.report(&GraphError::MissingLinkEndpoint {
                    from: parent,
                    to: target,
                });
                continue;
            }
            if !self.pages.contains(&target) {
                debug!("Created placeholder {}", target);
                self.pages.insert(Page::placeholder(target.as_str()));
            }
            self.link_unchecked(&parent, &target, RelationKind::Child, RelationType::Inferred);
        }
    }

    /// Links a page to every target named in its hierarchy fields.
    ///
    /// Targets that aren't registered are reported and skipped. Placeholders
    /// have no document and therefore no fields.
    pub fn add_field_links(&mut self, id: &str) {
        let Some(document) = self.pages.get(id).and_then(|p| p.document().cloned()) else {
            return;
        };

        for kind in [RelationKind::Parent, RelationKind::Child, RelationKind::Friend] {
            let links: Vec<FieldLink> = self
                .extractor
                .field_links(&document, fields_for(&self.hierarchy, kind))
                .collect();

            for item in links {
                if !self.pages.contains(&item.link) {
                    self.diagnostics
                        .report(&GraphError::UnresolvedFieldReference {
                            page: id.to_string(),
                            target: item.link,
                            field: item.field,
                        });
                    continue;
                }
                self.link_unchecked(id, &item.link, kind, RelationType::defined(item.field));
            }
        }
    }

    fn seed_backlinks(&mut self, id: &str) {
        let sources: BTreeSet<String> = self
            .index
            .backlinks(id)
            .into_iter()
            .map(|link| self.index.resolve_link(&link, id).unwrap_or(link))
            .collect();

        for source in sources {
            if !self.pages.contains(&source) {
                self.diagnostics.report(&GraphError::UnregisteredBacklink {
                    page: id.to_string(),
                    from: source,
                });
                continue;
            }
            self.link_unchecked(&source, id, RelationKind::Child, RelationType::Inferred);
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Consistency
    // ─────────────────────────────────────────────────────────────────────

    /// Lists `(page, neighbour)` slots whose neighbour lacks the matching
    /// reciprocal slot. Empty for a consistent graph.
    pub fn check_reciprocity(&self) -> Vec<(String, String)> {
        let mut broken = Vec::new();
        for page in self.iter() {
            for (other, rel) in page.neighbours() {
                let back = self.get(other).and_then(|p| p.relation_to(page.id()));
                if back != Some(&rel.reciprocal()) {
                    broken.push((page.id().to_string(), other.to_string()));
                }
            }
        }
        broken.sort();
        broken
    }
}

fn fields_for(hierarchy: &HierarchyConfig, kind: RelationKind) -> &[String] {
    match kind {
        RelationKind::Parent => &hierarchy.parents,
        RelationKind::Child => &hierarchy.children,
        RelationKind::Friend => &hierarchy.friends,
    }
}

/// Flattens a link table into `(source, target)` pairs, optionally keeping
/// only one source row.
fn scoped_pairs(
    table: &neuro_core::LinkTable,
    scope: Option<&str>,
) -> Vec<(String, String)> {
    table
        .iter()
        .filter(|(source, _)| scope.map_or(true, |s| s == source.as_str()))
        .flat_map(|(source, row)| {
            row.keys()
                .map(move |target| (source.clone(), target.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemoryDiagnostics;
    use crate::relation::Relation;
    use neuro_core::{MemoryFieldLinks, MemoryIndex};
    use std::sync::Arc;

    type TestRegistry = PageRegistry<MemoryIndex, MemoryFieldLinks>;

    fn registry(index: MemoryIndex) -> (TestRegistry, Arc<MemoryDiagnostics>) {
        let sink = Arc::new(MemoryDiagnostics::new());
        let reg = PageRegistry::new(index, MemoryFieldLinks::new(), HierarchyConfig::default())
            .with_diagnostics(Arc::clone(&sink));
        (reg, sink)
    }

    #[test]
    fn test_link_writes_both_sides() {
        let (mut reg, _) = registry(MemoryIndex::new());
        reg.add(Page::resolved(Document::new("a.md")));
        reg.add(Page::resolved(Document::new("b.md")));

        reg.link("a.md", "b.md", RelationKind::Parent, RelationType::defined("up"))
            .unwrap();

        assert_eq!(
            reg.get("a.md").unwrap().relation_to("b.md"),
            Some(&Relation::defined(RelationKind::Parent, "up"))
        );
        assert_eq!(
            reg.get("b.md").unwrap().relation_to("a.md"),
            Some(&Relation::defined(RelationKind::Child, "up"))
        );
    }

    #[test]
    fn test_link_missing_endpoint_changes_nothing() {
        let (mut reg, _) = registry(MemoryIndex::new());
        reg.add(Page::resolved(Document::new("a.md")));

        let err = reg
            .link("a.md", "nope.md", RelationKind::Child, RelationType::Inferred)
            .unwrap_err();

        assert_eq!(err, GraphError::PageNotFound("nope.md".into()));
        assert_eq!(reg.get("a.md").unwrap().neighbour_count(), 0);
    }

    #[test]
    fn test_self_link_is_ignored() {
        let (mut reg, _) = registry(MemoryIndex::new());
        reg.add(Page::resolved(Document::new("a.md")));

        reg.link("a.md", "a.md", RelationKind::Friend, RelationType::Inferred)
            .unwrap();
        assert_eq!(reg.get("a.md").unwrap().neighbour_count(), 0);
    }

    #[test]
    fn test_add_replaces_existing_page_cleanly() {
        let (mut reg, _) = registry(MemoryIndex::new());
        reg.add(Page::resolved(Document::new("a.md")));
        reg.add(Page::resolved(Document::new("b.md")));
        reg.link("a.md", "b.md", RelationKind::Child, RelationType::Inferred)
            .unwrap();

        let previous = reg.add(Page::resolved(Document::new("a.md")));

        assert_eq!(previous.map(|p| p.id().to_string()), Some("a.md".to_string()));
        assert_eq!(reg.get("a.md").unwrap().neighbour_count(), 0);
        assert_eq!(reg.get("b.md").unwrap().neighbour_count(), 0);
        assert!(reg.check_reciprocity().is_empty());
    }

    #[test]
    fn test_delete_unknown_is_noop() {
        let (mut reg, _) = registry(MemoryIndex::new());
        reg.add(Page::resolved(Document::new("a.md")));

        assert!(reg.delete("missing.md").is_none());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_delete_prunes_only_one_hop() {
        // a -> Ghost is the only link to Ghost. Ghost -> Deep never happens
        // in practice, but wiring it by hand shows pruning doesn't cascade.
        let (mut reg, _) = registry(MemoryIndex::new());
        reg.add(Page::resolved(Document::new("a.md")));
        reg.add(Page::placeholder("Ghost"));
        reg.add(Page::placeholder("Deep"));
        reg.link("a.md", "Ghost", RelationKind::Child, RelationType::Inferred)
            .unwrap();
        reg.link("Ghost", "Deep", RelationKind::Child, RelationType::Inferred)
            .unwrap();

        reg.delete("a.md");

        // Ghost still has Deep, so it survives.
        assert!(reg.contains("Ghost"));
        assert!(reg.contains("Deep"));

        reg.delete("Ghost");
        assert!(!reg.contains("Deep"));
        assert!(reg.is_empty());
    }

    #[test]
    fn test_backlink_from_unregistered_page_is_reported() {
        let mut index = MemoryIndex::new();
        index.add_document("a.md");
        index.add_document("b.md");
        index.add_link("a.md", "b");
        let (mut reg, sink) = registry(index);

        reg.add_with_connections(Document::new("b.md"));

        assert_eq!(
            sink.reported(),
            vec![GraphError::UnregisteredBacklink {
                page: "b.md".into(),
                from: "a.md".into(),
            }]
        );
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_resolved_row_with_unknown_page_is_reported() {
        let mut index = MemoryIndex::new();
        index.add_document("a.md");
        index.add_document("b.md");
        index.add_link("a.md", "b");
        let (mut reg, sink) = registry(index);
        reg.add(Page::resolved(Document::new("a.md")));

        reg.add_resolved_links(None);

        assert_eq!(
            sink.reported(),
            vec![GraphError::MissingLinkEndpoint {
                from: "a.md".into(),
                to: "b.md".into(),
            }]
        );
        assert_eq!(reg.get("a.md").unwrap().neighbour_count(), 0);
    }

    #[test]
    fn test_unresolved_row_without_source_creates_no_placeholder() {
        let mut index = MemoryIndex::new();
        index.add_document("a.md");
        index.add_link("a.md", "Ghost");
        let (mut reg, sink) = registry(index);

        reg.add_unresolved_links(None);

        assert!(reg.is_empty());
        assert_eq!(sink.reported().len(), 1);
    }

    #[test]
    fn test_scoped_pass_ignores_other_rows() {
        let mut index = MemoryIndex::new();
        for doc in ["a.md", "b.md", "c.md"] {
            index.add_document(doc);
        }
        index.add_link("a.md", "b");
        index.add_link("c.md", "b");
        let (mut reg, _) = registry(index);
        for doc in ["a.md", "b.md", "c.md"] {
            reg.add(Page::resolved(Document::new(doc)));
        }

        reg.add_resolved_links(Some("a.md"));

        let b = reg.get("b.md").unwrap();
        assert_eq!(b.parents().collect::<Vec<_>>(), vec!["a.md"]);
    }

    #[test]
    fn test_fields_skip_placeholders() {
        let mut index = MemoryIndex::new();
        index.add_document("a.md");
        index.add_link("a.md", "Ghost");
        let (mut reg, sink) = registry(index);
        reg.extractor_mut().insert("Ghost", "parent", "a.md");

        reg.add_with_connections(Document::new("a.md"));
        reg.add_field_links("Ghost");

        assert!(sink.reported().is_empty());
        assert_eq!(
            reg.get("Ghost").unwrap().relation_to("a.md"),
            Some(&Relation::inferred(RelationKind::Parent))
        );
    }

    #[test]
    fn test_reonboarding_prunes_orphaned_placeholder() {
        let mut index = MemoryIndex::new();
        index.add_document("a.md");
        index.add_link("a.md", "Ghost");
        let (mut reg, _) = registry(index);
        reg.add_with_connections(Document::new("a.md"));
        assert!(reg.contains("Ghost"));

        reg.index_mut().clear_links("a.md");
        reg.add_with_connections(Document::new("a.md"));

        assert!(!reg.contains("Ghost"));
        assert_eq!(reg.len(), 1);
    }
}
