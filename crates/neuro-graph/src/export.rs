//! Flat views of the page graph for export and status reporting.

use crate::page::Page;
use crate::registry::PageRegistry;
use crate::relation::{RelationKind, RelationType};
use neuro_core::{FieldLinkExtractor, MetadataIndex};
use serde::{Deserialize, Serialize};

/// One logical edge. Parent/child pairs are listed once, from the parent;
/// friend pairs once, from the lexically smaller identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageEdge {
    pub source: String,
    pub target: String,
    pub kind: RelationKind,
    pub relation_type: RelationType,
}

/// Graph statistics for status output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub pages: usize,
    pub documents: usize,
    pub placeholders: usize,
    pub edges: usize,
}

#[derive(Serialize)]
struct GraphExport<'a> {
    stats: GraphStats,
    pages: Vec<&'a Page>,
    edges: Vec<PageEdge>,
}

impl<M: MetadataIndex, F: FieldLinkExtractor> PageRegistry<M, F> {
    /// Returns graph statistics.
    pub fn stats(&self) -> GraphStats {
        let placeholders = self.placeholders().count();
        GraphStats {
            pages: self.len(),
            documents: self.len() - placeholders,
            placeholders,
            edges: self.export_edges().len(),
        }
    }

    /// Returns every logical edge, sorted by source then target.
    pub fn export_edges(&self) -> Vec<PageEdge> {
        let mut edges: Vec<PageEdge> = self
            .iter()
            .flat_map(|page| {
                let source = page.page().id();
                page.neighbours()
                    .filter(move |(target, rel)| match rel.kind {
                        RelationKind::Child => true,
                        RelationKind::Friend => source < *target,
                        RelationKind::Parent => false,
                    })
                    .map(move |(target, rel)| PageEdge {
                        source: source.to_string(),
                        target: target.to_string(),
                        kind: rel.kind,
                        relation_type: rel.relation_type.clone(),
                    })
            })
            .collect();

        edges.sort_by(|a, b| {
            a.source
                .cmp(&b.source)
                .then_with(|| a.target.cmp(&b.target))
        });
        edges
    }

    /// Serializes stats, pages (sorted by identity) and edges as JSON.
    pub fn export_json(&self) -> serde_json::Result<String> {
        let mut pages: Vec<&Page> = self.iter().map(|view| view.page()).collect();
        pages.sort_by(|a, b| a.id().cmp(b.id()));

        serde_json::to_string_pretty(&GraphExport {
            stats: self.stats(),
            pages,
            edges: self.export_edges(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neuro_core::{Document, HierarchyConfig, MemoryFieldLinks, MemoryIndex};

    fn sample() -> PageRegistry<MemoryIndex, MemoryFieldLinks> {
        let mut index = MemoryIndex::new();
        for doc in ["a.md", "b.md", "c.md"] {
            index.add_document(doc);
        }
        index.add_link("a.md", "b");
        index.add_link("a.md", "Ghost");

        let mut fields = MemoryFieldLinks::new();
        fields.insert("c.md", "related", "b.md");

        let mut reg = PageRegistry::new(index, fields, HierarchyConfig::default());
        let docs: Vec<Document> = reg.index().documents().collect();
        reg.load(docs);
        reg
    }

    #[test]
    fn test_each_logical_edge_listed_once() {
        let reg = sample();
        let edges = reg.export_edges();

        let pairs: Vec<(&str, &str, RelationKind)> = edges
            .iter()
            .map(|e| (e.source.as_str(), e.target.as_str(), e.kind))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("a.md", "Ghost", RelationKind::Child),
                ("a.md", "b.md", RelationKind::Child),
                ("b.md", "c.md", RelationKind::Friend),
            ]
        );
        assert_eq!(edges[2].relation_type, RelationType::defined("related"));
    }

    #[test]
    fn test_stats() {
        let stats = sample().stats();
        assert_eq!(
            stats,
            GraphStats {
                pages: 4,
                documents: 3,
                placeholders: 1,
                edges: 3,
            }
        );
    }

    #[test]
    fn test_export_json_shape() {
        let json: serde_json::Value =
            serde_json::from_str(&sample().export_json().unwrap()).unwrap();

        assert_eq!(json["stats"]["pages"], 4);
        assert_eq!(json["pages"][0]["id"], "Ghost");
        assert_eq!(json["pages"][0]["source"]["state"], "placeholder");
        assert_eq!(json["edges"].as_array().map(|e| e.len()), Some(3));
    }
}
