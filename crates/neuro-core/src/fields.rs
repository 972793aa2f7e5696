//! Structured field references.
//!
//! A field link is a `(field, target)` pair pulled from a document's
//! metadata, e.g. `parent:: [[Topic]]` yields `("parent", "Topic.md")`.
//! Extraction itself belongs to the host; the graph only consumes pairs.

use crate::document::Document;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// One structured reference found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldLink {
    /// Name of the field the reference was found under.
    pub field: String,

    /// Identity of the referenced page.
    pub link: String,
}

impl FieldLink {
    /// A reference to `link` found under `field`.
    pub fn new(field: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            link: link.into(),
        }
    }
}

/// Produces field links for a document.
pub trait FieldLinkExtractor {
    /// Lazily yields every link in `document` found under one of `fields`.
    fn field_links<'a>(
        &'a self,
        document: &'a Document,
        fields: &'a [String],
    ) -> Box<dyn Iterator<Item = FieldLink> + 'a>;
}

impl<T: FieldLinkExtractor + ?Sized> FieldLinkExtractor for &T {
    fn field_links<'a>(
        &'a self,
        document: &'a Document,
        fields: &'a [String],
    ) -> Box<dyn Iterator<Item = FieldLink> + 'a> {
        (**self).field_links(document, fields)
    }
}

impl<T: FieldLinkExtractor + ?Sized> FieldLinkExtractor for Arc<T> {
    fn field_links<'a>(
        &'a self,
        document: &'a Document,
        fields: &'a [String],
    ) -> Box<dyn Iterator<Item = FieldLink> + 'a> {
        (**self).field_links(document, fields)
    }
}

/// Field links held in memory, keyed by document path.
///
/// Field names match case-insensitively.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MemoryFieldLinks {
    #[serde(default)]
    links: HashMap<String, Vec<FieldLink>>,
}

impl MemoryFieldLinks {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a store from a JSON snapshot.
    pub fn from_json_str(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Records `field:: [[link]]` in the document at `path`.
    pub fn insert(&mut self, path: &str, field: &str, link: &str) {
        self.links
            .entry(path.to_string())
            .or_default()
            .push(FieldLink::new(field, link));
    }

    /// Forgets every field link of the document at `path`.
    pub fn clear(&mut self, path: &str) {
        self.links.remove(path);
    }
}

impl FieldLinkExtractor for MemoryFieldLinks {
    fn field_links<'a>(
        &'a self,
        document: &'a Document,
        fields: &'a [String],
    ) -> Box<dyn Iterator<Item = FieldLink> + 'a> {
        let Some(links) = self.links.get(&document.path) else {
            return Box::new(std::iter::empty());
        };
        Box::new(
            links
                .iter()
                .filter(move |l| fields.iter().any(|f| f.eq_ignore_ascii_case(&l.field)))
                .cloned(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_by_field_group() {
        let mut store = MemoryFieldLinks::new();
        store.insert("a.md", "Parent", "b.md");
        store.insert("a.md", "friend", "c.md");
        store.insert("a.md", "up", "d.md");

        let doc = Document::new("a.md");
        let parents = vec!["parent".to_string(), "up".to_string()];
        let found: Vec<FieldLink> = store.field_links(&doc, &parents).collect();

        assert_eq!(
            found,
            vec![
                FieldLink::new("Parent", "b.md"),
                FieldLink::new("up", "d.md"),
            ]
        );
    }

    #[test]
    fn test_unknown_document_yields_nothing() {
        let store = MemoryFieldLinks::new();
        let doc = Document::new("missing.md");
        let fields = vec!["parent".to_string()];
        assert_eq!(store.field_links(&doc, &fields).count(), 0);
    }
}
