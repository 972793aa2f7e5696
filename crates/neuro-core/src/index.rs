//! The host's document metadata index.
//!
//! The graph never reads files. Everything it knows about links comes
//! through [`MetadataIndex`], which the host keeps up to date.

use crate::document::Document;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::debug;

/// Source path -> link target -> number of links.
///
/// For resolved links the target is a canonical document path. For
/// unresolved links it is the raw link text that matched no document.
pub type LinkTable = BTreeMap<String, BTreeMap<String, usize>>;

/// Read access to the host's link tables.
pub trait MetadataIndex {
    /// Link keys of every document that links to `path`.
    ///
    /// Keys may be link text rather than canonical paths; callers pass
    /// them through [`MetadataIndex::resolve_link`].
    fn backlinks(&self, path: &str) -> Vec<String>;

    /// Resolves link text as written in `source_path` to a document path.
    fn resolve_link(&self, link: &str, source_path: &str) -> Option<String>;

    /// Every resolved link in the vault.
    fn resolved_links(&self) -> &LinkTable;

    /// Every link whose target has no document.
    fn unresolved_links(&self) -> &LinkTable;
}

impl<T: MetadataIndex + ?Sized> MetadataIndex for &T {
    fn backlinks(&self, path: &str) -> Vec<String> {
        (**self).backlinks(path)
    }

    fn resolve_link(&self, link: &str, source_path: &str) -> Option<String> {
        (**self).resolve_link(link, source_path)
    }

    fn resolved_links(&self) -> &LinkTable {
        (**self).resolved_links()
    }

    fn unresolved_links(&self) -> &LinkTable {
        (**self).unresolved_links()
    }
}

impl<T: MetadataIndex + ?Sized> MetadataIndex for Arc<T> {
    fn backlinks(&self, path: &str) -> Vec<String> {
        (**self).backlinks(path)
    }

    fn resolve_link(&self, link: &str, source_path: &str) -> Option<String> {
        (**self).resolve_link(link, source_path)
    }

    fn resolved_links(&self) -> &LinkTable {
        (**self).resolved_links()
    }

    fn unresolved_links(&self) -> &LinkTable {
        (**self).unresolved_links()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// MemoryIndex
// ─────────────────────────────────────────────────────────────────────────────

/// A materialized metadata index.
///
/// Link text is resolved the way note apps usually do it: an exact path
/// first, then the path with `.md` appended, then the first document
/// (in path order) whose basename matches.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MemoryIndex {
    #[serde(default)]
    documents: BTreeSet<String>,

    #[serde(default)]
    resolved: LinkTable,

    #[serde(default)]
    unresolved: LinkTable,
}

impl MemoryIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a snapshot previously produced by [`MemoryIndex::to_json`].
    pub fn from_json_str(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Serializes the index as a JSON snapshot.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Registers a document path.
    pub fn add_document(&mut self, path: impl Into<String>) {
        self.documents.insert(path.into());
    }

    /// Records one link from `source` written as `link`.
    ///
    /// Goes into the resolved table when the text resolves to a known
    /// document, otherwise into the unresolved table under the raw text.
    pub fn add_link(&mut self, source: &str, link: &str) {
        let (table, target) = match self.resolve_link(link, source) {
            Some(path) => (&mut self.resolved, path),
            None => (&mut self.unresolved, link.to_string()),
        };
        *table
            .entry(source.to_string())
            .or_default()
            .entry(target)
            .or_default() += 1;
    }

    /// Drops a document together with its outgoing links and every
    /// resolved link pointing at it.
    pub fn remove_document(&mut self, path: &str) {
        if !self.documents.remove(path) {
            debug!("Removing unknown document {}", path);
        }
        self.resolved.remove(path);
        self.unresolved.remove(path);
        for row in self.resolved.values_mut() {
            row.remove(path);
        }
        self.resolved.retain(|_, row| !row.is_empty());
    }

    /// Forgets the outgoing links of `source`, e.g. before re-reading it.
    pub fn clear_links(&mut self, source: &str) {
        self.resolved.remove(source);
        self.unresolved.remove(source);
    }

    /// Whether `path` is a known document.
    pub fn contains(&self, path: &str) -> bool {
        self.documents.contains(path)
    }

    /// Handles for every known document, in path order.
    pub fn documents(&self) -> impl Iterator<Item = Document> + '_ {
        self.documents.iter().map(|p| Document::new(p.as_str()))
    }

    fn basename_match(&self, link: &str) -> Option<&String> {
        self.documents
            .iter()
            .find(|p| Document::new(p.as_str()).basename == link)
    }
}

impl MetadataIndex for MemoryIndex {
    fn backlinks(&self, path: &str) -> Vec<String> {
        self.resolved
            .iter()
            .filter(|(_, row)| row.contains_key(path))
            .map(|(source, _)| source.clone())
            .collect()
    }

    fn resolve_link(&self, link: &str, _source_path: &str) -> Option<String> {
        // Strip heading/block anchors and aliases: [[Note#Heading|Alias]]
        let target = link
            .split(['#', '|'])
            .next()
            .unwrap_or(link)
            .trim();
        if target.is_empty() {
            return None;
        }

        if self.documents.contains(target) {
            return Some(target.to_string());
        }
        let with_ext = format!("{}.md", target);
        if self.documents.contains(&with_ext) {
            return Some(with_ext);
        }
        self.basename_match(target).cloned()
    }

    fn resolved_links(&self) -> &LinkTable {
        &self.resolved
    }

    fn unresolved_links(&self) -> &LinkTable {
        &self.unresolved
    }
}
