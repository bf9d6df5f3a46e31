//! Document abstraction for the translation pipeline
//!
//! The pipeline never touches ambient global state: it owns a document value
//! behind the [`Document`] trait and reads/writes node text and attributes
//! through it. [`crate::html::HtmlDocument`] implements the trait over real
//! HTML; [`MemoryDocument`] is a flat in-memory implementation for tests and
//! headless use.

use std::collections::BTreeMap;
use std::hash::Hash;

/// Attribute holding a node's source-language text
///
/// Captured the first time a node is scanned and never overwritten by a
/// translation result; every later pass keys its cache lookups off this
/// value rather than whatever translation is currently displayed.
pub const ORIGINAL_TEXT_ATTR: &str = "data-evrth-original";

/// Attribute marking a node as translated for the current pass
///
/// Cleared from every node at the start of a pass so freshly rendered
/// content gets picked up on re-translation.
pub const TRANSLATED_ATTR: &str = "data-translated";

/// A mutable view of translatable content
///
/// `candidates` returns handles in document order; the pipeline relies on
/// that ordering when building chunks.
pub trait Document {
    /// Opaque node handle
    type Handle: Copy + Eq + Hash + std::fmt::Debug;

    /// Candidate nodes for translation, in document order, with structural
    /// exclusions (navigation, skip regions) already applied
    fn candidates(&self) -> Vec<Self::Handle>;

    /// Currently displayed text of a node
    fn text(&self, handle: Self::Handle) -> String;

    /// Replace the displayed text of a node
    fn set_text(&mut self, handle: Self::Handle, text: &str);

    /// Read a node attribute
    fn attr(&self, handle: Self::Handle, name: &str) -> Option<String>;

    /// Set a node attribute
    fn set_attr(&mut self, handle: Self::Handle, name: &str, value: &str);

    /// Remove a node attribute
    fn remove_attr(&mut self, handle: Self::Handle, name: &str);

    /// Remove an attribute from every node that carries it
    fn clear_attr(&mut self, name: &str);
}

/// Flat in-memory document
///
/// Each node is a bare text slot with attributes and an optional excluded
/// flag standing in for the structural exclusions a real document derives
/// from its tree.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    nodes: Vec<MemoryNode>,
}

#[derive(Debug)]
struct MemoryNode {
    text: String,
    attrs: BTreeMap<String, String>,
    excluded: bool,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a candidate node, returning its handle
    pub fn push(&mut self, text: &str) -> usize {
        self.nodes.push(MemoryNode {
            text: text.to_string(),
            attrs: BTreeMap::new(),
            excluded: false,
        });
        self.nodes.len() - 1
    }

    /// Append a node that `candidates` will never return
    pub fn push_excluded(&mut self, text: &str) -> usize {
        let handle = self.push(text);
        self.nodes[handle].excluded = true;
        handle
    }

    /// Displayed text of every node, excluded ones included
    pub fn texts(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.text.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Document for MemoryDocument {
    type Handle = usize;

    fn candidates(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| !n.excluded)
            .map(|(i, _)| i)
            .collect()
    }

    fn text(&self, handle: usize) -> String {
        self.nodes[handle].text.clone()
    }

    fn set_text(&mut self, handle: usize, text: &str) {
        self.nodes[handle].text = text.to_string();
    }

    fn attr(&self, handle: usize, name: &str) -> Option<String> {
        self.nodes[handle].attrs.get(name).cloned()
    }

    fn set_attr(&mut self, handle: usize, name: &str, value: &str) {
        self.nodes[handle]
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    fn remove_attr(&mut self, handle: usize, name: &str) {
        self.nodes[handle].attrs.remove(name);
    }

    fn clear_attr(&mut self, name: &str) {
        for node in &mut self.nodes {
            node.attrs.remove(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_preserve_document_order() {
        let mut doc = MemoryDocument::new();
        let a = doc.push("最初");
        let b = doc.push("二番目");
        let c = doc.push("三番目");
        assert_eq!(doc.candidates(), vec![a, b, c]);
    }

    #[test]
    fn test_excluded_nodes_are_hidden_from_candidates() {
        let mut doc = MemoryDocument::new();
        let a = doc.push("本文");
        doc.push_excluded("ナビゲーション");
        assert_eq!(doc.candidates(), vec![a]);
        // The node still exists and keeps its text
        assert_eq!(doc.texts().len(), 2);
    }

    #[test]
    fn test_attrs_set_get_remove() {
        let mut doc = MemoryDocument::new();
        let h = doc.push("ようこそ");
        assert_eq!(doc.attr(h, ORIGINAL_TEXT_ATTR), None);
        doc.set_attr(h, ORIGINAL_TEXT_ATTR, "ようこそ");
        assert_eq!(
            doc.attr(h, ORIGINAL_TEXT_ATTR),
            Some("ようこそ".to_string())
        );
        doc.remove_attr(h, ORIGINAL_TEXT_ATTR);
        assert_eq!(doc.attr(h, ORIGINAL_TEXT_ATTR), None);
    }

    #[test]
    fn test_clear_attr_touches_every_node() {
        let mut doc = MemoryDocument::new();
        let a = doc.push("一");
        let b = doc.push("二");
        doc.set_attr(a, TRANSLATED_ATTR, "true");
        doc.set_attr(b, TRANSLATED_ATTR, "true");
        doc.set_attr(a, ORIGINAL_TEXT_ATTR, "一");
        doc.clear_attr(TRANSLATED_ATTR);
        assert_eq!(doc.attr(a, TRANSLATED_ATTR), None);
        assert_eq!(doc.attr(b, TRANSLATED_ATTR), None);
        // Other attributes are untouched
        assert_eq!(doc.attr(a, ORIGINAL_TEXT_ATTR), Some("一".to_string()));
    }
}
