//! HTML-backed document
//!
//! [`HtmlDocument`] parses a page with `scraper` and exposes its
//! text-bearing elements through the [`Document`] trait. The parsed tree is
//! kept read-only; replaced text and state attributes live in an overlay
//! keyed by node id and are materialized by [`HtmlDocument::render`], which
//! serializes the page back to HTML.
//!
//! Replacing an element's text collapses its children to a single text node,
//! matching the text-content assignment semantics of in-browser translation.

use crate::document::Document;
use ego_tree::{NodeId, NodeRef};
use scraper::node::Element;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::{BTreeMap, HashMap};

/// Tags considered text-bearing and therefore candidates for translation
const CANDIDATE_TAGS: &str = "p, h1, h2, h3, h4, h5, h6, li, span, a, td, th, button, label";

/// Elements serialized without a closing tag
const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose text content is serialized raw
const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

/// Structural exclusion rules applied during candidate selection
///
/// An element is excluded when it, or any ancestor, is a `nav`, carries the
/// admin bar or language switcher id, or carries the skip class. The checks
/// walk each candidate's own branch, so exclusions are per-branch rather
/// than page-global.
#[derive(Debug, Clone)]
pub struct ScanRules {
    /// Id of the host toolbar region never sent for translation
    pub admin_bar_id: String,
    /// Class opting an element (and its subtree) out of translation
    pub skip_class: String,
    /// Id of the language selector container
    pub switcher_id: String,
    /// Class fragment marking icon spans, which carry glyphs rather than prose
    pub icon_marker: String,
}

impl Default for ScanRules {
    fn default() -> Self {
        Self {
            admin_bar_id: "wpadminbar".to_string(),
            skip_class: "skip-translate".to_string(),
            switcher_id: "language-switcher".to_string(),
            icon_marker: "icon".to_string(),
        }
    }
}

#[derive(Debug, Default)]
struct NodeOverlay {
    /// Replacement for the element's entire text content
    text: Option<String>,
    /// Attribute overrides; `None` masks an attribute present in the markup
    attrs: BTreeMap<String, Option<String>>,
}

/// A parsed HTML page with translation state
pub struct HtmlDocument {
    html: Html,
    rules: ScanRules,
    state: HashMap<NodeId, NodeOverlay>,
}

impl HtmlDocument {
    /// Parse a full HTML document
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
            rules: ScanRules::default(),
            state: HashMap::new(),
        }
    }

    /// Replace the default [`ScanRules`]
    pub fn with_rules(mut self, rules: ScanRules) -> Self {
        self.rules = rules;
        self
    }

    fn candidate_selector() -> Selector {
        Selector::parse(CANDIDATE_TAGS).expect("candidate tag selector is valid")
    }

    fn overlay_mut(&mut self, id: NodeId) -> &mut NodeOverlay {
        self.state.entry(id).or_default()
    }

    fn is_excluded(&self, el: ElementRef<'_>) -> bool {
        let element = el.value();
        let name = element.name();
        if (name == "li" || name == "a") && has_class(element, &self.rules.skip_class) {
            return true;
        }
        if name == "span" && class_contains(element, &self.rules.icon_marker) {
            return true;
        }
        for node in std::iter::once(*el).chain(el.ancestors()) {
            if let Some(ancestor) = node.value().as_element() {
                if ancestor.name() == "nav" {
                    return true;
                }
                if let Some(id) = ancestor.attr("id") {
                    if id == self.rules.admin_bar_id || id == self.rules.switcher_id {
                        return true;
                    }
                }
                if has_class(ancestor, &self.rules.skip_class) {
                    return true;
                }
            }
        }
        false
    }

    /// Serialize the page back to HTML, applying all replaced text and
    /// attribute state
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_node(self.html.tree.root(), &mut out);
        out
    }

    fn render_node(&self, node: NodeRef<'_, Node>, out: &mut String) {
        match node.value() {
            Node::Element(element) => self.render_element(node, element, out),
            Node::Text(text) => {
                let raw = node
                    .parent()
                    .and_then(|p| p.value().as_element().map(|e| e.name().to_string()))
                    .is_some_and(|name| RAW_TEXT_ELEMENTS.contains(&name.as_str()));
                if raw {
                    out.push_str(text.as_ref());
                } else {
                    escape_text(text.as_ref(), out);
                }
            }
            Node::Comment(comment) => {
                out.push_str("<!--");
                out.push_str(comment);
                out.push_str("-->");
            }
            Node::Doctype(doctype) => {
                out.push_str("<!DOCTYPE ");
                out.push_str(doctype.name());
                out.push('>');
            }
            // Document and fragment roots only contribute their children
            _ => {
                for child in node.children() {
                    self.render_node(child, out);
                }
            }
        }
    }

    fn render_element(&self, node: NodeRef<'_, Node>, element: &Element, out: &mut String) {
        let name = element.name();
        let overlay = self.state.get(&node.id());

        out.push('<');
        out.push_str(name);
        for (attr_name, attr_value) in element.attrs() {
            if overlay.is_some_and(|o| o.attrs.contains_key(attr_name)) {
                continue;
            }
            push_attr(attr_name, attr_value, out);
        }
        if let Some(overlay) = overlay {
            for (attr_name, attr_value) in &overlay.attrs {
                if let Some(value) = attr_value {
                    push_attr(attr_name, value, out);
                }
            }
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&name) {
            return;
        }

        if let Some(text) = overlay.and_then(|o| o.text.as_deref()) {
            escape_text(text, out);
        } else {
            for child in node.children() {
                self.render_node(child, out);
            }
        }

        out.push_str("</");
        out.push_str(name);
        out.push('>');
    }
}

impl std::fmt::Debug for HtmlDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlDocument")
            .field("rules", &self.rules)
            .field("tracked_nodes", &self.state.len())
            .finish()
    }
}

impl Document for HtmlDocument {
    type Handle = NodeId;

    fn candidates(&self) -> Vec<NodeId> {
        self.html
            .select(&Self::candidate_selector())
            .filter(|el| !self.is_excluded(*el))
            .map(|el| el.id())
            .collect()
    }

    fn text(&self, handle: NodeId) -> String {
        if let Some(text) = self.state.get(&handle).and_then(|o| o.text.as_ref()) {
            return text.clone();
        }
        self.html
            .tree
            .get(handle)
            .and_then(ElementRef::wrap)
            .map(|el| el.text().collect::<String>())
            .unwrap_or_default()
    }

    fn set_text(&mut self, handle: NodeId, text: &str) {
        self.overlay_mut(handle).text = Some(text.to_string());
    }

    fn attr(&self, handle: NodeId, name: &str) -> Option<String> {
        if let Some(overlay) = self.state.get(&handle) {
            if let Some(value) = overlay.attrs.get(name) {
                return value.clone();
            }
        }
        self.html
            .tree
            .get(handle)
            .and_then(|node| node.value().as_element())
            .and_then(|el| el.attr(name))
            .map(|v| v.to_string())
    }

    fn set_attr(&mut self, handle: NodeId, name: &str, value: &str) {
        self.overlay_mut(handle)
            .attrs
            .insert(name.to_string(), Some(value.to_string()));
    }

    fn remove_attr(&mut self, handle: NodeId, name: &str) {
        self.overlay_mut(handle).attrs.insert(name.to_string(), None);
    }

    fn clear_attr(&mut self, name: &str) {
        // Attributes carried by the markup itself
        if let Ok(selector) = Selector::parse(&format!("[{}]", name)) {
            let ids: Vec<NodeId> = self.html.select(&selector).map(|el| el.id()).collect();
            for id in ids {
                self.overlay_mut(id).attrs.insert(name.to_string(), None);
            }
        }
        // Attributes set through the overlay
        for overlay in self.state.values_mut() {
            if let Some(slot) = overlay.attrs.get_mut(name) {
                *slot = None;
            }
        }
    }
}

fn has_class(element: &Element, class: &str) -> bool {
    element
        .attr("class")
        .is_some_and(|c| c.split_whitespace().any(|part| part == class))
}

fn class_contains(element: &Element, fragment: &str) -> bool {
    element.attr("class").is_some_and(|c| c.contains(fragment))
}

fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

fn push_attr(name: &str, value: &str, out: &mut String) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out.push('"');
}
