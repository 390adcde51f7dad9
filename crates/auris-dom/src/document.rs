//! Document - High-level document API
//!
//! Wraps the arena tree with the read surface the accessibility core
//! queries and the mutating surface that feeds mutation observers.

use std::fmt;

use crate::events::Listeners;
use crate::observer::{MutationRecord, MutationType, Observation};
use crate::style::StyleSheet;
use crate::{DomError, DomTree, ElementData, NodeData, NodeId};

/// HTML Document
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
    /// Element holding input focus (NONE when the body has it)
    pub(crate) focused: NodeId,
    /// Author style rules
    pub(crate) stylesheet: StyleSheet,
    /// Mutation observer registration
    pub(crate) observation: Observation,
    /// Click listeners standing in for page scripts
    pub(crate) listeners: Listeners,
    /// Forms that passed validation and were submitted, in order
    pub(crate) submissions: Vec<NodeId>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("url", &self.url)
            .field("nodes", &self.tree.len())
            .field("focused", &self.focused)
            .field("rules", &self.stylesheet.len())
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

impl Document {
    /// Create a new document with html/head/body
    pub fn new(url: &str) -> Self {
        let mut doc = Self::empty(url);
        let html = doc.tree.create_element("html");
        let head = doc.tree.create_element("head");
        let body = doc.tree.create_element("body");

        // Fresh nodes under a fresh root cannot fail hierarchy checks
        let _ = doc.tree.append_child(NodeId::ROOT, html);
        let _ = doc.tree.append_child(html, head);
        let _ = doc.tree.append_child(html, body);

        doc.html_element = html;
        doc.head_element = head;
        doc.body_element = body;
        doc
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
            focused: NodeId::NONE,
            stylesheet: StyleSheet::default(),
            observation: Observation::default(),
            listeners: Listeners::default(),
            submissions: Vec::new(),
        }
    }

    /// Locate html/head/body after bulk construction (e.g. by a parser)
    pub fn finalize(&mut self) {
        self.html_element = self.find_child_element(NodeId::ROOT, "html");
        if self.html_element.is_valid() {
            self.head_element = self.find_child_element(self.html_element, "head");
            self.body_element = self.find_child_element(self.html_element, "body");
        }
        tracing::trace!(nodes = self.tree.len(), "document finalized");
    }

    fn find_child_element(&self, parent: NodeId, tag: &str) -> NodeId {
        self.tree.element_children(parent)
            .find(|&id| self.tag_name(id) == Some(tag))
            .unwrap_or(NodeId::NONE)
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get document title
    pub fn title(&self) -> String {
        if !self.head_element.is_valid() {
            return String::new();
        }
        let title = self.find_child_element(self.head_element, "title");
        if title.is_valid() {
            collapse_whitespace(&self.text_content(title))
        } else {
            String::new()
        }
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably. Changes made here bypass mutation records.
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// Author stylesheet
    pub fn stylesheet_mut(&mut self) -> &mut StyleSheet {
        &mut self.stylesheet
    }

    // ------------------------------------------------------------------
    // Read surface
    // ------------------------------------------------------------------

    /// Element data for `id`, if it is an element
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.tree.get(id)?.as_element()
    }

    pub(crate) fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.tree.get_mut(id)?.as_element_mut()
    }

    /// Check if `id` is an element
    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    /// Lower-cased tag name
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.name.as_str())
    }

    /// Attribute value
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.get_attr(name)
    }

    /// Attribute presence
    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.element(id).is_some_and(|e| e.has_attr(name))
    }

    /// Concatenated text of all light-tree descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.tree.get(id).and_then(|n| n.as_text()) {
            return text.to_string();
        }
        let mut out = String::new();
        for node in self.tree.descendants(id) {
            if let Some(text) = self.tree.get(node).and_then(|n| n.as_text()) {
                out.push_str(text);
            }
        }
        out
    }

    /// Direct text children only (no descendants), concatenated
    pub fn own_text(&self, id: NodeId) -> String {
        self.tree.children(id)
            .filter_map(|(_, node)| node.as_text())
            .collect()
    }

    /// Element children in the light tree
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.tree.element_children(id).collect()
    }

    /// Children in rendering order: shadow root children first, then light children
    pub fn composed_children(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if let Some(shadow) = self.shadow_root(id) {
            out.extend(self.tree.children(shadow).map(|(c, _)| c));
        }
        out.extend(self.tree.children(id).map(|(c, _)| c));
        out
    }

    /// Parent, stepping from a shadow root to its host
    pub fn composed_parent(&self, id: NodeId) -> NodeId {
        match self.tree.get(id) {
            Some(node) => match node.as_shadow_root() {
                Some(shadow) => shadow.host,
                None => node.parent,
            },
            None => NodeId::NONE,
        }
    }

    /// Nearest element ancestor, crossing shadow boundaries
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.composed_parent(id);
        while current.is_valid() {
            if self.is_element(current) {
                return Some(current);
            }
            current = self.composed_parent(current);
        }
        None
    }

    /// Element ancestors, nearest first, crossing shadow boundaries
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors { doc: self, next: self.parent_element(id) }
    }

    /// Nearest inclusive element ancestor matching `pred`
    pub fn closest(&self, id: NodeId, pred: impl Fn(NodeId) -> bool) -> Option<NodeId> {
        if self.is_element(id) && pred(id) {
            return Some(id);
        }
        self.ancestors(id).find(|&a| pred(a))
    }

    /// Check whether `ancestor` is `node` or a composed ancestor of it
    pub fn contains_composed(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = node;
        while current.is_valid() {
            if current == ancestor {
                return true;
            }
            current = self.composed_parent(current);
        }
        false
    }

    /// Whether the node is still attached to the document
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.tree.get(id).is_some() && self.contains_composed(NodeId::ROOT, id)
    }

    /// Get element by ID in the document tree scope
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.get_element_by_id_in_scope(NodeId::ROOT, id)
    }

    /// Get element by ID within a tree scope (document or shadow root)
    pub fn get_element_by_id_in_scope(&self, scope: NodeId, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.tree.descendants(scope)
            .into_iter()
            .find(|&node| self.element(node).and_then(|e| e.id()) == Some(id))
    }

    // ------------------------------------------------------------------
    // Mutating surface (queues mutation records)
    // ------------------------------------------------------------------

    /// Create an unattached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.tree.create_element(tag)
    }

    /// Create an unattached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.tree.create_text(content)
    }

    /// Append a child
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.insert_before(parent, child, NodeId::NONE)
    }

    /// Insert a child before `reference` (NONE appends)
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) -> Result<(), DomError> {
        let old_parent = self.tree.get(child).map_or(NodeId::NONE, |n| n.parent);
        self.tree.insert_before(parent, child, reference)?;
        if old_parent.is_valid() {
            self.queue_record(MutationRecord::child_list(old_parent, Vec::new(), vec![child]));
        }
        self.queue_record(MutationRecord::child_list(parent, vec![child], Vec::new()));
        Ok(())
    }

    /// Remove a node from its parent
    pub fn remove(&mut self, child: NodeId) -> Result<(), DomError> {
        if self.tree.get(child).is_none() {
            return Err(DomError::NotFound(child));
        }
        if self.focused.is_valid() && self.contains_composed(child, self.focused) {
            self.focused = NodeId::NONE;
        }
        let parent = self.tree.detach(child);
        if parent.is_valid() {
            self.queue_record(MutationRecord::child_list(parent, Vec::new(), vec![child]));
        }
        Ok(())
    }

    /// Set an attribute
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let elem = self.element_mut(id).ok_or(DomError::NotAnElement(id))?;
        let old_value = elem.set_attr(name, value);
        self.queue_record(MutationRecord::attribute(id, name, old_value));
        Ok(())
    }

    /// Remove an attribute. Returns whether it was present.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<bool, DomError> {
        let elem = self.element_mut(id).ok_or(DomError::NotAnElement(id))?;
        match elem.remove_attr(name) {
            Some(old_value) => {
                self.queue_record(MutationRecord::attribute(id, name, Some(old_value)));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Replace text: character data for text nodes, children for elements
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> Result<(), DomError> {
        let node = self.tree.get(id).ok_or(DomError::NotFound(id))?;
        match (node.is_text(), node.is_element()) {
            (true, _) => {
                let mut old = String::new();
                if let Some(NodeData::Text(data)) = self.tree.get_mut(id).map(|n| &mut n.data) {
                    old = std::mem::replace(&mut data.content, text.to_string());
                }
                self.queue_record(MutationRecord {
                    mutation_type: MutationType::CharacterData,
                    target: id,
                    added_nodes: Vec::new(),
                    removed_nodes: Vec::new(),
                    attribute_name: None,
                    old_value: Some(old),
                });
                Ok(())
            }
            (false, true) => {
                let removed: Vec<NodeId> = self.tree.children(id).map(|(c, _)| c).collect();
                for &child in &removed {
                    if self.focused.is_valid() && self.contains_composed(child, self.focused) {
                        self.focused = NodeId::NONE;
                    }
                    self.tree.detach(child);
                }
                let mut added = Vec::new();
                if !text.is_empty() {
                    let text_node = self.tree.create_text(text);
                    self.tree.append_child(id, text_node)?;
                    added.push(text_node);
                }
                self.queue_record(MutationRecord::child_list(id, added, removed));
                Ok(())
            }
            _ => Err(DomError::NotAnElement(id)),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

/// Iterator over composed element ancestors
pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.doc.parent_element(current);
        Some(current)
    }
}

/// Collapse runs of whitespace to single spaces and trim
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_structure() {
        let doc = Document::new("https://example.com/");
        assert!(doc.body().is_valid());
        assert_eq!(doc.tag_name(doc.body()), Some("body"));
        assert_eq!(doc.parent_element(doc.body()), Some(doc.document_element()));
        assert!(doc.is_connected(doc.head()));
    }

    #[test]
    fn test_debug_summary() {
        let doc = Document::new("https://example.com/");
        let text = format!("{doc:?}");
        assert!(text.starts_with("Document {"));
        assert!(text.contains("url: \"https://example.com/\""));
    }

    #[test]
    fn test_title_and_text_content() {
        let mut doc = Document::new("about:blank");
        let title = doc.create_element("title");
        let text = doc.create_text("  My \n Page ");
        doc.append_child(doc.head(), title).unwrap();
        doc.append_child(title, text).unwrap();
        assert_eq!(doc.title(), "My Page");
        assert_eq!(doc.text_content(title), "  My \n Page ");
    }

    #[test]
    fn test_remove_disconnects_and_blurs() {
        let mut doc = Document::default();
        let div = doc.create_element("div");
        let button = doc.create_element("button");
        doc.append_child(doc.body(), div).unwrap();
        doc.append_child(div, button).unwrap();
        assert!(doc.focus(button));
        doc.remove(div).unwrap();
        assert!(!doc.is_connected(button));
        assert_eq!(doc.active_element(), None);
    }

    #[test]
    fn test_set_text_content_replaces_children() {
        let mut doc = Document::default();
        let p = doc.create_element("p");
        doc.append_child(doc.body(), p).unwrap();
        let span = doc.create_element("span");
        doc.append_child(p, span).unwrap();
        doc.set_text_content(p, "Hello").unwrap();
        assert_eq!(doc.element_children(p).len(), 0);
        assert_eq!(doc.own_text(p), "Hello");
    }

    #[test]
    fn test_closest_and_ancestors() {
        let mut doc = Document::default();
        let nav = doc.create_element("nav");
        let ul = doc.create_element("ul");
        let li = doc.create_element("li");
        doc.append_child(doc.body(), nav).unwrap();
        doc.append_child(nav, ul).unwrap();
        doc.append_child(ul, li).unwrap();

        assert_eq!(doc.closest(li, |id| doc.tag_name(id) == Some("nav")), Some(nav));
        assert_eq!(doc.closest(li, |id| doc.tag_name(id) == Some("li")), Some(li));
        let chain: Vec<NodeId> = doc.ancestors(li).collect();
        assert_eq!(chain[..2], [ul, nav]);
    }
}
