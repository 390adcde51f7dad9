//! Shadow DOM
//!
//! Shadow roots hosted by elements and the tree scopes they create.
//! Light children are not slotted; the composed order is shadow content
//! followed by light content.

use crate::{Document, DomError, Node, NodeId};

/// Shadow root mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadowRootMode {
    #[default]
    Open,
    Closed,
}

impl ShadowRootMode {
    /// Parse a `shadowrootmode` attribute value
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Some(Self::Open),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

/// Shadow root data
#[derive(Debug, Clone)]
pub struct ShadowRootData {
    /// Host element
    pub host: NodeId,
    /// Mode (open/closed)
    pub mode: ShadowRootMode,
    /// Whether focus is delegated to the first focusable element
    pub delegates_focus: bool,
}

impl ShadowRootData {
    pub fn new(host: NodeId, mode: ShadowRootMode) -> Self {
        Self { host, mode, delegates_focus: false }
    }
}

/// Elements that may host a shadow root
const VALID_SHADOW_HOSTS: &[&str] = &[
    "article", "aside", "blockquote", "body", "div", "footer", "h1", "h2", "h3",
    "h4", "h5", "h6", "header", "main", "nav", "p", "section", "span",
];

impl Document {
    /// Attach a shadow root to `host`
    pub fn attach_shadow(&mut self, host: NodeId, mode: ShadowRootMode) -> Result<NodeId, DomError> {
        let elem = self.element(host).ok_or(DomError::NotAnElement(host))?;
        if elem.shadow_root.is_valid() {
            return Err(DomError::ShadowRootExists(host));
        }
        let valid_host = VALID_SHADOW_HOSTS.contains(&elem.name.as_str()) || elem.name.contains('-');
        if !valid_host {
            return Err(DomError::HierarchyRequest(format!("<{}> cannot host a shadow root", elem.name)));
        }

        let shadow = self.tree.create_node(Node::shadow_root(host, mode));
        if let Some(elem) = self.element_mut(host) {
            elem.shadow_root = shadow;
        }
        tracing::trace!(?host, ?shadow, "attached shadow root");
        Ok(shadow)
    }

    /// Shadow root hosted by `host`, if any
    pub fn shadow_root(&self, host: NodeId) -> Option<NodeId> {
        self.element(host)?.shadow_root.to_option()
    }

    /// Root of the tree scope containing `id`: the document or a shadow root
    pub fn tree_scope(&self, id: NodeId) -> NodeId {
        let mut current = id;
        loop {
            let Some(node) = self.tree.get(current) else {
                return NodeId::ROOT;
            };
            if current == NodeId::ROOT || node.is_shadow_root() {
                return current;
            }
            if !node.parent.is_valid() {
                return current;
            }
            current = node.parent;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_shadow_and_scope() {
        let mut doc = Document::default();
        let host = doc.create_element("my-widget");
        doc.append_child(doc.body(), host).unwrap();
        let shadow = doc.attach_shadow(host, ShadowRootMode::Open).unwrap();
        let button = doc.create_element("button");
        doc.append_child(shadow, button).unwrap();

        assert_eq!(doc.shadow_root(host), Some(shadow));
        assert_eq!(doc.tree_scope(button), shadow);
        assert_eq!(doc.parent_element(button), Some(host));
        assert!(doc.is_connected(button));
        assert_eq!(doc.composed_children(host), vec![button]);
    }

    #[test]
    fn test_invalid_hosts_rejected() {
        let mut doc = Document::default();
        let input = doc.create_element("input");
        doc.append_child(doc.body(), input).unwrap();
        assert!(doc.attach_shadow(input, ShadowRootMode::Open).is_err());

        let div = doc.create_element("div");
        doc.append_child(doc.body(), div).unwrap();
        doc.attach_shadow(div, ShadowRootMode::Closed).unwrap();
        assert!(matches!(
            doc.attach_shadow(div, ShadowRootMode::Open),
            Err(DomError::ShadowRootExists(_))
        ));
    }

    #[test]
    fn test_ids_are_scoped() {
        let mut doc = Document::default();
        let host = doc.create_element("div");
        doc.append_child(doc.body(), host).unwrap();
        let shadow = doc.attach_shadow(host, ShadowRootMode::Open).unwrap();
        let inner = doc.create_element("span");
        doc.append_child(shadow, inner).unwrap();
        doc.set_attribute(inner, "id", "label").unwrap();

        assert_eq!(doc.get_element_by_id("label"), None);
        assert_eq!(doc.get_element_by_id_in_scope(shadow, "label"), Some(inner));
    }
}
