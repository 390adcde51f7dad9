//! Focus Management
//!
//! Tab index parsing, native interactivity, disabled state and the
//! document's single input-focus slot.

use crate::{Document, NodeId};

/// Tab index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabIndex {
    /// `tabindex` < 0: focusable by script, skipped by Tab
    Programmatic,
    /// `tabindex` >= 0: in sequential focus order
    Sequential(i32),
}

impl TabIndex {
    /// Parse an attribute value; garbage is treated as absent
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().parse::<i32>() {
            Ok(n) if n < 0 => Some(Self::Programmatic),
            Ok(n) => Some(Self::Sequential(n)),
            Err(_) => None,
        }
    }

    pub fn is_tabbable(&self) -> bool {
        matches!(self, Self::Sequential(_))
    }
}

/// Elements that can carry the `disabled` attribute
const DISABLEABLE: &[&str] = &["button", "input", "select", "textarea", "optgroup", "option", "fieldset"];

impl Document {
    /// Parsed `tabindex`
    pub fn tab_index(&self, id: NodeId) -> Option<TabIndex> {
        self.attr(id, "tabindex").and_then(TabIndex::parse)
    }

    /// Whether the element is interactive without any tabindex
    pub fn is_natively_interactive(&self, id: NodeId) -> bool {
        let Some(tag) = self.tag_name(id) else {
            return false;
        };
        match tag {
            "a" | "area" => self.has_attr(id, "href"),
            "button" | "select" | "textarea" | "iframe" => true,
            "input" => self.input_type(id) != "hidden",
            "summary" => self.parent_element(id)
                .filter(|&p| self.tag_name(p) == Some("details"))
                .and_then(|p| self.tree.element_children(p).find(|&c| self.tag_name(c) == Some("summary")))
                == Some(id),
            "audio" | "video" => self.has_attr(id, "controls"),
            _ => self.is_content_editable(id),
        }
    }

    /// `contenteditable` in an editing state
    pub fn is_content_editable(&self, id: NodeId) -> bool {
        match self.attr(id, "contenteditable") {
            Some(v) => matches!(v.trim().to_ascii_lowercase().as_str(), "" | "true" | "plaintext-only"),
            None => false,
        }
    }

    /// Disabled form control, including controls inside a disabled fieldset
    /// (except those in its first legend)
    pub fn is_disabled(&self, id: NodeId) -> bool {
        let Some(tag) = self.tag_name(id) else {
            return false;
        };
        if !DISABLEABLE.contains(&tag) {
            return false;
        }
        if self.has_attr(id, "disabled") {
            return true;
        }
        if tag == "option" {
            if let Some(parent) = self.parent_element(id) {
                if self.tag_name(parent) == Some("optgroup") && self.has_attr(parent, "disabled") {
                    return true;
                }
            }
        }

        let mut child = id;
        for ancestor in self.ancestors(id) {
            if self.tag_name(ancestor) == Some("fieldset") && self.has_attr(ancestor, "disabled") {
                let first_legend = self.tree.element_children(ancestor)
                    .find(|&c| self.tag_name(c) == Some("legend"));
                if first_legend != Some(child) {
                    return true;
                }
            }
            child = ancestor;
        }
        false
    }

    /// Focusable at all (by script or by Tab)
    pub fn is_focusable(&self, id: NodeId) -> bool {
        if !self.is_element(id) || self.is_disabled(id) {
            return false;
        }
        self.tab_index(id).is_some() || self.is_natively_interactive(id)
    }

    /// In sequential focus order
    pub fn is_tabbable(&self, id: NodeId) -> bool {
        self.is_focusable(id) && self.tab_index(id).is_none_or(|t| t.is_tabbable())
    }

    /// Move input focus. Returns false if the element cannot take focus.
    pub fn focus(&mut self, id: NodeId) -> bool {
        if !self.is_connected(id) || !self.is_focusable(id) {
            return false;
        }
        if self.focused != id {
            tracing::trace!(?id, "focus");
        }
        self.focused = id;
        true
    }

    /// Drop input focus back to the body
    pub fn blur(&mut self) {
        self.focused = NodeId::NONE;
    }

    /// Element holding input focus, if any
    pub fn active_element(&self) -> Option<NodeId> {
        self.focused.to_option().filter(|&id| self.is_connected(id))
    }

    /// Whether focus is on `container` or inside it
    pub fn focus_within(&self, container: NodeId) -> bool {
        self.active_element()
            .is_some_and(|focused| self.contains_composed(container, focused))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_index() {
        assert_eq!(TabIndex::parse("-1"), Some(TabIndex::Programmatic));
        assert_eq!(TabIndex::parse(" 0 "), Some(TabIndex::Sequential(0)));
        assert!(TabIndex::parse("5").unwrap().is_tabbable());
        assert_eq!(TabIndex::parse("abc"), None);
    }

    #[test]
    fn test_focusable_elements() {
        let mut doc = Document::default();
        let link = doc.create_element("a");
        let anchor = doc.create_element("a");
        let div = doc.create_element("div");
        let hidden = doc.create_element("input");
        for id in [link, anchor, div, hidden] {
            doc.append_child(doc.body(), id).unwrap();
        }
        doc.set_attribute(link, "href", "/home").unwrap();
        doc.set_attribute(hidden, "type", "hidden").unwrap();

        assert!(doc.is_focusable(link));
        assert!(!doc.is_focusable(anchor));
        assert!(!doc.is_focusable(div));
        assert!(!doc.is_focusable(hidden));

        doc.set_attribute(div, "tabindex", "-1").unwrap();
        assert!(doc.is_focusable(div));
        assert!(!doc.is_tabbable(div));
    }

    #[test]
    fn test_disabled_fieldset() {
        let mut doc = Document::default();
        let fieldset = doc.create_element("fieldset");
        let legend = doc.create_element("legend");
        let in_legend = doc.create_element("input");
        let outside = doc.create_element("input");
        doc.append_child(doc.body(), fieldset).unwrap();
        doc.append_child(fieldset, legend).unwrap();
        doc.append_child(legend, in_legend).unwrap();
        doc.append_child(fieldset, outside).unwrap();
        doc.set_attribute(fieldset, "disabled", "").unwrap();

        assert!(doc.is_disabled(outside));
        assert!(!doc.is_disabled(in_legend));
        assert!(!doc.focus(outside));
        assert!(doc.focus(in_legend));
        assert!(doc.focus_within(fieldset));
        doc.blur();
        assert_eq!(doc.active_element(), None);
    }
}
