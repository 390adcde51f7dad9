//! Announcement Formatter
//!
//! Composes the spoken phrase for one node. Part order is fixed:
//! leading state, quoted name, role, description, value, error, remaining
//! states, set position, table coordinates.

use std::fmt;

use auris_dom::{collapse_whitespace, Document};

use crate::classifier::idref_text;
use crate::role::Role;
use crate::state::State;
use crate::tree::AccessibleNode;

/// A composed announcement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phrase {
    parts: Vec<String>,
    separator: String,
}

impl Phrase {
    /// Parts in order
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl fmt::Display for Phrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.parts.join(&self.separator))
    }
}

/// Announcement formatter
#[derive(Debug, Clone)]
pub struct Formatter {
    separator: String,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(", ")
    }
}

impl Formatter {
    pub fn new(separator: impl Into<String>) -> Self {
        Self { separator: separator.into() }
    }

    /// Format a freshly classified node
    pub fn format(&self, doc: &Document, node: &AccessibleNode) -> Phrase {
        self.compose(doc, node, true)
    }

    /// Format a node whose error message was just spoken on its own. The
    /// phrase keeps the invalid state but not the message.
    pub fn format_after_message(&self, doc: &Document, node: &AccessibleNode) -> Phrase {
        self.compose(doc, node, false)
    }

    fn compose(&self, doc: &Document, node: &AccessibleNode, with_message: bool) -> Phrase {
        let mut parts = Vec::new();
        let leads = node.role.leads_with_state();

        // 1. state before identity for checkable and selectable roles
        if leads {
            parts.extend(node.states.iter().filter(|s| s.is_leading()).map(State::label));
        }

        // 2. name
        if !node.name.is_empty() {
            parts.push(format!("\"{}\"", node.name));
        }

        // 3. role
        match (node.role, node.states.level()) {
            (Role::Heading, Some(level)) => parts.push(format!("heading level {level}")),
            (role, _) => parts.extend(role.label().map(String::from)),
        }

        // 4. description
        if let Some(description) = &node.description {
            parts.push(description.clone());
        }

        // 5. value, or placeholder for empty text fields
        match node.role {
            Role::TextBox | Role::SearchBox | Role::Combobox => {
                let shown = node.value.clone().or_else(|| placeholder(doc, node));
                parts.extend(shown);
            }
            _ => parts.extend(node.value.clone()),
        }

        // 6. error
        let invalid = node.states.contains(State::Invalid);
        if invalid {
            parts.push(State::Invalid.label());
        }
        if invalid && with_message {
            let message = doc.validation_message(node.element)
                .filter(|m| !m.is_empty())
                .or_else(|| Some(idref_text(doc, node.element, "aria-errormessage")).filter(|m| !m.is_empty()));
            parts.extend(message);
        }

        // 7. remaining states
        for state in node.states.iter() {
            let surfaced = (leads && state.is_leading())
                || *state == State::Invalid
                || (node.role == Role::Heading && matches!(state, State::Level(_)));
            if !surfaced {
                parts.push(state.label());
            }
        }

        // 8. set position
        if let Some(position) = node.position {
            parts.push(format!("{} of {}", position.pos, position.size));
        }

        // 9. table coordinates
        if let Some(coords) = node.coords {
            parts.push(format!("row {}, column {}", coords.row, coords.col));
        }

        Phrase { parts, separator: self.separator.clone() }
    }
}

/// Placeholder hint, unless it already supplied the name
fn placeholder(doc: &Document, node: &AccessibleNode) -> Option<String> {
    let text = doc.attr(node.element, "placeholder")
        .or_else(|| doc.attr(node.element, "aria-placeholder"))
        .map(collapse_whitespace)
        .filter(|p| !p.is_empty())?;
    (text != node.name).then_some(text)
}
