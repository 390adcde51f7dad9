//! Semantic Node Classifier
//!
//! Computes, for one element of the live document, the role, accessible
//! name, description, states, value, set position and table coordinates.
//! Every call reads the document afresh; nothing is cached.

mod name;
mod states;
mod value;

pub use name::{accessible_name, description, idref_text, text_from_subtree};
pub use value::format_number;

use auris_dom::{Document, NodeId};
use serde::{Deserialize, Serialize};

use crate::role::{NodeKind, Role};
use crate::tree::AccessibleNode;

/// Spoken in place of a password field's value
pub const PASSWORD_MASK: &str = "••••••";

/// Default accessible name length before truncation
pub const DEFAULT_NAME_LIMIT: usize = 140;

/// 1-based index within a same-role sibling group, and the group size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub pos: u32,
    pub size: u32,
}

/// 1-based table coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coords {
    pub row: u32,
    pub col: u32,
}

/// Node classifier
#[derive(Debug, Clone)]
pub struct Classifier {
    name_limit: usize,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(DEFAULT_NAME_LIMIT)
    }
}

impl Classifier {
    /// Create a classifier truncating names at `name_limit` characters
    pub fn new(name_limit: usize) -> Self {
        Self { name_limit }
    }

    pub fn name_limit(&self) -> usize {
        self.name_limit
    }

    /// Effective role of an element
    pub fn role(&self, doc: &Document, el: NodeId) -> Role {
        resolve_role(doc, el)
    }

    /// Classify one element
    pub fn classify(&self, doc: &Document, el: NodeId) -> AccessibleNode {
        let role = resolve_role(doc, el);
        let focusable = doc.is_focusable(el);
        let kind = NodeKind::of(role, doc.tag_name(el).unwrap_or(""), focusable);

        let name = accessible_name(doc, el, role, kind, self.name_limit);
        let description = description(doc, el, &name);
        let states = states::compute(doc, el, role);
        let value = value::compute(doc, el, role, kind);
        let position = position(doc, el, role);
        let coords = coords(doc, el);

        tracing::trace!(?el, role = role.as_str(), %name, "classified");
        AccessibleNode {
            element: el,
            role,
            kind,
            name,
            description,
            states,
            value,
            position,
            coords,
            focusable,
        }
    }
}

// ----------------------------------------------------------------------------
// Role resolution
// ----------------------------------------------------------------------------

/// Effective role: explicit role, then native mapping, then static text
pub fn resolve_role(doc: &Document, el: NodeId) -> Role {
    let Some(tag) = doc.tag_name(el) else {
        return Role::Generic;
    };

    if let Some(explicit) = explicit_role(doc, el) {
        if explicit != Role::Presentation {
            return explicit;
        }
        // presentation is ignored on focusable elements
        if !doc.is_focusable(el) {
            return Role::Presentation;
        }
    }

    let native = native_role(doc, el, tag);
    if native == Role::Generic
        && !matches!(tag, "html" | "body")
        && !doc.own_text(el).trim().is_empty()
        && !doc.is_focusable(el)
    {
        return Role::StaticText;
    }
    native
}

/// First recognised token of the `role` attribute
fn explicit_role(doc: &Document, el: NodeId) -> Option<Role> {
    doc.attr(el, "role")?.split_ascii_whitespace().find_map(Role::parse)
}

fn native_role(doc: &Document, el: NodeId, tag: &str) -> Role {
    match tag {
        "a" | "area" if doc.has_attr(el, "href") => Role::Link,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Role::Heading,
        "button" => Role::Button,
        "summary" if doc.is_natively_interactive(el) => Role::Button,
        "input" => input_role(doc, el),
        "textarea" => Role::TextBox,
        "select" => {
            let size = doc.attr(el, "size").and_then(|s| s.trim().parse::<u32>().ok()).unwrap_or(0);
            if doc.has_attr(el, "multiple") || size > 1 { Role::ListBox } else { Role::Combobox }
        }
        "option" => Role::Option,
        "optgroup" | "fieldset" | "details" => Role::Group,
        "img" => match doc.attr(el, "alt") {
            Some("") => Role::Presentation,
            _ => Role::Img,
        },
        "table" => Role::Table,
        "thead" | "tbody" | "tfoot" => Role::RowGroup,
        "tr" => Role::Row,
        "td" => {
            if in_grid(doc, el) { Role::GridCell } else { Role::Cell }
        }
        "th" => header_role(doc, el),
        "ul" | "ol" | "menu" => Role::List,
        "li" => Role::ListItem,
        "nav" => Role::Navigation,
        "main" => Role::Main,
        "aside" => Role::Complementary,
        "header" if !in_sectioning_content(doc, el) => Role::Banner,
        "footer" if !in_sectioning_content(doc, el) => Role::ContentInfo,
        "form" => Role::Form,
        "search" => Role::Search,
        "section" if doc.has_attr(el, "aria-label") || doc.has_attr(el, "aria-labelledby") => Role::Region,
        "article" => Role::Article,
        "progress" => Role::ProgressBar,
        "meter" => Role::Meter,
        "dialog" => Role::Dialog,
        "hr" => Role::Separator,
        "figure" => Role::Figure,
        "output" => Role::Status,
        _ if doc.is_content_editable(el) => Role::TextBox,
        _ => Role::Generic,
    }
}

fn input_role(doc: &Document, el: NodeId) -> Role {
    let has_list = doc.has_attr(el, "list");
    match doc.input_type(el).as_str() {
        "checkbox" if doc.has_attr(el, "switch") => Role::Switch,
        "checkbox" => Role::Checkbox,
        "radio" => Role::Radio,
        "range" => Role::Slider,
        "number" => Role::SpinButton,
        "search" if has_list => Role::Combobox,
        "search" => Role::SearchBox,
        "button" | "submit" | "reset" | "image" | "color" | "file" => Role::Button,
        "hidden" => Role::Generic,
        _ if has_list => Role::Combobox,
        _ => Role::TextBox,
    }
}

fn in_grid(doc: &Document, el: NodeId) -> bool {
    doc.ancestors(el)
        .find(|&a| doc.tag_name(a) == Some("table"))
        .and_then(|table| explicit_role(doc, table))
        .is_some_and(|r| matches!(r, Role::Grid | Role::TreeGrid))
}

fn header_role(doc: &Document, el: NodeId) -> Role {
    match doc.attr(el, "scope").map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        Some("row" | "rowgroup") => return Role::RowHeader,
        Some("col" | "colgroup") => return Role::ColumnHeader,
        _ => {}
    }
    if doc.ancestors(el).any(|a| doc.tag_name(a) == Some("thead")) {
        return Role::ColumnHeader;
    }
    // a leading <th> in a row of data cells heads that row
    if let Some(row) = doc.parent_element(el) {
        let cells = doc.element_children(row);
        let leads = cells.first() == Some(&el);
        let has_data = cells.iter().any(|&c| doc.tag_name(c) == Some("td"));
        if leads && has_data {
            return Role::RowHeader;
        }
    }
    Role::ColumnHeader
}

fn in_sectioning_content(doc: &Document, el: NodeId) -> bool {
    doc.ancestors(el).any(|a| {
        matches!(doc.tag_name(a), Some("article" | "aside" | "main" | "nav" | "section"))
    })
}

// ----------------------------------------------------------------------------
// Visibility
// ----------------------------------------------------------------------------

/// Whether the element itself is hidden from assistive technology.
/// Attribute checks run before the computed-style query.
pub fn is_hidden(doc: &Document, el: NodeId) -> bool {
    doc.has_attr(el, "hidden")
        || doc.attr(el, "aria-hidden").is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
        || doc.has_attr(el, "inert")
        || !doc.computed_style(el).is_rendered()
}

// ----------------------------------------------------------------------------
// Set position and table coordinates
// ----------------------------------------------------------------------------

fn parse_index(doc: &Document, el: NodeId, attr: &str) -> Option<u32> {
    doc.attr(el, attr)?.trim().parse::<u32>().ok().filter(|&n| n >= 1)
}

/// Explicit posinset/setsize, else rank among same-role siblings
fn position(doc: &Document, el: NodeId, role: Role) -> Option<Position> {
    if let (Some(pos), Some(size)) = (parse_index(doc, el, "aria-posinset"), parse_index(doc, el, "aria-setsize")) {
        if pos <= size {
            return Some(Position { pos, size });
        }
    }
    if !role.has_set_position() {
        return None;
    }

    // one level up only
    let parent = doc.parent_element(el)?;
    let group: Vec<NodeId> = doc.composed_children(parent)
        .into_iter()
        .filter(|&c| doc.is_element(c) && !is_hidden(doc, c) && resolve_role(doc, c) == role)
        .collect();
    let pos = group.iter().position(|&c| c == el)? + 1;
    Some(Position { pos: pos as u32, size: group.len() as u32 })
}

/// Climb cell -> row -> table and count ordinals
fn coords(doc: &Document, el: NodeId) -> Option<Coords> {
    let cell = doc.closest(el, |id| resolve_role(doc, id).is_cell())?;
    let row = doc.ancestors(cell).find(|&id| resolve_role(doc, id) == Role::Row)?;
    let table = doc.ancestors(row).find(|&id| resolve_role(doc, id).is_table())?;

    let row_index = match parse_index(doc, cell, "aria-rowindex").or_else(|| parse_index(doc, row, "aria-rowindex")) {
        Some(n) => n,
        None => {
            let rows: Vec<NodeId> = doc.tree().descendants(table)
                .into_iter()
                .filter(|&id| resolve_role(doc, id) == Role::Row)
                .filter(|&id| doc.ancestors(id).find(|&a| resolve_role(doc, a).is_table()) == Some(table))
                .collect();
            rows.iter().position(|&r| r == row)? as u32 + 1
        }
    };

    let col_index = match parse_index(doc, cell, "aria-colindex") {
        Some(n) => n,
        None => {
            let mut col = 1;
            for sibling in doc.element_children(row) {
                if sibling == cell {
                    break;
                }
                if resolve_role(doc, sibling).is_cell() {
                    col += parse_index(doc, sibling, "colspan").unwrap_or(1);
                }
            }
            col
        }
    };

    Some(Coords { row: row_index, col: col_index })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with(tag: &str) -> (Document, NodeId) {
        let mut doc = Document::default();
        let el = doc.create_element(tag);
        doc.append_child(doc.body(), el).unwrap();
        (doc, el)
    }

    #[test]
    fn test_presentation_ignored_when_focusable() {
        let (mut doc, button) = doc_with("button");
        doc.set_attribute(button, "role", "presentation").unwrap();
        assert_eq!(resolve_role(&doc, button), Role::Button);

        let (mut doc, div) = doc_with("div");
        doc.set_attribute(div, "role", "none").unwrap();
        assert_eq!(resolve_role(&doc, div), Role::Presentation);
    }

    #[test]
    fn test_unknown_role_tokens_fall_through() {
        let (mut doc, nav) = doc_with("nav");
        doc.set_attribute(nav, "role", "bogus navigation").unwrap();
        assert_eq!(resolve_role(&doc, nav), Role::Navigation);
        doc.set_attribute(nav, "role", "bogus").unwrap();
        assert_eq!(resolve_role(&doc, nav), Role::Navigation);
    }

    #[test]
    fn test_static_text_fallback() {
        let (mut doc, div) = doc_with("div");
        assert_eq!(resolve_role(&doc, div), Role::Generic);
        let text = doc.create_text("Hello");
        doc.append_child(div, text).unwrap();
        assert_eq!(resolve_role(&doc, div), Role::StaticText);
        doc.set_attribute(div, "tabindex", "0").unwrap();
        assert_eq!(resolve_role(&doc, div), Role::Generic);
        let body = doc.body();
        assert_eq!(resolve_role(&doc, body), Role::Generic);
    }

    #[test]
    fn test_input_roles() {
        let (mut doc, input) = doc_with("input");
        assert_eq!(resolve_role(&doc, input), Role::TextBox);
        for (ty, role) in [
            ("checkbox", Role::Checkbox),
            ("radio", Role::Radio),
            ("range", Role::Slider),
            ("number", Role::SpinButton),
            ("search", Role::SearchBox),
            ("submit", Role::Button),
            ("password", Role::TextBox),
        ] {
            doc.set_attribute(input, "type", ty).unwrap();
            assert_eq!(resolve_role(&doc, input), role, "type={ty}");
        }
    }

    #[test]
    fn test_scoped_header_is_not_banner() {
        let (mut doc, header) = doc_with("header");
        assert_eq!(resolve_role(&doc, header), Role::Banner);
        let article = doc.create_element("article");
        doc.append_child(doc.body(), article).unwrap();
        doc.append_child(article, header).unwrap();
        assert_eq!(resolve_role(&doc, header), Role::Generic);
    }

    #[test]
    fn test_decorative_image() {
        let (mut doc, img) = doc_with("img");
        assert_eq!(resolve_role(&doc, img), Role::Img);
        doc.set_attribute(img, "alt", "").unwrap();
        assert_eq!(resolve_role(&doc, img), Role::Presentation);
    }

    #[test]
    fn test_list_item_position() {
        let (mut doc, list) = doc_with("ul");
        let items: Vec<NodeId> = (0..3).map(|_| {
            let li = doc.create_element("li");
            doc.append_child(list, li).unwrap();
            li
        }).collect();
        let classifier = Classifier::default();
        assert_eq!(classifier.classify(&doc, items[1]).position, Some(Position { pos: 2, size: 3 }));

        doc.set_attribute(items[0], "hidden", "").unwrap();
        assert_eq!(classifier.classify(&doc, items[1]).position, Some(Position { pos: 1, size: 2 }));

        doc.set_attribute(items[2], "aria-posinset", "7").unwrap();
        doc.set_attribute(items[2], "aria-setsize", "9").unwrap();
        assert_eq!(classifier.classify(&doc, items[2]).position, Some(Position { pos: 7, size: 9 }));
    }

    #[test]
    fn test_row_header_detection() {
        let (mut doc, table) = doc_with("table");
        let tr = doc.create_element("tr");
        let th = doc.create_element("th");
        let td = doc.create_element("td");
        doc.append_child(table, tr).unwrap();
        doc.append_child(tr, th).unwrap();
        doc.append_child(tr, td).unwrap();
        assert_eq!(resolve_role(&doc, th), Role::RowHeader);
        doc.set_attribute(th, "scope", "col").unwrap();
        assert_eq!(resolve_role(&doc, th), Role::ColumnHeader);
    }
}
