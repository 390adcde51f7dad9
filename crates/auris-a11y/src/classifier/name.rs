//! Accessible name and description
//!
//! Name sources are tried in order and the first non-empty one wins:
//! `aria-label`, `aria-labelledby`, native label association, alternative
//! text, descendant content, placeholder, `title`.
//!
//! Content names are computed by a standalone recursion over the raw
//! document, independent of which nodes end up in a snapshot.

use auris_dom::{collapse_whitespace, Display, Document, NodeId};

use crate::role::{NodeKind, Role};

use super::is_hidden;

/// Recursion guard for content names
const MAX_DEPTH: usize = 64;

/// Accessible name, truncated to `limit` characters with an ellipsis
pub fn accessible_name(doc: &Document, el: NodeId, role: Role, kind: NodeKind, limit: usize) -> String {
    // containers without semantics take explicit names only; a focusable
    // one also falls back to its title
    if role.is_generic() {
        let mut name = explicit_name(doc, el);
        if name.is_empty() && doc.is_focusable(el) {
            name = non_empty_attr(doc, el, "title").map(collapse_whitespace).unwrap_or_default();
        }
        return truncate(name, limit);
    }
    truncate(compute_name(doc, el, role, kind), limit)
}

/// `aria-label`, then `aria-labelledby`
fn explicit_name(doc: &Document, el: NodeId) -> String {
    if let Some(label) = non_empty_attr(doc, el, "aria-label") {
        return label.trim().to_string();
    }
    idref_text(doc, el, "aria-labelledby")
}

fn compute_name(doc: &Document, el: NodeId, role: Role, kind: NodeKind) -> String {
    let explicit = explicit_name(doc, el);
    if !explicit.is_empty() {
        return explicit;
    }

    let native = match kind {
        NodeKind::Interactive => control_label(doc, el),
        NodeKind::Structural | NodeKind::Landmark | NodeKind::Media | NodeKind::TextLike => {
            caption_label(doc, el)
        }
    };
    if !native.is_empty() {
        return native;
    }

    if kind == NodeKind::Media || matches!(doc.tag_name(el), Some("img" | "area")) {
        if let Some(alt) = non_empty_attr(doc, el, "alt") {
            return collapse_whitespace(alt);
        }
    }

    if role.names_from_content() || wraps_markup(doc, el, role) {
        let content = text_from_subtree(doc, el, false);
        if !content.is_empty() {
            return content;
        }
    }

    if role == Role::StaticText {
        return collapse_whitespace(&doc.own_text(el));
    }

    if matches!(doc.tag_name(el), Some("input" | "textarea")) {
        if let Some(placeholder) = non_empty_attr(doc, el, "placeholder") {
            return collapse_whitespace(placeholder);
        }
    }
    if let Some(placeholder) = non_empty_attr(doc, el, "aria-placeholder") {
        return collapse_whitespace(placeholder);
    }

    non_empty_attr(doc, el, "title").map(collapse_whitespace).unwrap_or_default()
}

/// Accessible description: `aria-describedby`, `aria-description`, then
/// `title` when it did not already supply the name
pub fn description(doc: &Document, el: NodeId, name: &str) -> Option<String> {
    let described = idref_text(doc, el, "aria-describedby");
    if !described.is_empty() {
        return Some(described);
    }
    if let Some(text) = non_empty_attr(doc, el, "aria-description") {
        return Some(collapse_whitespace(text));
    }
    non_empty_attr(doc, el, "title")
        .map(collapse_whitespace)
        .filter(|title| title != name)
}

/// Text of the elements referenced by an id-list attribute, in tree scope.
/// Unresolved ids are skipped; hidden referenced content is included.
pub fn idref_text(doc: &Document, el: NodeId, attr: &str) -> String {
    let Some(ids) = doc.attr(el, attr) else {
        return String::new();
    };
    let scope = doc.tree_scope(el);
    let parts: Vec<String> = ids.split_ascii_whitespace()
        .filter_map(|id| doc.get_element_by_id_in_scope(scope, id))
        .filter(|&target| target != el)
        .map(|target| referenced_text(doc, target))
        .filter(|text| !text.is_empty())
        .collect();
    collapse_whitespace(&parts.join(" "))
}

fn referenced_text(doc: &Document, target: NodeId) -> String {
    if let Some(label) = non_empty_attr(doc, target, "aria-label") {
        return collapse_whitespace(label);
    }
    match doc.tag_name(target) {
        Some("img") => doc.attr(target, "alt").map(collapse_whitespace).unwrap_or_default(),
        Some("input" | "textarea" | "select") => embedded_value(doc, target).unwrap_or_default(),
        _ => text_from_subtree(doc, target, true),
    }
}

/// Native label association for form controls
fn control_label(doc: &Document, el: NodeId) -> String {
    let tag = doc.tag_name(el).unwrap_or("");
    if matches!(tag, "input" | "select" | "textarea" | "button" | "meter" | "progress" | "output") {
        let labels: Vec<String> = labels_for(doc, el)
            .into_iter()
            .map(|label| label_text(doc, label, el))
            .filter(|text| !text.is_empty())
            .collect();
        if !labels.is_empty() {
            return collapse_whitespace(&labels.join(" "));
        }
    }

    if tag == "input" {
        let value = non_empty_attr(doc, el, "value").map(collapse_whitespace);
        return match doc.input_type(el).as_str() {
            "submit" => value.unwrap_or_else(|| "Submit".to_string()),
            "reset" => value.unwrap_or_else(|| "Reset".to_string()),
            "button" => value.unwrap_or_default(),
            "image" => non_empty_attr(doc, el, "alt")
                .map(collapse_whitespace)
                .or(value)
                .unwrap_or_else(|| "Submit".to_string()),
            _ => String::new(),
        };
    }
    caption_label(doc, el)
}

/// `fieldset`/`legend`, `table`/`caption`, `figure`/`figcaption`
fn caption_label(doc: &Document, el: NodeId) -> String {
    let caption_tag = match doc.tag_name(el) {
        Some("fieldset") => "legend",
        Some("table") => "caption",
        Some("figure") => "figcaption",
        _ => return String::new(),
    };
    doc.element_children(el)
        .into_iter()
        .find(|&c| doc.tag_name(c) == Some(caption_tag))
        .map(|caption| text_from_subtree(doc, caption, false))
        .unwrap_or_default()
}

/// `<label for>` elements in the same tree scope, then the wrapping label
fn labels_for(doc: &Document, el: NodeId) -> Vec<NodeId> {
    let mut labels = Vec::new();
    if let Some(id) = doc.element(el).and_then(|e| e.id()) {
        let scope = doc.tree_scope(el);
        labels.extend(doc.tree().descendants(scope)
            .into_iter()
            .filter(|&n| doc.tag_name(n) == Some("label") && doc.attr(n, "for") == Some(id)));
    }
    if let Some(wrapping) = doc.ancestors(el).find(|&a| doc.tag_name(a) == Some("label")) {
        // a wrapping label pointing elsewhere does not label this control
        let points_elsewhere = doc.attr(wrapping, "for")
            .is_some_and(|target| doc.element(el).and_then(|e| e.id()) != Some(target));
        if !points_elsewhere && !labels.contains(&wrapping) {
            labels.push(wrapping);
        }
    }
    labels
}

fn label_text(doc: &Document, label: NodeId, control: NodeId) -> String {
    if let Some(text) = non_empty_attr(doc, label, "aria-label") {
        return collapse_whitespace(text);
    }
    let mut out = String::new();
    collect_text(doc, label, false, Some(control), 0, &mut out);
    collapse_whitespace(&out)
}

/// Recursive "name from content" over composed children.
/// Script, style and hidden descendants are skipped unless `include_hidden`.
pub fn text_from_subtree(doc: &Document, root: NodeId, include_hidden: bool) -> String {
    let mut out = String::new();
    collect_text(doc, root, include_hidden, None, 0, &mut out);
    collapse_whitespace(&out)
}

fn collect_text(doc: &Document, node: NodeId, include_hidden: bool, skip: Option<NodeId>, depth: usize, out: &mut String) {
    if depth > MAX_DEPTH {
        return;
    }
    for child in doc.composed_children(node) {
        if Some(child) == skip {
            continue;
        }
        if let Some(text) = doc.tree().get(child).and_then(|n| n.as_text()) {
            out.push_str(text);
            continue;
        }
        let Some(tag) = doc.tag_name(child) else {
            continue;
        };
        if matches!(tag, "script" | "style" | "template" | "noscript") {
            continue;
        }
        if !include_hidden && is_hidden(doc, child) {
            continue;
        }
        if let Some(label) = non_empty_attr(doc, child, "aria-label") {
            push_word(out, label);
            continue;
        }
        match tag {
            "img" | "area" => {
                if let Some(alt) = non_empty_attr(doc, child, "alt") {
                    push_word(out, alt);
                }
                continue;
            }
            "br" => {
                out.push(' ');
                continue;
            }
            "input" | "select" | "textarea" => {
                if let Some(value) = embedded_value(doc, child) {
                    push_word(out, &value);
                }
                continue;
            }
            _ => {}
        }

        let block = !matches!(doc.computed_style(child).display, Display::Inline);
        if block {
            out.push(' ');
        }
        collect_text(doc, child, include_hidden, skip, depth + 1, out);
        if block {
            out.push(' ');
        }
    }
}

/// Value an embedded control contributes to a surrounding name
fn embedded_value(doc: &Document, el: NodeId) -> Option<String> {
    let text = match doc.tag_name(el)? {
        "select" => doc.selected_options(el)
            .first()
            .map(|&opt| collapse_whitespace(&doc.text_content(opt)))
            .unwrap_or_default(),
        "textarea" => doc.value(el),
        "input" => match doc.input_type(el).as_str() {
            "checkbox" | "radio" | "hidden" | "image" | "file" | "password" => return None,
            "submit" | "reset" | "button" => control_label(doc, el),
            _ => doc.value(el),
        },
        _ => return None,
    };
    let text = collapse_whitespace(&text);
    (!text.is_empty()).then_some(text)
}

/// Non-native textbox or combobox wrapping other markup
fn wraps_markup(doc: &Document, el: NodeId, role: Role) -> bool {
    matches!(role, Role::TextBox | Role::Combobox)
        && !matches!(doc.tag_name(el), Some("input" | "textarea" | "select"))
        && !doc.element_children(el).is_empty()
}

fn non_empty_attr<'a>(doc: &'a Document, el: NodeId, name: &str) -> Option<&'a str> {
    doc.attr(el, name).filter(|v| !v.trim().is_empty())
}

fn push_word(out: &mut String, word: &str) {
    out.push(' ');
    out.push_str(word.trim());
    out.push(' ');
}

fn truncate(name: String, limit: usize) -> String {
    if name.chars().count() <= limit {
        return name;
    }
    let mut out: String = name.chars().take(limit).collect();
    out.push('…');
    out
}
