//! State computation
//!
//! Each check is independent. Authored ARIA properties win over the native
//! equivalent; paired concerns (checked/unchecked, expanded/collapsed)
//! yield at most one label.

use auris_dom::{Document, NodeId};

use crate::role::Role;
use crate::state::{State, StateSet};

/// Parsed ARIA tri-state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tristate {
    True,
    False,
    Mixed,
}

fn tristate(value: Option<&str>) -> Option<Tristate> {
    match value?.trim().to_ascii_lowercase().as_str() {
        "true" => Some(Tristate::True),
        "false" => Some(Tristate::False),
        "mixed" => Some(Tristate::Mixed),
        _ => None,
    }
}

fn is_true(doc: &Document, el: NodeId, attr: &str) -> bool {
    doc.attr(el, attr).is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}

/// Compute the ordered state set of an element
pub fn compute(doc: &Document, el: NodeId, role: Role) -> StateSet {
    let mut states = StateSet::new();
    let tag = doc.tag_name(el).unwrap_or("");

    if is_true(doc, el, "aria-disabled") || doc.is_disabled(el) {
        states.insert(State::Disabled);
    }

    if role.is_checkable() {
        let native = match (tag, doc.input_type(el).as_str()) {
            ("input", "checkbox") if doc.indeterminate(el) => Some(Tristate::Mixed),
            ("input", "checkbox" | "radio") => Some(if doc.checked(el) { Tristate::True } else { Tristate::False }),
            _ => None,
        };
        match tristate(doc.attr(el, "aria-checked")).or(native) {
            Some(Tristate::True) => {
                states.insert(State::Checked);
            }
            Some(Tristate::Mixed) => {
                states.insert(State::PartiallyChecked);
            }
            Some(Tristate::False) | None => {
                if role.voices_unchecked() {
                    states.insert(State::Unchecked);
                }
            }
        }
    }

    if role == Role::Button {
        match tristate(doc.attr(el, "aria-pressed")) {
            Some(Tristate::True) => {
                states.insert(State::Pressed);
            }
            Some(Tristate::Mixed) => {
                states.insert(State::PartiallyPressed);
            }
            Some(Tristate::False) => {
                states.insert(State::NotPressed);
            }
            None => {}
        }
    }

    let selected = match tristate(doc.attr(el, "aria-selected")) {
        Some(t) => t == Tristate::True,
        None => tag == "option" && doc.closest(el, |a| doc.tag_name(a) == Some("select"))
            .is_some_and(|select| doc.selected_options(select).contains(&el)),
    };
    if selected {
        states.insert(State::Selected);
    }

    let expanded = match tristate(doc.attr(el, "aria-expanded")) {
        Some(Tristate::True) => Some(true),
        Some(Tristate::False) => Some(false),
        _ if tag == "summary" && role == Role::Button => doc.parent_element(el)
            .map(|details| doc.has_attr(details, "open")),
        _ => None,
    };
    match expanded {
        Some(true) => {
            states.insert(State::Expanded);
        }
        Some(false) => {
            states.insert(State::Collapsed);
        }
        None => {}
    }

    let invalid = match doc.attr(el, "aria-invalid").map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) if v.is_empty() || v == "false" => false,
        Some(_) => true,
        None => doc.will_validate(el) && !doc.check_validity(el),
    };
    if invalid {
        states.insert(State::Invalid);
    }

    let explicit_level = doc.attr(el, "aria-level")
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|&n| n >= 1);
    if role == Role::Heading {
        let native_level = tag.strip_prefix('h').and_then(|d| d.parse::<u32>().ok());
        states.insert(State::Level(explicit_level.or(native_level).unwrap_or(2)));
    } else if let Some(level) = explicit_level {
        if matches!(role, Role::TreeItem | Role::Row | Role::ListItem) {
            states.insert(State::Level(level));
        }
    }

    if matches!(role, Role::ColumnHeader | Role::RowHeader) {
        match doc.attr(el, "aria-sort").map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("ascending") => {
                states.insert(State::SortedAscending);
            }
            Some("descending") => {
                states.insert(State::SortedDescending);
            }
            Some("other") => {
                states.insert(State::Sorted);
            }
            _ => {}
        }
    }

    if matches!(role, Role::Slider | Role::ScrollBar | Role::Separator | Role::TabList | Role::Toolbar) {
        match doc.attr(el, "aria-orientation").map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("horizontal") => {
                states.insert(State::Horizontal);
            }
            Some("vertical") => {
                states.insert(State::Vertical);
            }
            _ => {}
        }
    }

    let native_form_control = matches!(tag, "input" | "select" | "textarea");
    if is_true(doc, el, "aria-required") || (native_form_control && doc.has_attr(el, "required")) {
        states.insert(State::Required);
    }

    let native_readonly = matches!(tag, "input" | "textarea") && doc.has_attr(el, "readonly");
    if is_true(doc, el, "aria-readonly") || native_readonly {
        states.insert(State::ReadOnly);
    }

    states
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkbox() -> (Document, NodeId) {
        let mut doc = Document::default();
        let input = doc.create_element("input");
        doc.append_child(doc.body(), input).unwrap();
        doc.set_attribute(input, "type", "checkbox").unwrap();
        (doc, input)
    }

    #[test]
    fn test_checked_never_with_unchecked() {
        let (mut doc, input) = checkbox();
        doc.set_attribute(input, "checked", "").unwrap();
        let states = compute(&doc, input, Role::Checkbox);
        assert!(states.contains(State::Checked));
        assert!(!states.contains(State::Unchecked));
    }

    #[test]
    fn test_explicit_checked_wins_over_native() {
        let (mut doc, input) = checkbox();
        doc.set_attribute(input, "checked", "").unwrap();
        doc.set_attribute(input, "aria-checked", "mixed").unwrap();
        let states = compute(&doc, input, Role::Checkbox);
        assert_eq!(states.labels(), vec!["partially checked"]);
    }

    #[test]
    fn test_indeterminate_checkbox() {
        let (mut doc, input) = checkbox();
        doc.set_indeterminate(input, true).unwrap();
        assert!(compute(&doc, input, Role::Checkbox).contains(State::PartiallyChecked));
    }

    #[test]
    fn test_unchecked_only_for_checkbox_radio_switch() {
        let mut doc = Document::default();
        let item = doc.create_element("div");
        doc.append_child(doc.body(), item).unwrap();
        doc.set_attribute(item, "aria-checked", "false").unwrap();
        assert!(compute(&doc, item, Role::MenuItemCheckbox).is_empty());
        assert_eq!(compute(&doc, item, Role::Switch).labels(), vec!["unchecked"]);
    }

    #[test]
    fn test_heading_level_from_tag_and_attribute() {
        let mut doc = Document::default();
        let h3 = doc.create_element("h3");
        doc.append_child(doc.body(), h3).unwrap();
        assert_eq!(compute(&doc, h3, Role::Heading).level(), Some(3));
        doc.set_attribute(h3, "aria-level", "5").unwrap();
        assert_eq!(compute(&doc, h3, Role::Heading).level(), Some(5));
        doc.set_attribute(h3, "aria-level", "zero").unwrap();
        assert_eq!(compute(&doc, h3, Role::Heading).level(), Some(3));
    }

    #[test]
    fn test_state_order() {
        let mut doc = Document::default();
        let input = doc.create_element("input");
        doc.append_child(doc.body(), input).unwrap();
        doc.set_attribute(input, "required", "").unwrap();
        doc.set_attribute(input, "aria-expanded", "false").unwrap();
        doc.set_attribute(input, "aria-disabled", "true").unwrap();
        let labels = compute(&doc, input, Role::TextBox).labels();
        assert_eq!(labels, vec!["disabled", "collapsed", "invalid", "required"]);
    }

    #[test]
    fn test_aria_invalid_false_overrides_native() {
        let mut doc = Document::default();
        let input = doc.create_element("input");
        doc.append_child(doc.body(), input).unwrap();
        doc.set_attribute(input, "required", "").unwrap();
        assert!(compute(&doc, input, Role::TextBox).contains(State::Invalid));
        doc.set_attribute(input, "aria-invalid", "false").unwrap();
        assert!(!compute(&doc, input, Role::TextBox).contains(State::Invalid));
    }

    #[test]
    fn test_sort_only_on_headers() {
        let mut doc = Document::default();
        let th = doc.create_element("th");
        doc.append_child(doc.body(), th).unwrap();
        doc.set_attribute(th, "aria-sort", "ascending").unwrap();
        assert_eq!(compute(&doc, th, Role::ColumnHeader).labels(), vec!["sorted ascending"]);
        assert!(compute(&doc, th, Role::Cell).is_empty());
    }
}
