//! Form Controls
//!
//! Live control state kept beside the attributes: the dirty value, dirty
//! checkedness and indeterminate flag, mirroring DOM properties that do not
//! reflect to attributes.

mod validation;

pub use validation::{ValidityState, ValidationConstraints};

use crate::{Document, DomError, NodeId};

/// Per-element form state
#[derive(Debug, Clone, Default)]
pub struct FormState {
    /// Value set by the user or script (overrides the `value` attribute)
    pub value: Option<String>,
    /// Checkedness set by the user or script (overrides `checked`)
    pub checked: Option<bool>,
    /// Checkbox indeterminate property
    pub indeterminate: bool,
    /// `setCustomValidity` message
    pub custom_validity: String,
}

/// Input types whose value is free text
const TEXT_INPUT_TYPES: &[&str] = &["text", "search", "email", "tel", "url", "password"];

impl Document {
    /// Normalised `type` of an <input> ("text" when missing or unknown)
    pub fn input_type(&self, id: NodeId) -> String {
        const KNOWN: &[&str] = &[
            "text", "search", "email", "tel", "url", "password", "number", "range",
            "checkbox", "radio", "button", "submit", "reset", "image", "hidden",
            "date", "time", "datetime-local", "month", "week", "color", "file",
        ];
        let ty = self.attr(id, "type").unwrap_or("text").trim().to_ascii_lowercase();
        if KNOWN.contains(&ty.as_str()) { ty } else { "text".to_string() }
    }

    /// Whether this element accepts typed text
    pub fn is_text_entry(&self, id: NodeId) -> bool {
        match self.tag_name(id) {
            Some("textarea") => true,
            Some("input") => {
                let ty = self.input_type(id);
                TEXT_INPUT_TYPES.contains(&ty.as_str()) || ty == "number"
            }
            Some(_) => self.is_content_editable(id),
            None => false,
        }
    }

    /// Current value of a control
    pub fn value(&self, id: NodeId) -> String {
        let Some(elem) = self.element(id) else {
            return String::new();
        };
        match elem.name.as_str() {
            "select" => self.selected_options(id)
                .first()
                .map(|&opt| self.option_value(opt))
                .unwrap_or_default(),
            "textarea" => elem.form.value.clone().unwrap_or_else(|| self.text_content(id)),
            "option" => self.option_value(id),
            _ => elem.form.value.clone()
                .or_else(|| elem.get_attr("value").map(String::from))
                .unwrap_or_default(),
        }
    }

    /// Set the value property (no mutation record, like the DOM)
    pub fn set_value(&mut self, id: NodeId, value: &str) -> Result<(), DomError> {
        let elem = self.element_mut(id).ok_or(DomError::NotAnElement(id))?;
        elem.form.value = Some(value.to_string());
        Ok(())
    }

    /// Checkedness: the property when set, else the `checked` attribute
    pub fn checked(&self, id: NodeId) -> bool {
        self.element(id)
            .map(|e| e.form.checked.unwrap_or_else(|| e.has_attr("checked")))
            .unwrap_or(false)
    }

    /// Set checkedness. Checking a radio unchecks the rest of its group.
    pub fn set_checked(&mut self, id: NodeId, checked: bool) -> Result<(), DomError> {
        if checked && self.tag_name(id) == Some("input") && self.input_type(id) == "radio" {
            for other in self.radio_group(id) {
                if other != id {
                    if let Some(elem) = self.element_mut(other) {
                        elem.form.checked = Some(false);
                    }
                }
            }
        }
        let elem = self.element_mut(id).ok_or(DomError::NotAnElement(id))?;
        elem.form.checked = Some(checked);
        Ok(())
    }

    /// Checkbox indeterminate property
    pub fn indeterminate(&self, id: NodeId) -> bool {
        self.element(id).is_some_and(|e| e.form.indeterminate)
    }

    pub fn set_indeterminate(&mut self, id: NodeId, indeterminate: bool) -> Result<(), DomError> {
        let elem = self.element_mut(id).ok_or(DomError::NotAnElement(id))?;
        elem.form.indeterminate = indeterminate;
        Ok(())
    }

    /// `setCustomValidity`; an empty message clears the custom error
    pub fn set_custom_validity(&mut self, id: NodeId, message: &str) -> Result<(), DomError> {
        let elem = self.element_mut(id).ok_or(DomError::NotAnElement(id))?;
        elem.form.custom_validity = message.to_string();
        Ok(())
    }

    /// Selected <option>s of a <select>; the first enabled option when none is marked
    pub fn selected_options(&self, select: NodeId) -> Vec<NodeId> {
        let options: Vec<NodeId> = self.tree.descendants(select)
            .into_iter()
            .filter(|&id| self.tag_name(id) == Some("option"))
            .collect();
        let selected: Vec<NodeId> = options.iter()
            .copied()
            .filter(|&opt| self.is_option_selected(opt))
            .collect();
        if !selected.is_empty() || self.has_attr(select, "multiple") {
            return selected;
        }
        options.into_iter().find(|&opt| !self.is_disabled(opt)).into_iter().collect()
    }

    fn is_option_selected(&self, option: NodeId) -> bool {
        self.element(option)
            .map(|e| e.form.checked.unwrap_or_else(|| e.has_attr("selected")))
            .unwrap_or(false)
    }

    fn option_value(&self, option: NodeId) -> String {
        match self.attr(option, "value") {
            Some(v) => v.to_string(),
            None => crate::document::collapse_whitespace(&self.text_content(option)),
        }
    }

    /// Form owner: the `form` attribute target, else the nearest <form> ancestor
    pub fn form_owner(&self, id: NodeId) -> Option<NodeId> {
        if let Some(form_id) = self.attr(id, "form") {
            let scope = self.tree_scope(id);
            return self.get_element_by_id_in_scope(scope, form_id)
                .filter(|&f| self.tag_name(f) == Some("form"));
        }
        self.ancestors(id).find(|&a| self.tag_name(a) == Some("form"))
    }

    /// Listed controls owned by `form`, in tree order
    pub fn form_controls(&self, form: NodeId) -> Vec<NodeId> {
        let scope = self.tree_scope(form);
        self.tree.descendants(scope)
            .into_iter()
            .filter(|&id| matches!(self.tag_name(id), Some("input" | "select" | "textarea" | "button")))
            .filter(|&id| self.form_owner(id) == Some(form))
            .collect()
    }

    /// Radio buttons sharing `radio`'s name and form owner
    pub fn radio_group(&self, radio: NodeId) -> Vec<NodeId> {
        let Some(name) = self.attr(radio, "name").filter(|n| !n.is_empty()) else {
            return vec![radio];
        };
        let owner = self.form_owner(radio);
        let scope = self.tree_scope(radio);
        self.tree.descendants(scope)
            .into_iter()
            .filter(|&id| self.tag_name(id) == Some("input") && self.input_type(id) == "radio")
            .filter(|&id| self.attr(id, "name") == Some(name))
            .filter(|&id| self.form_owner(id) == owner)
            .collect()
    }

    /// Submit buttons: <button> without type or type=submit, and <input type=submit|image>
    pub fn is_submit_button(&self, id: NodeId) -> bool {
        match self.tag_name(id) {
            Some("button") => self.attr(id, "type")
                .is_none_or(|t| t.trim().eq_ignore_ascii_case("submit")),
            Some("input") => matches!(self.input_type(id).as_str(), "submit" | "image"),
            _ => false,
        }
    }
}
