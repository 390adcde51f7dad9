//! DOM Events
//!
//! Click activation: default actions plus listeners that stand in for page
//! scripts, and form submission with constraint validation.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::{Document, NodeId};

/// Click listener, called with the document and the clicked target
pub type ClickListener = Rc<dyn Fn(&mut Document, NodeId)>;

/// Registered click listeners keyed by element
#[derive(Default)]
pub(crate) struct Listeners {
    click: HashMap<NodeId, Vec<ClickListener>>,
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("click", &self.click.values().map(Vec::len).sum::<usize>())
            .finish()
    }
}

/// Result of activating an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationOutcome {
    /// Disabled or detached: nothing happened
    Ignored,
    /// Default action and listeners ran
    Activated,
    /// A form submission was attempted
    Submit(SubmitOutcome),
}

/// Result of a submission attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// All controls valid; the form was submitted
    Submitted(NodeId),
    /// Submission stopped at the first invalid control, which now has focus
    Invalid { control: NodeId, message: String },
}

impl Document {
    /// Register a click listener on `target` (fires for clicks on descendants too)
    pub fn add_click_listener(&mut self, target: NodeId, listener: ClickListener) {
        self.listeners.click.entry(target).or_default().push(listener);
    }

    /// Forms submitted so far
    pub fn submissions(&self) -> &[NodeId] {
        &self.submissions
    }

    /// Dispatch a click: checkable toggles, listeners along the composed
    /// path, then the element's activation behaviour.
    pub fn click(&mut self, target: NodeId) -> ActivationOutcome {
        if !self.is_connected(target) || self.is_disabled(target) {
            return ActivationOutcome::Ignored;
        }
        tracing::debug!(?target, tag = ?self.tag_name(target), "click");

        if self.tag_name(target) == Some("input") {
            match self.input_type(target).as_str() {
                "checkbox" => {
                    let checked = self.checked(target);
                    let _ = self.set_indeterminate(target, false);
                    let _ = self.set_checked(target, !checked);
                }
                "radio" => {
                    let _ = self.set_checked(target, true);
                }
                _ => {}
            }
        }

        let mut path = vec![target];
        path.extend(self.ancestors(target));
        for node in path {
            let listeners = self.listeners.click.get(&node).cloned().unwrap_or_default();
            for listener in listeners {
                listener(self, target);
            }
        }

        if !self.is_connected(target) {
            return ActivationOutcome::Activated;
        }

        match self.tag_name(target) {
            Some("summary") => {
                if let Some(details) = self.parent_element(target).filter(|&p| self.tag_name(p) == Some("details")) {
                    let result = if self.has_attr(details, "open") {
                        self.remove_attribute(details, "open").map(|_| ())
                    } else {
                        self.set_attribute(details, "open", "")
                    };
                    if let Err(err) = result {
                        tracing::warn!(%err, "failed to toggle details");
                    }
                }
                ActivationOutcome::Activated
            }
            Some("label") => {
                if let Some(control) = self.labeled_control(target) {
                    if control != target && !self.contains_composed(target, control) {
                        return self.click(control);
                    }
                    if self.is_text_entry(control) {
                        self.focus(control);
                    }
                }
                ActivationOutcome::Activated
            }
            _ if self.is_submit_button(target) => match self.form_owner(target) {
                Some(form) => ActivationOutcome::Submit(self.request_submit(form)),
                None => ActivationOutcome::Activated,
            },
            _ => ActivationOutcome::Activated,
        }
    }

    /// Control labelled by a <label>: its `for` target, else its first labelable descendant
    pub fn labeled_control(&self, label: NodeId) -> Option<NodeId> {
        const LABELABLE: &[&str] = &["button", "input", "meter", "output", "progress", "select", "textarea"];
        let labelable = |id: NodeId| {
            self.tag_name(id).is_some_and(|t| LABELABLE.contains(&t))
                && !(self.tag_name(id) == Some("input") && self.input_type(id) == "hidden")
        };
        if let Some(for_id) = self.attr(label, "for") {
            let scope = self.tree_scope(label);
            return self.get_element_by_id_in_scope(scope, for_id).filter(|&c| labelable(c));
        }
        self.tree.descendants(label).into_iter().find(|&d| labelable(d))
    }

    /// Validate and submit `form`, focusing the first invalid control on failure
    pub fn request_submit(&mut self, form: NodeId) -> SubmitOutcome {
        if !self.has_attr(form, "novalidate") {
            let invalid = self.form_controls(form)
                .into_iter()
                .find_map(|control| self.validation_message(control).map(|m| (control, m)));
            if let Some((control, message)) = invalid {
                tracing::debug!(?form, ?control, %message, "submission blocked");
                self.focus(control);
                return SubmitOutcome::Invalid { control, message };
            }
        }
        tracing::debug!(?form, "form submitted");
        self.submissions.push(form);
        SubmitOutcome::Submitted(form)
    }
}
