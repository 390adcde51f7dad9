//! Form Validation
//!
//! Constraint Validation API: validity flags and browser-style messages.

use regex::Regex;

use crate::{Document, NodeId};

/// Which constraints a control currently fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidityState {
    /// `required` and empty (or unchecked, or nothing selected)
    pub value_missing: bool,
    /// Not an email address or URL
    pub type_mismatch: bool,
    /// Fails the anchored `pattern`
    pub pattern_mismatch: bool,
    /// Over `maxlength`
    pub too_long: bool,
    /// Under `minlength`, non-empty values only
    pub too_short: bool,
    /// Below `min`
    pub range_underflow: bool,
    /// Above `max`
    pub range_overflow: bool,
    /// Unparsable number
    pub bad_input: bool,
    /// `set_custom_validity` with a non-empty message
    pub custom_error: bool,
}

impl ValidityState {
    /// No failed constraint
    pub fn is_valid(&self) -> bool {
        !self.value_missing &&
        !self.type_mismatch &&
        !self.pattern_mismatch &&
        !self.too_long &&
        !self.too_short &&
        !self.range_underflow &&
        !self.range_overflow &&
        !self.bad_input &&
        !self.custom_error
    }
}

/// Validation constraints read from a control's attributes
#[derive(Debug, Clone, Default)]
pub struct ValidationConstraints {
    pub required: bool,
    pub pattern: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
}

impl ValidationConstraints {
    /// Length and pattern checks on a text value
    pub fn validate_string(&self, value: &str) -> ValidityState {
        let mut state = ValidityState::default();

        if self.required && value.is_empty() {
            state.value_missing = true;
        }

        let len = value.chars().count();
        if let Some(max) = self.max_length {
            if len > max {
                state.too_long = true;
            }
        }

        if let Some(min) = self.min_length {
            if !value.is_empty() && len < min {
                state.too_short = true;
            }
        }

        // An unparsable pattern is ignored, as browsers do
        if let Some(pattern) = &self.pattern {
            if !value.is_empty() {
                if let Ok(re) = Regex::new(&format!("^(?:{pattern})$")) {
                    state.pattern_mismatch = !re.is_match(value);
                }
            }
        }

        state
    }

    /// Range checks on a parsed number
    pub fn validate_number(&self, value: f64) -> ValidityState {
        let mut state = ValidityState::default();

        if let Some(min) = self.min {
            if value < min {
                state.range_underflow = true;
            }
        }

        if let Some(max) = self.max {
            if value > max {
                state.range_overflow = true;
            }
        }

        state
    }
}

impl Document {
    /// Whether the control takes part in constraint validation
    pub fn will_validate(&self, id: NodeId) -> bool {
        let candidate = match self.tag_name(id) {
            Some("select" | "textarea") => true,
            Some("input") => !matches!(
                self.input_type(id).as_str(),
                "hidden" | "button" | "submit" | "reset" | "image"
            ),
            _ => false,
        };
        candidate && !self.is_disabled(id) && !self.has_attr(id, "readonly")
    }

    fn constraints(&self, id: NodeId) -> ValidationConstraints {
        let number = |name: &str| self.attr(id, name).and_then(|v| v.trim().parse::<f64>().ok());
        let length = |name: &str| self.attr(id, name).and_then(|v| v.trim().parse::<usize>().ok());
        ValidationConstraints {
            required: self.has_attr(id, "required"),
            pattern: self.attr(id, "pattern").map(String::from),
            min: number("min"),
            max: number("max"),
            min_length: length("minlength"),
            max_length: length("maxlength"),
        }
    }

    /// Compute the validity state of a control
    pub fn validity(&self, id: NodeId) -> ValidityState {
        if !self.will_validate(id) {
            return ValidityState::default();
        }
        let constraints = self.constraints(id);
        let mut state = ValidityState::default();

        match self.tag_name(id) {
            Some("select") => {
                state.value_missing = constraints.required && self.value(id).is_empty();
            }
            Some("textarea") => {
                state = constraints.validate_string(&self.value(id));
                state.pattern_mismatch = false;
            }
            _ => {
                let ty = self.input_type(id);
                match ty.as_str() {
                    "checkbox" => {
                        state.value_missing = constraints.required && !self.checked(id);
                    }
                    "radio" => {
                        let group = self.radio_group(id);
                        let required = group.iter().any(|&r| self.has_attr(r, "required"));
                        state.value_missing = required && !group.iter().any(|&r| self.checked(r));
                    }
                    "number" | "range" => {
                        let value = self.value(id);
                        if value.trim().is_empty() {
                            state.value_missing = constraints.required && ty == "number";
                        } else {
                            match value.trim().parse::<f64>() {
                                Ok(n) => state = constraints.validate_number(n),
                                Err(_) => state.bad_input = true,
                            }
                        }
                    }
                    _ => {
                        let value = self.value(id);
                        state = constraints.validate_string(&value);
                        if !value.is_empty() {
                            state.type_mismatch = match ty.as_str() {
                                "email" => !is_valid_email(&value),
                                "url" => !is_valid_url(&value),
                                _ => false,
                            };
                        }
                    }
                }
            }
        }

        state.custom_error = self.element(id).is_some_and(|e| !e.form.custom_validity.is_empty());
        state
    }

    /// Check if valid
    pub fn check_validity(&self, id: NodeId) -> bool {
        self.validity(id).is_valid()
    }

    /// Browser-style validation message, `None` when valid
    pub fn validation_message(&self, id: NodeId) -> Option<String> {
        let state = self.validity(id);
        if state.is_valid() {
            return None;
        }
        if state.custom_error {
            return self.element(id).map(|e| e.form.custom_validity.clone());
        }
        let ty = if self.tag_name(id) == Some("input") { self.input_type(id) } else { String::new() };
        let constraints = self.constraints(id);
        let message = if state.value_missing {
            match (self.tag_name(id), ty.as_str()) {
                (_, "checkbox") => "Please check this box if you want to proceed.".to_string(),
                (_, "radio") => "Please select one of these options.".to_string(),
                (Some("select"), _) => "Please select an item in the list.".to_string(),
                _ => "Please fill out this field.".to_string(),
            }
        } else if state.type_mismatch {
            match ty.as_str() {
                "email" => "Please enter an email address.".to_string(),
                _ => "Please enter a URL.".to_string(),
            }
        } else if state.bad_input {
            "Please enter a number.".to_string()
        } else if state.pattern_mismatch {
            "Please match the requested format.".to_string()
        } else if state.too_short {
            format!("Please lengthen this text to {} characters or more.", constraints.min_length.unwrap_or_default())
        } else if state.too_long {
            format!("Please shorten this text to {} characters or less.", constraints.max_length.unwrap_or_default())
        } else if state.range_underflow {
            format!("Value must be greater than or equal to {}.", format_number(constraints.min.unwrap_or_default()))
        } else {
            format!("Value must be less than or equal to {}.", format_number(constraints.max.unwrap_or_default()))
        };
        Some(message)
    }
}

fn is_valid_email(value: &str) -> bool {
    value.split(',').all(|addr| {
        let addr = addr.trim();
        match addr.split_once('@') {
            Some((local, domain)) => !local.is_empty()
                && !domain.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !addr.contains(char::is_whitespace),
            None => false,
        }
    })
}

fn is_valid_url(value: &str) -> bool {
    match value.split_once(':') {
        Some((scheme, rest)) => !scheme.is_empty()
            && scheme.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
            && !rest.is_empty(),
        None => false,
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}
