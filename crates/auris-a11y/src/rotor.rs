//! Rotor
//!
//! Predicates narrowing which nodes a seek considers, with the spoken label
//! used when nothing matches.

use crate::role::{NodeKind, Role};
use crate::state::State;
use crate::tree::AccessibleNode;

/// Seek direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Previous => "previous",
        }
    }
}

/// Named rotor categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotor {
    Headings,
    HeadingLevel(u32),
    Links,
    FormFields,
    Buttons,
    Landmarks,
    Lists,
    Tables,
    Images,
}

impl Rotor {
    fn matches(&self, node: &AccessibleNode) -> bool {
        match self {
            Self::Headings => node.role == Role::Heading,
            Self::HeadingLevel(level) => node.role == Role::Heading && node.states.level() == Some(*level),
            Self::Links => node.role == Role::Link,
            Self::FormFields => node.kind == NodeKind::Interactive && matches!(node.role,
                Role::TextBox | Role::SearchBox | Role::Combobox | Role::ListBox |
                Role::Checkbox | Role::Radio | Role::Switch | Role::Slider | Role::SpinButton
            ),
            Self::Buttons => node.role == Role::Button,
            Self::Landmarks => node.role.is_landmark(),
            Self::Lists => node.role == Role::List,
            Self::Tables => node.role.is_table(),
            Self::Images => matches!(node.role, Role::Img | Role::Figure),
        }
    }

    fn label(&self) -> String {
        match self {
            Self::Headings => "heading".to_string(),
            Self::HeadingLevel(level) => format!("heading level {level}"),
            Self::Links => "link".to_string(),
            Self::FormFields => "form field".to_string(),
            Self::Buttons => "button".to_string(),
            Self::Landmarks => "landmark".to_string(),
            Self::Lists => "list".to_string(),
            Self::Tables => "table".to_string(),
            Self::Images => "image".to_string(),
        }
    }
}

/// Seek predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    Role(Role),
    State(State),
    Rotor(Rotor),
}

impl Filter {
    pub fn matches(&self, node: &AccessibleNode) -> bool {
        match self {
            Self::Role(role) => node.role == *role,
            Self::State(state) => node.states.contains(*state),
            Self::Rotor(rotor) => rotor.matches(node),
        }
    }

    /// Spoken category label
    pub fn label(&self) -> String {
        match self {
            Self::Role(role) => role.label().unwrap_or(role.as_str()).to_string(),
            Self::State(state) => format!("{state} item"),
            Self::Rotor(rotor) => rotor.label(),
        }
    }

    /// "no next heading", "no previous link"
    pub fn not_found(&self, direction: Direction) -> String {
        format!("no {} {}", direction.as_str(), self.label())
    }
}

impl From<Role> for Filter {
    fn from(role: Role) -> Self {
        Self::Role(role)
    }
}

impl From<Rotor> for Filter {
    fn from(rotor: Rotor) -> Self {
        Self::Rotor(rotor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_labels() {
        assert_eq!(Filter::Rotor(Rotor::Headings).not_found(Direction::Next), "no next heading");
        assert_eq!(Filter::Rotor(Rotor::HeadingLevel(2)).not_found(Direction::Previous), "no previous heading level 2");
        assert_eq!(Filter::Role(Role::TextBox).not_found(Direction::Next), "no next edit text");
        assert_eq!(Filter::State(State::Invalid).not_found(Direction::Next), "no next invalid item");
    }
}
