//! States
//!
//! State and property labels in computation order.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A spoken state or property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum State {
    Disabled,
    Checked,
    Unchecked,
    PartiallyChecked,
    Pressed,
    NotPressed,
    PartiallyPressed,
    Selected,
    Expanded,
    Collapsed,
    Invalid,
    Level(u32),
    SortedAscending,
    SortedDescending,
    Sorted,
    Horizontal,
    Vertical,
    Required,
    ReadOnly,
}

impl State {
    /// Spoken label
    pub fn label(&self) -> String {
        match self {
            Self::Level(n) => format!("level {n}"),
            other => other.static_label().to_string(),
        }
    }

    fn static_label(&self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Checked => "checked",
            Self::Unchecked => "unchecked",
            Self::PartiallyChecked => "partially checked",
            Self::Pressed => "pressed",
            Self::NotPressed => "not pressed",
            Self::PartiallyPressed => "partially pressed",
            Self::Selected => "selected",
            Self::Expanded => "expanded",
            Self::Collapsed => "collapsed",
            Self::Invalid => "invalid",
            Self::Level(_) => "level",
            Self::SortedAscending => "sorted ascending",
            Self::SortedDescending => "sorted descending",
            Self::Sorted => "sorted",
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
            Self::Required => "required",
            Self::ReadOnly => "read only",
        }
    }

    /// States that lead the phrase for checkable and selectable roles
    pub fn is_leading(&self) -> bool {
        matches!(self, Self::Checked | Self::Unchecked | Self::PartiallyChecked | Self::Selected)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Level(n) => write!(f, "level {n}"),
            other => f.write_str(other.static_label()),
        }
    }
}

/// Ordered set of states; each appears at most once
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateSet(Vec<State>);

impl StateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a state unless already present. Returns whether it was added.
    pub fn insert(&mut self, state: State) -> bool {
        if self.0.contains(&state) {
            return false;
        }
        self.0.push(state);
        true
    }

    pub fn contains(&self, state: State) -> bool {
        self.0.contains(&state)
    }

    /// Heading/tree/row level, if any
    pub fn level(&self) -> Option<u32> {
        self.0.iter().find_map(|s| match s {
            State::Level(n) => Some(*n),
            _ => None,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &State> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Labels in order
    pub fn labels(&self) -> Vec<String> {
        self.0.iter().map(State::label).collect()
    }
}

impl FromIterator<State> for StateSet {
    fn from_iter<I: IntoIterator<Item = State>>(iter: I) -> Self {
        let mut set = Self::new();
        for state in iter {
            set.insert(state);
        }
        set
    }
}
