//! Auris DOM - Document Object Model
//!
//! Arena-based DOM tree that plays the host page for the screen reader core.
//!
//! Features:
//! - Linked-sibling arena nodes addressed by `NodeId`
//! - Shadow roots and tree scopes
//! - Computed style subset (display / visibility)
//! - Focus, form state and constraint validation
//! - Click activation with page listeners
//! - Mutation records for observers

mod node;
mod tree;
mod document;
mod shadow;
mod style;
mod focus;
mod observer;
mod events;
pub mod forms;

pub use node::{Node, NodeData, ElementData, TextData, Attribute};
pub use tree::{DomTree, Children};
pub use document::{Document, Ancestors, collapse_whitespace};
pub use shadow::{ShadowRootData, ShadowRootMode};
pub use style::{ComputedStyle, Display, Visibility, StyleSheet, StyleRule, CompoundSelector, Declaration, Declared};
pub use focus::TabIndex;
pub use observer::{MutationObserverInit, MutationRecord, MutationType};
pub use events::{ClickListener, ActivationOutcome, SubmitOutcome};
pub use forms::{FormState, ValidityState, ValidationConstraints};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check whether this refers to a node at all
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// `Some(self)` unless this is the sentinel
    #[inline]
    pub fn to_option(self) -> Option<NodeId> {
        self.is_valid().then_some(self)
    }
}

/// DOM error
#[derive(Debug, thiserror::Error)]
pub enum DomError {
    #[error("Node {0:?} does not exist")]
    NotFound(NodeId),

    #[error("Node {0:?} is not an element")]
    NotAnElement(NodeId),

    #[error("Hierarchy request error: {0}")]
    HierarchyRequest(String),

    #[error("Element {0:?} already hosts a shadow root")]
    ShadowRootExists(NodeId),

    #[error("{0} is not supported by this document")]
    NotSupported(&'static str),
}
