//! Accessibility Tree
//!
//! Flat, filtered snapshots of the reportable nodes of a document, in
//! composed pre-order (shadow content is visited as ordinary children).

use std::collections::HashSet;

use auris_dom::{Document, NodeId};
use serde::{Serialize, Serializer};

use crate::classifier::{is_hidden, Classifier, Coords, Position};
use crate::role::{NodeKind, Role};
use crate::state::StateSet;

/// Accessibility node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessibleNode {
    /// Back-reference into the document; stale once the element is removed
    #[serde(serialize_with = "serialize_node_id")]
    pub element: NodeId,
    pub role: Role,
    pub kind: NodeKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "StateSet::is_empty")]
    pub states: StateSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coords: Option<Coords>,
    pub focusable: bool,
}

fn serialize_node_id<S: Serializer>(id: &NodeId, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(id.index() as u64)
}

impl AccessibleNode {
    /// Re-classify the element against the live document.
    /// `None` when the element has left the document.
    pub fn refreshed(&self, doc: &Document, classifier: &Classifier) -> Option<Self> {
        if !doc.is_connected(self.element) {
            return None;
        }
        Some(classifier.classify(doc, self.element))
    }

    /// Check if interactive
    pub fn is_interactive(&self) -> bool {
        self.kind == NodeKind::Interactive
    }

    /// Whether the node carries anything worth announcing
    fn has_signal(&self) -> bool {
        !self.name.is_empty()
            || self.value.is_some()
            || !self.states.is_empty()
            || self.focusable
            || self.role.is_self_contained()
            || self.position.is_some()
            || self.coords.is_some()
    }
}

/// Immutable tree snapshot; rebuilds replace it wholesale
#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    nodes: Vec<AccessibleNode>,
    generation: u64,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AccessibleNode> {
        self.nodes.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccessibleNode> {
        self.nodes.iter()
    }

    pub fn nodes(&self) -> &[AccessibleNode] {
        &self.nodes
    }

    /// Index of the node for `element`, by identity
    pub fn index_of(&self, element: NodeId) -> Option<usize> {
        self.nodes.iter().position(|n| n.element == element)
    }

    /// Build counter, increasing with each rebuild
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Tree builder
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    classifier: Classifier,
}

impl TreeBuilder {
    pub fn new(classifier: Classifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Build a snapshot of `doc`
    pub fn build(&self, doc: &Document, generation: u64) -> Snapshot {
        let mut nodes = Vec::new();
        self.walk(doc, NodeId::ROOT, None, &mut nodes);
        let before = nodes.len();
        let nodes = dedup_labels(doc, nodes);
        tracing::debug!(generation, nodes = nodes.len(), dropped_labels = before - nodes.len(), "built accessibility snapshot");
        Snapshot { nodes, generation }
    }

    fn walk(&self, doc: &Document, parent: NodeId, absorber: Option<&Absorber>, out: &mut Vec<AccessibleNode>) {
        for child in doc.composed_children(parent) {
            if !doc.is_element(child) {
                continue;
            }
            // hidden subtrees are skipped wholesale
            if is_hidden(doc, child) {
                tracing::trace!(?child, "hidden subtree skipped");
                continue;
            }
            let mut inner = None;
            if let Some(node) = self.reportable(doc, child) {
                if absorber.is_some_and(|a| a.swallows(&node)) {
                    tracing::trace!(?child, "text already spoken by its named ancestor");
                } else {
                    if node.role.absorbs_text() && !node.name.is_empty() {
                        inner = Some(Absorber { role: node.role, name: node.name.clone() });
                    }
                    out.push(node);
                }
            }
            self.walk(doc, child, inner.as_ref().or(absorber), out);
        }
    }

    fn reportable(&self, doc: &Document, el: NodeId) -> Option<AccessibleNode> {
        let role = self.classifier.role(doc, el);
        let focusable = doc.is_focusable(el);
        if role.is_generic() && !focusable && !role.is_self_contained() {
            return None;
        }
        let node = self.classifier.classify(doc, el);
        node.has_signal().then_some(node)
    }
}

/// Nearest emitted ancestor whose name is computed from its content
struct Absorber {
    role: Role,
    name: String,
}

impl Absorber {
    /// Static text is dropped when the ancestor already speaks it
    fn swallows(&self, node: &AccessibleNode) -> bool {
        node.role == Role::StaticText
            && (self.role.children_presentational() || self.name.contains(node.name.as_str()))
    }
}

/// Build a snapshot with the default classifier
pub fn build_tree(doc: &Document) -> Snapshot {
    TreeBuilder::default().build(doc, 0)
}

/// Drop labels whose control is already in the snapshot, together with the
/// static text inside them.
fn dedup_labels(doc: &Document, nodes: Vec<AccessibleNode>) -> Vec<AccessibleNode> {
    let present: HashSet<NodeId> = nodes.iter().map(|n| n.element).collect();
    let interactive: Vec<NodeId> = nodes.iter()
        .filter(|n| n.is_interactive())
        .map(|n| n.element)
        .collect();

    let is_redundant_label = |label: NodeId| {
        if doc.tag_name(label) != Some("label") {
            return false;
        }
        let referenced = doc.attr(label, "for")
            .and_then(|id| doc.get_element_by_id_in_scope(doc.tree_scope(label), id))
            .is_some_and(|target| present.contains(&target));
        referenced || interactive.iter().any(|&control| control != label && doc.contains_composed(label, control))
    };

    let dropped: HashSet<NodeId> = nodes.iter()
        .map(|n| n.element)
        .filter(|&el| is_redundant_label(el))
        .collect();
    if dropped.is_empty() {
        return nodes;
    }

    nodes.into_iter()
        .filter(|n| !dropped.contains(&n.element))
        .filter(|n| {
            n.role != Role::StaticText
                || !doc.ancestors(n.element).any(|a| dropped.contains(&a))
        })
        .collect()
}
