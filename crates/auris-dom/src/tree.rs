//! DOM Tree (arena-based allocation)

use crate::{DomError, Node, NodeId};

/// Arena-based DOM tree
///
/// Node 0 is always the document node. Nodes are never freed: removing a
/// subtree only unlinks it, so ids held elsewhere never dangle.
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self { nodes: vec![Node::document()] }
    }

    /// The document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes in the arena (attached or not)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Push a node into the arena, unattached
    pub fn create_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create an unattached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.create_node(Node::element(tag))
    }

    /// Create an unattached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.create_node(Node::text(content))
    }

    /// Create an unattached comment
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.create_node(Node::comment(content))
    }

    /// Append `child` as the last child of `parent`, detaching it first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.insert_before(parent, child, NodeId::NONE)
    }

    /// Insert `child` before `reference` (or at the end when `reference` is NONE)
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) -> Result<(), DomError> {
        self.check_insert(parent, child, reference)?;
        self.detach(child);

        let prev = if reference.is_valid() {
            self.nodes[reference.index()].prev_sibling
        } else {
            self.nodes[parent.index()].last_child
        };

        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = reference;
        }

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }

        if reference.is_valid() {
            self.nodes[reference.index()].prev_sibling = child;
        } else {
            self.nodes[parent.index()].last_child = child;
        }

        Ok(())
    }

    fn check_insert(&self, parent: NodeId, child: NodeId, reference: NodeId) -> Result<(), DomError> {
        if self.get(parent).is_none() {
            return Err(DomError::NotFound(parent));
        }
        let child_node = self.get(child).ok_or(DomError::NotFound(child))?;
        if child == NodeId::ROOT || child_node.is_shadow_root() {
            return Err(DomError::HierarchyRequest("cannot insert a document or shadow root".into()));
        }
        if child == parent || self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest("cannot insert a node into itself".into()));
        }
        if reference.is_valid() {
            let reference_node = self.get(reference).ok_or(DomError::NotFound(reference))?;
            if reference_node.parent != parent {
                return Err(DomError::HierarchyRequest("reference is not a child of parent".into()));
            }
            if reference == child {
                return Err(DomError::HierarchyRequest("reference is the inserted node".into()));
            }
        }
        Ok(())
    }

    /// Unlink a node from its parent. Returns the old parent (NONE if it had none).
    pub fn detach(&mut self, child: NodeId) -> NodeId {
        let Some(node) = self.get(child) else {
            return NodeId::NONE;
        };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        if !parent.is_valid() {
            return NodeId::NONE;
        }

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }

        let node = &mut self.nodes[child.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
        parent
    }

    /// Iterate over direct children
    pub fn children(&self, id: NodeId) -> Children<'_> {
        let next = self.get(id).map_or(NodeId::NONE, |n| n.first_child);
        Children { tree: self, next }
    }

    /// Direct element children, in order
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .filter(|(_, node)| node.is_element())
            .map(|(child, _)| child)
    }

    /// Check whether `ancestor` is `node` or one of its (light tree) ancestors
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = node;
        while current.is_valid() {
            if current == ancestor {
                return true;
            }
            current = self.get(current).map_or(NodeId::NONE, |n| n.parent);
        }
        false
    }

    /// Light-tree descendants of `id` in pre-order (excluding `id`)
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).map(|(c, _)| c).collect();
        stack.reverse();
        while let Some(current) = stack.pop() {
            out.push(current);
            let start = stack.len();
            stack.extend(self.children(current).map(|(c, _)| c));
            stack[start..].reverse();
        }
        out
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the children of a node
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.next.is_valid() {
            return None;
        }
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}
