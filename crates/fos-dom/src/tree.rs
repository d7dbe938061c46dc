//! DOM Tree (arena-based allocation)
//!
//! Detached nodes stay in the arena until the tree is dropped; ids are
//! never reused, so a stale id can only ever point at a detached node.

use crate::{ElementData, Node, NodeData, NodeId};

/// Arena-based DOM tree
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
        }
    }

    /// The document node
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

    /// Element data of a node, if it is an element
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(Node::as_element)
    }

    /// Mutable element data of a node, if it is an element
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(Node::as_element_mut)
    }

    /// Check if a node is an element with the given tag
    pub fn is_element_named(&self, id: NodeId, tag: &str) -> bool {
        self.element(id).is_some_and(|e| e.is(tag))
    }

    /// Number of nodes in the arena (attached or not)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ------------------------------------------------------------------
    // Creation
    // ------------------------------------------------------------------

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached node from raw data
    pub fn create_node(&mut self, data: NodeData) -> NodeId {
        self.push(Node::new(data))
    }

    /// Create a detached element
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.push(Node::element(name))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content.to_string()))
    }

    /// Create a detached comment
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.create_node(NodeData::Comment(content.to_string()))
    }

    /// Create a detached DOCTYPE
    pub fn create_doctype(&mut self, name: &str, public_id: &str, system_id: &str) -> NodeId {
        self.create_node(NodeData::Doctype {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        })
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Parent of a node, if attached
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.parent).filter(|p| p.is_valid())
    }

    /// Iterate over the children of a node
    pub fn children(&self, parent: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(parent).map_or(NodeId::NONE, |n| n.first_child),
        }
    }

    /// Snapshot of a node's child ids, safe to hold across mutation
    pub fn child_ids(&self, parent: NodeId) -> Vec<NodeId> {
        self.children(parent).map(|(id, _)| id).collect()
    }

    /// Snapshot of a node's element children
    pub fn element_children(&self, parent: NodeId) -> Vec<NodeId> {
        self.children(parent)
            .filter(|(_, node)| node.is_element())
            .map(|(id, _)| id)
            .collect()
    }

    /// First element child of a node
    pub fn first_element_child(&self, parent: NodeId) -> Option<NodeId> {
        self.children(parent)
            .find(|(_, node)| node.is_element())
            .map(|(id, _)| id)
    }

    /// Pre-order search for an element with the given tag, starting with
    /// `start` itself
    pub fn find_element(&self, start: NodeId, tag: &str) -> Option<NodeId> {
        if self.is_element_named(start, tag) {
            return Some(start);
        }
        for (child, node) in self.children(start) {
            if !node.is_element() {
                continue;
            }
            if let Some(found) = self.find_element(child, tag) {
                return Some(found);
            }
        }
        None
    }

    /// Pre-order list of `start` and all of its descendants
    pub fn descendants(&self, start: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            out.push(id);
            let mut children = self.child_ids(id);
            children.reverse();
            stack.extend(children);
        }
        out
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.descendants(id) {
            if let Some(text) = self.get(node).and_then(Node::as_text) {
                out.push_str(text);
            }
        }
        out
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Unlink a node from its parent and siblings; its subtree stays intact
    pub fn detach(&mut self, id: NodeId) {
        let (parent, prev, next) = {
            let node = self.node(id);
            (node.parent, node.prev_sibling, node.next_sibling)
        };
        if prev.is_valid() {
            self.node_mut(prev).next_sibling = next;
        } else if parent.is_valid() {
            self.node_mut(parent).first_child = next;
        }
        if next.is_valid() {
            self.node_mut(next).prev_sibling = prev;
        } else if parent.is_valid() {
            self.node_mut(parent).last_child = prev;
        }
        let node = self.node_mut(id);
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    /// Append a child, moving it from wherever it currently is
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        let last = self.node(parent).last_child;
        {
            let node = self.node_mut(child);
            node.parent = parent;
            node.prev_sibling = last;
        }
        if last.is_valid() {
            self.node_mut(last).next_sibling = child;
        } else {
            self.node_mut(parent).first_child = child;
        }
        self.node_mut(parent).last_child = child;
    }

    /// Insert `child` before `reference`; an invalid reference appends
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        if !reference.is_valid() {
            self.append_child(parent, child);
            return;
        }
        self.detach(child);
        let prev = self.node(reference).prev_sibling;
        {
            let node = self.node_mut(child);
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = reference;
        }
        self.node_mut(reference).prev_sibling = child;
        if prev.is_valid() {
            self.node_mut(prev).next_sibling = child;
        } else {
            self.node_mut(parent).first_child = child;
        }
    }

    /// Insert `child` directly after `reference` under the same parent
    pub fn insert_after(&mut self, reference: NodeId, child: NodeId) {
        let Some(parent) = self.parent(reference) else {
            return;
        };
        let next = self.node(reference).next_sibling;
        self.insert_before(parent, child, next);
    }

    /// Insert `child` so that it ends up at position `index` among the
    /// children of `parent` (clamped to the end)
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.detach(child);
        let reference = self
            .children(parent)
            .nth(index)
            .map_or(NodeId::NONE, |(id, _)| id);
        self.insert_before(parent, child, reference);
    }

    /// Put `replacement` where `old` is and detach `old`
    pub fn replace(&mut self, old: NodeId, replacement: NodeId) {
        if let Some(parent) = self.parent(old) {
            self.insert_before(parent, replacement, old);
        }
        self.detach(old);
    }

    /// Detach every child of a node
    pub fn clear_children(&mut self, parent: NodeId) {
        for child in self.child_ids(parent) {
            self.detach(child);
        }
    }

    // ------------------------------------------------------------------
    // Copying
    // ------------------------------------------------------------------

    /// Deep copy of a subtree inside this arena; the copy is detached
    pub fn clone_subtree(&mut self, id: NodeId) -> NodeId {
        let data = self.node(id).data.clone();
        let copy = self.create_node(data);
        for child in self.child_ids(id) {
            let child_copy = self.clone_subtree(child);
            self.append_child(copy, child_copy);
        }
        copy
    }

    /// Deep copy of a subtree owned by another tree; the copy is detached
    pub fn import_subtree(&mut self, source: &DomTree, id: NodeId) -> NodeId {
        let copy = self.create_node(source.node(id).data.clone());
        for (child, _) in source.children(id) {
            let child_copy = self.import_subtree(source, child);
            self.append_child(copy, child_copy);
        }
        copy
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
