//! Document - High-level document API

use crate::{DomTree, NodeData, NodeId};

/// A parsed template document
///
/// Cloning a document copies the whole arena, so a clone can be mutated
/// without affecting the original.
#[derive(Debug, Clone)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Identifier the document was loaded under
    url: String,
}

impl Document {
    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
        }
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Root element of the document
    pub fn document_element(&self) -> Option<NodeId> {
        self.tree.first_element_child(self.tree.root())
    }

    /// First `<head>` inside the root element
    pub fn head(&self) -> Option<NodeId> {
        self.find_element("head")
    }

    /// First `<body>` inside the root element
    pub fn body(&self) -> Option<NodeId> {
        self.find_element("body")
    }

    /// Pre-order search below (and including) the root element
    pub fn find_element(&self, tag: &str) -> Option<NodeId> {
        self.tree.find_element(self.document_element()?, tag)
    }

    /// Get document title
    pub fn title(&self) -> String {
        self.find_element("title")
            .map(|title| self.tree.text_content(title))
            .unwrap_or_default()
    }

    /// DOCTYPE node, if any
    pub fn doctype(&self) -> Option<NodeId> {
        self.tree
            .children(self.tree.root())
            .find(|(_, node)| node.is_doctype())
            .map(|(id, _)| id)
    }

    /// Install a DOCTYPE as the first child of the document, replacing any
    /// existing one
    pub fn set_doctype(&mut self, name: &str, public_id: &str, system_id: &str) {
        if let Some(existing) = self.doctype() {
            self.tree.detach(existing);
        }
        let doctype = self.tree.create_doctype(name, public_id, system_id);
        let root = self.tree.root();
        self.tree.insert_child(root, 0, doctype);
    }

    /// Copy the DOCTYPE of another document into this one
    pub fn copy_doctype_from(&mut self, other: &Document) {
        let Some(id) = other.doctype() else {
            return;
        };
        if let Some(NodeData::Doctype {
            name,
            public_id,
            system_id,
        }) = other.tree.get(id).map(|n| &n.data)
        {
            self.set_doctype(name, public_id, system_id);
        }
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}
