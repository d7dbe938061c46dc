//! fOS DOM - Document Object Model
//!
//! Arena-backed document tree used by the template parser and the layout
//! decorator. Nodes are addressed by `NodeId` and linked parent/child/sibling
//! by id, so subtrees can be moved, cloned or imported between documents.

mod node;
mod tree;
mod document;

pub use node::{Attribute, ElementData, Node, NodeData, PropertyValue, TextData};
pub use tree::{Children, DomTree};
pub use document::Document;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Null link
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check that this id is not the null link
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}
