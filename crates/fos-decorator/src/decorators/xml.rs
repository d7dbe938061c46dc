//! Root element decoration

use fos_dom::{DomTree, NodeId};

use super::{ElementDecorator, pull_node_attributes};
use crate::error::Result;
use crate::markers::Markers;

/// Attribute-only merge of the content root into the decorator root.
///
/// With matching tag names every content attribute is copied; otherwise
/// only attributes the decorator root already declares are overwritten.
pub struct XmlElementDecorator<'a> {
    markers: &'a Markers,
}

impl<'a> XmlElementDecorator<'a> {
    pub fn new(markers: &'a Markers) -> Self {
        Self { markers }
    }
}

impl ElementDecorator for XmlElementDecorator<'_> {
    fn decorate(&self, tree: &mut DomTree, target: NodeId, content: Option<NodeId>) -> Result<()> {
        let Some(content) = content else {
            return Ok(());
        };
        let same_tag = match (tree.element(target), tree.element(content)) {
            (Some(t), Some(c)) => t.is(&c.name),
            _ => return Ok(()),
        };
        if !same_tag {
            tracing::debug!("Root tag names differ, merging existing attributes only");
        }
        pull_node_attributes(tree, target, content, self.markers, !same_tag);
        Ok(())
    }
}
