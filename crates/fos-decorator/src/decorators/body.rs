//! `<body>` decoration

use fos_dom::{DomTree, NodeId};

use super::{ElementDecorator, child_element, pull_node_attributes};
use crate::error::Result;
use crate::markers::Markers;

/// Merges the content `<body>` attributes into the decorator's.
///
/// Body children are left alone: the decorator's markup stays in charge and
/// content arrives through fragment placeholders.
pub struct HtmlBodyDecorator<'a> {
    markers: &'a Markers,
}

impl<'a> HtmlBodyDecorator<'a> {
    pub fn new(markers: &'a Markers) -> Self {
        Self { markers }
    }
}

impl ElementDecorator for HtmlBodyDecorator<'_> {
    fn decorate(&self, tree: &mut DomTree, target: NodeId, content: Option<NodeId>) -> Result<()> {
        let Some(content_body) = content else {
            return Ok(());
        };

        match child_element(tree, target, "body") {
            Some(decorator_body) => {
                pull_node_attributes(tree, decorator_body, content_body, self.markers, false);
            }
            None => {
                tracing::debug!("Decorator has no <body>, using the content's");
                tree.append_child(target, content_body);
            }
        }
        Ok(())
    }
}
