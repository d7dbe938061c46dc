//! Element Decorators
//!
//! Each decorator merges one part of a content document into the matching
//! part of an imported decorator root. Both live in the same tree by the time
//! these run.

mod body;
mod document;
mod head;
mod xml;

pub use body::HtmlBodyDecorator;
pub use document::DocumentDecorator;
pub use head::HtmlHeadDecorator;
pub use xml::XmlElementDecorator;

use fos_dom::{DomTree, ElementData, NodeId};

use crate::error::Result;
use crate::markers::Markers;

/// Merge step for one element of a decoration
pub trait ElementDecorator {
    /// Merge `content` (absent if the content document has no such part)
    /// into `target`
    fn decorate(&self, tree: &mut DomTree, target: NodeId, content: Option<NodeId>) -> Result<()>;
}

/// Copy the attributes of `source` onto `target`, source values winning.
///
/// Fragment-name attributes are never copied. Local variable declarations
/// are concatenated as `source,target` so both sides stay visible. With
/// `merge_only`, only attributes `target` already has are overwritten.
pub fn pull_attributes(
    target: &mut ElementData,
    source: &ElementData,
    markers: &Markers,
    merge_only: bool,
) {
    for attr in &source.attrs {
        if markers.fragment.matches(&attr.name) {
            continue;
        }

        if markers.with.matches(&attr.name) {
            let merged = match markers.with.get(target) {
                Some(existing) => format!("{},{}", attr.value, existing),
                None => attr.value.clone(),
            };
            markers.with.set(target, &merged);
            continue;
        }

        if !merge_only || target.has_attr(&attr.name) {
            target.set_attr(&attr.name, attr.value.as_str());
        }
    }
}

/// `pull_attributes` between two elements of the same tree
pub(crate) fn pull_node_attributes(
    tree: &mut DomTree,
    target: NodeId,
    source: NodeId,
    markers: &Markers,
    merge_only: bool,
) {
    let Some(source) = tree.element(source).cloned() else {
        return;
    };
    if let Some(target) = tree.element_mut(target) {
        pull_attributes(target, &source, markers, merge_only);
    }
}

/// First element child of `parent` with the given tag
pub(crate) fn child_element(tree: &DomTree, parent: NodeId, tag: &str) -> Option<NodeId> {
    tree.element_children(parent)
        .into_iter()
        .find(|&child| tree.is_element_named(child, tag))
}
