//! `<head>` decoration

use fos_dom::{DomTree, ElementData, NodeId, PropertyValue};

use super::{ElementDecorator, child_element, pull_node_attributes};
use crate::error::Result;
use crate::markers::Markers;
use crate::title::{CONTENT_TITLE, DECORATOR_TITLE};

/// Kinds of head element that are kept grouped together
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeadElement {
    Stylesheet,
    Script,
    Other,
}

impl HeadElement {
    fn of(elem: &ElementData) -> Self {
        if elem.is("script") {
            Self::Script
        } else if elem.is("style")
            || (elem.is("link")
                && elem
                    .get_attr("rel")
                    .is_some_and(|rel| rel.eq_ignore_ascii_case("stylesheet")))
        {
            Self::Stylesheet
        } else {
            Self::Other
        }
    }
}

/// Merges the content `<head>` into the decorator's
pub struct HtmlHeadDecorator<'a> {
    markers: &'a Markers,
}

impl<'a> HtmlHeadDecorator<'a> {
    pub fn new(markers: &'a Markers) -> Self {
        Self { markers }
    }

    /// Move one title's text and attributes onto the merged title and
    /// detach the original
    fn extract_title(&self, tree: &mut DomTree, title: NodeId, key: &str, result: NodeId) {
        tree.clear_children(result);
        for child in tree.child_ids(title) {
            tree.append_child(result, child);
        }

        let Some(elem) = tree.element(title) else {
            return;
        };
        let value = self
            .markers
            .utext
            .get(elem)
            .or_else(|| self.markers.text.get(elem))
            .or_else(|| elem.text_property(key))
            .map(str::to_string)
            .or_else(|| {
                let text = tree.text_content(result);
                (!text.is_empty()).then_some(text)
            });
        let stored = [DECORATOR_TITLE, CONTENT_TITLE]
            .into_iter()
            .filter(|&other| other != key)
            .filter_map(|other| elem.text_property(other).map(|v| (other, v.to_string())))
            .collect::<Vec<_>>();

        if let Some(result_elem) = tree.element_mut(result) {
            if let Some(value) = value {
                result_elem.set_property(key, PropertyValue::Text(value));
            }
            // Keep the other side of an already merged title for deeper chains
            for (other, value) in stored {
                if result_elem.property(other).is_none() {
                    result_elem.set_property(other, PropertyValue::Text(value));
                }
            }
        }

        pull_node_attributes(tree, result, title, self.markers, false);
        tree.detach(title);
    }

    /// Index a moved content element should be inserted at
    fn insertion_point(tree: &DomTree, head: NodeId, kind: HeadElement) -> Option<usize> {
        if kind == HeadElement::Other {
            return None;
        }
        tree.children(head)
            .enumerate()
            .filter(|(_, (_, node))| node.as_element().is_some_and(|e| HeadElement::of(e) == kind))
            .map(|(index, _)| index + 1)
            .last()
    }
}

impl ElementDecorator for HtmlHeadDecorator<'_> {
    fn decorate(&self, tree: &mut DomTree, target: NodeId, content: Option<NodeId>) -> Result<()> {
        let Some(content_head) = content else {
            return Ok(());
        };

        let Some(decorator_head) = child_element(tree, target, "head") else {
            tracing::debug!("Decorator has no <head>, using the content's");
            tree.insert_child(target, 0, content_head);
            return Ok(());
        };

        let decorator_title = tree.find_element(decorator_head, "title");
        let content_title = tree.find_element(content_head, "title");
        let merged_title = if decorator_title.is_some() || content_title.is_some() {
            let result = tree.create_element("title");
            if let Some(title) = decorator_title {
                self.extract_title(tree, title, DECORATOR_TITLE, result);
            }
            if let Some(title) = content_title {
                self.extract_title(tree, title, CONTENT_TITLE, result);
            }

            if let Some(elem) = tree.element_mut(result) {
                if self.markers.title_pattern.is_present(elem) {
                    self.markers.text.remove(elem);
                    self.markers.utext.remove(elem);
                }
            }
            Some(result)
        } else {
            None
        };

        for child in tree.element_children(content_head) {
            let kind = tree.element(child).map_or(HeadElement::Other, HeadElement::of);
            match Self::insertion_point(tree, decorator_head, kind) {
                Some(index) => tree.insert_child(decorator_head, index, child),
                None => tree.append_child(decorator_head, child),
            }
        }

        if let Some(title) = merged_title {
            tree.insert_child(decorator_head, 0, title);
        }

        pull_node_attributes(tree, decorator_head, content_head, self.markers, false);
        Ok(())
    }
}
