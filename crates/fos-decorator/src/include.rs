//! Include and Replace
//!
//! Splices a fragment of another template at an element. `include` keeps
//! the element and swaps its children; `replace` puts the fetched node(s)
//! where the element was. Fragments declared among the element's own
//! children become the scope of the spliced content.

use std::sync::Arc;

use fos_dom::{DomTree, NodeData, NodeId};

use crate::error::{DecoratorError, Result};
use crate::fragments::{FragmentScanner, FragmentScope};
use crate::markers::{AttrName, Markers};
use crate::reference::FragmentReference;
use crate::repository::TemplateRepository;

/// How an inclusion splices its content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InclusionKind {
    Include,
    Replace,
}

/// Outcome of one inclusion
#[derive(Debug, Clone)]
pub struct Inclusion {
    pub kind: InclusionKind,
    pub reference: FragmentReference,
    /// Nodes now standing where the element was (the element itself for
    /// `include`)
    pub nodes: Vec<NodeId>,
}

/// Resolves include and replace elements against a repository
pub struct IncludeResolver<'a, R: ?Sized> {
    repository: &'a R,
    markers: &'a Markers,
}

impl<'a, R: TemplateRepository + ?Sized> IncludeResolver<'a, R> {
    pub fn new(repository: &'a R, markers: &'a Markers) -> Self {
        Self { repository, markers }
    }

    /// Kind of inclusion an element asks for, if any
    pub fn kind_of(&self, tree: &DomTree, node: NodeId) -> Option<InclusionKind> {
        self.marker_of(tree, node).map(|(kind, _)| kind)
    }

    fn marker_of(&self, tree: &DomTree, node: NodeId) -> Option<(InclusionKind, &'a AttrName)> {
        let markers: &'a Markers = self.markers;
        let elem = tree.element(node)?;
        if markers.include.is_present(elem) {
            return Some((InclusionKind::Include, &markers.include));
        }
        markers
            .replacing(elem)
            .map(|marker| (InclusionKind::Replace, marker))
    }

    /// Splice the content referenced by `node`. `template` names the
    /// document being processed and `chain` the inclusions that led here.
    pub fn resolve(
        &self,
        tree: &mut DomTree,
        template: &str,
        node: NodeId,
        chain: &[String],
    ) -> Result<Inclusion> {
        let Some((kind, marker)) = self.marker_of(tree, node) else {
            return Err(DecoratorError::configuration(
                template,
                "#node",
                "element is not an inclusion",
            ));
        };
        let element_name = tree.element(node).map(|e| e.name.clone()).unwrap_or_default();
        if marker != &self.markers.replace && kind == InclusionKind::Replace {
            tracing::warn!(
                "{} is deprecated, use {} instead",
                marker.prefixed(),
                self.markers.replace.prefixed()
            );
        }
        let value = tree
            .element_mut(node)
            .and_then(|e| marker.remove(e))
            .unwrap_or_default();
        let reference = value
            .parse::<FragmentReference>()
            .map_err(|e| DecoratorError::configuration(template, &element_name, e.to_string()))?;

        let key = reference.to_string();
        if chain.contains(&key) {
            let mut chain = chain.to_vec();
            chain.push(key);
            return Err(DecoratorError::CyclicInclude { chain });
        }

        tracing::debug!("Resolving {:?} of '{}' in {}", kind, reference, template);
        let source = self
            .repository
            .resolve(&reference.template)
            .map_err(|e| DecoratorError::from_repository(template, &key, e))?;
        let top_level = source.tree.child_ids(source.tree.root());

        let scanner = FragmentScanner::new(self.markers);
        let selected = match &reference.fragment {
            Some(name) => Some(scanner.find(&source.tree, &top_level, name).ok_or_else(|| {
                DecoratorError::ReferenceNotFound {
                    template: template.to_string(),
                    reference: key.clone(),
                }
            })?),
            None => None,
        };

        let parameters = tree.child_ids(node);
        let scope = Arc::new(scanner.scan(tree, &parameters));

        let nodes = match kind {
            InclusionKind::Include => {
                let parent = selected.or_else(|| source.document_element());
                tree.clear_children(node);
                if let Some(parent) = parent {
                    for (child, _) in source.tree.children(parent) {
                        let copy = tree.import_subtree(&source.tree, child);
                        tree.append_child(node, copy);
                    }
                }
                FragmentScope::attach_shared(tree, node, &scope);
                vec![node]
            }
            InclusionKind::Replace => {
                let roots = match selected {
                    Some(fragment) => vec![fragment],
                    None => top_level
                        .into_iter()
                        .filter(|&id| {
                            !matches!(
                                source.tree.get(id).map(|n| &n.data),
                                Some(NodeData::Doctype { .. })
                            )
                        })
                        .collect(),
                };
                let parent = tree.parent(node);
                let mut inserted = Vec::with_capacity(roots.len());
                for root in roots {
                    let copy = tree.import_subtree(&source.tree, root);
                    if selected.is_some() {
                        if let Some(elem) = tree.element_mut(copy) {
                            self.markers.fragment.remove(elem);
                        }
                    }
                    FragmentScope::attach_shared(tree, copy, &scope);
                    if let Some(parent) = parent {
                        tree.insert_before(parent, copy, node);
                    }
                    inserted.push(copy);
                }
                tree.detach(node);
                inserted
            }
        };

        Ok(Inclusion { kind, reference, nodes })
    }
}
