//! Materialization
//!
//! Second pass over a decorated document: inclusions are spliced, fragment
//! placeholders are replaced from the nearest scope and title patterns are
//! expanded. Scopes are threaded down the walk as an ordered chain of
//! fragment maps; nothing outlives one call.

use std::borrow::Cow;
use std::sync::Arc;

use fos_dom::{Document, DomTree, NodeId};

use crate::decorators::pull_attributes;
use crate::error::Result;
use crate::expression::ExpressionEvaluator;
use crate::fragments::{FragmentMap, FragmentScope};
use crate::include::IncludeResolver;
use crate::markers::Markers;
use crate::repository::TemplateRepository;
use crate::title::TitlePatternExpander;
use crate::DialectConfig;

/// Per-document walk state
struct Walk<'t> {
    template: &'t str,
    /// Inclusions being expanded, outermost first
    includes: Vec<String>,
}

/// Runs the second pass over a document
pub struct Materializer<'a, R: ?Sized> {
    markers: &'a Markers,
    includes: IncludeResolver<'a, R>,
    titles: TitlePatternExpander<'a>,
}

impl<'a, R: TemplateRepository + ?Sized> Materializer<'a, R> {
    pub fn new(
        repository: &'a R,
        config: &'a DialectConfig,
        markers: &'a Markers,
        evaluator: &'a dyn ExpressionEvaluator,
    ) -> Self {
        Self {
            markers,
            includes: IncludeResolver::new(repository, markers),
            titles: TitlePatternExpander::new(config, markers, evaluator),
        }
    }

    /// Materialize every node of a document
    pub fn materialize(&self, document: &mut Document) -> Result<()> {
        let template = document.url().to_string();
        let mut walk = Walk {
            template: &template,
            includes: vec![template.clone()],
        };
        let root = document.tree.root();
        for node in document.tree.child_ids(root) {
            self.visit(&mut document.tree, &mut walk, node, &[])?;
        }
        Ok(())
    }

    fn visit(
        &self,
        tree: &mut DomTree,
        walk: &mut Walk<'_>,
        node: NodeId,
        chain: &[Arc<FragmentMap>],
    ) -> Result<()> {
        if tree.element(node).is_none() {
            return Ok(());
        }

        let chain: Cow<'_, [Arc<FragmentMap>]> = match FragmentScope::take(tree, node) {
            Some(scope) => scope.layers.iter().chain(chain).cloned().collect(),
            None => Cow::Borrowed(chain),
        };

        if self.includes.kind_of(tree, node).is_some() {
            let inclusion = self.includes.resolve(tree, walk.template, node, &walk.includes)?;
            walk.includes.push(inclusion.reference.to_string());
            let result = inclusion
                .nodes
                .iter()
                .try_for_each(|&spliced| self.visit(tree, walk, spliced, &chain));
            walk.includes.pop();
            return result;
        }

        if let Some(name) = tree
            .element(node)
            .and_then(|e| self.markers.fragment_name(e))
            .map(str::to_string)
        {
            if tree.is_element_named(node, "title") {
                tracing::warn!(
                    "Ignoring fragment '{}' on <title> in {}; titles are merged automatically",
                    name,
                    walk.template
                );
            } else if let Some(layer) = chain.iter().position(|map| map.contains(&name)) {
                let replacement = self.substitute(tree, node, &chain[layer], &name);
                return self.visit(tree, walk, replacement, &chain[layer + 1..]);
            } else {
                tracing::debug!("No content for fragment '{}', keeping the default", name);
            }
            if let Some(elem) = tree.element_mut(node) {
                self.markers.fragment.remove(elem);
            }
        }

        if self.titles.applies_to(tree, node) {
            self.titles.expand(tree, walk.template, node)?;
        }

        for child in tree.child_ids(node) {
            self.visit(tree, walk, child, &chain)?;
        }
        Ok(())
    }

    /// Put a copy of the named fragment where the placeholder is. The copy
    /// keeps the fragment's tag and content and gains the placeholder's
    /// attributes, fragment attributes winning.
    fn substitute(
        &self,
        tree: &mut DomTree,
        placeholder: NodeId,
        map: &FragmentMap,
        name: &str,
    ) -> NodeId {
        let Some(fragment) = map.get(name) else {
            return placeholder;
        };
        tracing::debug!("Substituting fragment '{}'", name);

        let replacement = fragment.instantiate(tree);
        let placeholder_elem = tree.element(placeholder).cloned();
        if let (Some(mut merged), Some(content)) =
            (placeholder_elem, tree.element_mut(replacement))
        {
            merged.attrs.retain(|attr| !self.markers.fragment.matches(&attr.name));
            pull_attributes(&mut merged, content, self.markers, false);
            content.attrs = merged.attrs;
        }
        tree.replace(placeholder, replacement);
        replacement
    }
}
