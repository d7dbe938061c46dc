//! Document decoration
//!
//! Pulls a decorator document into a content document: the decorator root
//! replaces the content root, with the content's head, body and root
//! attributes merged into it and the content's fragments attached as scope.

use fos_dom::{Document, NodeId};

use super::{
    ElementDecorator, HtmlBodyDecorator, HtmlHeadDecorator, XmlElementDecorator, child_element,
};
use crate::error::{DecoratorError, Result};
use crate::fragments::{FragmentScanner, FragmentScope};
use crate::reference::FragmentReference;
use crate::repository::TemplateRepository;
use crate::{DialectConfig, Markers};

/// Resolves and applies decorators, innermost first
pub struct DocumentDecorator<'a, R: ?Sized> {
    repository: &'a R,
    config: &'a DialectConfig,
    markers: &'a Markers,
}

impl<'a, R: TemplateRepository + ?Sized> DocumentDecorator<'a, R> {
    pub fn new(repository: &'a R, config: &'a DialectConfig, markers: &'a Markers) -> Self {
        Self {
            repository,
            config,
            markers,
        }
    }

    /// Decorate a document with the decorator its root declares, if any.
    /// Returns whether a decorator was applied.
    pub fn decorate_declared(&self, content: &mut Document) -> Result<bool> {
        let mut chain = vec![content.url().to_string()];
        self.apply_declared(content, &mut chain)
    }

    /// Decorate a document with an explicitly named decorator
    pub fn decorate(&self, content: &mut Document, reference: &FragmentReference) -> Result<()> {
        let mut chain = vec![content.url().to_string()];
        self.apply(content, reference, &mut chain)
    }

    /// Find and validate the decorator reference of a document
    fn declared_reference(&self, content: &mut Document) -> Result<Option<FragmentReference>> {
        let Some(root) = content.document_element() else {
            return Ok(None);
        };
        let Some(host) = content.tree.descendants(root).into_iter().find(|&id| {
            content
                .tree
                .element(id)
                .is_some_and(|e| self.markers.decorator.is_present(e))
        }) else {
            return Ok(None);
        };

        let element_name = content
            .tree
            .element(host)
            .map(|e| e.name.clone())
            .unwrap_or_default();
        if host != root {
            let message = format!(
                "{} must appear on the root element of the template",
                self.markers.decorator.prefixed()
            );
            if !self.config.relaxed_root_check() {
                return Err(DecoratorError::configuration(content.url(), &element_name, message));
            }
            tracing::warn!("{} (found on <{}> in {})", message, element_name, content.url());
        }

        let value = content
            .tree
            .element_mut(host)
            .and_then(|e| self.markers.decorator.remove(e))
            .unwrap_or_default();
        value
            .parse::<FragmentReference>()
            .map(Some)
            .map_err(|e| DecoratorError::configuration(content.url(), &element_name, e.to_string()))
    }

    fn apply_declared(&self, content: &mut Document, chain: &mut Vec<String>) -> Result<bool> {
        match self.declared_reference(content)? {
            Some(reference) => {
                self.apply(content, &reference, chain)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn apply(
        &self,
        content: &mut Document,
        reference: &FragmentReference,
        chain: &mut Vec<String>,
    ) -> Result<()> {
        if chain.contains(&reference.template) {
            let mut chain = chain.clone();
            chain.push(reference.template.clone());
            return Err(DecoratorError::CyclicDecorator { chain });
        }
        if let Some(fragment) = &reference.fragment {
            tracing::debug!("Ignoring fragment selector '{}' of decorator reference", fragment);
        }

        tracing::debug!("Decorating {} with {}", content.url(), reference.template);
        let mut decorator = self
            .repository
            .resolve(&reference.template)
            .map_err(|e| {
                DecoratorError::from_repository(content.url(), &reference.to_string(), e)
            })?;

        // Chained layouts: the decorator is itself decorated before use
        chain.push(reference.template.clone());
        let result = self.apply_declared(&mut decorator, chain);
        chain.pop();
        result?;

        let decorator_root = decorator.document_element().ok_or_else(|| {
            DecoratorError::configuration(
                &reference.template,
                "#document",
                "decorator has no root element",
            )
        })?;
        let content_root = content.document_element().ok_or_else(|| {
            DecoratorError::configuration(content.url(), "#document", "content has no root element")
        })?;

        if let Some(elem) = content.tree.element_mut(content_root) {
            self.markers.decorator.remove(elem);
        }
        let fragments = FragmentScanner::new(self.markers).scan(&content.tree, &[content_root]);
        tracing::debug!("Found {} fragment(s) in {}", fragments.len(), content.url());

        let target = content.tree.import_subtree(&decorator.tree, decorator_root);
        if content.tree.is_element_named(target, "html") {
            let head = child_element(&content.tree, content_root, "head");
            let body = child_element(&content.tree, content_root, "body");
            HtmlHeadDecorator::new(self.markers).decorate(&mut content.tree, target, head)?;
            HtmlBodyDecorator::new(self.markers).decorate(&mut content.tree, target, body)?;
        }
        XmlElementDecorator::new(self.markers).decorate(
            &mut content.tree,
            target,
            Some(content_root),
        )?;

        if content.doctype().is_none() {
            content.copy_doctype_from(&decorator);
        }
        self.copy_external_nodes(content, &decorator, decorator_root, content_root);

        content.tree.replace(content_root, target);
        FragmentScope::attach(&mut content.tree, target, fragments);
        Ok(())
    }

    /// Copy the nodes around the decorator root (comments, processing
    /// instructions) to the same side of the content root
    fn copy_external_nodes(
        &self,
        content: &mut Document,
        decorator: &Document,
        decorator_root: NodeId,
        content_root: NodeId,
    ) {
        let document = content.tree.root();
        let mut before_root = true;
        let mut last = content_root;
        for (id, node) in decorator.tree.children(decorator.tree.root()) {
            if id == decorator_root {
                before_root = false;
                continue;
            }
            if node.is_doctype() {
                continue;
            }
            let copy = content.tree.import_subtree(&decorator.tree, id);
            if before_root {
                content.tree.insert_before(document, copy, content_root);
            } else {
                content.tree.insert_after(last, copy);
                last = copy;
            }
        }
    }
}
