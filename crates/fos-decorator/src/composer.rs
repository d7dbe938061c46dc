//! Composer
//!
//! Entry point tying the two passes together: static decoration, then
//! materialization.

use fos_dom::Document;
use fos_html::HtmlSerializer;

use crate::decorators::DocumentDecorator;
use crate::error::{DecoratorError, Result};
use crate::expression::{ExpressionEvaluator, NoEvaluator};
use crate::materialize::Materializer;
use crate::reference::FragmentReference;
use crate::repository::TemplateRepository;
use crate::{DialectConfig, Markers};

/// Composes templates from a repository
pub struct Composer<R> {
    repository: R,
    config: DialectConfig,
    markers: Markers,
    evaluator: Box<dyn ExpressionEvaluator>,
}

impl<R: TemplateRepository> Composer<R> {
    /// Composer with the default dialect and no expression support
    pub fn new(repository: R) -> Self {
        Self::with_config(repository, DialectConfig::default())
    }

    pub fn with_config(repository: R, config: DialectConfig) -> Self {
        let markers = config.markers();
        Self {
            repository,
            config,
            markers,
            evaluator: Box::new(NoEvaluator),
        }
    }

    /// Use an evaluator for title expressions
    pub fn with_evaluator(mut self, evaluator: impl ExpressionEvaluator + 'static) -> Self {
        self.evaluator = Box::new(evaluator);
        self
    }

    pub fn config(&self) -> &DialectConfig {
        &self.config
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Load a template and run both passes on it
    pub fn compose(&self, template: &str) -> Result<Document> {
        tracing::info!("Composing {}", template);
        let mut document = self
            .repository
            .resolve(template)
            .map_err(|e| DecoratorError::from_repository(template, template, e))?;
        self.process(&mut document)?;
        tracing::info!("Composed {}", template);
        Ok(document)
    }

    /// Decorate (if the document names a decorator) and materialize an
    /// already loaded document
    pub fn process(&self, document: &mut Document) -> Result<()> {
        let decorated = DocumentDecorator::new(&self.repository, &self.config, &self.markers)
            .decorate_declared(document)?;
        if decorated {
            tracing::debug!("Decorated {}", document.url());
        }
        Materializer::new(&self.repository, &self.config, &self.markers, self.evaluator.as_ref())
            .materialize(document)
    }

    /// Static merge with an explicitly named decorator, without
    /// materializing placeholders
    pub fn decorate(&self, document: &mut Document, decorator: &FragmentReference) -> Result<()> {
        DocumentDecorator::new(&self.repository, &self.config, &self.markers)
            .decorate(document, decorator)
    }

    /// Compose a template and serialize it
    pub fn render(&self, template: &str) -> Result<String> {
        let document = self.compose(template)?;
        Ok(self.serializer().serialize_document(&document))
    }

    /// Like `render`, with indented output
    pub fn render_pretty(&self, template: &str) -> Result<String> {
        let document = self.compose(template)?;
        Ok(HtmlSerializer::pretty()
            .with_mode(self.config.template_mode)
            .serialize_document(&document))
    }

    fn serializer(&self) -> HtmlSerializer {
        HtmlSerializer::new().with_mode(self.config.template_mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryRepository;

    fn repository() -> MemoryRepository {
        MemoryRepository::new()
            .with_template(
                "layout",
                r#"<!DOCTYPE html><html><head><title>Site</title></head><body><main layout:fragment="content">default</main></body></html>"#,
            )
            .and_then(|r| {
                r.with_template(
                    "page",
                    r#"<html layout:decorator="layout"><head><title>Page</title></head><body><div layout:fragment="content">hello</div></body></html>"#,
                )
            })
            .unwrap()
    }

    #[test]
    fn test_render() {
        let composer = Composer::new(repository());
        let html = composer.render("page").unwrap();
        assert_eq!(
            html,
            "<!DOCTYPE html><html><head><title>Page</title></head><body><div>hello</div></body></html>"
        );
    }

    #[test]
    fn test_decorate_only_keeps_placeholders() {
        let composer = Composer::new(repository());
        let mut doc = composer.repository().resolve("page").unwrap();
        composer
            .decorate(&mut doc, &FragmentReference::template("layout"))
            .unwrap();
        let html = HtmlSerializer::new().serialize_document(&doc);
        assert!(html.contains(r#"<main layout:fragment="content">default</main>"#));
    }

    #[test]
    fn test_compose_missing_template() {
        let composer = Composer::new(MemoryRepository::new());
        assert!(matches!(
            composer.compose("nowhere"),
            Err(DecoratorError::ReferenceNotFound { reference, .. }) if reference == "nowhere"
        ));
    }
}
