//! Title Patterns
//!
//! A merged `<title>` carries the decorator's and the content's title text
//! as properties. A title pattern combines the two, e.g.
//! `$CONTENT_TITLE - $DECORATOR_TITLE`.

use fos_dom::{DomTree, NodeId};

use crate::DialectConfig;
use crate::error::{DecoratorError, Result};
use crate::expression::{EvaluationContext, ExpressionEvaluator, is_expression};
use crate::markers::Markers;

/// Property holding the decorator's title text
pub const DECORATOR_TITLE: &str = "decorator-title";

/// Property holding the content page's title text
pub const CONTENT_TITLE: &str = "content-title";

/// Combine two optional titles.
///
/// With both present, each token in `pattern` is replaced in a single pass,
/// so a title that itself contains a token is left alone. With only one
/// present the pattern is ignored; with neither the result is empty.
pub fn compose_title(
    pattern: &str,
    decorator_token: &str,
    content_token: &str,
    decorator_title: Option<&str>,
    content_title: Option<&str>,
) -> String {
    let (decorator_title, content_title) = match (decorator_title, content_title) {
        (Some(d), Some(c)) => (d, c),
        (Some(only), None) | (None, Some(only)) => return only.to_string(),
        (None, None) => return String::new(),
    };

    let mut out =
        String::with_capacity(pattern.len() + decorator_title.len() + content_title.len());
    let mut rest = pattern;
    while !rest.is_empty() {
        if !decorator_token.is_empty() && rest.starts_with(decorator_token) {
            out.push_str(decorator_title);
            rest = &rest[decorator_token.len()..];
        } else if !content_token.is_empty() && rest.starts_with(content_token) {
            out.push_str(content_title);
            rest = &rest[content_token.len()..];
        } else {
            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                out.push(c);
            }
            rest = chars.as_str();
        }
    }
    out
}

/// Expands title patterns during materialization
pub struct TitlePatternExpander<'a> {
    config: &'a DialectConfig,
    markers: &'a Markers,
    evaluator: &'a dyn ExpressionEvaluator,
}

impl<'a> TitlePatternExpander<'a> {
    pub fn new(
        config: &'a DialectConfig,
        markers: &'a Markers,
        evaluator: &'a dyn ExpressionEvaluator,
    ) -> Self {
        Self {
            config,
            markers,
            evaluator,
        }
    }

    /// Whether an element carries a title pattern
    pub fn applies_to(&self, tree: &DomTree, node: NodeId) -> bool {
        tree.element(node)
            .is_some_and(|e| self.markers.title_pattern.is_present(e))
    }

    /// Replace the title's text with its expanded pattern
    pub fn expand(&self, tree: &mut DomTree, template: &str, node: NodeId) -> Result<()> {
        let Some(elem) = tree.element(node) else {
            return Ok(());
        };
        if !elem.is("title") {
            return Err(DecoratorError::configuration(
                template,
                &elem.name,
                format!("{} is only allowed on <title>", self.markers.title_pattern.prefixed()),
            ));
        }
        let Some(pattern) = self.markers.title_pattern.get(elem).map(str::to_string) else {
            return Ok(());
        };

        let stored_decorator = elem.text_property(DECORATOR_TITLE);
        let stored_content = elem.text_property(CONTENT_TITLE);
        let (decorator_raw, content_raw) = match (stored_decorator, stored_content) {
            (None, None) => (None, Some(tree.text_content(node))),
            (d, c) => (d.map(str::to_string), c.map(str::to_string)),
        };

        let context = EvaluationContext {
            template,
            tree: &*tree,
            node,
        };
        let decorator_title = decorator_raw.and_then(|raw| self.resolve(&raw, &context));
        let content_title = content_raw.and_then(|raw| self.resolve(&raw, &context));

        let title = compose_title(
            &pattern,
            &self.config.decorator_title_token,
            &self.config.content_title_token,
            decorator_title.as_deref(),
            content_title.as_deref(),
        );
        tracing::debug!("Expanded title pattern '{}' to '{}'", pattern, title);

        tree.clear_children(node);
        let text = tree.create_text(&title);
        tree.append_child(node, text);
        if let Some(elem) = tree.element_mut(node) {
            self.markers.title_pattern.remove(elem);
        }
        Ok(())
    }

    /// Evaluate one side's title, falling back to the raw text; blank
    /// values count as absent
    fn resolve(&self, raw: &str, context: &EvaluationContext<'_>) -> Option<String> {
        let value = if is_expression(raw) {
            match self.evaluator.evaluate(raw, context) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!("Using title '{}' as written: {}", raw, e);
                    raw.to_string()
                }
            }
        } else {
            raw.to_string()
        };
        let value = value.trim();
        (!value.is_empty()).then(|| value.to_string())
    }
}
