//! fOS Decorator - Layout composition
//!
//! Composes pages from layouts: a content page names a decorator template,
//! the decorator's markup becomes the page, and the page's named fragments
//! fill the decorator's placeholders. Fragments of other templates can be
//! pulled in with include and replace, and `<title>`s are merged through an
//! optional title pattern.
//!
//! Composition runs in two passes over a private copy of each template:
//! static decoration ([`DocumentDecorator`]) and materialization
//! ([`Materializer`]). [`Composer`] runs both.

mod composer;
mod config;
mod decorators;
mod error;
mod expression;
mod fragments;
mod include;
mod markers;
mod materialize;
mod reference;
mod repository;
mod title;

pub use composer::Composer;
pub use config::DialectConfig;
pub use decorators::{
    DocumentDecorator, ElementDecorator, HtmlBodyDecorator, HtmlHeadDecorator, XmlElementDecorator,
    pull_attributes,
};
pub use error::{DecoratorError, Result};
pub use expression::{
    EvaluationContext, EvaluationError, ExpressionEvaluator, NoEvaluator, VariableEvaluator,
    is_expression,
};
pub use fragments::{Fragment, FragmentMap, FragmentScanner, FragmentScope, SCOPE_PROPERTY};
pub use include::{Inclusion, InclusionKind, IncludeResolver};
pub use markers::{AttrName, Markers};
pub use materialize::Materializer;
pub use reference::{FragmentReference, ReferenceError};
pub use repository::{FileRepository, MemoryRepository, RepositoryError, TemplateRepository};
pub use title::{CONTENT_TITLE, DECORATOR_TITLE, TitlePatternExpander, compose_title};

pub use fos_dom::Document;
pub use fos_html::TemplateMode;
