//! Dialect Configuration
//!
//! The marker attribute vocabulary is configuration, not fixed: every name
//! below can be changed, and the whole struct deserializes from JSON with
//! all fields optional.

use fos_html::TemplateMode;
use serde::{Deserialize, Serialize};

use crate::markers::Markers;

/// Layout dialect configuration options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DialectConfig {
    /// Prefix of the layout attributes (`layout:decorator`, `data-layout-decorator`)
    pub prefix: String,

    /// Prefix of the host engine's standard attributes (`th:text`, `th:with`)
    pub standard_prefix: String,

    /// Names the decorator template of a content page
    pub decorator: String,

    /// Declares a fragment in a content page, or a placeholder in a layout
    pub fragment: String,

    /// Includes another template's fragment, keeping the host element
    pub include: String,

    /// Replaces the host element with another template's fragment
    pub replace: String,

    /// Deprecated alias of `replace`; `null` turns the alias off
    pub substitute_by: Option<String>,

    /// Pattern composing the final title from decorator and content titles
    pub title_pattern: String,

    /// Standard escaped-text attribute
    pub text: String,

    /// Standard unescaped-text attribute
    pub utext: String,

    /// Standard local-variable attribute, concatenated rather than overwritten
    pub with: String,

    /// Token replaced by the decorator's title in a title pattern
    pub decorator_title_token: String,

    /// Token replaced by the content page's title in a title pattern
    pub content_title_token: String,

    /// How templates are parsed and how strictly structure is checked
    pub template_mode: TemplateMode,

    /// Write new marker attributes in `data-prefix-name` form
    pub prefer_data_attributes: bool,
}

impl Default for DialectConfig {
    fn default() -> Self {
        Self {
            prefix: "layout".to_string(),
            standard_prefix: "th".to_string(),
            decorator: "decorator".to_string(),
            fragment: "fragment".to_string(),
            include: "include".to_string(),
            replace: "replace".to_string(),
            substitute_by: Some("substituteby".to_string()),
            title_pattern: "title-pattern".to_string(),
            text: "text".to_string(),
            utext: "utext".to_string(),
            with: "with".to_string(),
            decorator_title_token: "$DECORATOR_TITLE".to_string(),
            content_title_token: "$CONTENT_TITLE".to_string(),
            template_mode: TemplateMode::Html,
            prefer_data_attributes: false,
        }
    }
}

impl DialectConfig {
    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Build the attribute matchers for this vocabulary
    pub fn markers(&self) -> Markers {
        Markers::new(self)
    }

    /// Whether a misplaced decorator attribute is only a warning
    pub fn relaxed_root_check(&self) -> bool {
        self.template_mode == TemplateMode::LegacyHtml
    }
}
