//! fOS HTML Parser
//!
//! Template parsing built on html5ever (and xml5ever for XML templates),
//! converted into the fOS DOM tree, plus serialization back to markup.

mod parser;
mod serializer;

pub use parser::HtmlParser;
pub use serializer::{HtmlSerializer, get_outer_html};
pub use fos_dom::{Document, DomTree, Node, NodeId};

use serde::{Deserialize, Serialize};

/// Parse a template source under the given mode
pub fn parse_with_mode(
    source: &str,
    url: &str,
    mode: TemplateMode,
) -> Result<Document, ParseError> {
    HtmlParser::with_mode(mode).parse_with_url(source, url)
}

/// How template sources are parsed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateMode {
    /// HTML5 document parsing
    #[default]
    Html,
    /// HTML5 parsing with relaxed structural checks for templates that the
    /// parser wraps in generated html/body elements
    LegacyHtml,
    /// XML parsing; no implied html/head/body structure
    Xml,
}

impl TemplateMode {
    /// Whether documents in this mode get HTML serialization rules
    pub fn is_html(self) -> bool {
        !matches!(self, Self::Xml)
    }
}

/// Parse error
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to read template source {url}: {source}")]
    Read {
        url: String,
        #[source]
        source: std::io::Error,
    },
}
