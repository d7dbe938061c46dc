//! Template parser implementation
//!
//! Uses html5ever's (or xml5ever's) RcDom and converts to our DOM format.
//! This is simpler and more reliable than implementing TreeSink directly.

use fos_dom::{Document, DomTree, ElementData, NodeData, NodeId};
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::{ParseError, TemplateMode};

/// Template parser
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParser {
    mode: TemplateMode,
}

impl HtmlParser {
    /// Create a parser for the given template mode
    pub fn with_mode(mode: TemplateMode) -> Self {
        Self { mode }
    }

    /// Parse a string, recording the identifier it was loaded under
    pub fn parse_with_url(&self, source: &str, url: &str) -> Result<Document, ParseError> {
        tracing::debug!("Parsing {:?} document: {}", self.mode, url);

        let dom = match self.mode {
            TemplateMode::Html | TemplateMode::LegacyHtml => {
                html5ever::parse_document(RcDom::default(), Default::default())
                    .from_utf8()
                    .read_from(&mut source.as_bytes())
            }
            TemplateMode::Xml => {
                xml5ever::driver::parse_document(RcDom::default(), Default::default())
                    .from_utf8()
                    .read_from(&mut source.as_bytes())
            }
        }
        .map_err(|source| ParseError::Read {
            url: url.to_string(),
            source,
        })?;

        // Convert RcDom to our DOM
        let mut document = Document::empty(url);
        let root = document.tree().root();
        self.convert_node(&dom.document, document.tree_mut(), root);

        tracing::debug!("Parsed {} nodes", document.tree().len());
        Ok(document)
    }

    /// Convert an RcDom node to our DOM format
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree, parent: NodeId) {
        match &handle.data {
            RcNodeData::Document => {
                // Document node - just process children
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, parent);
                }
            }
            RcNodeData::Doctype {
                name,
                public_id,
                system_id,
            } => {
                let id = tree.create_doctype(name, public_id, system_id);
                tree.append_child(parent, id);
            }
            RcNodeData::Text { contents } => {
                let id = tree.create_text(&contents.borrow());
                tree.append_child(parent, id);
            }
            RcNodeData::Comment { contents } => {
                let id = tree.create_comment(contents);
                tree.append_child(parent, id);
            }
            RcNodeData::Element {
                name,
                attrs,
                template_contents,
                ..
            } => {
                let mut elem = ElementData::new(&qualified(name.prefix.as_deref(), &name.local));
                for attr in attrs.borrow().iter() {
                    let attr_name = qualified(attr.name.prefix.as_deref(), &attr.name.local);
                    elem.set_attr(&attr_name, attr.value.to_string());
                }

                let id = tree.create_node(NodeData::Element(elem));
                tree.append_child(parent, id);

                // <template> keeps its parsed children in a separate fragment
                if let Some(contents) = template_contents.borrow().as_ref() {
                    for child in contents.children.borrow().iter() {
                        self.convert_node(child, tree, id);
                    }
                }
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, id);
                }
            }
            RcNodeData::ProcessingInstruction { target, contents } => {
                let id = tree.create_node(NodeData::ProcessingInstruction {
                    target: target.to_string(),
                    data: contents.to_string(),
                });
                tree.append_child(parent, id);
            }
        }
    }
}

/// Join an optional namespace prefix and a local name as written in source
fn qualified(prefix: Option<&str>, local: &str) -> String {
    match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}:{local}"),
        _ => local.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
        let doc = HtmlParser::default().parse_with_url(html, "page").unwrap();

        assert_eq!(doc.title(), "Test");
        assert!(doc.body().is_some());
    }

    #[test]
    fn test_parse_fragment() {
        let html = "<div><span>Text</span></div>";
        let doc = HtmlParser::default().parse_with_url(html, "page").unwrap();

        // Even fragments get wrapped in html/head/body by html5ever
        assert!(doc.head().is_some());
        assert!(doc.find_element("span").is_some());
    }

    #[test]
    fn test_prefixed_attribute_names_survive() {
        let html = r#"<html layout:decorator="main" data-layout-fragment="x"></html>"#;
        let doc = HtmlParser::default().parse_with_url(html, "page").unwrap();
        let root = doc.document_element().unwrap();
        let elem = doc.tree().element(root).unwrap();

        assert_eq!(elem.get_attr("layout:decorator"), Some("main"));
        assert_eq!(elem.get_attr("data-layout-fragment"), Some("x"));
    }

    #[test]
    fn test_whitespace_text_kept() {
        let html = "<html><head>\n  <title>T</title>\n</head></html>";
        let doc = HtmlParser::default().parse_with_url(html, "page").unwrap();
        let tree = doc.tree();
        let head = doc.head().unwrap();

        let children = tree.child_ids(head);
        assert_eq!(children.len(), 3);
        assert_eq!(tree.text_content(children[0]), "\n  ");
        assert!(tree.is_element_named(children[1], "title"));
        assert_eq!(tree.text_content(children[2]), "\n");
    }

    #[test]
    fn test_parse_xml_keeps_root() {
        let xml = r#"<feed xmlns:layout="http://www.ultraq.net.nz/thymeleaf/layout" layout:decorator="base"><entry/></feed>"#;
        let doc = HtmlParser::with_mode(TemplateMode::Xml).parse_with_url(xml, "feed").unwrap();
        let root = doc.document_element().unwrap();
        let elem = doc.tree().element(root).unwrap();

        assert_eq!(elem.name, "feed");
        assert_eq!(elem.get_attr("layout:decorator"), Some("base"));
        assert!(doc.head().is_none());
    }
}
