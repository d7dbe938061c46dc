//! HTML Serialization (document/outerHTML)
//!
//! Serializes DOM nodes back to markup.
//!
//! Key features:
//! - Whole-document and outerHTML serialization
//! - Proper HTML escaping
//! - Void element handling (HTML) and self-closing empty elements (XML)
//! - Optional pretty printing

use fos_dom::{Document, DomTree, NodeData, NodeId};

use crate::TemplateMode;

/// HTML serializer
#[derive(Debug, Clone)]
pub struct HtmlSerializer {
    /// Whether to format output with indentation
    pub pretty_print: bool,
    /// Indentation string
    pub indent: String,
    /// Markup flavour to emit
    pub mode: TemplateMode,
}

/// Void elements (self-closing, no end tag)
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "param", "source", "track", "wbr",
];

/// Raw text elements (no escaping for content)
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Elements whose whitespace is significant even when pretty printing
const PREFORMATTED_ELEMENTS: &[&str] = &["pre", "textarea", "listing"];

impl Default for HtmlSerializer {
    fn default() -> Self {
        Self {
            pretty_print: false,
            indent: "  ".to_string(),
            mode: TemplateMode::Html,
        }
    }
}

impl HtmlSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self {
            pretty_print: true,
            ..Self::default()
        }
    }

    /// Emit markup for the given template mode
    pub fn with_mode(mut self, mode: TemplateMode) -> Self {
        self.mode = mode;
        self
    }

    /// Serialize a whole document: DOCTYPE, root element and the nodes
    /// around it
    pub fn serialize_document(&self, document: &Document) -> String {
        let tree = document.tree();
        let mut output = String::new();
        for (index, (child_id, _)) in tree.children(tree.root()).enumerate() {
            if self.pretty_print && index > 0 {
                output.push('\n');
            }
            self.serialize_node(tree, child_id, &mut output, 0);
        }
        output
    }

    /// Serialize outerHTML of a node (including the node itself)
    pub fn serialize_outer(&self, tree: &DomTree, node_id: NodeId) -> String {
        let mut output = String::new();
        self.serialize_node(tree, node_id, &mut output, 0);
        output
    }

    fn newline(&self, output: &mut String, depth: usize) {
        output.push('\n');
        for _ in 0..depth {
            output.push_str(&self.indent);
        }
    }

    /// Serialize a node and its descendants
    fn serialize_node(&self, tree: &DomTree, node_id: NodeId, output: &mut String, depth: usize) {
        let Some(node) = tree.get(node_id) else {
            return;
        };

        match &node.data {
            NodeData::Document => {
                self.serialize_children(tree, node_id, output, depth);
            }
            NodeData::Element(elem) => {
                let tag = elem.name.as_str();
                let html = self.mode.is_html();
                let is_void = html && VOID_ELEMENTS.contains(&tag);
                let is_raw = html && RAW_TEXT_ELEMENTS.contains(&tag);
                let is_preformatted = html && PREFORMATTED_ELEMENTS.contains(&tag);
                let is_empty = !node.first_child.is_valid();

                // Indentation
                if self.pretty_print && depth > 0 {
                    self.newline(output, depth);
                }

                // Start tag
                output.push('<');
                output.push_str(tag);

                // Attributes
                for attr in elem.attrs.iter() {
                    output.push(' ');
                    output.push_str(&attr.name);
                    if !attr.value.is_empty() || !html {
                        output.push_str("=\"");
                        escape_attribute(&attr.value, output);
                        output.push('"');
                    }
                }

                if is_void {
                    output.push_str(" />");
                } else if !html && is_empty {
                    output.push_str("/>");
                } else {
                    output.push('>');

                    // Children
                    if is_raw {
                        // Raw content, no escaping
                        self.serialize_children_raw(tree, node_id, output);
                    } else if is_preformatted && self.pretty_print {
                        let compact = Self {
                            pretty_print: false,
                            ..self.clone()
                        };
                        compact.serialize_children(tree, node_id, output, 0);
                    } else {
                        self.serialize_children(tree, node_id, output, depth + 1);
                    }

                    // End tag
                    if self.pretty_print
                        && !is_raw
                        && !is_preformatted
                        && has_element_child(tree, node_id)
                    {
                        self.newline(output, depth);
                    }
                    output.push_str("</");
                    output.push_str(tag);
                    output.push('>');
                }
            }
            NodeData::Text(text) => {
                // Indentation replaces source whitespace between elements
                if self.pretty_print && text.content.trim().is_empty() {
                    return;
                }
                escape_text(&text.content, output);
            }
            NodeData::Comment(text) => {
                if self.pretty_print && depth > 0 {
                    self.newline(output, depth);
                }
                output.push_str("<!--");
                output.push_str(text);
                output.push_str("-->");
            }
            NodeData::Doctype {
                name,
                public_id,
                system_id,
            } => {
                output.push_str("<!DOCTYPE ");
                output.push_str(name);
                if !public_id.is_empty() {
                    output.push_str(" PUBLIC \"");
                    output.push_str(public_id);
                    output.push('"');
                    if !system_id.is_empty() {
                        output.push_str(" \"");
                        output.push_str(system_id);
                        output.push('"');
                    }
                } else if !system_id.is_empty() {
                    output.push_str(" SYSTEM \"");
                    output.push_str(system_id);
                    output.push('"');
                }
                output.push('>');
            }
            NodeData::ProcessingInstruction { target, data } => {
                output.push_str("<?");
                output.push_str(target);
                if !data.is_empty() {
                    output.push(' ');
                    output.push_str(data);
                }
                output.push_str("?>");
            }
        }
    }

    fn serialize_children(
        &self,
        tree: &DomTree,
        parent_id: NodeId,
        output: &mut String,
        depth: usize,
    ) {
        for (child_id, _) in tree.children(parent_id) {
            self.serialize_node(tree, child_id, output, depth);
        }
    }

    fn serialize_children_raw(&self, tree: &DomTree, parent_id: NodeId, output: &mut String) {
        for (_child_id, child) in tree.children(parent_id) {
            if let NodeData::Text(text) = &child.data {
                output.push_str(&text.content);
            }
        }
    }
}

fn has_element_child(tree: &DomTree, node_id: NodeId) -> bool {
    tree.children(node_id).any(|(_, n)| n.is_element() || n.is_comment())
}

/// Escape text content for HTML
fn escape_text(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            _ => output.push(c),
        }
    }
}

/// Escape attribute value
fn escape_attribute(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '"' => output.push_str("&quot;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            _ => output.push(c),
        }
    }
}

/// Utility: Get outerHTML of an element
pub fn get_outer_html(tree: &DomTree, node_id: NodeId) -> String {
    HtmlSerializer::new().serialize_outer(tree, node_id)
}
