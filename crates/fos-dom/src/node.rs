//! DOM Node - Arena node representation
//!
//! Nodes never own their neighbours: every link is a `NodeId` into the
//! owning `DomTree`, so moving a subtree is a matter of relinking ids.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::NodeId;

/// DOM Node - Core structure
#[derive(Debug, Clone)]
pub struct Node {
    /// Parent node (NONE if root or detached)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    /// Create an unlinked node around the given data
    pub fn new(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Create a new element node
    pub fn element(name: &str) -> Self {
        Self::new(NodeData::Element(ElementData::new(name)))
    }

    /// Create a new text node
    pub fn text(content: String) -> Self {
        Self::new(NodeData::Text(TextData { content }))
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::new(NodeData::Document)
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Check if this is a comment
    #[inline]
    pub fn is_comment(&self) -> bool {
        matches!(self.data, NodeData::Comment(_))
    }

    /// Check if this is a DOCTYPE
    #[inline]
    pub fn is_doctype(&self) -> bool {
        matches!(self.data, NodeData::Doctype { .. })
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(&t.content),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root
    Document,
    /// DOCTYPE
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },
    /// Element
    Element(ElementData),
    /// Text content
    Text(TextData),
    /// Comment
    Comment(String),
    /// Processing instruction
    ProcessingInstruction {
        target: String,
        data: String,
    },
}

/// Element-specific data
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Tag name as written in the source (`prefix:local` for prefixed XML names)
    pub name: String,
    /// Attributes in source order
    pub attrs: Vec<Attribute>,
    /// Auxiliary values carried along with the element but never serialized
    pub properties: HashMap<String, PropertyValue>,
}

impl ElementData {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attrs: Vec::new(),
            properties: HashMap::new(),
        }
    }

    /// Check the tag name, ignoring ASCII case
    pub fn is(&self, tag: &str) -> bool {
        self.name.eq_ignore_ascii_case(tag)
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Check if an attribute exists
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|a| a.name == name)
    }

    /// Set an attribute, keeping its position if it already exists
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        for attr in self.attrs.iter_mut() {
            if attr.name == name {
                attr.value = value;
                return;
            }
        }
        self.attrs.push(Attribute {
            name: name.to_string(),
            value,
        });
    }

    /// Remove an attribute, returning its old value
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let index = self.attrs.iter().position(|a| a.name == name)?;
        Some(self.attrs.remove(index).value)
    }

    /// Get a property from the auxiliary bag
    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Get a text property from the auxiliary bag
    pub fn text_property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(PropertyValue::as_text)
    }

    /// Store a property in the auxiliary bag
    pub fn set_property(&mut self, key: &str, value: PropertyValue) {
        self.properties.insert(key.to_string(), value);
    }

    /// Remove a property from the auxiliary bag
    pub fn remove_property(&mut self, key: &str) -> Option<PropertyValue> {
        self.properties.remove(key)
    }
}

/// Text node data
#[derive(Debug, Clone)]
pub struct TextData {
    pub content: String,
}

/// Attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Value stored in an element's property bag
///
/// Shared values are cloned by reference, so copying an element (or a whole
/// document) keeps pointing at the same immutable payload.
#[derive(Clone)]
pub enum PropertyValue {
    Text(String),
    Shared(Arc<dyn Any + Send + Sync>),
}

impl PropertyValue {
    /// Wrap an arbitrary value
    pub fn shared<T: Any + Send + Sync>(value: T) -> Self {
        Self::Shared(Arc::new(value))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Shared(_) => None,
        }
    }

    /// Recover a shared value of a known type
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        match self {
            Self::Shared(value) => Arc::clone(value).downcast::<T>().ok(),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Debug for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Shared(_) => f.write_str("Shared(..)"),
        }
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_attribute() {
        let mut elem = ElementData::new("div");
        elem.set_attr("class", "btn");
        elem.set_attr("id", "submit");

        assert_eq!(elem.attrs.len(), 2);
        assert_eq!(elem.get_attr("class"), Some("btn"));
        assert_eq!(elem.get_attr("id"), Some("submit"));
    }

    #[test]
    fn test_set_keeps_attribute_order() {
        let mut elem = ElementData::new("div");
        elem.set_attr("a", "1");
        elem.set_attr("b", "2");
        elem.set_attr("a", "3");

        let names: Vec<_> = elem.attrs.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(elem.get_attr("a"), Some("3"));
    }

    #[test]
    fn test_remove_attribute() {
        let mut elem = ElementData::new("div");
        elem.set_attr("foo", "bar");

        assert!(elem.has_attr("foo"));
        assert_eq!(elem.remove_attr("foo"), Some("bar".to_string()));
        assert!(!elem.has_attr("foo"));
        assert_eq!(elem.remove_attr("foo"), None);
    }

    #[test]
    fn test_properties() {
        let mut elem = ElementData::new("title");
        elem.set_property("content-title", "Page".into());
        elem.set_property("payload", PropertyValue::shared(vec![1u8, 2, 3]));

        assert_eq!(elem.text_property("content-title"), Some("Page"));
        assert_eq!(elem.text_property("payload"), None);

        let payload = elem.property("payload").and_then(|p| p.downcast::<Vec<u8>>());
        assert_eq!(payload.as_deref(), Some(&vec![1u8, 2, 3]));
        assert!(elem.property("payload").and_then(|p| p.downcast::<String>()).is_none());
    }

    #[test]
    fn test_tag_comparison_ignores_case() {
        let elem = ElementData::new("HEAD");
        assert!(elem.is("head"));
        assert!(!elem.is("body"));
    }
}
