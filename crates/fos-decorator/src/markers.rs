//! Marker Attributes
//!
//! Every attribute the decorator recognizes exists in two spellings,
//! `prefix:name` and `data-prefix-name`, so templates stay usable under
//! parse modes that reject colons in attribute names. Reads accept either
//! spelling; writes and removals touch both so they never disagree.

use fos_dom::ElementData;

use crate::DialectConfig;

/// One attribute name in both of its spellings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrName {
    prefixed: String,
    data: String,
    prefer_data: bool,
}

impl AttrName {
    pub fn new(prefix: &str, name: &str) -> Self {
        Self {
            prefixed: format!("{prefix}:{name}"),
            data: format!("data-{prefix}-{name}"),
            prefer_data: false,
        }
    }

    /// Write new attributes in `data-` form
    pub fn preferring_data(mut self, prefer_data: bool) -> Self {
        self.prefer_data = prefer_data;
        self
    }

    /// The `prefix:name` spelling
    pub fn prefixed(&self) -> &str {
        &self.prefixed
    }

    /// The `data-prefix-name` spelling
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Check a raw attribute name against both spellings
    pub fn matches(&self, attr_name: &str) -> bool {
        attr_name == self.prefixed || attr_name == self.data
    }

    /// Value in either spelling, prefixed form first
    pub fn get<'a>(&self, elem: &'a ElementData) -> Option<&'a str> {
        elem.get_attr(&self.prefixed)
            .or_else(|| elem.get_attr(&self.data))
    }

    pub fn is_present(&self, elem: &ElementData) -> bool {
        elem.has_attr(&self.prefixed) || elem.has_attr(&self.data)
    }

    /// Set the value on every spelling already present, or add the
    /// preferred spelling if there is none
    pub fn set(&self, elem: &mut ElementData, value: &str) {
        let has_prefixed = elem.has_attr(&self.prefixed);
        let has_data = elem.has_attr(&self.data);
        if has_prefixed {
            elem.set_attr(&self.prefixed, value);
        }
        if has_data {
            elem.set_attr(&self.data, value);
        }
        if !has_prefixed && !has_data {
            let name = if self.prefer_data { &self.data } else { &self.prefixed };
            elem.set_attr(name, value);
        }
    }

    /// Remove both spellings, returning the value that was read
    pub fn remove(&self, elem: &mut ElementData) -> Option<String> {
        let prefixed = elem.remove_attr(&self.prefixed);
        let data = elem.remove_attr(&self.data);
        prefixed.or(data)
    }
}

/// The full marker vocabulary, built once from a `DialectConfig`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    pub decorator: AttrName,
    pub fragment: AttrName,
    pub include: AttrName,
    pub replace: AttrName,
    pub substitute_by: Option<AttrName>,
    pub title_pattern: AttrName,
    pub text: AttrName,
    pub utext: AttrName,
    pub with: AttrName,
}

impl Markers {
    pub fn new(config: &DialectConfig) -> Self {
        let layout = |name: &str| {
            AttrName::new(&config.prefix, name).preferring_data(config.prefer_data_attributes)
        };
        let standard = |name: &str| {
            AttrName::new(&config.standard_prefix, name)
                .preferring_data(config.prefer_data_attributes)
        };
        Self {
            decorator: layout(&config.decorator),
            fragment: layout(&config.fragment),
            include: layout(&config.include),
            replace: layout(&config.replace),
            substitute_by: config.substitute_by.as_deref().map(layout),
            title_pattern: layout(&config.title_pattern),
            text: standard(&config.text),
            utext: standard(&config.utext),
            with: standard(&config.with),
        }
    }

    /// Non-empty fragment name declared on an element
    pub fn fragment_name<'a>(&self, elem: &'a ElementData) -> Option<&'a str> {
        self.fragment
            .get(elem)
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Whether an element pulls in another template's content, which makes
    /// its subtree a separate fragment scope
    pub fn is_inclusion(&self, elem: &ElementData) -> bool {
        self.include.is_present(elem) || self.replacing(elem).is_some()
    }

    /// The replace marker present on an element, falling back to the
    /// deprecated alias
    pub fn replacing(&self, elem: &ElementData) -> Option<&AttrName> {
        if self.replace.is_present(elem) {
            return Some(&self.replace);
        }
        self.substitute_by
            .as_ref()
            .filter(|alias| alias.is_present(elem))
    }
}

impl Default for Markers {
    fn default() -> Self {
        Self::new(&DialectConfig::default())
    }
}
