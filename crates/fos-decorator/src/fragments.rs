//! Fragments and Fragment Scopes
//!
//! A fragment is a detached copy of a named subtree, kept in its own small
//! tree so it can travel with the element that scopes it: scopes live in the
//! element property bag, which survives imports and document clones.

use std::collections::BTreeMap;
use std::sync::Arc;

use fos_dom::{DomTree, ElementData, NodeId, PropertyValue};

use crate::markers::Markers;

/// Property key under which an element carries its fragment scope
pub const SCOPE_PROPERTY: &str = "layout::fragment-scope";

/// Key prefix keeping fragment entries apart from other scope entries
const FRAGMENT_KEY_PREFIX: &str = "fragment-name::";

/// A named subtree copied out of the document it was declared in
#[derive(Debug, Clone)]
pub struct Fragment {
    tree: DomTree,
    root: NodeId,
}

impl Fragment {
    /// Copy the subtree at `id` out of `tree`
    pub fn capture(tree: &DomTree, id: NodeId) -> Self {
        let mut copy = DomTree::new();
        let root = copy.import_subtree(tree, id);
        let document = copy.root();
        copy.append_child(document, root);
        Self { tree: copy, root }
    }

    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// The fragment's own element
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn element(&self) -> Option<&ElementData> {
        self.tree.element(self.root)
    }

    /// Deep copy of the fragment element into another tree (detached)
    pub fn instantiate(&self, target: &mut DomTree) -> NodeId {
        target.import_subtree(&self.tree, self.root)
    }
}

/// Fragments found by one scan, keyed by namespaced name
#[derive(Debug, Clone, Default)]
pub struct FragmentMap {
    entries: BTreeMap<String, Fragment>,
}

impl FragmentMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(name: &str) -> String {
        format!("{FRAGMENT_KEY_PREFIX}{name}")
    }

    /// Register a fragment unless the name is already taken; returns whether
    /// it was registered
    pub fn insert(&mut self, name: &str, fragment: Fragment) -> bool {
        let key = Self::key(name);
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, fragment);
        true
    }

    pub fn get(&self, name: &str) -> Option<&Fragment> {
        self.entries.get(&Self::key(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&Self::key(name))
    }

    /// Fragment names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries
            .keys()
            .filter_map(|key| key.strip_prefix(FRAGMENT_KEY_PREFIX))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Finds named fragments below a set of nodes
pub struct FragmentScanner<'a> {
    markers: &'a Markers,
}

impl<'a> FragmentScanner<'a> {
    pub fn new(markers: &'a Markers) -> Self {
        Self { markers }
    }

    /// Pre-order scan of `nodes` and their descendants. The first element
    /// declaring a name wins; include and replace elements may declare a
    /// fragment themselves but their children are never scanned.
    pub fn scan(&self, tree: &DomTree, nodes: &[NodeId]) -> FragmentMap {
        let mut map = FragmentMap::new();
        for &node in nodes {
            self.scan_node(tree, node, &mut map);
        }
        map
    }

    fn scan_node(&self, tree: &DomTree, node: NodeId, map: &mut FragmentMap) {
        let Some(elem) = tree.element(node) else {
            return;
        };

        if let Some(name) = self.markers.fragment_name(elem) {
            if !map.insert(name, Fragment::capture(tree, node)) {
                tracing::warn!("Duplicate fragment '{}', keeping the first definition", name);
            }
        }

        if self.markers.is_inclusion(elem) {
            return;
        }
        for (child, _) in tree.children(node) {
            self.scan_node(tree, child, map);
        }
    }

    /// Locate the first element declaring `name`, using the same rules as
    /// `scan`
    pub fn find(&self, tree: &DomTree, nodes: &[NodeId], name: &str) -> Option<NodeId> {
        nodes.iter().find_map(|&node| self.find_node(tree, node, name))
    }

    fn find_node(&self, tree: &DomTree, node: NodeId, name: &str) -> Option<NodeId> {
        let elem = tree.element(node)?;
        if self.markers.fragment_name(elem) == Some(name) {
            return Some(node);
        }
        if self.markers.is_inclusion(elem) {
            return None;
        }
        tree.children(node)
            .find_map(|(child, _)| self.find_node(tree, child, name))
    }
}

/// Ordered fragment maps visible below one element, innermost first
#[derive(Debug, Clone, Default)]
pub struct FragmentScope {
    pub layers: Vec<Arc<FragmentMap>>,
}

impl FragmentScope {
    /// Scope carried by an element, if any
    pub fn of(tree: &DomTree, node: NodeId) -> Option<Arc<FragmentScope>> {
        tree.element(node)?
            .property(SCOPE_PROPERTY)?
            .downcast::<FragmentScope>()
    }

    /// Add a fragment map as the last layer of the element's scope. Empty
    /// maps are not attached.
    pub fn attach(tree: &mut DomTree, node: NodeId, map: FragmentMap) {
        Self::attach_shared(tree, node, &Arc::new(map));
    }

    /// Add a map shared with other elements as the last layer
    pub fn attach_shared(tree: &mut DomTree, node: NodeId, map: &Arc<FragmentMap>) {
        if map.is_empty() {
            return;
        }
        let mut scope = Self::of(tree, node)
            .map(|scope| (*scope).clone())
            .unwrap_or_default();
        scope.layers.push(Arc::clone(map));
        if let Some(elem) = tree.element_mut(node) {
            elem.set_property(SCOPE_PROPERTY, PropertyValue::shared(scope));
        }
    }

    /// Remove and return the scope of an element
    pub fn take(tree: &mut DomTree, node: NodeId) -> Option<Arc<FragmentScope>> {
        tree.element_mut(node)?
            .remove_property(SCOPE_PROPERTY)?
            .downcast::<FragmentScope>()
    }
}
