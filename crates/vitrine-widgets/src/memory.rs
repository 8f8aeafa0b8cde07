//! In-memory element tree implementing [`Document`].
//!
//! Lets the widgets run outside a browser, in tests and in server-side checks of
//! page markup.

use std::{
    cell::RefCell,
    collections::{BTreeMap, BTreeSet},
};

use crate::document::Document;

/// Handle to an element of a [`MemoryDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    classes: BTreeSet<String>,
    attributes: BTreeMap<String, String>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    shown: bool,
}

impl Node {
    fn new(tag: &str, parent: Option<NodeId>) -> Self {
        Self {
            tag: tag.to_string(),
            classes: BTreeSet::new(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
            parent,
            shown: true,
        }
    }
}

/// A mutable element tree rooted at a `body` element.
#[derive(Debug)]
pub struct MemoryDocument {
    nodes: RefCell<Vec<Node>>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// Create a document containing only the root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: RefCell::new(vec![Node::new("body", None)]),
        }
    }

    /// The root element.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append a new element as the last child of `parent`.
    pub fn append(&self, parent: NodeId, tag: &str) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId(nodes.len());
        nodes.push(Node::new(tag, Some(parent)));
        nodes[parent.0].children.push(id);
        id
    }

    /// Append an element carrying `classes`.
    pub fn append_with_classes(&self, parent: NodeId, tag: &str, classes: &[&str]) -> NodeId {
        let id = self.append(parent, tag);
        for class in classes {
            self.set_class(&id, class, true);
        }
        id
    }

    /// Set an attribute. `id` is an attribute like any other.
    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        self.nodes.borrow_mut()[node.0]
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    /// Tag name of an element.
    #[must_use]
    pub fn tag(&self, node: NodeId) -> String {
        self.nodes.borrow()[node.0].tag.clone()
    }

    /// Parent of an element, `None` for the root.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.borrow()[node.0].parent
    }

    /// Number of elements, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.borrow().len()
    }

    /// Whether only the root exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 1
    }

    /// All elements in document order.
    fn preorder(&self) -> Vec<NodeId> {
        let nodes = self.nodes.borrow();
        let mut order = Vec::with_capacity(nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(nodes[id.0].children.iter().rev().copied());
        }
        order
    }
}

impl Document for MemoryDocument {
    type Element = NodeId;

    fn elements_by_class(&self, class: &str) -> Vec<NodeId> {
        let order = self.preorder();
        let nodes = self.nodes.borrow();
        order
            .into_iter()
            .filter(|id| nodes[id.0].classes.contains(class))
            .collect()
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let order = self.preorder();
        let nodes = self.nodes.borrow();
        order
            .into_iter()
            .find(|node| nodes[node.0].attributes.get("id").is_some_and(|v| v == id))
    }

    fn next_element_sibling(&self, element: &NodeId) -> Option<NodeId> {
        let nodes = self.nodes.borrow();
        let parent = nodes[element.0].parent?;
        let siblings = &nodes[parent.0].children;
        let position = siblings.iter().position(|s| s == element)?;
        siblings.get(position + 1).copied()
    }

    fn attribute(&self, element: &NodeId, name: &str) -> Option<String> {
        self.nodes.borrow()[element.0].attributes.get(name).cloned()
    }

    fn has_class(&self, element: &NodeId, class: &str) -> bool {
        self.nodes.borrow()[element.0].classes.contains(class)
    }

    fn set_class(&self, element: &NodeId, class: &str, present: bool) {
        let mut nodes = self.nodes.borrow_mut();
        let classes = &mut nodes[element.0].classes;
        if present {
            classes.insert(class.to_string());
        } else {
            classes.remove(class);
        }
    }

    fn is_shown(&self, element: &NodeId) -> bool {
        self.nodes.borrow()[element.0].shown
    }

    fn set_shown(&self, element: &NodeId, shown: bool) {
        self.nodes.borrow_mut()[element.0].shown = shown;
    }
}
