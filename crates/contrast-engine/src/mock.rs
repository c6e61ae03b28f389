//! In-memory [`Document`] for tests and offline tooling.
//!
//! [`MockDocument`] models just enough of the DOM for the engine: a tree of
//! elements with classes, computed colors, custom properties, inline styles
//! and attributes. Like a browser it
//!
//! - inherits custom properties and `color` from ancestors,
//! - reports empty computed values for detached elements,
//! - queues mutation records for class/style/attribute changes and node
//!   insertion, which a test drains with [`MockDocument::take_mutations`].
//!
//! Every style and attribute write is also appended to a write log so tests
//! can assert on exactly what the engine touched.
//!
//! Pages can be described in YAML:
//!
//! ```rust
//! use contrast_engine::{Document, MockDocument};
//!
//! let doc = MockDocument::from_yaml(r##"
//! elements:
//!   - classes: [c-block--banner]
//!     children:
//!       - classes: [js-contrast, kg-signup-card-button]
//!         properties: { "--color-accent": "#336699" }
//!         color: "#336699"
//! "##).unwrap();
//!
//! assert_eq!(doc.query_class("js-contrast").len(), 1);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dom::{Document, ElementId};
use crate::error::Result;
use crate::watcher::{Mutation, NodeRef};

/// Declarative description of an element subtree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockElement {
    pub classes: Vec<String>,
    /// Computed custom properties (`--name` to value).
    pub properties: BTreeMap<String, String>,
    /// Computed `background-color`.
    pub background: String,
    /// Computed `color`; inherited from the parent when empty.
    pub color: String,
    /// Inline `style.backgroundColor`.
    pub inline_background: String,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<MockElement>,
}

impl MockElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn background(mut self, value: impl Into<String>) -> Self {
        self.background = value.into();
        self
    }

    pub fn color(mut self, value: impl Into<String>) -> Self {
        self.color = value.into();
        self
    }

    pub fn inline_background(mut self, value: impl Into<String>) -> Self {
        self.inline_background = value.into();
        self
    }

    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn child(mut self, child: MockElement) -> Self {
        self.children.push(child);
        self
    }
}

/// A page fixture: the body's children.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageFixture {
    pub elements: Vec<MockElement>,
}

/// Where a logged write landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteTarget {
    Style,
    Attribute,
}

/// One logged write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteRecord {
    pub element: ElementId,
    pub target: WriteTarget,
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default)]
struct Node {
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    classes: Vec<String>,
    properties: BTreeMap<String, String>,
    background: String,
    color: String,
    inline_background: String,
    style: BTreeMap<String, String>,
    attributes: BTreeMap<String, String>,
    connected: bool,
}

/// In-memory document. Element `#0` is the body.
#[derive(Debug, Clone)]
pub struct MockDocument {
    nodes: Vec<Node>,
    mutations: Vec<Mutation>,
    writes: Vec<WriteRecord>,
}

impl Default for MockDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDocument {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                connected: true,
                ..Node::default()
            }],
            mutations: Vec::new(),
            writes: Vec::new(),
        }
    }

    /// Builds a document from a YAML [`PageFixture`].
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let fixture: PageFixture = serde_yaml::from_str(yaml)?;
        Ok(Self::from_fixture(fixture))
    }

    pub fn from_fixture(fixture: PageFixture) -> Self {
        let mut doc = Self::new();
        for element in fixture.elements {
            doc.append(None, element);
        }
        doc
    }

    pub fn body(&self) -> ElementId {
        ElementId(0)
    }

    /// Adds a subtree as part of the initial page, without mutation records.
    pub fn append(&mut self, parent: Option<ElementId>, element: MockElement) -> ElementId {
        let parent = parent.unwrap_or_else(|| self.body());
        let connected = self.node(parent).is_some_and(|n| n.connected);
        self.build(parent, element, connected)
    }

    /// Inserts a subtree the way a script would, queuing a child-list record.
    pub fn insert(&mut self, parent: Option<ElementId>, element: MockElement) -> ElementId {
        let parent = parent.unwrap_or_else(|| self.body());
        let id = self.append(Some(parent), element);
        self.mutations
            .push(Mutation::added(parent, vec![NodeRef::Element(id)]));
        id
    }

    /// Detaches an element and its subtree.
    pub fn remove(&mut self, element: ElementId) {
        let Some(parent) = self.node(element).and_then(|n| n.parent) else {
            return;
        };
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|c| *c != element);
        }
        self.set_connected(element, false);
        self.mutations.push(Mutation::ChildList {
            target: parent,
            added: Vec::new(),
            removed: vec![NodeRef::Element(element)],
        });
    }

    pub fn remove_class(&mut self, element: ElementId, class: &str) {
        let Some(node) = self.node_mut(element) else {
            return;
        };
        let before = node.classes.len();
        node.classes.retain(|c| c != class);
        if node.classes.len() != before {
            self.mutations.push(Mutation::attribute(element, "class"));
        }
    }

    /// Changes a computed custom property, as an inline style or class swap would.
    pub fn set_property(&mut self, element: ElementId, name: &str, value: &str) {
        if let Some(node) = self.node_mut(element) {
            node.properties.insert(name.to_string(), value.to_string());
            self.mutations.push(Mutation::attribute(element, "style"));
        }
    }

    /// Changes the computed background, as a style change would.
    pub fn set_background(&mut self, element: ElementId, value: &str) {
        if let Some(node) = self.node_mut(element) {
            node.background = value.to_string();
            self.mutations.push(Mutation::attribute(element, "style"));
        }
    }

    /// Value the engine (or anyone) set through `style.setProperty`.
    pub fn style(&self, element: ElementId, name: &str) -> Option<&str> {
        self.node(element)?.style.get(name).map(String::as_str)
    }

    pub fn classes(&self, element: ElementId) -> &[String] {
        self.node(element).map(|n| n.classes.as_slice()).unwrap_or(&[])
    }

    /// Drains queued mutation records.
    pub fn take_mutations(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.mutations)
    }

    pub fn writes(&self) -> &[WriteRecord] {
        &self.writes
    }

    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }

    /// Connected elements in document order, body first.
    pub fn elements(&self) -> Vec<ElementId> {
        let mut out = Vec::new();
        self.walk(self.body(), &mut out);
        out
    }

    fn walk(&self, id: ElementId, out: &mut Vec<ElementId>) {
        out.push(id);
        if let Some(node) = self.node(id) {
            for child in &node.children {
                self.walk(*child, out);
            }
        }
    }

    fn build(&mut self, parent: ElementId, element: MockElement, connected: bool) -> ElementId {
        let id = ElementId(self.nodes.len() as u64);
        self.nodes.push(Node {
            parent: Some(parent),
            children: Vec::new(),
            classes: element.classes,
            properties: element.properties,
            background: element.background,
            color: element.color,
            inline_background: element.inline_background,
            style: BTreeMap::new(),
            attributes: element.attributes,
            connected,
        });
        if let Some(p) = self.node_mut(parent) {
            p.children.push(id);
        }
        for child in element.children {
            self.build(id, child, connected);
        }
        id
    }

    fn set_connected(&mut self, id: ElementId, connected: bool) {
        let children = match self.node_mut(id) {
            Some(node) => {
                node.connected = connected;
                node.children.clone()
            }
            None => return,
        };
        for child in children {
            self.set_connected(child, connected);
        }
    }

    fn node(&self, id: ElementId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    fn node_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize)
    }

    fn connected_node(&self, id: ElementId) -> Option<&Node> {
        self.node(id).filter(|n| n.connected)
    }

    /// Walks from `id` up to the body, returning the first non-empty value.
    fn inherited(&self, id: ElementId, pick: impl Fn(&Node) -> Option<&String>) -> String {
        let mut current = self.connected_node(id);
        while let Some(node) = current {
            if let Some(value) = pick(node).filter(|v| !v.is_empty()) {
                return value.clone();
            }
            current = node.parent.and_then(|p| self.node(p));
        }
        String::new()
    }

    fn matches_compound(&self, id: ElementId, compound: &[String]) -> bool {
        self.node(id)
            .is_some_and(|n| compound.iter().all(|c| n.classes.contains(c)))
    }

    fn matches_selector(&self, id: ElementId, compounds: &[Vec<String>]) -> bool {
        let Some((last, ancestors)) = compounds.split_last() else {
            return false;
        };
        if !self.matches_compound(id, last) {
            return false;
        }
        let mut current = self.node(id).and_then(|n| n.parent);
        for compound in ancestors.iter().rev() {
            loop {
                let Some(candidate) = current else {
                    return false;
                };
                current = self.node(candidate).and_then(|n| n.parent);
                if self.matches_compound(candidate, compound) {
                    break;
                }
            }
        }
        true
    }
}

/// Parses a class-only selector list: `.a.b .c, *`.
///
/// Returns `None` for anything outside that grammar (type selectors,
/// attribute selectors, combinators other than descendant).
fn parse_selector_list(selector: &str) -> Option<Vec<Vec<Vec<String>>>> {
    selector
        .split(',')
        .map(|complex| {
            let compounds: Option<Vec<Vec<String>>> = complex
                .split_whitespace()
                .map(|compound| {
                    if compound == "*" {
                        return Some(Vec::new());
                    }
                    let rest = compound.strip_prefix('.')?;
                    let classes: Vec<String> = rest.split('.').map(str::to_string).collect();
                    if classes.iter().any(|c| c.is_empty()) {
                        None
                    } else {
                        Some(classes)
                    }
                })
                .collect();
            compounds.filter(|c| !c.is_empty())
        })
        .collect()
}

impl Document for MockDocument {
    fn query_class(&self, class: &str) -> Vec<ElementId> {
        self.elements()
            .into_iter()
            .filter(|id| self.has_class(*id, class))
            .collect()
    }

    fn query_selector_all(&self, selector: &str) -> Vec<ElementId> {
        let Some(list) = parse_selector_list(selector) else {
            tracing::debug!(selector, "Unsupported selector in mock document");
            return Vec::new();
        };
        self.elements()
            .into_iter()
            .filter(|id| list.iter().any(|compounds| self.matches_selector(*id, compounds)))
            .collect()
    }

    fn is_connected(&self, element: ElementId) -> bool {
        self.connected_node(element).is_some()
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.node(element)
            .is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    fn has_descendant_with_class(&self, element: ElementId, class: &str) -> bool {
        self.node(element).is_some_and(|n| {
            n.children
                .iter()
                .any(|c| self.has_class(*c, class) || self.has_descendant_with_class(*c, class))
        })
    }

    fn add_class(&mut self, element: ElementId, class: &str) {
        let Some(node) = self.node_mut(element) else {
            return;
        };
        if !node.classes.iter().any(|c| c == class) {
            node.classes.push(class.to_string());
            self.mutations.push(Mutation::attribute(element, "class"));
        }
    }

    fn custom_property(&self, element: ElementId, name: &str) -> String {
        self.inherited(element, |n| n.style.get(name).or_else(|| n.properties.get(name)))
    }

    fn computed_background_color(&self, element: ElementId) -> String {
        self.connected_node(element)
            .map(|n| n.background.clone())
            .unwrap_or_default()
    }

    fn computed_color(&self, element: ElementId) -> String {
        self.inherited(element, |n| Some(&n.color))
    }

    fn inline_background_color(&self, element: ElementId) -> String {
        self.node(element)
            .map(|n| n.inline_background.clone())
            .unwrap_or_default()
    }

    fn set_style_property(&mut self, element: ElementId, name: &str, value: &str) {
        let Some(node) = self.node_mut(element) else {
            return;
        };
        node.style.insert(name.to_string(), value.to_string());
        self.mutations.push(Mutation::attribute(element, "style"));
        self.writes.push(WriteRecord {
            element,
            target: WriteTarget::Style,
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.node(element)?.attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        let Some(node) = self.node_mut(element) else {
            return;
        };
        node.attributes.insert(name.to_string(), value.to_string());
        self.mutations.push(Mutation::attribute(element, name));
        self.writes.push(WriteRecord {
            element,
            target: WriteTarget::Attribute,
            name: name.to_string(),
            value: value.to_string(),
        });
    }
}
