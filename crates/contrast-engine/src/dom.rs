//! Document abstraction.
//!
//! The engine never talks to a browser directly. Everything it needs from the
//! page goes through [`Document`], which a host implements on top of its DOM
//! binding. [`MockDocument`](crate::MockDocument) is the in-memory
//! implementation used by tests and the `contrast-probe` tool.
//!
//! All getters return the empty string for "unset", mirroring
//! `getPropertyValue` and `style.backgroundColor` in the browser.

use serde::{Deserialize, Serialize};

/// Stable identity of an element for the lifetime of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u64);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The slice of the DOM the contrast engine reads and writes.
pub trait Document {
    /// Connected elements carrying `class`, in document order.
    fn query_class(&self, class: &str) -> Vec<ElementId>;

    /// Connected elements matching a CSS selector, in document order.
    fn query_selector_all(&self, selector: &str) -> Vec<ElementId>;

    /// Whether the element is still attached to the document.
    fn is_connected(&self, element: ElementId) -> bool;

    fn has_class(&self, element: ElementId, class: &str) -> bool;

    /// Whether any descendant (not the element itself) carries `class`.
    fn has_descendant_with_class(&self, element: ElementId, class: &str) -> bool;

    fn add_class(&mut self, element: ElementId, class: &str);

    /// Computed value of a custom property, untrimmed.
    fn custom_property(&self, element: ElementId, name: &str) -> String;

    /// Computed `background-color`.
    fn computed_background_color(&self, element: ElementId) -> String;

    /// Computed `color`.
    fn computed_color(&self, element: ElementId) -> String;

    /// Inline `style.backgroundColor`.
    fn inline_background_color(&self, element: ElementId) -> String;

    /// `style.setProperty(name, value)`.
    fn set_style_property(&mut self, element: ElementId, name: &str, value: &str);

    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str);
}

/// Capability to answer class-membership questions.
///
/// Button classification only needs this predicate, so it can be exercised
/// against plain class lists without a document.
pub trait ClassList {
    fn contains_class(&self, class: &str) -> bool;
}

impl ClassList for [&str] {
    fn contains_class(&self, class: &str) -> bool {
        self.iter().any(|c| *c == class)
    }
}

impl ClassList for [String] {
    fn contains_class(&self, class: &str) -> bool {
        self.iter().any(|c| c == class)
    }
}

impl ClassList for Vec<String> {
    fn contains_class(&self, class: &str) -> bool {
        self.as_slice().contains_class(class)
    }
}

/// [`ClassList`] view of one element in a [`Document`].
pub struct ElementClasses<'a, D: ?Sized> {
    doc: &'a D,
    element: ElementId,
}

impl<'a, D: Document + ?Sized> ElementClasses<'a, D> {
    pub fn new(doc: &'a D, element: ElementId) -> Self {
        Self { doc, element }
    }
}

impl<D: Document + ?Sized> ClassList for ElementClasses<'_, D> {
    fn contains_class(&self, class: &str) -> bool {
        self.doc.has_class(self.element, class)
    }
}
