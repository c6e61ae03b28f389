//! Per-element memo of the last background each element was resolved against.

use std::collections::HashMap;

use crate::dom::ElementId;

/// Element identity to color key.
///
/// Owned by the engine, so its lifetime is the engine's. An entry is replaced
/// when the element's background string changes and dropped when the element
/// is found detached; while the string is unchanged the element is never
/// re-evaluated.
#[derive(Debug, Clone, Default)]
pub struct ProcessedMap {
    entries: HashMap<ElementId, String>,
}

impl ProcessedMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, element: ElementId) -> Option<&str> {
        self.entries.get(&element).map(String::as_str)
    }

    /// Whether `element` was last resolved against exactly `color`.
    pub fn matches(&self, element: ElementId, color: &str) -> bool {
        self.get(element) == Some(color)
    }

    pub fn record(&mut self, element: ElementId, color: impl Into<String>) {
        self.entries.insert(element, color.into());
    }

    /// Drops the memo for an element; the next evaluation starts fresh.
    pub fn forget(&mut self, element: ElementId) -> Option<String> {
        self.entries.remove(&element)
    }

    /// Keeps only the entries for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(ElementId) -> bool) {
        self.entries.retain(|element, _| keep(*element));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
