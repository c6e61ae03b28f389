//! Helpers for scripts that opt elements into contrast management.

use crate::config::ContrastConfig;
use crate::dom::Document;

/// Adds the marker class to every element matching `selector`.
///
/// Returns how many elements were newly marked. The class change itself is
/// what the engine's watcher picks up, so no further call is needed.
///
/// ```rust
/// use contrast_engine::{mark_for_contrast, ContrastConfig, Document, MockDocument, MockElement};
///
/// let mut doc = MockDocument::new();
/// let banner = doc.append(None, MockElement::new().class("c-block--banner"));
/// doc.append(Some(banner), MockElement::new().class("kg-signup-card-button"));
///
/// let config = ContrastConfig::default();
/// let marked = mark_for_contrast(&mut doc, ".c-block--banner .kg-signup-card-button", &config);
/// assert_eq!(marked, 1);
/// assert_eq!(doc.query_class("js-contrast").len(), 1);
/// ```
pub fn mark_for_contrast<D: Document + ?Sized>(
    doc: &mut D,
    selector: &str,
    config: &ContrastConfig,
) -> usize {
    let targets = doc.query_selector_all(selector);
    let mut marked = 0;
    for element in targets {
        if !doc.has_class(element, &config.marker_class) {
            doc.add_class(element, &config.marker_class);
            marked += 1;
        }
    }
    tracing::debug!(selector, marked, "Marked elements for contrast");
    marked
}
