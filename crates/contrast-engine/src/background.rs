//! Effective background resolution.
//!
//! Sources are tried in order until one yields a usable color string:
//!
//! ```text
//! TagAccent  --color-tag-accent   skipped when empty or an unresolved var(...)
//! Accent     --color-accent       same rule
//! Computed   background-color     skipped when fully transparent
//! Inline     style.backgroundColor
//! ```
//!
//! When every source comes up empty the element has no resolvable background
//! and is left alone for this pass.

use serde::Serialize;

use crate::config::ContrastConfig;
use crate::dom::{Document, ElementId};

/// Computed background values that mean "nothing painted here".
const TRANSPARENT: [&str; 2] = ["rgba(0, 0, 0, 0)", "transparent"];

/// Which source supplied the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundSourceKind {
    TagAccent,
    Accent,
    Computed,
    Inline,
}

impl BackgroundSourceKind {
    /// Fallback order.
    pub const ORDER: [BackgroundSourceKind; 4] = [
        BackgroundSourceKind::TagAccent,
        BackgroundSourceKind::Accent,
        BackgroundSourceKind::Computed,
        BackgroundSourceKind::Inline,
    ];

    fn lookup<D: Document + ?Sized>(
        self,
        doc: &D,
        element: ElementId,
        config: &ContrastConfig,
    ) -> Option<String> {
        let value = match self {
            BackgroundSourceKind::TagAccent => {
                usable_accent(doc.custom_property(element, &config.properties.tag_accent))
            }
            BackgroundSourceKind::Accent => {
                usable_accent(doc.custom_property(element, &config.properties.accent))
            }
            BackgroundSourceKind::Computed => {
                let bg = doc.computed_background_color(element);
                (!TRANSPARENT.contains(&bg.as_str())).then_some(bg)
            }
            BackgroundSourceKind::Inline => Some(doc.inline_background_color(element)),
        };
        value.filter(|v| !v.is_empty())
    }
}

fn usable_accent(raw: String) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() || value.contains("var(") {
        None
    } else {
        Some(value.to_string())
    }
}

/// A background color string together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBackground {
    /// The raw color string; also the element's memo key.
    pub color: String,
    pub source: BackgroundSourceKind,
    /// Whether either accent property was set at all, resolved or not.
    pub has_accent: bool,
}

/// Resolves an element's effective background.
pub fn resolve_background<D: Document + ?Sized>(
    doc: &D,
    element: ElementId,
    config: &ContrastConfig,
) -> Option<ResolvedBackground> {
    let has_accent = [&config.properties.tag_accent, &config.properties.accent]
        .iter()
        .any(|name| !doc.custom_property(element, name).trim().is_empty());

    BackgroundSourceKind::ORDER.iter().find_map(|kind| {
        kind.lookup(doc, element, config)
            .map(|color| ResolvedBackground {
                color,
                source: *kind,
                has_accent,
            })
    })
}

/// The element's current text color: computed `color`, else the site text property.
pub fn current_text_color<D: Document + ?Sized>(
    doc: &D,
    element: ElementId,
    config: &ContrastConfig,
) -> String {
    let color = doc.computed_color(element);
    if color.is_empty() {
        doc.custom_property(element, &config.properties.site_text)
            .trim()
            .to_string()
    } else {
        color
    }
}
