//! The contrast decision: given a resolved background and the current text
//! color, either leave the element alone or pick on-accent foreground values.
//!
//! Everything here is pure. The engine feeds it strings read from the
//! document and applies the returned [`PropertyWrite`]s itself.

use contrast_color::{contrast_ratio, parse_color, relative_luminance};
use serde::Serialize;

use crate::background::ResolvedBackground;
use crate::config::{ButtonClasses, ContrastConfig};
use crate::dom::ClassList;
use crate::error::SkipReason;

/// How an element participates in button styling.
///
/// Two independent class tests feed this: membership in the button-like set
/// and the outline modifier.
///
/// | | button-like | not button-like |
/// |---|---|---|
/// | outline modifier | `OutlineButton` | `Plain` |
/// | no modifier | `OtherButtonLike` | `NotButton` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonKind {
    /// Outline modifier on a non-button element; only the accent-tracking
    /// property applies.
    Plain,
    /// An outline button: button properties plus accent tracking.
    OutlineButton,
    /// Any other button-like element.
    OtherButtonLike,
    NotButton,
}

impl ButtonKind {
    /// Whether button text and border properties are written.
    pub fn is_button_like(self) -> bool {
        matches!(self, ButtonKind::OutlineButton | ButtonKind::OtherButtonLike)
    }

    /// Whether the accent-tracking property is written.
    pub fn tracks_accent(self) -> bool {
        matches!(self, ButtonKind::OutlineButton | ButtonKind::Plain)
    }
}

/// Classifies an element from its classes.
pub fn classify_button<C: ClassList + ?Sized>(classes: &C, buttons: &ButtonClasses) -> ButtonKind {
    let button_like = classes.contains_class(&buttons.plain)
        || buttons.themed.iter().any(|c| classes.contains_class(c));
    let outline = classes.contains_class(&buttons.outline);

    match (outline, button_like) {
        (true, true) => ButtonKind::OutlineButton,
        (true, false) => ButtonKind::Plain,
        (false, true) => ButtonKind::OtherButtonLike,
        (false, false) => ButtonKind::NotButton,
    }
}

/// One `style.setProperty` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyWrite {
    pub name: String,
    pub value: String,
}

impl PropertyWrite {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Foreground values chosen for a low-contrast element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Override {
    pub use_dark_text: bool,
    pub background_luminance: f64,
    /// Ratio of the current pairing, when the text color was parseable.
    pub current_ratio: Option<f64>,
    pub writes: Vec<PropertyWrite>,
}

/// Result of evaluating one element.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// No decision possible; nothing is written.
    Skip(SkipReason),
    /// The current pairing already meets the threshold.
    Legible { ratio: f64 },
    /// Foreground properties must be written.
    Override(Override),
}

/// Decides how an element with `background` and `text_color` should be styled.
pub fn decide(
    config: &ContrastConfig,
    background: &ResolvedBackground,
    text_color: &str,
    button: ButtonKind,
) -> Decision {
    let Some(bg_rgb) = parse_color(&background.color) else {
        return Decision::Skip(SkipReason::UnparseableColor);
    };
    let bg_luminance = relative_luminance(bg_rgb);

    let current_ratio = parse_color(text_color)
        .map(|text_rgb| contrast_ratio(bg_luminance, relative_luminance(text_rgb)));
    if let Some(ratio) = current_ratio {
        if ratio >= config.min_ratio {
            return Decision::Legible { ratio };
        }
    }

    // Exactly at the cutoff goes to light text.
    let use_dark_text = bg_luminance > config.dark_text_above;
    let names = &config.properties;
    let palette = &config.palette;

    let mut writes = vec![PropertyWrite::new(
        &names.on_accent,
        palette.text(use_dark_text),
    )];

    if button.is_button_like() {
        writes.push(PropertyWrite::new(
            &names.on_accent_btn_text,
            palette.text(use_dark_text),
        ));
        writes.push(PropertyWrite::new(
            &names.on_accent_btn_border,
            palette.border(use_dark_text),
        ));
    }

    if button.tracks_accent() {
        let tracking = if !use_dark_text || !background.has_accent {
            background.color.as_str()
        } else {
            palette.light_text.as_str()
        };
        writes.push(PropertyWrite::new(&names.btn_accent_color, tracking));
    }

    Decision::Override(Override {
        use_dark_text,
        background_luminance: bg_luminance,
        current_ratio,
        writes,
    })
}
