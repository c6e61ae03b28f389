//! WCAG relative luminance and contrast ratio.
//!
//! Uses the WCAG 2.x definitions verbatim, including the `0.03928`
//! linearization breakpoint (rather than the IEC `0.04045`), so results match
//! the ratios browsers' accessibility tooling reports.

use crate::rgb::Rgb;

/// sRGB values at or below this point are linearized with a straight divide.
pub const LINEAR_BREAKPOINT: f64 = 0.03928;

/// Convert an sRGB component (0–255) to linear light (0.0–1.0).
pub fn channel_to_linear(c: u8) -> f64 {
    let c = f64::from(c) / 255.0;
    if c <= LINEAR_BREAKPOINT {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Relative luminance in `[0, 1]`; 0 is black, 1 is white.
pub fn relative_luminance(color: Rgb) -> f64 {
    let r = channel_to_linear(color.0);
    let g = channel_to_linear(color.1);
    let b = channel_to_linear(color.2);
    r * 0.2126 + g * 0.7152 + b * 0.0722
}

/// Contrast ratio between two luminance values.
///
/// Always `>= 1` and symmetric in its arguments.
pub fn contrast_ratio(a: f64, b: f64) -> f64 {
    let lighter = a.max(b);
    let darker = a.min(b);
    (lighter + 0.05) / (darker + 0.05)
}

/// Contrast ratio between two colors.
pub fn contrast_between(a: Rgb, b: Rgb) -> f64 {
    contrast_ratio(relative_luminance(a), relative_luminance(b))
}
