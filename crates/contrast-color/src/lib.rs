//! # Contrast Color - parsing and WCAG arithmetic
//!
//! `contrast-color` is the numeric foundation of the contrast engine. It turns
//! CSS color strings into [`Rgb`] triples and computes WCAG 2.x relative
//! luminance and contrast ratios.
//!
//! ## Parsing
//!
//! Only two forms are recognized:
//!
//! - Functional `rgb(r, g, b)` / `rgba(r, g, b, a)` with integer channels
//! - Hex with exactly 3 or 6 digits, optionally prefixed with `#`
//!
//! Anything else (named colors, `hsl()`, unresolved `var(...)` references, the
//! empty string) is *not parseable* and yields `None`. That is a "no decision"
//! signal for callers, never an error.
//!
//! ```rust
//! use contrast_color::{parse_color, Rgb};
//!
//! assert_eq!(parse_color("#336699"), Some(Rgb(0x33, 0x66, 0x99)));
//! assert_eq!(parse_color("#abc"), parse_color("#aabbcc"));
//! assert_eq!(parse_color("rgba(10, 20, 30, 0.5)"), Some(Rgb(10, 20, 30)));
//! assert_eq!(parse_color("hsl(0, 0%, 0%)"), None);
//! ```
//!
//! ## Luminance and contrast
//!
//! ```rust
//! use contrast_color::{contrast_ratio, relative_luminance, Rgb};
//!
//! let black = relative_luminance(Rgb::BLACK);
//! let white = relative_luminance(Rgb::WHITE);
//! let ratio = contrast_ratio(black, white);
//! assert!((ratio - 21.0).abs() < 1e-9);
//! ```

mod luminance;
mod parse;
mod rgb;

pub use luminance::{
    channel_to_linear, contrast_between, contrast_ratio, relative_luminance, LINEAR_BREAKPOINT,
};
pub use parse::{is_cached, parse_color, parse_uncached, ColorCache};
pub use rgb::Rgb;
