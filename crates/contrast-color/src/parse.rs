//! Color string parsing with a process-wide memo.
//!
//! Two grammars are accepted:
//!
//! | Form | Example | Notes |
//! |------|---------|-------|
//! | functional | `rgb(51, 102, 153)`, `rgba(0, 0, 0, 0)` | integer channels, matched anywhere in the string |
//! | hex | `#336699`, `369`, `#ABC` | whole string, 3 or 6 digits, `#` optional |
//!
//! Results are memoized by the *exact* input string. No normalization happens
//! before the lookup, so `"rgb(1,2,3)"` and `"rgb( 1, 2, 3 )"` occupy separate
//! cache slots. Only successful parses are stored: a string that fails today is
//! re-examined on the next call.

use std::collections::HashMap;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::rgb::Rgb;

static RGB_FUNCTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"rgba?\((\d+),\s*(\d+),\s*(\d+)").expect("functional color pattern compiles")
});

static HEX_COLOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#?([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("hex color pattern compiles")
});

static COLOR_CACHE: Lazy<Mutex<ColorCache>> = Lazy::new(|| Mutex::new(ColorCache::new()));

/// Memo of raw color string to parsed triple.
///
/// The engine uses a single process-wide instance through [`parse_color`];
/// this type is public so callers can keep a scoped cache of their own.
#[derive(Debug, Default, Clone)]
pub struct ColorCache {
    entries: HashMap<String, Rgb>,
}

impl ColorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached triple for `input`, parsing and storing it on a miss.
    pub fn get_or_parse(&mut self, input: &str) -> Option<Rgb> {
        if let Some(rgb) = self.entries.get(input) {
            tracing::trace!(color = input, "color cache hit");
            return Some(*rgb);
        }

        let parsed = parse_uncached(input)?;
        self.entries.insert(input.to_string(), parsed);
        Some(parsed)
    }

    pub fn contains(&self, input: &str) -> bool {
        self.entries.contains_key(input)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parses a color string through the process-wide cache.
///
/// Never panics; unrecognized input returns `None`.
pub fn parse_color(input: &str) -> Option<Rgb> {
    if input.is_empty() {
        return None;
    }
    let mut cache = COLOR_CACHE.lock().unwrap_or_else(|e| e.into_inner());
    cache.get_or_parse(input)
}

/// Reports whether `input` currently has an entry in the process-wide cache.
pub fn is_cached(input: &str) -> bool {
    let cache = COLOR_CACHE.lock().unwrap_or_else(|e| e.into_inner());
    cache.contains(input)
}

/// Parses a color string without touching any cache.
pub fn parse_uncached(input: &str) -> Option<Rgb> {
    if input.is_empty() {
        return None;
    }
    if let Some(caps) = RGB_FUNCTION.captures(input) {
        // Channels above 255 fall through as unparseable.
        let r = caps[1].parse::<u8>().ok()?;
        let g = caps[2].parse::<u8>().ok()?;
        let b = caps[3].parse::<u8>().ok()?;
        return Some(Rgb(r, g, b));
    }
    let caps = HEX_COLOR.captures(input)?;
    parse_hex_digits(&caps[1])
}

fn parse_hex_digits(hex: &str) -> Option<Rgb> {
    match hex.len() {
        // #rgb -> #rrggbb
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
            Some(Rgb(r, g, b))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Rgb(r, g, b))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    // =========================================================================
    // Functional notation
    // =========================================================================

    #[test]
    fn test_parse_rgb() {
        assert_eq!(parse_uncached("rgb(51, 102, 153)"), Some(Rgb(51, 102, 153)));
        assert_eq!(parse_uncached("rgb(0,0,0)"), Some(Rgb(0, 0, 0)));
    }

    #[test]
    fn test_parse_rgba_ignores_alpha() {
        assert_eq!(parse_uncached("rgba(0, 0, 0, 0)"), Some(Rgb(0, 0, 0)));
        assert_eq!(
            parse_uncached("rgba(255, 255, 255, 0.3)"),
            Some(Rgb(255, 255, 255))
        );
    }

    #[test]
    fn test_parse_rgb_inside_longer_value() {
        // Computed values occasionally carry a prefix such as a gradient stop.
        assert_eq!(
            parse_uncached("linear-gradient(rgb(1, 2, 3), red)"),
            Some(Rgb(1, 2, 3))
        );
    }

    #[test]
    fn test_parse_rgb_rejects_space_before_first_channel() {
        assert_eq!(parse_uncached("rgb( 1, 2, 3 )"), None);
    }

    #[test]
    fn test_parse_rgb_out_of_range_channel() {
        assert_eq!(parse_uncached("rgb(256, 0, 0)"), None);
        assert_eq!(parse_uncached("rgb(99999999999, 0, 0)"), None);
    }

    #[test]
    fn test_parse_rgb_percentages_unsupported() {
        assert_eq!(parse_uncached("rgb(100%, 0%, 0%)"), None);
    }

    // =========================================================================
    // Hex notation
    // =========================================================================

    #[test]
    fn test_parse_hex_6_digit() {
        assert_eq!(parse_uncached("#ff6b35"), Some(Rgb(255, 107, 53)));
        assert_eq!(parse_uncached("#000000"), Some(Rgb(0, 0, 0)));
        assert_eq!(parse_uncached("#ffffff"), Some(Rgb(255, 255, 255)));
    }

    #[test]
    fn test_parse_hex_3_digit() {
        assert_eq!(parse_uncached("#fff"), Some(Rgb(255, 255, 255)));
        assert_eq!(parse_uncached("#f80"), Some(Rgb(255, 136, 0)));
    }

    #[test]
    fn test_parse_hex_without_hash() {
        assert_eq!(parse_uncached("336699"), Some(Rgb(0x33, 0x66, 0x99)));
        assert_eq!(parse_uncached("abc"), Some(Rgb(0xaa, 0xbb, 0xcc)));
    }

    #[test]
    fn test_parse_hex_case_insensitive() {
        assert_eq!(parse_uncached("#FF6B35"), parse_uncached("#ff6b35"));
        assert_eq!(parse_uncached("#AbC"), parse_uncached("#aabbcc"));
    }

    #[test]
    fn test_parse_hex_wrong_length() {
        assert_eq!(parse_uncached("#ffff"), None);
        assert_eq!(parse_uncached("#fffffff"), None);
        assert_eq!(parse_uncached("#ff"), None);
    }

    #[test]
    fn test_parse_hex_must_be_whole_string() {
        assert_eq!(parse_uncached(" #fff"), None);
        assert_eq!(parse_uncached("#fff;"), None);
        assert_eq!(parse_uncached("#ggg"), None);
    }

    // =========================================================================
    // Unsupported forms
    // =========================================================================

    #[test]
    fn test_unsupported_forms() {
        assert_eq!(parse_uncached(""), None);
        assert_eq!(parse_uncached("red"), None);
        assert_eq!(parse_uncached("transparent"), None);
        assert_eq!(parse_uncached("hsl(0, 0%, 0%)"), None);
        assert_eq!(parse_uncached("var(--color-accent)"), None);
    }

    // =========================================================================
    // Caching
    // =========================================================================

    #[test]
    fn test_scoped_cache_stores_successes_only() {
        let mut cache = ColorCache::new();
        assert_eq!(cache.get_or_parse("#123"), Some(Rgb(0x11, 0x22, 0x33)));
        assert_eq!(cache.get_or_parse("nope"), None);
        assert!(cache.contains("#123"));
        assert!(!cache.contains("nope"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_scoped_cache_keys_are_not_normalized() {
        let mut cache = ColorCache::new();
        cache.get_or_parse("rgb(1,2,3)");
        cache.get_or_parse("rgb(1, 2, 3)");
        assert_eq!(cache.len(), 2);
    }

    #[test]
    #[serial]
    fn test_global_cache_populated_by_parse_color() {
        let key = "rgb(12, 34, 56)";
        assert_eq!(parse_color(key), Some(Rgb(12, 34, 56)));
        assert!(is_cached(key));
        // Served from the cache the second time.
        assert_eq!(parse_color(key), Some(Rgb(12, 34, 56)));
    }

    #[test]
    #[serial]
    fn test_global_cache_skips_empty_and_unparseable() {
        assert_eq!(parse_color(""), None);
        assert_eq!(parse_color("salmon"), None);
        assert!(!is_cached(""));
        assert!(!is_cached("salmon"));
    }
}
