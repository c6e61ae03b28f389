//! Engine configuration.
//!
//! Every class name, custom property and constant the engine touches lives in
//! [`ContrastConfig`]. The defaults reproduce the stock theme exactly, so most
//! hosts never load a file. Themes that rename their tokens can supply a YAML
//! or JSON document; missing keys fall back to the defaults.
//!
//! ```rust
//! use contrast_engine::ContrastConfig;
//!
//! let config = ContrastConfig::from_yaml(r#"
//! marker_class: needs-contrast
//! debounce_ms: 250
//! properties:
//!   accent: --brand-accent
//! "#).unwrap();
//!
//! assert_eq!(config.marker_class, "needs-contrast");
//! assert_eq!(config.properties.accent, "--brand-accent");
//! // Untouched keys keep their defaults.
//! assert_eq!(config.properties.tag_accent, "--color-tag-accent");
//! assert_eq!(config.min_ratio, 4.5);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ContrastError, Result};

/// Custom property names read and written by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyNames {
    /// Tag-level accent, consulted first.
    pub tag_accent: String,
    /// Generic accent, consulted second.
    pub accent: String,
    /// Site default text color, used when the computed `color` is empty.
    pub site_text: String,
    /// On-accent text color written for every override.
    pub on_accent: String,
    /// Button text color written for button-like elements.
    pub on_accent_btn_text: String,
    /// Button border color written for button-like elements.
    pub on_accent_btn_border: String,
    /// Border/background tracking color written for outline buttons.
    pub btn_accent_color: String,
}

impl Default for PropertyNames {
    fn default() -> Self {
        Self {
            tag_accent: "--color-tag-accent".into(),
            accent: "--color-accent".into(),
            site_text: "--color-site-text".into(),
            on_accent: "--color-on-accent".into(),
            on_accent_btn_text: "--color-on-accent-btn-text".into(),
            on_accent_btn_border: "--color-on-accent-btn-border".into(),
            btn_accent_color: "--btn-accent-color".into(),
        }
    }
}

/// Classes that make an element button-like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonClasses {
    /// The theme's own button class.
    pub plain: String,
    /// Modifier marking an outline button.
    pub outline: String,
    /// Editor card buttons and other themed buttons.
    pub themed: Vec<String>,
}

impl Default for ButtonClasses {
    fn default() -> Self {
        Self {
            plain: "c-btn".into(),
            outline: "c-btn--outline".into(),
            themed: vec![
                "kg-signup-card-button".into(),
                "kg-header-card-button".into(),
                "kg-btn".into(),
                "kg-btn-accent".into(),
                "kg-product-card-button".into(),
            ],
        }
    }
}

/// The fixed foreground values an override chooses between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OnAccentPalette {
    pub dark_text: String,
    pub dark_border: String,
    pub light_text: String,
    pub light_border: String,
}

impl Default for OnAccentPalette {
    fn default() -> Self {
        Self {
            dark_text: "#000000".into(),
            dark_border: "rgba(0, 0, 0, 0.15)".into(),
            light_text: "#ffffff".into(),
            light_border: "rgba(255, 255, 255, 0.3)".into(),
        }
    }
}

impl OnAccentPalette {
    pub fn text(&self, use_dark_text: bool) -> &str {
        if use_dark_text {
            &self.dark_text
        } else {
            &self.light_text
        }
    }

    pub fn border(&self, use_dark_text: bool) -> &str {
        if use_dark_text {
            &self.dark_border
        } else {
            &self.light_border
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContrastConfig {
    /// Opt-in class carried by managed elements.
    pub marker_class: String,
    /// Attribute mirroring the last background each element was resolved against.
    pub processed_attribute: String,
    /// Write [`processed_attribute`](Self::processed_attribute) alongside the
    /// engine's own memo.
    pub mirror_processed_attribute: bool,
    pub properties: PropertyNames,
    pub buttons: ButtonClasses,
    pub palette: OnAccentPalette,
    /// Pairings at or above this ratio are left alone (WCAG AA, normal text).
    pub min_ratio: f64,
    /// Backgrounds brighter than this luminance get dark text.
    pub dark_text_above: f64,
    /// Quiet period before a mutation burst triggers a rescan.
    pub debounce_ms: u64,
}

impl Default for ContrastConfig {
    fn default() -> Self {
        Self {
            marker_class: "js-contrast".into(),
            processed_attribute: "data-contrast-processed".into(),
            mirror_processed_attribute: true,
            properties: PropertyNames::default(),
            buttons: ButtonClasses::default(),
            palette: OnAccentPalette::default(),
            min_ratio: 4.5,
            dark_text_above: 0.5,
            debounce_ms: 100,
        }
    }
}

impl ContrastConfig {
    /// Parses and validates a YAML config.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: ContrastConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a JSON config.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ContrastConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a config file, choosing the format from its extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let read = || {
            std::fs::read_to_string(path).map_err(|source| ContrastError::Io {
                path: path.to_path_buf(),
                source,
            })
        };

        let config = match ext.as_str() {
            "yaml" | "yml" => Self::from_yaml(&read()?)?,
            "json" => Self::from_json(&read()?)?,
            _ => return Err(ContrastError::UnsupportedFormat(path.display().to_string())),
        };
        tracing::debug!(path = %path.display(), "Loaded contrast config");
        Ok(config)
    }

    /// Checks ranges and required names.
    pub fn validate(&self) -> Result<()> {
        if self.marker_class.trim().is_empty() {
            return Err(ContrastError::invalid("marker_class must not be empty"));
        }
        if self.processed_attribute.trim().is_empty() {
            return Err(ContrastError::invalid(
                "processed_attribute must not be empty",
            ));
        }
        if !(self.min_ratio >= 1.0 && self.min_ratio <= 21.0) {
            return Err(ContrastError::invalid(format!(
                "min_ratio {} out of range (1-21)",
                self.min_ratio
            )));
        }
        if !(0.0..=1.0).contains(&self.dark_text_above) {
            return Err(ContrastError::invalid(format!(
                "dark_text_above {} out of range (0-1)",
                self.dark_text_above
            )));
        }
        Ok(())
    }

    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
