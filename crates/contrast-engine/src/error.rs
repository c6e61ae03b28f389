//! Error types for the contrast engine.
//!
//! Processing an element never fails: conditions that prevent a decision are
//! reported as a [`SkipReason`] and the element keeps its page-default colors.
//! [`ContrastError`] covers setup work only (loading configs and page fixtures).

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while configuring the engine.
#[derive(Debug, Error)]
pub enum ContrastError {
    /// A configuration value is out of range or empty.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Reading a config or fixture file failed.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML deserialization failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File extension is neither YAML nor JSON.
    #[error("unsupported file format: {0} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(String),
}

impl ContrastError {
    /// Create an invalid-config error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

/// Result type for contrast engine setup operations.
pub type Result<T> = std::result::Result<T, ContrastError>;

/// Why an element was left untouched during a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The background string matched neither supported color grammar.
    #[error("background color is not parseable")]
    UnparseableColor,

    /// No accent variable, computed or inline background produced a color.
    #[error("no background color could be resolved")]
    NoBackgroundResolvable,

    /// The element is no longer attached to the document.
    #[error("element is not attached to the document")]
    MissingElement,
}
