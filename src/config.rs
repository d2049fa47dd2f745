//! Renderer configuration.

use crate::error::{ParseError, Result};
use crate::render::element::DEFAULT_CLASS_PREFIX;
use crate::render::math::MathBackend;
use crate::render::notebook::DEFAULT_LANGUAGE;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration of the renderer built by [`crate::render::create_renderer`].
///
/// ```toml
/// class_prefix = "nb-"
/// math_backend = "mathjax"
/// data_types_priority = ["text/html", "image/png", "text/plain"]
/// header_anchors = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Prefix of all CSS class names except `lang-*`.
    pub class_prefix: String,
    /// Math rendering backend.
    pub math_backend: MathBackend,
    /// Media types in priority order; the built-in order when unset.
    pub data_types_priority: Option<Vec<String>>,
    /// Whether to put anchor links into Markdown headings.
    pub header_anchors: bool,
    /// Prefix of generated heading ids.
    pub header_prefix: String,
    /// Whether to remove accents from generated heading ids.
    pub header_ids_strip_accents: bool,
    /// Language of code cells when the notebook does not declare one.
    pub default_language: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            class_prefix: DEFAULT_CLASS_PREFIX.to_string(),
            math_backend: MathBackend::default(),
            data_types_priority: None,
            header_anchors: true,
            header_prefix: String::new(),
            header_ids_strip_accents: false,
            default_language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl RenderConfig {
    /// Parse a configuration from TOML. Missing keys take their defaults.
    pub fn from_toml(input: &str) -> Result<Self> {
        toml::from_str(input).map_err(|e| ParseError::Config(e.to_string()).into())
    }

    /// Read a TOML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}
