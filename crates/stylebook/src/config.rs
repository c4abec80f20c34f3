//! Editor configuration.
//!
//! Every field has a default, so an empty document is a valid configuration.
//! Configuration can be written as YAML or JSON:
//!
//! ```yaml
//! language_for_new_text_boxes: en
//! min_font_size: 7
//! font_label_width: 15
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::options::{LINE_SPACE_OPTIONS, POINT_SIZES};

/// Settings that shape the format controls and their rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Language code of newly created text boxes. Boxes in this language
    /// also update the language-neutral rule so new boxes pick up changes.
    #[serde(alias = "languageForNewTextBoxes")]
    pub language_for_new_text_boxes: Option<String>,
    /// Smallest font size, in points, a size command will write.
    pub min_font_size: u32,
    /// Point sizes offered, ascending.
    pub point_sizes: Vec<String>,
    /// Line spacing multipliers offered, ascending.
    pub line_space_options: Vec<String>,
    /// Font names longer than this many columns are shortened in the list.
    pub font_label_width: usize,
    /// Background color written for the gray background choice.
    pub preferred_gray: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            language_for_new_text_boxes: None,
            min_font_size: 7,
            point_sizes: POINT_SIZES.iter().map(|s| s.to_string()).collect(),
            line_space_options: LINE_SPACE_OPTIONS.iter().map(|s| s.to_string()).collect(),
            font_label_width: 15,
            preferred_gray: "hsl(0,0%,86%)".to_string(),
        }
    }
}

impl EditorConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        // An empty YAML document deserializes to unit, not to an empty map.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Loads configuration from a `.yaml`, `.yml` or `.json` file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let config = match extension.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&text)?,
            "json" => Self::from_json_str(&text)?,
            _ => return Err(ConfigError::UnsupportedFormat { extension }),
        };
        log::debug!("loaded editor config from {}", path.display());
        Ok(config)
    }

    /// Builder-style setter for the new-text-box language.
    pub fn with_language_for_new_text_boxes(mut self, lang: impl Into<String>) -> Self {
        self.language_for_new_text_boxes = Some(lang.into());
        self
    }
}
