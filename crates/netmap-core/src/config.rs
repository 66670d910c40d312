//! Tool configuration: overlay styles, notification timing, prompt wording, input thresholds.

use crate::overlay::{OverlayStyle, SerializableColor};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

const RULER_BLUE: SerializableColor = SerializableColor::new(0x3b, 0x82, 0xf6, 255);
const AREA_GREEN: SerializableColor = SerializableColor::new(0x10, 0xb9, 0x81, 255);
const STROKE_RED: SerializableColor = SerializableColor::new(0xef, 0x44, 0x44, 255);

/// Styles for every overlay the tools draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub ruler_marker: OverlayStyle,
    pub ruler_line: OverlayStyle,
    pub area_marker: OverlayStyle,
    pub area_preview: OverlayStyle,
    /// Applied to the polygon once an area measurement is finalized.
    pub area_final: OverlayStyle,
    pub stroke_preview: OverlayStyle,
    pub stroke_final: OverlayStyle,
}

impl Default for StyleConfig {
    fn default() -> Self {
        let area_preview = OverlayStyle {
            stroke_color: AREA_GREEN,
            stroke_width: 2.0,
            opacity: 1.0,
            fill_color: Some(AREA_GREEN),
            fill_opacity: 0.2,
            dash: vec![5.0, 5.0],
            ..OverlayStyle::default()
        };
        let stroke_preview = OverlayStyle {
            stroke_color: STROKE_RED,
            stroke_width: 3.0,
            opacity: 0.8,
            ..OverlayStyle::default()
        };
        Self {
            ruler_marker: OverlayStyle::point_marker(RULER_BLUE),
            ruler_line: OverlayStyle {
                stroke_color: RULER_BLUE,
                stroke_width: 3.0,
                opacity: 0.8,
                dash: vec![10.0, 5.0],
                ..OverlayStyle::default()
            },
            area_marker: OverlayStyle::point_marker(AREA_GREEN),
            area_final: OverlayStyle {
                dash: Vec::new(),
                fill_opacity: 0.3,
                ..area_preview.clone()
            },
            area_preview,
            stroke_final: OverlayStyle {
                opacity: 1.0,
                ..stroke_preview.clone()
            },
            stroke_preview,
        }
    }
}

/// How long transient messages stay up, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DurationConfig {
    /// Usage hint shown when a tool is activated.
    pub tool_hint_ms: u64,
    /// Running area readout while drawing a polygon.
    pub area_readout_ms: u64,
    /// Running distance popup while drawing a ruler path.
    pub distance_popup_ms: u64,
    /// Confirmation after copying coordinates.
    pub copy_ms: u64,
}

impl Default for DurationConfig {
    fn default() -> Self {
        Self {
            tool_hint_ms: 5000,
            area_readout_ms: 2000,
            distance_popup_ms: 2000,
            copy_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Pre-filled answer of the "new label" prompt.
    pub default_label: String,
    /// Answer to the edit prompt that deletes a label (any case).
    pub delete_keyword: String,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            default_label: "Label".to_string(),
            delete_keyword: "DELETE".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadoutConfig {
    /// Decimal places of the cursor readout.
    pub precision: usize,
    /// Shown until the cursor first moves over the map.
    pub placeholder: String,
}

impl Default for ReadoutConfig {
    fn default() -> Self {
        Self {
            precision: 6,
            placeholder: "Move cursor over map".to_string(),
        }
    }
}

/// Thresholds for turning raw pointer input into clicks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Maximum pointer travel, in pixels, between press and release of a click.
    pub click_tolerance_px: f64,
    /// Maximum time between two clicks of a double-click.
    pub double_click_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            click_tolerance_px: 5.0,
            double_click_ms: 500,
        }
    }
}

/// Complete configuration of the map tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub styles: StyleConfig,
    pub durations: DurationConfig,
    pub text: TextConfig,
    pub readout: ReadoutConfig,
    pub input: InputConfig,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            styles: StyleConfig::default(),
            durations: DurationConfig::default(),
            text: TextConfig::default(),
            readout: ReadoutConfig::default(),
            input: InputConfig::default(),
        }
    }
}

impl ToolConfig {
    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::debug!("loaded tool config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
