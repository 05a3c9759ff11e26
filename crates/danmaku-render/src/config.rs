//! Danmaku Configuration
//!
//! Surface-wide switches read from the player settings. Loading validates
//! the values; the renderer itself trusts whatever it is given.

use crate::DanmakuStyle;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Complete danmaku rendering configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DanmakuConfig {
    /// Font, opacity and outline
    pub style: DanmakuStyle,
    /// Use each comment's own color instead of white
    pub enable_color: bool,
    /// Append the emission timestamp to every comment
    pub is_debug: bool,
}

impl Default for DanmakuConfig {
    fn default() -> Self {
        Self {
            style: DanmakuStyle::default(),
            enable_color: true,
            is_debug: false,
        }
    }
}

impl DanmakuConfig {
    /// Load from TOML file
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config = Self::from_toml(&content)?;
        info!("Loaded danmaku config from {}", path.display());
        Ok(config)
    }

    /// Load from TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from JSON string
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let style = &self.style;
        if !(style.font_size > 0.0) {
            return Err(ConfigError::InvalidFontSize(style.font_size));
        }
        if !(0.0..=1.0).contains(&style.alpha) {
            return Err(ConfigError::InvalidAlpha(style.alpha));
        }
        if !(style.stroke_width >= 0.0) {
            return Err(ConfigError::InvalidStrokeWidth(style.stroke_width));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Font size must be positive, got {0}")]
    InvalidFontSize(f32),

    #[error("Alpha must be within 0..=1, got {0}")]
    InvalidAlpha(f32),

    #[error("Stroke width cannot be negative, got {0}")]
    InvalidStrokeWidth(f32),
}
