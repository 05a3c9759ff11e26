//! Preview tool configuration

use anyhow::{bail, Context, Result};
use danmaku_render::DanmakuConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Settings for one preview render
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// TTF/OTF file used for measuring and rasterizing
    pub font_path: Option<PathBuf>,
    /// PNG file to write
    pub output: PathBuf,
    /// Frame width in pixels
    pub frame_width: u32,
    /// Frame height in pixels
    pub frame_height: u32,
    /// Background, packed `0xAARRGGBB`
    pub background: u32,
    /// Base text size the danmaku style is layered on
    pub base_font_size: f32,
    /// Vertical gap between lanes
    pub lane_spacing: u32,
    /// Danmaku style and switches
    pub danmaku: DanmakuConfig,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            font_path: None,
            output: PathBuf::from("danmaku-preview.png"),
            frame_width: 1280,
            frame_height: 720,
            background: 0xFF20_2020,
            base_font_size: 18.0,
            lane_spacing: 4,
            danmaku: DanmakuConfig::default(),
        }
    }
}

impl PreviewConfig {
    /// Load from TOML file
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        info!("Loaded preview config from {}", path.display());
        Ok(config)
    }

    /// Load from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.frame_width == 0 || self.frame_height == 0 {
            bail!(
                "frame size must be non-zero, got {}x{}",
                self.frame_width,
                self.frame_height
            );
        }
        if !(self.base_font_size > 0.0) {
            bail!("base font size must be positive, got {}", self.base_font_size);
        }
        self.danmaku.validate()?;
        Ok(())
    }
}
