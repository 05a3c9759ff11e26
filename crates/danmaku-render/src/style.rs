//! Text and danmaku styles
//!
//! [`TextStyle`] is the host-level style handed to a
//! [`TextMeasurer`](crate::TextMeasurer). Unset fields fall through when two
//! styles are merged, so a caller can keep one base style and layer the
//! danmaku-specific pieces on top.

use crate::Color;
use serde::{Deserialize, Serialize};

const DEFAULT_FONT_SIZE: f32 = 14.0;
const DEFAULT_WEIGHT: u16 = 400;

/// Line decoration drawn with the glyphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextDecoration {
    None,
    Underline,
}

/// How glyph outlines are filled
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DrawStyle {
    /// Solid glyphs
    Fill,
    /// Outline of the given width in pixels, centred on the glyph edge
    Stroke { width: f32 },
}

/// Text style configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextStyle {
    font_size: Option<f32>,
    color: Option<Color>,
    weight: Option<u16>,
    decoration: Option<TextDecoration>,
    draw_style: Option<DrawStyle>,
}

impl TextStyle {
    pub fn new(size: f32) -> Self {
        Self {
            font_size: Some(size),
            ..Default::default()
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_weight(mut self, weight: u16) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_decoration(mut self, decoration: TextDecoration) -> Self {
        self.decoration = Some(decoration);
        self
    }

    pub fn with_draw_style(mut self, draw_style: DrawStyle) -> Self {
        self.draw_style = Some(draw_style);
        self
    }

    /// Overlay every field `other` sets on top of `self`.
    pub fn merge(&self, other: &TextStyle) -> TextStyle {
        TextStyle {
            font_size: other.font_size.or(self.font_size),
            color: other.color.or(self.color),
            weight: other.weight.or(self.weight),
            decoration: other.decoration.or(self.decoration),
            draw_style: other.draw_style.or(self.draw_style),
        }
    }

    /// Font size in pixels
    pub fn font_size(&self) -> f32 {
        self.font_size.unwrap_or(DEFAULT_FONT_SIZE)
    }

    pub fn color(&self) -> Color {
        self.color.unwrap_or(Color::WHITE)
    }

    pub fn weight(&self) -> u16 {
        self.weight.unwrap_or(DEFAULT_WEIGHT)
    }

    pub fn decoration(&self) -> TextDecoration {
        self.decoration.unwrap_or(TextDecoration::None)
    }

    pub fn draw_style(&self) -> DrawStyle {
        self.draw_style.unwrap_or(DrawStyle::Fill)
    }

    pub fn is_underlined(&self) -> bool {
        self.decoration() == TextDecoration::Underline
    }

    pub fn is_bold(&self) -> bool {
        self.weight() >= 600
    }
}

/// Visual parameters shared by every danmaku on a surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DanmakuStyle {
    /// Font size in pixels
    pub font_size: f32,
    /// CSS-like weight, 100..=900
    pub font_weight: u16,
    /// Opacity applied to both passes
    pub alpha: f32,
    /// Outline color
    pub stroke_color: Color,
    /// Outline width in pixels
    pub stroke_width: f32,
}

impl Default for DanmakuStyle {
    fn default() -> Self {
        Self {
            font_size: 18.0,
            font_weight: 600,
            alpha: 0.8,
            stroke_color: Color::BLACK,
            stroke_width: 4.0,
        }
    }
}

impl DanmakuStyle {
    /// Style of the outline pass.
    pub fn style_for_border(&self) -> TextStyle {
        TextStyle::new(self.font_size)
            .with_color(self.stroke_color.scale_alpha(self.alpha))
            .with_weight(self.font_weight)
            .with_draw_style(DrawStyle::Stroke {
                width: self.stroke_width,
            })
    }

    /// Style of the fill pass in the given color.
    pub fn style_for_text(&self, color: Color) -> TextStyle {
        TextStyle::new(self.font_size)
            .with_color(color.scale_alpha(self.alpha))
            .with_weight(self.font_weight)
            .with_draw_style(DrawStyle::Fill)
    }
}
