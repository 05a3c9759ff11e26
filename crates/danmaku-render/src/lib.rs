//! Danmaku Render - Outlined comment rasters
//!
//! Turns scrolling video comments into measured, cached images. Each comment
//! is measured twice (fill and outline), composited into one raster on its
//! first draw and blitted from the cache on every frame after that.

mod bitmap;
mod canvas;
mod color;
mod config;
mod danmaku;
mod measure;
mod style;
mod styled;
mod text;

#[cfg(test)]
mod testing;

pub use bitmap::{create_danmaku_image, BitmapError, DanmakuImage};
pub use canvas::{Canvas, DrawScope};
pub use color::Color;
pub use config::{ConfigError, DanmakuConfig};
pub use danmaku::{Danmaku, DanmakuLocation, DanmakuPresentation};
pub use measure::{LayoutConstraints, LayoutSize, TextLayout, TextMeasurer, TextOverflow};
pub use style::{DanmakuStyle, DrawStyle, TextDecoration, TextStyle};
pub use styled::{
    dummy_danmaku, dummy_danmaku_with_text, format_play_time, SizeSpecifiedDanmaku,
    StyledDanmaku, DUMMY_TEXT,
};
pub use text::{FontError, FontdueLayout, FontdueMeasurer};
