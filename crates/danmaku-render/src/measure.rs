//! Text measurement capability
//!
//! The renderer only needs "measure this text in this style, then paint the
//! result somewhere". Any text engine that can do both plugs in through
//! [`TextMeasurer`]; [`FontdueMeasurer`](crate::FontdueMeasurer) is the
//! bundled one.

use crate::canvas::Canvas;
use crate::TextStyle;

/// What happens to glyphs that do not fit the layout box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextOverflow {
    /// Cut at the box edge
    Clip,
    /// Paint past the box edge
    Visible,
}

/// Line constraints applied during measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConstraints {
    pub overflow: TextOverflow,
    pub max_lines: usize,
    pub soft_wrap: bool,
}

impl LayoutConstraints {
    /// One line, no wrapping, clipped.
    pub const fn single_line() -> Self {
        Self {
            overflow: TextOverflow::Clip,
            max_lines: 1,
            soft_wrap: false,
        }
    }
}

impl Default for LayoutConstraints {
    fn default() -> Self {
        Self::single_line()
    }
}

/// Measured size in whole pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutSize {
    pub width: u32,
    pub height: u32,
}

impl LayoutSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Result of a measurement
pub trait TextLayout {
    /// Bounding box of the laid out text
    fn size(&self) -> LayoutSize;

    /// Style the text was measured with
    fn style(&self) -> &TextStyle;

    /// Paint with the layout's top-left corner at (`x`, `y`).
    fn paint(&self, canvas: &mut Canvas, x: i32, y: i32);
}

/// A text engine
pub trait TextMeasurer {
    type Layout: TextLayout;

    fn measure(
        &self,
        text: &str,
        style: &TextStyle,
        constraints: LayoutConstraints,
    ) -> Self::Layout;
}
