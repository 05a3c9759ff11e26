//! Deterministic measurer for unit tests
//!
//! Every character is a solid block half the font size wide. Stroke styles
//! pad the block the same way the fontdue backend does.

use crate::canvas::Canvas;
use crate::measure::{LayoutConstraints, LayoutSize, TextLayout, TextMeasurer};
use crate::{DrawStyle, TextStyle};
use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Default)]
pub struct BlockMeasurer {
    pub measure_calls: Cell<usize>,
    pub paint_calls: Rc<Cell<usize>>,
}

#[derive(Debug)]
pub struct BlockLayout {
    pub text: String,
    pub constraints: LayoutConstraints,
    style: TextStyle,
    size: LayoutSize,
    paint_calls: Rc<Cell<usize>>,
}

impl TextMeasurer for BlockMeasurer {
    type Layout = BlockLayout;

    fn measure(
        &self,
        text: &str,
        style: &TextStyle,
        constraints: LayoutConstraints,
    ) -> BlockLayout {
        self.measure_calls.set(self.measure_calls.get() + 1);

        let char_width = (style.font_size() * 0.5).round() as u32;
        let pad = match style.draw_style() {
            DrawStyle::Stroke { width } => (width / 2.0).ceil() as u32,
            DrawStyle::Fill => 0,
        };
        let size = LayoutSize::new(
            text.chars().count() as u32 * char_width + 2 * pad,
            style.font_size().round() as u32 + 2 * pad,
        );

        BlockLayout {
            text: text.to_string(),
            constraints,
            style: style.clone(),
            size,
            paint_calls: Rc::clone(&self.paint_calls),
        }
    }
}

impl TextLayout for BlockLayout {
    fn size(&self) -> LayoutSize {
        self.size
    }

    fn style(&self) -> &TextStyle {
        &self.style
    }

    fn paint(&self, canvas: &mut Canvas, x: i32, y: i32) {
        self.paint_calls.set(self.paint_calls.get() + 1);
        canvas.fill_rect(x, y, self.size.width, self.size.height, self.style.color());
    }
}
