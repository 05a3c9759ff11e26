//! Text Measurement with fontdue
//!
//! CPU-rasterized single-line text. Glyph coverage is cached per size inside
//! the measurer; layouts keep references to the cached glyphs and build
//! their coverage mask only when painted.

use crate::canvas::Canvas;
use crate::measure::{LayoutConstraints, LayoutSize, TextLayout, TextMeasurer, TextOverflow};
use crate::{DrawStyle, TextStyle};
use fontdue::{Font, FontSettings, Metrics};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, info};

/// Font loading errors
#[derive(Debug, Error)]
pub enum FontError {
    #[error("Failed to read font file: {0}")]
    Io(String),

    #[error("Failed to parse font: {0}")]
    Parse(String),
}

/// A rasterized glyph
#[derive(Debug)]
struct Glyph {
    metrics: Metrics,
    coverage: Vec<u8>,
}

/// A glyph positioned inside a layout, relative to the text origin
#[derive(Debug, Clone)]
struct PlacedGlyph {
    x: i32,
    y: i32,
    glyph: Rc<Glyph>,
}

/// Text measurer backed by a single fontdue font
pub struct FontdueMeasurer {
    font: Font,
    /// (char, size bits) -> glyph
    glyph_cache: RefCell<HashMap<(char, u32), Rc<Glyph>>>,
}

impl FontdueMeasurer {
    /// Load a font from memory
    pub fn from_bytes(data: &[u8]) -> Result<Self, FontError> {
        let font = Font::from_bytes(data, FontSettings::default())
            .map_err(|e| FontError::Parse(e.to_string()))?;

        info!("Loaded font with {} glyphs", font.glyph_count());

        Ok(Self {
            font,
            glyph_cache: RefCell::new(HashMap::new()),
        })
    }

    /// Load a TTF/OTF file
    pub fn from_file(path: &Path) -> Result<Self, FontError> {
        let data = std::fs::read(path).map_err(|e| FontError::Io(e.to_string()))?;
        debug!("Read font file {} ({} bytes)", path.display(), data.len());
        Self::from_bytes(&data)
    }

    /// Number of glyphs held in the cache
    pub fn cached_glyphs(&self) -> usize {
        self.glyph_cache.borrow().len()
    }

    /// Clear the glyph cache.
    ///
    /// The cache is keyed by (char, size) and never evicts on its own; hosts
    /// clear it when the font size changes or a video ends. Existing layouts
    /// keep the glyphs they reference.
    pub fn clear_cache(&self) {
        self.glyph_cache.borrow_mut().clear();
    }

    fn glyph(&self, c: char, px: f32) -> Rc<Glyph> {
        let key = (c, px.to_bits());
        if let Some(glyph) = self.glyph_cache.borrow().get(&key) {
            return Rc::clone(glyph);
        }

        let (metrics, coverage) = self.font.rasterize(c, px);
        let glyph = Rc::new(Glyph { metrics, coverage });
        self.glyph_cache.borrow_mut().insert(key, Rc::clone(&glyph));
        glyph
    }

    /// Ascent and descent in pixels; descent is negative
    fn line_extent(&self, px: f32) -> (f32, f32) {
        match self.font.horizontal_line_metrics(px) {
            Some(line) => (line.ascent, line.descent),
            None => (px * 0.8, -px * 0.2),
        }
    }
}

impl TextMeasurer for FontdueMeasurer {
    type Layout = FontdueLayout;

    fn measure(
        &self,
        text: &str,
        style: &TextStyle,
        constraints: LayoutConstraints,
    ) -> FontdueLayout {
        let px = style.font_size();
        let (ascent, descent) = self.line_extent(px);
        let baseline = ascent.ceil() as i32;

        // Single line: line breaks and other control characters are dropped
        // rather than wrapped.
        let mut glyphs = Vec::with_capacity(text.len());
        let mut pen_x = 0.0f32;
        for c in text.chars().filter(|c| !c.is_control()) {
            let glyph = self.glyph(c, px);
            let m = glyph.metrics;
            glyphs.push(PlacedGlyph {
                x: pen_x.round() as i32 + m.xmin,
                y: baseline - (m.height as i32 + m.ymin),
                glyph: Rc::clone(&glyph),
            });
            pen_x += m.advance_width;
        }

        let bold_extra = u32::from(style.is_bold());
        let mut content_width = pen_x.ceil().max(0.0) as u32 + bold_extra;
        let mut content_height = (ascent - descent).ceil().max(1.0) as u32;

        let underline = style.is_underlined().then(|| {
            let thickness = (px / 16.0).round().max(1.0) as u32;
            let y = baseline + thickness as i32;
            content_height = content_height.max((y as u32) + thickness);
            Underline { y, thickness }
        });
        if text.is_empty() {
            content_width = 0;
        }

        let pad = stroke_padding(style);

        debug!(
            "Measured {:?} at {}px: {}x{} (pad {})",
            text, px, content_width, content_height, pad
        );

        FontdueLayout {
            style: style.clone(),
            overflow: constraints.overflow,
            glyphs,
            underline,
            content_width,
            content_height,
            pad,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Underline {
    y: i32,
    thickness: u32,
}

/// A measured line of text
#[derive(Debug, Clone)]
pub struct FontdueLayout {
    style: TextStyle,
    overflow: TextOverflow,
    glyphs: Vec<PlacedGlyph>,
    underline: Option<Underline>,
    content_width: u32,
    content_height: u32,
    /// Stroke padding on every side
    pad: u32,
}

impl FontdueLayout {
    /// Build the coverage mask of the whole layout box plus any overhang.
    fn coverage(&self) -> Mask {
        let pad = self.pad as i32;

        // Ink bounds in content coordinates
        let mut min_x = 0;
        let mut min_y = 0;
        let mut max_x = self.content_width as i32;
        let mut max_y = self.content_height as i32;
        for placed in &self.glyphs {
            let m = placed.glyph.metrics;
            min_x = min_x.min(placed.x);
            min_y = min_y.min(placed.y);
            max_x = max_x.max(placed.x + m.width as i32);
            max_y = max_y.max(placed.y + m.height as i32);
        }

        // Content origin inside the mask. The mask's own top-left sits at
        // (min_x, min_y) in layout-box coordinates.
        let ox = pad - min_x;
        let oy = pad - min_y;
        let mut mask = Mask::new(
            (max_x - min_x + 2 * pad) as u32,
            (max_y - min_y + 2 * pad) as u32,
            min_x,
            min_y,
        );

        for placed in &self.glyphs {
            let m = placed.glyph.metrics;
            mask.max_blit(
                placed.x + ox,
                placed.y + oy,
                m.width as u32,
                m.height as u32,
                &placed.glyph.coverage,
            );
        }

        if let Some(line) = self.underline {
            mask.fill_rect(ox, line.y + oy, self.content_width, line.thickness);
        }

        if self.style.is_bold() {
            mask = mask.dilate_horizontal(1);
        }

        if let DrawStyle::Stroke { .. } = self.style.draw_style() {
            mask = mask.dilate(self.pad);
        }

        mask
    }
}

impl TextLayout for FontdueLayout {
    fn size(&self) -> LayoutSize {
        LayoutSize::new(
            self.content_width + 2 * self.pad,
            self.content_height + 2 * self.pad,
        )
    }

    fn style(&self) -> &TextStyle {
        &self.style
    }

    fn paint(&self, canvas: &mut Canvas, x: i32, y: i32) {
        let mask = self.coverage();
        let mask = match self.overflow {
            TextOverflow::Clip => {
                let size = self.size();
                mask.crop(size.width, size.height)
            }
            TextOverflow::Visible => mask,
        };

        canvas.fill_coverage(
            x + mask.origin_x,
            y + mask.origin_y,
            mask.width,
            mask.height,
            &mask.data,
            self.style.color(),
        );
    }
}

fn stroke_padding(style: &TextStyle) -> u32 {
    match style.draw_style() {
        DrawStyle::Stroke { width } if width > 0.0 => (width / 2.0).ceil() as u32,
        _ => 0,
    }
}

/// 8-bit coverage mask positioned relative to a layout's top-left corner
#[derive(Debug, Clone, PartialEq)]
struct Mask {
    width: u32,
    height: u32,
    origin_x: i32,
    origin_y: i32,
    data: Vec<u8>,
}

impl Mask {
    fn new(width: u32, height: u32, origin_x: i32, origin_y: i32) -> Self {
        Self {
            width,
            height,
            origin_x,
            origin_y,
            data: vec![0; (width * height) as usize],
        }
    }

    fn get(&self, x: i32, y: i32) -> u8 {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return 0;
        }
        self.data[(y as u32 * self.width + x as u32) as usize]
    }

    /// Combine a glyph bitmap into the mask, keeping the maximum coverage.
    fn max_blit(&mut self, x: i32, y: i32, width: u32, height: u32, src: &[u8]) {
        for row in 0..height as i32 {
            for col in 0..width as i32 {
                let (tx, ty) = (x + col, y + row);
                if tx < 0 || ty < 0 || tx >= self.width as i32 || ty >= self.height as i32 {
                    continue;
                }
                let value = src[(row as u32 * width + col as u32) as usize];
                let idx = (ty as u32 * self.width + tx as u32) as usize;
                self.data[idx] = self.data[idx].max(value);
            }
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32) {
        let solid = vec![255u8; (width * height) as usize];
        self.max_blit(x, y, width, height, &solid);
    }

    /// Grow coverage by `radius` pixels to the right.
    fn dilate_horizontal(&self, radius: u32) -> Mask {
        let r = radius as i32;
        let mut out = Mask::new(self.width + radius, self.height, self.origin_x, self.origin_y);
        for y in 0..out.height as i32 {
            for x in 0..out.width as i32 {
                let value = (0..=r).map(|dx| self.get(x - dx, y)).max().unwrap_or(0);
                out.data[(y as u32 * out.width + x as u32) as usize] = value;
            }
        }
        out
    }

    /// Grow coverage by a disc of `radius` pixels.
    ///
    /// The mask must already have `radius` pixels of margin on every side.
    fn dilate(&self, radius: u32) -> Mask {
        if radius == 0 {
            return self.clone();
        }
        let r = radius as i32;
        let offsets: Vec<(i32, i32)> = (-r..=r)
            .flat_map(|dy| (-r..=r).map(move |dx| (dx, dy)))
            .filter(|(dx, dy)| dx * dx + dy * dy <= r * r)
            .collect();

        let mut out = Mask::new(self.width, self.height, self.origin_x, self.origin_y);
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let mut value = 0u8;
                for &(dx, dy) in &offsets {
                    value = value.max(self.get(x + dx, y + dy));
                    if value == 255 {
                        break;
                    }
                }
                out.data[(y as u32 * self.width + x as u32) as usize] = value;
            }
        }
        out
    }

    /// Keep only the part inside the `width` x `height` layout box.
    fn crop(&self, width: u32, height: u32) -> Mask {
        let mut out = Mask::new(width, height, 0, 0);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                let value = self.get(x - self.origin_x, y - self.origin_y);
                out.data[(y as u32 * width + x as u32) as usize] = value;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, TextDecoration};

    fn dot_mask() -> Mask {
        let mut mask = Mask::new(7, 7, 0, 0);
        mask.data[3 * 7 + 3] = 255;
        mask
    }

    #[test]
    fn test_dilate_disc() {
        let grown = dot_mask().dilate(2);

        assert_eq!(grown.get(3, 3), 255);
        assert_eq!(grown.get(1, 3), 255);
        assert_eq!(grown.get(3, 5), 255);
        // Corners of the 5x5 square fall outside the disc
        assert_eq!(grown.get(1, 1), 0);
        assert_eq!(grown.get(0, 3), 0);
    }

    #[test]
    fn test_dilate_horizontal() {
        let grown = dot_mask().dilate_horizontal(1);

        assert_eq!(grown.width, 8);
        assert_eq!(grown.get(3, 3), 255);
        assert_eq!(grown.get(4, 3), 255);
        assert_eq!(grown.get(2, 3), 0);
    }

    #[test]
    fn test_crop_respects_origin() {
        let mut mask = Mask::new(4, 4, -1, -1);
        mask.data[5] = 200; // (1, 1) in mask space is (0, 0) in layout space

        let cropped = mask.crop(2, 2);
        assert_eq!(cropped.get(0, 0), 200);
        assert_eq!(cropped.get(1, 1), 0);
    }

    #[test]
    fn test_stroke_padding() {
        let fill = TextStyle::new(18.0);
        let stroke = TextStyle::new(18.0).with_draw_style(DrawStyle::Stroke { width: 3.0 });

        assert_eq!(stroke_padding(&fill), 0);
        assert_eq!(stroke_padding(&stroke), 2);
    }

    /// DejaVu Sans Mono, see fonts/LICENSE-DejaVu
    const TEST_FONT: &[u8] = include_bytes!("fonts/DejaVuSansMono.ttf");

    fn test_measurer() -> FontdueMeasurer {
        FontdueMeasurer::from_bytes(TEST_FONT).unwrap()
    }

    #[test]
    fn test_measure_line() {
        let measurer = test_measurer();
        let style = TextStyle::new(18.0).with_color(Color::WHITE);

        let short = measurer.measure("Hi", &style, LayoutConstraints::single_line());
        let long = measurer.measure("Hello danmaku", &style, LayoutConstraints::single_line());

        assert!(short.size().width > 0);
        assert!(long.size().width > short.size().width);
        assert_eq!(short.size().height, long.size().height);

        // Line breaks are dropped, not wrapped
        let broken = measurer.measure("H\ni", &style, LayoutConstraints::single_line());
        assert_eq!(broken.size(), short.size());

        let empty = measurer.measure("", &style, LayoutConstraints::single_line());
        assert_eq!(empty.size().width, 0);
    }

    #[test]
    fn test_stroke_and_bold_grow_layout() {
        let measurer = test_measurer();
        let style = TextStyle::new(18.0).with_color(Color::WHITE);
        let plain = measurer.measure("Hi", &style, LayoutConstraints::single_line());

        let bordered = measurer.measure(
            "Hi",
            &style.clone().with_draw_style(DrawStyle::Stroke { width: 4.0 }),
            LayoutConstraints::single_line(),
        );
        assert_eq!(bordered.size().width, plain.size().width + 4);
        assert_eq!(bordered.size().height, plain.size().height + 4);

        let bold = measurer.measure(
            "Hi",
            &style.with_weight(700),
            LayoutConstraints::single_line(),
        );
        assert_eq!(bold.size().width, plain.size().width + 1);
    }

    #[test]
    fn test_underline_painted() {
        let measurer = test_measurer();
        let layout = measurer.measure(
            "Hi",
            &TextStyle::new(18.0)
                .with_color(Color::WHITE)
                .with_decoration(TextDecoration::Underline),
            LayoutConstraints::single_line(),
        );
        let line = layout.underline.expect("underline measured");

        let mut canvas = Canvas::new(layout.size().width, layout.size().height);
        layout.paint(&mut canvas, 0, 0);

        let last = layout.size().width - 1;
        assert_eq!(canvas.pixel(0, line.y as u32), Some([255, 255, 255, 255]));
        assert_eq!(canvas.pixel(last, line.y as u32), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_clipped_paint_stays_in_box() {
        let measurer = test_measurer();
        let layout = measurer.measure(
            "Wj@",
            &TextStyle::new(24.0)
                .with_color(Color::WHITE)
                .with_draw_style(DrawStyle::Stroke { width: 6.0 }),
            LayoutConstraints::single_line(),
        );
        let size = layout.size();

        let mut canvas = Canvas::new(size.width + 20, size.height + 20);
        layout.paint(&mut canvas, 10, 10);

        let mut inked = false;
        for (x, y, pixel) in canvas.as_image().enumerate_pixels() {
            if pixel.0[3] == 0 {
                continue;
            }
            inked = true;
            assert!((10..10 + size.width).contains(&x), "ink at x={x}");
            assert!((10..10 + size.height).contains(&y), "ink at y={y}");
        }
        assert!(inked);
    }

    #[test]
    fn test_glyph_cache() {
        let measurer = test_measurer();
        let style = TextStyle::new(18.0);

        measurer.measure("abc", &style, LayoutConstraints::single_line());
        assert_eq!(measurer.cached_glyphs(), 3);

        measurer.measure("cab", &style, LayoutConstraints::single_line());
        assert_eq!(measurer.cached_glyphs(), 3);

        measurer.measure("abc", &TextStyle::new(20.0), LayoutConstraints::single_line());
        assert_eq!(measurer.cached_glyphs(), 6);

        measurer.clear_cache();
        assert_eq!(measurer.cached_glyphs(), 0);

        // Layouts measured before the clear keep their glyphs alive
        let layout = measurer.measure("abc", &style, LayoutConstraints::single_line());
        measurer.clear_cache();
        let mut canvas = Canvas::new(layout.size().width, layout.size().height);
        layout.paint(&mut canvas, 0, 0);
        assert!(canvas.as_image().pixels().any(|p| p.0[3] > 0));
    }

    #[test]
    fn test_invalid_font_bytes() {
        assert!(matches!(
            FontdueMeasurer::from_bytes(b"not a font"),
            Err(FontError::Parse(_))
        ));
        assert!(matches!(
            FontdueMeasurer::from_file(Path::new("/nonexistent/font.ttf")),
            Err(FontError::Io(_))
        ));
    }
}
