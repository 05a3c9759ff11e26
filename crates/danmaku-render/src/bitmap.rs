//! Danmaku Image
//!
//! The composited raster for one comment: outline pass underneath, fill pass
//! on top. Built once per [`StyledDanmaku`](crate::StyledDanmaku) and blitted
//! every frame after that.

use crate::canvas::Canvas;
use crate::measure::TextLayout;
use image::RgbaImage;
use std::io::Cursor;
use std::time::Instant;
use thiserror::Error;
use tracing::debug;

/// Errors from exporting danmaku rasters
#[derive(Debug, Error)]
pub enum BitmapError {
    #[error("Image encoding error: {0}")]
    Encode(String),

    #[error("Image write error: {0}")]
    Write(String),
}

/// A cached, ready-to-blit danmaku raster
#[derive(Debug)]
pub struct DanmakuImage {
    pixels: RgbaImage,
    prepared: bool,
}

impl DanmakuImage {
    pub(crate) fn new(pixels: RgbaImage) -> Self {
        Self {
            pixels,
            prepared: false,
        }
    }

    /// Mark the raster ready for upload to the rendering backend.
    pub fn prepare_to_draw(&mut self) {
        self.prepared = true;
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Raw RGBA pixels
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Encode as PNG
    pub fn encode_png(&self) -> Result<Vec<u8>, BitmapError> {
        let mut png_data = Vec::new();
        self.pixels
            .write_to(&mut Cursor::new(&mut png_data), image::ImageFormat::Png)
            .map_err(|e| BitmapError::Encode(e.to_string()))?;
        Ok(png_data)
    }
}

/// Composite the two text passes into one image.
///
/// The canvas is sized to the border layout, which carries the stroke
/// padding. The border is painted first at the origin; the solid pass goes
/// on top, shifted by half the size difference so both passes share a
/// centre. The result is flagged prepared before it is returned.
pub fn create_danmaku_image<L: TextLayout>(solid: &L, border: &L) -> DanmakuImage {
    let start = Instant::now();
    let border_size = border.size();
    let solid_size = solid.size();

    let mut canvas = Canvas::new(border_size.width.max(1), border_size.height.max(1));

    border.paint(&mut canvas, 0, 0);

    let dx = (border_size.width.saturating_sub(solid_size.width) / 2) as i32;
    let dy = (border_size.height.saturating_sub(solid_size.height) / 2) as i32;
    solid.paint(&mut canvas, dx, dy);

    let mut image = DanmakuImage::new(canvas.into_image());
    image.prepare_to_draw();

    debug!(
        "Created danmaku image {}x{} in {:?}",
        image.width(),
        image.height(),
        start.elapsed()
    );
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{BlockLayout, BlockMeasurer};
    use crate::{Color, DrawStyle, LayoutConstraints, TextMeasurer, TextStyle};

    #[test]
    fn test_border_painted_under_solid() {
        let measurer = BlockMeasurer::default();
        let solid = measurer.measure(
            "ab",
            &TextStyle::new(10.0).with_color(Color::WHITE),
            LayoutConstraints::single_line(),
        );
        let border = measurer.measure(
            "ab",
            &TextStyle::new(10.0)
                .with_color(Color::BLACK)
                .with_draw_style(DrawStyle::Stroke { width: 4.0 }),
            LayoutConstraints::single_line(),
        );

        let image = create_danmaku_image::<BlockLayout>(&solid, &border);

        assert_eq!(image.dimensions(), (border.size().width, border.size().height));
        assert!(image.is_prepared());

        // Stroke padding is 2px: the corner shows the outline only, the
        // centre shows the fill drawn over it.
        assert_eq!(image.pixels().get_pixel(0, 0).0, [0, 0, 0, 255]);
        let (cx, cy) = (image.width() / 2, image.height() / 2);
        assert_eq!(image.pixels().get_pixel(cx, cy).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_encode_png() {
        let image = DanmakuImage::new(RgbaImage::new(4, 2));
        let png = image.encode_png().unwrap();

        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 2));
        assert!(!image.is_prepared());
    }
}
