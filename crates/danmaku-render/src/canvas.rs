//! Raster canvas
//!
//! A CPU-side RGBA surface with source-over blending. Text layouts paint
//! into it while a danmaku image is being composed, and the preview tool
//! uses one as its frame target.

use crate::bitmap::{BitmapError, DanmakuImage};
use crate::Color;
use image::{Rgba, RgbaImage};
use std::path::Path;
use tracing::{debug, trace};

/// Something a danmaku image can be drawn onto
pub trait DrawScope {
    /// Blit `image` with its top-left corner at (`x`, `y`).
    fn draw_image(&mut self, image: &DanmakuImage, x: f32, y: f32);
}

/// RGBA8 surface, straight alpha
#[derive(Debug, Clone)]
pub struct Canvas {
    pixels: RgbaImage,
}

impl Canvas {
    /// Create a fully transparent canvas
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
        }
    }

    /// Create a canvas filled with `color`
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, Rgba(color.to_rgba8())),
        }
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

    /// Pixel at (`x`, `y`), `None` outside the canvas
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixels.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Overwrite every pixel with `color`
    pub fn clear(&mut self, color: Color) {
        let value = Rgba(color.to_rgba8());
        for pixel in self.pixels.pixels_mut() {
            *pixel = value;
        }
    }

    /// Source-over blend a single pixel. Out-of-bounds writes are dropped.
    pub fn blend_pixel(&mut self, x: i32, y: i32, src: [u8; 4]) {
        if x < 0 || y < 0 || src[3] == 0 {
            return;
        }
        if let Some(dst) = self.pixels.get_pixel_mut_checked(x as u32, y as u32) {
            dst.0 = blend_over(src, dst.0);
        }
    }

    /// Paint an 8-bit coverage mask tinted with `color`.
    ///
    /// `coverage` is row-major, `width * height` bytes, placed with its
    /// top-left corner at (`x`, `y`).
    pub fn fill_coverage(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        coverage: &[u8],
        color: Color,
    ) {
        let [r, g, b, a] = color.to_rgba8();
        for row in 0..height {
            for col in 0..width {
                let idx = (row * width + col) as usize;
                let Some(&cov) = coverage.get(idx) else {
                    return;
                };
                if cov == 0 {
                    continue;
                }
                let alpha = (a as u32 * cov as u32 + 127) / 255;
                self.blend_pixel(x + col as i32, y + row as i32, [r, g, b, alpha as u8]);
            }
        }
    }

    /// Fill an axis-aligned rectangle
    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Color) {
        let src = color.to_rgba8();
        for row in 0..height as i32 {
            for col in 0..width as i32 {
                self.blend_pixel(x + col, y + row, src);
            }
        }
    }

    /// Blend another RGBA buffer with its top-left corner at (`x`, `y`).
    pub fn draw_pixels(&mut self, src: &RgbaImage, x: i32, y: i32) {
        for (col, row, pixel) in src.enumerate_pixels() {
            self.blend_pixel(x + col as i32, y + row as i32, pixel.0);
        }
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }

    /// Write the canvas as a PNG file
    pub fn save_png(&self, path: &Path) -> Result<(), BitmapError> {
        self.pixels
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| BitmapError::Write(e.to_string()))?;
        debug!(
            "Saved {}x{} canvas to {}",
            self.width(),
            self.height(),
            path.display()
        );
        Ok(())
    }
}

impl DrawScope for Canvas {
    fn draw_image(&mut self, image: &DanmakuImage, x: f32, y: f32) {
        let (px, py) = (x.round() as i32, y.round() as i32);
        trace!("Blitting {}x{} danmaku at ({}, {})", image.width(), image.height(), px, py);
        self.draw_pixels(image.pixels(), px, py);
    }
}

/// Straight-alpha source-over
fn blend_over(src: [u8; 4], dst: [u8; 4]) -> [u8; 4] {
    if src[3] == 255 {
        return src;
    }
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return [0, 0, 0, 0];
    }
    let channel = |s: u8, d: u8| {
        let v = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
        v.round().clamp(0.0, 255.0) as u8
    };
    [
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ]
}
