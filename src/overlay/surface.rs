use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use serde::Serialize;
use std::path::Path;

use super::font::{BitmapFont, GLYPH_WIDTH};
use crate::report::Color;

/// Axis-aligned rectangle in surface pixels. Not rounded.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// A pixel-sized target the overlay renderer draws on.
///
/// Text metrics belong to the surface, the same way a 2D canvas context
/// measures text in its current font.
pub trait DrawingSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Reset every pixel to fully transparent.
    fn clear(&mut self);

    /// Outline `rect`, centering a line of `stroke_width` pixels on its edges.
    fn stroke_rect(&mut self, rect: PixelRect, color: Color, stroke_width: u32);

    fn fill_rect(&mut self, rect: PixelRect, color: Color);

    fn measure_text(&self, text: &str) -> f64;

    fn text_height(&self) -> f64;

    /// Draw `text` with its top-left corner at `(x, y)`.
    fn fill_text(&mut self, text: &str, x: f64, y: f64, color: Color);
}

// ----------------------------------------------------------------------------
// RasterSurface: RGBA pixel buffer
// ----------------------------------------------------------------------------

/// Transparent RGBA layer sized to the displayed image.
pub struct RasterSurface {
    image: RgbaImage,
    font: BitmapFont,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32, font: BitmapFont) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            font,
        }
    }

    /// Surface matching the pixel size of the image at `path`.
    pub fn matching_image(path: &Path, font: BitmapFont) -> Result<Self> {
        let (width, height) = image::image_dimensions(path)
            .with_context(|| format!("reading image dimensions of {}", path.display()))?;
        Ok(Self::new(width, height, font))
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.image
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("writing overlay to {}", path.display()))
    }

    /// Paint the half-open pixel span `[x0, x1) x [y0, y1)`, clipped to the surface.
    fn fill_span(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Color) {
        let x0 = x0.max(0);
        let y0 = y0.max(0);
        let x1 = x1.min(self.image.width() as i64);
        let y1 = y1.min(self.image.height() as i64);
        for y in y0..y1 {
            for x in x0..x1 {
                let dst = self.image.get_pixel_mut(x as u32, y as u32);
                *dst = blend(*dst, color);
            }
        }
    }
}

impl DrawingSurface for RasterSurface {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = Rgba(Color::TRANSPARENT.to_rgba());
        }
    }

    fn stroke_rect(&mut self, rect: PixelRect, color: Color, stroke_width: u32) {
        let half = stroke_width as f64 / 2.0;
        let (ox0, oy0) = (snap(rect.x - half), snap(rect.y - half));
        let (ox1, oy1) = (snap(rect.right() + half), snap(rect.bottom() + half));
        let (ix0, iy0) = (snap(rect.x + half), snap(rect.y + half));
        let (ix1, iy1) = (snap(rect.right() - half), snap(rect.bottom() - half));

        if ix0 >= ix1 || iy0 >= iy1 {
            self.fill_span(ox0, oy0, ox1, oy1, color);
            return;
        }
        self.fill_span(ox0, oy0, ox1, iy0, color);
        self.fill_span(ox0, iy1, ox1, oy1, color);
        self.fill_span(ox0, iy0, ix0, iy1, color);
        self.fill_span(ix1, iy0, ox1, iy1, color);
    }

    fn fill_rect(&mut self, rect: PixelRect, color: Color) {
        self.fill_span(
            snap(rect.x),
            snap(rect.y),
            snap(rect.right()),
            snap(rect.bottom()),
            color,
        );
    }

    fn measure_text(&self, text: &str) -> f64 {
        self.font.measure(text) as f64
    }

    fn text_height(&self) -> f64 {
        self.font.line_height() as f64
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, color: Color) {
        let scale = self.font.scale() as i64;
        let (origin_x, origin_y) = (snap(x), snap(y));
        let cells: Vec<(u32, [u8; 7])> = self.font.layout(text).collect();
        for (offset, rows) in cells {
            let cell_x = origin_x + offset as i64;
            for (row, &bits) in rows.iter().enumerate() {
                for col in 0..GLYPH_WIDTH as i64 {
                    if bits & (0x10u8 >> col) == 0 {
                        continue;
                    }
                    let px = cell_x + col * scale;
                    let py = origin_y + row as i64 * scale;
                    self.fill_span(px, py, px + scale, py + scale, color);
                }
            }
        }
    }
}

fn snap(v: f64) -> i64 {
    v.round() as i64
}

/// Source-over compositing of `src` onto `dst`.
fn blend(dst: Rgba<u8>, src: Color) -> Rgba<u8> {
    match src.a {
        0xff => Rgba(src.to_rgba()),
        0 => dst,
        _ => {
            let sa = src.a as f32 / 255.0;
            let da = dst.0[3] as f32 / 255.0;
            let out_a = sa + da * (1.0 - sa);
            let channel = |s: u8, d: u8| {
                let value = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
                value.round().clamp(0.0, 255.0) as u8
            };
            Rgba([
                channel(src.r, dst.0[0]),
                channel(src.g, dst.0[1]),
                channel(src.b, dst.0[2]),
                (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
            ])
        }
    }
}

// ----------------------------------------------------------------------------
// CommandRecorder: display-list surface
// ----------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear,
    StrokeRect {
        rect: PixelRect,
        color: Color,
        stroke_width: u32,
    },
    FillRect {
        rect: PixelRect,
        color: Color,
    },
    FillText {
        text: String,
        x: f64,
        y: f64,
        color: Color,
    },
}

/// Records draw calls instead of rasterizing them.
///
/// Presenters that draw with their own toolkit replay the command list;
/// `clear` discards everything recorded so far.
pub struct CommandRecorder {
    width: u32,
    height: u32,
    font: BitmapFont,
    commands: Vec<DrawCommand>,
}

impl CommandRecorder {
    pub fn new(width: u32, height: u32, font: BitmapFont) -> Self {
        Self {
            width,
            height,
            font,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Stroked rectangles in draw order.
    pub fn boxes(&self) -> Vec<PixelRect> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::StrokeRect { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect()
    }

    /// Filled rectangles (label backgrounds) in draw order.
    pub fn label_backgrounds(&self) -> Vec<PixelRect> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::FillRect { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect()
    }
}

impl DrawingSurface for CommandRecorder {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn stroke_rect(&mut self, rect: PixelRect, color: Color, stroke_width: u32) {
        self.commands.push(DrawCommand::StrokeRect {
            rect,
            color,
            stroke_width,
        });
    }

    fn fill_rect(&mut self, rect: PixelRect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn measure_text(&self, text: &str) -> f64 {
        self.font.measure(text) as f64
    }

    fn text_height(&self) -> f64 {
        self.font.line_height() as f64
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, color: Color) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            x,
            y,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::rgb(0xff, 0, 0);

    #[test]
    fn stroke_leaves_interior_transparent() {
        let mut surface = RasterSurface::new(20, 20, BitmapFont::new(1));
        surface.stroke_rect(PixelRect::new(4.0, 4.0, 10.0, 10.0), RED, 2);
        assert_eq!(surface.pixel(4, 4), Some(RED.to_rgba()));
        assert_eq!(surface.pixel(3, 9), Some(RED.to_rgba()));
        assert_eq!(surface.pixel(9, 9), Some([0, 0, 0, 0]));
        assert_eq!(surface.pixel(1, 1), Some([0, 0, 0, 0]));
    }

    #[test]
    fn fill_clips_to_surface() {
        let mut surface = RasterSurface::new(4, 4, BitmapFont::new(1));
        surface.fill_rect(PixelRect::new(-2.0, -2.0, 100.0, 3.0), RED);
        assert_eq!(surface.pixel(3, 0), Some(RED.to_rgba()));
        assert_eq!(surface.pixel(0, 1), Some([0, 0, 0, 0]));
    }

    #[test]
    fn clear_resets_pixels() {
        let mut surface = RasterSurface::new(4, 4, BitmapFont::new(1));
        surface.fill_rect(PixelRect::new(0.0, 0.0, 4.0, 4.0), RED);
        surface.clear();
        assert!(surface.image().pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn text_sets_glyph_pixels() {
        let mut surface = RasterSurface::new(10, 10, BitmapFont::new(1));
        surface.fill_text("-", 0.0, 0.0, Color::WHITE);
        // '-' is a full middle row.
        for x in 0..5 {
            assert_eq!(surface.pixel(x, 3), Some([0xff; 4]));
        }
        assert_eq!(surface.pixel(0, 2), Some([0, 0, 0, 0]));
    }

    #[test]
    fn translucent_fill_blends_over_transparent() {
        let mut surface = RasterSurface::new(1, 1, BitmapFont::new(1));
        let half = Color { a: 0x80, ..RED };
        surface.fill_rect(PixelRect::new(0.0, 0.0, 1.0, 1.0), half);
        assert_eq!(surface.pixel(0, 0), Some([0xff, 0, 0, 0x80]));
    }

    #[test]
    fn recorder_clear_drops_history() {
        let mut recorder = CommandRecorder::new(10, 10, BitmapFont::new(1));
        recorder.fill_rect(PixelRect::new(0.0, 0.0, 1.0, 1.0), RED);
        recorder.clear();
        assert_eq!(recorder.commands(), &[DrawCommand::Clear]);
    }
}
