use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::font::BitmapFont;
use super::surface::{CommandRecorder, DrawingSurface, PixelRect, RasterSurface};
use crate::report::{Annotation, Color};
use crate::SurfaceError;

const DEFAULT_STROKE_WIDTH: u32 = 3;
const DEFAULT_LABEL_PADDING: u32 = 5;
const DEFAULT_FONT_SCALE: u32 = 2;

/// Fixed drawing parameters for one overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayStyle {
    pub stroke_width: u32,
    pub label_padding: u32,
    pub font_scale: u32,
    pub text_color: Color,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            stroke_width: DEFAULT_STROKE_WIDTH,
            label_padding: DEFAULT_LABEL_PADDING,
            font_scale: DEFAULT_FONT_SCALE,
            text_color: Color::WHITE,
        }
    }
}

/// Scale a normalized annotation to surface pixels.
pub fn pixel_box(annotation: &Annotation, surface_width: u32, surface_height: u32) -> PixelRect {
    let w = surface_width as f64;
    let h = surface_height as f64;
    PixelRect::new(
        annotation.x * w,
        annotation.y * h,
        annotation.width * w,
        annotation.height * h,
    )
}

/// Label background for a box: directly above its top edge, or just inside
/// the box when there is no room above.
pub fn label_rect(bbox: PixelRect, text_width: f64, text_height: f64, padding: f64) -> PixelRect {
    let width = text_width + 2.0 * padding;
    let height = text_height + 2.0 * padding;
    let above = bbox.y - height;
    let y = if above < 0.0 { bbox.y } else { above };
    PixelRect::new(bbox.x, y, width, height)
}

pub struct OverlayRenderer {
    style: OverlayStyle,
}

impl OverlayRenderer {
    pub fn new(style: OverlayStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &OverlayStyle {
        &self.style
    }

    pub fn font(&self) -> BitmapFont {
        BitmapFont::new(self.style.font_scale)
    }

    /// Blank raster layer using this renderer's font.
    pub fn raster_surface(&self, width: u32, height: u32) -> RasterSurface {
        RasterSurface::new(width, height, self.font())
    }

    pub fn recorder(&self, width: u32, height: u32) -> CommandRecorder {
        CommandRecorder::new(width, height, self.font())
    }

    /// Clear `surface` and draw every annotation onto it.
    ///
    /// Fails with `SurfaceError` on a zero-sized surface and with
    /// `ValidationError` on an out-of-bounds annotation; the surface is left
    /// untouched in both cases.
    pub fn render<S>(&self, annotations: &[Annotation], surface: &mut S) -> Result<()>
    where
        S: DrawingSurface + ?Sized,
    {
        let (width, height) = (surface.width(), surface.height());
        if width == 0 || height == 0 {
            return Err(SurfaceError::new(
                "EMPTY_SURFACE",
                format!(
                    "cannot render onto a {}x{} surface; measure the image first",
                    width, height
                ),
            )
            .into());
        }
        for annotation in annotations {
            annotation.validate()?;
        }

        surface.clear();
        let padding = self.style.label_padding as f64;
        let text_height = surface.text_height();
        for annotation in annotations {
            let bbox = pixel_box(annotation, width, height);
            surface.stroke_rect(bbox, annotation.color, self.style.stroke_width);

            let text_width = surface.measure_text(&annotation.label);
            let label = label_rect(bbox, text_width, text_height, padding);
            surface.fill_rect(label, annotation.color);
            surface.fill_text(
                &annotation.label,
                label.x + padding,
                label.y + padding,
                self.style.text_color,
            );
        }
        log::debug!(
            "rendered {} annotations onto {}x{} overlay",
            annotations.len(),
            width,
            height
        );
        Ok(())
    }
}

impl Default for OverlayRenderer {
    fn default() -> Self {
        Self::new(OverlayStyle::default())
    }
}
