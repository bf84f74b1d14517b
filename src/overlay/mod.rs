//! Annotation overlay rendering.
//!
//! The renderer only sees normalized annotation geometry and a surface
//! handle; the surface's pixel size must equal the displayed image size so
//! the overlay lines up with it.

mod font;
mod renderer;
mod surface;

pub use font::BitmapFont;
pub use renderer::{label_rect, pixel_box, OverlayRenderer, OverlayStyle};
pub use surface::{CommandRecorder, DrawCommand, DrawingSurface, PixelRect, RasterSurface};
