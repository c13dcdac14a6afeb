//! Pixel lookup for reprojection.
//!
//! Reprojection samples the source image at the pixel nearest to the projected
//! coordinate; no interpolation between neighbours is performed.

mod nearest;

pub use nearest::{nearest_pixel, PixelRounding};
