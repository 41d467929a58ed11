//! Fixed-size canvas and fit-to-canvas placement
//!
//! Every input is drawn onto a 400x300 transparent canvas, scaled by
//! `min(400 / w, 300 / h)` and centered. Both slots and the output therefore
//! always share the same dimensions.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, RgbaImage};
use tracing::trace;

/// Canvas width in pixels
pub const CANVAS_WIDTH: u32 = 400;

/// Canvas height in pixels
pub const CANVAS_HEIGHT: u32 = 300;

/// Where a scaled image lands on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Left edge of the scaled image
    pub x: u32,
    /// Top edge of the scaled image
    pub y: u32,
    /// Scaled width
    pub width: u32,
    /// Scaled height
    pub height: u32,
}

impl Placement {
    /// Compute the aspect-preserving placement of a `width` x `height`
    /// source on a `canvas_width` x `canvas_height` canvas
    ///
    /// Returns `None` for an empty source.
    pub fn fit(width: u32, height: u32, canvas_width: u32, canvas_height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }

        let scale = f64::min(
            f64::from(canvas_width) / f64::from(width),
            f64::from(canvas_height) / f64::from(height),
        );
        let draw_width = scaled(width, scale, canvas_width);
        let draw_height = scaled(height, scale, canvas_height);

        Some(Self {
            x: (canvas_width - draw_width) / 2,
            y: (canvas_height - draw_height) / 2,
            width: draw_width,
            height: draw_height,
        })
    }
}

fn scaled(length: u32, scale: f64, limit: u32) -> u32 {
    // Float products of exact ratios can land a hair over the limit
    ((f64::from(length) * scale).round() as u32).clamp(1, limit)
}

/// A fully transparent canvas
pub fn blank_canvas() -> RgbaImage {
    RgbaImage::new(CANVAS_WIDTH, CANVAS_HEIGHT)
}

/// Scale `image` to fit the canvas, center it, and leave the rest transparent
pub fn fit_to_canvas(image: &DynamicImage) -> RgbaImage {
    let mut canvas = blank_canvas();
    let (width, height) = image.dimensions();

    let Some(placement) = Placement::fit(width, height, CANVAS_WIDTH, CANVAS_HEIGHT) else {
        return canvas;
    };
    trace!(?placement, width, height, "Fitting image to canvas");

    let resized = imageops::resize(
        image,
        placement.width,
        placement.height,
        FilterType::Triangle,
    );
    imageops::replace(
        &mut canvas,
        &resized,
        i64::from(placement.x),
        i64::from(placement.y),
    );
    canvas
}
