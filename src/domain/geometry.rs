//! Geometric types for pointer input and marked regions
//!
//! Points and selection boxes live in display-surface space: the pixel grid
//! of the on-screen editing canvas, independent of the loaded image's native
//! resolution.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// A pointer position in display-surface space
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in display-surface space
///
/// `width` and `height` are never negative: boxes are built from two drag
/// anchors and normalized so `(x, y)` is the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SelectionBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl SelectionBox {
    /// Build a normalized box spanning two arbitrary anchor points
    pub fn from_anchors(a: Point, b: Point) -> Self {
        let (min_x, min_y, max_x, max_y) = normalize_rect(a.x, a.y, b.x, b.y);
        Self {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        }
    }

    /// True when the box covers no area
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Normalize min/max coordinates from arbitrary start/end points
#[inline]
pub fn normalize_rect(x1: f32, y1: f32, x2: f32, y2: f32) -> (f32, f32, f32, f32) {
    let (min_x, max_x) = if x1 < x2 { (x1, x2) } else { (x2, x1) };
    let (min_y, max_y) = if y1 < y2 { (y1, y2) } else { (y2, y1) };
    (min_x, min_y, max_x, max_y)
}

/// Rendered size of the display surface, in CSS-like logical pixels
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

impl SurfaceSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Both dimensions strictly positive and finite
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Whole-pixel size used when allocating a raster for this surface
    pub fn pixel_size(&self) -> Option<Resolution> {
        if !self.is_valid() {
            return None;
        }
        Resolution::new(self.width.ceil() as u32, self.height.ceil() as u32)
    }
}

impl From<Resolution> for SurfaceSize {
    fn from(r: Resolution) -> Self {
        Self::new(r.width() as f32, r.height() as f32)
    }
}

/// Non-zero pixel dimensions of a raster
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: NonZeroU32,
    pub height: NonZeroU32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Some(Self {
            width: NonZeroU32::new(width)?,
            height: NonZeroU32::new(height)?,
        })
    }

    /// Square resolution, the shape inpainting models expect
    pub fn square(side: NonZeroU32) -> Self {
        Self {
            width: side,
            height: side,
        }
    }

    /// Get the width as u32
    pub fn width(&self) -> u32 {
        self.width.get()
    }

    /// Get the height as u32
    pub fn height(&self) -> u32 {
        self.height.get()
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
