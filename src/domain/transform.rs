//! Display-surface to mask-space coordinate transform
//!
//! The mask has a fixed target resolution while pointer input arrives in the
//! coordinates of whatever size the display canvas was rendered at. Each axis
//! is scaled independently and nothing is rounded here; rounding happens only
//! when the compositor rasterizes.

use super::geometry::{Point, Resolution, SelectionBox, SurfaceSize};
use crate::error::MaskError;

/// Per-axis scale from display-surface space into mask space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleTransform {
    pub scale_x: f32,
    pub scale_y: f32,
}

impl ScaleTransform {
    /// Compute `target / display` for each axis
    ///
    /// A zero, negative, or non-finite display dimension is a precondition
    /// violation and yields [`MaskError::InvalidDisplaySize`].
    pub fn new(display: SurfaceSize, target: Resolution) -> Result<Self, MaskError> {
        if !display.is_valid() {
            return Err(MaskError::InvalidDisplaySize {
                width: display.width,
                height: display.height,
            });
        }
        Ok(Self {
            scale_x: target.width() as f32 / display.width,
            scale_y: target.height() as f32 / display.height,
        })
    }

    /// True when both axes map 1:1
    pub fn is_identity(&self) -> bool {
        self.scale_x == 1.0 && self.scale_y == 1.0
    }

    pub fn to_mask(&self, p: Point) -> Point {
        Point {
            x: p.x * self.scale_x,
            y: p.y * self.scale_y,
        }
    }

    /// Inverse of [`ScaleTransform::to_mask`], for mapping mask-space
    /// results back onto the display canvas
    #[allow(dead_code)]
    pub fn to_display(&self, p: Point) -> Point {
        Point {
            x: p.x / self.scale_x,
            y: p.y / self.scale_y,
        }
    }

    pub fn box_to_mask(&self, sel: SelectionBox) -> SelectionBox {
        let origin = self.to_mask(Point::new(sel.x, sel.y));
        SelectionBox {
            x: origin.x,
            y: origin.y,
            width: sel.width * self.scale_x,
            height: sel.height * self.scale_y,
        }
    }

    /// The same scale as a tiny-skia transform, for resampling whole surfaces
    pub fn as_skia(&self) -> tiny_skia::Transform {
        tiny_skia::Transform::from_scale(self.scale_x, self.scale_y)
    }
}
