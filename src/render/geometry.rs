//! Brush geometry shared by the live stroke layer and the mask compositor
//!
//! Both sides must rasterize a free-hand path identically, otherwise the mask
//! would not match what the user saw while drawing.

use serde::{Deserialize, Serialize};
use tiny_skia::{LineCap, LineJoin, Paint, Stroke};

/// Brush defaults
pub mod brush {
    /// Stroke width in display pixels
    pub const WIDTH: f32 = 60.0;
    /// Opacity of the live overlay (0.0-1.0)
    pub const OPACITY: f32 = 0.2;
    /// Smallest usable stroke width
    pub const MIN_WIDTH: f32 = 1.0;
}

/// Mask colors
pub mod mask {
    /// Region to keep
    pub const PRESERVE: u8 = 0;
    /// Region to regenerate
    pub const EDIT: u8 = 255;
}

/// Round-capped brush used for free-hand marking
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brush {
    /// Stroke width in display pixels
    pub width: f32,
    /// Overlay opacity (0.0-1.0); only affects the live overlay
    pub opacity: f32,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            width: brush::WIDTH,
            opacity: brush::OPACITY,
        }
    }
}

impl Brush {
    /// Effective width, clamped so a misconfigured brush still paints
    pub fn effective_width(&self) -> f32 {
        if self.width.is_finite() {
            self.width.max(brush::MIN_WIDTH)
        } else {
            brush::WIDTH
        }
    }

    /// Translucent white paint for the overlay
    pub fn paint(&self) -> Paint<'static> {
        let alpha = (self.opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        let mut paint = Paint::default();
        // Fully transparent paint would make the stroke invisible to the mask
        paint.set_color_rgba8(255, 255, 255, alpha.max(1));
        paint.anti_alias = true;
        paint
    }

    pub fn stroke(&self) -> Stroke {
        Stroke {
            width: self.effective_width(),
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Default::default()
        }
    }
}
