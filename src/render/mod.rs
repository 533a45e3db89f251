//! Raster module
//!
//! This module contains:
//! - Brush geometry shared between the live overlay and the mask
//! - Free-hand stroke rasterization using tiny-skia
//! - Mask compositing at the target resolution
//! - PNG encoding

pub mod encode;
pub mod geometry;
pub mod mask;
pub mod stroke;

pub use geometry::Brush;
pub use mask::{Mask, composite_mask};
pub use stroke::StrokeLayer;
