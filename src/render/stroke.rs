//! Free-hand stroke rasterization using tiny-skia
//!
//! The live stroke layer is the translucent overlay the user sees while
//! dragging. It is purely visual; the compositor re-renders the path with
//! [`render_stroke`] so the mask never depends on overlay state.

use tiny_skia::{PathBuilder, Pixmap, Transform};

use super::geometry::Brush;
use crate::domain::{Point, Resolution, StrokePath};
use crate::error::MaskError;

/// Allocate a transparent surface, failing instead of panicking on bad sizes
pub(crate) fn new_surface(size: Resolution) -> Result<Pixmap, MaskError> {
    Pixmap::new(size.width(), size.height()).ok_or(MaskError::Surface {
        width: size.width(),
        height: size.height(),
    })
}

/// Build a polyline path through the given points
///
/// Returns `None` for fewer than two points; a lone point has no segment for
/// tiny-skia to stroke.
fn build_polyline(points: &[Point]) -> Option<tiny_skia::Path> {
    let (first, rest) = points.split_first()?;
    if rest.is_empty() {
        return None;
    }
    let mut pb = PathBuilder::new();
    pb.move_to(first.x, first.y);
    for p in rest {
        pb.line_to(p.x, p.y);
    }
    pb.finish()
}

/// Paint a round dab of brush diameter centred on `p`
fn paint_dab(pixmap: &mut Pixmap, p: Point, brush: &Brush) {
    if let Some(circle) = PathBuilder::from_circle(p.x, p.y, brush.effective_width() * 0.5) {
        pixmap.fill_path(
            &circle,
            &brush.paint(),
            tiny_skia::FillRule::Winding,
            Transform::identity(),
            None,
        );
    }
}

/// Stroke `points` onto `pixmap` with the brush
fn paint_points(pixmap: &mut Pixmap, points: &[Point], brush: &Brush) {
    match build_polyline(points) {
        Some(path) => {
            pixmap.stroke_path(&path, &brush.paint(), &brush.stroke(), Transform::identity(), None)
        }
        None => {
            if let Some(&p) = points.first() {
                paint_dab(pixmap, p, brush);
            }
        }
    }
}

/// Render a whole stroke path onto a fresh display-sized surface
pub fn render_stroke(
    path: &StrokePath,
    display: Resolution,
    brush: &Brush,
) -> Result<Pixmap, MaskError> {
    let mut pixmap = new_surface(display)?;
    paint_points(&mut pixmap, path.points(), brush);
    Ok(pixmap)
}

/// Translucent overlay painted while the user drags free-hand
#[derive(Clone, Debug)]
pub struct StrokeLayer {
    pixmap: Pixmap,
    brush: Brush,
}

impl StrokeLayer {
    pub fn new(display: Resolution, brush: Brush) -> Result<Self, MaskError> {
        Ok(Self {
            pixmap: new_surface(display)?,
            brush,
        })
    }

    /// Clear all painted strokes
    pub fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    /// Paint the segment from `from` to `to`
    pub fn paint_segment(&mut self, from: Point, to: Point) {
        paint_points(&mut self.pixmap, &[from, to], &self.brush);
    }

    /// Paint a single dab, used when a stroke ends without moving
    pub fn paint_dab(&mut self, p: Point) {
        paint_dab(&mut self.pixmap, p, &self.brush);
    }

    /// Overlay the display draws over the image
    #[allow(dead_code)]
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }
}
