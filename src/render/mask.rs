//! Mask compositing
//!
//! Turns a marked region in display-surface space into a binary mask at the
//! fixed target resolution the inpainting service expects. Intermediate
//! surfaces live only for the duration of one call.

use image::{GrayImage, Luma};
use tiny_skia::{FilterQuality, Paint, Pixmap, PixmapPaint, Transform};

use super::encode::encode_gray_png;
use super::geometry::{Brush, mask};
use super::stroke::{new_surface, render_stroke};
use crate::domain::{Region, Resolution, ScaleTransform, SelectionBox, StrokePath, SurfaceSize};
use crate::error::MaskError;

/// Binary mask: [`mask::EDIT`] marks pixels to regenerate, [`mask::PRESERVE`]
/// everything else
#[derive(Clone, Debug, PartialEq)]
pub struct Mask {
    image: GrayImage,
}

impl Mask {
    /// Threshold a coverage surface: any non-transparent pixel becomes "edit"
    fn from_coverage(coverage: &Pixmap) -> Self {
        let mut image =
            GrayImage::from_pixel(coverage.width(), coverage.height(), Luma([mask::PRESERVE]));
        for (dst, src) in image.pixels_mut().zip(coverage.pixels()) {
            if src.alpha() > 0 {
                *dst = Luma([mask::EDIT]);
            }
        }
        Self { image }
    }

    /// Number of pixels marked for regeneration
    pub fn edit_pixel_count(&self) -> usize {
        self.image.pixels().filter(|p| p.0[0] == mask::EDIT).count()
    }

    pub fn as_image(&self) -> &GrayImage {
        &self.image
    }

    /// PNG bytes for upload
    pub fn to_png(&self) -> Result<Vec<u8>, MaskError> {
        Ok(encode_gray_png(self.as_image())?)
    }
}

/// Fill the scaled selection box onto the coverage surface
fn fill_selection(coverage: &mut Pixmap, sel: SelectionBox, transform: &ScaleTransform) {
    if sel.is_empty() {
        return;
    }
    let scaled = transform.box_to_mask(sel);
    let Some(rect) = tiny_skia::Rect::from_xywh(scaled.x, scaled.y, scaled.width, scaled.height)
    else {
        return;
    };

    let mut paint = Paint::default();
    paint.set_color_rgba8(255, 255, 255, 255);
    paint.anti_alias = false;
    coverage.fill_rect(rect, &paint, Transform::identity(), None);
}

/// Render the stroke at display size, then resample it onto the coverage surface
fn draw_stroke(
    coverage: &mut Pixmap,
    path: &StrokePath,
    display: SurfaceSize,
    transform: &ScaleTransform,
    brush: &Brush,
) -> Result<(), MaskError> {
    let layer_size = display.pixel_size().ok_or(MaskError::InvalidDisplaySize {
        width: display.width,
        height: display.height,
    })?;
    let layer = render_stroke(path, layer_size, brush)?;

    let quality = if transform.is_identity() {
        FilterQuality::Nearest
    } else {
        FilterQuality::Bilinear
    };
    let paint = PixmapPaint {
        quality,
        ..Default::default()
    };
    coverage.draw_pixmap(0, 0, layer.as_ref(), &paint, transform.as_skia(), None);
    Ok(())
}

/// Rasterize `region` into a mask of exactly `target` resolution
///
/// `display` is the size the editing canvas was rendered at, which is the
/// coordinate space of the region. With no region the mask is all-preserve.
pub fn composite_mask(
    region: Option<Region<'_>>,
    display: SurfaceSize,
    target: Resolution,
    brush: &Brush,
) -> Result<Mask, MaskError> {
    let transform = ScaleTransform::new(display, target)?;
    let mut coverage = new_surface(target)?;

    match region {
        Some(Region::Selection(sel)) => fill_selection(&mut coverage, sel, &transform),
        Some(Region::Stroke(path)) => {
            draw_stroke(&mut coverage, path, display, &transform, brush)?
        }
        None => {}
    }

    let mask = Mask::from_coverage(&coverage);
    log::debug!(
        "Composited {} mask: {} of {} pixels marked (scale {:.3}x{:.3})",
        target,
        mask.edit_pixel_count(),
        target.width() as u64 * target.height() as u64,
        transform.scale_x,
        transform.scale_y
    );
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Point;

    impl Mask {
        fn blank(target: Resolution) -> Self {
            Self {
                image: GrayImage::from_pixel(
                    target.width(),
                    target.height(),
                    Luma([mask::PRESERVE]),
                ),
            }
        }

        fn resolution(&self) -> Option<Resolution> {
            Resolution::new(self.image.width(), self.image.height())
        }

        fn is_edit(&self, x: u32, y: u32) -> bool {
            self.image
                .get_pixel_checked(x, y)
                .is_some_and(|p| p.0[0] == mask::EDIT)
        }
    }

    fn target() -> Resolution {
        Resolution::new(512, 512).unwrap()
    }

    fn assert_binary(mask: &Mask) {
        assert!(
            mask.as_image()
                .pixels()
                .all(|p| p.0[0] == mask::EDIT || p.0[0] == mask::PRESERVE)
        );
    }

    #[test]
    fn test_rectangle_fills_exact_pixels() {
        let sel = SelectionBox::from_anchors(Point::new(100.0, 100.0), Point::new(200.0, 250.0));
        assert_eq!(
            sel,
            SelectionBox {
                x: 100.0,
                y: 100.0,
                width: 100.0,
                height: 150.0
            }
        );

        let mask = composite_mask(
            Some(Region::Selection(sel)),
            SurfaceSize::new(512.0, 512.0),
            target(),
            &Brush::default(),
        )
        .unwrap();

        assert_eq!(mask.as_image().dimensions(), (512, 512));
        assert_binary(&mask);
        for y in 0..512 {
            for x in 0..512 {
                let inside = (100..200).contains(&x) && (100..250).contains(&y);
                assert_eq!(mask.is_edit(x, y), inside, "pixel ({}, {})", x, y);
            }
        }
        assert_eq!(mask.edit_pixel_count(), 100 * 150);
    }

    #[test]
    fn test_rectangle_scales_with_display() {
        // 256x256 display onto 512x512 target doubles every coordinate
        let sel = SelectionBox::from_anchors(Point::new(10.0, 20.0), Point::new(30.0, 40.0));
        let mask = composite_mask(
            Some(Region::Selection(sel)),
            SurfaceSize::new(256.0, 256.0),
            target(),
            &Brush::default(),
        )
        .unwrap();
        assert!(mask.is_edit(20, 40));
        assert!(mask.is_edit(59, 79));
        assert!(!mask.is_edit(60, 40));
        assert!(!mask.is_edit(19, 40));
        assert_eq!(mask.edit_pixel_count(), 40 * 40);
    }

    #[test]
    fn test_mask_size_is_independent_of_display() {
        let sel = SelectionBox::from_anchors(Point::new(0.0, 0.0), Point::new(50.0, 50.0));
        let mut path = StrokePath::starting_at(Point::new(5.0, 5.0));
        path.push(Point::new(90.0, 40.0));

        let targets = [target(), Resolution::new(768, 320).unwrap()];
        let displays = [
            SurfaceSize::new(512.0, 512.0),
            SurfaceSize::new(100.0, 300.0),
            SurfaceSize::new(1280.5, 720.25),
        ];
        for t in targets {
            for d in displays {
                for region in [Some(Region::Selection(sel)), Some(Region::Stroke(&path)), None] {
                    let mask = composite_mask(region, d, t, &Brush::default()).unwrap();
                    assert_eq!(mask.resolution(), Some(t));
                    assert_binary(&mask);
                }
            }
        }
    }

    #[test]
    fn test_freehand_marks_stroke_area() {
        let mut path = StrokePath::starting_at(Point::new(100.0, 256.0));
        path.push(Point::new(400.0, 256.0));
        let mask = composite_mask(
            Some(Region::Stroke(&path)),
            SurfaceSize::new(512.0, 512.0),
            target(),
            &Brush::default(),
        )
        .unwrap();

        // Translucent overlay still produces full "edit" coverage
        assert!(mask.is_edit(250, 256));
        assert!(mask.is_edit(250, 230));
        assert!(mask.is_edit(80, 256));
        assert!(!mask.is_edit(250, 320));
        assert!(!mask.is_edit(10, 10));
        assert_binary(&mask);
    }

    #[test]
    fn test_freehand_scales_with_display() {
        let mut path = StrokePath::starting_at(Point::new(20.0, 128.0));
        path.push(Point::new(230.0, 128.0));
        let brush = Brush {
            width: 20.0,
            opacity: 0.2,
        };
        let mask = composite_mask(
            Some(Region::Stroke(&path)),
            SurfaceSize::new(256.0, 256.0),
            target(),
            &brush,
        )
        .unwrap();
        // Centerline moves to y=256, half-width grows to 20
        assert!(mask.is_edit(250, 256));
        assert!(mask.is_edit(250, 270));
        assert!(!mask.is_edit(250, 300));
        assert!(!mask.is_edit(250, 128));
    }

    #[test]
    fn test_no_region_is_all_preserve() {
        let mask = composite_mask(None, SurfaceSize::new(512.0, 512.0), target(), &Brush::default())
            .unwrap();
        assert_eq!(mask.edit_pixel_count(), 0);
        assert_eq!(mask, Mask::blank(target()));
    }

    #[test]
    fn test_empty_selection_marks_nothing() {
        let p = Point::new(50.0, 50.0);
        let sel = SelectionBox::from_anchors(p, Point::new(50.0, 120.0));
        let mask = composite_mask(
            Some(Region::Selection(sel)),
            SurfaceSize::new(512.0, 512.0),
            target(),
            &Brush::default(),
        )
        .unwrap();
        assert_eq!(mask.edit_pixel_count(), 0);
    }

    #[test]
    fn test_invalid_display_fails_without_mask() {
        let sel = SelectionBox::from_anchors(Point::new(0.0, 0.0), Point::new(5.0, 5.0));
        let err = composite_mask(
            Some(Region::Selection(sel)),
            SurfaceSize::new(0.0, 512.0),
            target(),
            &Brush::default(),
        )
        .unwrap_err();
        assert!(matches!(err, MaskError::InvalidDisplaySize { .. }));
    }

    #[test]
    fn test_mask_png_is_grayscale_target_size() {
        let sel = SelectionBox::from_anchors(Point::new(0.0, 0.0), Point::new(64.0, 64.0));
        let mask = composite_mask(
            Some(Region::Selection(sel)),
            SurfaceSize::new(512.0, 512.0),
            target(),
            &Brush::default(),
        )
        .unwrap();
        let png = mask.to_png().unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!(decoded.color(), image::ColorType::L8);
        let gray = decoded.to_luma8();
        assert_eq!(gray.dimensions(), (512, 512));
        assert_eq!(gray.get_pixel(10, 10).0, [mask::EDIT]);
        assert_eq!(gray.get_pixel(100, 100).0, [mask::PRESERVE]);
    }
}
