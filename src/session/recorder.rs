//! Pointer-drag recording for the free-hand and rectangle tools
//!
//! A [`Tool`] carries both the active mode and the region it produced, so a
//! stroke and a selection can never be meaningful at the same time.

use crate::domain::{DrawMode, Point, Region, Resolution, SelectionBox, StrokePath};
use crate::error::MaskError;
use crate::render::{Brush, StrokeLayer};

/// Whether a drag is in progress
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    #[default]
    Idle,
    Recording,
}

/// Free-hand tool state
#[derive(Clone, Debug)]
pub struct FreehandTool {
    path: StrokePath,
    gesture: Gesture,
    layer: StrokeLayer,
}

impl FreehandTool {
    fn new(display: Resolution, brush: Brush) -> Result<Self, MaskError> {
        Ok(Self {
            path: StrokePath::default(),
            gesture: Gesture::Idle,
            layer: StrokeLayer::new(display, brush)?,
        })
    }

    fn pointer_down(&mut self, p: Point) {
        self.path = StrokePath::starting_at(p);
        self.layer.clear();
        self.gesture = Gesture::Recording;
    }

    fn pointer_move(&mut self, p: Point) {
        if self.gesture != Gesture::Recording {
            return;
        }
        if let Some(prev) = self.path.last() {
            self.layer.paint_segment(prev, p);
        }
        self.path.push(p);
    }

    fn finish(&mut self) {
        if self.gesture != Gesture::Recording {
            return;
        }
        self.gesture = Gesture::Idle;
        // A click without movement still marks a dab under the pointer
        if let [only] = self.path.points() {
            self.layer.paint_dab(*only);
        }
    }

    pub fn path(&self) -> &StrokePath {
        &self.path
    }

    pub fn layer(&self) -> &StrokeLayer {
        &self.layer
    }
}

/// Rectangle tool state
///
/// `anchor` is set only while dragging.
#[derive(Clone, Debug, Default)]
pub struct RectangleTool {
    selection: Option<SelectionBox>,
    anchor: Option<Point>,
}

impl RectangleTool {
    fn pointer_down(&mut self, p: Point) {
        self.anchor = Some(p);
        self.selection = None;
    }

    fn pointer_move(&mut self, p: Point) {
        if let Some(anchor) = self.anchor {
            self.selection = Some(SelectionBox::from_anchors(anchor, p));
        }
    }

    fn finish(&mut self) {
        self.anchor = None;
    }

    pub fn selection(&self) -> Option<SelectionBox> {
        self.selection
    }
}

/// Active region-marking tool together with the region it holds
#[derive(Clone, Debug, Default)]
pub enum Tool {
    #[default]
    None,
    Freehand(FreehandTool),
    Rectangle(RectangleTool),
}

impl Tool {
    /// Fresh tool for `mode` with no region
    pub fn for_mode(mode: DrawMode, display: Resolution, brush: Brush) -> Result<Self, MaskError> {
        Ok(match mode {
            DrawMode::None => Tool::None,
            DrawMode::Freehand => Tool::Freehand(FreehandTool::new(display, brush)?),
            DrawMode::Rectangle => Tool::Rectangle(RectangleTool::default()),
        })
    }

    pub fn mode(&self) -> DrawMode {
        match self {
            Tool::None => DrawMode::None,
            Tool::Freehand(_) => DrawMode::Freehand,
            Tool::Rectangle(_) => DrawMode::Rectangle,
        }
    }

    pub fn is_recording(&self) -> bool {
        match self {
            Tool::None => false,
            Tool::Freehand(f) => f.gesture == Gesture::Recording,
            Tool::Rectangle(r) => r.anchor.is_some(),
        }
    }

    pub fn pointer_down(&mut self, p: Point) {
        match self {
            Tool::None => {}
            Tool::Freehand(f) => f.pointer_down(p),
            Tool::Rectangle(r) => r.pointer_down(p),
        }
    }

    pub fn pointer_move(&mut self, p: Point) {
        match self {
            Tool::None => {}
            Tool::Freehand(f) => f.pointer_move(p),
            Tool::Rectangle(r) => r.pointer_move(p),
        }
    }

    /// End the drag on pointer-up or pointer-leave
    pub fn pointer_up(&mut self) {
        match self {
            Tool::None => {}
            Tool::Freehand(f) => f.finish(),
            Tool::Rectangle(r) => r.finish(),
        }
    }

    /// The region to composite, if one has been marked
    pub fn region(&self) -> Option<Region<'_>> {
        match self {
            Tool::None => None,
            Tool::Freehand(f) if !f.path.is_empty() => Some(Region::Stroke(&f.path)),
            Tool::Freehand(_) => None,
            Tool::Rectangle(r) => r.selection.map(Region::Selection),
        }
    }

    pub fn has_region(&self) -> bool {
        self.region().is_some()
    }

    pub fn selection(&self) -> Option<SelectionBox> {
        match self {
            Tool::Rectangle(r) => r.selection(),
            _ => None,
        }
    }

    pub fn stroke(&self) -> Option<&StrokePath> {
        match self {
            Tool::Freehand(f) => Some(f.path()),
            _ => None,
        }
    }

    pub fn stroke_layer(&self) -> Option<&StrokeLayer> {
        match self {
            Tool::Freehand(f) => Some(f.layer()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn display() -> Resolution {
        Resolution::new(512, 512).unwrap()
    }

    fn tool(mode: DrawMode) -> Tool {
        Tool::for_mode(mode, display(), Brush::default()).unwrap()
    }

    #[test]
    fn test_rectangle_drag_produces_normalized_box() {
        let mut t = tool(DrawMode::Rectangle);
        t.pointer_down(Point::new(200.0, 250.0));
        assert!(t.is_recording());
        assert!(!t.has_region());

        t.pointer_move(Point::new(150.0, 120.0));
        t.pointer_move(Point::new(100.0, 100.0));
        t.pointer_up();

        assert!(!t.is_recording());
        assert_eq!(
            t.selection(),
            Some(SelectionBox {
                x: 100.0,
                y: 100.0,
                width: 100.0,
                height: 150.0
            })
        );
        assert!(matches!(t.region(), Some(Region::Selection(_))));
    }

    #[test]
    fn test_rectangle_move_after_release_is_ignored() {
        let mut t = tool(DrawMode::Rectangle);
        t.pointer_down(Point::new(0.0, 0.0));
        t.pointer_move(Point::new(10.0, 10.0));
        t.pointer_up();
        t.pointer_move(Point::new(300.0, 300.0));
        assert_eq!(t.selection().unwrap().width, 10.0);
    }

    #[test]
    fn test_rectangle_new_drag_clears_previous_box() {
        let mut t = tool(DrawMode::Rectangle);
        t.pointer_down(Point::new(0.0, 0.0));
        t.pointer_move(Point::new(10.0, 10.0));
        t.pointer_up();
        t.pointer_down(Point::new(50.0, 50.0));
        assert!(t.selection().is_none());
    }

    #[test]
    fn test_freehand_records_path_and_paints_overlay() {
        let mut t = tool(DrawMode::Freehand);
        t.pointer_down(Point::new(10.0, 10.0));
        t.pointer_move(Point::new(20.0, 15.0));
        t.pointer_move(Point::new(40.0, 30.0));
        assert!(t.is_recording());
        assert!(!t.stroke_layer().unwrap().is_blank());
        t.pointer_up();

        assert!(!t.is_recording());
        let path = t.stroke().unwrap();
        assert_eq!(
            path.points(),
            &[
                Point::new(10.0, 10.0),
                Point::new(20.0, 15.0),
                Point::new(40.0, 30.0)
            ]
        );
        assert!(matches!(t.region(), Some(Region::Stroke(_))));
    }

    #[test]
    fn test_freehand_new_stroke_replaces_old() {
        let mut t = tool(DrawMode::Freehand);
        t.pointer_down(Point::new(10.0, 10.0));
        t.pointer_move(Point::new(100.0, 100.0));
        t.pointer_up();
        t.pointer_down(Point::new(300.0, 300.0));
        assert_eq!(t.stroke().unwrap().points().len(), 1);
        assert!(t.stroke_layer().unwrap().is_blank());
    }

    #[test]
    fn test_freehand_click_paints_dab() {
        let mut t = tool(DrawMode::Freehand);
        t.pointer_down(Point::new(64.0, 64.0));
        t.pointer_up();
        assert!(t.has_region());
        assert!(!t.stroke_layer().unwrap().is_blank());
    }

    #[test]
    fn test_moves_without_press_are_ignored() {
        let mut t = tool(DrawMode::Freehand);
        t.pointer_move(Point::new(10.0, 10.0));
        t.pointer_up();
        assert!(!t.has_region());
        assert!(t.stroke_layer().unwrap().is_blank());

        let mut none = Tool::None;
        none.pointer_down(Point::new(1.0, 1.0));
        assert!(!none.is_recording());
        assert!(!none.has_region());
    }
}
