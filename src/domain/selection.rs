//! Region-marking modes and the regions they produce

use super::geometry::{Point, SelectionBox};

/// The active region-marking tool
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    #[default]
    None,
    /// Free-hand brush stroke
    Freehand,
    /// Rectangular drag selection
    Rectangle,
}

impl DrawMode {
    /// Mode after the user presses the button for `requested`
    ///
    /// Pressing the button of the active mode turns it off.
    pub fn toggled(self, requested: DrawMode) -> DrawMode {
        if self == requested {
            DrawMode::None
        } else {
            requested
        }
    }

    pub fn is_active(self) -> bool {
        self != DrawMode::None
    }
}

/// Ordered points of one continuous pointer drag
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StrokePath {
    points: Vec<Point>,
}

impl StrokePath {
    /// Open a new path at the pointer-down position
    pub fn starting_at(p: Point) -> Self {
        Self { points: vec![p] }
    }

    pub fn push(&mut self, p: Point) {
        self.points.push(p);
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A marked region ready to be rasterized into a mask
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Region<'a> {
    Stroke(&'a StrokePath),
    Selection(SelectionBox),
}
