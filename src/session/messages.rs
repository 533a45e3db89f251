//! Message types for the edit session

#![allow(dead_code)]

use crate::domain::DrawMode;
use crate::inpaint::{InpaintError, InpaintResult};
use crate::source::SourceImage;

/// Pointer input on the display canvas, in display coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerAction {
    /// Button pressed at position
    Down(f32, f32),
    /// Pointer moved to position
    Move(f32, f32),
    /// Button released
    Up,
    /// Pointer left the canvas
    Leave,
}

/// All edit session messages
#[derive(Debug, Clone)]
pub enum EditMsg {
    Pointer(PointerAction),
    /// Toggle a draw mode on/off
    ToggleMode(DrawMode),
    PromptChanged(String),
    LoadImage(SourceImage),
    /// Clear region, mode and result
    Reset,
    Submit,
    /// The in-flight submission finished
    SubmissionResolved(Result<InpaintResult, InpaintError>),
}
