//! Edit session state
//!
//! The session is the single owner of everything the editor mutates: the
//! loaded image, the active tool and its region, the prompt, and submission
//! status. All transitions go through methods here; nothing else mutates it.

#![allow(dead_code)]

use crate::domain::{DrawMode, Point, Resolution, SelectionBox, StrokePath, SurfaceSize};
use crate::error::MaskError;
use crate::inpaint::{InpaintError, InpaintResult, SubmissionRequest};
use crate::render::{Brush, Mask, StrokeLayer, composite_mask};
use crate::source::SourceImage;

use super::recorder::Tool;

/// Geometry and brush the session works with
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionSettings {
    /// Size the editing canvas is rendered at
    pub display: SurfaceSize,
    /// Resolution of masks sent to the service
    pub target: Resolution,
    pub brush: Brush,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed(String),
}

/// Record of the last successful generation
#[derive(Clone, Debug, PartialEq)]
pub struct Generation {
    pub url: Option<String>,
}

/// Everything that exists once an image is loaded
#[derive(Clone, Debug)]
pub struct Canvas {
    pub image: SourceImage,
    pub tool: Tool,
    pub status: SubmissionStatus,
    /// Last composited mask, kept for preview
    pub mask: Option<Mask>,
    pub generation: Option<Generation>,
}

impl Canvas {
    fn new(image: SourceImage) -> Self {
        Self {
            image,
            tool: Tool::None,
            status: SubmissionStatus::Idle,
            mask: None,
            generation: None,
        }
    }

    fn is_submitting(&self) -> bool {
        self.status == SubmissionStatus::Submitting
    }
}

#[derive(Clone, Debug, Default)]
pub enum Phase {
    #[default]
    NoImage,
    Loaded(Canvas),
}

/// Coarse state for rendering the editor chrome
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditState {
    NoImage,
    Idle { has_region: bool, has_result: bool },
    Recording,
    Submitting,
}

#[derive(Clone, Debug)]
pub struct EditSession {
    settings: SessionSettings,
    /// Pixel grid of the display canvas, derived from `settings.display`
    display_pixels: Resolution,
    prompt: String,
    phase: Phase,
}

impl EditSession {
    /// Create an empty session
    ///
    /// Fails if the display surface has no area.
    pub fn new(settings: SessionSettings) -> Result<Self, MaskError> {
        let display_pixels =
            settings
                .display
                .pixel_size()
                .ok_or(MaskError::InvalidDisplaySize {
                    width: settings.display.width,
                    height: settings.display.height,
                })?;
        Ok(Self {
            settings,
            display_pixels,
            prompt: String::new(),
            phase: Phase::NoImage,
        })
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn canvas(&self) -> Option<&Canvas> {
        match &self.phase {
            Phase::Loaded(canvas) => Some(canvas),
            Phase::NoImage => None,
        }
    }

    fn canvas_mut(&mut self) -> Option<&mut Canvas> {
        match &mut self.phase {
            Phase::Loaded(canvas) => Some(canvas),
            Phase::NoImage => None,
        }
    }

    pub fn state(&self) -> EditState {
        match &self.phase {
            Phase::NoImage => EditState::NoImage,
            Phase::Loaded(c) if c.is_submitting() => EditState::Submitting,
            Phase::Loaded(c) if c.tool.is_recording() => EditState::Recording,
            Phase::Loaded(c) => EditState::Idle {
                has_region: c.tool.has_region(),
                has_result: c.generation.is_some(),
            },
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.canvas().is_some_and(Canvas::is_submitting)
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn image(&self) -> Option<&SourceImage> {
        self.canvas().map(|c| &c.image)
    }

    pub fn mode(&self) -> DrawMode {
        self.canvas().map_or(DrawMode::None, |c| c.tool.mode())
    }

    pub fn selection(&self) -> Option<SelectionBox> {
        self.canvas().and_then(|c| c.tool.selection())
    }

    pub fn stroke(&self) -> Option<&StrokePath> {
        self.canvas().and_then(|c| c.tool.stroke())
    }

    pub fn stroke_layer(&self) -> Option<&StrokeLayer> {
        self.canvas().and_then(|c| c.tool.stroke_layer())
    }

    pub fn status(&self) -> SubmissionStatus {
        self.canvas().map(|c| c.status.clone()).unwrap_or_default()
    }

    pub fn mask(&self) -> Option<&Mask> {
        self.canvas().and_then(|c| c.mask.as_ref())
    }

    pub fn generation(&self) -> Option<&Generation> {
        self.canvas().and_then(|c| c.generation.as_ref())
    }

    pub fn has_region(&self) -> bool {
        self.canvas().is_some_and(|c| c.tool.has_region())
    }

    /// Whether the prompt input should be shown
    ///
    /// Hidden while dragging so it does not cover the canvas.
    pub fn prompt_visible(&self) -> bool {
        self.canvas().is_some_and(|c| {
            !c.tool.is_recording() && (c.tool.mode().is_active() || c.tool.has_region())
        })
    }

    /// Load or replace the image
    ///
    /// Clears tool, region, mask and result; the prompt is kept. Ignored while
    /// a submission is in flight so its result cannot land on a different
    /// image. Returns whether the image was accepted.
    pub fn load_image(&mut self, image: SourceImage) -> bool {
        if self.is_submitting() {
            log::warn!("Ignoring image load while a submission is in flight");
            return false;
        }
        log::debug!(
            "Loaded {} ({}x{}) onto {}x{} canvas",
            image.file_name,
            image.width(),
            image.height(),
            self.settings.display.width,
            self.settings.display.height
        );
        self.phase = Phase::Loaded(Canvas::new(image));
        true
    }

    /// Toggle a draw mode
    ///
    /// Only allowed while idle. Selecting the active mode turns it off;
    /// either way the previous region is discarded.
    pub fn toggle_mode(&mut self, requested: DrawMode) -> Result<bool, MaskError> {
        let display = self.display_pixels;
        let brush = self.settings.brush;
        let Some(canvas) = self.canvas_mut() else {
            return Ok(false);
        };
        if canvas.is_submitting() || canvas.tool.is_recording() {
            log::debug!("Ignoring mode toggle to {:?} while busy", requested);
            return Ok(false);
        }
        let next = canvas.tool.mode().toggled(requested);
        canvas.tool = Tool::for_mode(next, display, brush)?;
        canvas.mask = None;
        log::debug!("Draw mode is now {:?}", next);
        Ok(true)
    }

    fn pointer_target(&mut self) -> Option<&mut Tool> {
        match self.canvas_mut() {
            Some(canvas) if !canvas.is_submitting() => Some(&mut canvas.tool),
            _ => None,
        }
    }

    pub fn pointer_down(&mut self, p: Point) {
        if let Some(tool) = self.pointer_target() {
            tool.pointer_down(p);
        }
    }

    pub fn pointer_move(&mut self, p: Point) {
        if let Some(tool) = self.pointer_target() {
            tool.pointer_move(p);
        }
    }

    /// Pointer released or left the canvas
    pub fn pointer_up(&mut self) {
        if let Some(tool) = self.pointer_target() {
            tool.pointer_up();
        }
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    /// Clear region, tool, mask and result marker, keeping the image
    pub fn reset(&mut self) -> bool {
        let Some(canvas) = self.canvas_mut() else {
            return false;
        };
        if canvas.is_submitting() {
            log::warn!("Ignoring reset while a submission is in flight");
            return false;
        }
        canvas.tool = Tool::None;
        canvas.mask = None;
        canvas.generation = None;
        canvas.status = SubmissionStatus::Idle;
        true
    }

    /// All submission preconditions hold
    pub fn can_submit(&self) -> bool {
        !self.prompt.trim().is_empty()
            && self.canvas().is_some_and(|c| {
                !c.is_submitting() && !c.tool.is_recording() && c.tool.has_region()
            })
    }

    /// Composite the mask for the current region without submitting
    pub fn preview_mask(&mut self) -> Result<Option<&Mask>, MaskError> {
        let settings = self.settings;
        let Some(canvas) = self.canvas_mut() else {
            return Ok(None);
        };
        let mask = composite_mask(
            canvas.tool.region(),
            settings.display,
            settings.target,
            &settings.brush,
        )?;
        canvas.mask = Some(mask);
        Ok(canvas.mask.as_ref())
    }

    /// Start a submission
    ///
    /// Returns `Ok(None)` without side effects when the preconditions do not
    /// hold. On a compositing failure the status becomes `Failed` and the
    /// region is kept; no request is produced.
    pub fn begin_submission(&mut self) -> Result<Option<SubmissionRequest>, MaskError> {
        if !self.can_submit() {
            return Ok(None);
        }
        let settings = self.settings;
        let prompt = self.prompt.trim().to_string();
        let Some(canvas) = self.canvas_mut() else {
            return Ok(None);
        };

        let materialized = composite_mask(
            canvas.tool.region(),
            settings.display,
            settings.target,
            &settings.brush,
        )
        .and_then(|mask| {
            let png = mask.to_png()?;
            Ok((mask, png))
        });
        let (mask, mask_png) = match materialized {
            Ok(done) => done,
            Err(err) => {
                log::error!("Mask compositing failed: {}", err);
                canvas.status = SubmissionStatus::Failed(err.to_string());
                return Err(err);
            }
        };

        let request = SubmissionRequest {
            image: canvas.image.bytes.clone(),
            image_file_name: canvas.image.file_name.clone(),
            image_mime: canvas.image.mime.clone(),
            mask_png,
            prompt,
        };
        log::info!(
            "Submitting {} with {} marked mask pixels",
            request.image_file_name,
            mask.edit_pixel_count()
        );
        canvas.mask = Some(mask);
        canvas.status = SubmissionStatus::Submitting;
        Ok(Some(request))
    }

    /// Apply the outcome of the in-flight submission
    ///
    /// On success the generated image becomes the loaded image and the
    /// marking state is cleared. On failure region and prompt are kept so the
    /// user can retry.
    pub fn finish_submission(&mut self, outcome: Result<InpaintResult, InpaintError>) {
        let Some(canvas) = self.canvas_mut() else {
            log::warn!("Submission resolved with no image loaded");
            return;
        };
        if !canvas.is_submitting() {
            log::warn!("Submission resolved while none was in flight");
            return;
        }
        match outcome {
            Ok(result) => {
                log::info!(
                    "Generation succeeded: {}x{}",
                    result.image.width(),
                    result.image.height()
                );
                canvas.image = result.image;
                canvas.tool = Tool::None;
                canvas.mask = None;
                canvas.generation = Some(Generation { url: result.url });
                canvas.status = SubmissionStatus::Succeeded;
            }
            Err(err) => {
                log::warn!("Generation failed: {}", err);
                canvas.status = SubmissionStatus::Failed(err.to_string());
            }
        }
    }
}
