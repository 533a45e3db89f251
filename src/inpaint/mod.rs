//! Boundary to the external region-fill service
//!
//! The session hands a [`SubmissionRequest`] to an [`InpaintBackend`] and gets
//! back either a generated image or an [`InpaintError`]. The HTTP relay
//! client lives in [`remote`].

pub mod remote;

pub use remote::RemoteInpaint;

use thiserror::Error;

use crate::source::SourceImage;

#[derive(Debug, Clone, Error)]
pub enum InpaintError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Service returned {code}: {message}")]
    Status { code: u16, message: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Generated image could not be decoded: {0}")]
    Decode(String),
}

/// The three fields the service needs, fully materialized
#[derive(Clone, Debug)]
pub struct SubmissionRequest {
    /// Encoded bytes of the image being edited
    pub image: Vec<u8>,
    pub image_file_name: String,
    pub image_mime: String,
    /// PNG-encoded binary mask at the target resolution
    pub mask_png: Vec<u8>,
    pub prompt: String,
}

/// Image produced by the service
#[derive(Clone, Debug)]
pub struct InpaintResult {
    pub image: SourceImage,
    /// Remote location of the generated image, when the service reports one
    pub url: Option<String>,
}

/// Trait for region-fill backends
#[allow(async_fn_in_trait)]
pub trait InpaintBackend {
    /// Regenerate the masked region of the request's image
    async fn inpaint(&self, request: SubmissionRequest) -> Result<InpaintResult, InpaintError>;
}
