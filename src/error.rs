//! Error types for mask authoring and image handling

use thiserror::Error;

/// Failures that abort a single mask-compositing operation
///
/// None of these leave a partial mask behind; the caller must not submit.
#[derive(Debug, Error)]
pub enum MaskError {
    #[error("Display surface must have a positive size, got {width}x{height}")]
    InvalidDisplaySize { width: f32, height: f32 },

    #[error("Could not allocate a {width}x{height} drawing surface")]
    Surface { width: u32, height: u32 },

    #[error("Mask encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
}

/// Failures while loading or decoding an image
#[derive(Debug, Error)]
pub enum ImageLoadError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported or corrupt image: {0}")]
    Decode(#[from] image::ImageError),
}
