//! Loaded image type for the editing session

use std::path::Path;

use image::RgbaImage;

use crate::error::ImageLoadError;

/// An image loaded into the editor
///
/// The encoded bytes are kept untouched so the same file the user picked is
/// what gets uploaded; the decoded pixels are only used for display and
/// dimension checks.
#[derive(Clone, Debug)]
pub struct SourceImage {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime: String,
    pub rgba: RgbaImage,
}

impl SourceImage {
    /// Decode an encoded image, sniffing its format from the content
    pub fn from_bytes(bytes: Vec<u8>, file_name: impl Into<String>) -> Result<Self, ImageLoadError> {
        let format = image::guess_format(&bytes)?;
        let rgba = image::load_from_memory_with_format(&bytes, format)?.to_rgba8();
        let file_name = file_name.into();
        log::debug!(
            "SourceImage decoded {}: {}x{} pixels ({})",
            file_name,
            rgba.width(),
            rgba.height(),
            format.to_mime_type()
        );
        Ok(Self {
            bytes,
            file_name,
            mime: format.to_mime_type().to_string(),
            rgba,
        })
    }

    /// Read and decode an image file
    pub fn open(path: &Path) -> Result<Self, ImageLoadError> {
        let bytes = std::fs::read(path).map_err(|source| ImageLoadError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Self::from_bytes(bytes, file_name)
    }

    /// Get the width of the image
    pub fn width(&self) -> u32 {
        self.rgba.width()
    }

    /// Get the height of the image
    pub fn height(&self) -> u32 {
        self.rgba.height()
    }

    /// Preferred file extension for the decoded format
    pub fn extension(&self) -> &'static str {
        image::ImageFormat::from_mime_type(&self.mime)
            .and_then(|f| f.extensions_str().first().copied())
            .unwrap_or("bin")
    }
}
