//! PNG encoding for masks

use std::io;

use image::GrayImage;

fn write_png<W: io::Write>(
    w: W,
    width: u32,
    height: u32,
    color: png::ColorType,
    data: &[u8],
) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, width, height);
    encoder.set_color(color);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(data)
}

/// Encode an 8-bit grayscale image (used for masks)
pub fn encode_gray_png(img: &GrayImage) -> Result<Vec<u8>, png::EncodingError> {
    let mut buffer = Vec::new();
    write_png(
        &mut buffer,
        img.width(),
        img.height(),
        png::ColorType::Grayscale,
        img.as_raw(),
    )?;
    Ok(buffer)
}
