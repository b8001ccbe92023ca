//! Image output.
//!
//! The renderer hands over a finished 8-bit RGBA buffer; this module only
//! checks its shape and encodes it.

use std::path::Path;

use thiserror::Error;

/// Errors that can occur while writing an image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Pixel buffer has {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
}

pub type OutputResult<T> = Result<T, OutputError>;

/// Write a row-major RGBA buffer (row 0 at the top) as a PNG file.
pub fn save_png<P: AsRef<Path>>(path: P, width: u32, height: u32, rgba: &[u8]) -> OutputResult<()> {
    let expected = width as usize * height as usize * 4;
    if rgba.len() != expected {
        return Err(OutputError::BufferSize {
            expected,
            actual: rgba.len(),
        });
    }

    let image = image::RgbaImage::from_raw(width, height, rgba.to_vec()).ok_or(
        OutputError::BufferSize {
            expected,
            actual: rgba.len(),
        },
    )?;

    image.save_with_format(path.as_ref(), image::ImageFormat::Png)?;
    log::info!("Saved {}x{} image to {:?}", width, height, path.as_ref());

    Ok(())
}
