//! PNG encoding for export.
//!
//! PNG is lossless, so exported bytes decode back to exactly the composited
//! pixels, alpha included.

use image::codecs::png::PngEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;
use thiserror::Error;
use tracing::debug;

use crate::decode::RasterBuffer;

/// Errors that can occur during PNG encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// PNG encoding failed
    #[error("PNG encoding failed: {0}")]
    EncodingFailed(String),
}

/// Encode an RGBA8 raster buffer to PNG bytes.
///
/// # Errors
///
/// Returns `EncodeError::InvalidDimensions` for an empty buffer,
/// `EncodeError::InvalidPixelData` if the pixel length does not match the
/// dimensions, and `EncodeError::EncodingFailed` if the encoder fails.
pub fn export_png(buffer: &RasterBuffer) -> Result<Vec<u8>, EncodeError> {
    encode_png(&buffer.pixels, buffer.width, buffer.height)
}

/// Encode raw RGBA pixel data to PNG bytes.
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
    // Validate dimensions
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    // Validate pixel data length
    let expected_len = RasterBuffer::expected_len(width, height);
    if pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: pixels.len(),
        });
    }

    let mut buffer = Cursor::new(Vec::new());
    PngEncoder::new(&mut buffer)
        .write_image(pixels, width, height, ExtendedColorType::Rgba8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    let bytes = buffer.into_inner();
    debug!(width, height, size = bytes.len(), "encoded PNG");
    Ok(bytes)
}

/// Suggested download name for a composite: `<basename>-composite.png`.
///
/// Directory components and the last extension of `source_name` are
/// dropped; an empty name falls back to `image`.
pub fn suggested_filename(source_name: &str) -> String {
    let file = source_name
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(source_name);
    let stem = match file.rfind('.') {
        Some(dot) if dot > 0 => &file[..dot],
        _ => file,
    };
    let stem = stem.trim();
    let stem = if stem.is_empty() { "image" } else { stem };
    format!("{stem}-composite.png")
}


// ============================================================================
// Property-Based Tests
// ============================================================================
