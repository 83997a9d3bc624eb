//! Rasterizing the overlay onto the background.
//!
//! The background is copied unchanged into an output buffer of its own size.
//! The overlay is then resampled into its transformed footprint using inverse
//! mapping: for every output pixel near the anchor, the pixel center is
//! mapped back into overlay texel space, sampled bilinearly and blended over
//! the background with straight alpha-over compositing.
//!
//! The whole pass is a pure function of its inputs, so identical inputs
//! always give byte-identical output.

mod placement;
mod sample;

use thiserror::Error;
use tracing::debug;

use crate::decode::{ImageSource, RasterBuffer};
use crate::transform::TransformState;

pub use placement::{OverlayPlacement, OVERLAY_BASE_SCALE};

/// Errors raised while compositing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositeError {
    /// The background or the overlay is not loaded.
    #[error("Both background and overlay images must be loaded")]
    MissingImage,

    /// The background has zero width or height.
    #[error("Background image has zero width or height")]
    ZeroDimension,

    /// A buffer's pixel data does not match its dimensions.
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },
}

/// Draw `overlay` onto a copy of `background` according to `transform`.
///
/// # Errors
///
/// Returns `CompositeError::MissingImage` if either source is not ready and
/// `CompositeError::ZeroDimension` if the background has no area.
pub fn composite(
    background: &ImageSource,
    overlay: &ImageSource,
    transform: &TransformState,
) -> Result<RasterBuffer, CompositeError> {
    let (Some(bg), Some(ov)) = (background.raster(), overlay.raster()) else {
        return Err(CompositeError::MissingImage);
    };
    composite_rasters(bg, ov, transform)
}

/// Same as [`composite`] but on raw buffers.
///
/// # Errors
///
/// Also returns `CompositeError::InvalidPixelData` if either buffer's pixel
/// length does not match its dimensions.
pub fn composite_rasters(
    background: &RasterBuffer,
    overlay: &RasterBuffer,
    transform: &TransformState,
) -> Result<RasterBuffer, CompositeError> {
    if background.width == 0 || background.height == 0 {
        return Err(CompositeError::ZeroDimension);
    }
    check_len(background)?;
    check_len(overlay)?;

    let mut output = background.clone();
    let placement = OverlayPlacement::new(
        background.width,
        background.height,
        overlay.width,
        overlay.height,
        transform,
    );
    debug!(
        width = output.width,
        height = output.height,
        overlay_width = placement.width,
        overlay_height = placement.height,
        anchor_x = placement.anchor_x,
        anchor_y = placement.anchor_y,
        "compositing overlay"
    );

    if placement.is_empty() || overlay.is_empty() {
        return Ok(output);
    }
    draw_overlay(&mut output, overlay, &placement);
    Ok(output)
}

fn check_len(buffer: &RasterBuffer) -> Result<(), CompositeError> {
    let expected = RasterBuffer::expected_len(buffer.width, buffer.height);
    if buffer.pixels.len() != expected {
        return Err(CompositeError::InvalidPixelData {
            expected,
            actual: buffer.pixels.len(),
        });
    }
    Ok(())
}

fn draw_overlay(output: &mut RasterBuffer, overlay: &RasterBuffer, placement: &OverlayPlacement) {
    // Only pixels within the footprint's bounding circle can be touched.
    let radius = placement.bounding_radius();
    let x_start = pixel_floor(placement.anchor_x - radius, output.width);
    let x_end = pixel_ceil(placement.anchor_x + radius, output.width);
    let y_start = pixel_floor(placement.anchor_y - radius, output.height);
    let y_end = pixel_ceil(placement.anchor_y + radius, output.height);

    // Footprint units to overlay texels.
    let texel_x = overlay.width as f64 / placement.width;
    let texel_y = overlay.height as f64 / placement.height;
    let stride = output.width as usize * RasterBuffer::CHANNELS;

    for py in y_start..y_end {
        let row = py as usize * stride;
        for px in x_start..x_end {
            let (u, v) = placement.to_local(px as f64 + 0.5, py as f64 + 0.5);
            if !(u >= 0.0 && u < placement.width && v >= 0.0 && v < placement.height) {
                continue;
            }

            let src = sample::sample_bilinear(overlay, u * texel_x - 0.5, v * texel_y - 0.5);
            if src[3] <= 0.0 {
                continue;
            }

            let idx = row + px as usize * RasterBuffer::CHANNELS;
            sample::blend_over(&mut output.pixels[idx..idx + RasterBuffer::CHANNELS], src);
        }
    }
}

/// First pixel index at or left of `coord`, clamped to `[0, limit]`.
#[inline]
fn pixel_floor(coord: f64, limit: u32) -> u32 {
    coord.floor().clamp(0.0, limit as f64) as u32
}

/// One past the last pixel index reached by `coord`, clamped to `[0, limit]`.
#[inline]
fn pixel_ceil(coord: f64, limit: u32) -> u32 {
    (coord.ceil() + 1.0).clamp(0.0, limit as f64) as u32
}


// ============================================================================
// Property-Based Tests
// ============================================================================
