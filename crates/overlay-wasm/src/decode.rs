//! Image decoding WASM bindings.
//!
//! Standalone helpers for hosts that want to inspect or preview an upload
//! before handing it to a `JsCompositor`.
//!
//! # Functions
//!
//! - [`detect_mime_type`] - Identify an upload from its magic bytes
//! - [`decode_image`] - Decode JPEG/PNG/GIF/WEBP bytes to RGBA
//!
//! # Example
//!
//! ```typescript
//! import { detect_mime_type, decode_image } from '@overlay/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! if (detect_mime_type(bytes) === undefined) {
//!   showError('Unsupported image format');
//! } else {
//!   const image = decode_image(bytes);
//!   console.log(`Decoded ${image.width}x${image.height}`);
//! }
//! ```

use crate::types::JsRasterBuffer;
use overlay_core::decode::{ImageSource, SourceFormat};
use overlay_core::EngineConfig;
use wasm_bindgen::prelude::*;

/// MIME type of a supported upload, or `undefined` when the bytes are not a
/// JPEG, PNG, GIF or WEBP file.
#[wasm_bindgen]
pub fn detect_mime_type(bytes: &[u8]) -> Option<String> {
    SourceFormat::sniff(bytes).map(|format| format.mime_type().to_string())
}

/// Decode an upload to RGBA using the default limits, applying EXIF
/// orientation.
///
/// # Errors
///
/// Returns an error if:
/// - The bytes are empty or larger than 10 MiB
/// - The format is not JPEG, PNG, GIF or WEBP
/// - The file is corrupted, truncated or too large in pixels
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsRasterBuffer, JsValue> {
    decode_with_default_limits(bytes).map_err(|e| JsValue::from_str(&e))
}

fn decode_with_default_limits(bytes: &[u8]) -> Result<JsRasterBuffer, String> {
    let source =
        ImageSource::load_with_config(bytes, &EngineConfig::default()).map_err(|e| e.to_string())?;
    source
        .raster()
        .map(JsRasterBuffer::from_raster)
        .ok_or_else(|| "decoder produced no image".to_string())
}
