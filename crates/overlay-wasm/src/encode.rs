//! Image encoding WASM bindings.
//!
//! # Functions
//!
//! - [`encode_png`] - Encode RGBA pixel data to PNG bytes
//! - [`encode_png_from_image`] - Encode a JsRasterBuffer to PNG bytes
//! - [`suggested_filename`] - Download name for a composite
//!
//! # Example
//!
//! ```typescript
//! import { encode_png_from_image, suggested_filename } from '@overlay/wasm';
//!
//! const png = encode_png_from_image(frame);
//! const link = document.createElement('a');
//! link.href = URL.createObjectURL(new Blob([png], { type: 'image/png' }));
//! link.download = suggested_filename(file.name);
//! link.click();
//! ```

use crate::types::JsRasterBuffer;
use overlay_core::encode;
use wasm_bindgen::prelude::*;

/// Encode RGBA pixel data to PNG bytes.
///
/// # Errors
///
/// Returns an error if:
/// - The pixel data length doesn't match width * height * 4
/// - Width or height is zero
/// - Encoding fails internally
#[wasm_bindgen]
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, JsValue> {
    encode::encode_png(pixels, width, height).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Encode a JsRasterBuffer to PNG bytes.
#[wasm_bindgen]
pub fn encode_png_from_image(image: &JsRasterBuffer) -> Result<Vec<u8>, JsValue> {
    encode::export_png(&image.to_raster()).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Download name for a composite of `source_name`, e.g. `beach.jpg` becomes
/// `beach-composite.png`.
#[wasm_bindgen]
pub fn suggested_filename(source_name: &str) -> String {
    encode::suggested_filename(source_name)
}
