//! WASM-compatible wrapper types for image data.
//!
//! This module provides JavaScript-friendly types that wrap the core overlay types,
//! handling the conversion between Rust and JavaScript data representations.

use overlay_core::decode::{Layer, RasterBuffer};
use overlay_core::gesture::GestureMode;
use overlay_core::ExportedImage;
use wasm_bindgen::prelude::*;

/// An RGBA8 raster wrapper for JavaScript.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy is made
/// to JavaScript memory as a `Uint8Array`, ready to wrap in an `ImageData`.
#[wasm_bindgen]
pub struct JsRasterBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsRasterBuffer {
    /// Create a new JsRasterBuffer from dimensions and RGBA pixel data
    /// (4 bytes per pixel, row-major order).
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsRasterBuffer {
        JsRasterBuffer {
            width,
            height,
            pixels,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }
}

impl JsRasterBuffer {
    pub(crate) fn from_raster(buffer: &RasterBuffer) -> Self {
        Self {
            width: buffer.width,
            height: buffer.height,
            pixels: buffer.pixels.clone(),
        }
    }

    /// Borrow as a core raster. Clones the pixel data.
    pub(crate) fn to_raster(&self) -> RasterBuffer {
        RasterBuffer {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
        }
    }
}

/// A PNG export handed to the download layer.
#[wasm_bindgen]
pub struct JsExportedImage {
    filename: String,
    bytes: Vec<u8>,
}

#[wasm_bindgen]
impl JsExportedImage {
    #[wasm_bindgen(getter)]
    pub fn filename(&self) -> String {
        self.filename.clone()
    }

    /// PNG bytes as Uint8Array.
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

impl From<ExportedImage> for JsExportedImage {
    fn from(exported: ExportedImage) -> Self {
        Self {
            filename: exported.filename,
            bytes: exported.bytes,
        }
    }
}

/// Convert a u8 layer value to the core Layer enum.
///
/// Values:
/// - 0 = Background
/// - 1 = Overlay
pub(crate) fn layer_from_u8(value: u8) -> Option<Layer> {
    match value {
        0 => Some(Layer::Background),
        1 => Some(Layer::Overlay),
        _ => None,
    }
}

/// Convert a u8 gesture mode value to the core GestureMode enum.
///
/// Values:
/// - 0 = Drag
/// - 1 = Resize
/// - 2 = Rotate
pub(crate) fn gesture_mode_from_u8(value: u8) -> Option<GestureMode> {
    match value {
        0 => Some(GestureMode::Drag),
        1 => Some(GestureMode::Resize),
        2 => Some(GestureMode::Rotate),
        _ => None,
    }
}
