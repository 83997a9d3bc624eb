//! Overlay WASM - WebAssembly bindings for the overlay compositor
//!
//! This crate provides WASM bindings to expose the overlay-core functionality
//! to JavaScript/TypeScript applications. The page owns file inputs, pointer
//! listeners, the canvas and the download link; everything else runs here.
//!
//! # Module Structure
//!
//! - `session` - The interactive compositor (loading, gestures, rendering, export)
//! - `types` - WASM-compatible wrapper types for image data
//! - `decode` - Standalone format detection and decoding
//! - `encode` - Standalone PNG encoding and file naming
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCompositor } from '@overlay/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const compositor = new JsCompositor(undefined);
//! const generation = compositor.begin_load(0);
//! compositor.finish_load(0, generation, new Uint8Array(await file.arrayBuffer()));
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod encode;
mod session;
mod types;

// Re-export public types
pub use decode::{decode_image, detect_mime_type};
pub use encode::{encode_png, encode_png_from_image, suggested_filename};
pub use session::JsCompositor;
pub use types::{JsExportedImage, JsRasterBuffer};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
