//! Editor session WASM bindings.
//!
//! `JsCompositor` is the object the UI shell holds for the lifetime of the
//! editor. File bytes go in through `begin_load`/`finish_load`, pointer
//! events through `pointer_*`, and frames come out of `render`.
//!
//! # Example
//!
//! ```typescript
//! const compositor = new JsCompositor(undefined);
//!
//! const generation = compositor.begin_load(0);
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! compositor.finish_load(0, generation, bytes);
//!
//! canvas.onpointerdown = (e) =>
//!   compositor.pointer_down(e.offsetX, e.offsetY, mode, canvas.clientWidth, canvas.clientHeight);
//!
//! const frame = compositor.render();
//! ctx.putImageData(new ImageData(new Uint8ClampedArray(frame.pixels()), frame.width), 0, 0);
//! ```

use crate::types::{gesture_mode_from_u8, layer_from_u8, JsExportedImage, JsRasterBuffer};
use overlay_core::decode::{DecodeTicket, Layer, SlotUpdate};
use overlay_core::gesture::{ContainerSize, PointerEvent};
use overlay_core::{EditorSession, EngineConfig, TransformState};
use wasm_bindgen::prelude::*;

fn js_error(message: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&message.to_string())
}

/// Interactive compositor: one background, one overlay, one transform.
#[wasm_bindgen]
pub struct JsCompositor {
    inner: EditorSession,
}

impl Default for JsCompositor {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}

#[wasm_bindgen]
impl JsCompositor {
    /// Create a compositor.
    ///
    /// # Arguments
    /// * `config` - Optional `{ max_input_bytes, max_image_dimension, apply_exif_orientation }`
    ///   object; `undefined` or `null` uses the defaults
    ///
    /// # Errors
    /// Returns error if the config object cannot be deserialized
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsCompositor, JsValue> {
        if config.is_undefined() || config.is_null() {
            return Ok(Self::default());
        }
        let config: EngineConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?;
        Ok(Self::with_config(config))
    }

    /// Start loading a file into a layer (0 = background, 1 = overlay).
    /// Returns the generation to pass back to `finish_load`.
    pub fn begin_load(&mut self, layer: u8) -> Result<f64, JsValue> {
        let layer = layer_from_u8(layer).ok_or_else(|| js_error("Unknown layer"))?;
        Ok(self.begin(layer).generation() as f64)
    }

    /// Decode the file bytes for a load started with `begin_load`.
    ///
    /// Returns `true` when the image became current and `false` when a newer
    /// load had already superseded this one.
    ///
    /// # Errors
    /// Returns error if the layer is unknown or the bytes could not be
    /// decoded. The previous image of the layer stays current.
    pub fn finish_load(&mut self, layer: u8, generation: f64, bytes: &[u8]) -> Result<bool, JsValue> {
        let layer = layer_from_u8(layer).ok_or_else(|| js_error("Unknown layer"))?;
        match self.finish(layer, generation as u64, bytes) {
            SlotUpdate::Applied => Ok(true),
            SlotUpdate::Stale => Ok(false),
            SlotUpdate::Failed(e) => Err(js_error(e)),
        }
    }

    /// True once both images are loaded.
    #[wasm_bindgen(getter)]
    pub fn ready(&self) -> bool {
        self.inner.is_ready()
    }

    /// Start a gesture (mode 0 = drag, 1 = resize, 2 = rotate).
    ///
    /// Returns `false` when the gesture was not started: unknown mode, images
    /// not ready, another gesture active, or a container with no area.
    pub fn pointer_down(&mut self, x: f64, y: f64, mode: u8, width: f64, height: f64) -> bool {
        let Some(mode) = gesture_mode_from_u8(mode) else {
            return false;
        };
        let was_idle = self.inner.gestures().is_idle();
        self.inner
            .handle_pointer(&PointerEvent::down(x, y, mode), ContainerSize::new(width, height));
        was_idle && !self.inner.gestures().is_idle()
    }

    pub fn pointer_move(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.inner
            .handle_pointer(&PointerEvent::moved(x, y), ContainerSize::new(width, height));
    }

    pub fn pointer_up(&mut self, x: f64, y: f64) {
        let container = self
            .inner
            .gestures()
            .session()
            .map(|session| session.container_size)
            .unwrap_or_default();
        self.inner.handle_pointer(&PointerEvent::up(x, y), container);
    }

    /// True while a gesture is in progress.
    #[wasm_bindgen(getter)]
    pub fn gesture_active(&self) -> bool {
        !self.inner.gestures().is_idle()
    }

    pub fn reset_transform(&mut self) {
        self.inner.reset_transform();
    }

    /// Anchor x as a percentage of the background width
    #[wasm_bindgen(getter)]
    pub fn x(&self) -> f64 {
        self.inner.transform().x
    }

    /// Anchor y as a percentage of the background height
    #[wasm_bindgen(getter)]
    pub fn y(&self) -> f64 {
        self.inner.transform().y
    }

    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f64 {
        self.inner.transform().scale
    }

    /// Rotation in degrees, clockwise positive
    #[wasm_bindgen(getter)]
    pub fn rotation(&self) -> f64 {
        self.inner.transform().rotation_degrees
    }

    /// Current transform as a `{ x, y, scale, rotation_degrees }` object.
    pub fn transform_state(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.transform())
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize transform: {}", e)))
    }

    /// Composite the current pair with the current transform.
    ///
    /// # Errors
    /// Returns error if either image is missing. `last_render` still holds
    /// the previous frame.
    pub fn render(&mut self) -> Result<JsRasterBuffer, JsValue> {
        self.inner
            .render()
            .map(JsRasterBuffer::from_raster)
            .map_err(js_error)
    }

    /// The last successfully rendered frame, if any.
    pub fn last_render(&self) -> Option<JsRasterBuffer> {
        self.inner.last_render().map(JsRasterBuffer::from_raster)
    }

    /// Composite and encode as PNG, named after the background's file name.
    pub fn export_png(&self, source_name: &str) -> Result<JsExportedImage, JsValue> {
        self.inner
            .export_png(source_name)
            .map(JsExportedImage::from)
            .map_err(js_error)
    }
}

impl JsCompositor {
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            inner: EditorSession::new(config),
        }
    }

    pub(crate) fn begin(&mut self, layer: Layer) -> DecodeTicket {
        self.inner.begin_load(layer)
    }

    pub(crate) fn finish(&mut self, layer: Layer, generation: u64, bytes: &[u8]) -> SlotUpdate {
        let ticket = DecodeTicket::from_parts(layer, generation);
        let outcome = self.inner.decode(ticket, bytes);
        self.inner.finish_load(outcome)
    }

    pub(crate) fn transform(&self) -> TransformState {
        self.inner.transform()
    }
}
