//! One editing session: an image pair, its transform and its renders.

use thiserror::Error;
use tracing::debug;

use crate::composite::{composite, CompositeError};
use crate::config::EngineConfig;
use crate::decode::{
    DecodeOutcome, DecodeTicket, ImageSlot, ImageSource, Layer, RasterBuffer, SlotUpdate,
};
use crate::encode::{export_png, suggested_filename, EncodeError};
use crate::gesture::{ContainerSize, GestureController, GesturePhase, PointerEvent};
use crate::transform::TransformState;

/// Errors raised while exporting a composite.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    #[error(transparent)]
    Composite(#[from] CompositeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// An encoded composite ready to hand to the download layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

/// Owns the background and overlay slots, the gesture controller and the
/// last successful render.
#[derive(Debug, Clone)]
pub struct EditorSession {
    config: EngineConfig,
    background: ImageSlot,
    overlay: ImageSlot,
    gestures: GestureController,
    last_render: Option<RasterBuffer>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl EditorSession {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            background: ImageSlot::new(Layer::Background),
            overlay: ImageSlot::new(Layer::Overlay),
            gestures: GestureController::new(),
            last_render: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn slot_mut(&mut self, layer: Layer) -> &mut ImageSlot {
        match layer {
            Layer::Background => &mut self.background,
            Layer::Overlay => &mut self.overlay,
        }
    }

    pub fn slot(&self, layer: Layer) -> &ImageSlot {
        match layer {
            Layer::Background => &self.background,
            Layer::Overlay => &self.overlay,
        }
    }

    pub fn background(&self) -> &ImageSource {
        self.background.current()
    }

    pub fn overlay(&self) -> &ImageSource {
        self.overlay.current()
    }

    /// True when both images are loaded.
    pub fn is_ready(&self) -> bool {
        self.background().is_ready() && self.overlay().is_ready()
    }

    /// Start loading a new image into `layer`, superseding earlier requests.
    pub fn begin_load(&mut self, layer: Layer) -> DecodeTicket {
        self.slot_mut(layer).begin()
    }

    /// Decode bytes for a ticket using this session's limits.
    pub fn decode(&self, ticket: DecodeTicket, bytes: &[u8]) -> DecodeOutcome {
        ticket.decode(bytes, &self.config)
    }

    /// Hand a finished decode back. When it completes the pair, the
    /// transform returns to its defaults.
    pub fn finish_load(&mut self, outcome: DecodeOutcome) -> SlotUpdate {
        let layer = outcome.ticket.layer();
        let update = self.slot_mut(layer).complete(outcome);
        if update == SlotUpdate::Applied && self.is_ready() {
            debug!(?layer, "image pair ready, resetting transform");
            self.gestures.reset();
        }
        update
    }

    /// Begin, decode and finish in one step.
    pub fn load(&mut self, layer: Layer, bytes: &[u8]) -> SlotUpdate {
        let ticket = self.begin_load(layer);
        let outcome = self.decode(ticket, bytes);
        self.finish_load(outcome)
    }

    /// Snapshot of the current transform.
    pub fn transform(&self) -> TransformState {
        self.gestures.transform()
    }

    pub fn gesture_phase(&self) -> GesturePhase {
        self.gestures.phase()
    }

    pub fn gestures(&self) -> &GestureController {
        &self.gestures
    }

    /// Feed a pointer event. Ignored until both images are ready.
    pub fn handle_pointer(&mut self, event: &PointerEvent, container: ContainerSize) -> TransformState {
        if !self.is_ready() {
            return self.transform();
        }
        self.gestures.handle(event, container)
    }

    /// Update the container size of an active gesture.
    pub fn resize_container(&mut self, container: ContainerSize) {
        self.gestures.resize_container(container);
    }

    pub fn reset_transform(&mut self) {
        self.gestures.reset();
    }

    /// Composite the current pair with the current transform and keep the
    /// result. On error the previous render stays available.
    pub fn render(&mut self) -> Result<&RasterBuffer, CompositeError> {
        let output = composite(self.background(), self.overlay(), &self.transform())?;
        Ok(self.last_render.insert(output))
    }

    /// The last successful render, if any.
    pub fn last_render(&self) -> Option<&RasterBuffer> {
        self.last_render.as_ref()
    }

    /// Composite and encode to PNG, naming the file after `source_name`.
    pub fn export_png(&self, source_name: &str) -> Result<ExportedImage, ExportError> {
        let output = composite(self.background(), self.overlay(), &self.transform())?;
        let bytes = export_png(&output)?;
        Ok(ExportedImage {
            filename: suggested_filename(source_name),
            width: output.width,
            height: output.height,
            bytes,
        })
    }
}
