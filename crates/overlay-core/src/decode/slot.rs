//! Generation-tagged loading of one image layer.
//!
//! Decoding is the only slow step in the engine, so hosts are free to run it
//! off the event loop. Every request takes a [`DecodeTicket`]; when a newer
//! request is issued, results from older tickets are dropped on arrival.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{ImageError, ImageSource, SourceState};
use crate::config::EngineConfig;

/// Which image of the pair a load targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    Background,
    Overlay,
}

/// Tag identifying one decode request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeTicket {
    layer: Layer,
    generation: u64,
}

impl DecodeTicket {
    /// Rebuild a ticket from its parts, e.g. after passing it through a host.
    pub fn from_parts(layer: Layer, generation: u64) -> Self {
        Self { layer, generation }
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Decode `bytes` for this ticket. Safe to call on any thread.
    pub fn decode(self, bytes: &[u8], config: &EngineConfig) -> DecodeOutcome {
        DecodeOutcome {
            ticket: self,
            result: ImageSource::load_with_config(bytes, config),
        }
    }
}

/// A finished decode, ready to hand back to its slot.
#[derive(Debug, Clone)]
pub struct DecodeOutcome {
    pub ticket: DecodeTicket,
    pub result: Result<ImageSource, ImageError>,
}

/// What completing a decode did to the slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotUpdate {
    /// The new image replaced the previous one.
    Applied,
    /// A newer request superseded this one; the result was discarded.
    Stale,
    /// Decoding failed; the previous image (if any) is still current.
    Failed(ImageError),
}

/// Holds the current image of one layer and tracks in-flight requests.
#[derive(Debug, Clone)]
pub struct ImageSlot {
    layer: Layer,
    current: ImageSource,
    last_error: Option<ImageError>,
    latest_generation: u64,
    pending: bool,
}

impl ImageSlot {
    pub fn new(layer: Layer) -> Self {
        Self {
            layer,
            current: ImageSource::empty(),
            last_error: None,
            latest_generation: 0,
            pending: false,
        }
    }

    /// Start a new request, superseding any request still in flight.
    pub fn begin(&mut self) -> DecodeTicket {
        self.latest_generation += 1;
        self.pending = true;
        DecodeTicket {
            layer: self.layer,
            generation: self.latest_generation,
        }
    }

    /// Apply a finished decode if it belongs to the latest request.
    pub fn complete(&mut self, outcome: DecodeOutcome) -> SlotUpdate {
        let DecodeOutcome { ticket, result } = outcome;
        if ticket.layer != self.layer || ticket.generation != self.latest_generation || !self.pending
        {
            warn!(
                layer = ?ticket.layer,
                generation = ticket.generation,
                latest = self.latest_generation,
                "dropping stale decode result"
            );
            return SlotUpdate::Stale;
        }
        self.pending = false;

        match result {
            Ok(source) if source.is_ready() => {
                debug!(
                    layer = ?self.layer,
                    width = source.width(),
                    height = source.height(),
                    "image slot updated"
                );
                self.current = source;
                self.last_error = None;
                SlotUpdate::Applied
            }
            Ok(source) => {
                // Only ready sources may become current.
                let error = match source.state() {
                    SourceState::Failed(e) => e,
                    _ => ImageError::DecodeFailed("decode produced no image".to_string()),
                };
                self.fail(error)
            }
            Err(error) => self.fail(error),
        }
    }

    fn fail(&mut self, error: ImageError) -> SlotUpdate {
        warn!(layer = ?self.layer, %error, "image load failed");
        self.last_error = Some(error.clone());
        SlotUpdate::Failed(error)
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    /// The last successfully loaded image (or an empty source).
    pub fn current(&self) -> &ImageSource {
        &self.current
    }

    /// Visible lifecycle state: `Loading` while a request is in flight,
    /// `Failed` after the latest request failed, otherwise the current image's state.
    pub fn state(&self) -> SourceState {
        if self.pending {
            SourceState::Loading
        } else if let Some(error) = &self.last_error {
            SourceState::Failed(error.clone())
        } else {
            self.current.state()
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending
    }

    pub fn last_error(&self) -> Option<&ImageError> {
        self.last_error.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{RasterBuffer, SourceFormat};

    fn ready(width: u32, height: u32) -> ImageSource {
        ImageSource::from_raster(
            RasterBuffer::filled(width, height, [0, 0, 0, 255]),
            SourceFormat::Png,
        )
        .unwrap()
    }

    fn outcome(ticket: DecodeTicket, result: Result<ImageSource, ImageError>) -> DecodeOutcome {
        DecodeOutcome { ticket, result }
    }

    #[test]
    fn test_new_slot_is_empty() {
        let slot = ImageSlot::new(Layer::Background);
        assert_eq!(slot.state(), SourceState::Empty);
        assert!(!slot.current().is_ready());
        assert!(!slot.is_loading());
    }

    #[test]
    fn test_begin_marks_loading() {
        let mut slot = ImageSlot::new(Layer::Overlay);
        let ticket = slot.begin();
        assert_eq!(ticket.layer(), Layer::Overlay);
        assert_eq!(ticket.generation(), 1);
        assert_eq!(slot.state(), SourceState::Loading);
    }

    #[test]
    fn test_complete_applies_latest() {
        let mut slot = ImageSlot::new(Layer::Background);
        let ticket = slot.begin();
        assert_eq!(slot.complete(outcome(ticket, Ok(ready(3, 2)))), SlotUpdate::Applied);
        assert_eq!(slot.state(), SourceState::Ready);
        assert_eq!(slot.current().width(), 3);
    }

    #[test]
    fn test_superseded_result_is_dropped() {
        let mut slot = ImageSlot::new(Layer::Background);
        let old = slot.begin();
        let new = slot.begin();

        // Newer result arrives first, then the late one
        assert_eq!(slot.complete(outcome(new, Ok(ready(5, 5)))), SlotUpdate::Applied);
        assert_eq!(slot.complete(outcome(old, Ok(ready(9, 9)))), SlotUpdate::Stale);
        assert_eq!(slot.current().width(), 5);
    }

    #[test]
    fn test_stale_result_while_newer_pending() {
        let mut slot = ImageSlot::new(Layer::Background);
        let old = slot.begin();
        let _new = slot.begin();
        assert_eq!(slot.complete(outcome(old, Ok(ready(9, 9)))), SlotUpdate::Stale);
        assert!(slot.is_loading());
        assert!(!slot.current().is_ready());
    }

    #[test]
    fn test_duplicate_completion_is_stale() {
        let mut slot = ImageSlot::new(Layer::Background);
        let ticket = slot.begin();
        slot.complete(outcome(ticket, Ok(ready(2, 2))));
        assert_eq!(slot.complete(outcome(ticket, Ok(ready(7, 7)))), SlotUpdate::Stale);
        assert_eq!(slot.current().width(), 2);
    }

    #[test]
    fn test_failure_keeps_previous_image() {
        let mut slot = ImageSlot::new(Layer::Overlay);
        let first = slot.begin();
        slot.complete(outcome(first, Ok(ready(4, 4))));

        let second = slot.begin();
        let update = slot.complete(outcome(second, Err(ImageError::UnsupportedFormat)));
        assert_eq!(update, SlotUpdate::Failed(ImageError::UnsupportedFormat));
        assert_eq!(
            slot.state(),
            SourceState::Failed(ImageError::UnsupportedFormat)
        );
        assert_eq!(slot.last_error(), Some(&ImageError::UnsupportedFormat));
        assert!(slot.current().is_ready());
        assert_eq!(slot.current().width(), 4);

        // A later success clears the error
        let third = slot.begin();
        slot.complete(outcome(third, Ok(ready(6, 6))));
        assert_eq!(slot.state(), SourceState::Ready);
        assert!(slot.last_error().is_none());
    }

    #[test]
    fn test_non_ready_source_counts_as_failure() {
        let mut slot = ImageSlot::new(Layer::Overlay);
        let ticket = slot.begin();
        let update = slot.complete(outcome(ticket, Ok(ImageSource::empty())));
        assert!(matches!(update, SlotUpdate::Failed(ImageError::DecodeFailed(_))));
        assert!(!slot.current().is_ready());
    }

    #[test]
    fn test_ticket_for_other_layer_is_stale() {
        let mut slot = ImageSlot::new(Layer::Background);
        let _ = slot.begin();
        let foreign = DecodeTicket::from_parts(Layer::Overlay, 1);
        assert_eq!(slot.complete(outcome(foreign, Ok(ready(1, 1)))), SlotUpdate::Stale);
    }

    #[test]
    fn test_ticket_decode_reports_errors() {
        let mut slot = ImageSlot::new(Layer::Background);
        let ticket = slot.begin();
        let result = ticket.decode(&[], &EngineConfig::default());
        assert_eq!(result.ticket, ticket);
        assert_eq!(slot.complete(result), SlotUpdate::Failed(ImageError::EmptyInput));
    }
}
