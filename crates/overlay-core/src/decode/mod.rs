//! Image loading for the compositing engine.
//!
//! This module provides functionality for:
//! - Sniffing and decoding JPEG, PNG, GIF and WEBP uploads to RGBA8
//! - Enforcing byte and dimension limits before decoding
//! - Correcting EXIF orientation of camera photos
//! - Dropping late results from superseded uploads
//!
//! # Architecture
//!
//! Decoding is the only long-running operation in the engine. A host may run
//! [`DecodeTicket::decode`] on a worker and hand the [`DecodeOutcome`] back to
//! the owning [`ImageSlot`], which applies it only if no newer upload started.
//!
//! # Examples
//!
//! ```ignore
//! use overlay_core::decode::ImageSource;
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let source = ImageSource::load(&bytes, 10 * 1024 * 1024).unwrap();
//! println!("Decoded {}x{} image", source.width(), source.height());
//! ```

mod orientation;
mod slot;
mod source;
mod types;

pub use orientation::read_orientation;
pub use slot::{DecodeOutcome, DecodeTicket, ImageSlot, Layer, SlotUpdate};
pub use source::{ImageSource, SourceState};
pub use types::{ImageError, Orientation, RasterBuffer, SourceFormat};
