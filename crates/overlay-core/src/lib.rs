//! Overlay Core - Image compositing library
//!
//! This crate provides the core functionality of the overlay editor: decoding
//! a background and an overlay image, turning pointer gestures into an
//! overlay transform, compositing the pair, and exporting the result as PNG.

pub mod composite;
pub mod config;
pub mod decode;
pub mod encode;
pub mod gesture;
pub mod session;
pub mod transform;

pub use composite::{composite, composite_rasters, CompositeError, OverlayPlacement};
pub use config::{ConfigError, EngineConfig};
pub use decode::{ImageError, ImageSource, Layer, RasterBuffer, SourceState};
pub use encode::{export_png, suggested_filename, EncodeError};
pub use gesture::{ContainerSize, GestureController, GestureMode, Point, PointerEvent};
pub use session::{EditorSession, ExportError, ExportedImage};
pub use transform::TransformState;
