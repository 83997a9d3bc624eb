//! Overlay transform model.
//!
//! # Coordinate System
//!
//! - Anchor position is a percentage (0 to 100) of the background's width and height
//! - Scale is a unitless multiplier of the overlay's baseline size
//! - Rotation is in degrees; positive turns clockwise on screen (y axis points down)
//! - Origin is top-left corner

mod state;

pub use state::{TransformState, MAX_POSITION, MAX_SCALE, MIN_POSITION, MIN_SCALE};
