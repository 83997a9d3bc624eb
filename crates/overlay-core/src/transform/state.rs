//! Overlay placement as an immutable value.

use serde::{Deserialize, Serialize};

/// Smallest allowed overlay scale.
pub const MIN_SCALE: f64 = 0.1;
/// Largest allowed overlay scale.
pub const MAX_SCALE: f64 = 3.0;
/// Lower bound of the anchor position, in percent.
pub const MIN_POSITION: f64 = 0.0;
/// Upper bound of the anchor position, in percent.
pub const MAX_POSITION: f64 = 100.0;

/// Position, scale and rotation of the overlay relative to the background.
///
/// `x` and `y` are percentages of the background's width and height, so the
/// state is independent of resolution. Every operation returns a new value;
/// `x`/`y` stay within `[0, 100]` and `scale` within `[0.1, 3.0]`.
/// Deserialized values are clamped into the same ranges. The fields are
/// public for reading; a struct literal is not validated, use
/// [`TransformState::clamped`] when building one from untrusted numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "TransformFields")]
pub struct TransformState {
    /// Anchor X position (0 to 100, percent of background width)
    pub x: f64,
    /// Anchor Y position (0 to 100, percent of background height)
    pub y: f64,
    /// Size multiplier (0.1 to 3.0)
    pub scale: f64,
    /// Rotation about the anchor in degrees, clockwise; stored unwrapped
    pub rotation_degrees: f64,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            x: 50.0,
            y: 50.0,
            scale: 1.0,
            rotation_degrees: 0.0,
        }
    }
}

impl TransformState {
    /// The centered, unscaled, unrotated state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a state from raw values, clamping position and scale into
    /// range. Non-finite values fall back to the defaults.
    pub fn clamped(x: f64, y: f64, scale: f64, rotation_degrees: f64) -> Self {
        let defaults = Self::default();
        let fit = |value: f64, fallback: f64, min: f64, max: f64| {
            if value.is_finite() {
                value.clamp(min, max)
            } else {
                fallback
            }
        };
        Self {
            x: fit(x, defaults.x, MIN_POSITION, MAX_POSITION),
            y: fit(y, defaults.y, MIN_POSITION, MAX_POSITION),
            scale: fit(scale, defaults.scale, MIN_SCALE, MAX_SCALE),
            rotation_degrees: if rotation_degrees.is_finite() {
                rotation_degrees
            } else {
                defaults.rotation_degrees
            },
        }
    }

    /// Check if all values are at their defaults
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Move the anchor by percentage deltas, clamping each axis to `[0, 100]`.
    ///
    /// A non-finite delta leaves that axis unchanged.
    pub fn translate(&self, delta_x_pct: f64, delta_y_pct: f64) -> Self {
        Self {
            x: offset_clamped(self.x, delta_x_pct, MIN_POSITION, MAX_POSITION),
            y: offset_clamped(self.y, delta_y_pct, MIN_POSITION, MAX_POSITION),
            ..*self
        }
    }

    /// Adjust the scale by `delta`, clamping to `[0.1, 3.0]`.
    pub fn rescale(&self, delta: f64) -> Self {
        Self {
            scale: offset_clamped(self.scale, delta, MIN_SCALE, MAX_SCALE),
            ..*self
        }
    }

    /// Set the absolute rotation angle in degrees.
    pub fn rotate_to(&self, angle_degrees: f64) -> Self {
        if !angle_degrees.is_finite() {
            return *self;
        }
        Self {
            rotation_degrees: angle_degrees,
            ..*self
        }
    }

    /// Rotation reduced to `[0, 360)`.
    pub fn normalized_rotation(&self) -> f64 {
        self.rotation_degrees.rem_euclid(360.0)
    }
}

/// Unchecked wire form of [`TransformState`].
#[derive(Deserialize)]
struct TransformFields {
    x: f64,
    y: f64,
    scale: f64,
    rotation_degrees: f64,
}

impl From<TransformFields> for TransformState {
    fn from(fields: TransformFields) -> Self {
        Self::clamped(fields.x, fields.y, fields.scale, fields.rotation_degrees)
    }
}

#[inline]
fn offset_clamped(value: f64, delta: f64, min: f64, max: f64) -> f64 {
    let next = value + delta;
    if next.is_finite() {
        next.clamp(min, max)
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let t = TransformState::default();
        assert_eq!(t.x, 50.0);
        assert_eq!(t.y, 50.0);
        assert_eq!(t.scale, 1.0);
        assert_eq!(t.rotation_degrees, 0.0);
        assert!(t.is_default());
        assert_eq!(TransformState::new(), t);
    }

    #[test]
    fn test_translate() {
        let t = TransformState::default().translate(5.0, -10.0);
        assert_eq!(t.x, 55.0);
        assert_eq!(t.y, 40.0);
        assert_eq!(t.scale, 1.0);
        assert!(!t.is_default());
    }

    #[test]
    fn test_translate_clamps() {
        let t = TransformState::default().translate(80.0, -75.0);
        assert_eq!(t.x, 100.0);
        assert_eq!(t.y, 0.0);
    }

    #[test]
    fn test_translate_is_pure() {
        let original = TransformState::default();
        let _ = original.translate(10.0, 10.0);
        assert!(original.is_default());
    }

    #[test]
    fn test_rescale_clamps() {
        let t = TransformState::default();
        assert_eq!(t.rescale(0.5).scale, 1.5);
        assert_eq!(t.rescale(10.0).scale, MAX_SCALE);
        assert_eq!(t.rescale(-10.0).scale, MIN_SCALE);
    }

    #[test]
    fn test_rotate_to_is_absolute() {
        let t = TransformState::default().rotate_to(30.0).rotate_to(45.0);
        assert_eq!(t.rotation_degrees, 45.0);

        // Stored raw, not wrapped
        let t = t.rotate_to(-450.0);
        assert_eq!(t.rotation_degrees, -450.0);
        assert_eq!(t.normalized_rotation(), 270.0);
    }

    #[test]
    fn test_clamped_constructor() {
        let t = TransformState::clamped(150.0, -3.0, 9.0, 45.0);
        assert_eq!((t.x, t.y, t.scale, t.rotation_degrees), (100.0, 0.0, 3.0, 45.0));

        let t = TransformState::clamped(f64::NAN, 20.0, f64::INFINITY, f64::NAN);
        assert_eq!((t.x, t.y, t.scale, t.rotation_degrees), (50.0, 20.0, 1.0, 0.0));
    }

    #[test]
    fn test_deserialize_clamps_out_of_range_values() {
        let t: TransformState =
            toml::from_str("x = 150.0\ny = -3.0\nscale = 9.0\nrotation_degrees = 45.0").unwrap();
        assert_eq!(t.x, MAX_POSITION);
        assert_eq!(t.y, MIN_POSITION);
        assert_eq!(t.scale, MAX_SCALE);
        assert_eq!(t.rotation_degrees, 45.0);

        let t: TransformState =
            toml::from_str("x = 10.0\ny = 20.0\nscale = 0.01\nrotation_degrees = -90.0").unwrap();
        assert_eq!((t.x, t.y, t.scale), (10.0, 20.0, MIN_SCALE));
    }

    #[test]
    fn test_serialize_round_trip_keeps_valid_state() {
        let original = TransformState::default().translate(12.5, -7.5).rescale(0.5).rotate_to(30.0);
        let text = toml::to_string(&original).unwrap();
        let back: TransformState = toml::from_str(&text).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn test_non_finite_inputs_are_ignored() {
        let t = TransformState::default();
        assert_eq!(t.translate(f64::NAN, 5.0).x, 50.0);
        assert_eq!(t.translate(f64::NAN, 5.0).y, 55.0);
        assert_eq!(t.translate(f64::INFINITY, 0.0).x, 50.0);
        assert_eq!(t.rescale(f64::NAN).scale, 1.0);
        assert_eq!(t.rescale(f64::NEG_INFINITY).scale, 1.0);
        assert_eq!(t.rotate_to(f64::NAN).rotation_degrees, 0.0);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
