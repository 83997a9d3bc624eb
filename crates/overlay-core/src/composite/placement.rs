//! Where the overlay lands on the background.
//!
//! The overlay is drawn as if by the canvas sequence
//! `translate(anchor) -> rotate(angle) -> translate(-w/2, -h/2) -> draw`,
//! so its center sits on the anchor and it turns about that point. Here the
//! sequence is kept as an explicit forward/inverse coordinate mapping.

use crate::transform::TransformState;

/// Overlay draw size at scale 1.0, as a fraction of its pixel size.
pub const OVERLAY_BASE_SCALE: f64 = 0.3;

/// The overlay's footprint in background pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayPlacement {
    /// Anchor (footprint center) X in background pixels.
    pub anchor_x: f64,
    /// Anchor (footprint center) Y in background pixels.
    pub anchor_y: f64,
    /// Footprint width in background pixels.
    pub width: f64,
    /// Footprint height in background pixels.
    pub height: f64,
    cos: f64,
    sin: f64,
}

impl OverlayPlacement {
    pub fn new(
        background_width: u32,
        background_height: u32,
        overlay_width: u32,
        overlay_height: u32,
        transform: &TransformState,
    ) -> Self {
        let radians = transform.rotation_degrees.to_radians();
        Self {
            anchor_x: transform.x / 100.0 * background_width as f64,
            anchor_y: transform.y / 100.0 * background_height as f64,
            width: overlay_width as f64 * transform.scale * OVERLAY_BASE_SCALE,
            height: overlay_height as f64 * transform.scale * OVERLAY_BASE_SCALE,
            cos: radians.cos(),
            sin: radians.sin(),
        }
    }

    /// True when the footprint covers no area.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Distance from the anchor to a footprint corner. Nothing outside this
    /// radius is ever touched, whatever the rotation.
    pub fn bounding_radius(&self) -> f64 {
        0.5 * (self.width * self.width + self.height * self.height).sqrt()
    }

    /// Map footprint-local coordinates (origin at the overlay's top-left) to
    /// background coordinates.
    pub fn to_background(&self, u: f64, v: f64) -> (f64, f64) {
        let lx = u - self.width / 2.0;
        let ly = v - self.height / 2.0;
        (
            self.anchor_x + lx * self.cos - ly * self.sin,
            self.anchor_y + lx * self.sin + ly * self.cos,
        )
    }

    /// Map background coordinates back into footprint-local coordinates.
    pub fn to_local(&self, x: f64, y: f64) -> (f64, f64) {
        let dx = x - self.anchor_x;
        let dy = y - self.anchor_y;
        (
            dx * self.cos + dy * self.sin + self.width / 2.0,
            -dx * self.sin + dy * self.cos + self.height / 2.0,
        )
    }

    /// Footprint corners in background space: top-left, top-right,
    /// bottom-right, bottom-left of the unrotated overlay.
    pub fn corners(&self) -> [(f64, f64); 4] {
        [
            self.to_background(0.0, 0.0),
            self.to_background(self.width, 0.0),
            self.to_background(self.width, self.height),
            self.to_background(0.0, self.height),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    #[test]
    fn test_default_placement() {
        let p = OverlayPlacement::new(100, 100, 50, 50, &TransformState::default());
        assert_eq!(p.anchor_x, 50.0);
        assert_eq!(p.anchor_y, 50.0);
        assert!((p.width - 15.0).abs() < 1e-12);
        assert!((p.height - 15.0).abs() < 1e-12);
        assert!(close(p.corners()[0], (42.5, 42.5)));
        assert!(close(p.corners()[2], (57.5, 57.5)));
    }

    #[test]
    fn test_scale_multiplies_base_size() {
        let t = TransformState::default().rescale(1.0);
        let p = OverlayPlacement::new(400, 300, 200, 100, &t);
        assert!((p.width - 120.0).abs() < 1e-9);
        assert!((p.height - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotation_moves_corners_clockwise() {
        let t = TransformState::default().rotate_to(90.0);
        let p = OverlayPlacement::new(100, 100, 100, 50, &t);
        // 30x15 footprint turned a quarter: its top-left ends up top-right
        let [tl, tr, br, bl] = p.corners();
        assert!(close(tl, (57.5, 35.0)), "{:?}", tl);
        assert!(close(tr, (57.5, 65.0)), "{:?}", tr);
        assert!(close(br, (42.5, 65.0)), "{:?}", br);
        assert!(close(bl, (42.5, 35.0)), "{:?}", bl);
    }

    #[test]
    fn test_local_round_trip() {
        let t = TransformState::default().rotate_to(33.0).translate(-12.0, 7.0);
        let p = OverlayPlacement::new(640, 480, 120, 80, &t);
        let (x, y) = p.to_background(10.0, 20.0);
        assert!(close(p.to_local(x, y), (10.0, 20.0)));
    }

    #[test]
    fn test_bounding_radius_contains_corners() {
        let t = TransformState::default().rotate_to(27.0);
        let p = OverlayPlacement::new(300, 300, 90, 40, &t);
        for (x, y) in p.corners() {
            let d = ((x - p.anchor_x).powi(2) + (y - p.anchor_y).powi(2)).sqrt();
            assert!(d <= p.bounding_radius() + 1e-9);
        }
    }

    #[test]
    fn test_empty_footprint() {
        let p = OverlayPlacement::new(100, 100, 0, 10, &TransformState::default());
        assert!(p.is_empty());
    }
}
