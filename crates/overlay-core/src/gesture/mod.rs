//! Pointer gesture handling for overlay placement.
//!
//! [`GestureController`] is the single writer of the [`TransformState`]. It
//! runs a small state machine:
//!
//! ```text
//! Idle --down(Drag)--> Dragging --up--> Idle
//!      --down(Resize)-> Resizing --up--> Idle
//!      --down(Rotate)-> Rotating --up--> Idle
//! ```
//!
//! Pointer coordinates are container-local pixels with the origin at the
//! container's top-left. Deciding which handle was hit is the caller's job;
//! the controller only receives the resolved [`GestureMode`].
//!
//! Dragging and resizing are delta based (each move is measured from the
//! previous pointer position). Rotation is absolute: every move sets the
//! angle of the pointer around the container center.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::transform::TransformState;

/// Pixels of pointer travel that change the scale by 1.0 while resizing.
const RESIZE_PIXELS_PER_UNIT: f64 = 100.0;

/// A point in container-local pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Size of the on-screen container the pointer moves in.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
}

impl ContainerSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when percentages can be computed against this size.
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Which handle a gesture was started on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GestureMode {
    Drag,
    Resize,
    Rotate,
}

/// Current state of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GesturePhase {
    Idle,
    Dragging,
    Resizing,
    Rotating,
}

impl From<GestureMode> for GesturePhase {
    fn from(mode: GestureMode) -> Self {
        match mode {
            GestureMode::Drag => GesturePhase::Dragging,
            GestureMode::Resize => GesturePhase::Resizing,
            GestureMode::Rotate => GesturePhase::Rotating,
        }
    }
}

/// Kind of a normalized pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

/// A pointer event as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub x: f64,
    pub y: f64,
    /// Handle under the pointer; only meaningful for `Down`.
    pub mode_hint: Option<GestureMode>,
}

impl PointerEvent {
    pub fn down(x: f64, y: f64, mode: GestureMode) -> Self {
        Self {
            kind: PointerKind::Down,
            x,
            y,
            mode_hint: Some(mode),
        }
    }

    pub fn moved(x: f64, y: f64) -> Self {
        Self {
            kind: PointerKind::Move,
            x,
            y,
            mode_hint: None,
        }
    }

    pub fn up(x: f64, y: f64) -> Self {
        Self {
            kind: PointerKind::Up,
            x,
            y,
            mode_hint: None,
        }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Bookkeeping for the gesture in progress. Lives from pointer-down to pointer-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSession {
    pub mode: GestureMode,
    /// Last pointer position (not advanced while rotating).
    pub anchor_point: Point,
    pub container_size: ContainerSize,
}

/// Converts pointer events into [`TransformState`] updates.
#[derive(Debug, Clone, Default)]
pub struct GestureController {
    transform: TransformState,
    session: Option<GestureSession>,
}

impl GestureController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current transform.
    pub fn transform(&self) -> TransformState {
        self.transform
    }

    pub fn phase(&self) -> GesturePhase {
        self.session
            .map_or(GesturePhase::Idle, |session| session.mode.into())
    }

    pub fn is_idle(&self) -> bool {
        self.session.is_none()
    }

    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    /// Restore the default transform and abandon any active gesture.
    pub fn reset(&mut self) {
        self.transform = TransformState::default();
        self.session = None;
    }

    /// Begin a gesture. Returns false, leaving the controller untouched, when
    /// a gesture is already active, the container has no area, or the point is
    /// not finite.
    pub fn pointer_down(&mut self, point: Point, mode: GestureMode, container: ContainerSize) -> bool {
        if self.session.is_some() {
            trace!(?mode, "pointer down ignored: gesture already active");
            return false;
        }
        if !container.is_usable() || !point.is_finite() {
            debug!(?container, "pointer down rejected: unusable container or point");
            return false;
        }

        self.session = Some(GestureSession {
            mode,
            anchor_point: point,
            container_size: container,
        });
        debug!(?mode, x = point.x, y = point.y, "gesture started");
        true
    }

    /// Feed a pointer move. Returns the transform after the move.
    pub fn pointer_move(&mut self, point: Point) -> TransformState {
        let Some(session) = self.session.as_mut() else {
            return self.transform;
        };
        if !point.is_finite() {
            return self.transform;
        }

        let previous = session.anchor_point;
        let container = session.container_size;
        self.transform = match session.mode {
            GestureMode::Drag => {
                let dx = point.x - previous.x;
                let dy = point.y - previous.y;
                session.anchor_point = point;
                self.transform.translate(
                    dx / container.width * 100.0,
                    dy / container.height * 100.0,
                )
            }
            GestureMode::Resize => {
                let dx = point.x - previous.x;
                let dy = point.y - previous.y;
                session.anchor_point = point;
                let distance = (dx * dx + dy * dy).sqrt();
                // Moving up grows the overlay, moving down shrinks it.
                self.transform
                    .rescale(distance / RESIZE_PIXELS_PER_UNIT * sign(-dy))
            }
            GestureMode::Rotate => {
                let center = container.center();
                let angle = (point.y - center.y).atan2(point.x - center.x).to_degrees();
                self.transform.rotate_to(angle)
            }
        };

        trace!(
            x = self.transform.x,
            y = self.transform.y,
            scale = self.transform.scale,
            rotation = self.transform.rotation_degrees,
            "gesture moved"
        );
        self.transform
    }

    /// End the active gesture; the current transform becomes the resting state.
    pub fn pointer_up(&mut self) -> TransformState {
        if let Some(session) = self.session.take() {
            debug!(mode = ?session.mode, "gesture ended");
        }
        self.transform
    }

    /// Update the container size mid-gesture. Only later moves see the new
    /// size; deltas already applied are kept. Unusable sizes are ignored.
    pub fn resize_container(&mut self, container: ContainerSize) {
        if let Some(session) = self.session.as_mut() {
            if container.is_usable() {
                session.container_size = container;
            }
        }
    }

    /// Dispatch a host pointer event together with the current container size.
    pub fn handle(&mut self, event: &PointerEvent, container: ContainerSize) -> TransformState {
        match event.kind {
            PointerKind::Down => {
                if let Some(mode) = event.mode_hint {
                    self.pointer_down(event.point(), mode, container);
                }
                self.transform
            }
            PointerKind::Move => {
                if self
                    .session
                    .is_some_and(|session| session.container_size != container)
                {
                    self.resize_container(container);
                }
                self.pointer_move(event.point())
            }
            PointerKind::Up => self.pointer_up(),
        }
    }
}

/// Sign with zero mapping to zero (`f64::signum` maps 0.0 to 1.0).
#[inline]
fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: ContainerSize = ContainerSize {
        width: 200.0,
        height: 200.0,
    };

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_starts_idle_with_default_transform() {
        let ctrl = GestureController::new();
        assert_eq!(ctrl.phase(), GesturePhase::Idle);
        assert!(ctrl.is_idle());
        assert!(ctrl.transform().is_default());
    }

    #[test]
    fn test_drag_sequence() {
        let mut ctrl = GestureController::new();
        assert!(ctrl.pointer_down(Point::new(100.0, 100.0), GestureMode::Drag, SQUARE));
        assert_eq!(ctrl.phase(), GesturePhase::Dragging);

        ctrl.pointer_move(Point::new(110.0, 100.0));
        ctrl.pointer_move(Point::new(110.0, 110.0));
        let t = ctrl.pointer_up();

        assert!(approx(t.x, 55.0), "x was {}", t.x);
        assert!(approx(t.y, 55.0), "y was {}", t.y);
        assert_eq!(ctrl.phase(), GesturePhase::Idle);
    }

    #[test]
    fn test_drag_normalizes_per_axis() {
        let mut ctrl = GestureController::new();
        let container = ContainerSize::new(400.0, 100.0);
        ctrl.pointer_down(Point::new(0.0, 0.0), GestureMode::Drag, container);
        let t = ctrl.pointer_move(Point::new(40.0, 10.0));
        assert!(approx(t.x, 60.0));
        assert!(approx(t.y, 60.0));
    }

    #[test]
    fn test_drag_clamps_at_edges() {
        let mut ctrl = GestureController::new();
        ctrl.pointer_down(Point::new(0.0, 0.0), GestureMode::Drag, SQUARE);
        let t = ctrl.pointer_move(Point::new(1000.0, -1000.0));
        assert_eq!(t.x, 100.0);
        assert_eq!(t.y, 0.0);
    }

    #[test]
    fn test_resize_moving_up_grows() {
        let mut ctrl = GestureController::new();
        ctrl.pointer_down(Point::new(50.0, 50.0), GestureMode::Resize, SQUARE);
        assert_eq!(ctrl.phase(), GesturePhase::Resizing);

        // 30-40-50 triangle: distance 50, upward
        let t = ctrl.pointer_move(Point::new(80.0, 10.0));
        assert!(approx(t.scale, 1.5), "scale was {}", t.scale);
    }

    #[test]
    fn test_resize_moving_down_shrinks() {
        let mut ctrl = GestureController::new();
        ctrl.pointer_down(Point::new(50.0, 50.0), GestureMode::Resize, SQUARE);
        let t = ctrl.pointer_move(Point::new(50.0, 70.0));
        assert!(approx(t.scale, 0.8), "scale was {}", t.scale);
    }

    #[test]
    fn test_resize_horizontal_move_has_no_effect() {
        let mut ctrl = GestureController::new();
        ctrl.pointer_down(Point::new(50.0, 50.0), GestureMode::Resize, SQUARE);
        let t = ctrl.pointer_move(Point::new(90.0, 50.0));
        assert_eq!(t.scale, 1.0);
    }

    #[test]
    fn test_resize_is_delta_based() {
        let mut ctrl = GestureController::new();
        ctrl.pointer_down(Point::new(50.0, 100.0), GestureMode::Resize, SQUARE);
        ctrl.pointer_move(Point::new(50.0, 90.0));
        let t = ctrl.pointer_move(Point::new(50.0, 80.0));
        assert!(approx(t.scale, 1.2), "scale was {}", t.scale);
    }

    #[test]
    fn test_resize_clamps() {
        let mut ctrl = GestureController::new();
        ctrl.pointer_down(Point::new(0.0, 1000.0), GestureMode::Resize, SQUARE);
        assert_eq!(ctrl.pointer_move(Point::new(0.0, 0.0)).scale, 3.0);
        assert_eq!(ctrl.pointer_move(Point::new(0.0, 1000.0)).scale, 0.1);
    }

    #[test]
    fn test_rotate_uses_absolute_angle_around_center() {
        let mut ctrl = GestureController::new();
        ctrl.pointer_down(Point::new(150.0, 100.0), GestureMode::Rotate, SQUARE);
        assert_eq!(ctrl.phase(), GesturePhase::Rotating);

        // Directly below the center
        let t = ctrl.pointer_move(Point::new(100.0, 150.0));
        assert!(approx(t.rotation_degrees, 90.0));

        // Same point again gives the same angle; nothing accumulates
        let t = ctrl.pointer_move(Point::new(100.0, 150.0));
        assert!(approx(t.rotation_degrees, 90.0));

        // Left of center
        let t = ctrl.pointer_move(Point::new(20.0, 100.0));
        assert!(approx(t.rotation_degrees, 180.0));
    }

    #[test]
    fn test_rotate_does_not_advance_anchor() {
        let mut ctrl = GestureController::new();
        let start = Point::new(150.0, 100.0);
        ctrl.pointer_down(start, GestureMode::Rotate, SQUARE);
        ctrl.pointer_move(Point::new(100.0, 150.0));
        assert_eq!(ctrl.session().unwrap().anchor_point, start);
    }

    #[test]
    fn test_zero_container_stays_idle() {
        let mut ctrl = GestureController::new();
        assert!(!ctrl.pointer_down(
            Point::new(0.0, 0.0),
            GestureMode::Drag,
            ContainerSize::new(0.0, 0.0)
        ));
        assert_eq!(ctrl.phase(), GesturePhase::Idle);

        let t = ctrl.pointer_move(Point::new(50.0, 50.0));
        assert!(t.is_default());

        assert!(!ctrl.pointer_down(
            Point::new(0.0, 0.0),
            GestureMode::Resize,
            ContainerSize::new(100.0, 0.0)
        ));
        assert!(ctrl.is_idle());
    }

    #[test]
    fn test_down_while_active_is_ignored() {
        let mut ctrl = GestureController::new();
        ctrl.pointer_down(Point::new(10.0, 10.0), GestureMode::Drag, SQUARE);
        assert!(!ctrl.pointer_down(Point::new(90.0, 90.0), GestureMode::Rotate, SQUARE));
        assert_eq!(ctrl.phase(), GesturePhase::Dragging);
        assert_eq!(ctrl.session().unwrap().anchor_point, Point::new(10.0, 10.0));
    }

    #[test]
    fn test_move_while_idle_is_ignored() {
        let mut ctrl = GestureController::new();
        let t = ctrl.pointer_move(Point::new(500.0, 500.0));
        assert!(t.is_default());
        assert!(ctrl.pointer_up().is_default());
    }

    #[test]
    fn test_container_resize_affects_only_future_moves() {
        let mut ctrl = GestureController::new();
        ctrl.pointer_down(Point::new(0.0, 0.0), GestureMode::Drag, SQUARE);
        ctrl.pointer_move(Point::new(20.0, 0.0)); // +10%
        ctrl.resize_container(ContainerSize::new(400.0, 400.0));
        let t = ctrl.pointer_move(Point::new(40.0, 0.0)); // +5%
        assert!(approx(t.x, 65.0), "x was {}", t.x);
    }

    #[test]
    fn test_container_resize_to_zero_is_ignored() {
        let mut ctrl = GestureController::new();
        ctrl.pointer_down(Point::new(0.0, 0.0), GestureMode::Drag, SQUARE);
        ctrl.resize_container(ContainerSize::new(0.0, 0.0));
        assert_eq!(ctrl.session().unwrap().container_size, SQUARE);
        let t = ctrl.pointer_move(Point::new(20.0, 0.0));
        assert!(approx(t.x, 60.0));
    }

    #[test]
    fn test_non_finite_points_are_ignored() {
        let mut ctrl = GestureController::new();
        assert!(!ctrl.pointer_down(Point::new(f64::NAN, 0.0), GestureMode::Drag, SQUARE));

        ctrl.pointer_down(Point::new(0.0, 0.0), GestureMode::Drag, SQUARE);
        let t = ctrl.pointer_move(Point::new(f64::INFINITY, f64::NAN));
        assert!(t.is_default());
        assert_eq!(ctrl.session().unwrap().anchor_point, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_handle_dispatches_events() {
        let mut ctrl = GestureController::new();
        ctrl.handle(&PointerEvent::down(100.0, 100.0, GestureMode::Drag), SQUARE);
        ctrl.handle(&PointerEvent::moved(110.0, 100.0), SQUARE);
        ctrl.handle(&PointerEvent::moved(110.0, 110.0), SQUARE);
        let t = ctrl.handle(&PointerEvent::up(110.0, 110.0), SQUARE);

        assert!(approx(t.x, 55.0));
        assert!(approx(t.y, 55.0));
        assert!(ctrl.is_idle());
    }

    #[test]
    fn test_handle_down_without_hint_stays_idle() {
        let mut ctrl = GestureController::new();
        let event = PointerEvent {
            kind: PointerKind::Down,
            x: 10.0,
            y: 10.0,
            mode_hint: None,
        };
        ctrl.handle(&event, SQUARE);
        assert!(ctrl.is_idle());
    }

    #[test]
    fn test_handle_move_picks_up_container_change() {
        let mut ctrl = GestureController::new();
        ctrl.handle(&PointerEvent::down(0.0, 0.0, GestureMode::Drag), SQUARE);
        let t = ctrl.handle(
            &PointerEvent::moved(40.0, 0.0),
            ContainerSize::new(400.0, 400.0),
        );
        assert!(approx(t.x, 60.0), "x was {}", t.x);
    }

    #[test]
    fn test_reset() {
        let mut ctrl = GestureController::new();
        ctrl.pointer_down(Point::new(0.0, 0.0), GestureMode::Drag, SQUARE);
        ctrl.pointer_move(Point::new(50.0, 50.0));
        ctrl.reset();
        assert!(ctrl.is_idle());
        assert!(ctrl.transform().is_default());
    }

    #[test]
    fn test_sign() {
        assert_eq!(sign(3.0), 1.0);
        assert_eq!(sign(-0.5), -1.0);
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(sign(-0.0), 0.0);
    }
}
