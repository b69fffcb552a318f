//! Fixed-axis rotation used to break ties when the four-ball tangent-sphere
//! linear system is singular.

use super::point::Point;
use glam::DQuat;

/// Axis used for the tangent-sphere retry rotation: `(1,1,1)` normalized, a
/// direction generic enough that it is never aligned with an axis-parallel
/// degenerate quadruple.
pub fn retry_axis() -> Point {
    Point::new(1.0, 1.0, 1.0).normalize()
}

/// Step angle for each retry, in degrees.
pub const STEP_ANGLE_DEGREES: f64 = 30.0;

/// Maximum number of rotation retries before a tangent-sphere computation
/// gives up and reports "no tangent" (§4.1, §4.4 failure semantics).
pub const MAX_ROTATION_STEPS: u32 = 3;

/// Rotate `p` about `retry_axis()` by `step * STEP_ANGLE_DEGREES` degrees.
pub fn rotate_forward(p: Point, step: u32) -> Point {
    let angle = (step as f64) * STEP_ANGLE_DEGREES.to_radians();
    DQuat::from_axis_angle(retry_axis(), angle) * p
}

/// Undo [`rotate_forward`] for the same `step`.
pub fn rotate_backward(p: Point, step: u32) -> Point {
    let angle = (step as f64) * STEP_ANGLE_DEGREES.to_radians();
    DQuat::from_axis_angle(retry_axis(), -angle) * p
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_then_backward_is_identity() {
        let p = Point::new(1.0, 2.0, -3.0);
        for step in 0..MAX_ROTATION_STEPS {
            let rotated = rotate_forward(p, step);
            let back = rotate_backward(rotated, step);
            assert!((back - p).length() < 1e-9);
        }
    }

    #[test]
    fn rotation_preserves_length() {
        let p = Point::new(2.0, -1.0, 0.5);
        let rotated = rotate_forward(p, 2);
        assert!((rotated.length() - p.length()).abs() < 1e-9);
    }
}
