//! Planar geometry for trajectory candidates.
//!
//! # Submodules
//!
//! - [`bezier`]: cubic Bézier evaluation and construction
//!
//! The free functions here are the small vector utilities shared by the
//! genetic operators: rotation by an angle, signed angles between headings,
//! and the circumscribed-circle radius used for curvature telemetry.
//!
//! # Reference
//! Circle through three points: <https://math.stackexchange.com/a/3503338>

pub mod bezier;

pub use bezier::{evaluate_cubic, evaluate_quadratic, BezierCurve};

use crate::models::Vec2;

/// Rotates `v` counter-clockwise by `degrees`.
pub fn rotate(v: Vec2, degrees: f64) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Signed angle in degrees from `from` to `to`, in `(-180, 180]`.
///
/// Zero when either vector is zero.
pub fn signed_angle_deg(from: Vec2, to: Vec2) -> f64 {
    if from.length_squared() == 0.0 || to.length_squared() == 0.0 {
        return 0.0;
    }
    let cross = from.x * to.y - from.y * to.x;
    cross.atan2(from.dot(to)).to_degrees()
}

/// Radius of the circle through three points.
///
/// `None` when two points coincide or the points are collinear, where the
/// radius is undefined.
pub fn circle_radius(a: Vec2, b: Vec2, c: Vec2) -> Option<f64> {
    if a == b || b == c || c == a {
        return None;
    }
    let ab = b - a;
    let ac = c - a;
    let cross = ab.x * ac.y - ab.y * ac.x;
    if cross.abs() <= f64::EPSILON * ab.length() * ac.length() {
        return None;
    }
    // R = |ab| |bc| |ca| / (2 |ab × ac|)
    let bc = c - b;
    Some(ab.length() * bc.length() * ac.length() / (2.0 * cross.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_quarter_turn() {
        let r = rotate(Vec2::new(1.0, 0.0), 90.0);
        assert!(r.x.abs() < 1e-12);
        assert!((r.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_signed_angle() {
        let fwd = Vec2::new(0.0, 1.0);
        assert!((signed_angle_deg(fwd, Vec2::new(-1.0, 0.0)) - 90.0).abs() < 1e-9);
        assert!((signed_angle_deg(fwd, Vec2::new(1.0, 0.0)) + 90.0).abs() < 1e-9);
        assert_eq!(signed_angle_deg(fwd, Vec2::ZERO), 0.0);
    }

    #[test]
    fn test_circle_radius_unit_circle() {
        let r = circle_radius(
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(-1.0, 0.0),
        )
        .unwrap();
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_circle_radius_undefined() {
        let a = Vec2::new(0.0, 0.0);
        assert_eq!(circle_radius(a, a, Vec2::new(1.0, 1.0)), None);
        assert_eq!(
            circle_radius(a, Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0)),
            None
        );
    }
}
