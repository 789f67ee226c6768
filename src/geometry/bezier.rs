//! Cubic Bézier path primitive.
//!
//! Candidate trajectories are cubic curves whose first and last control
//! points are pinned to the agent position and the destination. Only the
//! two inner control points are ever changed by genetic operators.
//!
//! # Reference
//! Farin (2002), "Curves and Surfaces for CAGD", Ch. 4 (de Casteljau algorithm)

use serde::{Deserialize, Serialize};

use super::circle_radius;
use crate::models::Vec2;

/// Quadratic Bézier point at `t` by nested linear interpolation.
pub fn evaluate_quadratic(a: Vec2, b: Vec2, c: Vec2, t: f64) -> Vec2 {
    let p0 = a.lerp(b, t);
    let p1 = b.lerp(c, t);
    p0.lerp(p1, t)
}

/// Cubic Bézier point at `t ∈ [0, 1]`, blended from two quadratics.
///
/// `evaluate_cubic(a, b, c, d, 0.0) == a` and `evaluate_cubic(a, b, c, d, 1.0) == d`.
pub fn evaluate_cubic(a: Vec2, b: Vec2, c: Vec2, d: Vec2, t: f64) -> Vec2 {
    let p0 = evaluate_quadratic(a, b, c, t);
    let p1 = evaluate_quadratic(b, c, d, t);
    p0.lerp(p1, t)
}

/// Cubic Bézier curve with exactly four control points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BezierCurve {
    points: [Vec2; 4],
}

impl Default for BezierCurve {
    fn default() -> Self {
        Self {
            points: [Vec2::ZERO; 4],
        }
    }
}

impl BezierCurve {
    /// Creates a curve from its four control points.
    pub fn new(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> Self {
        Self {
            points: [p0, p1, p2, p3],
        }
    }

    /// Degenerate straight curve (`P1 = P0`, `P2 = P3`).
    pub fn straight(start: Vec2, end: Vec2) -> Self {
        Self::new(start, start, end, end)
    }

    /// S-curve biased along the agent heading.
    ///
    /// `P1 = start + fwd·(dist/4) + perp(fwd)·spread` and, mirrored from the
    /// other end, `P2 = end − dir·(dist/4) + perp(dir)·spread`, where
    /// `dist = |end − start|` and `dir` is the unit start→end direction.
    pub fn create_initial_path(start: Vec2, end: Vec2, forward: Vec2, spread: f64) -> Self {
        let quarter = start.distance(end) / 4.0;
        let fwd = forward.normalized();
        let dir = (end - start).normalized();
        let p1 = start + fwd * quarter + fwd.perpendicular() * spread;
        let p2 = end - dir * quarter + dir.perpendicular() * spread;
        Self::new(start, p1, p2, end)
    }

    /// All four control points.
    pub fn points(&self) -> &[Vec2; 4] {
        &self.points
    }

    /// P0, the agent position.
    pub fn start(&self) -> Vec2 {
        self.points[0]
    }

    /// P1.
    pub fn control1(&self) -> Vec2 {
        self.points[1]
    }

    /// P2.
    pub fn control2(&self) -> Vec2 {
        self.points[2]
    }

    /// P3, the destination.
    pub fn end(&self) -> Vec2 {
        self.points[3]
    }

    /// Replaces the inner control points. Endpoints are never touched.
    pub fn set_controls(&mut self, p1: Vec2, p2: Vec2) {
        self.points[1] = p1;
        self.points[2] = p2;
    }

    /// Point on the curve at parameter `t`.
    pub fn evaluate(&self, t: f64) -> Vec2 {
        let [a, b, c, d] = self.points;
        evaluate_cubic(a, b, c, d, t)
    }

    /// Total length of the control polygon `|P0P1| + |P1P2| + |P2P3|`.
    pub fn control_net_length(&self) -> f64 {
        let [a, b, c, d] = self.points;
        a.distance(b) + b.distance(c) + c.distance(d)
    }

    /// Length estimate used to size the sampling grid:
    /// `|P0 − P3| + control_net_length / 2`.
    ///
    /// For a zero-length control net this reduces to the chord distance.
    pub fn estimated_length(&self) -> f64 {
        self.start().distance(self.end()) + self.control_net_length() / 2.0
    }

    /// Number of uniform parameter steps for the given sampling density
    /// (at least one).
    pub fn sample_count(&self, samples_per_unit: f64) -> usize {
        let n = (self.estimated_length() * samples_per_unit).ceil();
        if n.is_finite() && n >= 1.0 {
            n as usize
        } else {
            1
        }
    }

    /// Polyline approximation of the arc length.
    pub fn arc_length(&self, samples_per_unit: f64) -> f64 {
        let n = self.sample_count(samples_per_unit);
        let mut prev = self.start();
        let mut total = 0.0;
        for i in 1..=n {
            let p = self.evaluate(i as f64 / n as f64);
            total += prev.distance(p);
            prev = p;
        }
        total
    }

    /// Whether the curve is the degenerate straight form.
    pub fn is_straight(&self) -> bool {
        self.points[1] == self.points[0] && self.points[2] == self.points[3]
    }

    /// Smallest radius of the circles through consecutive sample triples.
    ///
    /// `None` when every triple is collinear or coincident.
    pub fn min_turn_radius(&self, samples: usize) -> Option<f64> {
        let n = samples.max(2);
        let pts: Vec<Vec2> = (0..=n).map(|i| self.evaluate(i as f64 / n as f64)).collect();
        pts.windows(3)
            .filter_map(|w| circle_radius(w[0], w[1], w[2]))
            .min_by(|a, b| a.total_cmp(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_curve() -> BezierCurve {
        BezierCurve::new(
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 3.0),
            Vec2::new(4.0, 3.0),
            Vec2::new(5.0, 0.0),
        )
    }

    #[test]
    fn test_cubic_midpoint() {
        let c = sample_curve();
        // B(0.5) = (P0 + 3P1 + 3P2 + P3) / 8
        let mid = c.evaluate(0.5);
        assert!((mid.x - 2.5).abs() < 1e-12);
        assert!((mid.y - 2.25).abs() < 1e-12);
    }

    #[test]
    fn test_create_initial_path_pins_endpoints() {
        let start = Vec2::new(0.0, 0.0);
        let end = Vec2::new(0.0, 40.0);
        let c = BezierCurve::create_initial_path(start, end, Vec2::new(0.0, 1.0), 2.0);
        assert_eq!(c.start(), start);
        assert_eq!(c.end(), end);
        assert_eq!(c.control1(), Vec2::new(-2.0, 10.0));
        assert_eq!(c.control2(), Vec2::new(-2.0, 30.0));
    }

    #[test]
    fn test_create_initial_path_zero_distance() {
        let p = Vec2::new(3.0, 3.0);
        let c = BezierCurve::create_initial_path(p, p, Vec2::new(1.0, 0.0), 1.0);
        assert_eq!(c.start(), p);
        assert_eq!(c.end(), p);
        assert_eq!(c.control2(), p);
        assert!(c.evaluate(0.3).is_finite());
    }

    #[test]
    fn test_estimated_length_straight() {
        let c = BezierCurve::straight(Vec2::ZERO, Vec2::new(0.0, 10.0));
        assert!(c.is_straight());
        assert!((c.estimated_length() - 15.0).abs() < 1e-12);
        assert!((c.arc_length(10.0) - 10.0).abs() < 1e-9);
        assert_eq!(c.min_turn_radius(16), None);
    }

    #[test]
    fn test_estimated_length_zero_net() {
        let c = BezierCurve::straight(Vec2::new(2.0, 2.0), Vec2::new(2.0, 2.0));
        assert_eq!(c.estimated_length(), 0.0);
        assert_eq!(c.sample_count(10.0), 1);
    }

    #[test]
    fn test_arc_length_bounded_by_net() {
        let c = sample_curve();
        let len = c.arc_length(20.0);
        assert!(len >= c.start().distance(c.end()));
        assert!(len <= c.control_net_length() + 1e-9);
    }

    #[test]
    fn test_set_controls_keeps_endpoints() {
        let mut c = sample_curve();
        c.set_controls(Vec2::new(9.0, 9.0), Vec2::new(-9.0, -9.0));
        assert_eq!(c.start(), Vec2::new(0.0, 0.0));
        assert_eq!(c.end(), Vec2::new(5.0, 0.0));
    }

    #[test]
    fn test_min_turn_radius_of_arc() {
        let c = sample_curve();
        let r = c.min_turn_radius(32).unwrap();
        assert!(r > 0.0 && r.is_finite());
    }

    proptest! {
        #[test]
        fn prop_endpoint_interpolation(
            ax in -100.0..100.0f64, ay in -100.0..100.0f64,
            bx in -100.0..100.0f64, by in -100.0..100.0f64,
            cx in -100.0..100.0f64, cy in -100.0..100.0f64,
            dx in -100.0..100.0f64, dy in -100.0..100.0f64,
        ) {
            let (a, b, c, d) = (Vec2::new(ax, ay), Vec2::new(bx, by), Vec2::new(cx, cy), Vec2::new(dx, dy));
            prop_assert_eq!(evaluate_cubic(a, b, c, d, 0.0), a);
            prop_assert_eq!(evaluate_cubic(a, b, c, d, 1.0), d);
        }
    }
}
