//! Kinematic walk along a candidate curve.
//!
//! Every fitness criterion, the clamp-velocity mutation and winner
//! extraction interpret an individual the same way: starting at the current
//! speed, each acceleration gene sets the distance travelled in one planning
//! step, and that distance is consumed along the curve's arc length.
//!
//! # Overshoot
//!
//! When the curve ends before a step's distance is consumed, the step is an
//! *overshoot*. The walk accepts it as an arrival when the agent could still
//! stop at the destination (`|max_vel − prev| ≤ max_acceleration`, with
//! `max_vel` from [`calculate_max_velocity`]). Otherwise the step is retried
//! once with the closest feasible speed; a second overshoot snaps to the
//! destination and marks the arrival as unrecoverable.
//!
//! All speeds in this module are distances per planning step.

use crate::geometry::BezierCurve;
use crate::models::{PlanningRequest, Vec2};

/// Distance below which the agent counts as standing on its destination.
pub const ARRIVAL_EPSILON: f64 = 1e-3;

/// Arc-length slack when matching a step distance against curve samples.
const STEP_TOLERANCE: f64 = 1e-9;

/// Largest per-step speed from which the agent can still stop within
/// `distance`, assuming a deceleration of one unit per step.
///
/// Beyond 4.5 units the cruising cap of 2.5 applies. Otherwise the stopping
/// step count `n` is 1 for `(0, 1]`, 2 for `(1, 3]` and 3 for `(3, 4.5]`,
/// and the result is `distance / n + (n − 1) / 2`.
pub fn calculate_max_velocity(distance: f64) -> f64 {
    if distance > 4.5 {
        return 2.5;
    }
    if distance <= 0.0 || distance.is_nan() {
        return 0.0;
    }
    let n = if distance <= 1.0 {
        1.0
    } else if distance <= 3.0 {
        2.0
    } else {
        3.0
    };
    distance / n + (n - 1.0) / 2.0
}

/// Collision weight of a (1-based) step: `e^(−0.5·(step − 0.5))`.
pub fn collision_decay(step: usize) -> f64 {
    (-0.5 * (step as f64 - 0.5)).exp()
}

/// Kinematic limits of one walk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkParams {
    /// Speed before the first step.
    pub start_velocity: f64,
    /// Maximum per-step distance.
    pub max_step: f64,
    /// Maximum per-step speed change.
    pub max_acceleration: f64,
    /// Curve sampling density.
    pub samples_per_unit: f64,
}

impl WalkParams {
    /// Derives the walk limits of a planning request.
    pub fn from_request(request: &PlanningRequest, samples_per_unit: f64) -> Self {
        Self {
            start_velocity: request.start_step_velocity(),
            max_step: request.max_step_distance(),
            max_acceleration: request.max_acceleration,
            samples_per_unit,
        }
    }

    /// Speed after applying gene `acceleration` to `prev`.
    pub fn next_velocity(&self, prev: f64, acceleration: f64) -> f64 {
        (prev + self.max_acceleration * acceleration).clamp(0.0, self.max_step)
    }

    /// Number of steps needed to brake from `velocity` to rest.
    pub fn steps_to_stop(&self, velocity: f64) -> usize {
        if velocity <= 0.0 || self.max_acceleration <= 0.0 {
            0
        } else {
            (velocity / self.max_acceleration).ceil() as usize
        }
    }
}

/// One walked planning step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkStep {
    /// Step index, starting at 1.
    pub index: usize,
    /// Position at the start of the step.
    pub from: Vec2,
    /// Position at the end of the step.
    pub to: Vec2,
    /// Speed used for the step.
    pub velocity: f64,
}

impl WalkStep {
    /// Displacement vector of the step.
    pub fn displacement(&self) -> Vec2 {
        self.to - self.from
    }

    /// Midpoint of the straight segment between both ends.
    pub fn midpoint(&self) -> Vec2 {
        self.from.lerp(self.to, 0.5)
    }
}

/// How the walk reached the destination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrival {
    /// Step that reached the destination (0 = started on it).
    pub step: usize,
    /// `false` if the agent arrived too fast to stop.
    pub clean: bool,
    /// Speed carried into the arrival step.
    pub incoming_velocity: f64,
}

/// Result of walking one individual.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkTrace {
    /// Walked steps, in order.
    pub steps: Vec<WalkStep>,
    /// Set once the destination was reached.
    pub arrival: Option<Arrival>,
    /// Position after the last walked step.
    pub final_position: Vec2,
    /// Speed after the last walked step.
    pub final_velocity: f64,
    /// Overshoot corrections applied.
    pub rejected_overshoots: usize,
}

impl WalkTrace {
    fn new(start: Vec2, velocity: f64, horizon: usize) -> Self {
        Self {
            steps: Vec::with_capacity(horizon),
            arrival: None,
            final_position: start,
            final_velocity: velocity,
            rejected_overshoots: 0,
        }
    }

    /// Whether the destination was reached too fast to stop.
    pub fn is_unrecoverable(&self) -> bool {
        matches!(self.arrival, Some(a) if !a.clean)
    }
}

#[derive(Debug, Clone, Copy)]
struct Cursor {
    t: f64,
    pos: Vec2,
}

/// Moves `cursor` forward by `distance` of arc length. Returns `false`
/// (leaving the cursor untouched) if the curve ends first.
fn advance(curve: &BezierCurve, cursor: &mut Cursor, distance: f64, dt: f64) -> bool {
    if distance <= 0.0 {
        return true;
    }
    let mut travelled = 0.0;
    let mut t = cursor.t;
    let mut p = cursor.pos;
    while t < 1.0 {
        let next_t = (t + dt).min(1.0);
        let q = curve.evaluate(next_t);
        let seg = p.distance(q);
        if travelled + seg >= distance - STEP_TOLERANCE {
            let f = if seg > 0.0 {
                ((distance - travelled) / seg).clamp(0.0, 1.0)
            } else {
                1.0
            };
            cursor.pos = p.lerp(q, f);
            cursor.t = t + (next_t - t) * f;
            return true;
        }
        travelled += seg;
        p = q;
        t = next_t;
    }
    false
}

/// Walks `curve` with the given acceleration genes.
///
/// At most `accelerations.len()` steps are taken; each step is retried at
/// most once, so the walk always terminates.
pub fn walk_path(curve: &BezierCurve, accelerations: &[f64], params: &WalkParams) -> WalkTrace {
    let destination = curve.end();
    let mut trace = WalkTrace::new(curve.start(), params.start_velocity, accelerations.len());

    if curve.start().distance(destination) <= ARRIVAL_EPSILON {
        trace.arrival = Some(Arrival {
            step: 0,
            clean: true,
            incoming_velocity: params.start_velocity,
        });
        return trace;
    }

    let dt = 1.0 / curve.sample_count(params.samples_per_unit) as f64;
    let mut cursor = Cursor {
        t: 0.0,
        pos: curve.start(),
    };
    let mut prev = params.start_velocity;

    for (i, &gene) in accelerations.iter().enumerate() {
        let index = i + 1;
        let from = cursor.pos;
        let mut velocity = params.next_velocity(prev, gene);
        let mut retried = false;

        loop {
            if advance(curve, &mut cursor, velocity, dt) {
                // Landing on the destination exactly is an arrival, not an overshoot.
                let landed = velocity > 0.0
                    && cursor.t > 1.0 - dt
                    && cursor.pos.distance(destination) <= ARRIVAL_EPSILON;
                trace.steps.push(WalkStep {
                    index,
                    from,
                    to: if landed { destination } else { cursor.pos },
                    velocity,
                });
                if landed {
                    trace.arrival = Some(Arrival {
                        step: index,
                        clean: true,
                        incoming_velocity: prev,
                    });
                    trace.final_position = destination;
                    trace.final_velocity = velocity;
                    return trace;
                }
                prev = velocity;
                break;
            }

            let max_vel = calculate_max_velocity(from.distance(destination) + ARRIVAL_EPSILON);
            let clean = (max_vel - prev).abs() <= params.max_acceleration;
            if clean || retried {
                trace.steps.push(WalkStep {
                    index,
                    from,
                    to: destination,
                    velocity,
                });
                trace.arrival = Some(Arrival {
                    step: index,
                    clean,
                    incoming_velocity: prev,
                });
                trace.final_position = destination;
                trace.final_velocity = velocity;
                return trace;
            }

            trace.rejected_overshoots += 1;
            retried = true;
            velocity = max_vel
                .clamp(prev - params.max_acceleration, prev + params.max_acceleration)
                .clamp(0.0, params.max_step);
        }
    }

    trace.final_position = cursor.pos;
    trace.final_velocity = prev;
    trace
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn params() -> WalkParams {
        WalkParams {
            start_velocity: 0.0,
            max_step: 1.25,
            max_acceleration: 1.0,
            samples_per_unit: 10.0,
        }
    }

    #[test]
    fn test_max_velocity_table() {
        assert_eq!(calculate_max_velocity(0.5), 0.5);
        assert_eq!(calculate_max_velocity(1.0), 1.0);
        assert_eq!(calculate_max_velocity(2.0), 1.5);
        assert_eq!(calculate_max_velocity(3.0), 2.0);
        assert_eq!(calculate_max_velocity(4.5), 2.5);
        assert_eq!(calculate_max_velocity(4.6), 2.5);
        assert_eq!(calculate_max_velocity(1000.0), 2.5);
        assert_eq!(calculate_max_velocity(0.0), 0.0);
    }

    #[test]
    fn test_collision_decay() {
        assert!((collision_decay(1) - (-0.25f64).exp()).abs() < 1e-12);
        assert!(collision_decay(1) > collision_decay(2));
        assert!(collision_decay(2) > collision_decay(10));
    }

    #[test]
    fn test_walk_straight_far_destination() {
        let curve = BezierCurve::straight(Vec2::ZERO, Vec2::new(0.0, 40.0));
        let trace = walk_path(&curve, &[1.0; 10], &params());
        assert_eq!(trace.steps.len(), 10);
        assert!(trace.arrival.is_none());
        assert!((trace.steps[0].velocity - 1.0).abs() < 1e-12);
        assert!((trace.steps[1].velocity - 1.25).abs() < 1e-12);
        // 1.0 + 9 * 1.25 along a straight line
        assert!((trace.final_position.y - 12.25).abs() < 1e-6);
        assert!(trace.final_position.x.abs() < 1e-9);
        assert_eq!(trace.rejected_overshoots, 0);
    }

    #[test]
    fn test_walk_clean_arrival() {
        let curve = BezierCurve::straight(Vec2::ZERO, Vec2::new(0.0, 2.0));
        let trace = walk_path(&curve, &[1.0; 5], &params());
        let arrival = trace.arrival.expect("arrives");
        assert!(arrival.clean);
        assert_eq!(trace.final_position, Vec2::new(0.0, 2.0));
        assert_eq!(trace.steps.len(), arrival.step);
        assert!(!trace.is_unrecoverable());
    }

    #[test]
    fn test_walk_too_fast_is_corrected_or_unrecoverable() {
        let p = WalkParams {
            start_velocity: 3.0,
            max_step: 3.0,
            max_acceleration: 0.5,
            samples_per_unit: 10.0,
        };
        let curve = BezierCurve::straight(Vec2::ZERO, Vec2::new(0.0, 0.5));
        let trace = walk_path(&curve, &[1.0; 4], &p);
        assert!(trace.rejected_overshoots >= 1);
        assert!(trace.is_unrecoverable());
        assert_eq!(trace.final_position, Vec2::new(0.0, 0.5));
    }

    #[test]
    fn test_walk_start_on_destination() {
        let p = Vec2::new(4.0, 4.0);
        let curve = BezierCurve::straight(p, p);
        let trace = walk_path(&curve, &[1.0; 10], &params());
        assert!(trace.steps.is_empty());
        assert_eq!(trace.arrival.map(|a| a.step), Some(0));
    }

    #[test]
    fn test_walk_zero_genes_stays_put() {
        let curve = BezierCurve::straight(Vec2::ZERO, Vec2::new(0.0, 10.0));
        let trace = walk_path(&curve, &[0.0; 3], &params());
        assert_eq!(trace.steps.len(), 3);
        assert_eq!(trace.final_position, Vec2::ZERO);
    }

    #[test]
    fn test_steps_to_stop() {
        let p = params();
        assert_eq!(p.steps_to_stop(0.0), 0);
        assert_eq!(p.steps_to_stop(1.0), 1);
        assert_eq!(p.steps_to_stop(1.25), 2);
    }

    proptest! {
        #[test]
        fn prop_max_velocity_monotone(a in 0.0..10.0f64, b in 0.0..10.0f64) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(calculate_max_velocity(lo) <= calculate_max_velocity(hi) + 1e-12);
        }

        #[test]
        fn prop_max_velocity_cap(d in 4.5000001..1e6f64) {
            prop_assert_eq!(calculate_max_velocity(d), 2.5);
        }

        #[test]
        fn prop_walk_respects_speed_limits(genes in proptest::collection::vec(-1.0..=1.0f64, 10)) {
            let p = params();
            let curve = BezierCurve::new(
                Vec2::ZERO,
                Vec2::new(3.0, 5.0),
                Vec2::new(-2.0, 20.0),
                Vec2::new(0.0, 30.0),
            );
            let trace = walk_path(&curve, &genes, &p);
            let mut prev = p.start_velocity;
            for step in &trace.steps {
                prop_assert!(step.velocity >= 0.0 && step.velocity <= p.max_step + 1e-12);
                prop_assert!((step.velocity - prev).abs() <= p.max_acceleration + 1e-9);
                prev = step.velocity;
            }
        }
    }
}
