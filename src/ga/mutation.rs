//! Mutation operators.
//!
//! Five local perturbations, each behind its own probability gate. The
//! [`GeneticOperators`](super::GeneticOperators) bundle runs them once per
//! generation in this order:
//!
//! | Operator | Touches | Gate |
//! |----------|---------|------|
//! | [`StraightFinishMutation`] | last individual: curve + all genes | once per generation |
//! | [`ControlPointsMutation`] | P1, P2 | per individual |
//! | [`SmoothAccelerationMutation`] | gene pairs `(j − 1, j)`, odd `j` | per individual |
//! | [`ShuffleAccelerationMutation`] | single genes | per individual, then per gene |
//! | [`ClampVelocityMutation`] | first gene | per individual |
//!
//! None of them moves P0/P3 or changes the number of genes.

use rand::Rng;

use super::{Individual, Population};
use crate::geometry::{rotate, signed_angle_deg, BezierCurve};
use crate::kinematics::{calculate_max_velocity, WalkParams};
use crate::models::{PlanningRequest, Vec2};

/// Largest bearing (degrees) between forward and destination for which a
/// straight finish is attempted.
const STRAIGHT_FINISH_MAX_ANGLE: f64 = 30.0;

/// Half-angle (degrees) of the control-point re-placement cone.
const CONTROL_POINT_CONE: f64 = 30.0;

/// Agent state the mutations steer by.
#[derive(Debug, Clone, Copy)]
pub struct MutationContext {
    /// Agent position (P0 of every curve).
    pub start: Vec2,
    /// Destination (P3 of every curve).
    pub destination: Vec2,
    /// Current heading.
    pub forward: Vec2,
    /// Kinematic limits, shared with the fitness walk.
    pub walk: WalkParams,
    /// Whether the straight braking approach passes clear of every
    /// obstacle; a blocked approach is never offered by straight finish.
    pub straight_approach_clear: bool,
}

impl MutationContext {
    /// Builds the context of one planning run.
    pub fn from_request(request: &PlanningRequest, samples_per_unit: f64) -> Self {
        Self {
            start: request.start_position,
            destination: request.destination,
            forward: request.forward,
            walk: WalkParams::from_request(request, samples_per_unit),
            straight_approach_clear: true,
        }
    }

    /// Sets whether the straight approach is clear of obstacles.
    pub fn with_straight_approach_clear(mut self, clear: bool) -> Self {
        self.straight_approach_clear = clear;
        self
    }

    /// The candidate straight finish writes into the last slot.
    pub fn straight_candidate(&self, horizon: usize) -> Individual {
        let mut candidate = Individual::new(horizon);
        candidate.curve = BezierCurve::straight(self.start, self.destination);
        StraightFinishMutation::braking_profile(&self.walk, self.distance(), &mut candidate.accelerations);
        candidate
    }

    fn distance(&self) -> f64 {
        self.start.distance(self.destination)
    }
}

/// An in-place population perturbation.
pub trait MutationOperator {
    /// Operator name, for logs.
    fn name(&self) -> &'static str;

    /// Applies the operator to `population`.
    fn mutate<R: Rng>(&self, population: &mut Population, ctx: &MutationContext, rng: &mut R);
}

/// Replaces the last individual with a straight, decelerating approach.
#[derive(Debug, Clone, Copy)]
pub struct StraightFinishMutation {
    /// Gate probability.
    pub rate: f64,
}

impl StraightFinishMutation {
    /// Acceleration genes that brake into the destination along a
    /// straight line, starting from the walk's start velocity.
    pub fn braking_profile(walk: &WalkParams, distance: f64, genes: &mut [f64]) {
        let mut prev = walk.start_velocity;
        let mut remaining = distance;
        for gene in genes.iter_mut() {
            let target = calculate_max_velocity(remaining).min(walk.max_step);
            let wanted = target
                .clamp(prev - walk.max_acceleration, prev + walk.max_acceleration)
                .max(0.0);
            *gene = if walk.max_acceleration > 0.0 {
                ((wanted - prev) / walk.max_acceleration).clamp(-1.0, 1.0)
            } else {
                0.0
            };
            let velocity = walk.next_velocity(prev, *gene);
            remaining = (remaining - velocity).max(0.0);
            prev = velocity;
        }
    }
}

impl MutationOperator for StraightFinishMutation {
    fn name(&self) -> &'static str {
        "straight_finish"
    }

    fn mutate<R: Rng>(&self, population: &mut Population, ctx: &MutationContext, rng: &mut R) {
        if !rng.random_bool(self.rate) || !ctx.straight_approach_clear {
            return;
        }
        let bearing = signed_angle_deg(ctx.forward, ctx.destination - ctx.start);
        if bearing.abs() > STRAIGHT_FINISH_MAX_ANGLE {
            return;
        }
        let Some(last) = population.last_mut() else {
            return;
        };
        let candidate = ctx.straight_candidate(last.horizon());
        last.curve = candidate.curve;
        last.accelerations = candidate.accelerations;
    }
}

/// Re-places P1/P2 inside a ±30° cone around the start–destination axis.
#[derive(Debug, Clone, Copy)]
pub struct ControlPointsMutation {
    /// Gate probability per individual.
    pub rate: f64,
}

impl MutationOperator for ControlPointsMutation {
    fn name(&self) -> &'static str {
        "control_points"
    }

    fn mutate<R: Rng>(&self, population: &mut Population, ctx: &MutationContext, rng: &mut R) {
        let mut axis = (ctx.destination - ctx.start).normalized();
        if axis.length_squared() == 0.0 {
            axis = ctx.forward.normalized();
        }
        if axis.length_squared() == 0.0 {
            return;
        }
        let reach = ctx.distance() / 2.0;

        for individual in population.iter_mut() {
            if !rng.random_bool(self.rate) {
                continue;
            }
            let a1 = rng.random_range(-CONTROL_POINT_CONE..=CONTROL_POINT_CONE);
            let a2 = rng.random_range(-CONTROL_POINT_CONE..=CONTROL_POINT_CONE);
            let d1 = rng.random_range(0.0..=reach);
            let d2 = rng.random_range(0.0..=reach);
            let p1 = ctx.start + rotate(axis, a1) * d1;
            let p2 = ctx.destination + rotate(-axis, a2) * d2;
            individual.curve.set_controls(p1, p2);
        }
    }
}

/// Averages adjacent gene pairs.
#[derive(Debug, Clone, Copy)]
pub struct SmoothAccelerationMutation {
    /// Gate probability per individual.
    pub rate: f64,
}

impl MutationOperator for SmoothAccelerationMutation {
    fn name(&self) -> &'static str {
        "smooth_acceleration"
    }

    fn mutate<R: Rng>(&self, population: &mut Population, _ctx: &MutationContext, rng: &mut R) {
        for individual in population.iter_mut() {
            if !rng.random_bool(self.rate) {
                continue;
            }
            for pair in individual.accelerations.chunks_exact_mut(2) {
                let mean = (pair[0] + pair[1]) / 2.0;
                pair[0] = mean;
                pair[1] = mean;
            }
        }
    }
}

/// Redraws single genes uniformly in `[-1, 1]`.
#[derive(Debug, Clone, Copy)]
pub struct ShuffleAccelerationMutation {
    /// Gate probability per individual.
    pub rate: f64,
    /// Gate probability per gene.
    pub gene_rate: f64,
}

impl MutationOperator for ShuffleAccelerationMutation {
    fn name(&self) -> &'static str {
        "shuffle_acceleration"
    }

    fn mutate<R: Rng>(&self, population: &mut Population, _ctx: &MutationContext, rng: &mut R) {
        for individual in population.iter_mut() {
            if !rng.random_bool(self.rate) {
                continue;
            }
            for gene in individual.accelerations.iter_mut() {
                if rng.random_bool(self.gene_rate) {
                    *gene = rng.random_range(-1.0..=1.0);
                }
            }
        }
    }
}

/// Pulls the first gene down when the first step is too fast to stop
/// before the end of the path.
#[derive(Debug, Clone, Copy)]
pub struct ClampVelocityMutation {
    /// Gate probability per individual.
    pub rate: f64,
}

impl MutationOperator for ClampVelocityMutation {
    fn name(&self) -> &'static str {
        "clamp_velocity"
    }

    fn mutate<R: Rng>(&self, population: &mut Population, ctx: &MutationContext, rng: &mut R) {
        let walk = &ctx.walk;
        if walk.max_acceleration <= 0.0 {
            return;
        }
        for individual in population.iter_mut() {
            if !rng.random_bool(self.rate) {
                continue;
            }
            let path_length = individual.curve.arc_length(walk.samples_per_unit);
            let Some(first) = individual.accelerations.first_mut() else {
                continue;
            };
            let velocity = walk.next_velocity(walk.start_velocity, *first);
            let limit = calculate_max_velocity(path_length);
            if velocity > limit {
                let excess = ((velocity - limit) / walk.max_acceleration).min(1.0);
                *first = (*first - excess).max(-1.0);
            }
        }
    }
}
