//! Fitness criteria.
//!
//! Four independent cost passes over a population. Each walks every
//! individual along its curve (see [`crate::kinematics`]) and writes one
//! value per individual into its own output array, so the passes can run
//! concurrently before ranking.
//!
//! | Criterion | Measures |
//! |-----------|----------|
//! | [`JerkCost`] | RMS jerk of the per-step velocity vectors |
//! | [`CollisionCost`] | Oracle hits per step, decayed with step index |
//! | [`EndDistanceCost`] | Distance left to the destination after `H` steps |
//! | [`TimeToDestinationCost`] | Steps needed to reach the destination |
//!
//! All criteria are costs: lower = better.
//!
//! # After arrival
//!
//! A walk that reaches the destination before `H` steps is completed
//! synthetically: the agent keeps its last heading while braking by
//! `max_acceleration` per step down to rest, then retraces those speeds
//! back towards the destination, then stands still.

use crate::kinematics::{collision_decay, walk_path, WalkParams, WalkTrace};
use crate::models::Vec2;
use crate::oracle::SpatialOracle;

use super::{Individual, Population};

/// Read-only inputs shared by all criteria during one run.
#[derive(Debug, Clone, Copy)]
pub struct FitnessEnv<'a, O: SpatialOracle> {
    /// Kinematic limits of the walk.
    pub walk: WalkParams,
    /// Agent being planned (its own oracle entries are ignored).
    pub agent_index: usize,
    /// Snapshot queried for collisions.
    pub oracle: &'a O,
    /// Half extent of the collision query box.
    pub query_half_extent: f64,
    /// Body radius of the agent; two bodies touch below twice this distance.
    pub agent_radius: f64,
}

/// Whether the walked path of `individual` keeps every counted entry at
/// least `2 · agent_radius` away.
///
/// Each step is sampled every `2 · agent_radius` up to and including its
/// end point. Static obstacles are checked on every step, other agents only
/// on their recorded step.
pub fn is_path_clear<O: SpatialOracle>(individual: &Individual, env: &FitnessEnv<'_, O>) -> bool {
    let reach = 2.0 * env.agent_radius;
    if reach <= 0.0 {
        return true;
    }
    let half = Vec2::new(reach, reach);
    let trace = walk_path(&individual.curve, &individual.accelerations, &env.walk);
    trace.steps.iter().all(|step| {
        let samples = ((step.displacement().length() / reach).ceil() as usize).max(1);
        (1..=samples).all(|k| {
            let point = step.from.lerp(step.to, k as f64 / samples as f64);
            !env.oracle.range_query(point, half).iter().any(|e| {
                e.counts_for(env.agent_index, step.index) && e.position.distance(point) < reach
            })
        })
    })
}

/// A single cost criterion.
pub trait FitnessEvaluator: Sync {
    /// Criterion name, for logs.
    fn name(&self) -> &'static str;

    /// Cost of one individual.
    fn evaluate<O: SpatialOracle>(&self, individual: &Individual, env: &FitnessEnv<'_, O>) -> f64;

    /// Costs of a whole population, written into `out` in buffer order.
    fn evaluate_population<O: SpatialOracle>(
        &self,
        population: &Population,
        env: &FitnessEnv<'_, O>,
        out: &mut Vec<f64>,
    ) {
        out.clear();
        out.extend(population.iter().map(|ind| self.evaluate(ind, env)));
    }
}

/// Displacements of the steps the walk did not take, after arrival.
///
/// Pushes `remaining` vectors onto `out`; `speeds` is scratch space.
fn synthetic_completion(
    trace: &WalkTrace,
    walk: &WalkParams,
    remaining: usize,
    speeds: &mut Vec<f64>,
    out: &mut Vec<Vec2>,
) {
    let target = out.len() + remaining;
    let heading = trace
        .steps
        .last()
        .map(|s| s.displacement().normalized())
        .unwrap_or(Vec2::ZERO);

    speeds.clear();
    let mut speed = trace.final_velocity;
    while out.len() < target && speed > 0.0 && walk.max_acceleration > 0.0 {
        speed = (speed - walk.max_acceleration).max(0.0);
        speeds.push(speed);
        out.push(heading * speed);
    }
    for &s in speeds.iter().rev() {
        if out.len() >= target {
            break;
        }
        out.push(-heading * s);
    }
    out.resize(target, Vec2::ZERO);
}

/// Scratch buffers of the jerk criterion, reused across individuals.
#[derive(Debug, Default)]
pub struct JerkScratch {
    velocities: Vec<Vec2>,
    accelerations: Vec<Vec2>,
    speeds: Vec<f64>,
}

/// Smoothness: RMS magnitude of the second difference of step velocities.
#[derive(Debug, Clone, Copy, Default)]
pub struct JerkCost;

impl JerkCost {
    /// Jerk cost using caller-provided scratch space.
    pub fn evaluate_with<O: SpatialOracle>(
        &self,
        individual: &Individual,
        env: &FitnessEnv<'_, O>,
        scratch: &mut JerkScratch,
    ) -> f64 {
        let horizon = individual.horizon();
        if horizon < 3 {
            return 0.0;
        }
        let trace = walk_path(&individual.curve, &individual.accelerations, &env.walk);

        let JerkScratch {
            velocities,
            accelerations,
            speeds,
        } = scratch;
        velocities.clear();
        velocities.extend(trace.steps.iter().map(|s| s.displacement()));
        let remaining = horizon.saturating_sub(velocities.len());
        synthetic_completion(&trace, &env.walk, remaining, speeds, velocities);

        accelerations.clear();
        accelerations.extend(velocities.windows(2).map(|w| w[1] - w[0]));

        let sum_sq: f64 = accelerations
            .windows(2)
            .map(|w| (w[1] - w[0]).length_squared())
            .sum();
        (sum_sq / (horizon - 2) as f64).sqrt()
    }
}

impl FitnessEvaluator for JerkCost {
    fn name(&self) -> &'static str {
        "jerk"
    }

    fn evaluate<O: SpatialOracle>(&self, individual: &Individual, env: &FitnessEnv<'_, O>) -> f64 {
        self.evaluate_with(individual, env, &mut JerkScratch::default())
    }

    fn evaluate_population<O: SpatialOracle>(
        &self,
        population: &Population,
        env: &FitnessEnv<'_, O>,
        out: &mut Vec<f64>,
    ) {
        let mut scratch = JerkScratch::default();
        out.clear();
        out.extend(
            population
                .iter()
                .map(|ind| self.evaluate_with(ind, env, &mut scratch)),
        );
    }
}

/// Collision risk: decayed count of foreign occupants near each step.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollisionCost;

impl FitnessEvaluator for CollisionCost {
    fn name(&self) -> &'static str {
        "collision"
    }

    fn evaluate<O: SpatialOracle>(&self, individual: &Individual, env: &FitnessEnv<'_, O>) -> f64 {
        let trace = walk_path(&individual.curve, &individual.accelerations, &env.walk);
        let half = Vec2::new(env.query_half_extent, env.query_half_extent);
        trace
            .steps
            .iter()
            .map(|step| {
                let hits = env
                    .oracle
                    .range_query(step.midpoint(), half)
                    .iter()
                    .filter(|e| e.counts_for(env.agent_index, step.index))
                    .count();
                hits as f64 * collision_decay(step.index)
            })
            .sum()
    }
}

/// Distance to the destination after `H` steps, ×4 for an arrival too
/// fast to stop.
#[derive(Debug, Clone, Copy, Default)]
pub struct EndDistanceCost;

impl FitnessEvaluator for EndDistanceCost {
    fn name(&self) -> &'static str {
        "end_distance"
    }

    fn evaluate<O: SpatialOracle>(&self, individual: &Individual, env: &FitnessEnv<'_, O>) -> f64 {
        let trace = walk_path(&individual.curve, &individual.accelerations, &env.walk);
        let destination = individual.curve.end();

        let remaining = individual.horizon().saturating_sub(trace.steps.len());
        let mut tail = Vec::with_capacity(remaining);
        let mut speeds = Vec::new();
        if trace.arrival.is_some() {
            synthetic_completion(&trace, &env.walk, remaining, &mut speeds, &mut tail);
        }
        let end = tail
            .iter()
            .fold(trace.final_position, |pos, &d| pos + d);

        let distance = destination.distance(end);
        if trace.is_unrecoverable() {
            distance * 2.0 * 2.0
        } else {
            distance
        }
    }
}

/// Steps needed to reach the destination.
///
/// An arrival too fast to stop adds `(steps_to_stop − 1)·2 + 1` steps for
/// braking and coming back. A walk that never arrives is charged `H` plus
/// the remaining distance covered at full speed.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeToDestinationCost;

impl FitnessEvaluator for TimeToDestinationCost {
    fn name(&self) -> &'static str {
        "time_to_destination"
    }

    fn evaluate<O: SpatialOracle>(&self, individual: &Individual, env: &FitnessEnv<'_, O>) -> f64 {
        let trace = walk_path(&individual.curve, &individual.accelerations, &env.walk);
        match trace.arrival {
            Some(arrival) if arrival.clean => arrival.step as f64,
            Some(arrival) => {
                let stop = env.walk.steps_to_stop(trace.final_velocity).saturating_sub(1);
                (arrival.step + stop * 2 + 1) as f64
            }
            None => {
                let remaining = individual.curve.end().distance(trace.final_position);
                let per_step = env.walk.max_step.max(f64::EPSILON);
                individual.horizon() as f64 + remaining / per_step
            }
        }
    }
}

/// Raw criterion values of one generation, index-aligned with the population.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FitnessScores {
    /// Jerk costs.
    pub jerk: Vec<f64>,
    /// Collision costs.
    pub collision: Vec<f64>,
    /// End-distance costs.
    pub end_distance: Vec<f64>,
    /// Time-to-destination costs.
    pub time_to_destination: Vec<f64>,
}

impl FitnessScores {
    /// Allocates arrays for `size` individuals.
    pub fn with_capacity(size: usize) -> Self {
        Self {
            jerk: Vec::with_capacity(size),
            collision: Vec::with_capacity(size),
            end_distance: Vec::with_capacity(size),
            time_to_destination: Vec::with_capacity(size),
        }
    }

    /// Runs the four criteria over `population`.
    ///
    /// With `parallel` set the passes are forked onto the rayon pool; they
    /// only share read access to the population and the oracle.
    pub fn evaluate<O: SpatialOracle>(
        &mut self,
        population: &Population,
        env: &FitnessEnv<'_, O>,
        parallel: bool,
    ) {
        let Self {
            jerk,
            collision,
            end_distance,
            time_to_destination,
        } = self;

        if parallel {
            rayon::join(
                || {
                    rayon::join(
                        || JerkCost.evaluate_population(population, env, jerk),
                        || CollisionCost.evaluate_population(population, env, collision),
                    )
                },
                || {
                    rayon::join(
                        || EndDistanceCost.evaluate_population(population, env, end_distance),
                        || {
                            TimeToDestinationCost.evaluate_population(
                                population,
                                env,
                                time_to_destination,
                            )
                        },
                    )
                },
            );
        } else {
            JerkCost.evaluate_population(population, env, jerk);
            CollisionCost.evaluate_population(population, env, collision);
            EndDistanceCost.evaluate_population(population, env, end_distance);
            TimeToDestinationCost.evaluate_population(population, env, time_to_destination);
        }
    }

    /// Criterion arrays in ranking order
    /// (jerk, collision, end distance, time to destination).
    pub fn criteria(&self) -> [&[f64]; 4] {
        [
            &self.jerk,
            &self.collision,
            &self.end_distance,
            &self.time_to_destination,
        ]
    }

    /// Number of scored individuals.
    pub fn len(&self) -> usize {
        self.jerk.len()
    }

    /// Whether nothing has been scored.
    pub fn is_empty(&self) -> bool {
        self.jerk.is_empty()
    }
}
