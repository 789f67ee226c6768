//! Planning driver.
//!
//! Runs one genetic search per agent and tick and turns the winner into a
//! velocity command.
//!
//! # States
//!
//! | State | Work | Next |
//! |-------|------|------|
//! | `Init` | seed the population | `Evaluating(0)`, or `FinalEvaluation` with 0 iterations |
//! | `Evaluating(g)` | fitness ×4 → ranking → selection → crossover → mutation ×5 | `Evaluating(g + 1)` or `FinalEvaluation` |
//! | `FinalEvaluation` | fitness ×4 → ranking | `WinnerExtraction` |
//! | `WinnerExtraction` | walk the winner's first step | `Done` |
//!
//! There is no early exit: every run performs all configured generations.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, trace, warn};

use super::context::PlanningContext;
use super::telemetry::GenerationRecord;
use crate::error::{PlanError, Result};
use crate::ga::{
    is_path_clear, BezierInitialization, ElitistSelection, FitnessEnv, FitnessScores,
    GeneticOperators, Individual, MutationContext, Population, WeightedSumRanking,
};
use crate::kinematics::{calculate_max_velocity, walk_path, WalkParams};
use crate::models::{PlannerConfig, PlanningRequest, Vec2};
use crate::oracle::SpatialOracle;
use crate::validation::{validate_config, validate_request};

/// Phase of a planning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunState {
    /// Population not yet seeded.
    Init,
    /// Running generation `generation`.
    Evaluating {
        /// Zero-based generation index.
        generation: usize,
    },
    /// Scoring the population left by the last generation.
    FinalEvaluation,
    /// Turning the best individual into a command.
    WinnerExtraction,
    /// Run finished.
    Done,
}

impl RunState {
    /// State entered after `Init` for a run of `iterations` generations.
    pub fn first(iterations: usize) -> Self {
        Self::after(0, iterations)
    }

    /// State entered after finishing `generation`.
    pub fn next(generation: usize, iterations: usize) -> Self {
        Self::after(generation + 1, iterations)
    }

    fn after(generation: usize, iterations: usize) -> Self {
        if generation < iterations {
            RunState::Evaluating { generation }
        } else {
            RunState::FinalEvaluation
        }
    }
}

/// Result of one planning run.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    /// Velocity command (units per second) for the next planning interval.
    pub velocity: Vec2,
    /// Best individual of the final pass.
    pub winner: Individual,
    /// Criterion breakdown of the winner.
    pub winner_scores: GenerationRecord,
    /// Best-of records, one per generation plus the final pass.
    pub telemetry: Vec<GenerationRecord>,
}

/// GA-based local trajectory planner.
///
/// # Example
///
/// ```
/// use u_trajectory::models::{PlannerConfig, PlanningRequest, Vec2};
/// use u_trajectory::planner::{BezierPlanner, PlanningContext};
///
/// let planner = BezierPlanner::new(PlannerConfig::default().with_iterations(3));
/// let request = PlanningRequest::new(0, Vec2::ZERO, Vec2::new(0.0, 20.0));
/// let outcome = planner
///     .plan_seeded(&request, &PlanningContext::empty(), 42)
///     .expect("valid input");
/// assert!(outcome.velocity.length() <= request.max_speed + 1e-9);
/// assert_eq!(outcome.telemetry.len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct BezierPlanner {
    config: PlannerConfig,
    operators: GeneticOperators,
}

impl Default for BezierPlanner {
    fn default() -> Self {
        Self::new(PlannerConfig::default())
    }
}

impl BezierPlanner {
    /// Creates a planner. The configuration is validated on every run.
    pub fn new(config: PlannerConfig) -> Self {
        let operators = GeneticOperators::from_config(&config);
        Self { config, operators }
    }

    /// The planner configuration.
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Checks the configuration and `request` before a run.
    pub fn validate(&self, request: &PlanningRequest) -> Result<()> {
        if let Err(errors) = validate_config(&self.config) {
            warn!(count = errors.len(), "rejected planner configuration");
            return Err(PlanError::InvalidConfig(errors));
        }
        if let Err(errors) = validate_request(request) {
            warn!(agent = request.agent_index, count = errors.len(), "rejected planning request");
            return Err(PlanError::InvalidRequest(errors));
        }
        Ok(())
    }

    /// Plans with a run-local generator seeded from `seed`.
    pub fn plan_seeded<O: SpatialOracle>(
        &self,
        request: &PlanningRequest,
        ctx: &PlanningContext<'_, O>,
        seed: u64,
    ) -> Result<PlanOutcome> {
        let mut rng = SmallRng::seed_from_u64(seed);
        self.plan(request, ctx, &mut rng)
    }

    /// Runs the full genetic search for one agent.
    pub fn plan<O: SpatialOracle, R: Rng>(
        &self,
        request: &PlanningRequest,
        ctx: &PlanningContext<'_, O>,
        rng: &mut R,
    ) -> Result<PlanOutcome> {
        self.validate(request)?;

        let config = &self.config;
        let walk = WalkParams::from_request(request, config.samples_per_unit);
        let env = FitnessEnv {
            walk,
            agent_index: request.agent_index,
            oracle: ctx.oracle,
            query_half_extent: config.query_half_extent,
            agent_radius: request.agent_radius,
        };
        let mutation_ctx = MutationContext::from_request(request, config.samples_per_unit);
        let straight_clear = is_path_clear(&mutation_ctx.straight_candidate(config.horizon), &env);
        let mutation_ctx = mutation_ctx.with_straight_approach_clear(straight_clear);
        let initializer = BezierInitialization::from_config(config);
        let selection = ElitistSelection::new(config.effective_elite_count());

        let mut population = Population::new(config.population_size, config.horizon);
        let mut scores = FitnessScores::with_capacity(config.population_size);
        let mut ranking = WeightedSumRanking::new(config.weights);
        let mut telemetry = Vec::with_capacity(config.iterations + 1);
        let mut outcome = None;

        debug!(
            agent = request.agent_index,
            tick = ctx.tick,
            population = config.population_size,
            iterations = config.iterations,
            horizon = config.horizon,
            distance = request.distance_to_destination(),
            straight_clear,
            "planning run started"
        );

        let mut state = RunState::Init;
        while state != RunState::Done {
            state = match state {
                RunState::Init => {
                    initializer.initialize(&mut population, request, rng);
                    RunState::first(config.iterations)
                }
                RunState::Evaluating { generation } => {
                    self.score(&mut population, &mut scores, &mut ranking, &env);
                    Self::record(generation, &population, &scores, &mut telemetry);
                    selection.select(&mut population);
                    self.operators.apply(&mut population, &mutation_ctx, rng);
                    RunState::next(generation, config.iterations)
                }
                RunState::FinalEvaluation => {
                    self.score(&mut population, &mut scores, &mut ranking, &env);
                    Self::record(config.iterations, &population, &scores, &mut telemetry);
                    RunState::WinnerExtraction
                }
                RunState::WinnerExtraction => {
                    outcome = self.extract_winner(request, &walk, &population, &scores);
                    RunState::Done
                }
                RunState::Done => RunState::Done,
            };
        }

        let (velocity, winner, winner_scores) = outcome.ok_or(PlanError::EmptyPopulation)?;
        debug!(
            agent = request.agent_index,
            vx = velocity.x,
            vy = velocity.y,
            fitness = winner.fitness,
            straight = winner.curve.is_straight(),
            "planning run finished"
        );
        Ok(PlanOutcome {
            velocity,
            winner,
            winner_scores,
            telemetry,
        })
    }

    fn score<O: SpatialOracle>(
        &self,
        population: &mut Population,
        scores: &mut FitnessScores,
        ranking: &mut WeightedSumRanking,
        env: &FitnessEnv<'_, O>,
    ) {
        scores.evaluate(population, env, self.config.parallel_fitness);
        ranking.rank(population, scores);
    }

    fn record(
        generation: usize,
        population: &Population,
        scores: &FitnessScores,
        telemetry: &mut Vec<GenerationRecord>,
    ) {
        if let Some(record) = GenerationRecord::best_of(generation, population, scores) {
            trace!(
                generation,
                overall = record.overall,
                jerk = record.jerk,
                collision = record.collision,
                end_distance = record.end_distance,
                time_to_destination = record.time_to_destination,
                "generation best"
            );
            telemetry.push(record);
        }
    }

    fn extract_winner(
        &self,
        request: &PlanningRequest,
        walk: &WalkParams,
        population: &Population,
        scores: &FitnessScores,
    ) -> Option<(Vec2, Individual, GenerationRecord)> {
        let index = population.best_index()?;
        let record = GenerationRecord::for_individual(self.config.iterations, population, scores, index)?;
        let winner = population[index].clone();
        let velocity = command_velocity(&winner, request, walk);
        Some((velocity, winner, record))
    }
}

/// Velocity that moves the agent along the first step of `winner`.
///
/// Falls back to heading straight at the destination with the fastest
/// speed that can still stop there when the walk yields no step.
pub fn command_velocity(winner: &Individual, request: &PlanningRequest, walk: &WalkParams) -> Vec2 {
    let first = &winner.accelerations[..winner.accelerations.len().min(1)];
    let trace = walk_path(&winner.curve, first, walk);
    if let Some(step) = trace.steps.first() {
        return step.displacement() / request.planning_interval;
    }

    let distance = request.distance_to_destination();
    let speed = walk
        .max_step
        .min(walk.start_velocity + walk.max_acceleration)
        .min(calculate_max_velocity(distance));
    (request.destination - request.start_position).normalized() * speed / request.planning_interval
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BezierCurve;
    use crate::oracle::{GridOracle, OracleEntry};
    use crate::validation::ValidationErrorKind;

    fn request() -> PlanningRequest {
        PlanningRequest::new(0, Vec2::ZERO, Vec2::new(0.0, 40.0))
    }

    #[test]
    fn test_state_transitions() {
        assert_eq!(RunState::first(0), RunState::FinalEvaluation);
        assert_eq!(RunState::first(3), RunState::Evaluating { generation: 0 });
        assert_eq!(RunState::next(1, 3), RunState::Evaluating { generation: 2 });
        assert_eq!(RunState::next(2, 3), RunState::FinalEvaluation);
    }

    #[test]
    fn test_plan_records_every_generation() {
        let planner = BezierPlanner::new(PlannerConfig::default().with_iterations(5));
        let outcome = planner
            .plan_seeded(&request(), &PlanningContext::empty(), 42)
            .expect("valid input");
        assert_eq!(outcome.telemetry.len(), 6);
        let generations: Vec<usize> = outcome.telemetry.iter().map(|r| r.generation).collect();
        assert_eq!(generations, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(outcome.telemetry.last(), Some(&outcome.winner_scores));
        assert_eq!(outcome.winner.horizon(), 10);
    }

    #[test]
    fn test_zero_iterations_still_plans() {
        let planner = BezierPlanner::new(PlannerConfig::default().with_iterations(0));
        let outcome = planner
            .plan_seeded(&request(), &PlanningContext::empty(), 1)
            .expect("valid input");
        assert_eq!(outcome.telemetry.len(), 1);
        assert!(outcome.velocity.length() <= request().max_speed + 1e-9);
    }

    #[test]
    fn test_same_seed_same_command() {
        let planner = BezierPlanner::default();
        let ctx = PlanningContext::empty();
        let a = planner.plan_seeded(&request(), &ctx, 7).expect("valid input");
        let b = planner.plan_seeded(&request(), &ctx, 7).expect("valid input");
        assert_eq!(a.velocity, b.velocity);
        assert_eq!(a.winner, b.winner);
    }

    #[test]
    fn test_sequential_and_parallel_fitness_agree() {
        let ctx = PlanningContext::empty();
        let seq = BezierPlanner::new(PlannerConfig::default().with_parallel_fitness(false))
            .plan_seeded(&request(), &ctx, 11)
            .expect("valid input");
        let par = BezierPlanner::new(PlannerConfig::default().with_parallel_fitness(true))
            .plan_seeded(&request(), &ctx, 11)
            .expect("valid input");
        assert_eq!(seq.velocity, par.velocity);
        assert_eq!(seq.telemetry, par.telemetry);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let planner = BezierPlanner::new(PlannerConfig::default().with_population_size(0));
        let err = planner
            .plan_seeded(&request(), &PlanningContext::empty(), 0)
            .unwrap_err();
        assert!(matches!(err, PlanError::InvalidConfig(_)));
        assert_eq!(err.issues()[0].kind, ValidationErrorKind::NonPositive);
    }

    #[test]
    fn test_invalid_request_rejected() {
        let planner = BezierPlanner::default();
        let req = request().with_planning_interval(0.0);
        let err = planner
            .plan_seeded(&req, &PlanningContext::empty(), 0)
            .unwrap_err();
        assert!(matches!(err, PlanError::InvalidRequest(_)));
    }

    #[test]
    fn test_small_elite_keeps_invariants() {
        let config = PlannerConfig::default()
            .with_elite_count(10)
            .with_crossover_probability(1.0)
            .with_iterations(8);
        let planner = BezierPlanner::new(config);
        let req = request();
        for seed in [3, 42, 777] {
            let outcome = planner
                .plan_seeded(&req, &PlanningContext::empty(), seed)
                .expect("valid input");
            assert_eq!(outcome.winner.curve.start(), req.start_position);
            assert_eq!(outcome.winner.curve.end(), req.destination);
            assert_eq!(outcome.winner.horizon(), 10);
            assert!(outcome.winner.accelerations.iter().all(|g| (-1.0..=1.0).contains(g)));
            assert!(outcome.velocity.length() <= req.max_speed + 1e-9);
            assert_eq!(outcome.telemetry.len(), 9);
        }
    }

    #[test]
    fn test_blocked_straight_approach_never_wins() {
        let oracle = GridOracle::build(2.0, [OracleEntry::obstacle(Vec2::new(0.0, 1.0))])
            .expect("valid grid");
        let planner = BezierPlanner::default();
        for seed in 0..5 {
            let outcome = planner
                .plan_seeded(&request(), &PlanningContext::new(&oracle), seed)
                .expect("valid input");
            assert!(!outcome.winner.curve.is_straight(), "seed {seed}");
        }
    }

    #[test]
    fn test_command_velocity_follows_first_step() {
        let req = request();
        let walk = WalkParams::from_request(&req, 10.0);
        let mut winner = Individual::new(3);
        winner.curve = BezierCurve::straight(req.start_position, req.destination);
        winner.accelerations = vec![1.0, 0.0, 0.0];
        let v = command_velocity(&winner, &req, &walk);
        // one unit travelled in 0.5 s
        assert!(v.x.abs() < 1e-9);
        assert!((v.y - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_command_velocity_on_destination_is_zero() {
        let p = Vec2::new(3.0, -2.0);
        let req = PlanningRequest::new(0, p, p);
        let walk = WalkParams::from_request(&req, 10.0);
        let mut winner = Individual::new(3);
        winner.curve = BezierCurve::straight(p, p);
        assert_eq!(command_velocity(&winner, &req, &walk), Vec2::ZERO);
    }
}
