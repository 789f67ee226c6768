//! Planner configuration.
//!
//! All options carry defaults, so hosts may deserialize a partial document
//! and override only what they tune. Builder methods follow the same
//! `with_*` convention as the request model.

use serde::{Deserialize, Serialize};

/// Heading cone used when seeding the initial population.
///
/// The first control point of each seeded curve is rotated away from the
/// agent's forward direction by a uniform angle within `±half_angle_deg()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InitialCone {
    /// ±120°, general exploration.
    #[default]
    Wide,
    /// ±60°.
    Narrow,
    /// ±30°.
    Tight,
    /// ±15°, kinematically conservative seeding.
    Fine,
}

impl InitialCone {
    /// Half opening angle in degrees.
    pub fn half_angle_deg(self) -> f64 {
        match self {
            InitialCone::Wide => 120.0,
            InitialCone::Narrow => 60.0,
            InitialCone::Tight => 30.0,
            InitialCone::Fine => 15.0,
        }
    }
}

/// Weights of the four ranking criteria.
///
/// Applied to z-score normalized criterion values; all criteria are costs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessWeights {
    /// Jerk (smoothness) weight.
    pub jerk: f64,
    /// Collision weight.
    pub collision: f64,
    /// End-distance weight.
    pub end_distance: f64,
    /// Time-to-destination weight.
    pub time_to_destination: f64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            jerk: 0.2,
            collision: 0.5,
            end_distance: 0.2,
            time_to_destination: 0.1,
        }
    }
}

impl FitnessWeights {
    /// Weights as an array in criterion order
    /// (jerk, collision, end distance, time to destination).
    pub fn as_array(&self) -> [f64; 4] {
        [
            self.jerk,
            self.collision,
            self.end_distance,
            self.time_to_destination,
        ]
    }
}

/// Probability gates of the mutation operators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationRates {
    /// Straight-finish replacement of the last individual.
    pub straight_finish: f64,
    /// Control-point re-placement, per individual.
    pub control_points: f64,
    /// Pairwise acceleration smoothing, per individual.
    pub smooth_acceleration: f64,
    /// Acceleration re-sampling, per individual.
    pub shuffle_acceleration: f64,
    /// Per-gene gate inside acceleration re-sampling.
    pub shuffle_gene: f64,
    /// First-step velocity clamp, per individual.
    pub clamp_velocity: f64,
}

impl Default for MutationRates {
    fn default() -> Self {
        Self {
            straight_finish: 1.0,
            control_points: 0.3,
            smooth_acceleration: 0.9,
            shuffle_acceleration: 0.3,
            shuffle_gene: 0.2,
            clamp_velocity: 1.0,
        }
    }
}

impl MutationRates {
    /// All gates with their option names, for validation.
    pub fn named(&self) -> [(&'static str, f64); 6] {
        [
            ("straight_finish", self.straight_finish),
            ("control_points", self.control_points),
            ("smooth_acceleration", self.smooth_acceleration),
            ("shuffle_acceleration", self.shuffle_acceleration),
            ("shuffle_gene", self.shuffle_gene),
            ("clamp_velocity", self.clamp_velocity),
        ]
    }
}

/// Genetic-algorithm planner configuration.
///
/// # Example
///
/// ```
/// use u_trajectory::models::PlannerConfig;
///
/// let config = PlannerConfig::default()
///     .with_population_size(60)
///     .with_iterations(15);
/// assert_eq!(config.horizon, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Individuals per population.
    pub population_size: usize,
    /// Generations per planning call.
    pub iterations: usize,
    /// Planning steps covered by each acceleration sequence (H).
    pub horizon: usize,
    /// Elites retained by selection (N).
    pub elite_count: usize,
    /// Maximum perpendicular offset of seeded control points.
    pub control_point_spread: f64,
    /// Heading cone for seeded control points.
    pub initial_cone: InitialCone,
    /// Curve samples per unit of estimated length during the walk.
    pub samples_per_unit: f64,
    /// Probability that a pair slot is recombined.
    pub crossover_probability: f64,
    /// Mutation probability gates.
    pub mutation: MutationRates,
    /// Ranking weights.
    pub weights: FitnessWeights,
    /// Half extent of the collision range query box.
    pub query_half_extent: f64,
    /// Run the four fitness passes of a generation in parallel.
    pub parallel_fitness: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            population_size: 30,
            iterations: 10,
            horizon: 10,
            elite_count: 50,
            control_point_spread: 2.0,
            initial_cone: InitialCone::default(),
            samples_per_unit: 10.0,
            crossover_probability: 0.1,
            mutation: MutationRates::default(),
            weights: FitnessWeights::default(),
            query_half_extent: 5.0,
            parallel_fitness: true,
        }
    }
}

impl PlannerConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the generation count.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the path horizon.
    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    /// Sets the elite count.
    pub fn with_elite_count(mut self, count: usize) -> Self {
        self.elite_count = count;
        self
    }

    /// Sets the seeding heading cone.
    pub fn with_initial_cone(mut self, cone: InitialCone) -> Self {
        self.initial_cone = cone;
        self
    }

    /// Sets the ranking weights.
    pub fn with_weights(mut self, weights: FitnessWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Sets the mutation gates.
    pub fn with_mutation(mut self, rates: MutationRates) -> Self {
        self.mutation = rates;
        self
    }

    /// Sets the crossover probability.
    pub fn with_crossover_probability(mut self, probability: f64) -> Self {
        self.crossover_probability = probability;
        self
    }

    /// Enables or disables the parallel fitness fan-out.
    pub fn with_parallel_fitness(mut self, parallel: bool) -> Self {
        self.parallel_fitness = parallel;
        self
    }

    /// Effective elite count: `min(elite_count, population_size)`.
    pub fn effective_elite_count(&self) -> usize {
        self.elite_count.min(self.population_size)
    }
}
