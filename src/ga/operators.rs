//! Configured variation stage of one generation.
//!
//! [`GeneticOperators`] bundles the crossover and the five mutations with
//! the probabilities of a [`PlannerConfig`] and applies them in their fixed
//! order. The operator set is closed, so every call is statically
//! dispatched.
//!
//! # Usage
//!
//! ```
//! use u_trajectory::ga::operators::GeneticOperators;
//! use u_trajectory::models::PlannerConfig;
//!
//! let ops = GeneticOperators::from_config(&PlannerConfig::default());
//! assert_eq!(ops.crossover.probability, 0.1);
//! assert_eq!(ops.shuffle_acceleration.gene_rate, 0.2);
//! ```

use rand::Rng;

use super::crossover::UniformCrossover;
use super::mutation::{
    ClampVelocityMutation, ControlPointsMutation, MutationContext, MutationOperator,
    ShuffleAccelerationMutation, SmoothAccelerationMutation, StraightFinishMutation,
};
use super::Population;
use crate::models::PlannerConfig;

/// Crossover plus the five mutations, with their probabilities.
#[derive(Debug, Clone)]
pub struct GeneticOperators {
    /// Uniform crossover.
    pub crossover: UniformCrossover,
    /// Straight-finish replacement of the last individual.
    pub straight_finish: StraightFinishMutation,
    /// Control-point re-placement.
    pub control_points: ControlPointsMutation,
    /// Pairwise gene averaging.
    pub smooth_acceleration: SmoothAccelerationMutation,
    /// Gene re-sampling.
    pub shuffle_acceleration: ShuffleAccelerationMutation,
    /// First-step velocity clamp.
    pub clamp_velocity: ClampVelocityMutation,
}

impl Default for GeneticOperators {
    fn default() -> Self {
        Self::from_config(&PlannerConfig::default())
    }
}

impl GeneticOperators {
    /// Reads the operator probabilities of `config`.
    pub fn from_config(config: &PlannerConfig) -> Self {
        let rates = &config.mutation;
        Self {
            crossover: UniformCrossover::new(config.crossover_probability),
            straight_finish: StraightFinishMutation {
                rate: rates.straight_finish,
            },
            control_points: ControlPointsMutation {
                rate: rates.control_points,
            },
            smooth_acceleration: SmoothAccelerationMutation {
                rate: rates.smooth_acceleration,
            },
            shuffle_acceleration: ShuffleAccelerationMutation {
                rate: rates.shuffle_acceleration,
                gene_rate: rates.shuffle_gene,
            },
            clamp_velocity: ClampVelocityMutation {
                rate: rates.clamp_velocity,
            },
        }
    }

    /// Performs crossover on the whole population.
    pub fn crossover<R: Rng>(&self, population: &mut Population, rng: &mut R) {
        self.crossover.crossover(population, rng);
    }

    /// Runs the five mutations in order: straight finish, control points,
    /// smoothing, shuffling, velocity clamp.
    pub fn mutate<R: Rng>(&self, population: &mut Population, ctx: &MutationContext, rng: &mut R) {
        self.straight_finish.mutate(population, ctx, rng);
        self.control_points.mutate(population, ctx, rng);
        self.smooth_acceleration.mutate(population, ctx, rng);
        self.shuffle_acceleration.mutate(population, ctx, rng);
        self.clamp_velocity.mutate(population, ctx, rng);
    }

    /// Crossover followed by all mutations.
    pub fn apply<R: Rng>(&self, population: &mut Population, ctx: &MutationContext, rng: &mut R) {
        self.crossover(population, rng);
        self.mutate(population, ctx, rng);
    }
}
