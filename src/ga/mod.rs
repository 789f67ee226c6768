//! Genetic search over Bézier trajectories.
//!
//! # Encoding
//!
//! - **Curve**: cubic Bézier, P0 at the agent and P3 at the destination;
//!   only P1/P2 evolve.
//! - **Accelerations**: `H` genes in `[-1, 1]`, one per planning step.
//!
//! # Generation
//!
//! | Stage | Type |
//! |-------|------|
//! | Fitness ×4 | [`FitnessScores`] |
//! | Ranking | [`WeightedSumRanking`] |
//! | Selection | [`ElitistSelection`] |
//! | Crossover | [`UniformCrossover`] |
//! | Mutation ×5 | [`operators::GeneticOperators`] |
//!
//! Every stage rewrites the [`Population`] buffer in place.
//!
//! # Reference
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and
//!   Machine Learning"
//! - Farin (2002), "Curves and Surfaces for CAGD", ch. 4

pub mod crossover;
pub mod fitness;
mod individual;
pub mod initialization;
pub mod mutation;
pub mod operators;
pub mod ranking;
pub mod selection;

pub use crossover::UniformCrossover;
pub use fitness::{
    is_path_clear, CollisionCost, EndDistanceCost, FitnessEnv, FitnessEvaluator, FitnessScores,
    JerkCost, JerkScratch, TimeToDestinationCost,
};
pub use individual::{Individual, Population};
pub use initialization::BezierInitialization;
pub use mutation::{
    ClampVelocityMutation, ControlPointsMutation, MutationContext, MutationOperator,
    ShuffleAccelerationMutation, SmoothAccelerationMutation, StraightFinishMutation,
};
pub use operators::GeneticOperators;
pub use ranking::{mean_and_std, zscore_normalize, WeightedSumRanking};
pub use selection::ElitistSelection;
