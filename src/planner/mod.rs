//! Per-agent planning runs.
//!
//! A run takes a [`PlanningRequest`](crate::models::PlanningRequest) and a
//! [`PlanningContext`], evolves a population of Bézier candidates and
//! returns the winner's first-step velocity as a [`PlanOutcome`].
//!
//! # Submodules
//!
//! - [`BezierPlanner`]: the run state machine for one agent
//! - [`PlanningPool`]: parallel dispatch of one tick's agents
//! - [`GenerationRecord`]: best-of-generation telemetry

mod context;
mod driver;
mod pool;
mod telemetry;

pub use context::PlanningContext;
pub use driver::{command_velocity, BezierPlanner, PlanOutcome, RunState};
pub use pool::PlanningPool;
pub use telemetry::GenerationRecord;
