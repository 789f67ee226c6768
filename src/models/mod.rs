//! Planning domain models.
//!
//! Provides the value types exchanged between the simulation host and the
//! planner: the planar vector, the per-agent planning request, and the
//! planner configuration.
//!
//! # Units
//!
//! | Quantity | Unit |
//! |----------|------|
//! | Position | world units |
//! | `start_velocity`, `max_speed` | units / second |
//! | Per-step velocity (internal) | units / planning step |
//! | `max_acceleration` | units / planning step, per step |

mod config;
mod request;
mod vector;

pub use config::{FitnessWeights, InitialCone, MutationRates, PlannerConfig};
pub use request::PlanningRequest;
pub use vector::Vec2;
