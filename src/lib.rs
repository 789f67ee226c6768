//! Local trajectory planning for crowd-simulation agents.
//!
//! Every planning tick, each agent runs a short genetic search over cubic
//! Bézier paths from its position to its destination, paired with a
//! per-step acceleration profile. Candidates are scored on four competing
//! costs (smoothness, collision risk, distance left, time to arrival),
//! ranked by a weighted sum of z-scores, and the winner's first step
//! becomes the agent's velocity command for the next interval.
//!
//! # Modules
//!
//! - **`models`**: Value types: `Vec2`, `PlanningRequest`, `PlannerConfig`
//! - **`geometry`**: Bézier evaluation, rotations, circle radius
//! - **`kinematics`**: Stopping-speed table and the shared path walk
//! - **`oracle`**: Read-only spatial range queries for collision scoring
//! - **`ga`**: Population, fitness criteria, ranking and genetic operators
//! - **`planner`**: Run state machine, telemetry, parallel agent pool
//! - **`validation`**: Precondition checks on configuration and requests
//!
//! # Example
//!
//! ```
//! use u_trajectory::models::{PlannerConfig, PlanningRequest, Vec2};
//! use u_trajectory::oracle::{GridOracle, OracleEntry};
//! use u_trajectory::planner::{BezierPlanner, PlanningContext};
//!
//! let oracle = GridOracle::build(2.0, [OracleEntry::obstacle(Vec2::new(0.0, 6.0))])
//!     .expect("valid grid");
//! let planner = BezierPlanner::new(PlannerConfig::default());
//! let request = PlanningRequest::new(0, Vec2::ZERO, Vec2::new(0.0, 30.0));
//!
//! let outcome = planner
//!     .plan_seeded(&request, &PlanningContext::new(&oracle), 7)
//!     .expect("valid input");
//! assert!(outcome.velocity.length() <= request.max_speed + 1e-9);
//! ```
//!
//! # References
//!
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and
//!   Machine Learning"
//! - Farin (2002), "Curves and Surfaces for CAGD"
//! - Marler & Arora (2004), "Survey of multi-objective optimization
//!   methods for engineering"

pub mod error;
pub mod ga;
pub mod geometry;
pub mod kinematics;
pub mod models;
pub mod oracle;
pub mod planner;
pub mod validation;

pub use error::{PlanError, Result};
pub use models::{PlannerConfig, PlanningRequest, Vec2};
pub use planner::{BezierPlanner, PlanOutcome, PlanningContext, PlanningPool};
