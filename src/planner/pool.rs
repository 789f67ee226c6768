//! Parallel per-agent planning.
//!
//! Every agent of a tick gets its own run with its own population and
//! generator; runs share only the read-only [`PlanningContext`]. The seed
//! of a run is derived from the pool's base seed, the tick and the agent
//! index, so results do not depend on how rayon schedules the runs.
//!
//! # Reference
//! Steele, Lea & Flood (2014), "Fast Splittable Pseudorandom Number
//! Generators" (SplitMix64 finalizer)

use rayon::prelude::*;
use tracing::debug;

use super::context::PlanningContext;
use super::driver::{BezierPlanner, PlanOutcome};
use crate::error::Result;
use crate::models::{PlannerConfig, PlanningRequest};
use crate::oracle::SpatialOracle;

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Runs one planner over many agents in parallel.
#[derive(Debug, Clone)]
pub struct PlanningPool {
    planner: BezierPlanner,
    base_seed: u64,
}

impl PlanningPool {
    /// Creates a pool with base seed 0.
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            planner: BezierPlanner::new(config),
            base_seed: 0,
        }
    }

    /// Sets the base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.base_seed = seed;
        self
    }

    /// The shared planner.
    pub fn planner(&self) -> &BezierPlanner {
        &self.planner
    }

    /// Seed of the run for `agent_index` at `tick`.
    pub fn seed_for(&self, tick: u64, agent_index: usize) -> u64 {
        splitmix64(splitmix64(self.base_seed ^ splitmix64(tick)) ^ agent_index as u64)
    }

    /// Plans every request; results are in request order.
    pub fn plan_all<O: SpatialOracle>(
        &self,
        requests: &[PlanningRequest],
        ctx: &PlanningContext<'_, O>,
    ) -> Vec<Result<PlanOutcome>> {
        debug!(agents = requests.len(), tick = ctx.tick, "planning tick");
        requests
            .par_iter()
            .map(|request| {
                let seed = self.seed_for(ctx.tick, request.agent_index);
                self.planner.plan_seeded(request, ctx, seed)
            })
            .collect()
    }
}
