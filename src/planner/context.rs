//! Per-tick planning context.

use crate::oracle::{EmptyOracle, SpatialOracle};

/// Read-only world state shared by every planning run of one tick.
///
/// The oracle is a point-in-time snapshot built by the host before the
/// tick starts; runs only query it.
#[derive(Debug)]
pub struct PlanningContext<'a, O: SpatialOracle> {
    /// Collision snapshot.
    pub oracle: &'a O,
    /// Simulation tick counter.
    pub tick: u64,
}

impl<O: SpatialOracle> Clone for PlanningContext<'_, O> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<O: SpatialOracle> Copy for PlanningContext<'_, O> {}

impl<'a, O: SpatialOracle> PlanningContext<'a, O> {
    /// Creates a context at tick 0.
    pub fn new(oracle: &'a O) -> Self {
        Self { oracle, tick: 0 }
    }

    /// Sets the tick counter.
    pub fn with_tick(mut self, tick: u64) -> Self {
        self.tick = tick;
        self
    }
}

impl PlanningContext<'static, EmptyOracle> {
    /// Context without any obstacles or other agents.
    pub fn empty() -> Self {
        Self {
            oracle: &EmptyOracle,
            tick: 0,
        }
    }
}
