//! Agent planning request model.
//!
//! A request is the immutable snapshot of one agent's kinematic state
//! handed to the planner for a single planning tick.

use serde::{Deserialize, Serialize};

use super::Vec2;

/// One agent's input to a planning call.
///
/// # Units
/// Positions are in world units. `start_velocity` and `max_speed` are in
/// units per second; `max_acceleration` is the largest change of the
/// per-step travel distance between two consecutive planning steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningRequest {
    /// Current agent position (P0 of every candidate curve).
    pub start_position: Vec2,
    /// Local goal (P3 of every candidate curve).
    pub destination: Vec2,
    /// Current heading. Need not be normalized.
    pub forward: Vec2,
    /// Current speed (units/s).
    pub start_velocity: f64,
    /// Maximum speed (units/s).
    pub max_speed: f64,
    /// Maximum per-step change of travelled distance.
    pub max_acceleration: f64,
    /// Duration of one planning step (s).
    pub planning_interval: f64,
    /// Agent body radius. A path passing closer than twice this to an
    /// obstacle is not clear (see [`crate::ga::is_path_clear`]).
    pub agent_radius: f64,
    /// Index of the agent in the simulation roster.
    pub agent_index: usize,
}

impl PlanningRequest {
    /// Creates a request for an agent at rest heading towards `destination`.
    ///
    /// Kinematic limits default to `max_speed = 2.5`, `max_acceleration = 1.0`,
    /// `planning_interval = 0.5`, `agent_radius = 0.5`.
    pub fn new(agent_index: usize, start_position: Vec2, destination: Vec2) -> Self {
        Self {
            start_position,
            destination,
            forward: (destination - start_position).normalized(),
            start_velocity: 0.0,
            max_speed: 2.5,
            max_acceleration: 1.0,
            planning_interval: 0.5,
            agent_radius: 0.5,
            agent_index,
        }
    }

    /// Sets the current heading.
    pub fn with_forward(mut self, forward: Vec2) -> Self {
        self.forward = forward;
        self
    }

    /// Sets the current speed (units/s).
    pub fn with_start_velocity(mut self, speed: f64) -> Self {
        self.start_velocity = speed;
        self
    }

    /// Sets the maximum speed (units/s).
    pub fn with_max_speed(mut self, max_speed: f64) -> Self {
        self.max_speed = max_speed;
        self
    }

    /// Sets the maximum per-step acceleration.
    pub fn with_max_acceleration(mut self, max_acceleration: f64) -> Self {
        self.max_acceleration = max_acceleration;
        self
    }

    /// Sets the planning interval (s).
    pub fn with_planning_interval(mut self, interval: f64) -> Self {
        self.planning_interval = interval;
        self
    }

    /// Sets the agent radius.
    pub fn with_agent_radius(mut self, radius: f64) -> Self {
        self.agent_radius = radius;
        self
    }

    /// Distance the agent may travel in one step at full speed.
    pub fn max_step_distance(&self) -> f64 {
        self.max_speed * self.planning_interval
    }

    /// Current speed expressed as distance per planning step.
    pub fn start_step_velocity(&self) -> f64 {
        (self.start_velocity * self.planning_interval).min(self.max_step_distance())
    }

    /// Straight-line distance to the destination.
    pub fn distance_to_destination(&self) -> f64 {
        self.start_position.distance(self.destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_faces_destination() {
        let req = PlanningRequest::new(3, Vec2::new(0.0, 0.0), Vec2::new(0.0, 40.0));
        assert_eq!(req.forward, Vec2::new(0.0, 1.0));
        assert_eq!(req.agent_index, 3);
        assert_eq!(req.distance_to_destination(), 40.0);
    }

    #[test]
    fn test_step_velocity_conversion() {
        let req = PlanningRequest::new(0, Vec2::ZERO, Vec2::new(10.0, 0.0))
            .with_start_velocity(2.0)
            .with_planning_interval(0.5);
        assert_eq!(req.max_step_distance(), 1.25);
        assert_eq!(req.start_step_velocity(), 1.0);
    }

    #[test]
    fn test_step_velocity_capped_at_max_step() {
        let req = PlanningRequest::new(0, Vec2::ZERO, Vec2::new(10.0, 0.0))
            .with_start_velocity(10.0);
        assert_eq!(req.start_step_velocity(), req.max_step_distance());
    }
}
