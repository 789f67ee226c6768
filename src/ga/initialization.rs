//! Population seeding.
//!
//! Each seeded curve leaves the agent along a heading drawn from a cone
//! around its current forward direction and bends by a random
//! perpendicular offset; acceleration genes are uniform in `[-1, 1]`.
//! Endpoints are never randomized.

use rand::Rng;

use super::Population;
use crate::geometry::{rotate, BezierCurve};
use crate::models::{InitialCone, PlannerConfig, PlanningRequest};

/// Biased-random initializer for Bézier individuals.
#[derive(Debug, Clone, Copy)]
pub struct BezierInitialization {
    /// Heading cone for the first control point.
    pub cone: InitialCone,
    /// Maximum perpendicular control-point offset.
    pub control_point_spread: f64,
}

impl BezierInitialization {
    /// Reads the seeding options of a planner configuration.
    pub fn from_config(config: &PlannerConfig) -> Self {
        Self {
            cone: config.initial_cone,
            control_point_spread: config.control_point_spread,
        }
    }

    /// Overwrites every individual of `population` with a fresh candidate.
    pub fn initialize<R: Rng>(
        &self,
        population: &mut Population,
        request: &PlanningRequest,
        rng: &mut R,
    ) {
        let start = request.start_position;
        let end = request.destination;
        let forward = if request.forward.length_squared() > 0.0 {
            request.forward.normalized()
        } else {
            (end - start).normalized()
        };
        let half = self.cone.half_angle_deg();
        let spread = self.control_point_spread.abs();

        for individual in population.iter_mut() {
            let heading = rotate(forward, rng.random_range(-half..=half));
            let offset = rng.random_range(-spread..=spread);
            individual.curve = BezierCurve::create_initial_path(start, end, heading, offset);
            for gene in individual.accelerations.iter_mut() {
                *gene = rng.random_range(-1.0..=1.0);
            }
            individual.fitness = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::signed_angle_deg;
    use crate::models::Vec2;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_initialize_respects_invariants() {
        let request = PlanningRequest::new(0, Vec2::ZERO, Vec2::new(0.0, 40.0));
        let init = BezierInitialization::from_config(&PlannerConfig::default());
        let mut pop = Population::new(30, 10);
        let mut rng = SmallRng::seed_from_u64(42);
        init.initialize(&mut pop, &request, &mut rng);

        assert!(pop.is_consistent());
        for ind in pop.iter() {
            assert_eq!(ind.curve.start(), request.start_position);
            assert_eq!(ind.curve.end(), request.destination);
            assert!(ind.accelerations.iter().all(|a| (-1.0..=1.0).contains(a)));
        }
    }

    #[test]
    fn test_initialize_fine_cone_stays_near_forward() {
        let request = PlanningRequest::new(0, Vec2::ZERO, Vec2::new(0.0, 40.0));
        let init = BezierInitialization {
            cone: InitialCone::Fine,
            control_point_spread: 0.0,
        };
        let mut pop = Population::new(20, 5);
        let mut rng = SmallRng::seed_from_u64(7);
        init.initialize(&mut pop, &request, &mut rng);

        for ind in pop.iter() {
            let dir = ind.curve.control1() - ind.curve.start();
            assert!(signed_angle_deg(request.forward, dir).abs() <= 15.0 + 1e-9);
        }
    }

    #[test]
    fn test_initialize_is_seed_deterministic() {
        let request = PlanningRequest::new(0, Vec2::ZERO, Vec2::new(10.0, 5.0));
        let init = BezierInitialization::from_config(&PlannerConfig::default());
        let mut a = Population::new(8, 4);
        let mut b = Population::new(8, 4);
        init.initialize(&mut a, &request, &mut SmallRng::seed_from_u64(1));
        init.initialize(&mut b, &request, &mut SmallRng::seed_from_u64(1));
        assert_eq!(a.as_slice(), b.as_slice());
    }
}
