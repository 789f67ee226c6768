//! Per-generation run records.
//!
//! One [`GenerationRecord`] is captured for the best individual after every
//! ranking, i.e. `iterations + 1` records per run including the final pass.
//!
//! | Field | Definition |
//! |-------|-----------|
//! | `overall` | Weighted z-score sum (only comparable within a generation) |
//! | `jerk` .. `time_to_destination` | Raw criterion costs |
//! | `min_turn_radius` | Tightest circle through sampled curve points |

use serde::Serialize;

use crate::ga::{FitnessScores, Population};

/// Curve samples used for the turn-radius estimate.
const TURN_RADIUS_SAMPLES: usize = 20;

/// Best-of-generation decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationRecord {
    /// Generation index; the final pass is `iterations`.
    pub generation: usize,
    /// Combined ranking fitness.
    pub overall: f64,
    /// Jerk cost.
    pub jerk: f64,
    /// Collision cost.
    pub collision: f64,
    /// End-distance cost.
    pub end_distance: f64,
    /// Time-to-destination cost.
    pub time_to_destination: f64,
    /// Smallest turn radius of the path (`None` for a straight path).
    pub min_turn_radius: Option<f64>,
}

impl GenerationRecord {
    /// Record for individual `index` of a ranked population.
    ///
    /// Returns `None` if `index` is out of range for either input.
    pub fn for_individual(
        generation: usize,
        population: &Population,
        scores: &FitnessScores,
        index: usize,
    ) -> Option<Self> {
        let individual = population.as_slice().get(index)?;
        Some(Self {
            generation,
            overall: individual.fitness,
            jerk: *scores.jerk.get(index)?,
            collision: *scores.collision.get(index)?,
            end_distance: *scores.end_distance.get(index)?,
            time_to_destination: *scores.time_to_destination.get(index)?,
            min_turn_radius: individual.curve.min_turn_radius(TURN_RADIUS_SAMPLES),
        })
    }

    /// Record for the lowest-fitness individual.
    pub fn best_of(generation: usize, population: &Population, scores: &FitnessScores) -> Option<Self> {
        let index = population.best_index()?;
        Self::for_individual(generation, population, scores, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BezierCurve;
    use crate::models::Vec2;

    #[test]
    fn test_best_of_picks_lowest_fitness() {
        let mut pop = Population::new(3, 2);
        for (i, f) in [0.4, -1.2, 0.8].into_iter().enumerate() {
            pop[i].fitness = f;
            pop[i].curve = BezierCurve::straight(Vec2::ZERO, Vec2::new(0.0, 5.0));
        }
        pop[1].curve = BezierCurve::new(
            Vec2::ZERO,
            Vec2::new(2.0, 1.0),
            Vec2::new(2.0, 4.0),
            Vec2::new(0.0, 5.0),
        );
        let scores = FitnessScores {
            jerk: vec![1.0, 2.0, 3.0],
            collision: vec![0.0, 0.5, 0.0],
            end_distance: vec![4.0, 5.0, 6.0],
            time_to_destination: vec![7.0, 8.0, 9.0],
        };
        let record = GenerationRecord::best_of(2, &pop, &scores).expect("non-empty");
        assert_eq!(record.generation, 2);
        assert_eq!(record.overall, -1.2);
        assert_eq!(record.jerk, 2.0);
        assert_eq!(record.collision, 0.5);
        assert_eq!(record.time_to_destination, 8.0);
        assert!(record.min_turn_radius.is_some());
    }

    #[test]
    fn test_straight_path_has_no_turn_radius() {
        let mut pop = Population::new(1, 1);
        pop[0].curve = BezierCurve::straight(Vec2::ZERO, Vec2::new(3.0, 0.0));
        let scores = FitnessScores {
            jerk: vec![0.0],
            collision: vec![0.0],
            end_distance: vec![0.0],
            time_to_destination: vec![1.0],
        };
        let record = GenerationRecord::best_of(0, &pop, &scores).expect("non-empty");
        assert_eq!(record.min_turn_radius, None);
    }

    #[test]
    fn test_record_serializes() {
        let mut pop = Population::new(1, 1);
        pop[0].curve = BezierCurve::straight(Vec2::ZERO, Vec2::new(3.0, 0.0));
        let scores = FitnessScores {
            jerk: vec![0.0],
            collision: vec![0.0],
            end_distance: vec![0.0],
            time_to_destination: vec![1.0],
        };
        let record = GenerationRecord::best_of(0, &pop, &scores).expect("non-empty");
        let json = serde_json::to_value(record).expect("serializable");
        assert_eq!(json["time_to_destination"], 1.0);
        assert!(json["min_turn_radius"].is_null());
    }

    #[test]
    fn test_mismatched_scores() {
        let pop = Population::new(2, 1);
        let scores = FitnessScores::default();
        assert!(GenerationRecord::best_of(0, &pop, &scores).is_none());
    }
}
