//! Multi-criteria ranking by weighted z-scores.
//!
//! Each criterion array is standardized with its own mean and population
//! standard deviation so that costs on different scales become comparable,
//! then the standardized values are combined by a weighted sum:
//!
//! ```text
//! fitness_i = Σ_k  w_k · (c_k,i − mean_k) / std_k
//! ```
//!
//! A criterion on which every individual scores the same contributes 0.
//!
//! # Reference
//! Marler & Arora (2004), "Survey of multi-objective optimization methods
//! for engineering", §3.1 (weighted sum with normalization)

use super::{FitnessScores, Population};
use crate::models::FitnessWeights;

/// Mean and population standard deviation of `values`.
///
/// Returns `(0.0, 0.0)` for an empty slice.
pub fn mean_and_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

/// Writes the z-scores of `values` into `out`.
///
/// A zero standard deviation yields all zeros instead of NaN.
pub fn zscore_normalize(values: &[f64], out: &mut Vec<f64>) {
    out.clear();
    // Compared exactly: rounding in the mean must not turn a constant
    // array into ±1 scores.
    let constant = values.windows(2).all(|w| w[0] == w[1]);
    let (mean, std) = mean_and_std(values);
    if !constant && std > 0.0 && std.is_finite() {
        out.extend(values.iter().map(|v| (v - mean) / std));
    } else {
        out.resize(values.len(), 0.0);
    }
}

/// Weighted-sum ranking over z-score normalized criteria.
#[derive(Debug, Clone)]
pub struct WeightedSumRanking {
    weights: FitnessWeights,
    normalized: Vec<f64>,
    combined: Vec<f64>,
}

impl WeightedSumRanking {
    /// Creates a ranking with the given criterion weights.
    pub fn new(weights: FitnessWeights) -> Self {
        Self {
            weights,
            normalized: Vec::new(),
            combined: Vec::new(),
        }
    }

    /// Combined fitness of the last [`rank`](Self::rank) call, by index.
    pub fn combined(&self) -> &[f64] {
        &self.combined
    }

    /// Computes the combined fitness and stores it in each individual.
    pub fn rank(&mut self, population: &mut Population, scores: &FitnessScores) {
        let len = population.len();
        self.combined.clear();
        self.combined.resize(len, 0.0);

        for (values, weight) in scores.criteria().into_iter().zip(self.weights.as_array()) {
            debug_assert_eq!(values.len(), len);
            zscore_normalize(values, &mut self.normalized);
            for (acc, z) in self.combined.iter_mut().zip(&self.normalized) {
                *acc += weight * z;
            }
        }

        for (individual, &fitness) in population.iter_mut().zip(&self.combined) {
            individual.fitness = fitness;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_mean_and_std() {
        let (mean, std) = mean_and_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(mean, 5.0);
        assert_eq!(std, 2.0);
    }

    #[test]
    fn test_zscore_basic() {
        let mut out = Vec::new();
        zscore_normalize(&[1.0, 3.0], &mut out);
        assert_eq!(out, vec![-1.0, 1.0]);
    }

    #[test]
    fn test_rank_prefers_lower_costs() {
        let mut pop = Population::new(3, 2);
        let scores = FitnessScores {
            jerk: vec![1.0, 2.0, 3.0],
            collision: vec![0.0, 0.0, 0.0],
            end_distance: vec![5.0, 10.0, 15.0],
            time_to_destination: vec![3.0, 3.0, 3.0],
        };
        let mut ranking = WeightedSumRanking::new(FitnessWeights::default());
        ranking.rank(&mut pop, &scores);
        assert!(pop[0].fitness < pop[1].fitness);
        assert!(pop[1].fitness < pop[2].fitness);
        assert!(pop[1].fitness.abs() < 1e-12);
        assert_eq!(ranking.combined().len(), 3);
    }

    #[test]
    fn test_rank_constant_criteria_all_zero() {
        let mut pop = Population::new(4, 2);
        let scores = FitnessScores {
            jerk: vec![7.0; 4],
            collision: vec![1.5; 4],
            end_distance: vec![0.0; 4],
            time_to_destination: vec![10.0; 4],
        };
        WeightedSumRanking::new(FitnessWeights::default()).rank(&mut pop, &scores);
        assert!(pop.iter().all(|i| i.fitness == 0.0));
    }

    proptest! {
        #[test]
        fn prop_zscore_of_constant_is_zero(c in -1e6..1e6f64, n in 1usize..50) {
            let mut out = Vec::new();
            zscore_normalize(&vec![c; n], &mut out);
            prop_assert_eq!(out, vec![0.0; n]);
        }
    }
}
