//! Candidate trajectories and the run-scoped population buffer.
//!
//! # Encoding
//!
//! An individual is a pair of genomes:
//! - **Curve**: a cubic Bézier whose endpoints are pinned to the agent
//!   position and the destination; only P1/P2 evolve.
//! - **Accelerations**: `H` genes in `[-1, 1]`, one per planning step,
//!   scaled by the agent's maximum acceleration during the kinematic walk.
//!
//! Lower fitness = better trajectory (minimization convention).

use std::ops::{Index, IndexMut};

use crate::geometry::BezierCurve;

/// One candidate trajectory.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    /// Path shape.
    pub curve: BezierCurve,
    /// Acceleration genes, one per step.
    pub accelerations: Vec<f64>,
    /// Ranked fitness (lower = better).
    pub fitness: f64,
}

impl Individual {
    /// Allocates an individual for `horizon` steps with zeroed genes.
    pub fn new(horizon: usize) -> Self {
        Self {
            curve: BezierCurve::default(),
            accelerations: vec![0.0; horizon],
            fitness: 0.0,
        }
    }

    /// Number of planning steps covered.
    pub fn horizon(&self) -> usize {
        self.accelerations.len()
    }

    /// Overwrites genes and fitness with `other`'s, reusing storage.
    pub fn copy_from(&mut self, other: &Individual) {
        self.curve = other.curve;
        self.accelerations.clone_from(&other.accelerations);
        self.fitness = other.fitness;
    }
}

/// Fixed-capacity population for one GA run.
///
/// Operators rewrite individuals in place; the buffer never grows or
/// shrinks, and every individual keeps the same horizon. The storage is
/// released when the population is dropped at the end of the run.
#[derive(Debug, Clone)]
pub struct Population {
    individuals: Vec<Individual>,
    horizon: usize,
}

impl Population {
    /// Allocates `size` individuals of `horizon` steps.
    pub fn new(size: usize, horizon: usize) -> Self {
        Self {
            individuals: (0..size).map(|_| Individual::new(horizon)).collect(),
            horizon,
        }
    }

    /// Number of individuals.
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// Whether the population holds no individuals.
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Steps per individual.
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Iterates individuals in buffer order.
    pub fn iter(&self) -> std::slice::Iter<'_, Individual> {
        self.individuals.iter()
    }

    /// Iterates individuals mutably.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Individual> {
        self.individuals.iter_mut()
    }

    /// The individuals as a slice.
    pub fn as_slice(&self) -> &[Individual] {
        &self.individuals
    }

    /// The individuals as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [Individual] {
        &mut self.individuals
    }

    /// Last individual in buffer order.
    pub fn last_mut(&mut self) -> Option<&mut Individual> {
        self.individuals.last_mut()
    }

    /// Sorts ascending by fitness (best first).
    pub fn sort_by_fitness(&mut self) {
        self.individuals
            .sort_by(|a, b| a.fitness.total_cmp(&b.fitness));
    }

    /// Index of the individual with the lowest fitness.
    pub fn best_index(&self) -> Option<usize> {
        self.individuals
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.fitness.total_cmp(&b.fitness))
            .map(|(i, _)| i)
    }

    /// Whether every individual has exactly `horizon` genes.
    pub fn is_consistent(&self) -> bool {
        self.individuals
            .iter()
            .all(|ind| ind.accelerations.len() == self.horizon)
    }
}

impl Index<usize> for Population {
    type Output = Individual;

    fn index(&self, index: usize) -> &Individual {
        &self.individuals[index]
    }
}

impl IndexMut<usize> for Population {
    fn index_mut(&mut self, index: usize) -> &mut Individual {
        &mut self.individuals[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Vec2;

    #[test]
    fn test_new_individual_zeroed() {
        let ind = Individual::new(10);
        assert_eq!(ind.horizon(), 10);
        assert!(ind.accelerations.iter().all(|&a| a == 0.0));
        assert_eq!(ind.fitness, 0.0);
    }

    #[test]
    fn test_copy_from() {
        let mut a = Individual::new(4);
        let mut b = Individual::new(4);
        b.curve = BezierCurve::straight(Vec2::ZERO, Vec2::new(1.0, 1.0));
        b.accelerations = vec![0.1, 0.2, 0.3, 0.4];
        b.fitness = -2.0;
        a.copy_from(&b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_population_sort_and_best() {
        let mut pop = Population::new(4, 3);
        for (i, f) in [3.0, -1.0, 2.0, 0.5].into_iter().enumerate() {
            pop[i].fitness = f;
        }
        assert_eq!(pop.best_index(), Some(1));
        pop.sort_by_fitness();
        let order: Vec<f64> = pop.iter().map(|i| i.fitness).collect();
        assert_eq!(order, vec![-1.0, 0.5, 2.0, 3.0]);
        assert!(pop.is_consistent());
    }

    #[test]
    fn test_empty_population() {
        let pop = Population::new(0, 10);
        assert!(pop.is_empty());
        assert_eq!(pop.best_index(), None);
    }
}
