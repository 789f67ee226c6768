//! Uniform crossover.
//!
//! Walks the population in pairs `(i, i + 1)`. With probability
//! `probability` the slot `i` is recombined with a uniformly drawn partner
//! (never itself): each of P1.x, P1.y, P2.x, P2.y and every acceleration
//! gene is inherited from either parent by a fair coin flip. P0 and P3 are
//! shared by all individuals of a run and are never touched.
//!
//! # Reference
//! Syswerda (1989), "Uniform Crossover in Genetic Algorithms"

use rand::Rng;

use super::{Individual, Population};
use crate::models::Vec2;

fn pick<R: Rng>(own: f64, other: f64, rng: &mut R) -> f64 {
    if rng.random_bool(0.5) {
        own
    } else {
        other
    }
}

/// Per-component coin-flip recombination.
#[derive(Debug, Clone, Copy)]
pub struct UniformCrossover {
    /// Probability that a pair slot is recombined.
    pub probability: f64,
}

impl UniformCrossover {
    /// Creates a crossover with the given pair probability.
    pub fn new(probability: f64) -> Self {
        Self { probability }
    }

    /// Recombines `child` with `donor` in place.
    pub fn recombine<R: Rng>(child: &mut Individual, donor: &Individual, rng: &mut R) {
        let (c1, c2) = (child.curve.control1(), child.curve.control2());
        let (d1, d2) = (donor.curve.control1(), donor.curve.control2());
        let p1 = Vec2::new(pick(c1.x, d1.x, rng), pick(c1.y, d1.y, rng));
        let p2 = Vec2::new(pick(c2.x, d2.x, rng), pick(c2.y, d2.y, rng));
        child.curve.set_controls(p1, p2);

        for (gene, &other) in child.accelerations.iter_mut().zip(&donor.accelerations) {
            *gene = pick(*gene, other, rng);
        }
    }

    /// Applies crossover to the whole population.
    pub fn crossover<R: Rng>(&self, population: &mut Population, rng: &mut R) {
        let len = population.len();
        if len < 2 {
            return;
        }
        for i in (0..len - 1).step_by(2) {
            if !rng.random_bool(self.probability) {
                continue;
            }
            let mut partner = rng.random_range(0..len - 1);
            if partner >= i {
                partner += 1;
            }
            let donor = population[partner].clone();
            Self::recombine(&mut population[i], &donor, rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BezierCurve;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn population(size: usize, horizon: usize) -> Population {
        let mut pop = Population::new(size, horizon);
        for (i, ind) in pop.iter_mut().enumerate() {
            let k = i as f64;
            ind.curve = BezierCurve::new(
                Vec2::ZERO,
                Vec2::new(k, k + 1.0),
                Vec2::new(-k, 10.0 - k),
                Vec2::new(0.0, 10.0),
            );
            ind.accelerations = vec![k / size as f64; horizon];
        }
        pop
    }

    #[test]
    fn test_crossover_preserves_invariants() {
        let mut pop = population(10, 6);
        let mut rng = SmallRng::seed_from_u64(42);
        UniformCrossover::new(1.0).crossover(&mut pop, &mut rng);
        assert!(pop.is_consistent());
        for ind in pop.iter() {
            assert_eq!(ind.curve.start(), Vec2::ZERO);
            assert_eq!(ind.curve.end(), Vec2::new(0.0, 10.0));
        }
    }

    #[test]
    fn test_crossover_zero_probability_is_identity() {
        let mut pop = population(8, 4);
        let before = pop.clone();
        UniformCrossover::new(0.0).crossover(&mut pop, &mut SmallRng::seed_from_u64(3));
        assert_eq!(pop.as_slice(), before.as_slice());
    }

    #[test]
    fn test_recombine_takes_genes_from_parents() {
        let pop = population(2, 8);
        let mut child = pop[0].clone();
        let donor = pop[1].clone();
        let mut rng = SmallRng::seed_from_u64(11);
        UniformCrossover::recombine(&mut child, &donor, &mut rng);
        for (i, gene) in child.accelerations.iter().enumerate() {
            assert!(*gene == pop[0].accelerations[i] || *gene == donor.accelerations[i]);
        }
        let p1 = child.curve.control1();
        assert!(p1.x == 0.0 || p1.x == 1.0);
        assert!(p1.y == 1.0 || p1.y == 2.0);
    }

    #[test]
    fn test_crossover_full_probability_changes_something() {
        let mut pop = population(10, 6);
        let before = pop.clone();
        UniformCrossover::new(1.0).crossover(&mut pop, &mut SmallRng::seed_from_u64(5));
        assert_ne!(pop.as_slice(), before.as_slice());
    }
}
