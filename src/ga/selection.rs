//! Elitist selection.
//!
//! Sorts the population best-first, keeps the top `N` unchanged and refills
//! every later slot `i` with a copy of elite `i % N`.

use super::Population;

/// Keep-the-best selection with cyclic elite duplication.
#[derive(Debug, Clone, Copy)]
pub struct ElitistSelection {
    /// Number of elites (capped at the population size).
    pub elite_count: usize,
}

impl ElitistSelection {
    /// Creates a selection retaining `elite_count` individuals.
    pub fn new(elite_count: usize) -> Self {
        Self { elite_count }
    }

    /// Applies selection in place.
    pub fn select(&self, population: &mut Population) {
        population.sort_by_fitness();
        let n = self.elite_count.min(population.len());
        if n == 0 {
            return;
        }
        let individuals = population.as_mut_slice();
        for i in n..individuals.len() {
            let (elites, rest) = individuals.split_at_mut(i);
            rest[0].copy_from(&elites[i % n]);
        }
    }
}
