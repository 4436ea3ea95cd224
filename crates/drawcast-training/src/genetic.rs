//! Genetic algorithm for evolving dimension weights.
//!
//! # Algorithm Overview
//!
//! 1. **Evaluate Fitness** - every gene is backtested against the [`ModelCache`] and the
//!    population is sorted best-first (stable, so equal fitness keeps the previous order)
//! 2. **Elite Selection** - the top half is carried over unchanged
//! 3. **Reproduction** - each remaining slot copies a uniformly chosen elite
//! 4. **Mutation** - with probability `mutation_rate`, one weight of the copy is replaced by a
//!    fresh random value
//!
//! There is no crossover: a child always has exactly one parent.
//!
//! # Key Components
//!
//! - [`Gene`] - a weight vector and its fitness
//! - [`Population`] - the genes evaluated together, tied to an ordered list of dimension ids
//! - [`PopulationEvolver`] - evolution parameters
//! - [`StoredGene`] - persisted form, keyed by dimension id
//!
//! # Determinism
//!
//! All randomness comes from the generator passed in. Fitness evaluation is pure, so for a
//! fixed cache the best fitness never decreases from one generation to the next: the elites
//! keep their weights and score the same again.

use std::collections::BTreeMap;

use rand::{Rng, seq::IndexedRandom as _};
use serde::{Deserialize, Serialize};

use crate::{
    backtest::{FitnessRule, ModelCache},
    stats::FitnessSummary,
    weights,
};

/// A candidate weight vector and its backtested fitness.
#[derive(Debug, Clone, PartialEq)]
pub struct Gene {
    weights: Vec<f32>,
    fitness: f32,
}

impl Gene {
    #[must_use]
    pub fn new(weights: Vec<f32>) -> Self {
        Self {
            weights,
            fitness: 0.0,
        }
    }

    /// Creates a gene with weights uniform in `[0, max_weight]` and zero fitness.
    pub fn random<R>(rng: &mut R, max_weight: f32, dimension_count: usize) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::new(weights::random(rng, max_weight, dimension_count))
    }

    #[must_use]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    #[must_use]
    pub fn fitness(&self) -> f32 {
        self.fitness
    }
}

/// A gene as persisted in the settings store.
///
/// Weights are keyed by dimension id so a stored population survives dimensions being added or
/// reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredGene {
    pub weights: BTreeMap<String, f32>,
    pub fitness: f32,
}

#[derive(Debug, Clone)]
pub struct Population {
    dimension_ids: Vec<String>,
    genes: Vec<Gene>,
}

impl Population {
    #[must_use]
    pub fn random<R>(dimension_ids: Vec<String>, count: usize, rng: &mut R, max_weight: f32) -> Self
    where
        R: Rng + ?Sized,
    {
        let genes = (0..count)
            .map(|_| Gene::random(rng, max_weight, dimension_ids.len()))
            .collect();
        Self {
            dimension_ids,
            genes,
        }
    }

    /// Restores a stored population.
    ///
    /// Weights missing for a dimension are drawn at random and stored weights are clamped to
    /// `[0, max_weight]`. The result is truncated or padded with random genes to `count`.
    #[must_use]
    pub fn from_stored<R>(
        dimension_ids: Vec<String>,
        stored: &[StoredGene],
        count: usize,
        rng: &mut R,
        max_weight: f32,
    ) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut genes: Vec<Gene> = stored
            .iter()
            .take(count)
            .map(|s| {
                let weights = dimension_ids
                    .iter()
                    .map(|id| match s.weights.get(id) {
                        Some(w) => w.clamp(0.0, max_weight),
                        None => rng.random_range(0.0..=max_weight),
                    })
                    .collect();
                Gene {
                    weights,
                    fitness: s.fitness,
                }
            })
            .collect();
        while genes.len() < count {
            genes.push(Gene::random(rng, max_weight, dimension_ids.len()));
        }
        Self {
            dimension_ids,
            genes,
        }
    }

    #[must_use]
    pub fn to_stored(&self) -> Vec<StoredGene> {
        self.genes
            .iter()
            .map(|g| StoredGene {
                weights: self.weights_by_id(g),
                fitness: g.fitness,
            })
            .collect()
    }

    /// `gene`'s weights keyed by dimension id.
    #[must_use]
    pub fn weights_by_id(&self, gene: &Gene) -> BTreeMap<String, f32> {
        self.dimension_ids
            .iter()
            .cloned()
            .zip(gene.weights.iter().copied())
            .collect()
    }

    #[must_use]
    pub fn dimension_ids(&self) -> &[String] {
        &self.dimension_ids
    }

    #[must_use]
    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    /// The fittest gene. Only meaningful after [`Self::evaluate_fitness`].
    #[must_use]
    pub fn best(&self) -> Option<&Gene> {
        self.genes.first()
    }

    /// Backtests every gene, then sorts by fitness descending (stable).
    pub fn evaluate_fitness(&mut self, cache: &ModelCache, rule: &FitnessRule, apply_kill: bool) {
        for gene in &mut self.genes {
            gene.fitness = cache.evaluate(&gene.weights, rule, apply_kill);
        }
        self.genes.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
    }

    #[must_use]
    pub fn fitness_summary(&self) -> Option<FitnessSummary> {
        FitnessSummary::new(self.genes.iter().map(|g| g.fitness))
    }
}

#[derive(Debug, Clone)]
pub struct PopulationEvolver {
    /// Number of top genes preserved unchanged.
    pub elite_count: usize,
    /// Upper bound of any weight.
    pub max_weight: f32,
    /// Probability that a child gets one weight replaced.
    pub mutation_rate: f64,
}

impl PopulationEvolver {
    /// An evolver keeping the top half of a population of `size`.
    #[must_use]
    pub fn for_population(size: usize, max_weight: f32, mutation_rate: f64) -> Self {
        Self {
            elite_count: (size / 2).max(1),
            max_weight,
            mutation_rate,
        }
    }

    /// Creates the next generation.
    ///
    /// `population` must be sorted best-first (as left by [`Population::evaluate_fitness`]).
    /// Elites keep their fitness; children start at zero.
    #[must_use]
    pub fn evolve<R>(&self, population: &Population, rng: &mut R) -> Population
    where
        R: Rng + ?Sized,
    {
        assert!(
            population
                .genes
                .is_sorted_by(|a, b| a.fitness >= b.fitness)
        );
        let size = population.genes.len();
        let elites = &population.genes[..self.elite_count.min(size)];

        let mut next_genes = elites.to_vec();
        while next_genes.len() < size {
            let Some(parent) = elites.choose(rng) else {
                break;
            };
            let mut child = parent.weights.clone();
            if rng.random_bool(self.mutation_rate.clamp(0.0, 1.0)) {
                weights::mutate_single_point(&mut child, self.max_weight, rng);
            }
            next_genes.push(Gene::new(child));
        }

        Population {
            dimension_ids: population.dimension_ids.clone(),
            genes: next_genes,
        }
    }
}
