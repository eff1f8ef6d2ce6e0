//! # UniformBreedStrategy
//!
//! Uniform per-category crossover followed by per-category mutation.
//!
//! Categories are independent genes. For every category, in mandatory-then-optional
//! key order, a fair coin decides which child inherits which parent's allocation.
//! Each child is then mutated:
//!
//! - mandatory: Gaussian noise with standard deviation
//!   `mutation_scale * (max - min)`, clamped to the bounds;
//! - optional at `0.0`: redrawn uniformly within the bounds (switched on);
//! - optional above `0.0`: either Gaussian noise and clamp, or switched off,
//!   with equal probability.
//!
//! Each category mutates with probability `mutation_rate`.

use crate::{
    candidate::Candidate,
    catalog::PriceBounds,
    error::{AllocationError, Result},
    evolution::options::EvolutionOptions,
    problem::AllocationProblem,
    rng::RandomNumberGenerator,
};

use super::BreedStrategy;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct UniformBreedStrategy {
    mutation_rate: f64,
    mutation_scale: f64,
}

impl UniformBreedStrategy {
    /// Creates a strategy with the given mutation rate and scale.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the rate is outside `[0, 1]` or the scale is
    /// negative or not finite.
    pub fn new(mutation_rate: f64, mutation_scale: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&mutation_rate) {
            return Err(AllocationError::Configuration(format!(
                "Mutation rate must be within [0, 1], got {}",
                mutation_rate
            )));
        }
        if !mutation_scale.is_finite() || mutation_scale < 0.0 {
            return Err(AllocationError::Configuration(format!(
                "Mutation scale must be a non-negative number, got {}",
                mutation_scale
            )));
        }
        Ok(Self {
            mutation_rate,
            mutation_scale,
        })
    }

    pub fn from_options(options: &EvolutionOptions) -> Result<Self> {
        Self::new(options.get_mutation_rate(), options.get_mutation_scale())
    }

    /// Swaps genes between two children, one coin flip per category.
    pub fn crossover(
        &self,
        parent1: &Candidate,
        parent2: &Candidate,
        problem: &AllocationProblem,
        rng: &mut RandomNumberGenerator,
    ) -> Result<(Candidate, Candidate)> {
        let mut child1 = parent1.clone();
        let mut child2 = parent2.clone();

        for category in problem.mandatory().keys() {
            if !rng.coin() {
                swap_gene(
                    child1.mandatory_allocation_mut().get_mut(category),
                    child2.mandatory_allocation_mut().get_mut(category),
                    category,
                )?;
            }
        }

        for category in problem.optional().keys() {
            if !rng.coin() {
                swap_gene(
                    child1.optional_allocation_mut().get_mut(category),
                    child2.optional_allocation_mut().get_mut(category),
                    category,
                )?;
            }
        }

        Ok((child1, child2))
    }

    /// Mutates `candidate` in place. Results stay within bounds.
    pub fn mutate(
        &self,
        candidate: &mut Candidate,
        problem: &AllocationProblem,
        rng: &mut RandomNumberGenerator,
    ) -> Result<()> {
        for (category, spec) in problem.mandatory() {
            let amount = gene_mut(candidate.mandatory_allocation_mut(), category)?;
            if rng.chance(self.mutation_rate)? {
                *amount = self.perturb(*amount, &spec.bounds, rng)?;
            }
        }

        for (category, spec) in problem.optional() {
            let amount = gene_mut(candidate.optional_allocation_mut(), category)?;
            if !rng.chance(self.mutation_rate)? {
                continue;
            }

            *amount = if *amount == 0.0 {
                rng.uniform_inclusive(spec.bounds.min, spec.bounds.max)?
            } else if rng.coin() {
                self.perturb(*amount, &spec.bounds, rng)?
            } else {
                0.0
            };
        }

        Ok(())
    }

    fn perturb(
        &self,
        amount: f64,
        bounds: &PriceBounds,
        rng: &mut RandomNumberGenerator,
    ) -> Result<f64> {
        let noise = rng.gaussian(self.mutation_scale * bounds.span())?;
        Ok(bounds.clamp(amount + noise))
    }
}

impl Default for UniformBreedStrategy {
    fn default() -> Self {
        Self {
            mutation_rate: 0.2,
            mutation_scale: 0.1,
        }
    }
}

impl BreedStrategy for UniformBreedStrategy {
    fn breed(
        &self,
        parent1: &Candidate,
        parent2: &Candidate,
        problem: &AllocationProblem,
        rng: &mut RandomNumberGenerator,
    ) -> Result<(Candidate, Candidate)> {
        let (mut child1, mut child2) = self.crossover(parent1, parent2, problem, rng)?;
        self.mutate(&mut child1, problem, rng)?;
        self.mutate(&mut child2, problem, rng)?;
        Ok((child1, child2))
    }
}

fn swap_gene(a: Option<&mut f64>, b: Option<&mut f64>, category: &str) -> Result<()> {
    match (a, b) {
        (Some(a), Some(b)) => {
            std::mem::swap(a, b);
            Ok(())
        }
        _ => Err(missing_gene(category)),
    }
}

fn gene_mut<'a>(
    allocation: &'a mut std::collections::BTreeMap<String, f64>,
    category: &str,
) -> Result<&'a mut f64> {
    allocation
        .get_mut(category)
        .ok_or_else(|| missing_gene(category))
}

fn missing_gene(category: &str) -> AllocationError {
    AllocationError::Other(format!("Candidate has no allocation for '{}'", category))
}
