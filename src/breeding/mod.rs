//! # BreedStrategy
//!
//! The `BreedStrategy` trait defines how two selected parents produce offspring.
pub mod uniform;

use std::fmt::Debug;

use crate::{
    candidate::Candidate, error::Result, problem::AllocationProblem,
    rng::RandomNumberGenerator,
};

/// Produces two children from two parents.
pub trait BreedStrategy
where
    Self: Debug + Clone + Send + Sync,
{
    /// Breeds a pair of children.
    ///
    /// ## Parameters
    ///
    /// - `parent1`, `parent2`: The selected parents.
    /// - `problem`: Category bounds the children must respect.
    /// - `rng`: The random number generator all draws go through.
    ///
    /// ## Errors
    ///
    /// This method can fail if the parents do not cover the problem's
    /// categories or a random draw cannot be made.
    fn breed(
        &self,
        parent1: &Candidate,
        parent2: &Candidate,
        problem: &AllocationProblem,
        rng: &mut RandomNumberGenerator,
    ) -> Result<(Candidate, Candidate)>;
}

pub use uniform::UniformBreedStrategy;
