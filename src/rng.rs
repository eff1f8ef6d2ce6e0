//! # RandomNumberGenerator
//!
//! The `RandomNumberGenerator` struct is the single source of randomness for the
//! optimizer. Every operator (initialization, selection, crossover, mutation)
//! receives it explicitly, so a seeded generator makes a whole run reproducible.
//!
//! ## Example
//!
//! ```rust
//! use budget_ga::rng::RandomNumberGenerator;
//!
//! let mut rng = RandomNumberGenerator::from_seed(7);
//!
//! for _ in 0..5 {
//!     let price = rng.uniform_inclusive(100.0, 200.0).unwrap();
//!     assert!((100.0..=200.0).contains(&price));
//! }
//! ```

use rand::{rngs::StdRng, seq::index, Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::error::{AllocationError, Result};

/// A wrapper around the `rand` crate's `StdRng` that provides the draws the
/// genetic operators need.
#[derive(Clone)]
pub struct RandomNumberGenerator {
    pub rng: StdRng,
}

impl RandomNumberGenerator {
    /// Creates a new `RandomNumberGenerator` instance seeded from the system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a new `RandomNumberGenerator` instance with a specific seed.
    ///
    /// This is useful for reproducible tests and benchmarks.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draws a value uniformly from the closed range `[min, max]`.
    ///
    /// # Errors
    ///
    /// Returns `RandomGeneration` if `min > max` or either end is not finite.
    pub fn uniform_inclusive(&mut self, min: f64, max: f64) -> Result<f64> {
        if !(min.is_finite() && max.is_finite()) || min > max {
            return Err(AllocationError::RandomGeneration(format!(
                "Invalid uniform range [{}, {}]",
                min, max
            )));
        }
        Ok(self.rng.gen_range(min..=max))
    }

    /// Returns `true` with probability `p`.
    ///
    /// # Errors
    ///
    /// Returns `RandomGeneration` if `p` is outside `[0, 1]`.
    pub fn chance(&mut self, p: f64) -> Result<bool> {
        if !(0.0..=1.0).contains(&p) {
            return Err(AllocationError::RandomGeneration(format!(
                "Probability {} is outside [0, 1]",
                p
            )));
        }
        Ok(self.rng.gen_bool(p))
    }

    /// Fair coin flip.
    pub fn coin(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }

    /// Draws from a normal distribution with mean 0 and the given standard deviation.
    ///
    /// # Errors
    ///
    /// Returns `RandomGeneration` if `std_dev` is negative or not finite.
    pub fn gaussian(&mut self, std_dev: f64) -> Result<f64> {
        if !(std_dev >= 0.0) {
            return Err(AllocationError::RandomGeneration(format!(
                "Standard deviation must be non-negative, got {}",
                std_dev
            )));
        }
        let normal = Normal::new(0.0, std_dev).map_err(|e| {
            AllocationError::RandomGeneration(format!(
                "Invalid standard deviation {}: {}",
                std_dev, e
            ))
        })?;
        Ok(normal.sample(&mut self.rng))
    }

    /// Samples `amount` distinct indices from `0..length`, in draw order.
    ///
    /// # Errors
    ///
    /// Returns `RandomGeneration` if `amount > length`.
    pub fn sample_indices(&mut self, length: usize, amount: usize) -> Result<Vec<usize>> {
        if amount > length {
            return Err(AllocationError::RandomGeneration(format!(
                "Cannot sample {} distinct indices from {}",
                amount, length
            )));
        }
        Ok(index::sample(&mut self.rng, length, amount).into_vec())
    }
}

impl Default for RandomNumberGenerator {
    fn default() -> Self {
        Self::new()
    }
}
