//! # EvolutionOptions
//!
//! The `EvolutionOptions` struct holds the tuning parameters of the optimizer:
//! number of generations, population size, tournament size, mutation rate and
//! scale, how many candidates to return and how much to log.
//!
//! ## Example
//!
//! ```rust
//! use budget_ga::evolution::options::{EvolutionOptions, LogLevel};
//!
//! // Defaults: 100 generations, population 50, tournament 3, top 5
//! let default_options = EvolutionOptions::default();
//! assert_eq!(default_options.get_population_size(), 50);
//!
//! let custom_options = EvolutionOptions::builder()
//!     .num_generations(200)
//!     .population_size(80)
//!     .log_level(LogLevel::Minimal)
//!     .build();
//! assert!(custom_options.validate().is_ok());
//! ```
//!
//! ## Structs
//!
//! ### `EvolutionOptions`
//!
//! #### Fields
//!
//! - `num_generations`: Number of generations to run.
//! - `log_level`: How much progress to report through `tracing`.
//! - `population_size`: Candidates per generation.
//! - `tournament_size`: Candidates sampled per tournament.
//! - `mutation_rate`: Per-category mutation probability.
//! - `mutation_scale`: Gaussian standard deviation as a fraction of the price range.
//! - `top_k`: Number of ranked candidates to return.
//! - `parallel_threshold`: Minimum population size for parallel fitness evaluation.
//! - `retain_incumbent`: Merge the best-ever candidate into the returned ranking.
//!
//! ### `LogLevel`
//!
//! - `Verbose`: Per-generation summary plus every scored candidate.
//! - `Minimal`: Per-generation summary.
//! - `None`: Disables logging.

use crate::error::{AllocationError, Result};

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum LogLevel {
    Verbose,
    Minimal,
    None,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct EvolutionOptions {
    num_generations: usize,
    log_level: LogLevel,
    population_size: usize,
    tournament_size: usize,
    mutation_rate: f64,
    mutation_scale: f64,
    top_k: usize,
    /// Minimum number of items to process in parallel
    parallel_threshold: usize,
    retain_incumbent: bool,
}

impl EvolutionOptions {
    /// Creates options with the given generation count and population size and
    /// defaults for everything else.
    pub fn new(num_generations: usize, log_level: LogLevel, population_size: usize) -> Self {
        Self {
            num_generations,
            log_level,
            population_size,
            ..Self::default()
        }
    }

    /// Checks that the options describe a runnable search.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameters` if the population has fewer than 4
    /// candidates, there are no generations, the tournament is empty or larger
    /// than the population, the mutation rate is outside `[0, 1]`, the mutation
    /// scale is negative or `top_k` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 4 {
            return Err(AllocationError::InvalidParameters(format!(
                "Population size must be at least 4, got {}",
                self.population_size
            )));
        }
        if self.num_generations == 0 {
            return Err(AllocationError::InvalidParameters(
                "Number of generations cannot be zero".to_string(),
            ));
        }
        if self.tournament_size == 0 || self.tournament_size > self.population_size {
            return Err(AllocationError::InvalidParameters(format!(
                "Tournament size must be between 1 and the population size ({}), got {}",
                self.population_size, self.tournament_size
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(AllocationError::InvalidParameters(format!(
                "Mutation rate must be within [0, 1], got {}",
                self.mutation_rate
            )));
        }
        if !self.mutation_scale.is_finite() || self.mutation_scale < 0.0 {
            return Err(AllocationError::InvalidParameters(format!(
                "Mutation scale must be a non-negative number, got {}",
                self.mutation_scale
            )));
        }
        if self.top_k == 0 {
            return Err(AllocationError::InvalidParameters(
                "top_k cannot be zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn get_num_generations(&self) -> usize {
        self.num_generations
    }

    pub fn get_log_level(&self) -> &LogLevel {
        &self.log_level
    }

    pub fn get_population_size(&self) -> usize {
        self.population_size
    }

    pub fn get_tournament_size(&self) -> usize {
        self.tournament_size
    }

    pub fn get_mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    pub fn get_mutation_scale(&self) -> f64 {
        self.mutation_scale
    }

    pub fn get_top_k(&self) -> usize {
        self.top_k
    }

    /// Returns the minimum number of items to process in parallel.
    pub fn get_parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    pub fn get_retain_incumbent(&self) -> bool {
        self.retain_incumbent
    }

    /// Returns a builder for creating an `EvolutionOptions` instance.
    ///
    /// # Example
    ///
    /// ```rust
    /// use budget_ga::evolution::options::{EvolutionOptions, LogLevel};
    ///
    /// let options = EvolutionOptions::builder()
    ///     .num_generations(200)
    ///     .log_level(LogLevel::Minimal)
    ///     .population_size(50)
    ///     .mutation_rate(0.3)
    ///     .retain_incumbent(true)
    ///     .build();
    /// assert!(options.get_retain_incumbent());
    /// ```
    pub fn builder() -> EvolutionOptionsBuilder {
        EvolutionOptionsBuilder::default()
    }
}

impl Default for EvolutionOptions {
    fn default() -> Self {
        Self {
            num_generations: 100,
            log_level: LogLevel::None,
            population_size: 50,
            tournament_size: 3,
            mutation_rate: 0.2,
            mutation_scale: 0.1,
            top_k: 5,
            parallel_threshold: 1000, // Default parallel threshold
            retain_incumbent: false,
        }
    }
}

/// Builder for `EvolutionOptions`.
///
/// Provides a fluent interface for constructing `EvolutionOptions` instances.
/// Unset fields take the `EvolutionOptions::default()` values.
#[derive(Debug, Clone, Default)]
pub struct EvolutionOptionsBuilder {
    num_generations: Option<usize>,
    log_level: Option<LogLevel>,
    population_size: Option<usize>,
    tournament_size: Option<usize>,
    mutation_rate: Option<f64>,
    mutation_scale: Option<f64>,
    top_k: Option<usize>,
    parallel_threshold: Option<usize>,
    retain_incumbent: Option<bool>,
}

impl EvolutionOptionsBuilder {
    pub fn num_generations(mut self, value: usize) -> Self {
        self.num_generations = Some(value);
        self
    }

    pub fn log_level(mut self, value: LogLevel) -> Self {
        self.log_level = Some(value);
        self
    }

    pub fn population_size(mut self, value: usize) -> Self {
        self.population_size = Some(value);
        self
    }

    pub fn tournament_size(mut self, value: usize) -> Self {
        self.tournament_size = Some(value);
        self
    }

    pub fn mutation_rate(mut self, value: f64) -> Self {
        self.mutation_rate = Some(value);
        self
    }

    pub fn mutation_scale(mut self, value: f64) -> Self {
        self.mutation_scale = Some(value);
        self
    }

    pub fn top_k(mut self, value: usize) -> Self {
        self.top_k = Some(value);
        self
    }

    pub fn parallel_threshold(mut self, value: usize) -> Self {
        self.parallel_threshold = Some(value);
        self
    }

    pub fn retain_incumbent(mut self, value: bool) -> Self {
        self.retain_incumbent = Some(value);
        self
    }

    /// Builds the `EvolutionOptions` instance.
    pub fn build(self) -> EvolutionOptions {
        let defaults = EvolutionOptions::default();
        EvolutionOptions {
            num_generations: self.num_generations.unwrap_or(defaults.num_generations),
            log_level: self.log_level.unwrap_or(defaults.log_level),
            population_size: self.population_size.unwrap_or(defaults.population_size),
            tournament_size: self.tournament_size.unwrap_or(defaults.tournament_size),
            mutation_rate: self.mutation_rate.unwrap_or(defaults.mutation_rate),
            mutation_scale: self.mutation_scale.unwrap_or(defaults.mutation_scale),
            top_k: self.top_k.unwrap_or(defaults.top_k),
            parallel_threshold: self
                .parallel_threshold
                .unwrap_or(defaults.parallel_threshold),
            retain_incumbent: self.retain_incumbent.unwrap_or(defaults.retain_incumbent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let options = EvolutionOptions::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.get_num_generations(), 100);
        assert_eq!(options.get_tournament_size(), 3);
        assert_eq!(options.get_top_k(), 5);
        assert!(!options.get_retain_incumbent());
    }

    #[test]
    fn test_builder_overrides() {
        let options = EvolutionOptions::builder()
            .population_size(10)
            .mutation_scale(0.05)
            .top_k(2)
            .build();

        assert_eq!(options.get_population_size(), 10);
        assert_eq!(options.get_mutation_scale(), 0.05);
        assert_eq!(options.get_top_k(), 2);
        assert_eq!(options.get_mutation_rate(), 0.2);
    }

    #[test]
    fn test_invalid_options() {
        let too_small = EvolutionOptions::new(100, LogLevel::None, 3);
        match too_small.validate() {
            Err(AllocationError::InvalidParameters(msg)) => {
                assert!(msg.contains("at least 4"));
            }
            other => panic!("Expected InvalidParameters, got {:?}", other),
        }

        assert!(EvolutionOptions::new(0, LogLevel::None, 50).validate().is_err());
        assert!(EvolutionOptions::builder()
            .tournament_size(0)
            .build()
            .validate()
            .is_err());
        assert!(EvolutionOptions::builder()
            .population_size(4)
            .tournament_size(5)
            .build()
            .validate()
            .is_err());
        assert!(EvolutionOptions::builder()
            .mutation_rate(1.5)
            .build()
            .validate()
            .is_err());
        assert!(EvolutionOptions::builder()
            .mutation_scale(-0.1)
            .build()
            .validate()
            .is_err());
        assert!(EvolutionOptions::builder().top_k(0).build().validate().is_err());
    }
}
