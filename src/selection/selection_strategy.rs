use std::fmt::Debug;

use crate::error::Result;
use crate::rng::RandomNumberGenerator;

/// Trait for parent selection.
///
/// A selection strategy picks one parent out of a scored population. It returns
/// an index into the population rather than a clone, so the caller decides
/// what to copy.
///
/// Fitness is minimized: lower scores are better.
///
/// # Examples
///
/// ```
/// use budget_ga::selection::{SelectionStrategy, TournamentSelection};
/// use budget_ga::rng::RandomNumberGenerator;
///
/// let fitness = vec![0.5, 0.8, 0.3, 0.9, 0.1];
/// let mut rng = RandomNumberGenerator::from_seed(1);
///
/// // A tournament over the whole population always finds the best.
/// let selection = TournamentSelection::new(5).unwrap();
/// assert_eq!(selection.select(&fitness, &mut rng).unwrap(), 4);
/// ```
pub trait SelectionStrategy: Debug + Send + Sync {
    /// Selects the index of one parent.
    ///
    /// # Errors
    ///
    /// Returns an error if the population is empty or the strategy cannot be
    /// applied to a population of this size.
    fn select(&self, fitness: &[f64], rng: &mut RandomNumberGenerator) -> Result<usize>;
}
