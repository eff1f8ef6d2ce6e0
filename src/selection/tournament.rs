use crate::error::{AllocationError, Result};
use crate::rng::RandomNumberGenerator;
use crate::selection::selection_strategy::SelectionStrategy;

/// A selection strategy that selects individuals through tournament selection.
///
/// Each tournament samples `tournament_size` distinct individuals uniformly
/// from the whole population and returns the one with the lowest fitness. When
/// several participants share the lowest fitness, the one drawn first wins.
///
/// Tournaments are independent: winning one does not exclude an individual
/// from the next.
///
/// - Smaller tournament sizes lead to more exploration (more random selection)
/// - Larger tournament sizes lead to more exploitation (more focus on the best individuals)
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct TournamentSelection {
    tournament_size: usize,
}

impl TournamentSelection {
    /// Creates a new TournamentSelection strategy with the specified tournament size.
    ///
    /// # Errors
    ///
    /// Returns an error if `tournament_size` is 0.
    pub fn new(tournament_size: usize) -> Result<Self> {
        if tournament_size < 1 {
            return Err(AllocationError::Configuration(
                "Tournament size must be at least 1".to_string(),
            ));
        }

        Ok(Self { tournament_size })
    }

    pub fn tournament_size(&self) -> usize {
        self.tournament_size
    }
}

impl Default for TournamentSelection {
    fn default() -> Self {
        Self { tournament_size: 3 }
    }
}

impl SelectionStrategy for TournamentSelection {
    fn select(&self, fitness: &[f64], rng: &mut RandomNumberGenerator) -> Result<usize> {
        if fitness.is_empty() {
            return Err(AllocationError::EmptyPopulation);
        }

        if self.tournament_size > fitness.len() {
            return Err(AllocationError::Configuration(format!(
                "Tournament size ({}) exceeds population size ({})",
                self.tournament_size,
                fitness.len()
            )));
        }

        let participants = rng.sample_indices(fitness.len(), self.tournament_size)?;

        let mut best_idx = participants[0];
        for &idx in &participants[1..] {
            if fitness[idx] < fitness[best_idx] {
                best_idx = idx;
            }
        }

        Ok(best_idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tournament_selection() {
        let fitness = vec![0.5, 0.8, 0.3, 0.9, 0.1];
        let mut rng = RandomNumberGenerator::from_seed(42);

        let selection = TournamentSelection::default();
        for _ in 0..50 {
            let winner = selection.select(&fitness, &mut rng).unwrap();
            assert!(winner < fitness.len());
            // With 3 distinct participants out of 5, the two worst can never win.
            assert!(winner != 1 && winner != 3);
        }
    }

    #[test]
    fn test_tournament_of_one_is_random() {
        let fitness = vec![0.5, 0.8, 0.3, 0.9, 0.1];
        let mut rng = RandomNumberGenerator::from_seed(7);

        let selection = TournamentSelection::new(1).unwrap();
        let mut seen = [false; 5];
        for _ in 0..200 {
            seen[selection.select(&fitness, &mut rng).unwrap()] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_full_tournament_is_elitist() {
        let fitness = vec![4.0, 2.0, 3.0, 1.0];
        let mut rng = RandomNumberGenerator::from_seed(3);

        let selection = TournamentSelection::new(4).unwrap();
        assert_eq!(selection.select(&fitness, &mut rng).unwrap(), 3);
    }

    #[test]
    fn test_tournament_selection_empty_population() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        let result = TournamentSelection::default().select(&[], &mut rng);

        assert!(matches!(result, Err(AllocationError::EmptyPopulation)));
    }

    #[test]
    fn test_tournament_larger_than_population() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        let result = TournamentSelection::default().select(&[1.0, 2.0], &mut rng);

        assert!(result.is_err());
    }

    #[test]
    fn test_tournament_selection_invalid_size() {
        assert!(TournamentSelection::new(0).is_err());
    }

    #[test]
    fn test_seeded_selection_is_reproducible() {
        let fitness: Vec<f64> = (0..20).map(|i| ((i * 7) % 11) as f64).collect();
        let selection = TournamentSelection::default();

        let mut rng1 = RandomNumberGenerator::from_seed(99);
        let mut rng2 = RandomNumberGenerator::from_seed(99);
        let picks1: Vec<usize> = (0..30)
            .map(|_| selection.select(&fitness, &mut rng1).unwrap())
            .collect();
        let picks2: Vec<usize> = (0..30)
            .map(|_| selection.select(&fitness, &mut rng2).unwrap())
            .collect();

        assert_eq!(picks1, picks2);
    }
}
