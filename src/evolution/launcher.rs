use tracing::{debug, info};

use super::{
    challenge::Challenge,
    options::{EvolutionOptions, LogLevel},
};
use crate::{
    breeding::BreedStrategy,
    candidate::Candidate,
    error::{AllocationError, OptionExt, Result},
    problem::AllocationProblem,
    rng::RandomNumberGenerator,
    selection::SelectionStrategy,
};
use rayon::prelude::*;

/// A candidate together with its fitness.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    /// Lower is better.
    pub fitness: f64,
}

/// Outcome of an evolution run.
#[derive(Debug, Clone)]
pub struct EvolutionResult {
    /// Up to `top_k` candidates, best first.
    pub ranked: Vec<ScoredCandidate>,
    /// Best candidate seen in any generation.
    pub incumbent: ScoredCandidate,
    /// Incumbent fitness after each evaluated population, in order.
    pub incumbent_history: Vec<f64>,
}

impl EvolutionResult {
    /// The ranked candidates without their scores.
    pub fn candidates(&self) -> Vec<Candidate> {
        self.ranked.iter().map(|s| s.candidate.clone()).collect()
    }

    pub fn best(&self) -> Option<&ScoredCandidate> {
        self.ranked.first()
    }
}

/// Runs the generational loop with a breeding strategy, a selection strategy
/// and a challenge.
#[derive(Debug, Clone)]
pub struct EvolutionLauncher<Strategy, Selection, Chall>
where
    Strategy: BreedStrategy,
    Selection: SelectionStrategy,
    Chall: Challenge,
{
    strategy: Strategy,
    selection: Selection,
    challenge: Chall,
}

impl<Strategy, Selection, Chall> EvolutionLauncher<Strategy, Selection, Chall>
where
    Strategy: BreedStrategy,
    Selection: SelectionStrategy,
    Chall: Challenge,
{
    pub fn new(strategy: Strategy, selection: Selection, challenge: Chall) -> Self {
        Self {
            strategy,
            selection,
            challenge,
        }
    }

    /// Evolves a random initial population for `options.get_num_generations()`
    /// generations with full generational replacement.
    ///
    /// Every generation the population is scored, the incumbent is replaced when
    /// a candidate is strictly better, and a new population of the same size is
    /// bred pair by pair from tournament winners. The last pair is truncated
    /// when the population size is odd.
    ///
    /// After the loop the final population is scored and stable-sorted, and the
    /// first `top_k` candidates are returned. With `retain_incumbent`, the
    /// incumbent is merged into that ranking if it beats its last entry and is
    /// not already in it.
    ///
    /// # Errors
    ///
    /// - `InvalidParameters` if the options are invalid.
    /// - `FitnessCalculation` if the challenge returns a non-finite score.
    /// - Any error raised by the breeding or selection strategy.
    ///
    /// # Performance
    ///
    /// Fitness evaluation runs on rayon's thread pool once the population
    /// reaches `options.get_parallel_threshold()`. Scoring draws no random
    /// numbers, so the result is the same either way.
    pub fn evolve(
        &self,
        problem: &AllocationProblem,
        options: &EvolutionOptions,
        rng: &mut RandomNumberGenerator,
    ) -> Result<EvolutionResult> {
        options.validate()?;
        let population_size = options.get_population_size();

        let mut population: Vec<Candidate> = (0..population_size)
            .map(|_| Candidate::random(problem, rng))
            .collect::<Result<_>>()?;

        let mut incumbent: Option<ScoredCandidate> = None;
        let mut incumbent_history = Vec::with_capacity(options.get_num_generations() + 1);

        for generation in 0..options.get_num_generations() {
            let fitness = self.evaluate(&population, options)?;
            let best_idx = argmin(&fitness).ok_or_else_alloc(|| AllocationError::EmptyPopulation)?;
            update_incumbent(&mut incumbent, &population[best_idx], fitness[best_idx]);

            let incumbent_fitness = incumbent.as_ref().map_or(f64::INFINITY, |i| i.fitness);
            incumbent_history.push(incumbent_fitness);

            match options.get_log_level() {
                LogLevel::Minimal => info!(
                    generation,
                    best = fitness[best_idx],
                    incumbent = incumbent_fitness,
                    "generation evaluated"
                ),
                LogLevel::Verbose => {
                    info!(
                        generation,
                        best = fitness[best_idx],
                        incumbent = incumbent_fitness,
                        "generation evaluated"
                    );
                    population.iter().zip(&fitness).for_each(|(candidate, score)| {
                        debug!(generation, fitness = score, ?candidate, "candidate");
                    });
                }
                LogLevel::None => {}
            }

            let mut next_population = Vec::with_capacity(population_size);
            while next_population.len() < population_size {
                let parent1 = &population[self.selection.select(&fitness, rng)?];
                let parent2 = &population[self.selection.select(&fitness, rng)?];
                let (child1, child2) = self.strategy.breed(parent1, parent2, problem, rng)?;

                next_population.push(child1);
                if next_population.len() < population_size {
                    next_population.push(child2);
                }
            }
            population = next_population;
        }

        let fitness = self.evaluate(&population, options)?;
        let mut scored: Vec<ScoredCandidate> = population
            .into_iter()
            .zip(fitness)
            .map(|(candidate, fitness)| ScoredCandidate { candidate, fitness })
            .collect();
        sort_by_fitness(&mut scored);

        let best = scored.first().ok_or_else_alloc(|| AllocationError::EmptyPopulation)?;
        update_incumbent(&mut incumbent, &best.candidate, best.fitness);
        let incumbent = incumbent.ok_or_else_alloc(|| {
            AllocationError::Other("Evolution completed but no incumbent was recorded".to_string())
        })?;
        incumbent_history.push(incumbent.fitness);

        scored.truncate(options.get_top_k().min(population_size));
        if options.get_retain_incumbent() {
            merge_incumbent(&mut scored, &incumbent);
        }

        if *options.get_log_level() != LogLevel::None {
            info!(
                best = scored.first().map(|s| s.fitness),
                incumbent = incumbent.fitness,
                returned = scored.len(),
                "evolution finished"
            );
        }

        Ok(EvolutionResult {
            ranked: scored,
            incumbent,
            incumbent_history,
        })
    }

    /// Scores every candidate, in population order.
    fn evaluate(&self, population: &[Candidate], options: &EvolutionOptions) -> Result<Vec<f64>> {
        let score = |candidate: &Candidate| {
            let value = self.challenge.score(candidate);
            if !value.is_finite() {
                return Err(AllocationError::FitnessCalculation(format!(
                    "Non-finite fitness score encountered: {}",
                    value
                )));
            }
            Ok(value)
        };

        if population.len() >= options.get_parallel_threshold() {
            population.par_iter().map(score).collect()
        } else {
            population.iter().map(score).collect()
        }
    }
}

/// Stable ascending sort; equal fitness keeps population order.
pub fn sort_by_fitness(scored: &mut [ScoredCandidate]) {
    scored.sort_by(|a, b| a.fitness.total_cmp(&b.fitness));
}

fn argmin(fitness: &[f64]) -> Option<usize> {
    fitness
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (idx, &score)| match best {
            Some((_, best_score)) if score >= best_score => best,
            _ => Some((idx, score)),
        })
        .map(|(idx, _)| idx)
}

fn update_incumbent(incumbent: &mut Option<ScoredCandidate>, candidate: &Candidate, fitness: f64) {
    let improves = incumbent.as_ref().map_or(true, |current| fitness < current.fitness);
    if improves {
        *incumbent = Some(ScoredCandidate {
            candidate: candidate.clone(),
            fitness,
        });
    }
}

fn merge_incumbent(ranked: &mut Vec<ScoredCandidate>, incumbent: &ScoredCandidate) {
    if ranked.iter().any(|s| s.candidate == incumbent.candidate) {
        return;
    }
    let beats_last = ranked
        .last()
        .map_or(true, |last| incumbent.fitness < last.fitness);
    if !beats_last {
        return;
    }

    let capacity = ranked.len();
    let position = ranked.partition_point(|s| s.fitness <= incumbent.fitness);
    ranked.insert(position, incumbent.clone());
    ranked.truncate(capacity);
}
