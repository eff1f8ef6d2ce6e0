use crate::{candidate::Candidate, problem::AllocationProblem};

/// Multiplier applied to every unit spent over budget.
pub const PENALTY_FACTOR: f64 = 1e8;

/// Flat amount subtracted for each included optional category.
pub const EXTRA_REWARD: f64 = 100.0;

/// Scores a candidate. Lower is better.
pub trait Challenge: Send + Sync {
    fn score(&self, candidate: &Candidate) -> f64;
}

/// The budget allocation fitness.
///
/// ```text
/// cost > budget        => + PENALTY_FACTOR * (cost - budget)
/// mandatory c, a       => + (a - avg[c])^2
/// optional c, a > 0    => + (a - avg[c])^2 - EXTRA_REWARD
/// ```
///
/// An optional category at `0.0` contributes nothing.
#[derive(Debug, Clone)]
pub struct BudgetChallenge<'a> {
    problem: &'a AllocationProblem,
}

impl<'a> BudgetChallenge<'a> {
    pub fn new(problem: &'a AllocationProblem) -> Self {
        Self { problem }
    }
}

impl Challenge for BudgetChallenge<'_> {
    fn score(&self, candidate: &Candidate) -> f64 {
        let mut fitness = 0.0;

        let cost = candidate.total_cost();
        let budget = self.problem.total_budget();
        if cost > budget {
            fitness += PENALTY_FACTOR * (cost - budget);
        }

        for (category, spec) in self.problem.mandatory() {
            if let Some(&amount) = candidate.mandatory_allocation().get(category) {
                fitness += (amount - spec.average_price).powi(2);
            }
        }

        for (category, spec) in self.problem.optional() {
            match candidate.optional_allocation().get(category) {
                Some(&amount) if amount > 0.0 => {
                    fitness += (amount - spec.average_price).powi(2) - EXTRA_REWARD;
                }
                _ => {}
            }
        }

        fitness
    }
}
