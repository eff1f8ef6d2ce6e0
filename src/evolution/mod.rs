pub mod challenge;
pub mod launcher;
pub mod options;

pub use challenge::{BudgetChallenge, Challenge, EXTRA_REWARD, PENALTY_FACTOR};
pub use launcher::{EvolutionLauncher, EvolutionResult, ScoredCandidate};
pub use options::{EvolutionOptions, EvolutionOptionsBuilder, LogLevel};
