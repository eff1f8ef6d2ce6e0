//! # Error Types
//!
//! This module defines the error type for the budget allocation library.
//! Validation failures are reported before any search starts; the search itself
//! only fails on numerical problems.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use budget_ga::error::{AllocationError, Result};
//!
//! fn check_budget(budget: f64) -> Result<()> {
//!     if budget < 0.0 {
//!         return Err(AllocationError::InvalidParameters(
//!             "Total budget cannot be negative".to_string(),
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_budget(-1.0).is_err());
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use budget_ga::error::{AllocationError, OptionExt};
//!
//! fn cheapest(prices: &[i32]) -> budget_ga::error::Result<i32> {
//!     prices.iter().min().cloned().ok_or_else_alloc(||
//!         AllocationError::EmptyPopulation
//!     )
//! }
//! ```

use thiserror::Error;

/// Represents errors that can occur while allocating a budget.
#[derive(Error, Debug)]
pub enum AllocationError {
    /// Malformed request or options: negative budget, empty mandatory set,
    /// population too small, bounds with `min > max` and the like.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// A requested category has no average price or no price bounds.
    #[error("Missing category statistics: {0}")]
    MissingCategoryStatistics(String),

    /// The mandatory categories cannot be bought even at their minimum prices.
    ///
    /// Only the caller-level precheck returns this; the optimizer never does.
    #[error("Budget insufficient: minimum required is {required}, but total budget is {budget}")]
    InfeasibleBudget { required: f64, budget: f64 },

    /// Error that occurs when an invalid configuration is provided.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error that occurs when an empty population is encountered.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// Error that occurs when a fitness calculation fails.
    #[error("Fitness calculation error: {0}")]
    FitnessCalculation(String),

    /// Error that occurs when a random number generation fails.
    #[error("Random generation error: {0}")]
    RandomGeneration(String),

    /// An allocation lies outside its category's price range.
    #[error("Bounds error: Allocation is outside of valid bounds - {0}")]
    OutOfBounds(String),

    /// A generic error with a custom message.
    #[error("{0}")]
    Other(String),
}

/// A specialized Result type for budget allocation operations.
pub type Result<T> = std::result::Result<T, AllocationError>;

/// Extension trait for Option to convert to Result with a custom error.
///
/// ## Examples
///
/// ```rust
/// use budget_ga::error::{AllocationError, OptionExt};
///
/// let missing: Option<f64> = None;
/// let result = missing.ok_or_else_alloc(|| {
///     AllocationError::MissingCategoryStatistics("sofa".to_string())
/// });
/// assert!(result.is_err());
/// ```
pub trait OptionExt<T> {
    /// Converts an Option to a Result using a closure to generate the error.
    fn ok_or_else_alloc<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> AllocationError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_alloc<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> AllocationError,
    {
        self.ok_or_else(err_fn)
    }
}
