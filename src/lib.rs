pub mod breeding;
pub mod bundle;
pub mod candidate;
pub mod catalog;
pub mod error;
pub mod evolution;
pub mod optimizer;
pub mod problem;
pub mod rng;
pub mod selection;

// Re-export commonly used types for convenience
pub use candidate::Candidate;
pub use catalog::{CatalogStatistics, PriceBounds, ProductRow};
pub use error::{AllocationError, OptionExt, Result};
pub use optimizer::{optimize, AllocationOptimizer};
pub use problem::{AllocationProblem, AllocationRequest};
