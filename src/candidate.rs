//! # Candidate
//!
//! A `Candidate` is one individual of the genetic algorithm: a full proposal of
//! how much to spend on every category of an [`AllocationProblem`].
//!
//! Both allocations are ordered maps keyed by category, so iterating a candidate
//! always visits categories in the same order. The genetic operators rely on this
//! to consume random draws in a reproducible sequence.
//!
//! ## Invariants
//!
//! - every mandatory category has an allocation inside its price bounds;
//! - every optional category has an allocation that is either exactly `0.0`
//!   (not included) or inside its price bounds.
//!
//! [`Candidate::new`] checks these once. The operators in this crate only build
//! candidates by drawing within bounds, swapping genes between valid parents or
//! clamping, so they keep the invariants without re-validation.
//!
//! ## Example
//!
//! ```rust
//! use std::collections::{BTreeMap, HashMap};
//! use budget_ga::{
//!     candidate::Candidate,
//!     catalog::{CatalogStatistics, PriceBounds},
//!     problem::{AllocationProblem, AllocationRequest},
//! };
//!
//! let stats = CatalogStatistics::new(
//!     HashMap::from([("sofa".to_string(), 40000.0)]),
//!     HashMap::from([("sofa".to_string(), PriceBounds { min: 25000.0, max: 60000.0 })]),
//! );
//! let request = AllocationRequest::new(50000.0, ["sofa"], Vec::<String>::new());
//! let problem = AllocationProblem::new(&request, &stats).unwrap();
//!
//! let candidate = Candidate::new(
//!     &problem,
//!     BTreeMap::from([("sofa".to_string(), 41000.0)]),
//!     BTreeMap::new(),
//! )
//! .unwrap();
//! assert_eq!(candidate.total_cost(), 41000.0);
//! ```

use std::collections::BTreeMap;

use crate::{
    error::{AllocationError, Result},
    problem::{AllocationProblem, CategorySpec},
    rng::RandomNumberGenerator,
};

/// One proposed budget allocation.
///
/// With the `serde` feature, deserialization rejects negative or non-finite
/// amounts. Price bounds need a problem, so a deserialized candidate must go
/// through [`Candidate::validate`] before it is trusted.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawCandidate"))]
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    mandatory_allocation: BTreeMap<String, f64>,
    optional_allocation: BTreeMap<String, f64>,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawCandidate {
    mandatory_allocation: BTreeMap<String, f64>,
    optional_allocation: BTreeMap<String, f64>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawCandidate> for Candidate {
    type Error = AllocationError;

    fn try_from(raw: RawCandidate) -> Result<Self> {
        let amounts = raw
            .mandatory_allocation
            .iter()
            .chain(raw.optional_allocation.iter());
        for (category, &amount) in amounts {
            if !amount.is_finite() || amount < 0.0 {
                return Err(AllocationError::OutOfBounds(format!(
                    "Allocation for '{}' must be a non-negative number, got {}",
                    category, amount
                )));
            }
        }
        Ok(Self {
            mandatory_allocation: raw.mandatory_allocation,
            optional_allocation: raw.optional_allocation,
        })
    }
}

impl Candidate {
    /// Creates a candidate from explicit allocations.
    ///
    /// # Errors
    ///
    /// - `InvalidParameters` if the key sets differ from the problem's categories.
    /// - `OutOfBounds` if an allocation breaks the bounds invariant.
    pub fn new(
        problem: &AllocationProblem,
        mandatory_allocation: BTreeMap<String, f64>,
        optional_allocation: BTreeMap<String, f64>,
    ) -> Result<Self> {
        let candidate = Self {
            mandatory_allocation,
            optional_allocation,
        };
        candidate.validate(problem)?;
        Ok(candidate)
    }

    /// Draws a random candidate.
    ///
    /// Mandatory categories are drawn uniformly within their bounds. Each
    /// optional category is included with probability 0.5, in which case it is
    /// drawn the same way; otherwise it is set to `0.0`. The budget is not
    /// enforced here.
    pub fn random(problem: &AllocationProblem, rng: &mut RandomNumberGenerator) -> Result<Self> {
        let mut mandatory_allocation = BTreeMap::new();
        for (category, spec) in problem.mandatory() {
            let amount = rng.uniform_inclusive(spec.bounds.min, spec.bounds.max)?;
            mandatory_allocation.insert(category.clone(), amount);
        }

        let mut optional_allocation = BTreeMap::new();
        for (category, spec) in problem.optional() {
            let amount = if rng.coin() {
                rng.uniform_inclusive(spec.bounds.min, spec.bounds.max)?
            } else {
                0.0
            };
            optional_allocation.insert(category.clone(), amount);
        }

        Ok(Self {
            mandatory_allocation,
            optional_allocation,
        })
    }

    pub fn mandatory_allocation(&self) -> &BTreeMap<String, f64> {
        &self.mandatory_allocation
    }

    pub fn optional_allocation(&self) -> &BTreeMap<String, f64> {
        &self.optional_allocation
    }

    pub(crate) fn mandatory_allocation_mut(&mut self) -> &mut BTreeMap<String, f64> {
        &mut self.mandatory_allocation
    }

    pub(crate) fn optional_allocation_mut(&mut self) -> &mut BTreeMap<String, f64> {
        &mut self.optional_allocation
    }

    /// Allocation for a category of either kind.
    pub fn allocation(&self, category: &str) -> Option<f64> {
        self.mandatory_allocation
            .get(category)
            .or_else(|| self.optional_allocation.get(category))
            .copied()
    }

    /// Sum of every allocation, mandatory and optional.
    pub fn total_cost(&self) -> f64 {
        self.mandatory_allocation.values().sum::<f64>()
            + self.optional_allocation.values().sum::<f64>()
    }

    /// Optional categories with a non-zero allocation.
    pub fn included_optional(&self) -> impl Iterator<Item = &str> {
        self.optional_allocation
            .iter()
            .filter(|(_, &amount)| amount > 0.0)
            .map(|(category, _)| category.as_str())
    }

    /// Checks the bounds invariant against `problem`.
    pub fn validate(&self, problem: &AllocationProblem) -> Result<()> {
        check_keys(&self.mandatory_allocation, problem.mandatory(), "mandatory")?;
        check_keys(&self.optional_allocation, problem.optional(), "optional")?;

        for (category, spec) in problem.mandatory() {
            let amount = self.mandatory_allocation[category];
            if !spec.bounds.contains(amount) {
                return Err(AllocationError::OutOfBounds(format!(
                    "mandatory '{}' = {} not in [{}, {}]",
                    category, amount, spec.bounds.min, spec.bounds.max
                )));
            }
        }

        for (category, spec) in problem.optional() {
            let amount = self.optional_allocation[category];
            if amount != 0.0 && !spec.bounds.contains(amount) {
                return Err(AllocationError::OutOfBounds(format!(
                    "optional '{}' = {} is neither 0 nor in [{}, {}]",
                    category, amount, spec.bounds.min, spec.bounds.max
                )));
            }
        }

        Ok(())
    }

    /// Returns `true` if the candidate respects the bounds invariant.
    pub fn is_within_bounds(&self, problem: &AllocationProblem) -> bool {
        self.validate(problem).is_ok()
    }
}

fn check_keys(
    allocation: &BTreeMap<String, f64>,
    specs: &BTreeMap<String, CategorySpec>,
    kind: &str,
) -> Result<()> {
    if allocation.len() != specs.len() || !specs.keys().all(|k| allocation.contains_key(k)) {
        return Err(AllocationError::InvalidParameters(format!(
            "{} allocation covers {:?}, expected {:?}",
            kind,
            allocation.keys().collect::<Vec<_>>(),
            specs.keys().collect::<Vec<_>>()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::{
        catalog::{CatalogStatistics, PriceBounds},
        problem::AllocationRequest,
    };

    fn problem() -> AllocationProblem {
        let stats = CatalogStatistics::new(
            HashMap::from([
                ("A".to_string(), 150.0),
                ("B".to_string(), 75.0),
                ("C".to_string(), 1000.0),
            ]),
            HashMap::from([
                ("A".to_string(), PriceBounds { min: 100.0, max: 200.0 }),
                ("B".to_string(), PriceBounds { min: 50.0, max: 100.0 }),
                ("C".to_string(), PriceBounds { min: 800.0, max: 1200.0 }),
            ]),
        );
        let request = AllocationRequest::new(250.0, ["A", "B"], ["C"]);
        AllocationProblem::new(&request, &stats).unwrap()
    }

    fn allocation(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_total_cost() {
        let candidate = Candidate::new(
            &problem(),
            allocation(&[("A", 150.0), ("B", 75.0)]),
            allocation(&[("C", 900.0)]),
        )
        .unwrap();

        assert_eq!(candidate.total_cost(), 1125.0);
        assert_eq!(candidate.allocation("C"), Some(900.0));
        assert_eq!(candidate.included_optional().collect::<Vec<_>>(), vec!["C"]);
    }

    #[test]
    fn test_excluded_optional_is_valid() {
        let candidate = Candidate::new(
            &problem(),
            allocation(&[("A", 100.0), ("B", 100.0)]),
            allocation(&[("C", 0.0)]),
        )
        .unwrap();

        assert_eq!(candidate.included_optional().count(), 0);
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let result = Candidate::new(
            &problem(),
            allocation(&[("A", 99.0), ("B", 75.0)]),
            allocation(&[("C", 0.0)]),
        );
        assert!(matches!(result, Err(AllocationError::OutOfBounds(_))));

        let result = Candidate::new(
            &problem(),
            allocation(&[("A", 150.0), ("B", 75.0)]),
            allocation(&[("C", 10.0)]),
        );
        assert!(matches!(result, Err(AllocationError::OutOfBounds(_))));
    }

    #[test]
    fn test_wrong_keys_rejected() {
        let result = Candidate::new(
            &problem(),
            allocation(&[("A", 150.0)]),
            allocation(&[("C", 0.0)]),
        );
        assert!(matches!(result, Err(AllocationError::InvalidParameters(_))));
    }

    #[test]
    fn test_random_respects_bounds() {
        let problem = problem();
        let mut rng = RandomNumberGenerator::from_seed(5);
        let mut included = 0;

        for _ in 0..200 {
            let candidate = Candidate::random(&problem, &mut rng).unwrap();
            assert!(candidate.is_within_bounds(&problem));
            included += candidate.included_optional().count();
        }

        // Optional categories are included about half the time.
        assert!(included > 60 && included < 140, "included = {}", included);
    }
}
