//! # Allocation Problem
//!
//! `AllocationRequest` is what a caller asks for: a budget, the categories that
//! must be funded and the ones that may be. `AllocationProblem` is the validated,
//! typed form of that request joined with catalog statistics. Every genetic
//! operator reads category bounds and targets from the problem, never from the
//! raw catalog.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::warn;

use crate::{
    catalog::{CatalogStatistics, PriceBounds, MAX_PRICE},
    error::{AllocationError, Result},
};

/// A caller's budget request.
///
/// `color_filters` is carried for bundle assembly and ignored by the optimizer.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllocationRequest {
    pub total_budget: f64,
    pub mandatory_categories: BTreeSet<String>,
    pub optional_categories: BTreeSet<String>,
    pub color_filters: HashMap<String, Vec<String>>,
}

impl AllocationRequest {
    pub fn new<M, O>(total_budget: f64, mandatory: M, optional: O) -> Self
    where
        M: IntoIterator,
        M::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        Self {
            total_budget,
            mandatory_categories: mandatory.into_iter().map(Into::into).collect(),
            optional_categories: optional.into_iter().map(Into::into).collect(),
            color_filters: HashMap::new(),
        }
    }

    pub fn with_color_filter(mut self, category: &str, colors: &[&str]) -> Self {
        self.color_filters.insert(
            category.to_string(),
            colors.iter().map(|c| c.to_string()).collect(),
        );
        self
    }
}

/// Target price and search range of one category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategorySpec {
    pub average_price: f64,
    pub bounds: PriceBounds,
}

/// A validated request: every category has statistics and sane bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationProblem {
    total_budget: f64,
    mandatory: BTreeMap<String, CategorySpec>,
    optional: BTreeMap<String, CategorySpec>,
}

impl AllocationProblem {
    /// Joins a request with catalog statistics.
    ///
    /// # Errors
    ///
    /// - `InvalidParameters` if the budget is negative or not finite, the
    ///   mandatory set is empty, a category is both mandatory and optional, or a
    ///   category has malformed bounds or a malformed average.
    /// - `MissingCategoryStatistics` if a category has no average or no bounds.
    pub fn new(request: &AllocationRequest, statistics: &CatalogStatistics) -> Result<Self> {
        if !request.total_budget.is_finite() || request.total_budget < 0.0 {
            warn!(budget = request.total_budget, "rejecting allocation request");
            return Err(AllocationError::InvalidParameters(format!(
                "Total budget must be a non-negative number, got {}",
                request.total_budget
            )));
        }

        if request.mandatory_categories.is_empty() {
            return Err(AllocationError::InvalidParameters(
                "At least one mandatory category is required".to_string(),
            ));
        }

        if let Some(shared) = request
            .mandatory_categories
            .intersection(&request.optional_categories)
            .next()
        {
            return Err(AllocationError::InvalidParameters(format!(
                "Category '{}' cannot be both mandatory and optional",
                shared
            )));
        }

        let mandatory = Self::collect_specs(&request.mandatory_categories, statistics)?;
        let optional = Self::collect_specs(&request.optional_categories, statistics)?;

        Ok(Self {
            total_budget: request.total_budget,
            mandatory,
            optional,
        })
    }

    fn collect_specs(
        categories: &BTreeSet<String>,
        statistics: &CatalogStatistics,
    ) -> Result<BTreeMap<String, CategorySpec>> {
        categories
            .iter()
            .map(|category| {
                let average_price = statistics.average_price(category)?;
                let bounds = statistics.price_bounds(category)?;
                bounds.validate(category)?;
                if !(0.0..=MAX_PRICE).contains(&average_price) {
                    return Err(AllocationError::InvalidParameters(format!(
                        "Average price for '{}' must be a number in [0, {}], got {}",
                        category, MAX_PRICE, average_price
                    )));
                }
                Ok((
                    category.clone(),
                    CategorySpec {
                        average_price,
                        bounds,
                    },
                ))
            })
            .collect()
    }

    pub fn total_budget(&self) -> f64 {
        self.total_budget
    }

    pub fn mandatory(&self) -> &BTreeMap<String, CategorySpec> {
        &self.mandatory
    }

    pub fn optional(&self) -> &BTreeMap<String, CategorySpec> {
        &self.optional
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statistics() -> CatalogStatistics {
        let average_price = HashMap::from([
            ("A".to_string(), 150.0),
            ("B".to_string(), 75.0),
            ("C".to_string(), 1000.0),
        ]);
        let price_bounds: HashMap<String, PriceBounds> = HashMap::from([
            ("A".to_string(), (100.0, 200.0).into()),
            ("B".to_string(), (50.0, 100.0).into()),
            ("C".to_string(), (800.0, 1200.0).into()),
        ]);
        CatalogStatistics::new(average_price, price_bounds)
    }

    #[test]
    fn test_valid_problem() {
        let request = AllocationRequest::new(250.0, ["A", "B"], ["C"]);
        let problem = AllocationProblem::new(&request, &statistics()).unwrap();

        assert_eq!(problem.total_budget(), 250.0);
        assert_eq!(problem.mandatory().len(), 2);
        assert_eq!(problem.optional()["C"].average_price, 1000.0);
    }

    #[test]
    fn test_negative_budget() {
        let request = AllocationRequest::new(-1.0, ["A"], Vec::<String>::new());
        assert!(matches!(
            AllocationProblem::new(&request, &statistics()),
            Err(AllocationError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_empty_mandatory() {
        let request = AllocationRequest::new(100.0, Vec::<String>::new(), ["C"]);
        match AllocationProblem::new(&request, &statistics()) {
            Err(AllocationError::InvalidParameters(msg)) => {
                assert!(msg.contains("mandatory"))
            }
            other => panic!("Expected InvalidParameters, got {:?}", other),
        }
    }

    #[test]
    fn test_overlapping_categories() {
        let request = AllocationRequest::new(100.0, ["A", "C"], ["C"]);
        assert!(matches!(
            AllocationProblem::new(&request, &statistics()),
            Err(AllocationError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_missing_statistics() {
        let request = AllocationRequest::new(100.0, ["A"], ["sofa"]);
        assert!(matches!(
            AllocationProblem::new(&request, &statistics()),
            Err(AllocationError::MissingCategoryStatistics(_))
        ));
    }

    #[test]
    fn test_malformed_bounds() {
        let stats = CatalogStatistics::new(
            HashMap::from([("A".to_string(), 10.0)]),
            HashMap::from([("A".to_string(), PriceBounds { min: 20.0, max: 5.0 })]),
        );
        let request = AllocationRequest::new(100.0, ["A"], Vec::<String>::new());
        assert!(matches!(
            AllocationProblem::new(&request, &stats),
            Err(AllocationError::InvalidParameters(_))
        ));
    }
}
