//! # AllocationOptimizer
//!
//! Entry point of the crate. Wires the uniform breeding strategy, tournament
//! selection and the budget challenge into an [`EvolutionLauncher`] and runs it
//! on a validated [`AllocationProblem`].
//!
//! ## Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use budget_ga::{catalog::PriceBounds, optimizer::optimize, rng::RandomNumberGenerator};
//!
//! let average_price = HashMap::from([("A".to_string(), 150.0), ("B".to_string(), 75.0)]);
//! let price_bounds = HashMap::from([
//!     ("A".to_string(), PriceBounds { min: 100.0, max: 200.0 }),
//!     ("B".to_string(), PriceBounds { min: 50.0, max: 100.0 }),
//! ]);
//! let mut rng = RandomNumberGenerator::from_seed(42);
//!
//! let packages = optimize(
//!     &["A", "B"],
//!     &[] as &[&str],
//!     &average_price,
//!     &price_bounds,
//!     250.0,
//!     50,
//!     100,
//!     &mut rng,
//! )
//! .unwrap();
//!
//! assert_eq!(packages.len(), 5);
//! ```

use std::collections::HashMap;

use tracing::warn;

use crate::{
    breeding::UniformBreedStrategy,
    bundle::{assemble_bundle, Bundle},
    candidate::Candidate,
    catalog::{CatalogStatistics, PriceBounds, ProductRow},
    error::Result,
    evolution::{BudgetChallenge, EvolutionLauncher, EvolutionOptions, EvolutionResult},
    problem::{AllocationProblem, AllocationRequest},
    rng::RandomNumberGenerator,
    selection::TournamentSelection,
};

pub const DEFAULT_POPULATION_SIZE: usize = 50;
pub const DEFAULT_GENERATIONS: usize = 100;

/// Genetic-algorithm budget allocator.
#[derive(Debug, Clone, Default)]
pub struct AllocationOptimizer {
    options: EvolutionOptions,
}

impl AllocationOptimizer {
    pub fn new(options: EvolutionOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EvolutionOptions {
        &self.options
    }

    /// Searches for good allocations of `request.total_budget`.
    ///
    /// Returns the ranked candidates (best first), the incumbent and its
    /// history. Over-budget results are not errors; check
    /// `total_cost()` against the budget if that matters.
    ///
    /// # Errors
    ///
    /// - `InvalidParameters` for malformed options or requests.
    /// - `MissingCategoryStatistics` if a requested category is not in
    ///   `statistics`.
    ///
    /// Nothing is searched when validation fails.
    pub fn optimize(
        &self,
        request: &AllocationRequest,
        statistics: &CatalogStatistics,
        rng: &mut RandomNumberGenerator,
    ) -> Result<EvolutionResult> {
        if let Err(e) = self.options.validate() {
            warn!(error = %e, "rejecting evolution options");
            return Err(e);
        }
        let problem = AllocationProblem::new(request, statistics)?;

        let launcher = EvolutionLauncher::new(
            UniformBreedStrategy::from_options(&self.options)?,
            TournamentSelection::new(self.options.get_tournament_size())?,
            BudgetChallenge::new(&problem),
        );
        launcher.evolve(&problem, &self.options, rng)
    }

    /// Full caller-side pipeline: budget precheck, search, bundle assembly.
    ///
    /// Category statistics are derived from `products`. One bundle is returned
    /// per ranked candidate, in the same order.
    ///
    /// # Errors
    ///
    /// Returns `InfeasibleBudget` without searching when the mandatory
    /// categories' minimum prices exceed the budget, plus every error of
    /// [`AllocationOptimizer::optimize`].
    pub fn plan(
        &self,
        request: &AllocationRequest,
        products: &[ProductRow],
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<(Candidate, Bundle)>> {
        let statistics = CatalogStatistics::from_products(products)?;
        let mandatory: Vec<&str> = request
            .mandatory_categories
            .iter()
            .map(String::as_str)
            .collect();
        statistics.check_budget(&mandatory, request.total_budget)?;

        let result = self.optimize(request, &statistics, rng)?;
        Ok(result
            .ranked
            .into_iter()
            .map(|scored| {
                let bundle = assemble_bundle(&scored.candidate, products, &request.color_filters);
                (scored.candidate, bundle)
            })
            .collect())
    }
}

/// Runs the optimizer with default tuning and returns up to 5 candidates,
/// best first.
///
/// Categories are given as two disjoint sets; `average_price` and
/// `price_bounds` must cover all of them.
#[allow(clippy::too_many_arguments)]
pub fn optimize<M, O>(
    mandatory_categories: &[M],
    optional_categories: &[O],
    average_price: &HashMap<String, f64>,
    price_bounds: &HashMap<String, PriceBounds>,
    total_budget: f64,
    population_size: usize,
    generations: usize,
    rng: &mut RandomNumberGenerator,
) -> Result<Vec<Candidate>>
where
    M: AsRef<str>,
    O: AsRef<str>,
{
    let request = AllocationRequest::new(
        total_budget,
        mandatory_categories.iter().map(|c| c.as_ref().to_string()),
        optional_categories.iter().map(|c| c.as_ref().to_string()),
    );
    let statistics = CatalogStatistics::new(average_price.clone(), price_bounds.clone());
    let options = EvolutionOptions::builder()
        .population_size(population_size)
        .num_generations(generations)
        .build();

    let result = AllocationOptimizer::new(options).optimize(&request, &statistics, rng)?;
    Ok(result.candidates())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AllocationError;

    fn products() -> Vec<ProductRow> {
        vec![
            ProductRow::new("sofa", 25000.0, "Beige", "Loft"),
            ProductRow::new("sofa", 40000.0, "Gray", "Harbor"),
            ProductRow::new("curtains", 139.0, "Beige", "Sheer"),
            ProductRow::new("curtains", 1970.0, "Navy", "Blackout"),
            ProductRow::new("painting", 79.0, "Red", "Sketch"),
            ProductRow::new("painting", 2700.0, "Blue", "Dawn"),
        ]
    }

    #[test]
    fn test_plan_produces_bundles() {
        let request = AllocationRequest::new(45000.0, ["sofa", "curtains"], ["painting"])
            .with_color_filter("sofa", &["Gray"]);
        let optimizer = AllocationOptimizer::default();
        let mut rng = RandomNumberGenerator::from_seed(12);

        let plans = optimizer.plan(&request, &products(), &mut rng).unwrap();
        assert_eq!(plans.len(), 5);
        for (candidate, bundle) in &plans {
            assert_eq!(bundle.items["sofa"].name, "Harbor");
            assert!(bundle.items.contains_key("curtains"));
            assert_eq!(
                bundle.items.contains_key("painting"),
                candidate.allocation("painting").unwrap() > 0.0
            );
        }
    }

    #[test]
    fn test_plan_refuses_infeasible_budget() {
        let request = AllocationRequest::new(20000.0, ["sofa", "curtains"], ["painting"]);
        let optimizer = AllocationOptimizer::default();
        let mut rng = RandomNumberGenerator::from_seed(12);

        match optimizer.plan(&request, &products(), &mut rng) {
            Err(AllocationError::InfeasibleBudget { required, budget }) => {
                assert_eq!(required, 25139.0);
                assert_eq!(budget, 20000.0);
            }
            other => panic!("Expected InfeasibleBudget, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_generations() {
        let average_price = HashMap::from([("A".to_string(), 150.0)]);
        let price_bounds = HashMap::from([(
            "A".to_string(),
            PriceBounds {
                min: 100.0,
                max: 200.0,
            },
        )]);
        let mut rng = RandomNumberGenerator::from_seed(1);

        let result = optimize(
            &["A"],
            &[] as &[&str],
            &average_price,
            &price_bounds,
            250.0,
            50,
            0,
            &mut rng,
        );
        assert!(matches!(result, Err(AllocationError::InvalidParameters(_))));
    }
}
