//! # Catalog Statistics
//!
//! Per-category price statistics consumed by the optimizer: the average price
//! (the fitness target) and the `(min, max)` price bounds (the search range).
//!
//! Statistics are either supplied directly or derived from raw product rows with
//! [`CatalogStatistics::from_products`]. Filling in defaults for categories that
//! have no rows is the caller's job ([`CatalogStatistics::with_defaults`]); the
//! optimizer never guesses.
//!
//! ## Example
//!
//! ```rust
//! use budget_ga::catalog::{CatalogStatistics, ProductRow};
//!
//! let rows = vec![
//!     ProductRow::new("sofa", 30000.0, "Beige", "Loft"),
//!     ProductRow::new("sofa", 50000.0, "Gray", "Harbor"),
//! ];
//! let stats = CatalogStatistics::from_products(&rows).unwrap();
//!
//! assert_eq!(stats.average_price("sofa").unwrap(), 40000.0);
//! assert_eq!(stats.price_bounds("sofa").unwrap().min, 30000.0);
//! ```

use std::collections::HashMap;

use crate::error::{AllocationError, OptionExt, Result};

/// Largest price accepted in bounds and averages.
///
/// Keeps squared deviations and over-budget penalties finite.
pub const MAX_PRICE: f64 = 1e12;

/// Inclusive price range observed for a category.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBounds {
    pub min: f64,
    pub max: f64,
}

impl PriceBounds {
    /// Creates validated bounds.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameters` if either end is negative or not finite, if
    /// `min > max`, or if `max` exceeds [`MAX_PRICE`].
    pub fn new(min: f64, max: f64) -> Result<Self> {
        let bounds = Self { min, max };
        bounds.validate("<unnamed>")?;
        Ok(bounds)
    }

    /// Width of the range.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub(crate) fn validate(&self, category: &str) -> Result<()> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min < 0.0 || self.min > self.max
        {
            return Err(AllocationError::InvalidParameters(format!(
                "Price bounds for '{}' must satisfy 0 <= min <= max, got ({}, {})",
                category, self.min, self.max
            )));
        }
        if self.max > MAX_PRICE {
            return Err(AllocationError::InvalidParameters(format!(
                "Price bounds for '{}' exceed the supported maximum {}, got ({}, {})",
                category, MAX_PRICE, self.min, self.max
            )));
        }
        Ok(())
    }
}

impl From<(f64, f64)> for PriceBounds {
    fn from((min, max): (f64, f64)) -> Self {
        Self { min, max }
    }
}

/// One product of the catalog.
///
/// Only `category` and `price` feed the statistics; the rest is carried for
/// bundle assembly.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRow {
    pub category: String,
    pub price: f64,
    pub color: String,
    pub name: String,
    pub image_url: String,
    pub product_url: String,
    pub description: String,
}

impl ProductRow {
    pub fn new(category: &str, price: f64, color: &str, name: &str) -> Self {
        Self {
            category: category.to_string(),
            price,
            color: color.to_string(),
            name: name.to_string(),
            image_url: String::new(),
            product_url: String::new(),
            description: String::new(),
        }
    }
}

/// Read-only average price and price bounds per category.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogStatistics {
    average_price: HashMap<String, f64>,
    price_bounds: HashMap<String, PriceBounds>,
}

impl CatalogStatistics {
    /// Wraps explicitly supplied statistics.
    ///
    /// The maps are not required to cover the same categories; lookups of a
    /// category missing from either map fail with `MissingCategoryStatistics`.
    pub fn new(
        average_price: HashMap<String, f64>,
        price_bounds: HashMap<String, PriceBounds>,
    ) -> Self {
        Self {
            average_price,
            price_bounds,
        }
    }

    /// Derives mean, minimum and maximum price per category.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameters` if any row has a negative or non-finite price.
    pub fn from_products(products: &[ProductRow]) -> Result<Self> {
        // category -> (sum, count, min, max)
        let mut acc: HashMap<&str, (f64, usize, f64, f64)> = HashMap::new();

        for product in products {
            if !product.price.is_finite() || product.price < 0.0 {
                return Err(AllocationError::InvalidParameters(format!(
                    "Product '{}' in '{}' has invalid price {}",
                    product.name, product.category, product.price
                )));
            }
            let entry = acc
                .entry(product.category.as_str())
                .or_insert((0.0, 0, f64::INFINITY, f64::NEG_INFINITY));
            entry.0 += product.price;
            entry.1 += 1;
            entry.2 = entry.2.min(product.price);
            entry.3 = entry.3.max(product.price);
        }

        let mut average_price = HashMap::with_capacity(acc.len());
        let mut price_bounds = HashMap::with_capacity(acc.len());
        for (category, (sum, count, min, max)) in acc {
            average_price.insert(category.to_string(), sum / count as f64);
            price_bounds.insert(category.to_string(), PriceBounds { min, max });
        }

        Ok(Self::new(average_price, price_bounds))
    }

    /// Fills in statistics for every listed category that has none.
    ///
    /// A missing category gets `default_price` as its average and the degenerate
    /// range `(default_price, default_price)`. Categories that already have
    /// statistics are left alone.
    pub fn with_defaults<S: AsRef<str>>(mut self, categories: &[S], default_price: f64) -> Self {
        for category in categories {
            let category = category.as_ref();
            self.average_price
                .entry(category.to_string())
                .or_insert(default_price);
            self.price_bounds
                .entry(category.to_string())
                .or_insert(PriceBounds {
                    min: default_price,
                    max: default_price,
                });
        }
        self
    }

    pub fn average_price(&self, category: &str) -> Result<f64> {
        self.average_price.get(category).copied().ok_or_else_alloc(|| {
            AllocationError::MissingCategoryStatistics(format!(
                "No average price for category '{}'",
                category
            ))
        })
    }

    pub fn price_bounds(&self, category: &str) -> Result<PriceBounds> {
        self.price_bounds.get(category).copied().ok_or_else_alloc(|| {
            AllocationError::MissingCategoryStatistics(format!(
                "No price bounds for category '{}'",
                category
            ))
        })
    }

    /// All categories that have an average price, sorted.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self.average_price.keys().map(String::as_str).collect();
        categories.sort_unstable();
        categories
    }

    /// Sum of the minimum prices of the given categories.
    pub fn minimum_required<S: AsRef<str>>(&self, categories: &[S]) -> Result<f64> {
        categories
            .iter()
            .map(|category| self.price_bounds(category.as_ref()).map(|b| b.min))
            .sum()
    }

    /// Caller-level precheck run before invoking the optimizer.
    ///
    /// # Errors
    ///
    /// Returns `InfeasibleBudget` when the mandatory categories' minimum prices
    /// add up to more than `total_budget`, and `MissingCategoryStatistics` when a
    /// category has no bounds.
    pub fn check_budget<S: AsRef<str>>(&self, mandatory: &[S], total_budget: f64) -> Result<()> {
        let required = self.minimum_required(mandatory)?;
        if required > total_budget {
            return Err(AllocationError::InfeasibleBudget {
                required,
                budget: total_budget,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<ProductRow> {
        vec![
            ProductRow::new("curtains", 139.0, "Beige", "Sheer"),
            ProductRow::new("curtains", 5990.0, "Navy", "Blackout"),
            ProductRow::new("curtains", 1781.0, "Rose", "Linen"),
            ProductRow::new("tv-stand", 1649.0, "Peach", "Low"),
        ]
    }

    #[test]
    fn test_from_products() {
        let stats = CatalogStatistics::from_products(&rows()).unwrap();

        assert!((stats.average_price("curtains").unwrap() - 2636.666).abs() < 1e-2);
        assert_eq!(
            stats.price_bounds("curtains").unwrap(),
            PriceBounds {
                min: 139.0,
                max: 5990.0
            }
        );
        assert_eq!(stats.average_price("tv-stand").unwrap(), 1649.0);
        assert_eq!(stats.categories(), vec!["curtains", "tv-stand"]);
    }

    #[test]
    fn test_from_products_rejects_negative_price() {
        let mut products = rows();
        products.push(ProductRow::new("frame", -1.0, "Black", "Broken"));

        match CatalogStatistics::from_products(&products) {
            Err(AllocationError::InvalidParameters(msg)) => assert!(msg.contains("Broken")),
            other => panic!("Expected InvalidParameters, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_category() {
        let stats = CatalogStatistics::from_products(&rows()).unwrap();

        assert!(matches!(
            stats.average_price("sofa"),
            Err(AllocationError::MissingCategoryStatistics(_))
        ));
        assert!(matches!(
            stats.price_bounds("sofa"),
            Err(AllocationError::MissingCategoryStatistics(_))
        ));
    }

    #[test]
    fn test_with_defaults_keeps_existing() {
        let stats = CatalogStatistics::from_products(&rows())
            .unwrap()
            .with_defaults(&["sofa", "curtains"], 5000.0);

        assert_eq!(stats.average_price("sofa").unwrap(), 5000.0);
        assert_eq!(stats.price_bounds("sofa").unwrap().span(), 0.0);
        assert_eq!(stats.price_bounds("curtains").unwrap().min, 139.0);
    }

    #[test]
    fn test_check_budget() {
        let stats = CatalogStatistics::from_products(&rows()).unwrap();

        assert_eq!(
            stats.minimum_required(&["curtains", "tv-stand"]).unwrap(),
            1788.0
        );
        assert!(stats.check_budget(&["curtains", "tv-stand"], 1788.0).is_ok());

        match stats.check_budget(&["curtains", "tv-stand"], 1000.0) {
            Err(AllocationError::InfeasibleBudget { required, budget }) => {
                assert_eq!(required, 1788.0);
                assert_eq!(budget, 1000.0);
            }
            other => panic!("Expected InfeasibleBudget, got {:?}", other),
        }
    }

    #[test]
    fn test_price_bounds_validation() {
        assert!(PriceBounds::new(10.0, 5.0).is_err());
        assert!(PriceBounds::new(-1.0, 5.0).is_err());
        assert!(PriceBounds::new(0.0, f64::NAN).is_err());

        let bounds = PriceBounds::new(50.0, 100.0).unwrap();
        assert!(bounds.contains(50.0));
        assert!(!bounds.contains(100.5));
        assert_eq!(bounds.clamp(120.0), 100.0);
        assert_eq!(bounds.clamp(10.0), 50.0);
    }

    #[test]
    fn test_price_bounds_upper_limit() {
        assert!(PriceBounds::new(0.0, MAX_PRICE).is_ok());
        match PriceBounds::new(1e300, 1e301) {
            Err(AllocationError::InvalidParameters(msg)) => assert!(msg.contains("maximum")),
            other => panic!("Expected InvalidParameters, got {:?}", other),
        }
    }
}
