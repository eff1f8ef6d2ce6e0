//! # Bundle Assembly
//!
//! Turns a candidate allocation into concrete products: for each funded
//! category, the catalog product whose price is closest to the allocated amount,
//! optionally restricted to a set of colors.

use std::collections::{BTreeMap, HashMap};

use crate::{candidate::Candidate, catalog::ProductRow};

/// The products chosen for one candidate.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bundle {
    /// Chosen product per category.
    pub items: BTreeMap<String, ProductRow>,
    /// Funded categories for which no product matched the filters.
    pub unmatched: Vec<String>,
}

impl Bundle {
    pub fn total_price(&self) -> f64 {
        self.items.values().map(|p| p.price).sum()
    }
}

/// Picks one product per funded category of `candidate`.
///
/// Categories with a zero allocation are skipped. When `color_filters` has an
/// entry for a category, only products of those colors are considered. Ties in
/// price distance go to the product listed first.
pub fn assemble_bundle(
    candidate: &Candidate,
    products: &[ProductRow],
    color_filters: &HashMap<String, Vec<String>>,
) -> Bundle {
    let mut bundle = Bundle::default();

    let funded = candidate
        .mandatory_allocation()
        .iter()
        .chain(candidate.optional_allocation())
        .filter(|(_, &amount)| amount > 0.0);

    for (category, &amount) in funded {
        let colors = color_filters.get(category);
        let closest = products
            .iter()
            .filter(|p| &p.category == category)
            .filter(|p| colors.map_or(true, |colors| colors.contains(&p.color)))
            .fold(None, |best: Option<&ProductRow>, product| match best {
                Some(b) if (b.price - amount).abs() <= (product.price - amount).abs() => best,
                _ => Some(product),
            });

        match closest {
            Some(product) => {
                bundle.items.insert(category.clone(), product.clone());
            }
            None => bundle.unmatched.push(category.clone()),
        }
    }

    bundle
}
