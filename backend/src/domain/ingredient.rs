//! Ingredients and the name search used by recipe editors.
//!
//! Search is a case-insensitive substring match. Names that start with the
//! query rank before names that merely contain it; within each group names
//! sort alphabetically ignoring case. Listings use the same order whichever
//! store produced them.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::IngredientId;

/// A persisted ingredient.
///
/// ## Invariants
/// - `(name, measurement_unit)` is unique (enforced by storage).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub measurement_unit: String,
}

/// Validation errors for ingredient imports.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngredientValidationError {
    #[error("ingredient name must not be empty")]
    EmptyName,
    #[error("measurement unit must not be empty for {name:?}")]
    EmptyUnit { name: String },
}

/// Ingredient fields supplied before an identifier is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewIngredient {
    pub name: String,
    pub measurement_unit: String,
}

impl NewIngredient {
    /// Validate raw ingredient fields, trimming surrounding whitespace.
    pub fn try_new(
        name: impl Into<String>,
        measurement_unit: impl Into<String>,
    ) -> Result<Self, IngredientValidationError> {
        let name = name.into().trim().to_owned();
        let measurement_unit = measurement_unit.into().trim().to_owned();
        if name.is_empty() {
            return Err(IngredientValidationError::EmptyName);
        }
        if measurement_unit.is_empty() {
            return Err(IngredientValidationError::EmptyUnit { name });
        }
        Ok(Self {
            name,
            measurement_unit,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum MatchRank {
    Prefix,
    Contains,
}

fn match_rank(name: &str, needle: &str) -> Option<MatchRank> {
    let haystack = name.to_lowercase();
    if haystack.starts_with(needle) {
        Some(MatchRank::Prefix)
    } else if haystack.contains(needle) {
        Some(MatchRank::Contains)
    } else {
        None
    }
}

/// Filter and order ingredients for a free-text query.
///
/// Candidates not containing the query are dropped, so adapters may return
/// a superset. An empty query keeps everything in name order.
///
/// # Examples
/// ```
/// use recipebook::domain::{Ingredient, IngredientId, rank_ingredient_matches};
///
/// let make = |id, name: &str| Ingredient {
///     id: IngredientId::new(id),
///     name: name.to_owned(),
///     measurement_unit: "g".to_owned(),
/// };
/// let ranked = rank_ingredient_matches(
///     "salt",
///     vec![make(1, "sea salt"), make(2, "salt"), make(3, "himalayan salt")],
/// );
/// let names: Vec<_> = ranked.iter().map(|i| i.name.as_str()).collect();
/// assert_eq!(names, ["salt", "himalayan salt", "sea salt"]);
/// ```
pub fn rank_ingredient_matches(query: &str, candidates: Vec<Ingredient>) -> Vec<Ingredient> {
    let needle = query.trim().to_lowercase();
    let mut ranked: Vec<(MatchRank, Ingredient)> = candidates
        .into_iter()
        .filter_map(|ingredient| {
            match_rank(&ingredient.name, &needle).map(|rank| (rank, ingredient))
        })
        .collect();
    ranked.sort_by(|(left_rank, left), (right_rank, right)| {
        left_rank
            .cmp(right_rank)
            .then_with(|| compare_by_name(left, right))
    });
    ranked.into_iter().map(|(_, ingredient)| ingredient).collect()
}

/// Put ingredients in listing order: case-folded name, then exact name,
/// then measurement unit.
pub fn sort_ingredients(ingredients: &mut [Ingredient]) {
    ingredients.sort_by(compare_by_name);
}

fn compare_by_name(left: &Ingredient, right: &Ingredient) -> Ordering {
    left.name
        .to_lowercase()
        .cmp(&right.name.to_lowercase())
        .then_with(|| left.name.cmp(&right.name))
        .then_with(|| left.measurement_unit.cmp(&right.measurement_unit))
}
