//! Validation of recipe input before it reaches storage.
//!
//! Checks run in a fixed order so the reported failure is deterministic:
//! empty ingredient list, then amounts, then duplicate ingredients, then
//! duplicate tags. Field checks on the recipe itself run afterwards.

use std::collections::HashSet;

use serde_json::json;

use super::{
    Error, IngredientAmount, IngredientId, IngredientLine, RecipeComposition, RecipeDraft,
    RecipeLimits, TagId, ValidatedRecipe,
};

/// Reasons recipe input is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompositionError {
    #[error("a recipe needs at least one ingredient")]
    EmptyIngredients,
    #[error("amount {amount} for ingredient {ingredient_id} must be between {min} and {max}")]
    InvalidAmount {
        ingredient_id: IngredientId,
        amount: i64,
        min: u32,
        max: u32,
    },
    #[error("ingredient {ingredient_id} appears more than once")]
    DuplicateIngredient { ingredient_id: IngredientId },
    #[error("tag {tag_id} appears more than once")]
    DuplicateTag { tag_id: TagId },
    #[error("cooking time {value} must be between {min} and {max} minutes")]
    InvalidCookingTime { value: i64, min: u32, max: u32 },
    #[error("recipe name must not be empty")]
    EmptyName,
    #[error("recipe text must not be empty")]
    EmptyText,
}

impl CompositionError {
    /// Stable machine-readable reason.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::EmptyIngredients => "empty_ingredients",
            Self::InvalidAmount { .. } => "invalid_amount",
            Self::DuplicateIngredient { .. } => "duplicate_ingredient",
            Self::DuplicateTag { .. } => "duplicate_tag",
            Self::InvalidCookingTime { .. } => "invalid_cooking_time",
            Self::EmptyName => "empty_name",
            Self::EmptyText => "empty_text",
        }
    }

    fn field(&self) -> &'static str {
        match self {
            Self::EmptyIngredients
            | Self::InvalidAmount { .. }
            | Self::DuplicateIngredient { .. } => "ingredients",
            Self::DuplicateTag { .. } => "tags",
            Self::InvalidCookingTime { .. } => "cooking_time",
            Self::EmptyName => "name",
            Self::EmptyText => "text",
        }
    }
}

impl From<CompositionError> for Error {
    fn from(value: CompositionError) -> Self {
        Self::invalid_request(value.to_string()).with_details(json!({
            "field": value.field(),
            "code": value.reason(),
        }))
    }
}

fn check_amount(
    candidate: &IngredientAmount,
    limits: &RecipeLimits,
) -> Result<IngredientLine, CompositionError> {
    let invalid = || CompositionError::InvalidAmount {
        ingredient_id: candidate.ingredient_id,
        amount: candidate.amount,
        min: limits.min_amount,
        max: limits.max_amount,
    };
    let amount = u32::try_from(candidate.amount).map_err(|_| invalid())?;
    if !(limits.min_amount..=limits.max_amount).contains(&amount) {
        return Err(invalid());
    }
    Ok(IngredientLine {
        ingredient_id: candidate.ingredient_id,
        amount,
    })
}

/// Validate the ingredient and tag lists of a recipe.
///
/// # Examples
/// ```
/// use recipebook::domain::{
///     CompositionError, IngredientAmount, IngredientId, RecipeLimits, validate_composition,
/// };
///
/// let flour = IngredientAmount { ingredient_id: IngredientId::new(1), amount: 2 };
/// let err = validate_composition(&[flour, flour], &[], &RecipeLimits::default())
///     .expect_err("duplicate ingredient");
/// assert!(matches!(err, CompositionError::DuplicateIngredient { .. }));
/// ```
pub fn validate_composition(
    ingredients: &[IngredientAmount],
    tags: &[TagId],
    limits: &RecipeLimits,
) -> Result<RecipeComposition, CompositionError> {
    if ingredients.is_empty() {
        return Err(CompositionError::EmptyIngredients);
    }

    let lines = ingredients
        .iter()
        .map(|candidate| check_amount(candidate, limits))
        .collect::<Result<Vec<_>, _>>()?;

    let mut seen_ingredients = HashSet::with_capacity(lines.len());
    for line in &lines {
        if !seen_ingredients.insert(line.ingredient_id) {
            return Err(CompositionError::DuplicateIngredient {
                ingredient_id: line.ingredient_id,
            });
        }
    }

    let mut seen_tags = HashSet::with_capacity(tags.len());
    for tag_id in tags {
        if !seen_tags.insert(*tag_id) {
            return Err(CompositionError::DuplicateTag { tag_id: *tag_id });
        }
    }

    Ok(RecipeComposition {
        ingredients: lines,
        tags: tags.to_vec(),
    })
}

/// Validate a whole recipe draft.
pub fn validate_recipe(
    draft: RecipeDraft,
    limits: &RecipeLimits,
) -> Result<ValidatedRecipe, CompositionError> {
    let composition = validate_composition(&draft.ingredients, &draft.tags, limits)?;

    let invalid_time = || CompositionError::InvalidCookingTime {
        value: draft.cooking_time,
        min: limits.min_cooking_time,
        max: limits.max_cooking_time,
    };
    let cooking_time = u32::try_from(draft.cooking_time).map_err(|_| invalid_time())?;
    if !(limits.min_cooking_time..=limits.max_cooking_time).contains(&cooking_time) {
        return Err(invalid_time());
    }

    let name = draft.name.trim().to_owned();
    if name.is_empty() {
        return Err(CompositionError::EmptyName);
    }
    if draft.text.trim().is_empty() {
        return Err(CompositionError::EmptyText);
    }

    Ok(ValidatedRecipe {
        name,
        image: draft.image,
        text: draft.text,
        cooking_time,
        composition,
    })
}
