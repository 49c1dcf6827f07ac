//! In-process adapter implementing every repository port.
//!
//! Used when no database is configured and by integration tests. State sits
//! behind one `tokio::sync::RwLock`, so each port call is atomic with
//! respect to the others, mirroring the per-operation transactions of the
//! PostgreSQL adapter. Uniqueness and reference checks follow the database
//! constraints in `backend/migrations`.

mod repositories;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::{
    Ingredient, IngredientId, IngredientLine, NewIngredient, NewTag, Recipe, RecipeFilter,
    RecipeId, RecipeIngredient, RecipeSummary, Tag, TagId, User, UserId,
};

/// Recipe as held by the store: references by id, resolved on read.
#[derive(Debug, Clone)]
struct StoredRecipe {
    id: RecipeId,
    author: UserId,
    name: String,
    image: String,
    text: String,
    cooking_time: u32,
    ingredients: Vec<IngredientLine>,
    tags: Vec<TagId>,
    created_at: DateTime<Utc>,
}

impl StoredRecipe {
    fn summary(&self) -> RecipeSummary {
        RecipeSummary {
            id: self.id,
            name: self.name.clone(),
            image: self.image.clone(),
            cooking_time: self.cooking_time,
        }
    }
}

#[derive(Debug)]
struct State {
    users: BTreeMap<UserId, User>,
    tags: BTreeMap<TagId, Tag>,
    ingredients: BTreeMap<IngredientId, Ingredient>,
    recipes: BTreeMap<RecipeId, StoredRecipe>,
    favorites: BTreeSet<(UserId, RecipeId)>,
    shopping_cart: BTreeSet<(UserId, RecipeId)>,
    subscriptions: BTreeSet<(UserId, UserId)>,
    next_id: i32,
}

impl Default for State {
    fn default() -> Self {
        Self {
            users: BTreeMap::new(),
            tags: BTreeMap::new(),
            ingredients: BTreeMap::new(),
            recipes: BTreeMap::new(),
            favorites: BTreeSet::new(),
            shopping_cart: BTreeSet::new(),
            subscriptions: BTreeSet::new(),
            next_id: 1,
        }
    }
}

impl State {
    /// Identifiers are shared across tables, which keeps them unique and
    /// strictly increasing in insertion order.
    fn allocate_id(&mut self) -> i32 {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    fn insert_ingredient(&mut self, candidate: &NewIngredient) -> Option<Ingredient> {
        let exists = self.ingredients.values().any(|ingredient| {
            ingredient.name == candidate.name
                && ingredient.measurement_unit == candidate.measurement_unit
        });
        if exists {
            return None;
        }
        let ingredient = Ingredient {
            id: IngredientId::new(self.allocate_id()),
            name: candidate.name.clone(),
            measurement_unit: candidate.measurement_unit.clone(),
        };
        self.ingredients.insert(ingredient.id, ingredient.clone());
        Some(ingredient)
    }

    fn insert_tag(&mut self, candidate: &NewTag) -> Option<Tag> {
        let exists = self.tags.values().any(|tag| {
            tag.name == candidate.name || tag.color == candidate.color || tag.slug == candidate.slug
        });
        if exists {
            return None;
        }
        let tag = Tag {
            id: TagId::new(self.allocate_id()),
            name: candidate.name.clone(),
            color: candidate.color.clone(),
            slug: candidate.slug.clone(),
        };
        self.tags.insert(tag.id, tag.clone());
        Some(tag)
    }

    fn matches(&self, recipe: &StoredRecipe, filter: &RecipeFilter) -> bool {
        if filter.author.is_some_and(|author| author != recipe.author) {
            return false;
        }
        if !filter.tags.is_empty() {
            let tagged = recipe.tags.iter().any(|tag_id| {
                self.tags
                    .get(tag_id)
                    .is_some_and(|tag| filter.tags.contains(&tag.slug))
            });
            if !tagged {
                return false;
            }
        }
        if let Some(user) = filter.favorited_by
            && !self.favorites.contains(&(user, recipe.id))
        {
            return false;
        }
        if let Some(user) = filter.in_shopping_cart_of
            && !self.shopping_cart.contains(&(user, recipe.id))
        {
            return false;
        }
        true
    }

    /// Resolve references, dropping any that vanished.
    fn resolve(&self, stored: &StoredRecipe) -> Option<Recipe> {
        let author = self.users.get(&stored.author)?.clone();
        let mut tags: Vec<Tag> = stored
            .tags
            .iter()
            .filter_map(|id| self.tags.get(id).cloned())
            .collect();
        tags.sort_by(|left, right| left.name.cmp(&right.name));
        let ingredients = stored
            .ingredients
            .iter()
            .filter_map(|line| {
                self.ingredients
                    .get(&line.ingredient_id)
                    .map(|ingredient| RecipeIngredient {
                        ingredient: ingredient.clone(),
                        amount: line.amount,
                    })
            })
            .collect();
        Some(Recipe {
            id: stored.id,
            author,
            name: stored.name.clone(),
            image: stored.image.clone(),
            text: stored.text.clone(),
            cooking_time: stored.cooking_time,
            tags,
            ingredients,
            created_at: stored.created_at,
        })
    }

    /// Recipes newest first, ties broken by the higher id.
    fn newest_first<'a>(
        &'a self,
        keep: impl Fn(&StoredRecipe) -> bool + 'a,
    ) -> impl Iterator<Item = &'a StoredRecipe> + 'a {
        let mut recipes: Vec<&StoredRecipe> = self.recipes.values().filter(move |r| keep(r)).collect();
        recipes.sort_by(|left, right| {
            right
                .created_at
                .cmp(&left.created_at)
                .then_with(|| right.id.cmp(&left.id))
        });
        recipes.into_iter()
    }
}

/// Shared in-memory store; clones share state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user, as the external account service would.
    pub async fn add_user(
        &self,
        username: &str,
        email: &str,
        first_name: &str,
        last_name: &str,
    ) -> User {
        let mut state = self.state.write().await;
        let user = User {
            id: UserId::new(state.allocate_id()),
            username: username.to_owned(),
            email: email.to_owned(),
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
        };
        state.users.insert(user.id, user.clone());
        user
    }

    /// Add a tag, returning the existing tag with the same slug if present.
    pub async fn add_tag(&self, tag: &NewTag) -> Option<Tag> {
        let mut state = self.state.write().await;
        if let Some(existing) = state.tags.values().find(|t| t.slug == tag.slug) {
            return Some(existing.clone());
        }
        state.insert_tag(tag)
    }

    /// Add an ingredient, returning the existing row for the same
    /// `(name, measurement_unit)` if present.
    pub async fn add_ingredient(&self, ingredient: &NewIngredient) -> Ingredient {
        let mut state = self.state.write().await;
        let existing = state
            .ingredients
            .values()
            .find(|i| {
                i.name == ingredient.name && i.measurement_unit == ingredient.measurement_unit
            })
            .cloned();
        match existing {
            Some(existing) => existing,
            None => {
                let id = IngredientId::new(state.allocate_id());
                let created = Ingredient {
                    id,
                    name: ingredient.name.clone(),
                    measurement_unit: ingredient.measurement_unit.clone(),
                };
                state.ingredients.insert(id, created.clone());
                created
            }
        }
    }
}
