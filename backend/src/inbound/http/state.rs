//! Shared HTTP adapter state.
//!
//! Handlers receive this bundle through `web::Data` and depend only on the
//! driving ports, so they can be exercised with mocks and no I/O.

use std::sync::Arc;

use crate::domain::ports::{
    IngredientRepository, IngredientsQuery, RecipeMarkRepository, RecipeMarksCommand,
    RecipeRepository, RecipesCommand, RecipesQuery, ShoppingListQuery, SubscriptionRepository,
    SubscriptionsCommand, SubscriptionsQuery, TagRepository, TagsQuery, UserRepository,
    UsersQuery,
};
use crate::domain::{
    CatalogueService, RecipeLimits, RecipeMarksService, RecipeService, SubscriptionService,
    UsersService,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UsersQuery>,
    pub subscriptions: Arc<dyn SubscriptionsCommand>,
    pub subscriptions_query: Arc<dyn SubscriptionsQuery>,
    pub tags: Arc<dyn TagsQuery>,
    pub ingredients: Arc<dyn IngredientsQuery>,
    pub recipes: Arc<dyn RecipesCommand>,
    pub recipes_query: Arc<dyn RecipesQuery>,
    pub recipe_marks: Arc<dyn RecipeMarksCommand>,
    pub shopping_list: Arc<dyn ShoppingListQuery>,
}

/// Driven adapters from which the domain services are assembled.
pub struct Repositories<U, T, I, R, M, S> {
    pub users: Arc<U>,
    pub tags: Arc<T>,
    pub ingredients: Arc<I>,
    pub recipes: Arc<R>,
    pub marks: Arc<M>,
    pub subscriptions: Arc<S>,
}

impl HttpState {
    /// Wire the domain services on top of one set of repositories.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use recipebook::domain::RecipeLimits;
    /// use recipebook::inbound::http::state::{HttpState, Repositories};
    /// use recipebook::outbound::memory::InMemoryStore;
    ///
    /// let store = Arc::new(InMemoryStore::new());
    /// let state = HttpState::from_repositories(
    ///     Repositories {
    ///         users: store.clone(),
    ///         tags: store.clone(),
    ///         ingredients: store.clone(),
    ///         recipes: store.clone(),
    ///         marks: store.clone(),
    ///         subscriptions: store,
    ///     },
    ///     RecipeLimits::default(),
    /// );
    /// let _recipes = state.recipes_query.clone();
    /// ```
    pub fn from_repositories<U, T, I, R, M, S>(
        repositories: Repositories<U, T, I, R, M, S>,
        limits: RecipeLimits,
    ) -> Self
    where
        U: UserRepository + 'static,
        T: TagRepository + 'static,
        I: IngredientRepository + 'static,
        R: RecipeRepository + 'static,
        M: RecipeMarkRepository + 'static,
        S: SubscriptionRepository + 'static,
    {
        let Repositories {
            users,
            tags,
            ingredients,
            recipes,
            marks,
            subscriptions,
        } = repositories;

        let users_service = Arc::new(UsersService::new(users.clone(), subscriptions.clone()));
        let subscription_service = Arc::new(SubscriptionService::new(
            users,
            subscriptions.clone(),
            recipes.clone(),
        ));
        let catalogue = Arc::new(CatalogueService::new(tags, ingredients));
        let recipe_service = Arc::new(RecipeService::new(
            recipes.clone(),
            marks.clone(),
            subscriptions,
            limits,
        ));
        let marks_service = Arc::new(RecipeMarksService::new(recipes, marks));

        Self {
            users: users_service,
            subscriptions: subscription_service.clone(),
            subscriptions_query: subscription_service,
            tags: catalogue.clone(),
            ingredients: catalogue,
            recipes: recipe_service.clone(),
            recipes_query: recipe_service,
            recipe_marks: marks_service.clone(),
            shopping_list: marks_service,
        }
    }
}
