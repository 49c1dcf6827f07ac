//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations under `backend/migrations`
//! exactly. Regenerate with `diesel print-schema` after schema changes.

diesel::table! {
    /// Accounts provisioned by the authentication service.
    users (id) {
        id -> Int4,
        username -> Varchar,
        email -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
    }
}

diesel::table! {
    /// Curated recipe tags. `name`, `color` and `slug` are each unique.
    tags (id) {
        id -> Int4,
        name -> Varchar,
        /// `#RRGGBB` hex colour.
        color -> Varchar,
        slug -> Varchar,
    }
}

diesel::table! {
    /// Ingredients, unique per `(name, measurement_unit)`.
    ingredients (id) {
        id -> Int4,
        name -> Varchar,
        measurement_unit -> Varchar,
    }
}

diesel::table! {
    /// Published recipes.
    recipes (id) {
        id -> Int4,
        author_id -> Int4,
        name -> Varchar,
        /// Opaque reference returned by image storage.
        image -> Text,
        text -> Text,
        /// Minutes, at least one.
        cooking_time -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Ingredient lines, unique per `(recipe_id, ingredient_id)`.
    recipe_ingredients (id) {
        id -> Int4,
        recipe_id -> Int4,
        ingredient_id -> Int4,
        amount -> Int4,
    }
}

diesel::table! {
    /// Tag lines, unique per `(recipe_id, tag_id)`.
    recipe_tags (id) {
        id -> Int4,
        recipe_id -> Int4,
        tag_id -> Int4,
    }
}

diesel::table! {
    /// Favourite recipes, unique per `(user_id, recipe_id)`.
    favorites (id) {
        id -> Int4,
        user_id -> Int4,
        recipe_id -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Shopping-cart entries, unique per `(user_id, recipe_id)`.
    shopping_cart_entries (id) {
        id -> Int4,
        user_id -> Int4,
        recipe_id -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Follower to author relation; a user cannot follow themselves.
    subscriptions (id) {
        id -> Int4,
        follower_id -> Int4,
        author_id -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(recipes -> users (author_id));
diesel::joinable!(recipe_ingredients -> recipes (recipe_id));
diesel::joinable!(recipe_ingredients -> ingredients (ingredient_id));
diesel::joinable!(recipe_tags -> recipes (recipe_id));
diesel::joinable!(recipe_tags -> tags (tag_id));
diesel::joinable!(favorites -> recipes (recipe_id));
diesel::joinable!(shopping_cart_entries -> recipes (recipe_id));
diesel::joinable!(subscriptions -> users (author_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    tags,
    ingredients,
    recipes,
    recipe_ingredients,
    recipe_tags,
    favorites,
    shopping_cart_entries,
    subscriptions,
);
