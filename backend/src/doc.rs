//! OpenAPI documentation for the REST API.
//!
//! Swagger UI serves this document at `/docs` in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::schemas::{
    IngredientResponse, RecipeIngredientRequest, RecipeIngredientResponse, RecipeRequest,
    RecipeResponse, RecipeSummaryResponse, SubscriptionResponse, TagResponse, UserResponse,
};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie carrying the identity issued by the authentication service.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Recipebook API",
        description = "Recipes, tags, ingredients, favourites, subscriptions and shopping lists.",
        license(name = "MIT")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::subscriptions,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::subscribe,
        crate::inbound::http::users::unsubscribe,
        crate::inbound::http::tags::list_tags,
        crate::inbound::http::tags::get_tag,
        crate::inbound::http::ingredients::list_ingredients,
        crate::inbound::http::ingredients::get_ingredient,
        crate::inbound::http::recipes::list_recipes,
        crate::inbound::http::recipes::create_recipe,
        crate::inbound::http::recipes::get_recipe,
        crate::inbound::http::recipes::update_recipe,
        crate::inbound::http::recipes::delete_recipe,
        crate::inbound::http::recipes::add_favorite,
        crate::inbound::http::recipes::remove_favorite,
        crate::inbound::http::recipes::add_to_shopping_cart,
        crate::inbound::http::recipes::remove_from_shopping_cart,
        crate::inbound::http::shopping_list::download_shopping_cart,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        UserResponse,
        SubscriptionResponse,
        TagResponse,
        IngredientResponse,
        RecipeResponse,
        RecipeIngredientResponse,
        RecipeSummaryResponse,
        RecipeRequest,
        RecipeIngredientRequest,
    )),
    tags(
        (name = "users", description = "Registered users"),
        (name = "subscriptions", description = "Following authors"),
        (name = "tags", description = "Recipe tags"),
        (name = "ingredients", description = "Ingredient catalogue and search"),
        (name = "recipes", description = "Publishing and browsing recipes"),
        (name = "favorites", description = "Bookmarked recipes"),
        (name = "shopping cart", description = "Cart and shopping-list export"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    fn error_schema_uses_wire_field_names() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error = schemas.get("Error").expect("Error schema");
        assert_object_schema_has_field(error, "code");
        assert_object_schema_has_field(error, "message");
        assert_object_schema_has_field(error, "traceId");
    }

    #[rstest]
    fn recipe_schema_lists_viewer_flags() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let recipe = schemas.get("RecipeResponse").expect("RecipeResponse schema");
        assert_object_schema_has_field(recipe, "is_favorited");
        assert_object_schema_has_field(recipe, "is_in_shopping_cart");
        assert_object_schema_has_field(recipe, "cooking_time");
    }

    #[rstest]
    #[case("/api/v1/recipes/download_shopping_cart")]
    #[case("/api/v1/users/{id}/subscribe")]
    #[case("/api/v1/recipes/{id}/favorite")]
    #[case("/health/ready")]
    fn documents_endpoint(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }
}
