//! Recipe handlers, including favourites and the shopping cart.
//!
//! ```text
//! GET    /api/v1/recipes?tags=breakfast&tags=lunch&author=2&is_favorited=1
//! POST   /api/v1/recipes
//! GET    /api/v1/recipes/{id}
//! PATCH  /api/v1/recipes/{id}
//! DELETE /api/v1/recipes/{id}
//! POST   /api/v1/recipes/{id}/favorite
//! DELETE /api/v1/recipes/{id}/shopping_cart
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};

use crate::domain::ports::RecipeMark;
use crate::domain::{Error, RecipeId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{RecipeRequest, RecipeResponse, RecipeSummaryResponse};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, parse_recipe_list_query};

fn recipe_id_from_path(raw: &str) -> Result<RecipeId, Error> {
    parse_id(FieldName::new("id"), raw)
}

/// List recipes, newest first.
///
/// `tags` may repeat and matches recipes carrying any of the slugs. The
/// `is_favorited` and `is_in_shopping_cart` flags only narrow the listing
/// for signed-in viewers.
#[utoipa::path(
    get,
    path = "/api/v1/recipes",
    params(
        ("author" = Option<i32>, Query, description = "Author id"),
        ("tags" = Option<Vec<String>>, Query, description = "Tag slug; repeatable"),
        ("is_favorited" = Option<String>, Query, description = "`1` or `true` to list favourites"),
        ("is_in_shopping_cart" = Option<String>, Query, description = "`1` or `true` to list the cart")
    ),
    responses(
        (status = 200, description = "Recipes", body = [RecipeResponse]),
        (status = 400, description = "Malformed filter", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "listRecipes"
)]
#[get("/recipes")]
pub async fn list_recipes(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<Vec<(String, String)>>,
) -> ApiResult<web::Json<Vec<RecipeResponse>>> {
    let query = parse_recipe_list_query(&params)?;
    let recipes = state
        .recipes_query
        .list_recipes(session.user_id(), query)
        .await?;
    Ok(web::Json(
        recipes.into_iter().map(RecipeResponse::from).collect(),
    ))
}

/// Publish a recipe.
#[utoipa::path(
    post,
    path = "/api/v1/recipes",
    request_body = RecipeRequest,
    responses(
        (status = 201, description = "Created", body = RecipeResponse),
        (status = 400, description = "Validation failed", body = Error),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "createRecipe"
)]
#[post("/recipes")]
pub async fn create_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<HttpResponse> {
    let author = session.require_user_id()?;
    let view = state
        .recipes
        .create_recipe(author, payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(RecipeResponse::from(view)))
}

/// One recipe.
#[utoipa::path(
    get,
    path = "/api/v1/recipes/{id}",
    params(("id" = i32, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe", body = RecipeResponse),
        (status = 404, description = "No such recipe", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "getRecipe"
)]
#[get("/recipes/{id}")]
pub async fn get_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<RecipeResponse>> {
    let id = recipe_id_from_path(&path)?;
    let view = state.recipes_query.get_recipe(session.user_id(), id).await?;
    Ok(web::Json(view.into()))
}

/// Replace a recipe's fields, ingredient lines and tags.
#[utoipa::path(
    patch,
    path = "/api/v1/recipes/{id}",
    params(("id" = i32, Path, description = "Recipe id")),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Updated", body = RecipeResponse),
        (status = 400, description = "Validation failed", body = Error),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Not the author", body = Error),
        (status = 404, description = "No such recipe", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "updateRecipe"
)]
#[patch("/recipes/{id}")]
pub async fn update_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<web::Json<RecipeResponse>> {
    let editor = session.require_user_id()?;
    let id = recipe_id_from_path(&path)?;
    let view = state
        .recipes
        .update_recipe(editor, id, payload.into_inner().into())
        .await?;
    Ok(web::Json(view.into()))
}

/// Delete a recipe together with its lines and marks.
#[utoipa::path(
    delete,
    path = "/api/v1/recipes/{id}",
    params(("id" = i32, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Not the author", body = Error),
        (status = 404, description = "No such recipe", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "deleteRecipe"
)]
#[delete("/recipes/{id}")]
pub async fn delete_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let editor = session.require_user_id()?;
    let id = recipe_id_from_path(&path)?;
    state.recipes.delete_recipe(editor, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

async fn add_mark(
    mark: RecipeMark,
    state: &HttpState,
    session: &SessionContext,
    raw_id: &str,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    let recipe = recipe_id_from_path(raw_id)?;
    let summary = state.recipe_marks.mark_recipe(mark, user, recipe).await?;
    Ok(HttpResponse::Created().json(RecipeSummaryResponse::from(summary)))
}

async fn remove_mark(
    mark: RecipeMark,
    state: &HttpState,
    session: &SessionContext,
    raw_id: &str,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    let recipe = recipe_id_from_path(raw_id)?;
    state.recipe_marks.unmark_recipe(mark, user, recipe).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Add a recipe to the viewer's favourites.
#[utoipa::path(
    post,
    path = "/api/v1/recipes/{id}/favorite",
    params(("id" = i32, Path, description = "Recipe id")),
    responses(
        (status = 201, description = "Added", body = RecipeSummaryResponse),
        (status = 401, description = "Not signed in", body = Error),
        (status = 404, description = "No such recipe", body = Error),
        (status = 409, description = "Already a favourite", body = Error)
    ),
    tags = ["favorites"],
    operation_id = "addFavorite"
)]
#[post("/recipes/{id}/favorite")]
pub async fn add_favorite(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    add_mark(RecipeMark::Favorite, &state, &session, &path).await
}

/// Remove a recipe from the viewer's favourites.
#[utoipa::path(
    delete,
    path = "/api/v1/recipes/{id}/favorite",
    params(("id" = i32, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Removed"),
        (status = 401, description = "Not signed in", body = Error),
        (status = 404, description = "No such recipe or not a favourite", body = Error)
    ),
    tags = ["favorites"],
    operation_id = "removeFavorite"
)]
#[delete("/recipes/{id}/favorite")]
pub async fn remove_favorite(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    remove_mark(RecipeMark::Favorite, &state, &session, &path).await
}

/// Put a recipe in the viewer's shopping cart.
#[utoipa::path(
    post,
    path = "/api/v1/recipes/{id}/shopping_cart",
    params(("id" = i32, Path, description = "Recipe id")),
    responses(
        (status = 201, description = "Added", body = RecipeSummaryResponse),
        (status = 401, description = "Not signed in", body = Error),
        (status = 404, description = "No such recipe", body = Error),
        (status = 409, description = "Already in the cart", body = Error)
    ),
    tags = ["shopping cart"],
    operation_id = "addToShoppingCart"
)]
#[post("/recipes/{id}/shopping_cart")]
pub async fn add_to_shopping_cart(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    add_mark(RecipeMark::ShoppingCart, &state, &session, &path).await
}

/// Take a recipe out of the viewer's shopping cart.
#[utoipa::path(
    delete,
    path = "/api/v1/recipes/{id}/shopping_cart",
    params(("id" = i32, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Removed"),
        (status = 401, description = "Not signed in", body = Error),
        (status = 404, description = "No such recipe or not in the cart", body = Error)
    ),
    tags = ["shopping cart"],
    operation_id = "removeFromShoppingCart"
)]
#[delete("/recipes/{id}/shopping_cart")]
pub async fn remove_from_shopping_cart(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    remove_mark(RecipeMark::ShoppingCart, &state, &session, &path).await
}

#[cfg(test)]
mod tests;
