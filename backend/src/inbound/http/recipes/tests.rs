//! Handler tests for recipe endpoints.

use super::*;
use actix_web::http::StatusCode;
use actix_web::{App, test};
use chrono::Utc;
use mockall::predicate::{always, eq};
use serde_json::{Value, json};

use crate::domain::{
    Recipe, RecipeDraft, RecipeListQuery, RecipeSummary, RecipeView, TagSlug, UserId,
};
use crate::inbound::http::error::json_error_handler;
use crate::inbound::http::test_utils::{
    MockPorts, login_shim, sample_user, session_cookie, test_session_middleware,
};

fn sample_view(id: i32) -> RecipeView {
    RecipeView {
        recipe: Recipe {
            id: RecipeId::new(id),
            author: sample_user(1),
            name: "Pancakes".into(),
            image: "recipes/pancakes.png".into(),
            text: "Mix and fry.".into(),
            cooking_time: 20,
            tags: Vec::new(),
            ingredients: Vec::new(),
            created_at: Utc::now(),
        },
        author_is_subscribed: false,
        is_favorited: true,
        is_in_shopping_cart: false,
    }
}

fn request_body() -> Value {
    json!({
        "ingredients": [{"id": 1, "amount": 2}],
        "tags": [1],
        "image": "recipes/pancakes.png",
        "name": "Pancakes",
        "text": "Mix and fry.",
        "cooking_time": 20
    })
}

macro_rules! recipes_app {
    ($ports:expr) => {
        test::init_service(
            App::new()
                .app_data($ports.into_state())
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .wrap(test_session_middleware())
                .configure(login_shim)
                .service(
                    web::scope("/api/v1")
                        .service(list_recipes)
                        .service(create_recipe)
                        .service(get_recipe)
                        .service(update_recipe)
                        .service(delete_recipe)
                        .service(add_favorite)
                        .service(remove_favorite)
                        .service(add_to_shopping_cart)
                        .service(remove_from_shopping_cart),
                ),
        )
    };
}

#[actix_web::test]
async fn listing_passes_parsed_filters() {
    let mut ports = MockPorts::default();
    let expected = RecipeListQuery {
        author: Some(UserId::new(2)),
        tags: vec![
            TagSlug::new("breakfast").expect("slug"),
            TagSlug::new("lunch").expect("slug"),
        ],
        is_favorited: true,
        is_in_shopping_cart: false,
    };
    ports
        .recipes_query
        .expect_list_recipes()
        .with(eq(None), eq(expected))
        .return_once(|_, _| Ok(vec![sample_view(3)]));
    let app = recipes_app!(ports).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/recipes?tags=breakfast&tags=lunch&author=2&is_favorited=1")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body[0]["id"], 3);
    assert_eq!(body[0]["author"]["username"], "user1");
}

#[actix_web::test]
async fn create_requires_a_session() {
    let app = recipes_app!(MockPorts::default()).await;
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/recipes")
            .set_json(request_body())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn create_forwards_the_draft() {
    let mut ports = MockPorts::default();
    ports
        .recipes
        .expect_create_recipe()
        .withf(|author, draft: &RecipeDraft| {
            *author == UserId::new(1) && draft.name == "Pancakes" && draft.tags.len() == 1
        })
        .return_once(|_, _| Ok(sample_view(10)));
    let app = recipes_app!(ports).await;
    let cookie = session_cookie(&app, 1).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/recipes")
            .cookie(cookie)
            .set_json(request_body())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["id"], 10);
    assert_eq!(body["is_favorited"], true);
}

#[actix_web::test]
async fn validation_failures_surface_details() {
    let mut ports = MockPorts::default();
    ports.recipes.expect_create_recipe().return_once(|_, _| {
        Err(Error::invalid_request("a recipe needs at least one ingredient")
            .with_details(json!({"field": "ingredients", "code": "empty_ingredients"})))
    });
    let app = recipes_app!(ports).await;
    let cookie = session_cookie(&app, 1).await;

    let mut body = request_body();
    body["ingredients"] = json!([]);
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/recipes")
            .cookie(cookie)
            .set_json(body)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let value: Value = test::read_body_json(res).await;
    assert_eq!(value["details"]["code"], "empty_ingredients");
}

#[actix_web::test]
async fn missing_fields_are_invalid_json() {
    let app = recipes_app!(MockPorts::default()).await;
    let cookie = session_cookie(&app, 1).await;
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/recipes")
            .cookie(cookie)
            .set_json(json!({"name": "Pancakes"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let value: Value = test::read_body_json(res).await;
    assert_eq!(value["details"]["code"], "invalid_json");
}

#[actix_web::test]
async fn update_by_another_user_is_forbidden() {
    let mut ports = MockPorts::default();
    ports
        .recipes
        .expect_update_recipe()
        .with(eq(UserId::new(2)), eq(RecipeId::new(5)), always())
        .return_once(|_, _, _| Err(Error::forbidden("only the author may change a recipe")));
    let app = recipes_app!(ports).await;
    let cookie = session_cookie(&app, 2).await;

    let res = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri("/api/v1/recipes/5")
            .cookie(cookie)
            .set_json(request_body())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn delete_returns_no_content() {
    let mut ports = MockPorts::default();
    ports
        .recipes
        .expect_delete_recipe()
        .with(eq(UserId::new(1)), eq(RecipeId::new(5)))
        .return_once(|_, _| Ok(()));
    let app = recipes_app!(ports).await;
    let cookie = session_cookie(&app, 1).await;

    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri("/api/v1/recipes/5")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn favourite_returns_short_representation() {
    let mut ports = MockPorts::default();
    ports
        .recipe_marks
        .expect_mark_recipe()
        .with(
            eq(RecipeMark::Favorite),
            eq(UserId::new(1)),
            eq(RecipeId::new(5)),
        )
        .return_once(|_, _, _| {
            Ok(RecipeSummary {
                id: RecipeId::new(5),
                name: "Pancakes".into(),
                image: "recipes/pancakes.png".into(),
                cooking_time: 20,
            })
        });
    let app = recipes_app!(ports).await;
    let cookie = session_cookie(&app, 1).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/recipes/5/favorite")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(
        body,
        json!({"id": 5, "name": "Pancakes", "image": "recipes/pancakes.png", "cooking_time": 20})
    );
}

#[actix_web::test]
async fn cart_removal_of_absent_entry_is_not_found() {
    let mut ports = MockPorts::default();
    ports
        .recipe_marks
        .expect_unmark_recipe()
        .with(
            eq(RecipeMark::ShoppingCart),
            eq(UserId::new(1)),
            eq(RecipeId::new(5)),
        )
        .return_once(|_, _, _| Err(Error::not_found("recipe 5 is not in your shopping cart")));
    let app = recipes_app!(ports).await;
    let cookie = session_cookie(&app, 1).await;

    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri("/api/v1/recipes/5/shopping_cart")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
