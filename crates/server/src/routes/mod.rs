//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! # Catalog
//! GET    /api/tags                              - Tag list
//! GET    /api/tags/{id}                         - Tag detail
//! GET    /api/ingredients?name=<prefix>         - Ingredient list
//! GET    /api/ingredients/{id}                  - Ingredient detail
//!
//! # Recipes
//! GET    /api/recipes                           - Recipe list (newest first)
//! POST   /api/recipes                           - Create recipe (auth)
//! GET    /api/recipes/{id}                      - Recipe detail
//! PATCH  /api/recipes/{id}                      - Replace recipe (author or admin)
//! DELETE /api/recipes/{id}                      - Delete recipe (author or admin)
//! POST   /api/recipes/{id}/favorite             - Add to favorites (auth)
//! DELETE /api/recipes/{id}/favorite             - Remove from favorites (auth)
//! POST   /api/recipes/{id}/shopping_cart        - Add to shopping cart (auth)
//! DELETE /api/recipes/{id}/shopping_cart        - Remove from shopping cart (auth)
//! GET    /api/recipes/download_shopping_cart    - Shopping list PDF (auth)
//!
//! # Users
//! GET    /api/users/me                          - Current user (auth)
//! GET    /api/users/subscriptions               - Followed authors (auth)
//! GET    /api/users/{id}                        - User detail
//! POST   /api/users/{id}/subscribe              - Follow author (auth)
//! DELETE /api/users/{id}/subscribe              - Unfollow author (auth)
//! ```

pub mod ingredients;
pub mod recipe_lists;
pub mod recipes;
pub mod shopping_cart;
pub mod tags;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// All API routes, mounted under `/api`.
pub fn routes() -> Router<AppState> {
    Router::new().nest("/api", api_routes())
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(catalog_routes())
        .merge(recipe_routes())
        .merge(user_routes())
}

fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/tags", get(tags::list))
        .route("/tags/{id}", get(tags::detail))
        .route("/ingredients", get(ingredients::list))
        .route("/ingredients/{id}", get(ingredients::detail))
}

fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(recipes::list).post(recipes::create))
        .route(
            "/recipes/download_shopping_cart",
            get(shopping_cart::download),
        )
        .route(
            "/recipes/{id}",
            get(recipes::detail)
                .patch(recipes::update)
                .delete(recipes::delete),
        )
        .route(
            "/recipes/{id}/favorite",
            post(recipe_lists::add_favorite).delete(recipe_lists::remove_favorite),
        )
        .route(
            "/recipes/{id}/shopping_cart",
            post(recipe_lists::add_to_cart).delete(recipe_lists::remove_from_cart),
        )
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(users::me))
        .route("/users/subscriptions", get(users::subscriptions))
        .route("/users/{id}", get(users::detail))
        .route(
            "/users/{id}/subscribe",
            post(users::subscribe).delete(users::unsubscribe),
        )
}
