//! Favorite and shopping cart route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use foodgram_core::RecipeId;
use tracing::instrument;

use crate::db::{RecipeList, RecipeListRepository, RecipeRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{RecipeSummary, User};
use crate::state::AppState;

/// Add a recipe to the current user's favorites.
#[instrument(skip(state, user))]
pub async fn add_favorite(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<RecipeId>,
) -> Result<(StatusCode, Json<RecipeSummary>)> {
    add(&state, &user, id, RecipeList::Favorites).await
}

/// Remove a recipe from the current user's favorites.
#[instrument(skip(state, user))]
pub async fn remove_favorite(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<RecipeId>,
) -> Result<StatusCode> {
    remove(&state, &user, id, RecipeList::Favorites).await
}

/// Add a recipe to the current user's shopping cart.
#[instrument(skip(state, user))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<RecipeId>,
) -> Result<(StatusCode, Json<RecipeSummary>)> {
    add(&state, &user, id, RecipeList::ShoppingCart).await
}

/// Remove a recipe from the current user's shopping cart.
#[instrument(skip(state, user))]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<RecipeId>,
) -> Result<StatusCode> {
    remove(&state, &user, id, RecipeList::ShoppingCart).await
}

async fn add(
    state: &AppState,
    user: &User,
    id: RecipeId,
    list: RecipeList,
) -> Result<(StatusCode, Json<RecipeSummary>)> {
    let summary = RecipeRepository::new(state.pool())
        .get_summary(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("recipe {id}")))?;

    let added = RecipeListRepository::new(state.pool(), list)
        .add(user.id, id)
        .await?;
    if !added {
        return Err(AppError::BadRequest(format!(
            "Recipe is already in your {}",
            list.label()
        )));
    }

    tracing::info!(recipe_id = %id, list = list.label(), "Recipe added to list");
    Ok((StatusCode::CREATED, Json(summary)))
}

async fn remove(state: &AppState, user: &User, id: RecipeId, list: RecipeList) -> Result<StatusCode> {
    if RecipeRepository::new(state.pool())
        .author_of(id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound(format!("recipe {id}")));
    }

    let removed = RecipeListRepository::new(state.pool(), list)
        .remove(user.id, id)
        .await?;
    if !removed {
        return Err(AppError::BadRequest(format!(
            "Recipe is not in your {}",
            list.label()
        )));
    }

    tracing::info!(recipe_id = %id, list = list.label(), "Recipe removed from list");
    Ok(StatusCode::NO_CONTENT)
}
