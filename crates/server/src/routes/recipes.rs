//! Recipe route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use foodgram_core::{RecipeId, UserId};
use tracing::instrument;

use crate::db::RecipeRepository;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::models::{Recipe, User};
use crate::services::recipes::RecipeInput;
use crate::state::AppState;

/// List recipes, newest first.
#[instrument(skip_all)]
pub async fn list(
    State(state): State<AppState>,
    OptionalAuth(viewer): OptionalAuth,
) -> Result<Json<Vec<Recipe>>> {
    let viewer = viewer.map(|u| u.id);
    let recipes = RecipeRepository::new(state.pool()).list(viewer).await?;
    Ok(Json(recipes))
}

/// Show one recipe.
#[instrument(skip(state, viewer))]
pub async fn detail(
    State(state): State<AppState>,
    OptionalAuth(viewer): OptionalAuth,
    Path(id): Path<RecipeId>,
) -> Result<Json<Recipe>> {
    load(&state, id, viewer.map(|u| u.id)).await.map(Json)
}

/// Create a recipe authored by the current user.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(input): Json<RecipeInput>,
) -> Result<(StatusCode, Json<Recipe>)> {
    let recipe = input.validate()?;
    let id = RecipeRepository::new(state.pool())
        .create(user.id, &recipe)
        .await?;

    tracing::info!(recipe_id = %id, author_id = %user.id, "Recipe created");
    let recipe_id = id.to_string();
    add_breadcrumb("recipe", "Created recipe", Some(&[("recipe_id", recipe_id.as_str())]));

    let created = load(&state, id, Some(user.id)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replace a recipe's fields, tags and ingredients.
#[instrument(skip(state, user, input))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<RecipeId>,
    Json(input): Json<RecipeInput>,
) -> Result<Json<Recipe>> {
    let repo = RecipeRepository::new(state.pool());
    let author = repo
        .author_of(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("recipe {id}")))?;
    ensure_can_modify(&user, author)?;

    let recipe = input.validate()?;
    repo.update(id, &recipe).await?;
    tracing::info!(recipe_id = %id, "Recipe updated");

    load(&state, id, Some(user.id)).await.map(Json)
}

/// Delete a recipe.
#[instrument(skip(state, user))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<RecipeId>,
) -> Result<StatusCode> {
    let repo = RecipeRepository::new(state.pool());
    let author = repo
        .author_of(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("recipe {id}")))?;
    ensure_can_modify(&user, author)?;

    if !repo.delete(id).await? {
        return Err(AppError::NotFound(format!("recipe {id}")));
    }
    tracing::info!(recipe_id = %id, "Recipe deleted");

    Ok(StatusCode::NO_CONTENT)
}

async fn load(state: &AppState, id: RecipeId, viewer: Option<UserId>) -> Result<Recipe> {
    RecipeRepository::new(state.pool())
        .get(id, viewer)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("recipe {id}")))
}

/// Only the author or an admin may change a recipe.
fn ensure_can_modify(user: &User, author: UserId) -> Result<()> {
    if user.id == author || user.is_admin {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You do not have permission to modify this recipe".to_string(),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use foodgram_core::Email;

    use super::*;

    fn user(id: i32, is_admin: bool) -> User {
        User {
            id: UserId::new(id),
            email: Email::parse(&format!("user{id}@example.com")).unwrap(),
            username: format!("user{id}"),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            is_admin,
        }
    }

    #[test]
    fn test_author_can_modify() {
        assert!(ensure_can_modify(&user(1, false), UserId::new(1)).is_ok());
    }

    #[test]
    fn test_admin_can_modify() {
        assert!(ensure_can_modify(&user(2, true), UserId::new(1)).is_ok());
    }

    #[test]
    fn test_other_user_is_forbidden() {
        let err = ensure_can_modify(&user(2, false), UserId::new(1)).unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }
}
