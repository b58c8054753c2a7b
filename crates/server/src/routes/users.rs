//! User and subscription route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use foodgram_core::UserId;
use serde::Deserialize;
use tracing::instrument;

use crate::db::{RecipeRepository, SubscriptionRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::models::{SubscriptionView, User, UserView};
use crate::state::AppState;

/// Query parameters for subscription responses.
#[derive(Debug, Default, Deserialize)]
pub struct RecipesLimit {
    /// Maximum number of recipes listed per author.
    pub recipes_limit: Option<usize>,
}

/// The current user.
#[instrument(skip_all)]
pub async fn me(RequireAuth(user): RequireAuth) -> Json<UserView> {
    Json(UserView::new(user, false))
}

/// Show one user, relative to the viewer.
#[instrument(skip(state, viewer))]
pub async fn detail(
    State(state): State<AppState>,
    OptionalAuth(viewer): OptionalAuth,
    Path(id): Path<UserId>,
) -> Result<Json<UserView>> {
    let user = find_user(&state, id).await?;

    let is_subscribed = match viewer {
        Some(viewer) => {
            SubscriptionRepository::new(state.pool())
                .is_subscribed(viewer.id, id)
                .await?
        }
        None => false,
    };

    Ok(Json(UserView::new(user, is_subscribed)))
}

/// Authors the current user follows, with their recipes.
#[instrument(skip(state, user))]
pub async fn subscriptions(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(limit): Query<RecipesLimit>,
) -> Result<Json<Vec<SubscriptionView>>> {
    let authors = SubscriptionRepository::new(state.pool())
        .list_authors(user.id)
        .await?;

    let mut views = Vec::with_capacity(authors.len());
    for author in authors {
        views.push(subscription_view(&state, author, limit.recipes_limit).await?);
    }

    Ok(Json(views))
}

/// Follow an author.
#[instrument(skip(state, user))]
pub async fn subscribe(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<UserId>,
    Query(limit): Query<RecipesLimit>,
) -> Result<(StatusCode, Json<SubscriptionView>)> {
    let author = find_user(&state, id).await?;
    if author.id == user.id {
        return Err(AppError::BadRequest(
            "You cannot subscribe to yourself".to_string(),
        ));
    }

    let created = SubscriptionRepository::new(state.pool())
        .subscribe(user.id, author.id)
        .await?;
    if !created {
        return Err(AppError::BadRequest(
            "You are already subscribed to this author".to_string(),
        ));
    }

    tracing::info!(author_id = %author.id, "Subscribed");
    let view = subscription_view(&state, author, limit.recipes_limit).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// Stop following an author.
#[instrument(skip(state, user))]
pub async fn unsubscribe(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<UserId>,
) -> Result<StatusCode> {
    let author = find_user(&state, id).await?;

    let removed = SubscriptionRepository::new(state.pool())
        .unsubscribe(user.id, author.id)
        .await?;
    if !removed {
        return Err(AppError::BadRequest(
            "You are not subscribed to this author".to_string(),
        ));
    }

    tracing::info!(author_id = %author.id, "Unsubscribed");
    Ok(StatusCode::NO_CONTENT)
}

async fn find_user(state: &AppState, id: UserId) -> Result<User> {
    UserRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {id}")))
}

async fn subscription_view(
    state: &AppState,
    author: User,
    recipes_limit: Option<usize>,
) -> Result<SubscriptionView> {
    let recipes = RecipeRepository::new(state.pool())
        .summaries_by_author(author.id)
        .await?;
    let view = SubscriptionView::new(author, recipes);

    Ok(match recipes_limit {
        Some(limit) => view.limit_recipes(limit),
        None => view,
    })
}
