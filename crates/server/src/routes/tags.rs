//! Tag route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use foodgram_core::TagId;
use tracing::instrument;

use crate::db::TagRepository;
use crate::error::{AppError, Result};
use crate::models::Tag;
use crate::state::AppState;

/// List all tags.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Tag>>> {
    let tags = TagRepository::new(state.pool()).list().await?;
    Ok(Json(tags))
}

/// Show one tag.
#[instrument(skip(state))]
pub async fn detail(State(state): State<AppState>, Path(id): Path<TagId>) -> Result<Json<Tag>> {
    TagRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("tag {id}")))
}
