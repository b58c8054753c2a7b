//! Ingredient route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use foodgram_core::IngredientId;
use serde::Deserialize;
use tracing::instrument;

use crate::db::IngredientRepository;
use crate::error::{AppError, Result};
use crate::models::Ingredient;
use crate::state::AppState;

/// Query parameters for the ingredient list.
#[derive(Debug, Default, Deserialize)]
pub struct IngredientFilter {
    /// Case-insensitive name prefix.
    pub name: Option<String>,
}

/// List ingredients, optionally filtered by name prefix.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<IngredientFilter>,
) -> Result<Json<Vec<Ingredient>>> {
    let ingredients = IngredientRepository::new(state.pool())
        .list(filter.name.as_deref())
        .await?;
    Ok(Json(ingredients))
}

/// Show one ingredient.
#[instrument(skip(state))]
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<IngredientId>,
) -> Result<Json<Ingredient>> {
    IngredientRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("ingredient {id}")))
}
