//! Tags and ingredients: read-only reference data.

use foodgram_core::{HexColor, IngredientId, Slug, TagId};
use serde::Serialize;

/// A recipe category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub color: HexColor,
    pub slug: Slug,
}

/// An ingredient with the unit its quantities are measured in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub measurement_unit: String,
}
